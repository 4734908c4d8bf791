//! Tuning constants for the scene.
//!
//! Every length here is expressed at the reference canvas width (1536 px) and
//! multiplied by the current scale factor (`viewport_width / reference_width`)
//! before use. `GameConfig::default()` is the shipped tuning; a host may
//! override any subset of fields through JSON (`#[serde(default)]`).

use serde::Deserialize;

/// A 2D point / offset in canvas pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn scaled(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    pub fn offset(self, by: Vec2) -> Self {
        Self::new(self.x + by.x, self.y + by.y)
    }
}

/// One collectible on the staircase: its label and which landing it sits on.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct OrbSpec {
    pub label: String,
    pub slot: u32,
}

impl OrbSpec {
    fn new(label: &str, slot: u32) -> Self {
        Self { label: label.to_string(), slot }
    }
}

/// Where the browser glue finds its assets and DOM hooks.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AssetPaths {
    pub background: String,
    pub idle_sheet: String,
    pub idle_data: String,
    pub jump_sheet: String,
    pub jump_data: String,
    pub collect_sound_id: String,
    pub canvas_id: String,
    pub container_selector: String,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            background: "images/elliottprogrammer-level-up-scene.png".into(),
            idle_sheet: "idle-sprite/spritesheet.png".into(),
            idle_data: "idle-sprite/spritesheet.json".into(),
            jump_sheet: "jump-sprite/spritesheet.png".into(),
            jump_data: "jump-sprite/spritesheet.json".into(),
            collect_sound_id: "collect-sound".into(),
            canvas_id: "canvas".into(),
            container_selector: ".game-container".into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Canvas width at which every base length is used unscaled.
    pub reference_width: f64,
    /// width / height
    pub aspect_ratio: f64,
    /// Destination size of one sprite frame at reference width.
    pub sprite_size: Vec2,
    pub sprite_start: Vec2,
    /// Total displacement of one jump.
    pub jump_offset: Vec2,
    /// Canonical position of the orb in slot 0; slot n adds `n * jump_offset`.
    pub first_orb: Vec2,
    pub frame_rate: f64,
    /// Jump clip frames over which the character actually travels (inclusive).
    pub jump_move_start_frame: usize,
    pub jump_move_end_frame: usize,
    pub jump_total_frames: usize,
    pub collect_text: String,
    /// Floating text spawn point relative to the sprite origin; `x` scales, `y` does not.
    pub collect_text_offset: Vec2,
    pub collect_text_font: f64,
    pub collect_sound_volume: f64,
    pub orbs: Vec<OrbSpec>,
    pub assets: AssetPaths,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            reference_width: 1536.0,
            aspect_ratio: 3.0 / 2.0,
            sprite_size: Vec2::new(330.0, 531.0),
            sprite_start: Vec2::new(1200.0, 445.0),
            jump_offset: Vec2::new(-210.0, -100.0),
            first_orb: Vec2::new(1150.0, 680.0),
            frame_rate: 30.0,
            jump_move_start_frame: 22,
            jump_move_end_frame: 34,
            jump_total_frames: 56,
            collect_text: "+1 skill".into(),
            collect_text_offset: Vec2::new(120.0, 50.0),
            collect_text_font: 32.0,
            collect_sound_volume: 0.2,
            orbs: vec![
                OrbSpec::new("System\nDesign", 0),
                OrbSpec::new("Performance", 1),
                OrbSpec::new("AI Tools", 2),
                OrbSpec::new("Security\n& Auth", 3),
                OrbSpec::new("Project\nManagement", 4),
            ],
            assets: AssetPaths::default(),
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn scale_for(&self, viewport_width: f64) -> f64 {
        viewport_width / self.reference_width
    }

    pub fn height_for(&self, viewport_width: f64) -> f64 {
        viewport_width / self.aspect_ratio
    }

    /// Canonical (unhovered) center of the orb on `slot` at the given scale.
    pub fn orb_slot_position(&self, slot: u32, scale: f64) -> Vec2 {
        self.first_orb
            .offset(self.jump_offset.scaled(slot as f64))
            .scaled(scale)
    }
}

/// Coarse viewport class, used only for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceType {
    Desktop,
    Tablet,
    Mobile,
    Phone,
}

impl DeviceType {
    pub fn from_viewport_width(width: f64) -> Self {
        if width > 1766.0 {
            DeviceType::Desktop
        } else if width > 700.0 {
            DeviceType::Tablet
        } else if width > 450.0 {
            DeviceType::Mobile
        } else {
            DeviceType::Phone
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orb_slots_follow_the_jump_staircase() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.orb_slot_position(0, 1.0), Vec2::new(1150.0, 680.0));
        assert_eq!(cfg.orb_slot_position(2, 1.0), Vec2::new(730.0, 480.0));
        assert_eq!(cfg.orb_slot_position(2, 0.5), Vec2::new(365.0, 240.0));
    }

    #[test]
    fn partial_json_override_keeps_defaults() {
        let cfg = GameConfig::from_json(r#"{ "frame_rate": 24.0, "collect_text": "+1" }"#).unwrap();
        assert_eq!(cfg.frame_rate, 24.0);
        assert_eq!(cfg.collect_text, "+1");
        assert_eq!(cfg.reference_width, 1536.0);
        assert_eq!(cfg.orbs.len(), 5);
        assert_eq!(cfg.assets.canvas_id, "canvas");
    }

    #[test]
    fn device_type_thresholds() {
        assert_eq!(DeviceType::from_viewport_width(1920.0), DeviceType::Desktop);
        assert_eq!(DeviceType::from_viewport_width(1766.0), DeviceType::Tablet);
        assert_eq!(DeviceType::from_viewport_width(701.0), DeviceType::Tablet);
        assert_eq!(DeviceType::from_viewport_width(700.0), DeviceType::Mobile);
        assert_eq!(DeviceType::from_viewport_width(450.0), DeviceType::Phone);
    }
}
