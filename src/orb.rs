//! Collectible "skill orbs": rotating, hovering glow rings with a label.

use std::f64::consts::TAU;

use crate::surface::{Font, GlowStroke, LinearGradient, Surface};

const BASE_SIZE: f64 = 90.0;
const BASE_STROKE_WIDTH: f64 = 2.0;
const ROTATION_STEP: f64 = 0.02; // rad per tick
const HOVER_STEP: f64 = 0.015;
const HOVER_AMOUNT: f64 = 5.0;
const GLOW_LAYERS: usize = 4;
const GLOW_BLUR_STEP: f64 = 5.0;
const LABEL_FONT: f64 = 14.0;
const LABEL_LINE_HEIGHT: f64 = 16.0;
/// The probe point sits this far (at reference scale) below the sprite's
/// vertical center, roughly at the character's chest.
const COLLISION_PROBE_OFFSET: f64 = 50.0;

const GLOW_START: &str = "#ffffff";
const GLOW_END: &str = "#17786f";
const LABEL_COLOR: &str = "#ffffff";

#[derive(Clone, Debug)]
pub struct Orb {
    pub x: f64,
    pub y: f64,
    /// Resting center; `y` oscillates around it.
    pub base_y: f64,
    label: String,
    slot: u32,
    scale: f64,
    size: f64,
    stroke_width: f64,
    rotation: f64,
    hover_phase: f64,
    hover_amplitude: f64,
}

impl Orb {
    pub fn new(x: f64, y: f64, label: impl Into<String>, slot: u32, scale: f64) -> Self {
        let mut orb = Self {
            x,
            y,
            base_y: y,
            label: label.into(),
            slot,
            scale,
            size: 0.0,
            stroke_width: 0.0,
            rotation: 0.0,
            hover_phase: 0.0,
            hover_amplitude: 0.0,
        };
        orb.set_scale(scale);
        orb
    }

    pub fn update(&mut self) {
        self.rotation += ROTATION_STEP;
        if self.rotation >= TAU {
            self.rotation -= TAU;
        }
        self.hover_phase += HOVER_STEP;
        self.y = self.base_y + self.hover_phase.sin() * self.hover_amplitude;
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
        self.size = BASE_SIZE * scale;
        self.stroke_width = BASE_STROKE_WIDTH * scale;
        self.hover_amplitude = HOVER_AMOUNT * scale;
    }

    /// Moves the orb's resting center, dropping any current hover displacement.
    pub fn place(&mut self, x: f64, y: f64) {
        self.x = x;
        self.base_y = y;
        self.y = y;
    }

    /// True when the target's probe point lies strictly inside the orb's circle.
    ///
    /// The probe is the horizontal center of the target box, shifted down from
    /// its vertical center by the chest offset, so a tall sprite only collects
    /// an orb it actually runs through.
    pub fn check_collision(&self, target_x: f64, target_y: f64, target_w: f64, target_h: f64) -> bool {
        let probe_x = target_x + target_w / 2.0;
        let probe_y = target_y + target_h / 2.0 + COLLISION_PROBE_OFFSET * self.scale;
        let dx = probe_x - self.x;
        let dy = probe_y - self.y;
        (dx * dx + dy * dy).sqrt() < self.radius()
    }

    pub fn draw<S: Surface>(&self, surface: &mut S) {
        let radius = self.radius();
        let (sin, cos) = self.rotation.sin_cos();
        let gradient = LinearGradient {
            from: (-radius * cos, -radius * sin),
            to: (radius * cos, radius * sin),
            stops: [(0.0, GLOW_START), (0.2, GLOW_START), (1.0, GLOW_END)],
        };
        for layer in 0..GLOW_LAYERS {
            surface.stroke_glow(&GlowStroke {
                cx: self.x,
                cy: self.y,
                radius,
                rotation: self.rotation,
                line_width: self.stroke_width,
                gradient,
                shadow_blur: layer as f64 * GLOW_BLUR_STEP,
                shadow_color: if layer % 2 == 0 { GLOW_START } else { GLOW_END },
            });
        }

        // Label does not rotate.
        let font_size = LABEL_FONT * self.scale;
        let line_height = LABEL_LINE_HEIGHT * self.scale;
        let font = Font { size_px: font_size, bold: false };
        let line_count = self.label.split('\n').count() as f64;
        for (i, line) in self.label.split('\n').enumerate() {
            let y = self.y + line_height * i as f64 - font_size * line_count / 2.0 + font_size / 2.0;
            surface.fill_text(line, self.x, y, font, LABEL_COLOR);
        }
    }

    pub fn radius(&self) -> f64 {
        self.size / 2.0
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn stroke_width(&self) -> f64 {
        self.stroke_width
    }

    pub fn hover_amplitude(&self) -> f64 {
        self.hover_amplitude
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn slot(&self) -> u32 {
        self.slot
    }
}
