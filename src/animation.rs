//! Sprite sheet clips and the timed frame animator that steps through them.

use serde::Deserialize;

use crate::surface::{Rect, Surface};

/// Slack on the frame-duration comparison so a host ticking at exact
/// multiples of the duration is not starved by float rounding.
const FRAME_TIME_EPSILON_MS: f64 = 1e-6;

/// Source rectangle of one pose inside a sprite sheet image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub struct FrameRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

#[derive(Debug, Deserialize)]
struct FrameEntry {
    frame: FrameRect,
}

/// The JSON exported next to each sprite sheet: `{ "frames": [ { "frame": {x,y,w,h} }, ... ] }`.
/// Extra keys (trimmed, rotated, meta, ...) are ignored.
#[derive(Debug, Deserialize)]
pub struct SpriteSheetData {
    frames: Vec<FrameEntry>,
}

impl SpriteSheetData {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn into_frames(self) -> Vec<FrameRect> {
        self.frames.into_iter().map(|e| e.frame).collect()
    }
}

/// Advances a frame index over wall-clock time (milliseconds).
///
/// At most one frame is advanced per `update`, however late the call is; a
/// slow host simply plays the clip slower. Non-looping clips freeze on the last
/// frame and report completion.
#[derive(Clone, Debug)]
pub struct SpriteAnimation {
    frames: Vec<FrameRect>,
    frame_duration_ms: f64,
    current_frame: usize,
    last_frame_ms: f64,
    looping: bool,
    playing: bool,
    complete: bool,
}

impl SpriteAnimation {
    /// `frames` must not be empty; the loader rejects empty clips.
    pub fn new(frames: Vec<FrameRect>, frame_rate: f64, looping: bool) -> Self {
        debug_assert!(!frames.is_empty(), "sprite clip without frames");
        Self {
            frames,
            frame_duration_ms: 1000.0 / frame_rate,
            current_frame: 0,
            last_frame_ms: 0.0,
            looping,
            playing: true,
            complete: false,
        }
    }

    pub fn update(&mut self, now_ms: f64) {
        if !self.playing {
            return;
        }
        if now_ms - self.last_frame_ms >= self.frame_duration_ms - FRAME_TIME_EPSILON_MS {
            self.current_frame += 1;
            if self.current_frame >= self.frames.len() {
                if self.looping {
                    self.current_frame = 0;
                } else {
                    self.current_frame = self.frames.len() - 1;
                    self.complete = true;
                    self.playing = false;
                }
            }
            self.last_frame_ms = now_ms;
        }
    }

    /// Blits the current frame of `image` into `dest` (the caller chooses the size).
    pub fn draw<S: Surface>(&self, surface: &mut S, image: &S::Image, dest: Rect) {
        surface.draw_image_region(image, self.current_rect(), dest);
    }

    pub fn play(&mut self) {
        self.playing = true;
        self.complete = false;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    pub fn reset(&mut self) {
        self.current_frame = 0;
        self.last_frame_ms = 0.0;
        self.complete = false;
        self.playing = true;
    }

    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    pub fn current_rect(&self) -> FrameRect {
        self.frames[self.current_frame]
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn frame_duration_ms(&self) -> f64 {
        self.frame_duration_ms
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_finished(&self) -> bool {
        self.complete
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames(n: usize) -> Vec<FrameRect> {
        (0..n)
            .map(|i| FrameRect { x: i as f64 * 10.0, y: 0.0, w: 10.0, h: 20.0 })
            .collect()
    }

    #[test]
    fn looping_clip_wraps_after_last_frame() {
        let mut anim = SpriteAnimation::new(frames(5), 30.0, true);
        // Each tick is a bit longer than one frame so every tick advances once.
        for tick in 1..=6 {
            anim.update(tick as f64 * 34.0);
        }
        assert_eq!(anim.current_frame(), 1, "5 advances wrap to 0, the 6th lands on 1");
        assert!(!anim.is_finished());
    }

    #[test]
    fn exact_frame_duration_cadence_advances_every_tick() {
        let mut anim = SpriteAnimation::new(frames(5), 30.0, true);
        let d = anim.frame_duration_ms();
        for k in 1..=6 {
            anim.update(k as f64 * d);
        }
        assert_eq!(anim.current_frame(), 1);
    }

    #[test]
    fn half_duration_ticks_advance_every_other_tick() {
        let mut anim = SpriteAnimation::new(frames(100), 30.0, false);
        let half = anim.frame_duration_ms() / 2.0;
        for k in 1..=60 {
            anim.update(k as f64 * half);
        }
        assert_eq!(anim.current_frame(), 30);
    }

    #[test]
    fn update_before_frame_duration_is_noop() {
        let mut anim = SpriteAnimation::new(frames(3), 30.0, true);
        anim.update(34.0);
        anim.update(50.0);
        assert_eq!(anim.current_frame(), 1);
        anim.update(68.0);
        assert_eq!(anim.current_frame(), 2);
    }

    #[test]
    fn one_shot_clip_freezes_on_last_frame() {
        let mut anim = SpriteAnimation::new(frames(3), 30.0, false);
        for tick in 1..=10 {
            anim.update(tick as f64 * 40.0);
            assert!(anim.current_frame() < 3, "index out of range at tick {tick}");
        }
        assert_eq!(anim.current_frame(), 2);
        assert!(anim.is_finished());
        assert!(!anim.is_playing());
        // stays complete while more time passes
        anim.update(10_000.0);
        assert!(anim.is_finished());
        assert_eq!(anim.current_frame(), 2);
    }

    #[test]
    fn reset_and_play_clear_completion() {
        let mut anim = SpriteAnimation::new(frames(2), 30.0, false);
        anim.update(40.0);
        anim.update(80.0);
        assert!(anim.is_finished());
        anim.play();
        assert!(!anim.is_finished());
        assert!(anim.is_playing());

        anim.update(120.0);
        anim.reset();
        assert_eq!(anim.current_frame(), 0);
        assert!(!anim.is_finished());
        assert!(anim.is_playing());
    }

    #[test]
    fn paused_clip_does_not_advance() {
        let mut anim = SpriteAnimation::new(frames(4), 30.0, true);
        anim.pause();
        anim.update(1_000.0);
        assert_eq!(anim.current_frame(), 0);
    }

    #[test]
    fn parses_sprite_sheet_json() {
        let json = r#"{
            "frames": [
                { "filename": "idle_0", "frame": { "x": 0, "y": 0, "w": 330, "h": 531 }, "rotated": false },
                { "filename": "idle_1", "frame": { "x": 330, "y": 0, "w": 330, "h": 531 } }
            ],
            "meta": { "size": { "w": 660, "h": 531 } }
        }"#;
        let frames = SpriteSheetData::from_json(json).unwrap().into_frames();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1], FrameRect { x: 330.0, y: 0.0, w: 330.0, h: 531.0 });
    }
}
