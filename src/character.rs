//! The player sprite: idle/jump mode switching and the keyframed jump path.

use crate::animation::SpriteAnimation;
use crate::config::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Idle,
    Jump,
}

/// Frame window of the jump clip during which the sprite actually travels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveWindow {
    pub start: usize,
    pub end: usize,
}

impl MoveWindow {
    /// Displacement from the jump base after `frame` of the clip: zero before
    /// the window, linear inside it, the full offset after it.
    pub fn displacement(&self, frame: usize, total: Vec2) -> Vec2 {
        if frame < self.start {
            Vec2::default()
        } else if frame > self.end {
            total
        } else {
            let span = (self.end - self.start).max(1) as f64;
            total.scaled((frame - self.start) as f64 / span)
        }
    }
}

pub struct Character {
    mode: Mode,
    idle: SpriteAnimation,
    jump: SpriteAnimation,
    /// Where the sprite is drawn this tick.
    position: Vec2,
    /// Where the sprite rests between jumps.
    resting: Vec2,
    /// Snapshot of `position` when the current jump started.
    jump_base: Vec2,
    jump_offset: Vec2,
    window: MoveWindow,
    jump_count: u32,
}

impl Character {
    pub fn new(idle: SpriteAnimation, jump: SpriteAnimation, start: Vec2, jump_offset: Vec2, window: MoveWindow) -> Self {
        Self {
            mode: Mode::Idle,
            idle,
            jump,
            position: start,
            resting: start,
            jump_base: start,
            jump_offset,
            window,
            jump_count: 0,
        }
    }

    pub fn update(&mut self, now_ms: f64) {
        match self.mode {
            Mode::Idle => self.idle.update(now_ms),
            Mode::Jump => {
                self.jump.update(now_ms);
                let frame = self.jump.current_frame();
                if frame >= self.window.start {
                    self.position = self
                        .jump_base
                        .offset(self.window.displacement(frame, self.jump_offset));
                }
                if self.jump.is_finished() {
                    self.mode = Mode::Idle;
                    self.idle.reset();
                    self.resting = self.position;
                    self.jump_count += 1;
                    log::info!(
                        "jump {} complete, resting at ({:.1}, {:.1})",
                        self.jump_count,
                        self.position.x,
                        self.position.y
                    );
                }
            }
        }
    }

    /// Starts a jump from the current position. Returns false (and changes
    /// nothing) if a jump is already in flight.
    pub fn start_jump(&mut self) -> bool {
        if self.mode != Mode::Idle {
            return false;
        }
        self.mode = Mode::Jump;
        self.jump.reset();
        self.jump_base = self.position;
        log::debug!("jump started from ({:.1}, {:.1})", self.position.x, self.position.y);
        true
    }

    /// Applies a viewport scale change. All stored positions are scaled by
    /// `ratio` so an in-flight jump keeps its shape at the new size.
    pub fn rescale(&mut self, ratio: f64, jump_offset: Vec2) {
        self.position = self.position.scaled(ratio);
        self.resting = self.resting.scaled(ratio);
        self.jump_base = self.jump_base.scaled(ratio);
        self.jump_offset = jump_offset;
    }

    /// Re-derives every stored position from the start point and the landings
    /// completed so far, for when the previous scale gives nothing to scale
    /// from. An in-flight jump keeps its frame and continues from its landing.
    pub fn relocate(&mut self, start: Vec2, jump_offset: Vec2) {
        self.jump_offset = jump_offset;
        self.resting = start.offset(jump_offset.scaled(self.jump_count as f64));
        self.jump_base = self.resting;
        self.position = match self.mode {
            Mode::Idle => self.resting,
            Mode::Jump => self
                .jump_base
                .offset(self.window.displacement(self.jump.current_frame(), jump_offset)),
        };
    }

    pub fn reset(&mut self, start: Vec2, jump_offset: Vec2) {
        self.mode = Mode::Idle;
        self.position = start;
        self.resting = start;
        self.jump_base = start;
        self.jump_offset = jump_offset;
        self.jump_count = 0;
        self.idle.reset();
        self.jump.reset();
    }

    /// Animator that matches the current mode.
    pub fn animation(&self) -> &SpriteAnimation {
        match self.mode {
            Mode::Idle => &self.idle,
            Mode::Jump => &self.jump,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn resting(&self) -> Vec2 {
        self.resting
    }

    pub fn jump_count(&self) -> u32 {
        self.jump_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::FrameRect;

    const WINDOW: MoveWindow = MoveWindow { start: 22, end: 34 };
    const OFFSET: Vec2 = Vec2::new(-210.0, -100.0);

    fn clip(frames: usize, looping: bool) -> SpriteAnimation {
        SpriteAnimation::new(vec![FrameRect::default(); frames], 30.0, looping)
    }

    fn character() -> Character {
        Character::new(clip(8, true), clip(56, false), Vec2::new(1200.0, 445.0), OFFSET, WINDOW)
    }

    /// Drives the character with ticks 40 ms apart so every tick advances a frame.
    fn run(ch: &mut Character, clock: &mut f64, ticks: usize) {
        for _ in 0..ticks {
            *clock += 40.0;
            ch.update(*clock);
        }
    }

    #[test]
    fn displacement_holds_moves_then_holds() {
        assert_eq!(WINDOW.displacement(0, OFFSET), Vec2::default());
        assert_eq!(WINDOW.displacement(21, OFFSET), Vec2::default());
        assert_eq!(WINDOW.displacement(22, OFFSET), Vec2::default());
        assert_eq!(WINDOW.displacement(34, OFFSET), OFFSET);
        assert_eq!(WINDOW.displacement(55, OFFSET), OFFSET);
        let half = WINDOW.displacement(28, OFFSET);
        assert!((half.x - -105.0).abs() < 1e-9 && (half.y - -50.0).abs() < 1e-9);
    }

    #[test]
    fn displacement_is_monotonic_inside_window() {
        let mut prev = WINDOW.displacement(WINDOW.start, OFFSET);
        for f in WINDOW.start + 1..=WINDOW.end {
            let d = WINDOW.displacement(f, OFFSET);
            assert!(d.x < prev.x && d.y < prev.y, "frame {f} did not advance");
            prev = d;
        }
    }

    #[test]
    fn full_jump_lands_at_offset_and_returns_to_idle() {
        let mut ch = character();
        let mut clock = 0.0;
        assert!(ch.start_jump());
        assert_eq!(ch.mode(), Mode::Jump);

        run(&mut ch, &mut clock, 21);
        assert_eq!(ch.animation().current_frame(), 21);
        assert_eq!(ch.position(), Vec2::new(1200.0, 445.0), "anticipation plays in place");

        run(&mut ch, &mut clock, 56 - 21);
        assert_eq!(ch.mode(), Mode::Idle);
        assert_eq!(ch.jump_count(), 1);
        assert_eq!(ch.position(), Vec2::new(990.0, 345.0));
        assert_eq!(ch.resting(), ch.position());
        assert_eq!(ch.animation().current_frame(), 0, "idle clip restarted");
    }

    #[test]
    fn jump_request_mid_jump_is_ignored() {
        let mut ch = character();
        let mut clock = 0.0;
        assert!(ch.start_jump());
        run(&mut ch, &mut clock, 25);
        let before = (ch.position(), ch.animation().current_frame());
        assert!(!ch.start_jump());
        assert_eq!(ch.mode(), Mode::Jump);
        assert_eq!(ch.jump_count(), 0);
        assert_eq!((ch.position(), ch.animation().current_frame()), before);
    }

    #[test]
    fn second_jump_starts_from_landing_spot() {
        let mut ch = character();
        let mut clock = 0.0;
        for _ in 0..2 {
            assert!(ch.start_jump());
            run(&mut ch, &mut clock, 60);
        }
        assert_eq!(ch.jump_count(), 2);
        assert_eq!(ch.position(), Vec2::new(780.0, 245.0));
    }

    #[test]
    fn rescale_mid_jump_scales_path() {
        let mut ch = character();
        let mut clock = 0.0;
        ch.start_jump();
        run(&mut ch, &mut clock, 28);
        let before = ch.position();
        ch.rescale(0.5, OFFSET.scaled(0.5));
        assert_eq!(ch.position(), before.scaled(0.5));
        run(&mut ch, &mut clock, 40);
        assert_eq!(ch.position(), Vec2::new(495.0, 172.5));
    }

    #[test]
    fn relocate_rebuilds_positions_from_landings() {
        let mut ch = Character::new(clip(8, true), clip(56, false), Vec2::default(), Vec2::default(), WINDOW);
        let mut clock = 0.0;
        ch.start_jump();
        run(&mut ch, &mut clock, 60);
        assert_eq!(ch.jump_count(), 1);

        ch.relocate(Vec2::new(600.0, 222.5), OFFSET.scaled(0.5));
        assert_eq!(ch.position(), Vec2::new(495.0, 172.5));
        assert_eq!(ch.resting(), ch.position());

        ch.start_jump();
        run(&mut ch, &mut clock, 60);
        assert_eq!(ch.position(), Vec2::new(390.0, 122.5));
    }

    #[test]
    fn reset_restores_start() {
        let mut ch = character();
        let mut clock = 0.0;
        ch.start_jump();
        run(&mut ch, &mut clock, 60);
        ch.start_jump();
        run(&mut ch, &mut clock, 10);
        ch.reset(Vec2::new(1200.0, 445.0), OFFSET);
        assert_eq!(ch.mode(), Mode::Idle);
        assert_eq!(ch.jump_count(), 0);
        assert_eq!(ch.position(), Vec2::new(1200.0, 445.0));
    }
}
