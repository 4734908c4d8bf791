//! The scene orchestrator: owns the character, the orbs and the floating texts,
//! and runs one update/render pass per host tick.

use crate::animation::{FrameRect, SpriteAnimation};
use crate::character::{Character, Mode, MoveWindow};
use crate::config::{GameConfig, Vec2};
use crate::effects::FloatingText;
use crate::error::AssetError;
use crate::orb::Orb;
use crate::scheduler::{FrameScheduler, TickHandle};
use crate::surface::{Rect, Surface};

/// A sprite sheet image and the frame rectangles cut from it.
pub struct Clip<I> {
    pub image: I,
    pub frames: Vec<FrameRect>,
}

/// Everything the loader hands over in one piece once loading succeeded.
pub struct Assets<I> {
    pub background: I,
    pub idle: Clip<I>,
    pub jump: Clip<I>,
}

struct Stage<I> {
    background: I,
    idle_sheet: I,
    jump_sheet: I,
    character: Character,
}

pub struct Game<S: Surface> {
    config: GameConfig,
    surface: S,
    scheduler: Box<dyn FrameScheduler>,
    collect_sound: Option<Box<dyn FnMut()>>,
    scale: f64,
    /// `None` until assets are installed; nothing runs before that.
    stage: Option<Stage<S::Image>>,
    orbs: Vec<Orb>,
    texts: Vec<FloatingText>,
    running: bool,
    pending_tick: Option<TickHandle>,
}

impl<S: Surface> Game<S> {
    pub fn new(config: GameConfig, surface: S, scheduler: Box<dyn FrameScheduler>) -> Self {
        let scale = config.scale_for(surface.width());
        Self {
            config,
            surface,
            scheduler,
            collect_sound: None,
            scale,
            stage: None,
            orbs: Vec::new(),
            texts: Vec::new(),
            running: false,
            pending_tick: None,
        }
    }

    /// Hook fired once per collected orb.
    pub fn set_collect_sound(&mut self, hook: Box<dyn FnMut()>) {
        self.collect_sound = Some(hook);
    }

    /// Readiness gate: builds the character and the orbs and renders the first frame.
    pub fn install_assets(&mut self, assets: Assets<S::Image>) -> Result<(), AssetError> {
        if assets.idle.frames.is_empty() {
            return Err(AssetError::EmptyClip(self.config.assets.idle_data.clone()));
        }
        if assets.jump.frames.is_empty() {
            return Err(AssetError::EmptyClip(self.config.assets.jump_data.clone()));
        }
        if assets.jump.frames.len() != self.config.jump_total_frames {
            log::warn!(
                "jump clip has {} frames, tuned for {}",
                assets.jump.frames.len(),
                self.config.jump_total_frames
            );
        }
        let idle_count = assets.idle.frames.len();
        let jump_count = assets.jump.frames.len();

        let idle = SpriteAnimation::new(assets.idle.frames, self.config.frame_rate, true);
        let jump = SpriteAnimation::new(assets.jump.frames, self.config.frame_rate, false);
        let window = MoveWindow {
            start: self.config.jump_move_start_frame,
            end: self.config.jump_move_end_frame,
        };
        let character = Character::new(idle, jump, self.sprite_start(), self.jump_offset(), window);
        self.stage = Some(Stage {
            background: assets.background,
            idle_sheet: assets.idle.image,
            jump_sheet: assets.jump.image,
            character,
        });
        self.rebuild_orbs();
        self.render();

        log::info!("assets loaded: {idle_count} idle frames, {jump_count} jump frames, {} orbs", self.orbs.len());
        Ok(())
    }

    pub fn play(&mut self) {
        if !self.is_ready() || self.running {
            return;
        }
        self.running = true;
        log::info!("gameplay is active");
        self.schedule_next();
    }

    pub fn pause(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        if let Some(handle) = self.pending_tick.take() {
            self.scheduler.cancel_tick(handle);
        }
        log::info!("gameplay paused");
    }

    /// One scheduled frame. Reschedules itself only while still running.
    pub fn tick(&mut self, now_ms: f64) {
        self.pending_tick = None;
        if !self.running {
            return;
        }
        self.update(now_ms);
        self.render();
        if !self.running {
            return;
        }
        self.schedule_next();
    }

    /// Puts the character back at the start and rebuilds the full orb set.
    pub fn reset(&mut self) {
        let start = self.sprite_start();
        let offset = self.jump_offset();
        let Some(stage) = self.stage.as_mut() else {
            log::warn!("reset ignored: assets not loaded");
            return;
        };
        stage.character.reset(start, offset);
        self.texts.clear();
        self.rebuild_orbs();
        self.render();
        log::info!("character and orbs reset");
    }

    /// Requests a jump. Ignored unless running, idle, and an orb is left to collect.
    pub fn trigger_jump(&mut self) -> bool {
        if !self.running || self.orbs.is_empty() {
            return false;
        }
        match self.stage.as_mut() {
            Some(stage) => stage.character.start_jump(),
            None => false,
        }
    }

    /// Platform buttons are numbered from 1 and must be taken in order.
    pub fn jump_to_platform(&mut self, platform: u32) -> bool {
        if platform != self.jump_count() + 1 {
            log::debug!("platform {platform} is not next (jumps so far: {})", self.jump_count());
            return false;
        }
        self.trigger_jump()
    }

    /// Applies a new viewport width: resizes the surface and rescales every
    /// scaled quantity by the same ratio, then redraws.
    pub fn resize_to(&mut self, width: f64) {
        if width <= 0.0 {
            log::warn!("resize to non-positive width {width} ignored");
            return;
        }
        let old_scale = self.scale;
        self.scale = self.config.scale_for(width);
        self.surface.resize(width, self.config.height_for(width));

        let start = self.sprite_start();
        let offset = self.jump_offset();
        if let Some(stage) = self.stage.as_mut() {
            if old_scale > 0.0 {
                stage.character.rescale(self.scale / old_scale, offset);
            } else {
                // Started on a zero-width container: nothing to scale from.
                stage.character.relocate(start, offset);
            }
        }
        for orb in &mut self.orbs {
            let at = self.config.orb_slot_position(orb.slot(), self.scale);
            orb.place(at.x, at.y);
            orb.set_scale(self.scale);
        }
        self.render();
    }

    pub fn update(&mut self, now_ms: f64) {
        let Some(stage) = self.stage.as_mut() else {
            return;
        };
        stage.character.update(now_ms);

        for orb in &mut self.orbs {
            orb.update();
        }

        let pos = stage.character.position();
        let size = self.config.sprite_size.scaled(self.scale);
        for i in (0..self.orbs.len()).rev() {
            if !self.orbs[i].check_collision(pos.x, pos.y, size.x, size.y) {
                continue;
            }
            let orb = self.orbs.remove(i);
            if let Some(sound) = self.collect_sound.as_mut() {
                sound();
            }
            let offset = self.config.collect_text_offset;
            self.texts.push(FloatingText::new(
                pos.x + offset.x * self.scale,
                pos.y + offset.y,
                self.config.collect_text.clone(),
                self.scale,
                self.config.collect_text_font,
            ));
            log::debug!("collected {:?}", orb.label());
        }

        for text in &mut self.texts {
            text.update();
        }
        self.texts.retain(|t| !t.is_complete());
    }

    /// Draws background, character, orbs, then texts.
    pub fn render(&mut self) {
        let Some(stage) = self.stage.as_ref() else {
            return;
        };
        let (w, h) = (self.surface.width(), self.surface.height());
        self.surface.clear();
        self.surface.draw_image(&stage.background, Rect { x: 0.0, y: 0.0, w, h });

        let character = &stage.character;
        let sheet = match character.mode() {
            Mode::Idle => &stage.idle_sheet,
            Mode::Jump => &stage.jump_sheet,
        };
        let pos = character.position();
        let size = self.config.sprite_size.scaled(self.scale);
        character
            .animation()
            .draw(&mut self.surface, sheet, Rect { x: pos.x, y: pos.y, w: size.x, h: size.y });

        for orb in &self.orbs {
            orb.draw(&mut self.surface);
        }
        for text in &self.texts {
            text.draw(&mut self.surface);
        }
    }

    pub fn is_ready(&self) -> bool {
        self.stage.is_some()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn jump_count(&self) -> u32 {
        self.stage.as_ref().map_or(0, |s| s.character.jump_count())
    }

    pub fn character(&self) -> Option<&Character> {
        self.stage.as_ref().map(|s| &s.character)
    }

    pub fn orbs(&self) -> &[Orb] {
        &self.orbs
    }

    pub fn floating_texts(&self) -> &[FloatingText] {
        &self.texts
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    fn schedule_next(&mut self) {
        match self.scheduler.request_tick() {
            Ok(handle) => self.pending_tick = Some(handle),
            Err(err) => {
                log::error!("{err}; stopping");
                self.running = false;
            }
        }
    }

    fn rebuild_orbs(&mut self) {
        let scale = self.scale;
        self.orbs = self
            .config
            .orbs
            .iter()
            .map(|spec| {
                let at = self.config.orb_slot_position(spec.slot, scale);
                Orb::new(at.x, at.y, spec.label.clone(), spec.slot, scale)
            })
            .collect();
    }

    fn sprite_start(&self) -> Vec2 {
        self.config.sprite_start.scaled(self.scale)
    }

    fn jump_offset(&self) -> Vec2 {
        self.config.jump_offset.scaled(self.scale)
    }
}
