use crate::surface::{Font, Surface};

const RISE_PER_TICK: f64 = 0.8;
const FADE_PER_TICK: f64 = 0.006;
const TRAVEL_DISTANCE: f64 = 350.0;

/// Text that drifts upward and fades out, e.g. "+1 skill" on a pickup.
#[derive(Clone, Debug)]
pub struct FloatingText {
    pub x: f64,
    pub y: f64,
    start_y: f64,
    text: String,
    font_size: f64,
    opacity: f64,
    total_distance: f64,
    speed: f64,
    fade: f64,
    complete: bool,
}

impl FloatingText {
    pub fn new(x: f64, y: f64, text: impl Into<String>, scale: f64, font_size: f64) -> Self {
        Self {
            x,
            y,
            start_y: y,
            text: text.into(),
            font_size: font_size * scale,
            opacity: 1.0,
            total_distance: TRAVEL_DISTANCE * scale,
            speed: RISE_PER_TICK * scale,
            fade: FADE_PER_TICK,
            complete: false,
        }
    }

    pub fn update(&mut self) {
        self.y -= self.speed;
        self.opacity -= self.fade;
        if self.distance_traveled() >= self.total_distance || self.opacity <= 0.0 {
            self.complete = true;
        }
    }

    pub fn draw<S: Surface>(&self, surface: &mut S) {
        if self.complete {
            return;
        }
        let color = format!("rgba(255, 255, 255, {})", self.opacity.clamp(0.0, 1.0));
        let font = Font { size_px: self.font_size, bold: true };
        surface.fill_text(&self.text, self.x, self.y, font, &color);
    }

    pub fn distance_traveled(&self) -> f64 {
        self.start_y - self.y
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fades_out_before_reaching_full_height() {
        let mut text = FloatingText::new(100.0, 500.0, "+1 skill", 1.0, 32.0);
        let mut ticks = 0;
        while !text.is_complete() {
            let (prev_opacity, prev_distance) = (text.opacity(), text.distance_traveled());
            text.update();
            ticks += 1;
            assert!(text.opacity() < prev_opacity);
            assert!(text.distance_traveled() > prev_distance);
        }
        assert_eq!(ticks, 167, "1 / 0.006 rounds up to 167 ticks");
        assert!(text.opacity() <= 0.0);
        assert!(text.distance_traveled() < 350.0);
    }

    #[test]
    fn completion_is_sticky() {
        let mut text = FloatingText::new(0.0, 0.0, "x", 1.0, 32.0);
        for _ in 0..200 {
            text.update();
        }
        assert!(text.is_complete());
        text.update();
        assert!(text.is_complete());
    }

    #[test]
    fn travel_and_speed_scale_together() {
        let mut text = FloatingText::new(0.0, 100.0, "x", 0.5, 32.0);
        text.update();
        assert!((text.distance_traveled() - 0.4).abs() < 1e-12);
        assert!((text.y - 99.6).abs() < 1e-12);
    }
}
