use macroquad::color::Color;

use crate::chords::ChordQuality;
use crate::config::{CHORD_SPLASH, HORIZON, LERP_SPEED, SPLASH_DECAY};

pub const REST_COLOR: Color = rgb8(20, 20, 30);
pub const MAJOR_COLOR: Color = rgb8(255, 180, 50);
pub const MINOR_COLOR: Color = rgb8(50, 120, 255);
pub const OTHER_COLOR: Color = rgb8(180, 100, 255);

pub const fn rgb8(r: u8, g: u8, b: u8) -> Color {
    Color {
        r: r as f32 / 255.0,
        g: g as f32 / 255.0,
        b: b as f32 / 255.0,
        a: 1.0,
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    pub fn horizon_y(&self) -> f32 {
        self.height * HORIZON
    }
}

pub fn target_color(quality: Option<ChordQuality>) -> Color {
    match quality {
        Some(ChordQuality::Major) => MAJOR_COLOR,
        Some(ChordQuality::Minor) => MINOR_COLOR,
        Some(ChordQuality::Other) => OTHER_COLOR,
        None => REST_COLOR,
    }
}

#[derive(Clone, Debug)]
pub struct SceneState {
    pub color_target: Color,
    color_display: Color,
    intensity: f32,
    pub splash: f32,
}

impl SceneState {
    pub fn new() -> Self {
        Self {
            color_target: REST_COLOR,
            color_display: REST_COLOR,
            intensity: 0.0,
            splash: 0.0,
        }
    }

    pub fn ease(&mut self, pad_notes: usize) {
        self.color_display = lerp_color(self.color_display, self.color_target, LERP_SPEED);
        self.intensity = lerp(self.intensity, pad_notes as f32, LERP_SPEED);
        self.splash *= SPLASH_DECAY;
    }

    pub fn chord_changed(&mut self) {
        self.splash = CHORD_SPLASH;
    }

    pub fn color_display(&self) -> Color {
        self.color_display
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }
}

impl Default for SceneState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

pub fn lerp_color(from: Color, to: Color, t: f32) -> Color {
    Color {
        r: lerp(from.r, to.r, t),
        g: lerp(from.g, to.g, t),
        b: lerp(from.b, to.b, t),
        a: lerp(from.a, to.a, t),
    }
}

pub fn map_range(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    out_min + (value - in_min) / (in_max - in_min) * (out_max - out_min)
}
