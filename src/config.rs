use std::env;

pub const HORIZON: f32 = 0.5;
pub const WAVE_SPEED: f32 = 0.007;
pub const GRAVITY: f32 = 0.5;
pub const LERP_SPEED: f32 = 0.05;

pub const WAVE_BANDS: usize = 15;
pub const WAVE_STEP_PX: f32 = 15.0;
pub const WAVE_OVERSCAN_PX: f32 = 20.0;

pub const SPLASH_DECAY: f32 = 0.95;
pub const CHORD_SPLASH: f32 = 10.0;
pub const FISH_SPLASH: f32 = 1.0;
pub const MIN_CHORD_NOTES: usize = 3;

pub const TRAIL_CAP: usize = 10;
// Lowest piano key that launches a fish; 0 lets every key through.
pub const FISH_MIN_PITCH: u8 = 0;
pub const FISH_PITCH_LOW: f32 = 60.0;
pub const FISH_PITCH_HIGH: f32 = 100.0;
pub const FISH_BAND_LEFT: f32 = 0.2;
pub const FISH_BAND_RIGHT: f32 = 0.8;
pub const FISH_SPEED_SOFT: f32 = 5.0;
pub const FISH_SPEED_HARD: f32 = 20.0;
pub const FISH_DRIFT: f32 = 2.0;
pub const FISH_DAMPING: f32 = 0.99;
pub const FISH_SPAWN_DROP_PX: f32 = 50.0;
pub const FISH_DEATH_MARGIN_PX: f32 = 20.0;

pub const STAR_COUNT: usize = 100;

pub const BACKGROUND_ALPHA: u8 = 200;
pub const LABEL_FONT_SIZE: u16 = 32;
pub const LABEL_MARGIN_PX: f32 = 40.0;

pub const WINDOW_WIDTH: i32 = 1200;
pub const WINDOW_HEIGHT: i32 = 800;

const PIANO_PORT_VAR: &str = "OCEAN_PIANO_PORT";
const PAD_PORT_VAR: &str = "OCEAN_PAD_PORT";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum MidiBinding {
    #[default]
    Positional,
    ByName {
        piano: Option<String>,
        pad: Option<String>,
    },
}

impl MidiBinding {
    pub fn from_env() -> Self {
        Self::from_patterns(env::var(PIANO_PORT_VAR).ok(), env::var(PAD_PORT_VAR).ok())
    }

    fn from_patterns(piano: Option<String>, pad: Option<String>) -> Self {
        let piano = piano.filter(|p| !p.trim().is_empty());
        let pad = pad.filter(|p| !p.trim().is_empty());
        if piano.is_none() && pad.is_none() {
            MidiBinding::Positional
        } else {
            MidiBinding::ByName { piano, pad }
        }
    }
}
