use macroquad::color::Color;
use macroquad::math::{Vec2, vec2};

use crate::config::{WAVE_BANDS, WAVE_OVERSCAN_PX, WAVE_SPEED, WAVE_STEP_PX};
use crate::noise::CoherentNoise;
use crate::scene::{SceneState, Viewport, lerp, map_range};

const SWELL_WEIGHT: f32 = 0.7;
const CHOP_WEIGHT: f32 = 0.3;
const CREST_POWER: f32 = 1.2;
const CHOP_RATE: f32 = 2.5;
const EBB_RATE: f32 = 0.01;
const EBB_MIN: f32 = 0.8;
const EBB_MAX: f32 = 5.0;
const CALM_HEIGHT: f32 = 10.0;
const STORM_HEIGHT: f32 = 50.0;
const STORM_NOTES: f32 = 10.0;
const FAR_ALPHA: f32 = 30.0;
const NEAR_ALPHA: f32 = 180.0;
const FAR_THICKNESS: f32 = 0.5;
const NEAR_THICKNESS: f32 = 4.0;
// The drift layer reaches full speed before the last band.
const DRIFT_FULL_BAND: f32 = 12.0;

#[derive(Clone, Debug)]
pub struct WaveBand {
    pub baseline: f32,
    pub points: Vec<Vec2>,
    pub color: Color,
    pub thickness: f32,
}

pub struct WaveRenderer {
    noise: CoherentNoise,
}

impl WaveRenderer {
    pub fn new(noise: CoherentNoise) -> Self {
        Self { noise }
    }

    pub fn noise(&self) -> &CoherentNoise {
        &self.noise
    }

    pub fn bands(&self, scene: &SceneState, viewport: Viewport, tick: u64) -> Vec<WaveBand> {
        let height = wave_height(scene.intensity(), scene.splash, tick);
        let t = tick as f32 * WAVE_SPEED;
        let display = scene.color_display();

        (0..WAVE_BANDS)
            .map(|index| {
                let i = index as f32;
                let progress = i / WAVE_BANDS as f32;
                let baseline = band_baseline(index, viewport);
                let drift_rate = map_range(i, 0.0, DRIFT_FULL_BAND, 0.2, 1.0);

                let mut points = Vec::new();
                let mut x = 0.0;
                while x <= viewport.width + WAVE_OVERSCAN_PX {
                    let swell = self.noise.sample(x * 0.004, i * 0.1, t);
                    let chop = self.noise.sample(x * 0.015, i, t * CHOP_RATE);
                    let crest = (swell * SWELL_WEIGHT + chop * CHOP_WEIGHT).powf(CREST_POWER);
                    let drift = self.noise.sample(x * 0.005, i, t * drift_rate);
                    let offset = crest * height * (progress + 0.5) * drift;
                    points.push(vec2(x, baseline + offset - height / 2.0));
                    x += WAVE_STEP_PX;
                }

                let alpha = map_range(i, 0.0, WAVE_BANDS as f32, FAR_ALPHA, NEAR_ALPHA);
                WaveBand {
                    baseline,
                    points,
                    color: Color {
                        a: alpha / 255.0,
                        ..display
                    },
                    thickness: map_range(
                        i,
                        0.0,
                        WAVE_BANDS as f32,
                        FAR_THICKNESS,
                        NEAR_THICKNESS,
                    ),
                }
            })
            .collect()
    }
}

pub fn band_baseline(index: usize, viewport: Viewport) -> f32 {
    let progress = index as f32 / WAVE_BANDS as f32;
    lerp(viewport.horizon_y(), viewport.height, progress * progress)
}

pub fn ebb(tick: u64) -> f32 {
    map_range((tick as f32 * EBB_RATE).sin(), -1.0, 1.0, EBB_MIN, EBB_MAX)
}

pub fn wave_height(intensity: f32, splash: f32, tick: u64) -> f32 {
    let intensity = intensity.max(0.0);
    let splash = if splash.is_finite() { splash.max(0.0) } else { 0.0 };
    (map_range(intensity, 0.0, STORM_NOTES, CALM_HEIGHT, STORM_HEIGHT) + splash) * ebb(tick)
}
