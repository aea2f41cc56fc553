use std::collections::VecDeque;
use std::f32::consts::TAU;

use macroquad::color::Color;
use macroquad::math::{Vec2, vec2};
use macroquad::rand::gen_range;

use crate::config::{
    FISH_BAND_LEFT, FISH_BAND_RIGHT, FISH_DAMPING, FISH_DEATH_MARGIN_PX, FISH_DRIFT,
    FISH_PITCH_HIGH, FISH_PITCH_LOW, FISH_SPAWN_DROP_PX, FISH_SPEED_HARD, FISH_SPEED_SOFT,
    FISH_SPLASH, GRAVITY, HORIZON, TRAIL_CAP,
};
use crate::noise::CoherentNoise;
use crate::scene::{Viewport, map_range};

const BODY_STEP: f32 = 0.2;
const BODY_RADIUS: f32 = 12.0;
const BODY_WOBBLE: f32 = 5.0;
const WOBBLE_RATE: f32 = 0.2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FishVariant {
    Round,
    Sharp,
}

impl FishVariant {
    fn stretch(self) -> (f32, f32) {
        match self {
            FishVariant::Round => (1.2, 0.3),
            FishVariant::Sharp => (1.0, 0.45),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Fish {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Color,
    pub variant: FishVariant,
    trail: VecDeque<Vec2>,
    alive: bool,
}

impl Fish {
    fn new(pos: Vec2, vel: Vec2, color: Color, variant: FishVariant) -> Self {
        Self {
            pos,
            vel,
            color,
            variant,
            trail: VecDeque::with_capacity(TRAIL_CAP + 1),
            alive: true,
        }
    }

    // true on the tick the fish dives back under the horizon
    fn update(&mut self, horizon_y: f32) -> bool {
        self.trail.push_back(self.pos);
        while self.trail.len() > TRAIL_CAP {
            self.trail.pop_front();
        }
        self.pos += self.vel;
        self.vel.y += GRAVITY;
        self.vel.x *= FISH_DAMPING;
        if self.alive && self.pos.y > horizon_y + FISH_DEATH_MARGIN_PX && self.vel.y > 0.0 {
            self.alive = false;
            return true;
        }
        false
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn trail(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.trail.iter().copied()
    }

    #[cfg(test)]
    pub fn trail_len(&self) -> usize {
        self.trail.len()
    }

    pub fn outline(&self, noise: &CoherentNoise, tick: u64) -> Vec<Vec2> {
        let (sx, sy) = self.variant.stretch();
        let heading = self.vel.y.atan2(self.vel.x);
        let (sin_h, cos_h) = heading.sin_cos();
        let steps = (TAU / BODY_STEP).ceil() as usize;
        (0..steps)
            .map(|step| {
                let angle = step as f32 * BODY_STEP;
                let wobble = noise.sample2(tick as f32 * WOBBLE_RATE, angle) * BODY_WOBBLE;
                let r = BODY_RADIUS + wobble;
                let local = vec2(angle.cos() * r * sx, angle.sin() * r * sy);
                self.pos
                    + vec2(
                        local.x * cos_h - local.y * sin_h,
                        local.x * sin_h + local.y * cos_h,
                    )
            })
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct ParticleField {
    fish: Vec<Fish>,
}

impl ParticleField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(
        &mut self,
        pitch: u8,
        color: Color,
        velocity: f32,
        variant: FishVariant,
        viewport: Viewport,
    ) {
        let drift = gen_range(-FISH_DRIFT, FISH_DRIFT);
        self.spawn_with_drift(pitch, color, velocity, variant, viewport, drift);
    }

    fn spawn_with_drift(
        &mut self,
        pitch: u8,
        color: Color,
        velocity: f32,
        variant: FishVariant,
        viewport: Viewport,
        drift: f32,
    ) {
        let x = map_range(
            pitch as f32,
            FISH_PITCH_LOW,
            FISH_PITCH_HIGH,
            viewport.width * FISH_BAND_LEFT,
            viewport.width * FISH_BAND_RIGHT,
        )
        .clamp(0.0, viewport.width);
        let y = (viewport.height + FISH_SPAWN_DROP_PX) * HORIZON;
        let velocity = if velocity.is_nan() {
            0.0
        } else {
            velocity.clamp(0.0, 1.0)
        };
        let vy = map_range(velocity, 0.0, 1.0, -FISH_SPEED_SOFT, -FISH_SPEED_HARD);
        self.fish
            .push(Fish::new(vec2(x, y), vec2(drift, vy), color, variant));
    }

    pub fn advance(&mut self, horizon_y: f32, splash: &mut f32) -> usize {
        let mut deaths = 0;
        for fish in self.fish.iter_mut().filter(|f| f.alive) {
            if fish.update(horizon_y) {
                *splash += FISH_SPLASH;
                deaths += 1;
            }
        }
        deaths
    }

    pub fn reap(&mut self) {
        self.fish.retain(Fish::is_alive);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Fish> {
        self.fish.iter()
    }

    pub fn len(&self) -> usize {
        self.fish.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fish.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::REST_COLOR;
    use approx::assert_relative_eq;

    fn viewport() -> Viewport {
        Viewport::new(1000.0, 800.0)
    }

    fn field_with(pitch: u8, velocity: f32) -> ParticleField {
        let mut field = ParticleField::new();
        field.spawn_with_drift(pitch, REST_COLOR, velocity, FishVariant::Round, viewport(), 0.5);
        field
    }

    #[test]
    fn spawn_maps_pitch_and_velocity() {
        let field = field_with(80, 1.0);
        let fish = field.iter().next().expect("fish");
        assert_relative_eq!(fish.pos.x, 500.0);
        assert_relative_eq!(fish.pos.y, 425.0);
        assert_relative_eq!(fish.vel.y, -20.0);
        assert_relative_eq!(fish.vel.x, 0.5);

        let soft = field_with(60, 0.0);
        let fish = soft.iter().next().expect("fish");
        assert_relative_eq!(fish.pos.x, 200.0);
        assert_relative_eq!(fish.vel.y, -5.0);
    }

    #[test]
    fn spawn_clamps_wild_input() {
        let low = field_with(0, f32::NAN);
        let fish = low.iter().next().expect("fish");
        assert!(fish.pos.x >= 0.0);
        assert_relative_eq!(fish.vel.y, -5.0);

        let high = field_with(127, 9.0);
        let fish = high.iter().next().expect("fish");
        assert!(fish.pos.x <= 1000.0);
        assert_relative_eq!(fish.vel.y, -20.0);
    }

    #[test]
    fn random_drift_is_bounded() {
        let mut field = ParticleField::new();
        for _ in 0..50 {
            field.spawn(70, REST_COLOR, 0.5, FishVariant::Sharp, viewport());
        }
        assert_eq!(field.len(), 50);
        assert!(field.iter().all(|f| f.vel.x.abs() <= FISH_DRIFT));
    }

    #[test]
    fn fish_dies_once_when_diving_past_horizon() {
        let mut field = field_with(80, 0.7);
        let horizon = viewport().horizon_y();
        let mut splash = 0.0;
        let mut ticks = 0;
        loop {
            let (before_y, before_vy) = {
                let fish = field.iter().next().expect("fish");
                (fish.pos.y, fish.vel.y)
            };
            let deaths = field.advance(horizon, &mut splash);
            ticks += 1;
            let after_y = before_y + before_vy;
            let after_vy = before_vy + GRAVITY;
            let crossed = after_y > horizon + FISH_DEATH_MARGIN_PX && after_vy > 0.0;
            if crossed {
                assert_eq!(deaths, 1);
                assert_eq!(splash, FISH_SPLASH);
                break;
            }
            assert_eq!(deaths, 0);
            assert_eq!(splash, 0.0);
            assert!(field.iter().all(Fish::is_alive));
            assert!(ticks < 1000, "fish never came down");
        }

        // dead but still listed until reaped
        assert_eq!(field.len(), 1);
        assert_eq!(field.advance(horizon, &mut splash), 0);
        assert_eq!(splash, FISH_SPLASH);
        field.reap();
        assert!(field.is_empty());
    }

    #[test]
    fn reap_keeps_survivor_order() {
        let mut field = ParticleField::new();
        let horizon = viewport().horizon_y();
        field.spawn_with_drift(60, REST_COLOR, 0.0, FishVariant::Round, viewport(), -1.0);
        field.spawn_with_drift(70, REST_COLOR, 1.0, FishVariant::Round, viewport(), 0.0);
        field.spawn_with_drift(90, REST_COLOR, 1.0, FishVariant::Round, viewport(), 1.0);
        let mut splash = 0.0;
        // the soft first fish lands well before the two hard ones
        while field.iter().all(Fish::is_alive) {
            field.advance(horizon, &mut splash);
        }
        field.reap();
        let drifts: Vec<f32> = field.iter().map(|f| f.vel.x).collect();
        assert_eq!(drifts.len(), 2);
        assert!(drifts[0] == 0.0 && drifts[1] > 0.0);
    }

    #[test]
    fn trail_never_exceeds_cap() {
        let mut field = field_with(80, 1.0);
        let mut splash = 0.0;
        for tick in 1..=30 {
            field.advance(f32::INFINITY, &mut splash);
            let fish = field.iter().next().expect("fish");
            assert_eq!(fish.trail_len(), tick.min(TRAIL_CAP));
        }
    }

    #[test]
    fn outline_surrounds_the_fish() {
        let field = field_with(80, 1.0);
        let fish = field.iter().next().expect("fish");
        let noise = CoherentNoise::with_seed(5);
        let outline = fish.outline(&noise, 12);
        assert_eq!(outline.len(), 32);
        for point in outline {
            assert!(point.distance(fish.pos) <= (BODY_RADIUS + BODY_WOBBLE) * 1.2 + 1e-3);
        }
    }
}
