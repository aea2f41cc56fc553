use std::f32::consts::TAU;

use macroquad::math::{Vec2, vec2};
use macroquad::rand::gen_range;

use crate::config::STAR_COUNT;
use crate::scene::Viewport;

const MIN_TWINKLE: f32 = 0.01;
const MAX_TWINKLE: f32 = 0.05;
const MIN_SIZE: f32 = 0.6;
const MAX_SIZE: f32 = 1.8;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Star {
    pub pos: Vec2,
    pub size: f32,
    phase: f32,
    speed: f32,
}

impl Star {
    pub fn brightness(&self, tick: u64) -> f32 {
        0.5 + 0.5 * (tick as f32 * self.speed + self.phase).sin()
    }
}

#[derive(Debug, Default)]
pub struct Starfield {
    stars: Vec<Star>,
}

impl Starfield {
    pub fn new(viewport: Viewport) -> Self {
        let mut field = Self::default();
        field.regenerate(viewport);
        field
    }

    pub fn regenerate(&mut self, viewport: Viewport) {
        let sky = viewport.horizon_y();
        self.stars = (0..STAR_COUNT)
            .map(|_| Star {
                pos: vec2(gen_range(0.0, viewport.width), gen_range(0.0, sky)),
                size: gen_range(MIN_SIZE, MAX_SIZE),
                phase: gen_range(0.0, TAU),
                speed: gen_range(MIN_TWINKLE, MAX_TWINKLE),
            })
            .collect();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Star> {
        self.stars.iter()
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }
}
