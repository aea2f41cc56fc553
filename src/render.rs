use anyhow::{Result, anyhow};
use macroquad::material::{
    Material, MaterialParams, gl_use_default_material, gl_use_material, load_material,
};
use macroquad::miniquad::{
    BlendFactor, BlendState, BlendValue, Equation, PipelineParams, ShaderSource,
};
use macroquad::prelude::*;

use crate::config::{BACKGROUND_ALPHA, LABEL_FONT_SIZE, LABEL_MARGIN_PX};
use crate::ocean::Ocean;
use crate::particles::Fish;
use crate::scene::Viewport;
use crate::waves::WaveBand;

const SKY: Color = Color {
    r: 10.0 / 255.0,
    g: 10.0 / 255.0,
    b: 20.0 / 255.0,
    a: BACKGROUND_ALPHA as f32 / 255.0,
};
const LABEL_COLOR: Color = Color {
    r: 1.0,
    g: 1.0,
    b: 1.0,
    a: 150.0 / 255.0,
};
const STAR_ALPHA: f32 = 0.8;
const FISH_ALPHA: f32 = 200.0 / 255.0;
const FISH_STROKE: f32 = 2.0;
const TRAIL_ALPHA: f32 = 0.35;
const GLOW_WIDTH: f32 = 4.0;
const GLOW_ALPHA: f32 = 0.25;

const ADDITIVE_VERTEX: &str = r#"#version 100
attribute vec3 position;
attribute vec2 texcoord;
attribute vec4 color0;

varying lowp vec2 uv;
varying lowp vec4 color;

uniform mat4 Model;
uniform mat4 Projection;

void main() {
    gl_Position = Projection * Model * vec4(position, 1);
    color = color0 / 255.0;
    uv = texcoord;
}
"#;

const ADDITIVE_FRAGMENT: &str = r#"#version 100
varying lowp vec4 color;
varying lowp vec2 uv;

uniform sampler2D Texture;

void main() {
    gl_FragColor = color * texture2D(Texture, uv);
}
"#;

pub struct Renderer {
    additive: Material,
    canvas: RenderTarget,
    viewport: Viewport,
    needs_clear: bool,
}

impl Renderer {
    pub fn new(viewport: Viewport) -> Result<Self> {
        let pipeline_params = PipelineParams {
            color_blend: Some(BlendState::new(
                Equation::Add,
                BlendFactor::Value(BlendValue::SourceAlpha),
                BlendFactor::One,
            )),
            alpha_blend: Some(BlendState::new(
                Equation::Add,
                BlendFactor::Zero,
                BlendFactor::One,
            )),
            ..Default::default()
        };
        let additive = load_material(
            ShaderSource::Glsl {
                vertex: ADDITIVE_VERTEX,
                fragment: ADDITIVE_FRAGMENT,
            },
            MaterialParams {
                pipeline_params,
                ..Default::default()
            },
        )
        .map_err(|err| anyhow!("additive material: {err:?}"))?;

        Ok(Self {
            additive,
            canvas: build_canvas(viewport),
            viewport,
            needs_clear: true,
        })
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.canvas = build_canvas(viewport);
        self.needs_clear = true;
    }

    pub fn draw(&mut self, ocean: &Ocean) {
        let Viewport { width, height } = self.viewport;
        set_camera(&Camera2D {
            render_target: Some(self.canvas.clone()),
            ..Camera2D::from_display_rect(Rect::new(0.0, 0.0, width, height))
        });
        if self.needs_clear {
            clear_background(Color { a: 1.0, ..SKY });
            self.needs_clear = false;
        }

        draw_rectangle(0.0, 0.0, width, height, SKY);

        gl_use_material(&self.additive);
        draw_stars(ocean);
        draw_fishes(ocean);
        for band in ocean.waves().bands(ocean.scene(), self.viewport, ocean.tick_count()) {
            draw_band(&band);
        }
        gl_use_default_material();

        draw_label(ocean.chord_label(), height);

        set_default_camera();
        clear_background(BLACK);
        draw_texture_ex(
            &self.canvas.texture,
            0.0,
            0.0,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(screen_width(), screen_height())),
                // render targets come out upside down
                flip_y: true,
                ..Default::default()
            },
        );
    }
}

fn build_canvas(viewport: Viewport) -> RenderTarget {
    let canvas = render_target(viewport.width as u32, viewport.height as u32);
    canvas.texture.set_filter(FilterMode::Linear);
    canvas
}

fn draw_stars(ocean: &Ocean) {
    let tick = ocean.tick_count();
    for star in ocean.stars().iter() {
        let color = Color {
            a: star.brightness(tick) * STAR_ALPHA,
            ..WHITE
        };
        draw_circle(star.pos.x, star.pos.y, star.size, color);
    }
}

fn draw_fishes(ocean: &Ocean) {
    for fish in ocean.fish().iter() {
        draw_trail(fish);
        let color = Color {
            a: FISH_ALPHA,
            ..fish.color
        };
        let outline = fish.outline(ocean.noise(), ocean.tick_count());
        draw_closed_shape(&outline, FISH_STROKE, color);
    }
}

fn draw_trail(fish: &Fish) {
    let points: Vec<Vec2> = fish.trail().chain(std::iter::once(fish.pos)).collect();
    let segments = points.len().saturating_sub(1).max(1) as f32;
    for (index, pair) in points.windows(2).enumerate() {
        let fade = (index + 1) as f32 / segments;
        let color = Color {
            a: TRAIL_ALPHA * fade,
            ..fish.color
        };
        draw_line(pair[0].x, pair[0].y, pair[1].x, pair[1].y, FISH_STROKE * fade, color);
    }
}

fn draw_closed_shape(points: &[Vec2], thickness: f32, color: Color) {
    for (index, start) in points.iter().enumerate() {
        let end = points[(index + 1) % points.len()];
        draw_line(start.x, start.y, end.x, end.y, thickness, color);
    }
}

fn draw_band(band: &WaveBand) {
    let glow = Color {
        a: band.color.a * GLOW_ALPHA,
        ..band.color
    };
    draw_polyline(&band.points, band.thickness * GLOW_WIDTH, glow);
    draw_polyline(&band.points, band.thickness, band.color);
}

fn draw_polyline(points: &[Vec2], thickness: f32, color: Color) {
    for pair in points.windows(2) {
        draw_line(pair[0].x, pair[0].y, pair[1].x, pair[1].y, thickness, color);
    }
}

fn draw_label(label: &str, height: f32) {
    if label.is_empty() {
        return;
    }
    draw_text(
        label,
        LABEL_MARGIN_PX,
        height - LABEL_MARGIN_PX,
        LABEL_FONT_SIZE as f32,
        LABEL_COLOR,
    );
}
