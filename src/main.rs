mod chords;
mod config;
mod midi;
mod noise;
mod notes;
mod ocean;
mod particles;
mod render;
mod scene;
mod stars;
mod waves;

use anyhow::Result;
use log::{error, info, warn};
use macroquad::prelude::*;
use tokio::sync::mpsc::unbounded_channel;

use config::{MidiBinding, WINDOW_HEIGHT, WINDOW_WIDTH};
use midi::MidiInputs;
use noise::CoherentNoise;
use ocean::Ocean;
use render::Renderer;
use scene::Viewport;

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(err) = run().await {
        error!("midi-ocean stopped: {err:#}");
    }
}

fn window_conf() -> Conf {
    Conf {
        window_title: "MIDI Ocean".into(),
        fullscreen: false,
        sample_count: 1,
        window_width: WINDOW_WIDTH,
        window_height: WINDOW_HEIGHT,
        window_resizable: true,
        high_dpi: false,
        ..Default::default()
    }
}

async fn run() -> Result<()> {
    let (sender, mut messages) = unbounded_channel();
    let _midi = match MidiInputs::connect(&MidiBinding::from_env(), sender) {
        Ok(inputs) => inputs,
        Err(err) => {
            warn!("MIDI unavailable, scene will idle: {err:#}");
            None
        }
    };

    let viewport = current_viewport();
    let mut ocean = Ocean::new(viewport, CoherentNoise::new());
    let mut renderer = Renderer::new(viewport)?;
    info!("ocean ready at {}x{}", viewport.width, viewport.height);

    loop {
        // Events are applied whole, one at a time, before the tick.
        while let Ok(message) = messages.try_recv() {
            ocean.handle(message);
        }

        let viewport = current_viewport();
        if viewport != ocean.viewport() {
            ocean.resize(viewport);
            renderer.resize(viewport);
        }

        ocean.tick();
        renderer.draw(&ocean);

        next_frame().await;
    }
}

fn current_viewport() -> Viewport {
    Viewport::new(screen_width(), screen_height())
}
