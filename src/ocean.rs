use log::debug;

use crate::chords::{ChordClassifier, ChordState};
use crate::config::FISH_MIN_PITCH;
use crate::midi::{ChannelRole, MidiMessage, NoteAction};
use crate::noise::CoherentNoise;
use crate::notes::NoteSet;
use crate::particles::{FishVariant, ParticleField};
use crate::scene::{SceneState, Viewport, target_color};
use crate::stars::Starfield;
use crate::waves::WaveRenderer;

pub struct Ocean {
    piano: NoteSet,
    pad: NoteSet,
    pad_chord: ChordState,
    classifier: ChordClassifier,
    scene: SceneState,
    fish: ParticleField,
    stars: Starfield,
    waves: WaveRenderer,
    viewport: Viewport,
    tick: u64,
}

impl Ocean {
    pub fn new(viewport: Viewport, noise: CoherentNoise) -> Self {
        Self {
            piano: NoteSet::new(),
            pad: NoteSet::new(),
            pad_chord: ChordState::default(),
            classifier: ChordClassifier::new(),
            scene: SceneState::new(),
            fish: ParticleField::new(),
            stars: Starfield::new(viewport),
            waves: WaveRenderer::new(noise),
            viewport,
            tick: 0,
        }
    }

    pub fn handle(&mut self, message: MidiMessage) {
        let MidiMessage {
            role,
            action,
            event,
        } = message;
        let notes = match role {
            ChannelRole::Piano => &mut self.piano,
            ChannelRole::Pad => &mut self.pad,
        };
        match action {
            NoteAction::On => notes.add(event.id, event.velocity),
            NoteAction::Off => notes.remove(event.id),
        }
        self.update_music();

        if role == ChannelRole::Piano
            && action == NoteAction::On
            && spawns_fish(event.pitch, FISH_MIN_PITCH)
        {
            let variant = if event.accidental.is_some() {
                FishVariant::Sharp
            } else {
                FishVariant::Round
            };
            self.fish.spawn(
                event.pitch,
                self.scene.color_display(),
                event.velocity,
                variant,
                self.viewport,
            );
            debug!("fish from {} ({} live)", event.id, self.fish.len());
        }
    }

    fn update_music(&mut self) {
        let chord = self.classifier.classify(&self.pad.active_identifiers());
        let label = chord.as_ref().map(|c| c.label.as_str());
        if self.pad_chord.observe(label) {
            debug!(
                "chord -> {} (pad velocity {:.2})",
                self.pad_chord.current(),
                self.pad.mean_velocity()
            );
            self.scene.chord_changed();
        }
        self.scene.color_target = target_color(chord.map(|c| c.quality));
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.stars.regenerate(viewport);
        debug!("{} stars regenerated for {}x{}", self.stars.len(), viewport.width, viewport.height);
    }

    // Fish physics runs on even ticks only.
    pub fn tick(&mut self) {
        self.scene.ease(self.pad.len());
        if self.tick % 2 == 0 && !self.fish.is_empty() {
            let deaths = self
                .fish
                .advance(self.viewport.horizon_y(), &mut self.scene.splash);
            if deaths > 0 {
                debug!("{deaths} fish dove back in");
            }
        }
        self.fish.reap();
        self.tick += 1;
    }

    pub fn scene(&self) -> &SceneState {
        &self.scene
    }

    pub fn fish(&self) -> &ParticleField {
        &self.fish
    }

    pub fn stars(&self) -> &Starfield {
        &self.stars
    }

    pub fn waves(&self) -> &WaveRenderer {
        &self.waves
    }

    pub fn noise(&self) -> &CoherentNoise {
        self.waves.noise()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn chord_label(&self) -> &str {
        self.pad_chord.current()
    }
}

fn spawns_fish(pitch: u8, min_pitch: u8) -> bool {
    pitch >= min_pitch
}
