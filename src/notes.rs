use std::collections::{HashMap, HashSet};
use std::fmt;

const MIDI_MAX: u8 = 127;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PitchClass(u8);

impl PitchClass {
    const NAMES: [&'static str; 12] = [
        "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
    ];

    pub fn new(value: u8) -> Self {
        Self(value % 12)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_accidental(self) -> bool {
        matches!(self.0, 1 | 3 | 6 | 8 | 10)
    }

    pub fn interval_from(self, root: PitchClass) -> u8 {
        (self.0 + 12 - root.0) % 12
    }

    pub fn name(self) -> &'static str {
        Self::NAMES[self.0 as usize]
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Accidental {
    Sharp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NoteId {
    pub pitch_class: PitchClass,
    pub octave: i8,
}

impl NoteId {
    pub fn new(pitch_class: PitchClass, octave: i8) -> Self {
        Self {
            pitch_class,
            octave,
        }
    }

    // MIDI 60 is C4.
    pub fn from_midi(number: u8) -> Self {
        let number = number.min(MIDI_MAX);
        Self::new(PitchClass::new(number), (number / 12) as i8 - 1)
    }

    pub fn midi(self) -> i32 {
        (self.octave as i32 + 1) * 12 + self.pitch_class.value() as i32
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.pitch_class, self.octave)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoteEvent {
    pub id: NoteId,
    pub pitch: u8,
    pub velocity: f32,
    pub accidental: Option<Accidental>,
}

impl NoteEvent {
    pub fn from_midi(number: i32, velocity: f32) -> Self {
        let pitch = number.clamp(0, MIDI_MAX as i32) as u8;
        let velocity = if velocity.is_nan() {
            0.0
        } else {
            velocity.clamp(0.0, 1.0)
        };
        let id = NoteId::from_midi(pitch);
        let accidental = id.pitch_class.is_accidental().then_some(Accidental::Sharp);
        Self {
            id,
            pitch,
            velocity,
            accidental,
        }
    }
}

#[derive(Debug, Default)]
pub struct NoteSet {
    active: HashSet<NoteId>,
    velocities: HashMap<NoteId, f32>,
    mean_velocity: f32,
}

impl NoteSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, id: NoteId, velocity: f32) {
        self.active.insert(id);
        self.velocities.insert(id, velocity);
        self.update_velocity();
    }

    pub fn remove(&mut self, id: NoteId) {
        if self.active.remove(&id) {
            self.velocities.remove(&id);
            self.update_velocity();
        }
    }

    pub fn active_identifiers(&self) -> Vec<NoteId> {
        self.active.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn mean_velocity(&self) -> f32 {
        self.mean_velocity
    }

    fn update_velocity(&mut self) {
        if self.velocities.is_empty() {
            self.mean_velocity = 0.0;
            return;
        }
        let sum: f32 = self.velocities.values().sum();
        self.mean_velocity = sum / self.velocities.len() as f32;
    }
}
