use std::fmt;

use crate::config::MIN_CHORD_NOTES;
use crate::notes::{NoteId, PitchClass};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChordQuality {
    Major,
    Minor,
    Other,
}

impl ChordQuality {
    pub fn from_label(label: &str) -> Self {
        if label.contains("Major") {
            ChordQuality::Major
        } else if label.contains("Minor") {
            ChordQuality::Minor
        } else {
            ChordQuality::Other
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChordKind {
    Major,
    Minor,
    Diminished,
    Augmented,
    Sus2,
    Sus4,
    Major6,
    Minor6,
    Dominant7,
    Major7,
    Minor7,
    HalfDiminished7,
    Diminished7,
    MinorMajor7,
    SevenSus4,
    Add9,
}

impl ChordKind {
    pub fn label(&self) -> &'static str {
        match self {
            ChordKind::Major => "Major",
            ChordKind::Minor => "Minor",
            ChordKind::Diminished => "Diminished",
            ChordKind::Augmented => "Augmented",
            ChordKind::Sus2 => "Sus2",
            ChordKind::Sus4 => "Sus4",
            ChordKind::Major6 => "Major 6th",
            ChordKind::Minor6 => "Minor 6th",
            ChordKind::Dominant7 => "Dominant 7th",
            ChordKind::Major7 => "Major 7th",
            ChordKind::Minor7 => "Minor 7th",
            ChordKind::HalfDiminished7 => "Half-Diminished 7th",
            ChordKind::Diminished7 => "Diminished 7th",
            // "Major" would pull this into the major colour
            ChordKind::MinorMajor7 => "Minor Maj7",
            ChordKind::SevenSus4 => "7th Sus4",
            ChordKind::Add9 => "Add9",
        }
    }
}

// Intervals above the root. Order decides rank when one root fits several.
const CHORD_TEMPLATES: [(ChordKind, &[u8]); 16] = [
    (ChordKind::Major, &[0, 4, 7]),
    (ChordKind::Minor, &[0, 3, 7]),
    (ChordKind::Diminished, &[0, 3, 6]),
    (ChordKind::Augmented, &[0, 4, 8]),
    (ChordKind::Sus4, &[0, 5, 7]),
    (ChordKind::Sus2, &[0, 2, 7]),
    (ChordKind::Dominant7, &[0, 4, 7, 10]),
    (ChordKind::Major7, &[0, 4, 7, 11]),
    (ChordKind::Minor7, &[0, 3, 7, 10]),
    (ChordKind::Major6, &[0, 4, 7, 9]),
    (ChordKind::Minor6, &[0, 3, 7, 9]),
    (ChordKind::HalfDiminished7, &[0, 3, 6, 10]),
    (ChordKind::Diminished7, &[0, 3, 6, 9]),
    (ChordKind::MinorMajor7, &[0, 3, 7, 11]),
    (ChordKind::SevenSus4, &[0, 5, 7, 10]),
    (ChordKind::Add9, &[0, 2, 4, 7]),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChordCandidate {
    pub root: PitchClass,
    pub kind: ChordKind,
    pub bass: Option<PitchClass>,
}

impl ChordCandidate {
    pub fn bass_note(&self) -> PitchClass {
        self.bass.unwrap_or(self.root)
    }

    fn rebased(self, bass: PitchClass) -> Self {
        Self {
            bass: (bass != self.root).then_some(bass),
            ..self
        }
    }
}

impl fmt::Display for ChordCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.root, self.kind.label())?;
        if let Some(bass) = self.bass {
            write!(f, "/{bass}")?;
        }
        Ok(())
    }
}

pub trait ChordDetector {
    // Candidates ordered by confidence; `notes[0]` is the bass.
    fn detect(&self, notes: &[PitchClass]) -> Vec<ChordCandidate>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TemplateDetector;

impl ChordDetector for TemplateDetector {
    fn detect(&self, notes: &[PitchClass]) -> Vec<ChordCandidate> {
        let Some(&bass) = notes.first() else {
            return Vec::new();
        };
        let mut unique: Vec<PitchClass> = Vec::with_capacity(notes.len());
        for &pc in notes {
            if !unique.contains(&pc) {
                unique.push(pc);
            }
        }

        let mut candidates = Vec::new();
        for &root in &unique {
            let mask = unique
                .iter()
                .fold(0u16, |acc, pc| acc | 1 << pc.interval_from(root));
            for (kind, template) in CHORD_TEMPLATES.iter() {
                if mask == template_mask(template) {
                    candidates.push(ChordCandidate {
                        root,
                        kind: *kind,
                        bass: (root != bass).then_some(bass),
                    });
                }
            }
        }
        // Root position outranks inversions; the sort is stable.
        candidates.sort_by_key(|candidate| candidate.bass.is_some());
        candidates
    }
}

fn template_mask(intervals: &[u8]) -> u16 {
    intervals.iter().fold(0u16, |acc, i| acc | 1 << i)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chord {
    pub label: String,
    pub quality: ChordQuality,
}

impl Chord {
    fn from_candidate(candidate: ChordCandidate) -> Self {
        let label = candidate.to_string();
        let quality = ChordQuality::from_label(&label);
        Self { label, quality }
    }
}

pub struct ChordClassifier<D = TemplateDetector> {
    detector: D,
}

impl ChordClassifier<TemplateDetector> {
    pub fn new() -> Self {
        Self::with_detector(TemplateDetector)
    }
}

impl<D: ChordDetector> ChordClassifier<D> {
    pub fn with_detector(detector: D) -> Self {
        Self { detector }
    }

    pub fn classify(&self, notes: &[NoteId]) -> Option<Chord> {
        if notes.len() < MIN_CHORD_NOTES {
            return None;
        }
        let mut voicing = notes.to_vec();
        voicing.sort_by_key(|n| n.midi());
        let pitch_classes: Vec<PitchClass> = voicing.iter().map(|n| n.pitch_class).collect();
        let candidates = self.detector.detect(&pitch_classes);
        let top = *candidates.first()?;
        let lowest = pitch_classes[0];

        if top.bass_note() != lowest {
            if let Some(rooted) = candidates.iter().find(|c| c.root == lowest) {
                return Some(Chord::from_candidate(rooted.rebased(lowest)));
            }
        }
        Some(Chord::from_candidate(top))
    }
}

impl Default for ChordClassifier<TemplateDetector> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug, Default)]
pub struct ChordState {
    current: String,
    last: String,
}

impl ChordState {
    // Silence clears the memory so the same chord fires again afterwards.
    pub fn observe(&mut self, label: Option<&str>) -> bool {
        match label {
            Some(label) => {
                let changed = label != self.last;
                if changed {
                    self.last = label.to_owned();
                }
                self.current.clear();
                self.current.push_str(label);
                changed
            }
            None => {
                self.current.clear();
                self.last.clear();
                false
            }
        }
    }

    pub fn current(&self) -> &str {
        &self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notes(numbers: &[u8]) -> Vec<NoteId> {
        numbers.iter().map(|&n| NoteId::from_midi(n)).collect()
    }

    fn pcs(values: &[u8]) -> Vec<PitchClass> {
        values.iter().map(|&v| PitchClass::new(v)).collect()
    }

    #[test]
    fn detector_names_root_position_first() {
        let candidates = TemplateDetector.detect(&pcs(&[0, 4, 7]));
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].to_string(), "C Major");
    }

    #[test]
    fn detector_reports_inversions_with_slash() {
        let candidates = TemplateDetector.detect(&pcs(&[4, 7, 0]));
        assert_eq!(candidates[0].to_string(), "C Major/E");
    }

    #[test]
    fn detector_ranks_root_position_above_inversion() {
        // C E G A is both C6 and Am7/C
        let candidates = TemplateDetector.detect(&pcs(&[0, 4, 7, 9]));
        assert_eq!(candidates[0].to_string(), "C Major 6th");
        assert_eq!(candidates[1].to_string(), "A Minor 7th/C");
    }

    #[test]
    fn detector_finds_nothing_for_clusters() {
        assert!(TemplateDetector.detect(&pcs(&[0, 1, 2])).is_empty());
        assert!(TemplateDetector.detect(&[]).is_empty());
    }

    #[test]
    fn fewer_than_three_notes_is_silent() {
        let classifier = ChordClassifier::new();
        assert_eq!(classifier.classify(&notes(&[])), None);
        assert_eq!(classifier.classify(&notes(&[60])), None);
        assert_eq!(classifier.classify(&notes(&[60, 67])), None);
        assert_eq!(classifier.classify(&notes(&[60, 64])), None);
    }

    #[test]
    fn c_major_triad_is_major() {
        let classifier = ChordClassifier::new();
        // C3 E3 G3 in every arrival order
        for order in [[48, 52, 55], [52, 55, 48], [55, 48, 52]] {
            let chord = classifier.classify(&notes(&order)).expect("chord");
            assert_eq!(chord.label, "C Major");
            assert_eq!(chord.quality, ChordQuality::Major);
        }
    }

    #[test]
    fn c_minor_triad_is_minor() {
        let classifier = ChordClassifier::new();
        let chord = classifier.classify(&notes(&[51, 55, 48])).expect("chord");
        assert_eq!(chord.label, "C Minor");
        assert_eq!(chord.quality, ChordQuality::Minor);
    }

    #[test]
    fn inversion_names_the_lowest_note_whatever_the_order() {
        let classifier = ChordClassifier::new();
        // E3 G3 C4
        for order in [[60, 52, 55], [52, 55, 60], [55, 60, 52]] {
            let chord = classifier.classify(&notes(&order)).expect("chord");
            assert_eq!(chord.label, "C Major/E");
            assert_eq!(chord.quality, ChordQuality::Major);
        }
        let doubled = classifier.classify(&notes(&[72, 55, 60, 52])).expect("chord");
        assert_eq!(doubled.label, "C Major/E");
    }

    #[test]
    fn lowest_note_picks_among_ambiguous_candidates() {
        let classifier = ChordClassifier::new();
        // A2 C3 E3 G3 arriving C first still reads as Am7, not C6
        let chord = classifier.classify(&notes(&[48, 52, 55, 45])).expect("chord");
        assert_eq!(chord.label, "A Minor 7th");
        assert_eq!(chord.quality, ChordQuality::Minor);
    }

    #[test]
    fn unmatched_sets_give_no_chord() {
        let classifier = ChordClassifier::new();
        assert_eq!(classifier.classify(&notes(&[60, 61, 62])), None);
        // three notes but only two pitch classes
        assert_eq!(classifier.classify(&notes(&[48, 60, 55])), None);
    }

    #[test]
    fn quality_follows_label_text() {
        assert_eq!(ChordQuality::from_label("G Major 7th"), ChordQuality::Major);
        assert_eq!(ChordQuality::from_label("D Minor Maj7"), ChordQuality::Minor);
        assert_eq!(ChordQuality::from_label("G Dominant 7th"), ChordQuality::Other);
        assert_eq!(ChordQuality::from_label(""), ChordQuality::Other);
    }

    struct Fixed(Vec<ChordCandidate>);

    impl ChordDetector for Fixed {
        fn detect(&self, _notes: &[PitchClass]) -> Vec<ChordCandidate> {
            self.0.clone()
        }
    }

    #[test]
    fn classifier_accepts_other_detectors() {
        let classifier = ChordClassifier::with_detector(Fixed(vec![ChordCandidate {
            root: PitchClass::new(2),
            kind: ChordKind::Sus4,
            bass: None,
        }]));
        let chord = classifier.classify(&notes(&[50, 55, 57])).expect("chord");
        assert_eq!(chord.label, "D Sus4");
        assert_eq!(chord.quality, ChordQuality::Other);

        let silent = ChordClassifier::with_detector(Fixed(Vec::new()));
        assert_eq!(silent.classify(&notes(&[50, 55, 57])), None);
    }

    #[test]
    fn chord_state_fires_on_edges_only() {
        let mut state = ChordState::default();
        assert!(state.observe(Some("C Major")));
        assert!(!state.observe(Some("C Major")));
        assert!(state.observe(Some("A Minor")));
        assert_eq!(state.current(), "A Minor");

        assert!(!state.observe(None));
        assert_eq!(state.current(), "");
        assert!(state.observe(Some("A Minor")));
    }
}
