//! 12-tone equal temperament following the A_440Hz convention. Only allows representation of MIDI
//! notes. The frequency of A_4 (the A above middle C) is 440Hz. C_4 is considered to be middle C
//! (MIDI index 60). C is considered the first note in each octave.
use std::fmt::Display;

/// Octaves go from -1 to 8. MIDI notes run on into a partial 9th octave which
/// stops at G_9 (MIDI index 127).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Octave {
    /// To make the math easier octaves are represented by the index of the first note of the
    /// octave (c) divided by 12. This means that the first octave, named octave "-1" in MIDI
    /// parlance, has representation "0".
    c_midi_index_divided_by_notes_per_octave: u8,
}

impl Octave {
    const MIN_OCTAVE: i8 = -1;
    const MAX_OCTAVE: i8 = 8;

    const fn from_index(i: i8) -> Self {
        assert!(i >= Self::MIN_OCTAVE && i <= Self::MAX_OCTAVE);
        Self {
            c_midi_index_divided_by_notes_per_octave: (i + 1) as u8,
        }
    }

    pub const fn to_index(self) -> i8 {
        self.c_midi_index_divided_by_notes_per_octave as i8 - 1
    }

    /// Returns the index of the C note in this octave.
    const fn c_midi_index(self) -> u8 {
        self.c_midi_index_divided_by_notes_per_octave * NOTES_PER_OCTAVE
    }

    pub const _MINUS_1: Self = Self::from_index(-1);
    pub const _0: Self = Self::from_index(0);
    pub const _1: Self = Self::from_index(1);
    pub const _2: Self = Self::from_index(2);
    pub const _3: Self = Self::from_index(3);
    pub const _4: Self = Self::from_index(4);
    pub const _5: Self = Self::from_index(5);
    pub const _6: Self = Self::from_index(6);
    pub const _7: Self = Self::from_index(7);
    pub const _8: Self = Self::from_index(8);
}

pub const OCTAVE_MINUS_1: Octave = Octave::_MINUS_1;
pub const OCTAVE_0: Octave = Octave::_0;
pub const OCTAVE_1: Octave = Octave::_1;
pub const OCTAVE_2: Octave = Octave::_2;
pub const OCTAVE_3: Octave = Octave::_3;
pub const OCTAVE_4: Octave = Octave::_4;
pub const OCTAVE_5: Octave = Octave::_5;
pub const OCTAVE_6: Octave = Octave::_6;
pub const OCTAVE_7: Octave = Octave::_7;
pub const OCTAVE_8: Octave = Octave::_8;

/// A note without an octave
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct NoteName {
    relative_midi_index: u8,
}

const NOTES_PER_OCTAVE: u8 = 12;
const MAX_MIDI_INDEX: u8 = 127;

impl NoteName {
    const fn from_index(relative_midi_index: u8) -> Self {
        assert!(relative_midi_index < NOTES_PER_OCTAVE);
        Self {
            relative_midi_index,
        }
    }

    pub const C: Self = Self::from_index(0);
    pub const C_SHARP: Self = Self::from_index(1);
    pub const D_FLAT: Self = Self::C_SHARP;
    pub const D: Self = Self::from_index(2);
    pub const D_SHARP: Self = Self::from_index(3);
    pub const E_FLAT: Self = Self::D_SHARP;
    pub const E: Self = Self::from_index(4);
    pub const F: Self = Self::from_index(5);
    pub const F_SHARP: Self = Self::from_index(6);
    pub const G_FLAT: Self = Self::F_SHARP;
    pub const G: Self = Self::from_index(7);
    pub const G_SHARP: Self = Self::from_index(8);
    pub const A_FLAT: Self = Self::G_SHARP;
    pub const A: Self = Self::from_index(9);
    pub const A_SHARP: Self = Self::from_index(10);
    pub const B_FLAT: Self = Self::A_SHARP;
    pub const B: Self = Self::from_index(11);

    /// Returns a str representation of the note name where all accidentals are sharp, formatted
    /// the way they are printed on piano keys, like "C" or "C#"
    pub const fn to_str_sharp(self) -> &'static str {
        match self.relative_midi_index {
            0 => "C",
            1 => "C#",
            2 => "D",
            3 => "D#",
            4 => "E",
            5 => "F",
            6 => "F#",
            7 => "G",
            8 => "G#",
            9 => "A",
            10 => "A#",
            11 => "B",
            _ => unreachable!(),
        }
    }

    /// Natural notes are the white keys of a piano. The rest are sharps/flats (black keys).
    pub const fn is_natural(self) -> bool {
        !matches!(self.relative_midi_index, 1 | 3 | 6 | 8 | 10)
    }
}

/// Duplicated from `NoteName` so it's possible to bring all note names into scope by using this
/// module.
pub mod note_name {
    pub use super::NoteName;
    pub const C: NoteName = NoteName::C;
    pub const C_SHARP: NoteName = NoteName::C_SHARP;
    pub const D_FLAT: NoteName = NoteName::C_SHARP;
    pub const D: NoteName = NoteName::D;
    pub const D_SHARP: NoteName = NoteName::D_SHARP;
    pub const E_FLAT: NoteName = NoteName::D_SHARP;
    pub const E: NoteName = NoteName::E;
    pub const F: NoteName = NoteName::F;
    pub const F_SHARP: NoteName = NoteName::F_SHARP;
    pub const G_FLAT: NoteName = NoteName::F_SHARP;
    pub const G: NoteName = NoteName::G;
    pub const G_SHARP: NoteName = NoteName::G_SHARP;
    pub const A_FLAT: NoteName = NoteName::G_SHARP;
    pub const A: NoteName = NoteName::A;
    pub const A_SHARP: NoteName = NoteName::A_SHARP;
    pub const B_FLAT: NoteName = NoteName::A_SHARP;
    pub const B: NoteName = NoteName::B;
}

const A_4_FREQ_HZ: f32 = 440.0;
const A_4_MIDI_INDEX: u8 = 69;

pub fn freq_hz_of_midi_index(midi_index: u8) -> f32 {
    A_4_FREQ_HZ
        * (2_f32.powf(
            (midi_index as f32 - A_4_MIDI_INDEX as f32)
                / (NOTES_PER_OCTAVE as f32),
        ))
}

/// Definition of notes based on MIDI tuned to A_440
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Note {
    midi_index: u8,
}

impl Note {
    pub const fn new(name: NoteName, octave: Octave) -> Self {
        Self {
            midi_index: octave.c_midi_index() + name.relative_midi_index,
        }
    }

    pub const fn to_midi_index(self) -> u8 {
        self.midi_index
    }

    pub fn freq_hz(self) -> f32 {
        freq_hz_of_midi_index(self.to_midi_index())
    }

    /// Returns `None` for indices above 127.
    pub const fn from_midi_index(midi_index: u8) -> Option<Self> {
        if midi_index > MAX_MIDI_INDEX {
            None
        } else {
            Some(Self { midi_index })
        }
    }

    pub const fn octave(self) -> Octave {
        Octave {
            c_midi_index_divided_by_notes_per_octave: self.midi_index
                / NOTES_PER_OCTAVE,
        }
    }

    pub const fn note_name(self) -> NoteName {
        NoteName::from_index(self.midi_index % NOTES_PER_OCTAVE)
    }

    pub const fn is_natural(self) -> bool {
        self.note_name().is_natural()
    }

    pub const fn add_semitones_checked(
        self,
        num_semitones: i16,
    ) -> Option<Self> {
        let midi_index = self.midi_index as i16 + num_semitones;
        if midi_index < 0 || midi_index > MAX_MIDI_INDEX as i16 {
            None
        } else {
            Some(Self {
                midi_index: midi_index as u8,
            })
        }
    }

    /// The label printed on a piano key for this note, like "C4" or "F#2".
    pub fn piano_label(self) -> String {
        format!(
            "{}{}",
            self.note_name().to_str_sharp(),
            self.octave().to_index()
        )
    }
}

/// Example formats: "C#:4", "C:4". Notes in octave "-1" are written like "C#:-1".
impl Display for Note {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}",
            self.note_name().to_str_sharp(),
            self.octave().to_index()
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn octave_round_trip() {
        assert_eq!(Note::new(note_name::C, OCTAVE_0).octave(), OCTAVE_0);
    }

    #[test]
    fn note_name_round_trip() {
        assert_eq!(Note::new(note_name::D, OCTAVE_3).note_name(), note_name::D);
    }

    #[test]
    fn middle_c_midi_index() {
        assert_eq!(Note::new(note_name::C, OCTAVE_4).to_midi_index(), 60);
        assert_eq!(Note::new(note_name::C, OCTAVE_1).to_midi_index(), 24);
    }

    #[test]
    fn a_4_is_440_hz() {
        let a_4 = Note::new(note_name::A, OCTAVE_4);
        assert!((a_4.freq_hz() - 440.0).abs() < 0.001);
        let a_5 = Note::new(note_name::A, OCTAVE_5);
        assert!((a_5.freq_hz() - 880.0).abs() < 0.01);
    }

    #[test]
    fn sharps_are_not_natural() {
        let naturals = (0..12)
            .filter(|&i| Note::from_midi_index(i).unwrap().is_natural())
            .count();
        assert_eq!(naturals, 7);
        assert!(!Note::new(note_name::F_SHARP, OCTAVE_2).is_natural());
        assert!(Note::new(note_name::B, OCTAVE_2).is_natural());
    }

    #[test]
    fn piano_labels() {
        assert_eq!(Note::new(note_name::C, OCTAVE_1).piano_label(), "C1");
        assert_eq!(
            Note::new(note_name::A_SHARP, OCTAVE_2).piano_label(),
            "A#2"
        );
        assert_eq!(Note::new(note_name::G, OCTAVE_MINUS_1).to_string(), "G:-1");
    }

    #[test]
    fn midi_index_bounds() {
        assert_eq!(Note::from_midi_index(0).unwrap().octave(), OCTAVE_MINUS_1);
        assert!(Note::from_midi_index(127).is_some());
        assert!(Note::from_midi_index(128).is_none());
        let top = Note::from_midi_index(127).unwrap();
        assert_eq!(top.add_semitones_checked(1), None);
        assert_eq!(top.octave().to_index(), 9);
        assert_eq!(top.note_name(), note_name::G);
        assert_eq!(OCTAVE_8.to_index(), 8);
    }
}
