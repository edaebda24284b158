use crate::Key;
use itertools::Itertools;
use keypiano_keyboard::{
    Note, NoteName, OCTAVE_1, OCTAVE_2, OCTAVE_3, OCTAVE_4, Octave,
    note_name::*,
};
use std::collections::HashMap;

/// Whether a piano key is drawn white or black. Derived from whether the note is natural.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyColour {
    White,
    Black,
}

/// Associates a key on the computer keyboard with a note on the piano.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyNoteMapping {
    pub key: Key,
    pub note: Note,
    /// Printed on the piano key so the player knows which computer key to press
    pub display_label: &'static str,
    pub colour: KeyColour,
}

impl KeyNoteMapping {
    const fn new(
        key: Key,
        name: NoteName,
        octave: Octave,
        display_label: &'static str,
    ) -> Self {
        let note = Note::new(name, octave);
        let colour = if note.is_natural() {
            KeyColour::White
        } else {
            KeyColour::Black
        };
        Self {
            key,
            note,
            display_label,
            colour,
        }
    }

    pub fn is_white_key(&self) -> bool {
        self.colour == KeyColour::White
    }

    /// The name of the note, like "C1" or "F#2"
    pub fn piano_label(&self) -> String {
        self.note.piano_label()
    }
}

pub const NUM_WHITE_KEYS: usize = 25;
pub const NUM_BLACK_KEYS: usize = 17;

/// Every mapped key. White keys come first, in pitch order, followed by the black keys in pitch
/// order.
pub static KEY_NOTE_TABLE: [KeyNoteMapping; NUM_WHITE_KEYS + NUM_BLACK_KEYS] = [
    KeyNoteMapping::new(Key::Tab, C, OCTAVE_1, "TAB"),
    KeyNoteMapping::new(Key::Q, D, OCTAVE_1, "Q"),
    KeyNoteMapping::new(Key::W, E, OCTAVE_1, "W"),
    KeyNoteMapping::new(Key::E, F, OCTAVE_1, "E"),
    KeyNoteMapping::new(Key::R, G, OCTAVE_1, "R"),
    KeyNoteMapping::new(Key::T, A, OCTAVE_1, "T"),
    KeyNoteMapping::new(Key::Y, B, OCTAVE_1, "Y"),
    KeyNoteMapping::new(Key::U, C, OCTAVE_2, "U"),
    KeyNoteMapping::new(Key::I, D, OCTAVE_2, "I"),
    KeyNoteMapping::new(Key::O, E, OCTAVE_2, "O"),
    KeyNoteMapping::new(Key::P, F, OCTAVE_2, "P"),
    KeyNoteMapping::new(Key::LeftBracket, G, OCTAVE_2, "["),
    KeyNoteMapping::new(Key::RightBracket, A, OCTAVE_2, "]"),
    KeyNoteMapping::new(Key::Enter, B, OCTAVE_2, "↵"),
    KeyNoteMapping::new(Key::Backslash, C, OCTAVE_3, "\\"),
    KeyNoteMapping::new(Key::Z, D, OCTAVE_3, "Z"),
    KeyNoteMapping::new(Key::X, E, OCTAVE_3, "X"),
    KeyNoteMapping::new(Key::C, F, OCTAVE_3, "C"),
    KeyNoteMapping::new(Key::V, G, OCTAVE_3, "V"),
    KeyNoteMapping::new(Key::B, A, OCTAVE_3, "B"),
    KeyNoteMapping::new(Key::N, B, OCTAVE_3, "N"),
    KeyNoteMapping::new(Key::M, C, OCTAVE_4, "M"),
    KeyNoteMapping::new(Key::Comma, D, OCTAVE_4, ","),
    KeyNoteMapping::new(Key::Period, E, OCTAVE_4, "."),
    KeyNoteMapping::new(Key::Slash, F, OCTAVE_4, "/"),
    KeyNoteMapping::new(Key::N1, C_SHARP, OCTAVE_1, "1"),
    KeyNoteMapping::new(Key::N2, D_SHARP, OCTAVE_1, "2"),
    KeyNoteMapping::new(Key::N4, F_SHARP, OCTAVE_1, "4"),
    KeyNoteMapping::new(Key::N5, G_SHARP, OCTAVE_1, "5"),
    KeyNoteMapping::new(Key::N6, A_SHARP, OCTAVE_1, "6"),
    KeyNoteMapping::new(Key::N8, C_SHARP, OCTAVE_2, "8"),
    KeyNoteMapping::new(Key::N9, D_SHARP, OCTAVE_2, "9"),
    KeyNoteMapping::new(Key::Minus, F_SHARP, OCTAVE_2, "-"),
    KeyNoteMapping::new(Key::Equals, G_SHARP, OCTAVE_2, "="),
    KeyNoteMapping::new(Key::Backspace, A_SHARP, OCTAVE_2, "←"),
    KeyNoteMapping::new(Key::A, C_SHARP, OCTAVE_3, "A"),
    KeyNoteMapping::new(Key::S, D_SHARP, OCTAVE_3, "S"),
    KeyNoteMapping::new(Key::F, F_SHARP, OCTAVE_3, "F"),
    KeyNoteMapping::new(Key::G, G_SHARP, OCTAVE_3, "G"),
    KeyNoteMapping::new(Key::H, A_SHARP, OCTAVE_3, "H"),
    KeyNoteMapping::new(Key::K, C_SHARP, OCTAVE_4, "K"),
    KeyNoteMapping::new(Key::L, D_SHARP, OCTAVE_4, "L"),
];

/// Lookup structure over `KEY_NOTE_TABLE`. Built once at startup and never modified.
#[derive(Debug, Clone)]
pub struct Registry {
    by_key: HashMap<Key, usize>,
    by_note: HashMap<Note, usize>,
}

impl Registry {
    pub fn new() -> Self {
        debug_assert!(KEY_NOTE_TABLE.iter().map(|m| m.key).all_unique());
        debug_assert!(KEY_NOTE_TABLE.iter().map(|m| m.note).all_unique());
        let by_key = KEY_NOTE_TABLE
            .iter()
            .enumerate()
            .map(|(i, mapping)| (mapping.key, i))
            .collect();
        let by_note = KEY_NOTE_TABLE
            .iter()
            .enumerate()
            .map(|(i, mapping)| (mapping.note, i))
            .collect();
        log::debug!("{} keys mapped to notes", KEY_NOTE_TABLE.len());
        Self { by_key, by_note }
    }

    /// Returns `None` for keys that don't play a note.
    pub fn lookup_key(&self, key: Key) -> Option<&'static KeyNoteMapping> {
        self.by_key.get(&key).map(|&i| &KEY_NOTE_TABLE[i])
    }

    pub fn lookup_note(&self, note: Note) -> Option<&'static KeyNoteMapping> {
        self.by_note.get(&note).map(|&i| &KEY_NOTE_TABLE[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static KeyNoteMapping> {
        KEY_NOTE_TABLE.iter()
    }

    pub fn white_keys(&self) -> impl Iterator<Item = &'static KeyNoteMapping> {
        self.iter().filter(|m| m.is_white_key())
    }

    pub fn black_keys(&self) -> impl Iterator<Item = &'static KeyNoteMapping> {
        self.iter().filter(|m| !m.is_white_key())
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
