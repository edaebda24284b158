use keypiano_keyboard::Note;
use std::collections::HashSet;

/// The set of notes which are currently sounding.
#[derive(Debug, Clone, Default)]
pub struct ActiveNotes(HashSet<Note>);

impl ActiveNotes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, note: Note) -> bool {
        self.0.contains(&note)
    }

    /// Returns false if the note was already active.
    pub fn insert(&mut self, note: Note) -> bool {
        self.0.insert(note)
    }

    /// Returns false if the note wasn't active.
    pub fn remove(&mut self, note: Note) -> bool {
        self.0.remove(&note)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Empties the set, returning its former contents in pitch order.
    pub fn drain_sorted(&mut self) -> Vec<Note> {
        let mut notes = self.0.drain().collect::<Vec<_>>();
        notes.sort();
        notes
    }
}
