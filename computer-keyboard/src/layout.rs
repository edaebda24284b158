//! Positions of the piano keys on screen. White keys sit side by side in a row. Black keys are
//! narrower and shorter and straddle the boundary between two white keys, except where a real
//! piano has no sharp (after E and after B).
use crate::{KeyNoteMapping, Registry};
use keypiano_keyboard::Note;

const WHITE_KEYS_PER_OCTAVE: usize = 7;

/// Positions within an octave of white keys (starting on C) which have no black key to their
/// right.
const SKIP_SLOTS_IN_OCTAVE: [usize; 2] = [2, 6];

/// Returns true if there is no black key between white key `slot` and white key `slot + 1`.
pub fn is_skip_slot(slot: usize) -> bool {
    SKIP_SLOTS_IN_OCTAVE.contains(&(slot % WHITE_KEYS_PER_OCTAVE))
}

/// Indices of the white keys which have a black key immediately to their right, for a row of
/// `num_white_keys` white keys starting on C.
pub fn black_key_slots(num_white_keys: usize) -> impl Iterator<Item = usize> {
    (0..num_white_keys.saturating_sub(1)).filter(|&slot| !is_skip_slot(slot))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x
            && y >= self.y
            && x < self.x + self.width as i32
            && y < self.y + self.height as i32
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LayoutConfig {
    /// default: 60
    pub white_key_width_px: u32,
    /// default: 180
    pub white_key_height_px: u32,
    /// default: 45
    pub black_key_width_px: u32,
    /// default: 120
    pub black_key_height_px: u32,
    /// Distance from the left edge of a white key to the left edge of the black key to its
    /// right. default: 38
    pub black_key_offset_px: i32,
    /// Vertical position of the top of the keys. default: 0
    pub top_px: i32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            white_key_width_px: 60,
            white_key_height_px: 180,
            black_key_width_px: 45,
            black_key_height_px: 120,
            black_key_offset_px: 38,
            top_px: 0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PlacedKey {
    pub mapping: &'static KeyNoteMapping,
    pub rect: Rect,
}

#[derive(Debug, Clone)]
pub struct PianoLayout {
    white_keys: Vec<PlacedKey>,
    black_keys: Vec<PlacedKey>,
    width_px: u32,
    height_px: u32,
}

impl PianoLayout {
    pub fn new(registry: &Registry, config: LayoutConfig) -> Self {
        let white_keys = registry
            .white_keys()
            .enumerate()
            .map(|(i, mapping)| PlacedKey {
                mapping,
                rect: Rect {
                    x: i as i32 * config.white_key_width_px as i32,
                    y: config.top_px,
                    width: config.white_key_width_px,
                    height: config.white_key_height_px,
                },
            })
            .collect::<Vec<_>>();
        let mut black_keys = Vec::new();
        let mut black_mappings = registry.black_keys();
        for slot in black_key_slots(white_keys.len()) {
            let Some(mapping) = black_mappings.next() else {
                break;
            };
            black_keys.push(PlacedKey {
                mapping,
                rect: Rect {
                    x: slot as i32 * config.white_key_width_px as i32
                        + config.black_key_offset_px,
                    y: config.top_px,
                    width: config.black_key_width_px,
                    height: config.black_key_height_px,
                },
            });
        }
        let num_unplaced = black_mappings.count();
        if num_unplaced > 0 {
            log::warn!("{} black keys have no room on the piano", num_unplaced);
        }
        let width_px = white_keys.len() as u32 * config.white_key_width_px;
        let height_px = config.white_key_height_px;
        Self {
            white_keys,
            black_keys,
            width_px,
            height_px,
        }
    }

    pub fn white_keys(&self) -> &[PlacedKey] {
        &self.white_keys
    }

    pub fn black_keys(&self) -> &[PlacedKey] {
        &self.black_keys
    }

    /// Total width of the row of keys
    pub fn width_px(&self) -> u32 {
        self.width_px
    }

    /// Height of the row of keys, not including `LayoutConfig::top_px`
    pub fn height_px(&self) -> u32 {
        self.height_px
    }

    /// Black keys are drawn over white keys so they are checked first.
    pub fn key_at(&self, x: i32, y: i32) -> Option<&PlacedKey> {
        self.black_keys
            .iter()
            .chain(self.white_keys.iter())
            .find(|placed| placed.rect.contains(x, y))
    }

    pub fn note_at(&self, x: i32, y: i32) -> Option<Note> {
        self.key_at(x, y).map(|placed| placed.mapping.note)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Key;

    #[test]
    fn skip_slots_follow_octave_pattern() {
        let skipped = (0..23)
            .filter(|&slot| is_skip_slot(slot))
            .collect::<Vec<_>>();
        assert_eq!(skipped, vec![2, 6, 9, 13, 16, 20]);
    }

    #[test]
    fn every_black_key_is_placed() {
        let layout =
            PianoLayout::new(&Registry::new(), LayoutConfig::default());
        assert_eq!(layout.white_keys().len(), 25);
        assert_eq!(layout.black_keys().len(), 17);
        assert_eq!(layout.width_px(), 25 * 60);
    }

    #[test]
    fn black_keys_are_a_semitone_above_their_slot() {
        let config = LayoutConfig::default();
        let layout = PianoLayout::new(&Registry::new(), config);
        for black in layout.black_keys() {
            let slot = ((black.rect.x - config.black_key_offset_px)
                / config.white_key_width_px as i32) as usize;
            let white = layout.white_keys()[slot];
            assert_eq!(
                white.mapping.note.add_semitones_checked(1),
                Some(black.mapping.note),
                "{:?} next to {:?}",
                black.mapping.key,
                white.mapping.key,
            );
        }
    }

    #[test]
    fn default_geometry() {
        let layout =
            PianoLayout::new(&Registry::new(), LayoutConfig::default());
        let first_black = layout.black_keys()[0];
        assert_eq!(first_black.mapping.key, Key::N1);
        assert_eq!(
            first_black.rect,
            Rect {
                x: 38,
                y: 0,
                width: 45,
                height: 120
            }
        );
        // the third black key skips over the E/F boundary
        assert_eq!(layout.black_keys()[2].rect.x, 3 * 60 + 38);
    }

    #[test]
    fn hit_test_prefers_black_keys() {
        let config = LayoutConfig {
            top_px: 40,
            ..LayoutConfig::default()
        };
        let layout = PianoLayout::new(&Registry::new(), config);
        let tab = Note::from_midi_index(24).unwrap();
        let c_sharp = Note::from_midi_index(25).unwrap();
        // overlap of the TAB white key and the 1 black key
        assert_eq!(layout.note_at(50, 60), Some(c_sharp));
        // below the black key
        assert_eq!(layout.note_at(50, 200), Some(tab));
        // instrument bar area
        assert_eq!(layout.note_at(50, 10), None);
        // past the last key
        assert_eq!(layout.note_at(25 * 60 + 1, 100), None);
    }
}
