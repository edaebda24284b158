use crate::{ActiveNotes, KeyDisplay, KeyShade, SoundBackend};
use keypiano_computer_keyboard::{Key, KeyNoteMapping, Registry};
use keypiano_keyboard::Note;
use midly::num::{u4, u7};

/// Every note is started with this velocity.
pub const VELOCITY: u7 = u7::from_int_lossy(80);

/// All notes are played on this channel.
pub const CHANNEL: u4 = u4::from_int_lossy(0);

/// Turns key and pointer events into calls to a `SoundBackend`. A note is only started if it
/// isn't already sounding, so holding down a key (which makes the OS send repeated key-down
/// events) plays the note once. Releasing always stops the note.
///
/// Failed backend calls are logged and otherwise ignored. The set of active notes is updated
/// regardless so that what's shown on screen matches what the player is doing.
pub struct PlaybackController<B> {
    registry: Registry,
    backend: B,
    active_notes: ActiveNotes,
    program: u7,
}

impl<B: SoundBackend> PlaybackController<B> {
    pub fn new(registry: Registry, backend: B) -> Self {
        Self {
            registry,
            backend,
            active_notes: ActiveNotes::new(),
            program: u7::from_int_lossy(0),
        }
    }

    pub fn on_press<D: KeyDisplay + ?Sized>(
        &mut self,
        key: Key,
        display: &mut D,
    ) {
        if let Some(mapping) = self.registry.lookup_key(key) {
            self.press(mapping, display);
        }
    }

    pub fn on_release<D: KeyDisplay + ?Sized>(
        &mut self,
        key: Key,
        display: &mut D,
    ) {
        if let Some(mapping) = self.registry.lookup_key(key) {
            self.release(mapping, display);
        }
    }

    pub fn on_pointer_down<D: KeyDisplay + ?Sized>(
        &mut self,
        note: Note,
        display: &mut D,
    ) {
        match self.registry.lookup_note(note) {
            Some(mapping) => self.press(mapping, display),
            None => log::debug!("no piano key for {}", note),
        }
    }

    pub fn on_pointer_up<D: KeyDisplay + ?Sized>(
        &mut self,
        note: Note,
        display: &mut D,
    ) {
        match self.registry.lookup_note(note) {
            Some(mapping) => self.release(mapping, display),
            None => log::debug!("no piano key for {}", note),
        }
    }

    /// Change the timbre of notes started from now on.
    pub fn select_instrument(&mut self, program: u7) {
        self.program = program;
        log::info!("selecting program {}", program.as_int());
        if let Err(e) = self.backend.set_program(CHANNEL, program) {
            log::warn!(
                "Failed to select program {}: {}",
                program.as_int(),
                e
            );
        }
    }

    /// Stop every sounding note. Needed when key-up events stop arriving, such as when the window
    /// loses focus.
    pub fn release_all<D: KeyDisplay + ?Sized>(&mut self, display: &mut D) {
        for note in self.active_notes.drain_sorted() {
            self.stop_note(note);
            if let Some(mapping) = self.registry.lookup_note(note) {
                display.shade_key(note, KeyShade::Resting(mapping.colour));
            }
        }
    }

    fn press<D: KeyDisplay + ?Sized>(
        &mut self,
        mapping: &KeyNoteMapping,
        display: &mut D,
    ) {
        let note = mapping.note;
        if self.active_notes.contains(note) {
            return;
        }
        log::debug!("start {} ({})", note, mapping.display_label);
        if let Err(e) = self.backend.start(note, VELOCITY) {
            log::warn!("Failed to start {}: {}", note, e);
        }
        self.active_notes.insert(note);
        display.shade_key(note, KeyShade::Pressed);
    }

    fn release<D: KeyDisplay + ?Sized>(
        &mut self,
        mapping: &KeyNoteMapping,
        display: &mut D,
    ) {
        let note = mapping.note;
        log::debug!("stop {} ({})", note, mapping.display_label);
        self.stop_note(note);
        self.active_notes.remove(note);
        display.shade_key(note, KeyShade::Resting(mapping.colour));
    }

    fn stop_note(&mut self, note: Note) {
        if let Err(e) = self.backend.stop(note) {
            log::warn!("Failed to stop {}: {}", note, e);
        }
    }

    pub fn is_active(&self, note: Note) -> bool {
        self.active_notes.contains(note)
    }

    pub fn active_notes(&self) -> &ActiveNotes {
        &self.active_notes
    }

    pub fn program(&self) -> u7 {
        self.program
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use keypiano_computer_keyboard::{KEY_NOTE_TABLE, KeyColour};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Call {
        Start { note: u8, velocity: u8, program: u8 },
        Stop { note: u8 },
        SetProgram { channel: u8, program: u8 },
    }

    /// Remembers every call. The current program is tracked the way a synthesizer would so tests
    /// can check which program each note was started with.
    #[derive(Default)]
    struct RecordingBackend {
        calls: Vec<Call>,
        program: u8,
        fail: bool,
    }

    impl RecordingBackend {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        fn result(&self) -> anyhow::Result<()> {
            if self.fail {
                anyhow::bail!("device unavailable")
            } else {
                Ok(())
            }
        }

        fn starts(&self) -> usize {
            self.calls
                .iter()
                .filter(|c| matches!(c, Call::Start { .. }))
                .count()
        }
    }

    impl SoundBackend for RecordingBackend {
        fn start(&mut self, note: Note, velocity: u7) -> anyhow::Result<()> {
            self.calls.push(Call::Start {
                note: note.to_midi_index(),
                velocity: velocity.as_int(),
                program: self.program,
            });
            self.result()
        }

        fn stop(&mut self, note: Note) -> anyhow::Result<()> {
            self.calls.push(Call::Stop {
                note: note.to_midi_index(),
            });
            self.result()
        }

        fn set_program(
            &mut self,
            channel: u4,
            program: u7,
        ) -> anyhow::Result<()> {
            self.calls.push(Call::SetProgram {
                channel: channel.as_int(),
                program: program.as_int(),
            });
            self.program = program.as_int();
            self.result()
        }
    }

    #[derive(Default)]
    struct RecordingDisplay(Vec<(u8, KeyShade)>);

    impl KeyDisplay for RecordingDisplay {
        fn shade_key(&mut self, note: Note, shade: KeyShade) {
            self.0.push((note.to_midi_index(), shade));
        }
    }

    fn controller() -> PlaybackController<RecordingBackend> {
        PlaybackController::new(Registry::new(), RecordingBackend::default())
    }

    fn note(midi_index: u8) -> Note {
        Note::from_midi_index(midi_index).unwrap()
    }

    #[test]
    fn press_and_release_q() {
        let mut c = controller();
        let mut display = RecordingDisplay::default();
        c.on_press(Key::Q, &mut display);
        assert_eq!(
            c.backend().calls,
            vec![Call::Start {
                note: 26,
                velocity: 80,
                program: 0
            }]
        );
        assert!(c.is_active(note(26)));
        assert_eq!(c.active_notes().len(), 1);
        c.on_release(Key::Q, &mut display);
        assert_eq!(c.backend().calls[1..], [Call::Stop { note: 26 }]);
        assert!(c.active_notes().is_empty());
        assert_eq!(
            display.0,
            vec![
                (26, KeyShade::Pressed),
                (26, KeyShade::Resting(KeyColour::White))
            ]
        );
    }

    #[test]
    fn key_repeat_starts_tab_once() {
        let mut c = controller();
        for _ in 0..10 {
            c.on_press(Key::Tab, &mut ());
        }
        assert_eq!(c.backend().starts(), 1);
        assert_eq!(
            c.backend().calls[0],
            Call::Start {
                note: 24,
                velocity: 80,
                program: 0
            }
        );
    }

    #[test]
    fn every_mapped_key_starts_once_then_stops() {
        for mapping in KEY_NOTE_TABLE.iter() {
            let mut c = controller();
            let midi_index = mapping.note.to_midi_index();
            c.on_press(mapping.key, &mut ());
            c.on_press(mapping.key, &mut ());
            c.on_release(mapping.key, &mut ());
            assert_eq!(
                c.backend().calls,
                vec![
                    Call::Start {
                        note: midi_index,
                        velocity: 80,
                        program: 0
                    },
                    Call::Stop { note: midi_index }
                ],
                "{:?}",
                mapping.key
            );
            assert!(!c.is_active(mapping.note));
        }
    }

    #[test]
    fn unmapped_keys_do_nothing() {
        let mut c = controller();
        let mut display = RecordingDisplay::default();
        for key in Key::ALL {
            if c.registry().lookup_key(key).is_none() {
                c.on_press(key, &mut display);
                c.on_release(key, &mut display);
            }
        }
        assert!(c.backend().calls.is_empty());
        assert!(c.active_notes().is_empty());
        assert!(display.0.is_empty());
    }

    #[test]
    fn release_without_press_still_stops() {
        let mut c = controller();
        let mut display = RecordingDisplay::default();
        c.on_release(Key::N1, &mut display);
        assert_eq!(c.backend().calls, vec![Call::Stop { note: 25 }]);
        assert!(c.active_notes().is_empty());
        assert_eq!(display.0, vec![(25, KeyShade::Resting(KeyColour::Black))]);
    }

    #[test]
    fn release_only_affects_its_own_note() {
        let mut c = controller();
        c.on_press(Key::Q, &mut ());
        c.on_press(Key::W, &mut ());
        c.on_release(Key::Q, &mut ());
        assert!(!c.is_active(note(26)));
        assert!(c.is_active(note(28)));
    }

    #[test]
    fn selected_program_applies_to_later_notes() {
        let mut c = controller();
        c.on_press(Key::Q, &mut ());
        c.select_instrument(u7::from_int_lossy(40));
        c.on_press(Key::W, &mut ());
        assert_eq!(c.program(), u7::from_int_lossy(40));
        assert_eq!(
            c.backend().calls,
            vec![
                Call::Start {
                    note: 26,
                    velocity: 80,
                    program: 0
                },
                Call::SetProgram {
                    channel: 0,
                    program: 40
                },
                Call::Start {
                    note: 28,
                    velocity: 80,
                    program: 40
                },
            ]
        );
        // the note started before the change is still sounding
        assert!(c.is_active(note(26)));
    }

    #[test]
    fn pointer_events_address_notes() {
        let mut c = controller();
        let mut display = RecordingDisplay::default();
        c.on_pointer_down(note(49), &mut display);
        c.on_pointer_down(note(49), &mut display);
        assert_eq!(c.backend().starts(), 1);
        assert!(c.is_active(note(49)));
        c.on_pointer_up(note(49), &mut display);
        assert!(c.active_notes().is_empty());
        assert_eq!(
            display.0,
            vec![
                (49, KeyShade::Pressed),
                (49, KeyShade::Resting(KeyColour::Black))
            ]
        );
    }

    #[test]
    fn pointer_and_keyboard_share_state() {
        let mut c = controller();
        c.on_press(Key::A, &mut ());
        c.on_pointer_down(note(49), &mut ());
        assert_eq!(c.backend().starts(), 1);
        c.on_pointer_up(note(49), &mut ());
        assert!(!c.is_active(note(49)));
    }

    #[test]
    fn pointer_on_unmapped_note_does_nothing() {
        let mut c = controller();
        c.on_pointer_down(note(100), &mut ());
        c.on_pointer_up(note(100), &mut ());
        assert!(c.backend().calls.is_empty());
        assert!(c.active_notes().is_empty());
    }

    #[test]
    fn backend_failures_keep_state() {
        let mut c = PlaybackController::new(
            Registry::new(),
            RecordingBackend::failing(),
        );
        let mut display = RecordingDisplay::default();
        c.on_press(Key::Q, &mut display);
        assert!(c.is_active(note(26)));
        c.on_press(Key::Q, &mut display);
        assert_eq!(c.backend().starts(), 1);
        c.select_instrument(u7::from_int_lossy(56));
        assert_eq!(c.program(), u7::from_int_lossy(56));
        c.on_release(Key::Q, &mut display);
        assert!(c.active_notes().is_empty());
        assert_eq!(display.0.len(), 2);
    }

    #[test]
    fn release_all_stops_each_active_note_once() {
        let mut c = controller();
        let mut display = RecordingDisplay::default();
        c.on_press(Key::M, &mut display);
        c.on_press(Key::Tab, &mut display);
        c.on_press(Key::L, &mut display);
        c.release_all(&mut display);
        assert!(c.active_notes().is_empty());
        assert_eq!(
            c.backend().calls[3..],
            [
                Call::Stop { note: 24 },
                Call::Stop { note: 60 },
                Call::Stop { note: 63 }
            ]
        );
        assert_eq!(
            display.0[3..],
            [
                (24, KeyShade::Resting(KeyColour::White)),
                (60, KeyShade::Resting(KeyColour::White)),
                (63, KeyShade::Resting(KeyColour::Black)),
            ]
        );
        c.release_all(&mut display);
        assert_eq!(c.backend().calls.len(), 6);
    }
}
