use keypiano_core::{
    PlaybackController, SoundBackend, instrument_by_program,
};
use keypiano_keyboard::Note;
use keypiano_sdl2::sdl2_scancode_to_key;
use keypiano_widgets::{PianoWidget, Window};
use midly::num::u7;
use sdl2::{
    event::{Event, WindowEvent},
    mouse::MouseButton,
};
use std::{path::Path, time::Instant};

/// Owns everything and routes SDL events to the controller. All of this
/// happens on the main thread.
pub struct PianoApp<B: SoundBackend> {
    window: Window,
    piano: PianoWidget,
    controller: PlaybackController<B>,
    /// The note under the pointer when the button was pressed. Released when
    /// the button comes up, wherever the pointer is by then.
    pointer_note: Option<Note>,
}

impl<B: SoundBackend> PianoApp<B> {
    pub fn new(
        controller: PlaybackController<B>,
        title: &str,
        font_path: Option<&Path>,
        program: u7,
    ) -> anyhow::Result<Self> {
        let piano = PianoWidget::new(controller.registry());
        let window =
            Window::new(title, piano.width_px(), piano.height_px(), font_path)?;
        let mut app = Self {
            window,
            piano,
            controller,
            pointer_note: None,
        };
        app.select_instrument(program);
        Ok(app)
    }

    fn select_instrument(&mut self, program: u7) {
        match instrument_by_program(program) {
            Some(instrument) => log::info!("instrument: {}", instrument.name),
            None => log::info!("instrument: program {}", program.as_int()),
        }
        self.controller.select_instrument(program);
        self.piano.set_selected_program(program);
    }

    /// Returns false when the app should exit.
    fn handle_event(&mut self, event: Event) -> bool {
        match event {
            Event::Quit { .. } => {
                self.controller.release_all(&mut self.piano);
                return false;
            }
            Event::Window {
                win_event: WindowEvent::FocusLost,
                ..
            } => {
                // key-up events for keys held now will go to another window
                self.controller.release_all(&mut self.piano);
                self.pointer_note = None;
            }
            Event::KeyDown {
                scancode: Some(scancode),
                ..
            } => {
                if let Some(key) = sdl2_scancode_to_key(scancode) {
                    self.controller.on_press(key, &mut self.piano);
                }
            }
            Event::KeyUp {
                scancode: Some(scancode),
                ..
            } => {
                if let Some(key) = sdl2_scancode_to_key(scancode) {
                    self.controller.on_release(key, &mut self.piano);
                }
            }
            Event::MouseButtonDown {
                mouse_btn: MouseButton::Left,
                x,
                y,
                ..
            } => {
                if let Some(note) = self.piano.note_at(x, y) {
                    self.controller.on_pointer_down(note, &mut self.piano);
                    self.pointer_note = Some(note);
                } else if let Some(instrument) = self.piano.instrument_at(x, y)
                {
                    self.select_instrument(instrument.program);
                }
            }
            Event::MouseButtonUp {
                mouse_btn: MouseButton::Left,
                ..
            } => {
                if let Some(note) = self.pointer_note.take() {
                    self.controller.on_pointer_up(note, &mut self.piano);
                }
            }
            _ => (),
        }
        true
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        loop {
            self.window.wait_until_next_frame();
            for event in self.window.poll_events() {
                if !self.handle_event(event) {
                    return Ok(());
                }
            }
            self.piano.render(&mut self.window)?;
            self.window.prev_tick_complete = Instant::now();
        }
    }
}
