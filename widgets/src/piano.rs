use crate::window::Window;
use anyhow::anyhow;
use keypiano_computer_keyboard::{
    KeyColour, LayoutConfig, PianoLayout, PlacedKey, Rect as KeyRect, Registry,
};
use keypiano_core::{INSTRUMENTS, Instrument, KeyDisplay, KeyShade};
use keypiano_keyboard::Note;
use midly::num::u7;
use sdl2::{pixels::Color, rect::Rect};
use std::collections::HashMap;

pub const INSTRUMENT_BAR_HEIGHT_PX: u32 = 40;

const PRESSED: Color = Color::RGB(0, 255, 0);
const OUTLINE: Color = Color::RGB(96, 96, 96);
const BACKGROUND: Color = Color::RGB(64, 64, 64);
const BUTTON: Color = Color::RGB(220, 220, 220);
const BUTTON_SELECTED: Color = Color::RGB(160, 200, 255);
const LABEL_PADDING_PX: i32 = 6;

fn resting_colour(colour: KeyColour) -> Color {
    match colour {
        KeyColour::White => Color::WHITE,
        KeyColour::Black => Color::BLACK,
    }
}

fn label_colour(colour: KeyColour) -> Color {
    match colour {
        KeyColour::White => Color::BLACK,
        KeyColour::Black => Color::WHITE,
    }
}

fn sdl_rect(rect: KeyRect) -> Rect {
    Rect::new(rect.x, rect.y, rect.width, rect.height)
}

pub struct InstrumentButton {
    pub instrument: &'static Instrument,
    pub rect: KeyRect,
}

/// A row of instrument buttons above a two-octave piano. Each key is shown in its resting colour
/// until told otherwise through `KeyDisplay`.
pub struct PianoWidget {
    layout: PianoLayout,
    buttons: Vec<InstrumentButton>,
    shades: HashMap<Note, KeyShade>,
    selected_program: u7,
}

impl PianoWidget {
    pub fn new(registry: &Registry) -> Self {
        let layout = PianoLayout::new(
            registry,
            LayoutConfig {
                top_px: INSTRUMENT_BAR_HEIGHT_PX as i32,
                ..LayoutConfig::default()
            },
        );
        let button_width_px = layout.width_px() / INSTRUMENTS.len() as u32;
        let buttons = INSTRUMENTS
            .iter()
            .enumerate()
            .map(|(i, instrument)| InstrumentButton {
                instrument,
                rect: KeyRect {
                    x: (i as u32 * button_width_px) as i32,
                    y: 0,
                    width: button_width_px,
                    height: INSTRUMENT_BAR_HEIGHT_PX,
                },
            })
            .collect();
        Self {
            layout,
            buttons,
            shades: HashMap::new(),
            selected_program: u7::from_int_lossy(0),
        }
    }

    pub fn width_px(&self) -> u32 {
        self.layout.width_px()
    }

    pub fn height_px(&self) -> u32 {
        INSTRUMENT_BAR_HEIGHT_PX + self.layout.height_px()
    }

    pub fn note_at(&self, x: i32, y: i32) -> Option<Note> {
        self.layout.note_at(x, y)
    }

    pub fn instrument_at(&self, x: i32, y: i32) -> Option<&'static Instrument> {
        self.buttons
            .iter()
            .find(|button| button.rect.contains(x, y))
            .map(|button| button.instrument)
    }

    pub fn set_selected_program(&mut self, program: u7) {
        self.selected_program = program;
    }

    fn fill_colour(&self, placed: &PlacedKey) -> Color {
        match self.shades.get(&placed.mapping.note) {
            Some(KeyShade::Pressed) => PRESSED,
            Some(KeyShade::Resting(colour)) => resting_colour(*colour),
            None => resting_colour(placed.mapping.colour),
        }
    }

    fn render_key(
        &self,
        window: &mut Window,
        placed: &PlacedKey,
    ) -> anyhow::Result<()> {
        let rect = sdl_rect(placed.rect);
        window.canvas.set_draw_color(self.fill_colour(placed));
        window.canvas.fill_rect(rect).map_err(|e| anyhow!("{e}"))?;
        window.canvas.set_draw_color(OUTLINE);
        window.canvas.draw_rect(rect).map_err(|e| anyhow!("{e}"))?;
        let colour = label_colour(placed.mapping.colour);
        let centre_x = rect.center().x();
        let bottom_y = rect.bottom() - LABEL_PADDING_PX;
        let height = window.render_text(
            &placed.mapping.piano_label(),
            colour,
            centre_x,
            bottom_y,
        )?;
        window.render_text(
            placed.mapping.display_label,
            colour,
            centre_x,
            bottom_y - height as i32,
        )?;
        Ok(())
    }

    fn render_button(
        &self,
        window: &mut Window,
        button: &InstrumentButton,
    ) -> anyhow::Result<()> {
        let rect = sdl_rect(button.rect);
        let fill = if button.instrument.program == self.selected_program {
            BUTTON_SELECTED
        } else {
            BUTTON
        };
        window.canvas.set_draw_color(fill);
        window.canvas.fill_rect(rect).map_err(|e| anyhow!("{e}"))?;
        window.canvas.set_draw_color(OUTLINE);
        window.canvas.draw_rect(rect).map_err(|e| anyhow!("{e}"))?;
        window.render_text(
            button.instrument.name,
            Color::BLACK,
            rect.center().x(),
            rect.bottom() - 10,
        )?;
        Ok(())
    }

    pub fn render(&self, window: &mut Window) -> anyhow::Result<()> {
        window.canvas.set_draw_color(BACKGROUND);
        window.canvas.clear();
        for button in self.buttons.iter() {
            self.render_button(window, button)?;
        }
        for placed in self.layout.white_keys() {
            self.render_key(window, placed)?;
        }
        // black keys go on top
        for placed in self.layout.black_keys() {
            self.render_key(window, placed)?;
        }
        window.canvas.present();
        Ok(())
    }
}

impl KeyDisplay for PianoWidget {
    fn shade_key(&mut self, note: Note, shade: KeyShade) {
        self.shades.insert(note, shade);
    }
}
