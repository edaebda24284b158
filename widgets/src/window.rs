use crate::font::{Font, load_font};
use anyhow::anyhow;
use sdl2::{
    EventPump,
    event::Event,
    pixels::Color,
    rect::Rect,
    render::{Canvas, TextureCreator},
    video::{Window as SdlWindow, WindowContext},
};
use std::{
    path::Path,
    thread,
    time::{Duration, Instant},
};

const FRAME_DURATION: Duration = Duration::from_micros(1_000_000 / 60);

const FONT_PT_SIZE: u16 = 16;

pub struct Window {
    pub canvas: Canvas<SdlWindow>,
    event_pump: EventPump,
    font: Option<Font<'static, 'static>>,
    texture_creator: TextureCreator<WindowContext>,
    pub prev_tick_complete: Instant,
}

impl Window {
    /// Text is only drawn if a font is given and can be loaded.
    pub fn new(
        title: &str,
        width_px: u32,
        height_px: u32,
        font_path: Option<&Path>,
    ) -> anyhow::Result<Self> {
        let sdl_context = sdl2::init().map_err(|e| anyhow!(e))?;
        let video_subsystem = sdl_context.video().map_err(|e| anyhow!(e))?;
        let window = video_subsystem
            .window(title, width_px, height_px)
            .position_centered()
            .build()?;
        let canvas = window
            .into_canvas()
            .target_texture()
            .present_vsync()
            .build()?;
        let texture_creator = canvas.texture_creator();
        let event_pump = sdl_context.event_pump().map_err(|e| anyhow!(e))?;
        let font = match font_path {
            Some(path) => match load_font(path, FONT_PT_SIZE) {
                Ok(font) => Some(font),
                Err(e) => {
                    log::warn!(
                        "Failed to load font, keys will be unlabelled: {e}"
                    );
                    None
                }
            },
            None => {
                log::info!("no font given, keys will be unlabelled");
                None
            }
        };
        Ok(Self {
            canvas,
            event_pump,
            font,
            texture_creator,
            prev_tick_complete: Instant::now(),
        })
    }

    pub fn wait_until_next_frame(&self) {
        if let Some(period_to_sleep) = (self.prev_tick_complete
            + FRAME_DURATION)
            .checked_duration_since(Instant::now())
        {
            thread::sleep(period_to_sleep);
        }
    }

    pub fn poll_events(&mut self) -> Vec<Event> {
        self.event_pump.poll_iter().collect()
    }

    /// Draws `text` horizontally centred on `centre_x` with its bottom edge at `bottom_y`.
    /// Returns the height of the text, or 0 if there is no font.
    pub fn render_text(
        &mut self,
        text: &str,
        colour: Color,
        centre_x: i32,
        bottom_y: i32,
    ) -> anyhow::Result<u32> {
        let Some(font) = self.font.as_ref() else {
            return Ok(0);
        };
        let text_surface = font
            .render(text)
            .blended(colour)
            .map_err(|e| anyhow!("{e}"))?;
        let text_texture = text_surface.as_texture(&self.texture_creator)?;
        let query = text_texture.query();
        let text_rect = Rect::new(
            centre_x - (query.width as i32 / 2),
            bottom_y - query.height as i32,
            query.width,
            query.height,
        );
        self.canvas
            .copy(&text_texture, None, Some(text_rect))
            .map_err(|e| anyhow!("{e}"))?;
        Ok(query.height)
    }
}
