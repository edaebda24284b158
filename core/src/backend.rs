use keypiano_keyboard::Note;
use midly::num::{u4, u7};

/// Something that makes sound. Calls return as soon as the request has been handed off. They
/// don't wait for the sound to start or stop.
pub trait SoundBackend {
    fn start(&mut self, note: Note, velocity: u7) -> anyhow::Result<()>;

    /// Stopping a note which isn't playing has no effect.
    fn stop(&mut self, note: Note) -> anyhow::Result<()>;

    /// Select the timbre of notes subsequently started on `channel`. Notes which are already
    /// sounding are unaffected.
    fn set_program(&mut self, channel: u4, program: u7) -> anyhow::Result<()>;
}

impl<B: SoundBackend + ?Sized> SoundBackend for Box<B> {
    fn start(&mut self, note: Note, velocity: u7) -> anyhow::Result<()> {
        (**self).start(note, velocity)
    }

    fn stop(&mut self, note: Note) -> anyhow::Result<()> {
        (**self).stop(note)
    }

    fn set_program(&mut self, channel: u4, program: u7) -> anyhow::Result<()> {
        (**self).set_program(channel, program)
    }
}

/// A backend that makes no sound. Used when no audio device is available so the piano can still
/// be played visually.
#[derive(Debug, Default)]
pub struct SilentBackend;

impl SoundBackend for SilentBackend {
    fn start(&mut self, note: Note, velocity: u7) -> anyhow::Result<()> {
        log::debug!("(silent) start {} velocity {}", note, velocity.as_int());
        Ok(())
    }

    fn stop(&mut self, note: Note) -> anyhow::Result<()> {
        log::debug!("(silent) stop {}", note);
        Ok(())
    }

    fn set_program(&mut self, channel: u4, program: u7) -> anyhow::Result<()> {
        log::debug!(
            "(silent) channel {} program {}",
            channel.as_int(),
            program.as_int()
        );
        Ok(())
    }
}
