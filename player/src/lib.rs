//! Plays the piano through the default audio output device using a small built-in synthesizer.

mod engine;
mod timbre;

pub use engine::{NUM_VOICES, SynthCommand, SynthEngine};
pub use timbre::{Adsr, Timbre, Waveform};

use cpal::{
    BufferSize, Device, OutputCallbackInfo, StreamConfig, SupportedBufferSize,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use keypiano_core::SoundBackend;
use keypiano_keyboard::Note;
use midly::num::{u4, u7};
use std::sync::mpsc;

#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// default: 0.01
    pub target_latency_s: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_latency_s: 0.01,
        }
    }
}

pub struct Player {
    device: Device,
}

impl Player {
    pub fn new() -> anyhow::Result<Self> {
        let host = cpal::default_host();
        log::info!("cpal host: {}", host.id().name());
        let device = host
            .default_output_device()
            .ok_or(anyhow::anyhow!("no output device"))?;
        if let Ok(name) = device.name() {
            log::info!("cpal device: {}", name);
        } else {
            log::info!("cpal device: (no name)");
        }
        Ok(Self { device })
    }

    fn choose_config(&self, config: Config) -> anyhow::Result<StreamConfig> {
        let default_config = self.device.default_output_config()?;
        let sample_rate = default_config.sample_rate();
        let channels = default_config.channels();
        let ideal_buffer_size =
            (sample_rate.0 as f32 * config.target_latency_s) as u32;
        // Round down to a multiple of 4. It's not clear why this is necessary but alsa complains
        // if the buffer size is not evenly divisible by 4.
        let ideal_buffer_size = ideal_buffer_size & (!3);
        let buffer_size = match default_config.buffer_size() {
            SupportedBufferSize::Range { min, max } => {
                BufferSize::Fixed(ideal_buffer_size.clamp(*min, *max))
            }
            SupportedBufferSize::Unknown => BufferSize::Default,
        };
        Ok(StreamConfig {
            channels,
            sample_rate,
            buffer_size,
        })
    }

    /// Start an output stream driven by a `SynthEngine`. The returned `Synth` sends it commands
    /// and keeps the stream alive until dropped.
    pub fn start_synth(&self, config: Config) -> anyhow::Result<Synth> {
        let config = self.choose_config(config)?;
        log::info!("sample rate: {}", config.sample_rate.0);
        log::info!("num channels: {}", config.channels);
        log::info!("buffer size: {:?}", config.buffer_size);
        let (sender, receiver) = mpsc::channel::<SynthCommand>();
        let mut engine = SynthEngine::new(config.sample_rate.0 as f32);
        let num_channels = config.channels as usize;
        let stream = self.device.build_output_stream(
            &config,
            move |data: &mut [f32], _: &OutputCallbackInfo| {
                while let Ok(command) = receiver.try_recv() {
                    engine.handle(command);
                }
                engine.render(data, num_channels);
            },
            |err| log::error!("stream error: {}", err),
            None,
        )?;
        stream.play()?;
        Ok(Synth {
            sender,
            channel: u4::from_int_lossy(0),
            _stream: stream,
        })
    }
}

/// Sound backend that plays notes with the built-in synthesizer. Commands are queued for the
/// audio thread and take effect at the start of the next audio buffer.
pub struct Synth {
    sender: mpsc::Sender<SynthCommand>,
    channel: u4,
    _stream: cpal::Stream,
}

impl Synth {
    fn send(&self, command: SynthCommand) -> anyhow::Result<()> {
        self.sender
            .send(command)
            .map_err(|_| anyhow::anyhow!("audio thread has stopped"))
    }
}

impl SoundBackend for Synth {
    fn start(&mut self, note: Note, velocity: u7) -> anyhow::Result<()> {
        self.send(SynthCommand::NoteOn { note, velocity })
    }

    fn stop(&mut self, note: Note) -> anyhow::Result<()> {
        self.send(SynthCommand::NoteOff { note })
    }

    fn set_program(&mut self, channel: u4, program: u7) -> anyhow::Result<()> {
        if channel != self.channel {
            log::debug!(
                "ignoring program change on channel {}",
                channel.as_int()
            );
            return Ok(());
        }
        self.send(SynthCommand::ProgramChange { program })
    }
}
