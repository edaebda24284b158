use clap::{Parser, ValueEnum};
use keypiano_computer_keyboard::Registry;
use keypiano_core::{PlaybackController, SilentBackend, SoundBackend};
use keypiano_midi::MidiBackend;
use keypiano_player::{Config, Player};
use midly::num::u7;
use std::path::PathBuf;

mod piano_app;

use piano_app::PianoApp;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Backend {
    /// Built-in synthesizer on the default audio output device
    Synth,
    /// External synthesizer connected to a midi output port
    Midi,
    /// No sound
    Silent,
}

#[derive(Parser)]
#[command(name = "keypiano")]
#[command(
    about = "Play a piano with the computer keyboard and mouse. The QWERTY and ZXCV rows are the white keys and the number and ASDF rows are the black keys."
)]
struct Cli {
    #[arg(short, long, value_enum, default_value_t = Backend::Synth)]
    backend: Backend,
    /// Index or part of the name of the midi output port (see
    /// --list-midi-ports). Defaults to the first port.
    #[arg(long)]
    midi_port: Option<String>,
    /// Print the available midi output ports and exit
    #[arg(long)]
    list_midi_ports: bool,
    /// General MIDI program number of the initial instrument
    #[arg(
        short,
        long,
        default_value_t = 0,
        value_parser = clap::value_parser!(u8).range(0..=127),
    )]
    program: u8,
    /// TrueType font used to label the keys. Keys are unlabelled without one.
    #[arg(short, long)]
    font: Option<PathBuf>,
    #[arg(long, default_value_t = 0.01)]
    target_latency_s: f32,
    #[arg(short, long, default_value = "Virtual Piano Keyboard")]
    title: String,
}

fn open_backend(cli: &Cli) -> anyhow::Result<Box<dyn SoundBackend>> {
    Ok(match cli.backend {
        Backend::Synth => {
            let config = Config {
                target_latency_s: cli.target_latency_s,
            };
            Box::new(Player::new()?.start_synth(config)?)
        }
        Backend::Midi => Box::new(MidiBackend::connect(
            cli.midi_port.as_deref(),
            keypiano_core::CHANNEL,
        )?),
        Backend::Silent => Box::new(SilentBackend),
    })
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();
    let cli = Cli::parse();
    if cli.list_midi_ports {
        for (i, name) in keypiano_midi::list_output_ports()? {
            println!("{}: {}", i, name);
        }
        return Ok(());
    }
    let backend = match open_backend(&cli) {
        Ok(backend) => backend,
        Err(e) => {
            log::error!(
                "Failed to open {:?} backend, continuing without sound: {}",
                cli.backend,
                e
            );
            Box::new(SilentBackend)
        }
    };
    let controller = PlaybackController::new(Registry::new(), backend);
    let mut app = PianoApp::new(
        controller,
        cli.title.as_str(),
        cli.font.as_deref(),
        u7::from_int_lossy(cli.program),
    )?;
    app.run()
}
