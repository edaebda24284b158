//! Sends notes to an external midi device (hardware synthesizer or a software one such as
//! fluidsynth or timidity listening on a midi port).

use anyhow::anyhow;
use keypiano_core::SoundBackend;
use keypiano_keyboard::Note;
use midir::{MidiOutput, MidiOutputConnection, MidiOutputPort};
use midly::{
    MidiMessage,
    live::LiveEvent,
    num::{u4, u7},
};

const CLIENT_NAME: &str = "keypiano";

/// A midi message on a channel.
#[derive(Clone, Debug)]
pub struct MidiEvent {
    pub channel: u4,
    pub message: MidiMessage,
}

impl MidiEvent {
    /// Appends the wire representation of this event to `buf`.
    pub fn encode(&self, buf: &mut Vec<u8>) -> anyhow::Result<()> {
        let event = LiveEvent::Midi {
            channel: self.channel,
            message: self.message,
        };
        match event.write_std(buf) {
            Ok(()) => Ok(()),
            Err(e) => anyhow::bail!("{e}"),
        }
    }
}

/// Somewhere to send encoded midi messages.
pub trait MidiSink {
    fn send_bytes(&mut self, bytes: &[u8]) -> anyhow::Result<()>;
}

impl MidiSink for MidiOutputConnection {
    fn send_bytes(&mut self, bytes: &[u8]) -> anyhow::Result<()> {
        self.send(bytes).map_err(|e| anyhow!("{e}"))
    }
}

/// Collects each message. Mostly useful for testing.
impl MidiSink for Vec<Vec<u8>> {
    fn send_bytes(&mut self, bytes: &[u8]) -> anyhow::Result<()> {
        self.push(bytes.to_vec());
        Ok(())
    }
}

/// Returns the index and name of each midi output port.
pub fn list_output_ports() -> anyhow::Result<Vec<(usize, String)>> {
    let midi_output = MidiOutput::new(CLIENT_NAME)?;
    let ports = midi_output
        .ports()
        .iter()
        .enumerate()
        .filter_map(|(i, port)| {
            midi_output.port_name(port).ok().map(|name| (i, name))
        })
        .collect();
    Ok(ports)
}

/// Picks a port by index, or failing that by case-insensitive substring of its name.
fn choose_port(names: &[(usize, String)], query: &str) -> Option<usize> {
    if let Ok(index) = query.parse::<usize>() {
        if names.iter().any(|&(i, _)| i == index) {
            return Some(index);
        }
    }
    let query = query.to_lowercase();
    names
        .iter()
        .find(|(_, name)| name.to_lowercase().contains(query.as_str()))
        .map(|&(i, _)| i)
}

/// Plays notes by sending midi messages on a single channel.
pub struct MidiBackend<S: MidiSink> {
    sink: S,
    channel: u4,
    buf: Vec<u8>,
}

impl<S: MidiSink> MidiBackend<S> {
    pub fn new(sink: S, channel: u4) -> Self {
        Self {
            sink,
            channel,
            buf: Vec::new(),
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    fn send(
        &mut self,
        channel: u4,
        message: MidiMessage,
    ) -> anyhow::Result<()> {
        self.buf.clear();
        MidiEvent { channel, message }.encode(&mut self.buf)?;
        self.sink.send_bytes(&self.buf)
    }
}

impl MidiBackend<MidiOutputConnection> {
    /// Connect to the output port matching `port` (see `choose_port`), or the first port if
    /// `port` is `None`.
    pub fn connect(port: Option<&str>, channel: u4) -> anyhow::Result<Self> {
        let midi_output = MidiOutput::new(CLIENT_NAME)?;
        let ports: Vec<MidiOutputPort> = midi_output.ports();
        let names = ports
            .iter()
            .enumerate()
            .filter_map(|(i, port)| {
                midi_output.port_name(port).ok().map(|name| (i, name))
            })
            .collect::<Vec<_>>();
        if names.is_empty() {
            anyhow::bail!("no midi output ports");
        }
        let index = match port {
            Some(query) => choose_port(&names, query).ok_or_else(|| {
                anyhow!("no midi output port matches {query:?}")
            })?,
            None => names[0].0,
        };
        let port = &ports[index];
        let port_name = midi_output.port_name(port)?;
        log::info!("midi output port: {}", port_name);
        let connection = midi_output
            .connect(port, &format!("{CLIENT_NAME} {port_name}"))
            .map_err(|_| anyhow!("Failed to connect to midi port"))?;
        Ok(Self::new(connection, channel))
    }
}

impl<S: MidiSink> SoundBackend for MidiBackend<S> {
    fn start(&mut self, note: Note, velocity: u7) -> anyhow::Result<()> {
        self.send(
            self.channel,
            MidiMessage::NoteOn {
                key: u7::from_int_lossy(note.to_midi_index()),
                vel: velocity,
            },
        )
    }

    fn stop(&mut self, note: Note) -> anyhow::Result<()> {
        self.send(
            self.channel,
            MidiMessage::NoteOff {
                key: u7::from_int_lossy(note.to_midi_index()),
                vel: 0.into(),
            },
        )
    }

    fn set_program(&mut self, channel: u4, program: u7) -> anyhow::Result<()> {
        self.send(channel, MidiMessage::ProgramChange { program })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn note(midi_index: u8) -> Note {
        Note::from_midi_index(midi_index).unwrap()
    }

    #[test]
    fn note_messages() {
        let mut backend = MidiBackend::new(Vec::<Vec<u8>>::new(), 0.into());
        backend.start(note(26), 80.into()).unwrap();
        backend.stop(note(26)).unwrap();
        assert_eq!(
            backend.sink(),
            &vec![vec![0x90, 26, 80], vec![0x80, 26, 0]]
        );
    }

    #[test]
    fn messages_use_the_backend_channel() {
        let mut backend = MidiBackend::new(Vec::<Vec<u8>>::new(), 3.into());
        backend.start(note(60), 80.into()).unwrap();
        assert_eq!(backend.sink()[0][0], 0x93);
    }

    #[test]
    fn program_change() {
        let mut backend = MidiBackend::new(Vec::<Vec<u8>>::new(), 0.into());
        backend.set_program(0.into(), 40.into()).unwrap();
        assert_eq!(backend.sink(), &vec![vec![0xC0, 40]]);
    }

    #[test]
    fn choose_port_by_index_or_name() {
        let names = vec![
            (0, "Midi Through:Midi Through Port-0 14:0".to_string()),
            (1, "FLUID Synth (1234):Synth input port 128:0".to_string()),
        ];
        assert_eq!(choose_port(&names, "1"), Some(1));
        assert_eq!(choose_port(&names, "fluid"), Some(1));
        assert_eq!(choose_port(&names, "through"), Some(0));
        assert_eq!(choose_port(&names, "timidity"), None);
        assert_eq!(choose_port(&names, "7"), None);
    }
}
