use crate::timbre::{Adsr, Timbre};
use keypiano_keyboard::Note;
use midly::num::u7;

pub const NUM_VOICES: usize = 32;

/// Scales the mix so that a handful of simultaneous notes don't clip.
const GAIN: f32 = 0.2;

/// A request from the UI thread to the audio thread.
#[derive(Debug, Clone, Copy)]
pub enum SynthCommand {
    NoteOn { note: Note, velocity: u7 },
    NoteOff { note: Note },
    ProgramChange { program: u7 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Attack,
    DecaySustain,
    Release,
    Done,
}

/// Per-voice state of a linear ADSR envelope, advanced one sample at a time.
#[derive(Debug, Clone, Copy)]
struct Envelope {
    adsr: Adsr,
    stage: Stage,
    level_01: f32,
}

impl Envelope {
    fn new(adsr: Adsr) -> Self {
        Self {
            adsr,
            stage: Stage::Attack,
            level_01: 0.0,
        }
    }

    fn release(&mut self) {
        if self.stage != Stage::Done {
            self.stage = Stage::Release;
        }
    }

    fn step(&mut self, sample_rate_hz: f32) -> f32 {
        match self.stage {
            Stage::Attack => {
                self.level_01 = (self.level_01
                    + (1.0 / (self.adsr.attack_s * sample_rate_hz)))
                    .min(1.0);
                if self.level_01 == 1.0 {
                    self.stage = Stage::DecaySustain;
                }
            }
            Stage::DecaySustain => {
                self.level_01 = (self.level_01
                    - (1.0 / (self.adsr.decay_s * sample_rate_hz)))
                    .max(self.adsr.sustain_01);
                if self.level_01 == 0.0 {
                    self.stage = Stage::Done;
                }
            }
            Stage::Release => {
                self.level_01 = (self.level_01
                    - (1.0 / (self.adsr.release_s * sample_rate_hz)))
                    .max(0.0);
                if self.level_01 == 0.0 {
                    self.stage = Stage::Done;
                }
            }
            Stage::Done => (),
        }
        self.level_01
    }
}

#[derive(Debug, Clone, Copy)]
struct Voice {
    note: Note,
    freq_hz: f32,
    phase_01: f32,
    velocity_01: f32,
    timbre: Timbre,
    envelope: Envelope,
    held: bool,
    started_at: u64,
    released_at: u64,
}

impl Voice {
    fn is_done(&self) -> bool {
        self.envelope.stage == Stage::Done
    }

    fn sample(&mut self, sample_rate_hz: f32) -> f32 {
        let value = self.timbre.waveform.sample(self.phase_01);
        self.phase_01 =
            (self.phase_01 + (self.freq_hz / sample_rate_hz)).fract();
        value * self.envelope.step(sample_rate_hz) * self.velocity_01
    }
}

/// A fixed pool of voices mixed into a mono signal. A new note takes an idle voice if there is
/// one, otherwise the voice that was released longest ago, otherwise the voice that started
/// longest ago.
pub struct SynthEngine {
    sample_rate_hz: f32,
    voices: Vec<Option<Voice>>,
    timbre: Timbre,
    sample_index: u64,
}

impl SynthEngine {
    pub fn new(sample_rate_hz: f32) -> Self {
        Self {
            sample_rate_hz,
            voices: vec![None; NUM_VOICES],
            timbre: Timbre::default(),
            sample_index: 0,
        }
    }

    pub fn handle(&mut self, command: SynthCommand) {
        match command {
            SynthCommand::NoteOn { note, velocity } => {
                self.note_on(note, velocity)
            }
            SynthCommand::NoteOff { note } => self.note_off(note),
            SynthCommand::ProgramChange { program } => {
                self.timbre = Timbre::for_program(program);
            }
        }
    }

    fn choose_voice(&self) -> usize {
        if let Some(i) = self
            .voices
            .iter()
            .position(|v| v.map(|v| v.is_done()).unwrap_or(true))
        {
            return i;
        }
        let released = self
            .voices
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.filter(|v| !v.held).map(|v| (i, v)))
            .min_by_key(|(_, v)| v.released_at);
        if let Some((i, _)) = released {
            return i;
        }
        log::warn!("all {} voices in use, stealing the oldest", NUM_VOICES);
        self.voices
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|v| (i, v)))
            .min_by_key(|(_, v)| v.started_at)
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn note_on(&mut self, note: Note, velocity: u7) {
        let i = self.choose_voice();
        self.voices[i] = Some(Voice {
            note,
            freq_hz: note.freq_hz(),
            phase_01: 0.0,
            velocity_01: velocity.as_int() as f32 / 127.0,
            timbre: self.timbre,
            envelope: Envelope::new(self.timbre.adsr),
            held: true,
            started_at: self.sample_index,
            released_at: 0,
        });
    }

    /// Releases every held voice playing `note`.
    fn note_off(&mut self, note: Note) {
        for voice in self.voices.iter_mut().flatten() {
            if voice.held && voice.note == note {
                voice.held = false;
                voice.released_at = self.sample_index;
                voice.envelope.release();
            }
        }
    }

    /// Fill an interleaved buffer with `num_channels` channels. Every channel gets the same
    /// signal.
    pub fn render(&mut self, data: &mut [f32], num_channels: usize) {
        for frame in data.chunks_mut(num_channels) {
            let mut mix = 0.0;
            for voice in self.voices.iter_mut() {
                if let Some(v) = voice {
                    mix += v.sample(self.sample_rate_hz);
                    if v.is_done() {
                        *voice = None;
                    }
                }
            }
            let output = (mix * GAIN).tanh();
            for sample in frame {
                *sample = output;
            }
            self.sample_index += 1;
        }
    }

    pub fn num_sounding_voices(&self) -> usize {
        self.voices.iter().flatten().count()
    }

    pub fn num_held_voices(&self) -> usize {
        self.voices.iter().flatten().filter(|v| v.held).count()
    }

    pub fn timbre(&self) -> Timbre {
        self.timbre
    }
}
