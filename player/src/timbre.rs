use midly::num::u7;
use std::f32::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Saw,
    Square,
}

impl Waveform {
    /// Sample the waveform at a point in its cycle. `phase_01` must be in [0, 1). Output is in
    /// [-1, 1].
    pub fn sample(self, phase_01: f32) -> f32 {
        match self {
            Self::Sine => (phase_01 * 2.0 * PI).sin(),
            Self::Triangle => {
                if phase_01 < 0.5 {
                    (phase_01 * 4.0) - 1.0
                } else {
                    3.0 - (phase_01 * 4.0)
                }
            }
            Self::Saw => (phase_01 * 2.0) - 1.0,
            Self::Square => {
                if phase_01 < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
        }
    }
}

/// Linear attack/decay/sustain/release envelope. Times are in seconds and must be positive.
/// With a sustain level of 0 the note dies away while the key is still held, like a piano.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adsr {
    pub attack_s: f32,
    pub decay_s: f32,
    pub sustain_01: f32,
    pub release_s: f32,
}

const fn adsr(
    attack_s: f32,
    decay_s: f32,
    sustain_01: f32,
    release_s: f32,
) -> Adsr {
    Adsr {
        attack_s,
        decay_s,
        sustain_01,
        release_s,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timbre {
    pub waveform: Waveform,
    pub adsr: Adsr,
}

const fn timbre(waveform: Waveform, adsr: Adsr) -> Timbre {
    Timbre { waveform, adsr }
}

/// One timbre for each family of 8 General MIDI programs.
const TIMBRE_BY_FAMILY: [Timbre; 16] = {
    use Waveform::*;
    [
        // piano
        timbre(Triangle, adsr(0.005, 1.5, 0.0, 0.3)),
        // chromatic percussion
        timbre(Sine, adsr(0.002, 0.8, 0.0, 0.4)),
        // organ
        timbre(Sine, adsr(0.01, 0.05, 1.0, 0.05)),
        // guitar
        timbre(Saw, adsr(0.005, 1.0, 0.0, 0.2)),
        // bass
        timbre(Triangle, adsr(0.01, 0.8, 0.3, 0.1)),
        // strings
        timbre(Saw, adsr(0.15, 0.2, 0.8, 0.3)),
        // ensemble
        timbre(Saw, adsr(0.2, 0.2, 0.8, 0.5)),
        // brass
        timbre(Square, adsr(0.05, 0.1, 0.7, 0.1)),
        // reed
        timbre(Square, adsr(0.03, 0.1, 0.8, 0.1)),
        // pipe
        timbre(Sine, adsr(0.05, 0.1, 0.9, 0.1)),
        // synth lead
        timbre(Square, adsr(0.005, 0.05, 0.9, 0.05)),
        // synth pad
        timbre(Sine, adsr(0.6, 0.5, 0.7, 1.0)),
        // synth effects
        timbre(Triangle, adsr(0.3, 0.5, 0.6, 0.8)),
        // ethnic
        timbre(Saw, adsr(0.002, 1.2, 0.0, 0.3)),
        // percussive
        timbre(Triangle, adsr(0.001, 0.3, 0.0, 0.1)),
        // sound effects
        timbre(Square, adsr(0.01, 0.2, 0.5, 0.2)),
    ]
};

impl Timbre {
    pub fn for_program(program: u7) -> Self {
        TIMBRE_BY_FAMILY[program.as_int() as usize / 8]
    }
}

impl Default for Timbre {
    fn default() -> Self {
        Self::for_program(0.into())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn waveforms_are_bounded() {
        for waveform in [
            Waveform::Sine,
            Waveform::Triangle,
            Waveform::Saw,
            Waveform::Square,
        ] {
            for i in 0..100 {
                let sample = waveform.sample(i as f32 / 100.0);
                assert!((-1.0..=1.0).contains(&sample), "{:?}", waveform);
            }
        }
    }

    #[test]
    fn programs_in_the_same_family_share_a_timbre() {
        assert_eq!(
            Timbre::for_program(40.into()),
            Timbre::for_program(47.into())
        );
        assert_ne!(
            Timbre::for_program(0.into()),
            Timbre::for_program(80.into())
        );
        assert_eq!(Timbre::for_program(127.into()).waveform, Waveform::Square);
    }

    #[test]
    fn envelope_times_are_positive() {
        for timbre in TIMBRE_BY_FAMILY {
            assert!(timbre.adsr.attack_s > 0.0);
            assert!(timbre.adsr.decay_s > 0.0);
            assert!(timbre.adsr.release_s > 0.0);
        }
    }
}
