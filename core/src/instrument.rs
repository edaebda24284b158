use midly::num::u7;

/// A selectable timbre, identified by its General MIDI program number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instrument {
    pub program: u7,
    pub name: &'static str,
}

const fn instrument(program: u8, name: &'static str) -> Instrument {
    Instrument {
        program: u7::from_int_lossy(program),
        name,
    }
}

/// The instruments offered on the instrument bar, in display order.
pub static INSTRUMENTS: [Instrument; 7] = [
    instrument(0, "Acoustic Grand Piano"),
    instrument(32, "Acoustic Bass"),
    instrument(40, "Violin"),
    instrument(56, "Trumpet"),
    instrument(80, "Lead 1 (square)"),
    instrument(88, "Pad 1 (new age)"),
    instrument(104, "Sitar"),
];

pub fn instrument_by_program(program: u7) -> Option<&'static Instrument> {
    INSTRUMENTS
        .iter()
        .find(|instrument| instrument.program == program)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn programs_are_distinct_and_ascending() {
        assert!(INSTRUMENTS.windows(2).all(|w| w[0].program < w[1].program));
    }

    #[test]
    fn lookup() {
        let violin = instrument_by_program(u7::from_int_lossy(40)).unwrap();
        assert_eq!(violin.name, "Violin");
        assert_eq!(instrument_by_program(u7::from_int_lossy(1)), None);
    }
}
