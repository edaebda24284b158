//! Maps the keys on a US computer keyboard to the notes of a two-octave piano. The QWERTY and ZXCV
//! rows (plus tab, enter and backslash) are the white keys and the number row and ASDF row are the
//! black keys.

mod layout;
mod mapping;

pub use layout::*;
pub use mapping::*;

/// A physical key on a computer keyboard. Only some keys are mapped to notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    N0,
    N1,
    N2,
    N3,
    N4,
    N5,
    N6,
    N7,
    N8,
    N9,
    LeftBracket,
    RightBracket,
    Semicolon,
    Apostrophe,
    Comma,
    Period,
    Minus,
    Equals,
    Slash,
    Space,
    Tab,
    Enter,
    Backspace,
    Backslash,
}

impl Key {
    pub const ALL: [Key; 50] = {
        use Key::*;
        [
            A,
            B,
            C,
            D,
            E,
            F,
            G,
            H,
            I,
            J,
            K,
            L,
            M,
            N,
            O,
            P,
            Q,
            R,
            S,
            T,
            U,
            V,
            W,
            X,
            Y,
            Z,
            N0,
            N1,
            N2,
            N3,
            N4,
            N5,
            N6,
            N7,
            N8,
            N9,
            LeftBracket,
            RightBracket,
            Semicolon,
            Apostrophe,
            Comma,
            Period,
            Minus,
            Equals,
            Slash,
            Space,
            Tab,
            Enter,
            Backspace,
            Backslash,
        ]
    };
}
