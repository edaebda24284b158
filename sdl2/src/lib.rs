use keypiano_computer_keyboard::Key;
use sdl2::keyboard::Scancode;

/// Scancodes identify keys by their position on a US keyboard regardless of the active keyboard
/// layout, which is what a piano layout wants.
pub fn sdl2_scancode_to_key(scancode: Scancode) -> Option<Key> {
    let key = match scancode {
        Scancode::A => Key::A,
        Scancode::B => Key::B,
        Scancode::C => Key::C,
        Scancode::D => Key::D,
        Scancode::E => Key::E,
        Scancode::F => Key::F,
        Scancode::G => Key::G,
        Scancode::H => Key::H,
        Scancode::I => Key::I,
        Scancode::J => Key::J,
        Scancode::K => Key::K,
        Scancode::L => Key::L,
        Scancode::M => Key::M,
        Scancode::N => Key::N,
        Scancode::O => Key::O,
        Scancode::P => Key::P,
        Scancode::Q => Key::Q,
        Scancode::R => Key::R,
        Scancode::S => Key::S,
        Scancode::T => Key::T,
        Scancode::U => Key::U,
        Scancode::V => Key::V,
        Scancode::W => Key::W,
        Scancode::X => Key::X,
        Scancode::Y => Key::Y,
        Scancode::Z => Key::Z,
        Scancode::Num0 => Key::N0,
        Scancode::Num1 => Key::N1,
        Scancode::Num2 => Key::N2,
        Scancode::Num3 => Key::N3,
        Scancode::Num4 => Key::N4,
        Scancode::Num5 => Key::N5,
        Scancode::Num6 => Key::N6,
        Scancode::Num7 => Key::N7,
        Scancode::Num8 => Key::N8,
        Scancode::Num9 => Key::N9,
        Scancode::LeftBracket => Key::LeftBracket,
        Scancode::RightBracket => Key::RightBracket,
        Scancode::Semicolon => Key::Semicolon,
        Scancode::Apostrophe => Key::Apostrophe,
        Scancode::Comma => Key::Comma,
        Scancode::Period => Key::Period,
        Scancode::Minus => Key::Minus,
        Scancode::Equals => Key::Equals,
        Scancode::Slash => Key::Slash,
        Scancode::Space => Key::Space,
        Scancode::Tab => Key::Tab,
        Scancode::Return | Scancode::KpEnter => Key::Enter,
        Scancode::Backspace => Key::Backspace,
        Scancode::Backslash => Key::Backslash,
        _ => return None,
    };
    Some(key)
}
