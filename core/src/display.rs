use keypiano_computer_keyboard::KeyColour;
use keypiano_keyboard::Note;

/// How a piano key should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyShade {
    Pressed,
    Resting(KeyColour),
}

/// Something that shows the state of the piano keys to the player.
pub trait KeyDisplay {
    fn shade_key(&mut self, note: Note, shade: KeyShade);
}

/// For running without a screen.
impl KeyDisplay for () {
    fn shade_key(&mut self, _note: Note, _shade: KeyShade) {}
}
