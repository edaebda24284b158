//! The on-screen part of the virtual piano: a window with a row of instrument buttons above a
//! piano keyboard whose keys light up while they are played.

mod font;
mod piano;
mod window;

pub use piano::*;
pub use window::*;
