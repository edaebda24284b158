//! Tracks which notes of the virtual piano are sounding and drives a sound backend so that every
//! note that is started is stopped exactly once, no matter how many key-repeat events the OS
//! delivers in between.

mod active;
mod backend;
mod controller;
mod display;
mod instrument;

pub use active::*;
pub use backend::*;
pub use controller::*;
pub use display::*;
pub use instrument::*;
