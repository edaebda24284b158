mod a440_12tet;

pub use a440_12tet::*;
