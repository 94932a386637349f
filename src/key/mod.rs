//! Harmonic key notation

pub mod camelot;

pub use camelot::harmonic_key;
