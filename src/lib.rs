//! octave-scope library - real-time FFT and octave-band analysis

pub mod analysis;
pub mod audio;
pub mod cli;
pub mod display;
pub mod error;
pub mod params;
