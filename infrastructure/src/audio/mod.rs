//! Audio output adapters

pub mod playback;
