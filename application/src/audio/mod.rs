//! Ordered playback of synthesized speech

pub mod sequencer;
