//! Port definitions (interfaces to the outside world)
//!
//! Implementations (adapters) live in the infrastructure layer.

pub mod audio_output;
pub mod backend;
pub mod observer;
pub mod resume_cache;
