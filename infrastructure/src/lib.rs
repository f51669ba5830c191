//! Infrastructure layer for podium
//!
//! Adapters behind the application's ports: the HTTP debate backend,
//! rodio audio output, the JSON file resume cache, and configuration
//! loading.

pub mod audio;
pub mod backend;
pub mod config;
pub mod resume;

// Re-export commonly used types
pub use audio::playback::RodioAudioOutput;
pub use backend::http::HttpDebateBackend;
pub use config::{ConfigLoader, FileConfig};
pub use resume::file_cache::FileResumeCache;
