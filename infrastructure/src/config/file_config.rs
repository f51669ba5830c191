//! File-based configuration schema

use serde::{Deserialize, Serialize};

/// Top-level configuration, merged from defaults and TOML files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub backend: BackendConfig,
    pub debate: DebateConfig,
    pub audio: AudioConfig,
    pub resume: ResumeConfig,
}

/// Backend service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the debate backend
    pub url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8080".to_string(),
        }
    }
}

/// Debate defaults used when the CLI creates a session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebateConfig {
    /// Language passed with every streaming request
    pub language: String,
    /// Model for the affirmative side's AI debaters
    pub affirmative_model: String,
    /// Model for the negative side's AI debaters
    pub negative_model: String,
    /// Model for the AI judge
    pub judge_model: String,
}

impl Default for DebateConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            affirmative_model: "gpt-4o".to_string(),
            negative_model: "gpt-4o".to_string(),
            judge_model: "gpt-4o".to_string(),
        }
    }
}

/// Audio playback settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Whether to play synthesized speech
    pub enabled: bool,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Resume cache tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeConfig {
    /// Maximum number of remembered sessions
    pub max_entries: usize,
    /// Recency horizon for remembered sessions, in days
    pub recent_horizon_days: i64,
    /// Freshness horizon for the current-session pointer, in hours
    pub current_horizon_hours: i64,
}

impl Default for ResumeConfig {
    fn default() -> Self {
        Self {
            max_entries: 20,
            recent_horizon_days: 7,
            current_horizon_hours: 24,
        }
    }
}
