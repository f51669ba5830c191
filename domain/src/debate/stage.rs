//! Debate stage protocol.
//!
//! [`Stage`] is the fixed phase sequence of a debate. The ordering is
//! advisory: `advance_to` on a session records whatever stage the backend
//! scheduler requested, and [`Stage::successor`] only reports the next
//! sequential stage for display and sanity checks. Which roles may speak
//! in a stage is the scheduler's decision, not encoded here.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Phase of a debate, in protocol order.
///
/// `Setup` is initial; `Completed` is terminal with no outgoing
/// transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Setup,
    CoinToss,
    Opening,
    Rebuttal,
    CrossExam,
    Closing,
    Judgment,
    Completed,
}

/// Error returned when parsing an unknown stage name
#[derive(Error, Debug)]
#[error("Unknown stage: {0}")]
pub struct StageParseError(pub String);

impl Stage {
    /// All stages in protocol order.
    pub const ALL: [Stage; 8] = [
        Stage::Setup,
        Stage::CoinToss,
        Stage::Opening,
        Stage::Rebuttal,
        Stage::CrossExam,
        Stage::Closing,
        Stage::Judgment,
        Stage::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Setup => "setup",
            Stage::CoinToss => "coin_toss",
            Stage::Opening => "opening",
            Stage::Rebuttal => "rebuttal",
            Stage::CrossExam => "cross_exam",
            Stage::Closing => "closing",
            Stage::Judgment => "judgment",
            Stage::Completed => "completed",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Stage::Setup => "Setup",
            Stage::CoinToss => "Coin Toss",
            Stage::Opening => "Opening Statements",
            Stage::Rebuttal => "Rebuttals",
            Stage::CrossExam => "Cross-Examination",
            Stage::Closing => "Closing Statements",
            Stage::Judgment => "Judgment",
            Stage::Completed => "Completed",
        }
    }

    /// The next stage in protocol order, or `None` from `Completed`.
    pub fn successor(&self) -> Option<Stage> {
        let idx = Stage::ALL.iter().position(|s| s == self)?;
        Stage::ALL.get(idx + 1).copied()
    }

    /// Whether this stage ends the debate.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Completed)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Stage {
    type Err = StageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stage::ALL
            .iter()
            .find(|stage| stage.as_str() == s)
            .copied()
            .ok_or_else(|| StageParseError(s.to_string()))
    }
}
