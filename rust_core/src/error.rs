//! Error types for the insight engine.

use std::fmt;
use thiserror::Error;

/// Which side of the matchup a season profile belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamSide {
    Home,
    Away,
}

impl TeamSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            TeamSide::Home => "home",
            TeamSide::Away => "away",
        }
    }
}

/// A primary input the composer refuses to fabricate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissingInput {
    LiveSnapshot { game_id: String },
    SeasonProfile { side: TeamSide, team_id: String },
}

impl fmt::Display for MissingInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingInput::LiveSnapshot { game_id } => {
                write!(f, "live snapshot unavailable for game {}", game_id)
            }
            MissingInput::SeasonProfile { side, team_id } => write!(
                f,
                "missing season profile for {} team {}",
                side.as_str(),
                team_id
            ),
        }
    }
}

#[derive(Debug, Error)]
pub enum InsightError {
    #[error("missing input: {0}")]
    MissingInput(MissingInput),
}

impl InsightError {
    pub fn missing_snapshot(game_id: impl Into<String>) -> Self {
        InsightError::MissingInput(MissingInput::LiveSnapshot {
            game_id: game_id.into(),
        })
    }

    pub fn missing_profile(side: TeamSide, team_id: impl Into<String>) -> Self {
        InsightError::MissingInput(MissingInput::SeasonProfile {
            side,
            team_id: team_id.into(),
        })
    }

    /// The missing input, if this error is a `MissingInput`.
    pub fn missing_input(&self) -> Option<&MissingInput> {
        match self {
            InsightError::MissingInput(input) => Some(input),
        }
    }
}

/// Malformed game clock string (expected `MM:SS`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid game clock '{raw}': {reason}")]
pub struct ClockParseError {
    pub raw: String,
    pub reason: &'static str,
}

/// Failures reading or writing the season profile cache file.
#[derive(Debug, Error)]
pub enum ProfileCacheError {
    #[error("profile cache I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("profile cache at {path} is not valid JSON: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
