//! Pace Pulse Core - Live basketball betting insight engine.
//!
//! This module provides:
//! - Pace normalization with an early-game stability guard
//! - Tempo trend (rate-of-change) classification
//! - Expected final totals blending season baselines with live pace
//! - Defensive context (suppression delta, tempo clamp rate)
//! - Line-movement bias detection
//! - Insight composition with summary text and badge flags
//! - Batch composition in parallel via rayon
//! - Per-game tracker store for pace history and fallback counters
//! - Season profile cache file helpers

pub mod config;
pub mod error;
pub mod game_tracker;
pub mod insight;
pub mod models;
pub mod profile_cache;

#[cfg(test)]
mod test_support;

pub use config::{
    BiasConfig, BlendConfig, FlagThresholds, InsightConfig, PaceConfig, RateOfChangeConfig,
};
pub use error::{ClockParseError, InsightError, MissingInput, ProfileCacheError, TeamSide};
pub use game_tracker::{ClampCounts, GameTracker, GameTrackerStore, PaceObservation};
pub use insight::bias::detect_bias;
pub use insight::defense::defensive_context;
pub use insight::expected_total::{expected_total, ExpectedTotal};
pub use insight::flags::derive_flags;
pub use insight::pace::{normalize_pace, PaceReading};
pub use insight::rate_of_change::{classify_rate_of_change, PaceSample};
pub use insight::{compose_insight, InsightEngine, InsightInputs};
pub use models::{
    Alignment, BiasDirection, BiasSignal, BiasStatus, DefenseContext, GameClock, Insight,
    InsightFlag, LiveLineHistory, LiveLinePoint, LiveSnapshot, RateOfChange, SeasonProfile,
    SupportingMetrics, TeamBox,
};
pub use profile_cache::SeasonProfileState;
