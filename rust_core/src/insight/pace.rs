//! Pace normalization.
//!
//! Live pace readings on tiny early-game samples swing wildly (two quick
//! possessions can read as 140). The normalizer keeps every reading inside
//! the configured operating range and, inside the early-game stability
//! window, discards readings that jump too far from the last stable pace.

use crate::config::PaceConfig;
use tracing::debug;

/// Outcome of normalizing one raw reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaceReading {
    /// Always within [config.min, config.max]
    pub pace: f64,
    /// The raw reading was discarded in favour of the prior stable pace
    pub fallback_engaged: bool,
    /// The raw reading was outside the operating range
    pub clamped: bool,
}

/// Normalize a raw pace reading.
///
/// Never fails: non-finite readings resolve to the prior stable pace, or the
/// lower bound when there is none.
pub fn normalize_pace(
    raw: f64,
    prior_stable: Option<f64>,
    elapsed_minutes: f64,
    config: &PaceConfig,
) -> PaceReading {
    // max/min rather than clamp: a misconfigured min > max must not panic
    let bound = |p: f64| p.max(config.min).min(config.max);
    let prior = prior_stable.filter(|p| p.is_finite()).map(bound);

    if raw.is_nan() {
        return PaceReading {
            pace: prior.unwrap_or(config.min),
            fallback_engaged: prior.is_some(),
            clamped: prior.is_none(),
        };
    }

    if elapsed_minutes < config.stability_window_minutes {
        if let Some(prior) = prior {
            if (raw - prior).abs() > config.stability_threshold {
                debug!(
                    "Discarding unstable pace {:.1} at {:.2} min (prior {:.1})",
                    raw, elapsed_minutes, prior
                );
                return PaceReading {
                    pace: prior,
                    fallback_engaged: true,
                    clamped: false,
                };
            }
        }
    }

    let pace = bound(raw);
    PaceReading {
        pace,
        fallback_engaged: false,
        clamped: pace != raw,
    }
}
