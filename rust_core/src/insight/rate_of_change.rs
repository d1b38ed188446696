//! Tempo trend classification from recent pace samples.

use crate::config::RateOfChangeConfig;
use crate::models::RateOfChange;

/// A normalized pace reading at a point in game time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaceSample {
    pub elapsed_minutes: f64,
    pub pace: f64,
}

impl PaceSample {
    pub fn new(elapsed_minutes: f64, pace: f64) -> Self {
        Self {
            elapsed_minutes,
            pace,
        }
    }
}

/// Pace change per game minute between the first and last sample, or None
/// when the window spans no game time.
pub fn pace_slope(samples: &[PaceSample]) -> Option<f64> {
    let (first, last) = match (samples.first(), samples.last()) {
        (Some(first), Some(last)) if samples.len() >= 2 => (first, last),
        _ => return None,
    };
    let span = last.elapsed_minutes - first.elapsed_minutes;
    if span.is_nan() || span <= 0.0 {
        return None;
    }
    let slope = (last.pace - first.pace) / span;
    slope.is_finite().then_some(slope)
}

/// Classify tempo trend over a time-ascending window of samples.
///
/// Fewer than two samples (or a window with no elapsed game time) is
/// `Unknown`, never an error.
pub fn classify_rate_of_change(
    samples: &[PaceSample],
    config: &RateOfChangeConfig,
) -> RateOfChange {
    match pace_slope(samples) {
        None => RateOfChange::Unknown,
        Some(slope) if slope > config.fast_slope => RateOfChange::Fast,
        Some(slope) if slope < config.slow_slope => RateOfChange::Slow,
        Some(_) => RateOfChange::Normal,
    }
}
