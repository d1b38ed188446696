//! Line-movement bias.
//!
//! Reads the live market total's trajectory since tip-off. A net move of at
//! least `min_movement` points calls a direction; anything smaller is noise.

use tracing::debug;

use super::round_to;
use crate::config::BiasConfig;
use crate::models::{BiasDirection, BiasSignal, BiasStatus, LiveLinePoint};

/// Net line change from the first to the last history point; 0 with fewer
/// than two points.
pub fn line_change_since_tip(history: &[LiveLinePoint]) -> f64 {
    match (history.first(), history.last()) {
        (Some(first), Some(last)) if history.len() >= 2 => {
            let change = last.total - first.total;
            if change.is_finite() {
                change
            } else {
                0.0
            }
        }
        _ => 0.0,
    }
}

/// Mean absolute step between consecutive totals.
pub fn average_movement(history: &[LiveLinePoint]) -> f64 {
    if history.len() < 2 {
        return 0.0;
    }
    let steps: f64 = history
        .windows(2)
        .map(|pair| (pair[1].total - pair[0].total).abs())
        .sum();
    steps / (history.len() - 1) as f64
}

/// Classify directional bias in an oldest-first line history.
///
/// Fewer than two points is always neutral with zero change.
pub fn detect_bias(history: &[LiveLinePoint], config: &BiasConfig) -> BiasSignal {
    let change = line_change_since_tip(history);
    let direction = if history.len() < 2 || change.abs() < config.min_movement {
        BiasDirection::Neutral
    } else if change > 0.0 {
        BiasDirection::BiasedUp
    } else {
        BiasDirection::BiasedDown
    };

    let sample_size = history.len();
    let status = if sample_size >= config.active_min_samples {
        BiasStatus::Active
    } else {
        BiasStatus::Inactive
    };
    let confidence = match status {
        BiasStatus::Active => (0.4 + 0.05 * sample_size as f64).min(0.95),
        BiasStatus::Inactive => 0.0,
    };

    if direction != BiasDirection::Neutral {
        debug!(
            "Line bias {:?}: {:+.1} over {} points",
            direction, change, sample_size
        );
    }

    BiasSignal {
        direction,
        line_change_since_tip: round_to(change, 1),
        status,
        confidence: round_to(confidence, 2),
        avg_movement: round_to(average_movement(history), 2),
        window_min: config.window_minutes,
        sample_size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::history;

    #[test]
    fn test_biased_up_example() {
        let signal = detect_bias(&history(&[210.0, 218.0]), &BiasConfig::default());
        assert_eq!(signal.direction, BiasDirection::BiasedUp);
        assert_eq!(signal.line_change_since_tip, 8.0);
        assert_eq!(signal.status, BiasStatus::Inactive);
        assert_eq!(signal.confidence, 0.0);
    }

    #[test]
    fn test_short_history_is_neutral() {
        let cfg = BiasConfig::default();
        let empty = detect_bias(&[], &cfg);
        assert_eq!(empty.direction, BiasDirection::Neutral);
        assert_eq!(empty.line_change_since_tip, 0.0);
        assert_eq!(empty.sample_size, 0);

        let single = detect_bias(&history(&[221.5]), &cfg);
        assert_eq!(single.direction, BiasDirection::Neutral);
        assert_eq!(single.line_change_since_tip, 0.0);
    }

    #[test]
    fn test_small_moves_are_neutral() {
        let signal = detect_bias(&history(&[220.0, 223.5, 224.5]), &BiasConfig::default());
        assert_eq!(signal.direction, BiasDirection::Neutral);
        assert_eq!(signal.line_change_since_tip, 4.5);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let signal = detect_bias(&history(&[226.0, 221.0]), &BiasConfig::default());
        assert_eq!(signal.direction, BiasDirection::BiasedDown);
        assert_eq!(signal.line_change_since_tip, -5.0);
    }

    #[test]
    fn test_net_change_ignores_round_trip() {
        // Big swing that comes back: no net bias, but movement is high
        let signal = detect_bias(
            &history(&[220.0, 230.0, 221.0]),
            &BiasConfig::default(),
        );
        assert_eq!(signal.direction, BiasDirection::Neutral);
        assert_eq!(signal.avg_movement, 9.5);
    }

    #[test]
    fn test_active_status_and_confidence() {
        let cfg = BiasConfig::default();
        let signal = detect_bias(&history(&[218.0, 219.5, 222.0, 225.5]), &cfg);
        assert_eq!(signal.status, BiasStatus::Active);
        assert_eq!(signal.direction, BiasDirection::BiasedUp);
        assert_eq!(signal.confidence, 0.6);
        assert_eq!(signal.avg_movement, 2.5);
        assert_eq!(signal.window_min, 3);

        let long: Vec<f64> = (0..20).map(|i| 220.0 + i as f64 * 0.5).collect();
        assert_eq!(detect_bias(&history(&long), &cfg).confidence, 0.95);
    }
}
