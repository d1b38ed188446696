//! Expected final total.
//!
//! Blends two estimates of the final combined score:
//! - **Season baseline**: both teams' points per possession at their combined
//!   season pace, for a full 48 minutes
//! - **Live projection**: points already scored plus the remaining minutes
//!   played at the normalized live pace
//!
//! The live weight grows with game progress (`progress ^ exponent`), so the
//! baseline dominates early and the live projection owns the number by the
//! end of regulation.

use crate::config::BlendConfig;
use crate::models::clock::{game_progress, REGULATION_MINUTES};
use crate::models::SeasonProfile;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpectedTotal {
    /// Blended expected final total; never below the live total
    pub expected_total_now: f64,
    /// (normalized live pace - combined baseline pace) / combined baseline pace
    pub pace_delta_pct: f64,
    pub baseline_total: f64,
    pub live_projection: f64,
    pub live_weight: f64,
}

/// Mean of both teams' season pace.
pub fn combined_baseline_pace(home: &SeasonProfile, away: &SeasonProfile) -> f64 {
    (home.pace + away.pace) / 2.0
}

/// Relative pace deviation; 0 when there is no usable baseline.
pub fn pace_delta_pct(normalized_pace: f64, baseline_pace: f64) -> f64 {
    if baseline_pace <= 0.0 || !baseline_pace.is_finite() {
        return 0.0;
    }
    (normalized_pace - baseline_pace) / baseline_pace
}

/// Full-game total both teams score at their season efficiency and pace.
pub fn baseline_total(home: &SeasonProfile, away: &SeasonProfile) -> f64 {
    combined_points_per_possession(home, away) * combined_baseline_pace(home, away)
}

fn combined_points_per_possession(home: &SeasonProfile, away: &SeasonProfile) -> f64 {
    home.points_per_possession() + away.points_per_possession()
}

/// Weight given to the live projection after `elapsed_minutes`.
///
/// Monotonic in elapsed time: 0 at tip-off, 1 from the end of regulation.
pub fn live_weight(elapsed_minutes: f64, config: &BlendConfig) -> f64 {
    let exponent = if config.exponent.is_finite() && config.exponent > 0.0 {
        config.exponent
    } else {
        1.0
    };
    let progress = game_progress(elapsed_minutes);
    if progress.is_nan() {
        return 0.0;
    }
    progress.powf(exponent)
}

/// Compute the expected final total.
///
/// `scheduled_minutes` is the game length as of the current period (48 in
/// regulation, +5 per overtime).
pub fn expected_total(
    home: &SeasonProfile,
    away: &SeasonProfile,
    normalized_pace: f64,
    live_total: f64,
    elapsed_minutes: f64,
    scheduled_minutes: f64,
    config: &BlendConfig,
) -> ExpectedTotal {
    let baseline_pace = combined_baseline_pace(home, away);
    let baseline = baseline_total(home, away);

    let remaining = (scheduled_minutes - elapsed_minutes).max(0.0);
    let projection = live_total
        + remaining / REGULATION_MINUTES
            * combined_points_per_possession(home, away)
            * normalized_pace;

    let weight = live_weight(elapsed_minutes, config);
    let blended = (1.0 - weight) * baseline + weight * projection;

    let floor = live_total.max(0.0);
    let expected_total_now = if blended.is_finite() {
        blended.max(floor)
    } else {
        floor
    };

    ExpectedTotal {
        expected_total_now,
        pace_delta_pct: pace_delta_pct(normalized_pace, baseline_pace),
        baseline_total: baseline,
        live_projection: projection,
        live_weight: weight,
    }
}
