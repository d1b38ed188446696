//! Defensive context.
//!
//! This module provides:
//! - Defensive anchor selection (the slower season-pace team)
//! - Season-expected points at any point of the game from quarter shares
//! - The live suppression delta (psi) against that expectation
//! - Tempo clamp rate from the per-game fallback counters

use crate::game_tracker::ClampCounts;
use crate::models::clock::{QUARTER_MINUTES, REGULATION_MINUTES};
use crate::models::{DefenseContext, SeasonProfile};

/// Team whose defense anchors the read.
///
/// The slower season pace wins. On equal paces the home team anchors when
/// the game runs at or above baseline tempo, the away team otherwise.
pub fn defensive_anchor<'a>(
    home: &'a SeasonProfile,
    away: &'a SeasonProfile,
    pace_delta_pct: f64,
) -> &'a SeasonProfile {
    if away.pace < home.pace {
        away
    } else if home.pace < away.pace {
        home
    } else if pace_delta_pct >= 0.0 {
        home
    } else {
        away
    }
}

/// Points a team scores over the first `elapsed_minutes` of a game at its
/// season average, distributed by its quarter scoring shares.
///
/// Overtime minutes are pro-rated on the fourth-quarter share.
pub fn season_expected_points(profile: &SeasonProfile, elapsed_minutes: f64) -> f64 {
    if elapsed_minutes.is_nan() || elapsed_minutes <= 0.0 {
        return 0.0;
    }

    let shares = profile.quarter_shares();
    let mut points = 0.0;
    let mut remaining = elapsed_minutes;
    for share in shares {
        let played = remaining.min(QUARTER_MINUTES).max(0.0);
        points += profile.pts_pg * share * (played / QUARTER_MINUTES);
        remaining -= QUARTER_MINUTES;
        if remaining <= 0.0 {
            return points;
        }
    }

    // Overtime scores at the fourth-quarter rate
    let overtime = remaining.max(0.0);
    let per_overtime_minute = profile.pts_pg * shares[3] / QUARTER_MINUTES;
    points + per_overtime_minute * overtime
}

/// Observed scoring rate minus season-expected scoring rate, in combined
/// points per 48 minutes. Negative means the defenses are ahead of baseline.
pub fn suppression_delta(
    home: &SeasonProfile,
    away: &SeasonProfile,
    live_total: f64,
    elapsed_minutes: f64,
) -> f64 {
    if elapsed_minutes.is_nan() || elapsed_minutes <= 0.0 {
        return 0.0;
    }
    let expected =
        season_expected_points(home, elapsed_minutes) + season_expected_points(away, elapsed_minutes);
    let per_48 = REGULATION_MINUTES / elapsed_minutes;
    let psi = (live_total - expected) * per_48;
    if psi.is_finite() {
        psi
    } else {
        0.0
    }
}

/// Build the defensive context for one game.
///
/// `clamp_counts` are the caller-owned pace fallback counters for this game.
pub fn defensive_context(
    home: &SeasonProfile,
    away: &SeasonProfile,
    live_total: f64,
    elapsed_minutes: f64,
    pace_delta_pct: f64,
    clamp_counts: ClampCounts,
) -> DefenseContext {
    let anchor = defensive_anchor(home, away, pace_delta_pct);
    DefenseContext {
        def_team: anchor.team_name.clone(),
        tempo_clamp_rate: clamp_counts.rate(),
        psi: suppression_delta(home, away, live_total, elapsed_minutes),
        baseline_psi: anchor.psi,
        baseline_clamp_rate: anchor.tempo_clamp_rate,
        def_drag_score: anchor.def_drag_score,
    }
}
