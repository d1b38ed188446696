//! Badge flags.
//!
//! Each flag is a threshold predicate over fields the composer has already
//! computed; deriving them twice from the same insight yields the same list.

use crate::config::FlagThresholds;
use crate::models::{
    Alignment, BiasDirection, DefenseContext, Insight, InsightFlag, RateOfChange,
};

/// Live scoring is suppressed and the anchor defense backs it up, either by
/// season profile or by the early-game tempo guard firing this game.
pub fn clamp_defense_active(defense: &DefenseContext, thresholds: &FlagThresholds) -> bool {
    defense.psi <= thresholds.clamp_psi
        && (defense.baseline_psi <= thresholds.clamp_psi
            || defense.tempo_clamp_rate >= thresholds.clamp_rate)
}

/// The anchor defense clamps by season profile, regardless of live scoring.
pub fn season_clamp_profile(defense: &DefenseContext, thresholds: &FlagThresholds) -> bool {
    defense.baseline_psi <= thresholds.clamp_psi
        && defense.baseline_clamp_rate >= thresholds.clamp_rate
}

pub fn fast_tempo(pace_delta_pct: f64, thresholds: &FlagThresholds) -> bool {
    pace_delta_pct >= thresholds.fast_tempo_pct
}

pub fn slow_tempo(pace_delta_pct: f64, thresholds: &FlagThresholds) -> bool {
    pace_delta_pct <= thresholds.slow_tempo_pct
}

/// FAST tempo trend from the late-quarter threshold on (overtime included).
pub fn late_volatility(quarter: u8, rate: RateOfChange, thresholds: &FlagThresholds) -> bool {
    quarter >= thresholds.late_quarter && rate == RateOfChange::Fast
}

/// All flags that hold for `insight`, in declaration order.
pub fn derive_flags(insight: &Insight, thresholds: &FlagThresholds) -> Vec<InsightFlag> {
    let checks = [
        (
            InsightFlag::ClampDefenseActive,
            clamp_defense_active(&insight.defense_context, thresholds),
        ),
        (
            InsightFlag::FastTempo,
            fast_tempo(insight.pace_delta_pct, thresholds),
        ),
        (
            InsightFlag::SlowTempo,
            slow_tempo(insight.pace_delta_pct, thresholds),
        ),
        (InsightFlag::MarketHigh, insight.alignment == Alignment::Above),
        (InsightFlag::MarketLow, insight.alignment == Alignment::Below),
        (
            InsightFlag::LineMovingUp,
            insight.bias.direction == BiasDirection::BiasedUp,
        ),
        (
            InsightFlag::LineMovingDown,
            insight.bias.direction == BiasDirection::BiasedDown,
        ),
        (
            InsightFlag::LateVolatility,
            late_volatility(
                insight.supporting.quarter,
                insight.supporting.rate_of_change,
                thresholds,
            ),
        ),
    ];

    checks
        .into_iter()
        .filter_map(|(flag, holds)| holds.then_some(flag))
        .collect()
}
