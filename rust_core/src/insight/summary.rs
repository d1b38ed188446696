//! Summary sentence templates.
//!
//! The summary is assembled from fixed sentences: an optional defensive
//! lead-in, a tempo read, a market clause and an action hint, followed by a
//! volatility tag when tempo is accelerating.

use super::flags::{late_volatility, season_clamp_profile};
use crate::config::FlagThresholds;
use crate::models::{Alignment, DefenseContext, RateOfChange};

const CLAMP_LEAD_IN: &str = "Defensive clamp likely. Pace may regress.";
const UNDER_HINT: &str = "Under could have value.";
const OVER_HINT: &str = "Over could have value.";
const VOLATILITY_TAG: &str = "Moves are fast. Expect swings.";

/// Fields the summary is written from.
#[derive(Debug, Clone, Copy)]
pub struct SummaryInputs<'a> {
    pub alignment: Alignment,
    pub pace_delta_pct: f64,
    pub rate_of_change: RateOfChange,
    pub quarter: u8,
    pub defense: &'a DefenseContext,
}

pub fn tempo_sentence(pace_delta_pct: f64, thresholds: &FlagThresholds) -> &'static str {
    let fast = thresholds.fast_tempo_pct;
    let slow = thresholds.slow_tempo_pct;
    if pace_delta_pct >= 2.0 * fast {
        "Tempo is much faster than normal."
    } else if pace_delta_pct >= fast {
        "Tempo is a bit faster than normal."
    } else if pace_delta_pct <= 2.0 * slow {
        "Tempo is much slower than normal."
    } else if pace_delta_pct <= slow {
        "Tempo is a bit slower than normal."
    } else {
        "Tempo is near normal."
    }
}

pub fn market_clause(alignment: Alignment) -> &'static str {
    match alignment {
        Alignment::Above => "The line looks a little high.",
        Alignment::Below => "The line looks a little low.",
        Alignment::Aligned => "The line already reflects it.",
    }
}

pub fn action_hint(inputs: &SummaryInputs<'_>, thresholds: &FlagThresholds) -> &'static str {
    if late_volatility(inputs.quarter, inputs.rate_of_change, thresholds) {
        return "Late volatility. Manage risk.";
    }
    match inputs.alignment {
        Alignment::Below if inputs.pace_delta_pct >= thresholds.fast_tempo_pct => OVER_HINT,
        Alignment::Above if inputs.pace_delta_pct <= thresholds.slow_tempo_pct => UNDER_HINT,
        Alignment::Aligned => "No clear edge right now.",
        _ => "Watch for confirmation before acting.",
    }
}

/// Write the summary. Deterministic in its inputs.
pub fn write_summary(inputs: &SummaryInputs<'_>, thresholds: &FlagThresholds) -> String {
    let mut parts: Vec<&str> = Vec::with_capacity(5);
    if season_clamp_profile(inputs.defense, thresholds) {
        parts.push(CLAMP_LEAD_IN);
    }
    parts.push(tempo_sentence(inputs.pace_delta_pct, thresholds));
    parts.push(market_clause(inputs.alignment));

    // A strong drag read overrides the hint when the market agrees
    let drag = inputs.defense.def_drag_score;
    let hint = match inputs.alignment {
        Alignment::Above if drag >= thresholds.high_drag_score => UNDER_HINT,
        Alignment::Below if drag <= thresholds.low_drag_score => OVER_HINT,
        _ => action_hint(inputs, thresholds),
    };
    parts.push(hint);

    if inputs.rate_of_change == RateOfChange::Fast {
        parts.push(VOLATILITY_TAG);
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defense(psi: f64, baseline_psi: f64, def_drag_score: f64) -> DefenseContext {
        DefenseContext {
            def_team: "Team a".to_string(),
            tempo_clamp_rate: 0.0,
            psi,
            baseline_psi,
            baseline_clamp_rate: 0.0,
            def_drag_score,
        }
    }

    fn inputs(
        alignment: Alignment,
        pace_delta_pct: f64,
        rate_of_change: RateOfChange,
        quarter: u8,
        defense: &DefenseContext,
    ) -> SummaryInputs<'_> {
        SummaryInputs {
            alignment,
            pace_delta_pct,
            rate_of_change,
            quarter,
            defense,
        }
    }

    #[test]
    fn test_tempo_bands() {
        let t = FlagThresholds::default();
        assert_eq!(tempo_sentence(0.25, &t), "Tempo is much faster than normal.");
        assert_eq!(tempo_sentence(0.10, &t), "Tempo is a bit faster than normal.");
        assert_eq!(tempo_sentence(0.03, &t), "Tempo is near normal.");
        assert_eq!(tempo_sentence(-0.12, &t), "Tempo is a bit slower than normal.");
        assert_eq!(tempo_sentence(-0.20, &t), "Tempo is much slower than normal.");
    }

    #[test]
    fn test_plain_aligned_summary() {
        let t = FlagThresholds::default();
        let d = defense(0.0, 0.0, 50.0);
        let s = write_summary(&inputs(Alignment::Aligned, 0.0, RateOfChange::Normal, 2, &d), &t);
        assert_eq!(
            s,
            "Tempo is near normal. The line already reflects it. No clear edge right now."
        );
    }

    #[test]
    fn test_over_hint_when_fast_and_market_low() {
        let t = FlagThresholds::default();
        let d = defense(3.0, 0.0, 55.0);
        let s = write_summary(&inputs(Alignment::Below, 0.14, RateOfChange::Normal, 2, &d), &t);
        assert!(s.ends_with(OVER_HINT), "summary: {}", s);
    }

    #[test]
    fn test_clamp_lead_in_and_drag_override() {
        let t = FlagThresholds::default();
        let mut d = defense(-9.0, -6.5, 86.0);
        d.baseline_clamp_rate = 0.62;
        let s = write_summary(&inputs(Alignment::Above, 0.0, RateOfChange::Normal, 3, &d), &t);
        assert!(s.starts_with(CLAMP_LEAD_IN), "summary: {}", s);
        assert!(s.ends_with(UNDER_HINT), "summary: {}", s);
    }

    #[test]
    fn test_clamp_lead_in_follows_season_profile() {
        let t = FlagThresholds::default();
        // Live scoring right on baseline, anchor clamps by season
        let mut d = defense(0.0, -6.0, 50.0);
        d.baseline_clamp_rate = 0.7;
        let s = write_summary(&inputs(Alignment::Aligned, 0.0, RateOfChange::Normal, 3, &d), &t);
        assert_eq!(
            s,
            "Defensive clamp likely. Pace may regress. Tempo is near normal. \
             The line already reflects it. No clear edge right now."
        );

        // Suppressed live scoring alone is not enough
        let mut d = defense(-12.0, -2.0, 50.0);
        d.baseline_clamp_rate = 0.9;
        let s = write_summary(&inputs(Alignment::Aligned, 0.0, RateOfChange::Normal, 3, &d), &t);
        assert!(!s.starts_with(CLAMP_LEAD_IN), "summary: {}", s);
    }

    #[test]
    fn test_late_fast_game_is_volatile() {
        let t = FlagThresholds::default();
        let d = defense(0.0, 0.0, 50.0);
        let s = write_summary(&inputs(Alignment::Below, 0.05, RateOfChange::Fast, 4, &d), &t);
        assert!(s.contains("Late volatility. Manage risk."), "summary: {}", s);
        assert!(s.ends_with(VOLATILITY_TAG), "summary: {}", s);
    }

    #[test]
    fn test_deterministic() {
        let t = FlagThresholds::default();
        let d = defense(-6.0, -7.0, 30.0);
        let i = inputs(Alignment::Below, -0.3, RateOfChange::Slow, 1, &d);
        assert_eq!(write_summary(&i, &t), write_summary(&i, &t));
    }
}
