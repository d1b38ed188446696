//! Insight engine.
//!
//! This module provides:
//! - Pace normalization with an early-game stability guard (`pace`)
//! - Tempo trend classification (`rate_of_change`)
//! - Expected final total blending season baseline and live pace (`expected_total`)
//! - Defensive context: anchor defense, psi, tempo clamp rate (`defense`)
//! - Line-movement bias (`bias`)
//! - Summary templates and badge flags (`summary`, `flags`)
//! - `compose_insight` and the `InsightEngine` wrapper, including parallel batches
//!
//! Every stage is a pure function of its inputs. The only mutable state is
//! the per-game `GameTrackerStore`, which the caller owns and passes in.

pub mod bias;
pub mod defense;
pub mod expected_total;
pub mod flags;
pub mod pace;
pub mod rate_of_change;
pub mod summary;

use rayon::prelude::*;
use std::sync::Arc;
use tracing::debug;

use crate::config::InsightConfig;
use crate::error::{InsightError, TeamSide};
use crate::game_tracker::GameTrackerStore;
use crate::models::clock::scheduled_minutes;
use crate::models::{
    Alignment, DefenseContext, Insight, LiveLinePoint, LiveSnapshot, RateOfChange, SeasonProfile,
    SupportingMetrics,
};

use self::bias::detect_bias;
use self::defense::defensive_context;
use self::expected_total::{combined_baseline_pace, expected_total};
use self::flags::derive_flags;
use self::rate_of_change::classify_rate_of_change;
use self::summary::{write_summary, SummaryInputs};

/// Round to `decimals` places; non-finite values pass through.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Market total relative to the expected total, with an absolute band in points.
pub fn classify_alignment(market_total: f64, expected_total_now: f64, band: f64) -> Alignment {
    let gap = market_total - expected_total_now;
    if gap > band {
        Alignment::Above
    } else if -gap > band {
        Alignment::Below
    } else {
        Alignment::Aligned
    }
}

/// Everything the composer reads for one game.
///
/// Profiles and snapshot are optional so a caller can hand over whatever its
/// lookups produced; the composer reports which one is missing.
#[derive(Debug, Clone, Copy)]
pub struct InsightInputs<'a> {
    pub game_id: &'a str,
    pub home: Option<&'a SeasonProfile>,
    pub away: Option<&'a SeasonProfile>,
    pub snapshot: Option<&'a LiveSnapshot>,
    /// Oldest-first live line history; empty when none is available
    pub history: &'a [LiveLinePoint],
}

/// Compose the insight for one game.
///
/// Records this call's pace reading in `trackers`; everything else is pure.
pub fn compose_insight(
    inputs: InsightInputs<'_>,
    trackers: &GameTrackerStore,
    config: &InsightConfig,
) -> Result<Insight, InsightError> {
    let snapshot = inputs
        .snapshot
        .ok_or_else(|| InsightError::missing_snapshot(inputs.game_id))?;
    let home = inputs
        .home
        .ok_or_else(|| InsightError::missing_profile(TeamSide::Home, &snapshot.home.team_id))?;
    let away = inputs
        .away
        .ok_or_else(|| InsightError::missing_profile(TeamSide::Away, &snapshot.away.team_id))?;

    let game_id = inputs.game_id;
    let elapsed = snapshot.elapsed_minutes();
    let live_total = snapshot.live_total();

    // Before tip-off there is no live reading. The season baseline stands in
    // for this call only and never becomes the game's stable pace.
    let observation = match snapshot.raw_pace() {
        Some(raw_pace) => trackers.observe(
            game_id,
            raw_pace,
            elapsed,
            &config.pace,
            config.rate_of_change.window,
        ),
        None => trackers.preview(
            game_id,
            combined_baseline_pace(home, away),
            elapsed,
            &config.pace,
        ),
    };
    let normalized_pace = observation.reading.pace;

    let rate_of_change = match classify_rate_of_change(&observation.samples, &config.rate_of_change)
    {
        RateOfChange::Unknown => snapshot.rate_of_change.unwrap_or(RateOfChange::Unknown),
        label => label,
    };

    let total = expected_total(
        home,
        away,
        normalized_pace,
        live_total,
        elapsed,
        scheduled_minutes(snapshot.quarter),
        &config.blend,
    );
    let pace_delta_pct = round_to(total.pace_delta_pct, 4);

    let defense = defensive_context(
        home,
        away,
        live_total,
        elapsed,
        total.pace_delta_pct,
        observation.clamp_counts,
    );
    let defense = DefenseContext {
        tempo_clamp_rate: round_to(defense.tempo_clamp_rate, 3),
        psi: round_to(defense.psi, 1),
        ..defense
    };

    let bias = detect_bias(inputs.history, &config.bias);
    let alignment = classify_alignment(
        snapshot.market_total,
        total.expected_total_now,
        config.alignment_band,
    );

    let summary = write_summary(
        &SummaryInputs {
            alignment,
            pace_delta_pct,
            rate_of_change,
            quarter: snapshot.quarter,
            defense: &defense,
        },
        &config.flags,
    );

    debug!(
        "Composed insight for {}: expected {:.1} vs market {:.1} ({})",
        game_id,
        total.expected_total_now,
        snapshot.market_total,
        alignment.as_str()
    );

    let mut insight = Insight {
        game_id: game_id.to_string(),
        summary,
        alignment,
        pace_delta_pct,
        supporting: SupportingMetrics {
            live_total,
            market_total: snapshot.market_total,
            expected_total_now: round_to(total.expected_total_now, 1),
            line_change_since_tip: bias.line_change_since_tip,
            rate_of_change,
            quarter: snapshot.quarter,
            time_remaining: snapshot.clock.to_string(),
            normalized_pace: round_to(normalized_pace, 1),
            pace_fallback_engaged: observation.reading.fallback_engaged,
        },
        defense_context: defense,
        bias,
        flags: Vec::new(),
    };
    insight.flags = derive_flags(&insight, &config.flags);
    Ok(insight)
}

// ============================================================================
// Engine
// ============================================================================

/// Configuration plus a shared tracker store.
#[derive(Debug, Clone, Default)]
pub struct InsightEngine {
    config: InsightConfig,
    trackers: Arc<GameTrackerStore>,
}

impl InsightEngine {
    pub fn new(config: InsightConfig) -> Self {
        Self::with_trackers(config, Arc::new(GameTrackerStore::new()))
    }

    pub fn with_trackers(config: InsightConfig, trackers: Arc<GameTrackerStore>) -> Self {
        Self { config, trackers }
    }

    pub fn config(&self) -> &InsightConfig {
        &self.config
    }

    pub fn trackers(&self) -> &Arc<GameTrackerStore> {
        &self.trackers
    }

    pub fn build(&self, inputs: InsightInputs<'_>) -> Result<Insight, InsightError> {
        compose_insight(inputs, &self.trackers, &self.config)
    }

    /// Compose insights for many games in parallel. Results keep input order.
    pub fn build_batch(&self, batch: &[InsightInputs<'_>]) -> Vec<Result<Insight, InsightError>> {
        batch
            .par_iter()
            .map(|inputs| self.build(*inputs))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MissingInput;
    use crate::models::{BiasDirection, InsightFlag};
    use crate::test_support::{history, profile, snapshot};

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.123456, 4), 0.1235);
        assert_eq!(round_to(224.46, 1), 224.5);
        assert!(round_to(f64::NAN, 2).is_nan());
    }

    #[test]
    fn test_alignment_band() {
        assert_eq!(classify_alignment(235.0, 220.0, 5.0), Alignment::Above);
        assert_eq!(classify_alignment(212.0, 220.0, 5.0), Alignment::Below);
        assert_eq!(classify_alignment(225.0, 220.0, 5.0), Alignment::Aligned);
        assert_eq!(classify_alignment(215.0, 220.0, 5.0), Alignment::Aligned);
    }

    #[test]
    fn test_missing_inputs_are_named() {
        let store = GameTrackerStore::new();
        let cfg = InsightConfig::default();
        let home = profile("h", 100.0, 115.0);
        let snap = snapshot("g1", 2, "6:00", 50, 48, 221.5);

        let err = compose_insight(
            InsightInputs {
                game_id: "g1",
                home: Some(&home),
                away: Some(&home),
                snapshot: None,
                history: &[],
            },
            &store,
            &cfg,
        )
        .unwrap_err();
        assert_eq!(
            err.missing_input(),
            Some(&MissingInput::LiveSnapshot {
                game_id: "g1".to_string()
            })
        );

        let err = compose_insight(
            InsightInputs {
                game_id: "g1",
                home: Some(&home),
                away: None,
                snapshot: Some(&snap),
                history: &[],
            },
            &store,
            &cfg,
        )
        .unwrap_err();
        assert_eq!(
            err.missing_input(),
            Some(&MissingInput::SeasonProfile {
                side: TeamSide::Away,
                team_id: "a".to_string()
            })
        );
        // Failed calls leave no tracker behind
        assert!(store.is_empty());
    }

    #[test]
    fn test_market_above_expected() {
        let store = GameTrackerStore::new();
        let cfg = InsightConfig::default();
        let home = profile("h", 100.0, 112.0);
        let away = profile("a", 100.0, 108.0);
        // Pre-tip: expected is the 220 baseline, market sits at 235
        let snap = snapshot("g1", 1, "12:00", 0, 0, 235.0);

        let insight = compose_insight(
            InsightInputs {
                game_id: "g1",
                home: Some(&home),
                away: Some(&away),
                snapshot: Some(&snap),
                history: &[],
            },
            &store,
            &cfg,
        )
        .unwrap();

        assert_eq!(insight.supporting.expected_total_now, 220.0);
        assert_eq!(insight.alignment, Alignment::Above);
        assert_eq!(insight.pace_delta_pct, 0.0);
        assert_eq!(insight.supporting.normalized_pace, 100.0);
        assert_eq!(insight.supporting.rate_of_change, RateOfChange::Unknown);
        assert_eq!(insight.supporting.time_remaining, "12:00");
        assert!(insight.flags.contains(&InsightFlag::MarketHigh));
        assert!(insight.summary.contains("The line looks a little high."));
    }

    #[test]
    fn test_history_drives_bias_and_line_change() {
        let store = GameTrackerStore::new();
        let cfg = InsightConfig::default();
        let home = profile("h", 100.0, 112.0);
        let away = profile("a", 100.0, 108.0);
        let snap = snapshot("g1", 2, "6:00", 45, 43, 218.0);
        let line = history(&[210.0, 214.0, 218.0]);

        let insight = compose_insight(
            InsightInputs {
                game_id: "g1",
                home: Some(&home),
                away: Some(&away),
                snapshot: Some(&snap),
                history: &line,
            },
            &store,
            &cfg,
        )
        .unwrap();

        assert_eq!(insight.bias.direction, BiasDirection::BiasedUp);
        assert_eq!(insight.supporting.line_change_since_tip, 8.0);
        assert!(insight.flags.contains(&InsightFlag::LineMovingUp));
        assert_eq!(
            insight.flags,
            derive_flags(&insight, &cfg.flags),
            "stored flags must match a fresh derivation"
        );
    }

    #[test]
    fn test_upstream_hint_used_until_samples_exist() {
        let store = GameTrackerStore::new();
        let cfg = InsightConfig::default();
        let home = profile("h", 100.0, 112.0);
        let away = profile("a", 100.0, 108.0);
        let mut snap = snapshot("g1", 3, "6:00", 80, 78, 224.0);
        snap.rate_of_change = Some(RateOfChange::Slow);

        let build = |snap: &LiveSnapshot| {
            compose_insight(
                InsightInputs {
                    game_id: "g1",
                    home: Some(&home),
                    away: Some(&away),
                    snapshot: Some(snap),
                    history: &[],
                },
                &store,
                &cfg,
            )
            .unwrap()
        };

        snap.live_pace = Some(100.0);
        assert_eq!(build(&snap).supporting.rate_of_change, RateOfChange::Slow);

        // Second reading four minutes later, +12 pace: computed label wins
        snap.clock = "2:00".parse().unwrap();
        snap.live_pace = Some(112.0);
        assert_eq!(build(&snap).supporting.rate_of_change, RateOfChange::Fast);
    }

    #[test]
    fn test_batch_keeps_order_and_reports_errors() {
        let engine = InsightEngine::new(InsightConfig::default());
        let home = profile("h", 100.0, 112.0);
        let away = profile("a", 98.0, 108.0);
        let snaps: Vec<LiveSnapshot> = (0..6)
            .map(|i| snapshot(&format!("g{}", i), 2, "3:30", 50 + i, 48, 222.5))
            .collect();

        let mut batch: Vec<InsightInputs<'_>> = snaps
            .iter()
            .map(|snap| InsightInputs {
                game_id: &snap.game_id,
                home: Some(&home),
                away: Some(&away),
                snapshot: Some(snap),
                history: &[],
            })
            .collect();
        batch[3].home = None;

        let results = engine.build_batch(&batch);
        assert_eq!(results.len(), 6);
        for (i, result) in results.iter().enumerate() {
            if i == 3 {
                assert!(result.is_err());
            } else {
                assert_eq!(result.as_ref().unwrap().game_id, format!("g{}", i));
            }
        }
        assert_eq!(engine.trackers().len(), 5);
    }
}
