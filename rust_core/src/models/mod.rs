// Shared models for the Pace Pulse insight engine
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod clock;
pub mod insight;

pub use clock::GameClock;
pub use insight::*;

/// Free throws that end a possession, as a fraction of attempts.
pub const FREE_THROW_POSSESSION_FACTOR: f64 = 0.44;

// ============================================================================
// Season baseline
// ============================================================================

/// Per-team season baseline. Field names follow the stats provider's
/// SCREAMING_SNAKE_CASE columns so cached payloads load unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct SeasonProfile {
    pub team_id: String,
    pub team_name: String,
    #[serde(default)]
    pub season: String,
    /// Possessions per 48 minutes
    pub pace: f64,
    #[serde(default)]
    pub pace_rank: u32,
    pub pts_pg: f64,
    pub q1_share: f64,
    pub q2_share: f64,
    pub q3_share: f64,
    pub q4_share: f64,
    #[serde(default)]
    pub def_rating: f64,
    #[serde(default)]
    pub opp_pts_pg: f64,
    #[serde(default)]
    pub opp_efg_allowed: f64,
    #[serde(default)]
    pub opp_tov_forced_pct: f64,
    #[serde(default)]
    pub drb_pct: f64,
    #[serde(default)]
    pub opp_ft_rate_allowed: f64,
    /// Suppression index: negative = holds opponents below their norm
    #[serde(default)]
    pub psi: f64,
    #[serde(default)]
    pub tempo_clamp_rate: f64,
    #[serde(default = "default_def_drag_score")]
    pub def_drag_score: f64,
    #[serde(default)]
    pub transition_kill_rate: f64,
    #[serde(default)]
    pub late_slow_tendency: f64,
}

fn default_def_drag_score() -> f64 {
    50.0
}

impl SeasonProfile {
    /// Points per possession, derived from scoring and pace.
    pub fn points_per_possession(&self) -> f64 {
        if self.pace > 0.0 {
            self.pts_pg / self.pace
        } else {
            0.0
        }
    }

    /// Per-quarter scoring shares. Falls back to an even split when the
    /// profile carries no usable shares.
    pub fn quarter_shares(&self) -> [f64; 4] {
        let shares = [self.q1_share, self.q2_share, self.q3_share, self.q4_share];
        let total: f64 = shares.iter().sum();
        if total.is_finite() && total > 0.0 {
            shares
        } else {
            [0.25; 4]
        }
    }
}

// ============================================================================
// Live game state
// ============================================================================

/// Box-score counting stats for one team in a live game.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamBox {
    pub team_id: String,
    #[serde(default, alias = "pts")]
    pub points: u32,
    #[serde(default)]
    pub fga: f64,
    #[serde(default)]
    pub oreb: f64,
    #[serde(default)]
    pub tov: f64,
    #[serde(default)]
    pub fta: f64,
}

impl TeamBox {
    /// Estimated possessions used so far.
    pub fn possessions(&self) -> f64 {
        self.fga - self.oreb + self.tov + FREE_THROW_POSSESSION_FACTOR * self.fta
    }
}

/// A live game's current state as delivered by the live cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveSnapshot {
    pub game_id: String,
    pub quarter: u8,
    pub clock: GameClock,
    /// Current posted market total
    pub market_total: f64,
    /// Upstream pace estimate; derived from the box score when absent
    #[serde(default)]
    pub live_pace: Option<f64>,
    /// Upstream tempo label, used only when the engine cannot compute one
    #[serde(default)]
    pub rate_of_change: Option<RateOfChange>,
    pub home: TeamBox,
    pub away: TeamBox,
    #[serde(default)]
    pub updated: Option<DateTime<Utc>>,
}

impl LiveSnapshot {
    /// Points on the board.
    pub fn live_total(&self) -> f64 {
        (self.home.points + self.away.points) as f64
    }

    pub fn elapsed_minutes(&self) -> f64 {
        clock::elapsed_minutes(self.quarter, &self.clock)
    }

    /// Raw pace reading: the upstream estimate if present, otherwise
    /// 48 * mean possessions / elapsed minutes. None before tip-off.
    pub fn raw_pace(&self) -> Option<f64> {
        if let Some(pace) = self.live_pace {
            return Some(pace);
        }
        let elapsed = self.elapsed_minutes();
        if elapsed <= 0.0 {
            return None;
        }
        let avg_possessions = (self.home.possessions() + self.away.possessions()) / 2.0;
        Some(clock::REGULATION_MINUTES * avg_possessions / elapsed)
    }

    /// Seconds since the snapshot was produced, if it carries a timestamp.
    pub fn age_secs(&self, now: DateTime<Utc>) -> Option<i64> {
        self.updated.map(|ts| (now - ts).num_seconds())
    }
}

// ============================================================================
// Market line history
// ============================================================================

/// One observation of the live market total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveLinePoint {
    pub total: f64,
    pub timestamp: DateTime<Utc>,
}

/// Oldest-first sequence of live market totals.
pub type LiveLineHistory = Vec<LiveLinePoint>;
