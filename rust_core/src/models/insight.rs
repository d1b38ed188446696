//! Insight record and the labels it carries.

use serde::{Deserialize, Serialize};

// ============================================================================
// Labels
// ============================================================================

/// Market total relative to the engine's expected total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Above,
    Below,
    Aligned,
}

impl Alignment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Alignment::Above => "above",
            Alignment::Below => "below",
            Alignment::Aligned => "aligned",
        }
    }
}

/// Tempo trend over recent pace samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateOfChange {
    #[serde(rename = "FAST")]
    Fast,
    #[serde(rename = "NORMAL")]
    Normal,
    #[serde(rename = "SLOW")]
    Slow,
    #[serde(rename = "unknown")]
    Unknown,
}

impl RateOfChange {
    pub fn as_str(&self) -> &'static str {
        match self {
            RateOfChange::Fast => "FAST",
            RateOfChange::Normal => "NORMAL",
            RateOfChange::Slow => "SLOW",
            RateOfChange::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BiasDirection {
    #[serde(rename = "biased-up")]
    BiasedUp,
    #[serde(rename = "biased-down")]
    BiasedDown,
    #[serde(rename = "neutral")]
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BiasStatus {
    Active,
    Inactive,
}

/// Badge-worthy conditions derived from a composed insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightFlag {
    ClampDefenseActive,
    FastTempo,
    SlowTempo,
    MarketHigh,
    MarketLow,
    LineMovingUp,
    LineMovingDown,
    LateVolatility,
}

impl InsightFlag {
    /// Badge text.
    pub fn label(&self) -> &'static str {
        match self {
            InsightFlag::ClampDefenseActive => "Clamp defense active",
            InsightFlag::FastTempo => "Fast tempo",
            InsightFlag::SlowTempo => "Slow tempo",
            InsightFlag::MarketHigh => "Market high",
            InsightFlag::MarketLow => "Market low",
            InsightFlag::LineMovingUp => "Line moving up",
            InsightFlag::LineMovingDown => "Line moving down",
            InsightFlag::LateVolatility => "Late volatility",
        }
    }
}

// ============================================================================
// Insight sections
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiasSignal {
    pub direction: BiasDirection,
    pub line_change_since_tip: f64,
    pub status: BiasStatus,
    pub confidence: f64,
    pub avg_movement: f64,
    pub window_min: u32,
    pub sample_size: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefenseContext {
    /// Team whose defense anchors the read (the slower season pace)
    pub def_team: String,
    /// Share of this game's pace readings that hit the early-game fallback
    pub tempo_clamp_rate: f64,
    /// Observed minus season-expected scoring rate; negative = defense ahead of baseline
    pub psi: f64,
    pub baseline_psi: f64,
    /// Anchor's season tempo clamp rate
    pub baseline_clamp_rate: f64,
    pub def_drag_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportingMetrics {
    /// Points on the board
    pub live_total: f64,
    pub market_total: f64,
    pub expected_total_now: f64,
    pub line_change_since_tip: f64,
    pub rate_of_change: RateOfChange,
    pub quarter: u8,
    pub time_remaining: String,
    pub normalized_pace: f64,
    pub pace_fallback_engaged: bool,
}

/// The engine's output for one game at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub game_id: String,
    pub summary: String,
    pub alignment: Alignment,
    pub pace_delta_pct: f64,
    pub supporting: SupportingMetrics,
    pub defense_context: DefenseContext,
    pub bias: BiasSignal,
    pub flags: Vec<InsightFlag>,
}
