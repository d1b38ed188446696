//! Tunable thresholds for the insight engine.
//!
//! Every threshold the engine uses lives here; the pure stages receive the
//! relevant sub-config by reference and never hardcode a constant.

/// Pace normalizer bounds and early-game stability guard.
#[derive(Debug, Clone, PartialEq)]
pub struct PaceConfig {
    /// Lowest pace the engine will operate on (possessions per 48)
    pub min: f64,
    /// Highest pace the engine will operate on
    pub max: f64,
    /// Game-clock minutes during which unstable readings are discarded
    pub stability_window_minutes: f64,
    /// Max allowed deviation from the prior stable pace inside the window
    pub stability_threshold: f64,
}

impl Default for PaceConfig {
    fn default() -> Self {
        Self {
            min: 60.0,
            max: 120.0,
            stability_window_minutes: 2.0,
            stability_threshold: 15.0,
        }
    }
}

/// Tempo trend thresholds, in pace units per game minute.
#[derive(Debug, Clone, PartialEq)]
pub struct RateOfChangeConfig {
    pub fast_slope: f64,
    pub slow_slope: f64,
    /// Number of recent normalized samples kept per game
    pub window: usize,
}

impl Default for RateOfChangeConfig {
    fn default() -> Self {
        Self {
            fast_slope: 1.5,
            slow_slope: -1.5,
            window: 6,
        }
    }
}

/// Weighting between season baseline and live trajectory.
#[derive(Debug, Clone, PartialEq)]
pub struct BlendConfig {
    /// live_weight = progress ^ exponent. 1.0 is linear; larger keeps the
    /// baseline dominant for longer.
    pub exponent: f64,
}

impl Default for BlendConfig {
    fn default() -> Self {
        Self { exponent: 1.0 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BiasConfig {
    /// Minimum net line movement (points) to call a direction
    pub min_movement: f64,
    /// History points needed before the signal is reported as active
    pub active_min_samples: usize,
    pub window_minutes: u32,
}

impl Default for BiasConfig {
    fn default() -> Self {
        Self {
            min_movement: 5.0,
            active_min_samples: 3,
            window_minutes: 3,
        }
    }
}

/// Thresholds for summary wording and badge flags.
#[derive(Debug, Clone, PartialEq)]
pub struct FlagThresholds {
    /// Pace delta (fraction) at or above which tempo counts as fast
    pub fast_tempo_pct: f64,
    /// Pace delta (fraction) at or below which tempo counts as slow
    pub slow_tempo_pct: f64,
    /// Suppression delta at or below which the defense is clamping
    pub clamp_psi: f64,
    /// Tempo clamp rate that backs a clamp read: the anchor's season rate
    /// for the summary lead-in, this game's rate for the badge
    pub clamp_rate: f64,
    /// Drag scores that flip the action hint
    pub high_drag_score: f64,
    pub low_drag_score: f64,
    /// Quarter from which a FAST tempo counts as late volatility
    pub late_quarter: u8,
}

impl Default for FlagThresholds {
    fn default() -> Self {
        Self {
            fast_tempo_pct: 0.10,
            slow_tempo_pct: -0.10,
            clamp_psi: -5.0,
            clamp_rate: 0.6,
            high_drag_score: 80.0,
            low_drag_score: 40.0,
            late_quarter: 4,
        }
    }
}

/// Full engine configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct InsightConfig {
    pub pace: PaceConfig,
    pub rate_of_change: RateOfChangeConfig,
    pub blend: BlendConfig,
    pub bias: BiasConfig,
    pub flags: FlagThresholds,
    /// Points the market may differ from the expected total and still be "aligned"
    pub alignment_band: f64,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            pace: PaceConfig::default(),
            rate_of_change: RateOfChangeConfig::default(),
            blend: BlendConfig::default(),
            bias: BiasConfig::default(),
            flags: FlagThresholds::default(),
            alignment_band: 5.0,
        }
    }
}
