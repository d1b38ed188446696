use anyhow::{Context, Result};
use pace_pulse_core::profile_cache::PROFILE_MAX_AGE_HOURS;
use pace_pulse_core::InsightConfig;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub live_snapshot_path: PathBuf,
    pub season_profile_cache: PathBuf,
    pub sample_season_profiles: PathBuf,
    pub poll_interval: Duration,
    pub profile_max_age_hours: i64,
    pub feature_betting_insight: bool,
    /// Where each tick's insights are written as a JSON array, if anywhere
    pub insight_output_path: Option<PathBuf>,
    pub insight: InsightConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key -> value source. `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = PathBuf::from(lookup("DATA_DIR").unwrap_or_else(|| "data".to_string()));
        let path_or = |key: &str, file: &str| {
            lookup(key)
                .map(PathBuf::from)
                .unwrap_or_else(|| data_dir.join(file))
        };

        let live_snapshot_path = path_or("LIVE_SNAPSHOT_PATH", "live_snapshots.json");
        let season_profile_cache = path_or("SEASON_PROFILE_CACHE", "season_profiles.json");
        let sample_season_profiles =
            path_or("SAMPLE_SEASON_PROFILES", "sample_season_profiles.json");

        let poll_interval =
            Duration::from_secs(parse_env(&lookup, "POLL_INTERVAL_SECS", 15u64)?.max(1));
        let profile_max_age_hours =
            parse_env(&lookup, "PROFILE_MAX_AGE_HOURS", PROFILE_MAX_AGE_HOURS)?;
        let feature_betting_insight = parse_bool_env(&lookup, "FEATURE_BETTING_INSIGHT", false);
        let insight_output_path = lookup("INSIGHT_OUTPUT_PATH")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            data_dir,
            live_snapshot_path,
            season_profile_cache,
            sample_season_profiles,
            poll_interval,
            profile_max_age_hours,
            feature_betting_insight,
            insight_output_path,
            insight: load_insight_config(&lookup)?,
        })
    }
}

/// Engine thresholds, each overridable from the environment.
pub fn load_insight_config<F>(lookup: &F) -> Result<InsightConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut cfg = InsightConfig::default();

    cfg.pace.min = parse_env(lookup, "PACE_MIN", cfg.pace.min)?;
    cfg.pace.max = parse_env(lookup, "PACE_MAX", cfg.pace.max)?;
    cfg.pace.stability_window_minutes = parse_env(
        lookup,
        "PACE_STABILITY_WINDOW_MIN",
        cfg.pace.stability_window_minutes,
    )?;
    cfg.pace.stability_threshold =
        parse_env(lookup, "PACE_STABILITY_THRESHOLD", cfg.pace.stability_threshold)?;

    cfg.rate_of_change.fast_slope =
        parse_env(lookup, "ROC_FAST_SLOPE", cfg.rate_of_change.fast_slope)?;
    cfg.rate_of_change.slow_slope =
        parse_env(lookup, "ROC_SLOW_SLOPE", cfg.rate_of_change.slow_slope)?;
    cfg.rate_of_change.window = parse_env(lookup, "ROC_WINDOW", cfg.rate_of_change.window)?;

    cfg.alignment_band = parse_env(lookup, "ALIGNMENT_BAND", cfg.alignment_band)?;
    cfg.bias.min_movement = parse_env(lookup, "BIAS_MIN_MOVEMENT", cfg.bias.min_movement)?;
    cfg.blend.exponent = parse_env(lookup, "BLEND_EXPONENT", cfg.blend.exponent)?;

    if cfg.pace.min > cfg.pace.max {
        anyhow::bail!(
            "PACE_MIN ({}) must not exceed PACE_MAX ({})",
            cfg.pace.min,
            cfg.pace.max
        );
    }
    Ok(cfg)
}

fn parse_env<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Invalid {key}: {raw}")),
        None => Ok(default),
    }
}

fn parse_bool_env<F>(lookup: &F, key: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "y" | "on"))
        .unwrap_or(default)
}
