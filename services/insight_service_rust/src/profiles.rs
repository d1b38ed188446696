use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use pace_pulse_core::profile_cache::{derive_def_drag_scores, SeasonProfileState};
use tracing::{info, warn};

use crate::config::Config;

/// Season profiles for this run: the cache when it is fresh, otherwise the
/// bundled sample set, re-scored and persisted as the new cache.
pub fn load_profiles(config: &Config, now: DateTime<Utc>) -> Result<SeasonProfileState> {
    let max_age = Duration::hours(config.profile_max_age_hours);
    if let Some(state) = SeasonProfileState::load_cached(&config.season_profile_cache) {
        if state.is_fresh(now, max_age) {
            info!(
                "Using cached season profiles ({} teams, refreshed {})",
                state.len(),
                state.refreshed()
            );
            return Ok(state);
        }
        warn!(
            "Cached season profiles are stale (refreshed {}); refreshing",
            state.refreshed()
        );
    }

    let state = refresh_from_sample(config, now)?;
    if let Err(e) = state.save(&config.season_profile_cache) {
        warn!("Failed to persist season profile cache: {}", e);
    }
    Ok(state)
}

fn refresh_from_sample(config: &Config, now: DateTime<Utc>) -> Result<SeasonProfileState> {
    info!(
        "Refreshing season profiles from {}",
        config.sample_season_profiles.display()
    );
    let sample = SeasonProfileState::load(&config.sample_season_profiles)
        .context("Failed to load bundled season profiles")?;

    let mut profiles: Vec<_> = sample.profiles().into_iter().cloned().collect();
    derive_def_drag_scores(&mut profiles);
    Ok(SeasonProfileState::new(now, profiles))
}
