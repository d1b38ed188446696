//! Season profile cache file.
//!
//! This module provides:
//! - `SeasonProfileState` - refresh timestamp plus team id -> profile lookup
//! - JSON persistence as `{"refreshed": ..., "teams": [...]}` with atomic replace
//! - 24-hour freshness check
//! - League-relative defensive drag scores

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::error::ProfileCacheError;
use crate::models::SeasonProfile;

/// Default cache lifetime.
pub const PROFILE_MAX_AGE_HOURS: i64 = 24;

/// On-disk layout.
#[derive(Debug, Serialize, Deserialize)]
struct ProfilePayload {
    refreshed: DateTime<Utc>,
    #[serde(default)]
    teams: Vec<SeasonProfile>,
}

/// Season profiles for the league, as of `refreshed`.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonProfileState {
    refreshed: DateTime<Utc>,
    /// team_id -> profile
    teams: HashMap<String, SeasonProfile>,
}

impl SeasonProfileState {
    pub fn new(refreshed: DateTime<Utc>, profiles: Vec<SeasonProfile>) -> Self {
        let teams = profiles
            .into_iter()
            .map(|profile| (profile.team_id.clone(), profile))
            .collect();
        Self { refreshed, teams }
    }

    pub fn refreshed(&self) -> DateTime<Utc> {
        self.refreshed
    }

    pub fn get(&self, team_id: &str) -> Option<&SeasonProfile> {
        self.teams.get(team_id)
    }

    /// Profiles sorted by team id.
    pub fn profiles(&self) -> Vec<&SeasonProfile> {
        let mut profiles: Vec<&SeasonProfile> = self.teams.values().collect();
        profiles.sort_by(|a, b| a.team_id.cmp(&b.team_id));
        profiles
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    /// Whether the state is at most `max_age` old at `now`.
    pub fn is_fresh(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        now - self.refreshed <= max_age
    }

    /// Parse a state from its JSON payload.
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        let payload: ProfilePayload = serde_json::from_str(content)?;
        Ok(Self::new(payload.refreshed, payload.teams))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let payload = ProfilePayload {
            refreshed: self.refreshed,
            teams: self.profiles().into_iter().cloned().collect(),
        };
        serde_json::to_string_pretty(&payload)
    }

    /// Load from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ProfileCacheError> {
        let content = fs::read_to_string(path).map_err(|source| ProfileCacheError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content).map_err(|source| ProfileCacheError::Json {
            path: path.display().to_string(),
            source,
        })
    }

    /// Load a cache file if one is usable. A missing file is `None`; a
    /// corrupt one is logged and also `None`.
    pub fn load_cached(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }
        match Self::load(path) {
            Ok(state) => Some(state),
            Err(e) => {
                warn!("Failed to load cached season profiles: {}", e);
                None
            }
        }
    }

    /// Save to a JSON file, replacing any existing file atomically.
    pub fn save(&self, path: &Path) -> Result<(), ProfileCacheError> {
        let io_err = |source| ProfileCacheError::Io {
            path: path.display().to_string(),
            source,
        };
        let content = self.to_json().map_err(|source| ProfileCacheError::Json {
            path: path.display().to_string(),
            source,
        })?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content).map_err(io_err)?;
        fs::rename(&tmp, path).map_err(io_err)
    }
}

// ============================================================================
// Derived defensive metrics
// ============================================================================

/// Percentile rank of each value (1-based, ties share their average rank),
/// divided by the number of values.
pub fn rank_pct(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; n];
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j + 1 < n && values[order[j + 1]] == values[order[i]] {
            j += 1;
        }
        // positions i..=j are tied; 1-based average rank
        let avg = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            ranks[idx] = avg / n as f64;
        }
        i = j + 1;
    }
    ranks
}

/// Recompute every profile's defensive drag score from league ranks of
/// opponent eFG% allowed, defensive rebound % and opponent FT rate allowed:
/// `100 - 100 * mean(rank_pct)`.
pub fn derive_def_drag_scores(profiles: &mut [SeasonProfile]) {
    if profiles.is_empty() {
        return;
    }
    let column = |f: fn(&SeasonProfile) -> f64| -> Vec<f64> { profiles.iter().map(f).collect() };
    let efg = rank_pct(&column(|p| p.opp_efg_allowed));
    let drb = rank_pct(&column(|p| p.drb_pct));
    let ft_rate = rank_pct(&column(|p| p.opp_ft_rate_allowed));

    for (i, profile) in profiles.iter_mut().enumerate() {
        profile.def_drag_score = 100.0 - 100.0 * (efg[i] + drb[i] + ft_rate[i]) / 3.0;
    }
}
