//! Per-game tracker store.
//!
//! This module provides:
//! - `GameTracker` - last stable pace, recent pace samples and fallback counters for one game
//! - `GameTrackerStore` - concurrent game id -> tracker map owned by the calling service
//!
//! Lookups take the map's read lock only long enough to clone the tracker
//! handle; all per-game work happens under that game's own mutex, so
//! different games never contend.

use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;
use std::collections::VecDeque;
use std::sync::Arc;

use crate::config::PaceConfig;
use crate::insight::pace::{normalize_pace, PaceReading};
use crate::insight::rate_of_change::PaceSample;

/// Pace fallback counters for one game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClampCounts {
    /// Readings where the early-game fallback replaced the raw pace
    pub engaged: u64,
    /// All readings normalized for the game
    pub total: u64,
}

impl ClampCounts {
    /// Fraction of readings that engaged the fallback, in [0, 1].
    pub fn rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.engaged.min(self.total) as f64) / (self.total as f64)
    }
}

/// Result of feeding one raw reading through a game's tracker.
#[derive(Debug, Clone, PartialEq)]
pub struct PaceObservation {
    pub reading: PaceReading,
    /// Recent normalized samples, oldest first, including this one
    pub samples: Vec<PaceSample>,
    /// Counters after this reading
    pub clamp_counts: ClampCounts,
}

/// Mutable state for one live game.
#[derive(Debug, Clone, Default)]
pub struct GameTracker {
    last_stable_pace: Option<f64>,
    samples: VecDeque<PaceSample>,
    counts: ClampCounts,
}

impl GameTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_stable_pace(&self) -> Option<f64> {
        self.last_stable_pace
    }

    pub fn clamp_counts(&self) -> ClampCounts {
        self.counts
    }

    pub fn samples(&self) -> Vec<PaceSample> {
        self.samples.iter().copied().collect()
    }

    /// Normalize `raw` against this game's stable pace without recording it.
    pub fn preview(&self, raw: f64, elapsed_minutes: f64, config: &PaceConfig) -> PaceObservation {
        PaceObservation {
            reading: normalize_pace(raw, self.last_stable_pace, elapsed_minutes, config),
            samples: self.samples(),
            clamp_counts: self.counts,
        }
    }

    /// Normalize `raw` against this game's stable pace and record the result.
    ///
    /// Readings that did not engage the fallback become the new stable pace.
    /// The sample window keeps at most `window` entries in ascending game
    /// time; a reading at or before the newest sample replaces the newer ones.
    pub fn observe(
        &mut self,
        raw: f64,
        elapsed_minutes: f64,
        config: &PaceConfig,
        window: usize,
    ) -> PaceObservation {
        let reading = normalize_pace(raw, self.last_stable_pace, elapsed_minutes, config);

        self.counts.total += 1;
        if reading.fallback_engaged {
            self.counts.engaged += 1;
        } else {
            self.last_stable_pace = Some(reading.pace);
        }

        while self
            .samples
            .back()
            .is_some_and(|last| last.elapsed_minutes >= elapsed_minutes)
        {
            self.samples.pop_back();
        }
        self.samples
            .push_back(PaceSample::new(elapsed_minutes, reading.pace));
        while self.samples.len() > window.max(1) {
            self.samples.pop_front();
        }

        PaceObservation {
            reading,
            samples: self.samples(),
            clamp_counts: self.counts,
        }
    }
}

/// Keyed store of game trackers.
#[derive(Debug, Default)]
pub struct GameTrackerStore {
    games: RwLock<FxHashMap<String, Arc<Mutex<GameTracker>>>>,
}

impl GameTrackerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracker handle for `game_id`, created on first use.
    pub fn tracker(&self, game_id: &str) -> Arc<Mutex<GameTracker>> {
        if let Some(tracker) = self.games.read().get(game_id) {
            return Arc::clone(tracker);
        }
        let mut games = self.games.write();
        Arc::clone(
            games
                .entry(game_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(GameTracker::new()))),
        )
    }

    /// Normalize a reading for `game_id` under that game's lock.
    pub fn observe(
        &self,
        game_id: &str,
        raw: f64,
        elapsed_minutes: f64,
        config: &PaceConfig,
        window: usize,
    ) -> PaceObservation {
        let tracker = self.tracker(game_id);
        let mut guard = tracker.lock();
        guard.observe(raw, elapsed_minutes, config, window)
    }

    /// Normalize a reading for `game_id` without touching its tracker or
    /// creating one. Used for readings that are not live measurements.
    pub fn preview(
        &self,
        game_id: &str,
        raw: f64,
        elapsed_minutes: f64,
        config: &PaceConfig,
    ) -> PaceObservation {
        let tracker = self.games.read().get(game_id).map(Arc::clone);
        match tracker {
            Some(tracker) => tracker.lock().preview(raw, elapsed_minutes, config),
            None => GameTracker::new().preview(raw, elapsed_minutes, config),
        }
    }

    /// Counters for `game_id`; zero for an unknown game.
    pub fn clamp_counts(&self, game_id: &str) -> ClampCounts {
        self.games
            .read()
            .get(game_id)
            .map(|tracker| tracker.lock().clamp_counts())
            .unwrap_or_default()
    }

    /// Drop a finished game's tracker. Returns whether one existed.
    pub fn remove(&self, game_id: &str) -> bool {
        self.games.write().remove(game_id).is_some()
    }

    /// Keep only trackers for games in `live_game_ids`; returns how many were dropped.
    pub fn retain_games<S: AsRef<str>>(&self, live_game_ids: &[S]) -> usize {
        let mut games = self.games.write();
        let before = games.len();
        games.retain(|id, _| live_game_ids.iter().any(|live| live.as_ref() == id));
        before - games.len()
    }

    pub fn game_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.games.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.games.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.read().is_empty()
    }
}
