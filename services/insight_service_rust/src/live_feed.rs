//! Live game data source.
//!
//! The poller reads live state through the `LiveFeed` trait. The bundled
//! implementation re-reads a `{"games": [...]}` snapshot file on every
//! refresh; each game entry is a `LiveSnapshot` plus its `lineHistory`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use pace_pulse_core::{LiveLinePoint, LiveSnapshot};
use parking_lot::RwLock;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[async_trait]
pub trait LiveFeed: Send + Sync {
    /// Reload upstream state. Called once per poll before any lookup.
    async fn refresh(&self) -> Result<()>;

    /// Ids of games currently live, sorted.
    async fn list_games(&self) -> Result<Vec<String>>;

    async fn snapshot(&self, game_id: &str) -> Result<Option<LiveSnapshot>>;

    /// Oldest-first line history; empty when none was recorded.
    async fn line_history(&self, game_id: &str) -> Result<Vec<LiveLinePoint>>;

    /// Seconds since the game's snapshot was produced, if it is timestamped.
    async fn cache_age_secs(&self, game_id: &str) -> Result<Option<i64>>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LiveGameRecord {
    #[serde(flatten)]
    snapshot: LiveSnapshot,
    #[serde(default)]
    line_history: Vec<LiveLinePoint>,
}

#[derive(Debug, Default, Deserialize)]
struct SnapshotFile {
    #[serde(default)]
    games: Vec<LiveGameRecord>,
}

/// `LiveFeed` over a JSON snapshot file.
pub struct JsonSnapshotFeed {
    path: PathBuf,
    games: RwLock<HashMap<String, LiveGameRecord>>,
}

impl JsonSnapshotFeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            games: RwLock::new(HashMap::new()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_file(&self) -> Result<SnapshotFile> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Live snapshot file {} not found", self.path.display());
                return Ok(SnapshotFile::default());
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read live snapshots from {}", self.path.display())
                })
            }
        };
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid live snapshot file {}", self.path.display()))
    }
}

#[async_trait]
impl LiveFeed for JsonSnapshotFeed {
    async fn refresh(&self) -> Result<()> {
        let file = self.read_file().await?;
        let games: HashMap<String, LiveGameRecord> = file
            .games
            .into_iter()
            .map(|record| (record.snapshot.game_id.clone(), record))
            .collect();
        debug!("Loaded {} live games from {}", games.len(), self.path.display());
        *self.games.write() = games;
        Ok(())
    }

    async fn list_games(&self) -> Result<Vec<String>> {
        let mut ids: Vec<String> = self.games.read().keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    async fn snapshot(&self, game_id: &str) -> Result<Option<LiveSnapshot>> {
        Ok(self
            .games
            .read()
            .get(game_id)
            .map(|record| record.snapshot.clone()))
    }

    async fn line_history(&self, game_id: &str) -> Result<Vec<LiveLinePoint>> {
        Ok(self
            .games
            .read()
            .get(game_id)
            .map(|record| record.line_history.clone())
            .unwrap_or_default())
    }

    async fn cache_age_secs(&self, game_id: &str) -> Result<Option<i64>> {
        let now = Utc::now();
        Ok(self
            .games
            .read()
            .get(game_id)
            .and_then(|record| record.snapshot.age_secs(now)))
    }
}
