//! Per-tick insight refresh.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use pace_pulse_core::{
    Insight, InsightEngine, InsightInputs, LiveLinePoint, LiveSnapshot, SeasonProfileState,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::Config;
use crate::live_feed::LiveFeed;
use crate::profiles::load_profiles;

/// Everything fetched for one game before composition.
struct GameInputs {
    game_id: String,
    snapshot: Option<LiveSnapshot>,
    history: Vec<LiveLinePoint>,
    cache_age: Option<i64>,
}

pub struct InsightPoller {
    feed: Arc<dyn LiveFeed>,
    engine: InsightEngine,
    profiles: SeasonProfileState,
    config: Config,
}

impl InsightPoller {
    pub fn new(
        feed: Arc<dyn LiveFeed>,
        engine: InsightEngine,
        profiles: SeasonProfileState,
        config: Config,
    ) -> Self {
        Self {
            feed,
            engine,
            profiles,
            config,
        }
    }

    pub fn engine(&self) -> &InsightEngine {
        &self.engine
    }

    fn refresh_profiles_if_stale(&mut self, now: DateTime<Utc>) {
        let max_age = Duration::hours(self.config.profile_max_age_hours);
        if self.profiles.is_fresh(now, max_age) {
            return;
        }
        match load_profiles(&self.config, now) {
            Ok(profiles) => self.profiles = profiles,
            Err(e) => warn!("Keeping stale season profiles: {:#}", e),
        }
    }

    /// Build insights for every live game, prune finished games' trackers,
    /// and write the batch out if an output path is configured.
    pub async fn tick(&mut self) -> Result<Vec<Insight>> {
        self.refresh_profiles_if_stale(Utc::now());

        self.feed.refresh().await?;
        let game_ids = self.feed.list_games().await?;

        let mut fetched = Vec::with_capacity(game_ids.len());
        for game_id in &game_ids {
            fetched.push(GameInputs {
                game_id: game_id.clone(),
                snapshot: self.feed.snapshot(game_id).await?,
                history: self.feed.line_history(game_id).await?,
                cache_age: self.feed.cache_age_secs(game_id).await?,
            });
        }

        let batch: Vec<InsightInputs<'_>> = fetched
            .iter()
            .map(|game| InsightInputs {
                game_id: &game.game_id,
                home: game
                    .snapshot
                    .as_ref()
                    .and_then(|s| self.profiles.get(&s.home.team_id)),
                away: game
                    .snapshot
                    .as_ref()
                    .and_then(|s| self.profiles.get(&s.away.team_id)),
                snapshot: game.snapshot.as_ref(),
                history: &game.history,
            })
            .collect();
        let results = self.engine.build_batch(&batch);

        let mut insights = Vec::with_capacity(results.len());
        for (game, result) in fetched.iter().zip(results) {
            match result {
                Ok(insight) => {
                    let badges: Vec<&str> = insight.flags.iter().map(|f| f.label()).collect();
                    info!(
                        target: "insight_render",
                        game_id = %insight.game_id,
                        cache_age = ?game.cache_age,
                        pace_valid = !insight.supporting.pace_fallback_engaged,
                        alignment = insight.alignment.as_str(),
                        summary_length = insight.summary.len(),
                        badges = ?badges,
                        "insight_render"
                    );
                    insights.push(insight);
                }
                Err(e) => warn!("Skipping insight for game {}: {}", game.game_id, e),
            }
        }

        let pruned = self.engine.trackers().retain_games(&game_ids);
        if pruned > 0 {
            info!("Dropped trackers for {} finished games", pruned);
        }

        if let Some(path) = &self.config.insight_output_path {
            write_insights(path, &insights).await?;
        }
        Ok(insights)
    }
}

async fn write_insights(path: &Path, insights: &[Insight]) -> Result<()> {
    let content = serde_json::to_string_pretty(insights)?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, content)
        .await
        .with_context(|| format!("Failed to write insights to {}", tmp.display()))?;
    tokio::fs::rename(&tmp, path)
        .await
        .with_context(|| format!("Failed to move insights into {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use pace_pulse_core::{GameClock, InsightConfig, SeasonProfile, TeamBox};
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::path::PathBuf;

    /// In-memory feed whose game list can be changed between ticks.
    #[derive(Default)]
    struct StubFeed {
        games: Mutex<Vec<LiveSnapshot>>,
    }

    #[async_trait]
    impl LiveFeed for StubFeed {
        async fn refresh(&self) -> Result<()> {
            Ok(())
        }

        async fn list_games(&self) -> Result<Vec<String>> {
            Ok(self.games.lock().iter().map(|g| g.game_id.clone()).collect())
        }

        async fn snapshot(&self, game_id: &str) -> Result<Option<LiveSnapshot>> {
            Ok(self
                .games
                .lock()
                .iter()
                .find(|g| g.game_id == game_id)
                .cloned())
        }

        async fn line_history(&self, _game_id: &str) -> Result<Vec<LiveLinePoint>> {
            let tip = Utc.with_ymd_and_hms(2025, 1, 15, 0, 30, 0).unwrap();
            Ok(vec![
                LiveLinePoint {
                    total: 220.0,
                    timestamp: tip,
                },
                LiveLinePoint {
                    total: 226.0,
                    timestamp: tip + Duration::minutes(20),
                },
            ])
        }

        async fn cache_age_secs(&self, _game_id: &str) -> Result<Option<i64>> {
            Ok(Some(4))
        }
    }

    fn profile(team_id: &str, pace: f64, pts_pg: f64) -> SeasonProfile {
        let json = format!(
            r#"{{"TEAM_ID": "{}", "TEAM_NAME": "Team {}", "PACE": {}, "PTS_PG": {},
                "Q1_SHARE": 0.25, "Q2_SHARE": 0.25, "Q3_SHARE": 0.25, "Q4_SHARE": 0.25}}"#,
            team_id, team_id, pace, pts_pg
        );
        serde_json::from_str(&json).unwrap()
    }

    fn snapshot(game_id: &str, home: &str, away: &str) -> LiveSnapshot {
        LiveSnapshot {
            game_id: game_id.to_string(),
            quarter: 2,
            clock: "6:00".parse::<GameClock>().unwrap(),
            market_total: 224.0,
            live_pace: Some(101.0),
            rate_of_change: None,
            home: TeamBox {
                team_id: home.to_string(),
                points: 48,
                ..TeamBox::default()
            },
            away: TeamBox {
                team_id: away.to_string(),
                points: 45,
                ..TeamBox::default()
            },
            updated: None,
        }
    }

    fn poller(feed: Arc<StubFeed>, output: Option<PathBuf>) -> InsightPoller {
        let vars: HashMap<&str, String> = HashMap::new();
        let mut config = Config::from_lookup(|key| vars.get(key).cloned()).unwrap();
        config.insight_output_path = output;
        let profiles = SeasonProfileState::new(
            Utc::now(),
            vec![
                profile("1", 99.0, 114.0),
                profile("2", 97.0, 110.0),
                profile("3", 101.0, 118.0),
            ],
        );
        InsightPoller::new(
            feed,
            InsightEngine::new(InsightConfig::default()),
            profiles,
            config,
        )
    }

    #[tokio::test]
    async fn test_tick_builds_and_writes_insights() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("insights.json");
        let feed = Arc::new(StubFeed::default());
        *feed.games.lock() = vec![snapshot("g1", "1", "2"), snapshot("g2", "3", "9")];

        let mut poller = poller(Arc::clone(&feed), Some(output.clone()));
        let insights = poller.tick().await.unwrap();

        // g2's away team has no profile and is skipped
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].game_id, "g1");
        assert_eq!(insights[0].supporting.line_change_since_tip, 6.0);

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written[0]["gameId"], "g1");
    }

    #[tokio::test]
    async fn test_finished_games_are_pruned() {
        let feed = Arc::new(StubFeed::default());
        *feed.games.lock() = vec![snapshot("g1", "1", "2"), snapshot("g3", "3", "1")];
        let mut poller = poller(Arc::clone(&feed), None);

        poller.tick().await.unwrap();
        assert_eq!(poller.engine().trackers().len(), 2);

        *feed.games.lock() = vec![snapshot("g3", "3", "1")];
        poller.tick().await.unwrap();
        assert_eq!(poller.engine().trackers().game_ids(), vec!["g3".to_string()]);
    }
}
