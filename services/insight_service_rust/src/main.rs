mod config;
mod live_feed;
mod poller;
mod profiles;

use crate::config::Config;
use crate::live_feed::JsonSnapshotFeed;
use crate::poller::InsightPoller;
use crate::profiles::load_profiles;
use anyhow::{Context, Result};
use chrono::Utc;
use dotenv::dotenv;
use pace_pulse_core::InsightEngine;
use std::sync::Arc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    info!("Starting Pace Pulse insight service...");

    let config = Config::from_env().context("Invalid configuration")?;

    if !config.feature_betting_insight {
        warn!("FEATURE_BETTING_INSIGHT is off; not polling live games");
        wait_for_shutdown().await;
        return Ok(());
    }

    let profiles = load_profiles(&config, Utc::now()).context("Failed to load season profiles")?;
    info!("Loaded {} season profiles", profiles.len());

    info!("Data directory: {}", config.data_dir.display());
    let feed = Arc::new(JsonSnapshotFeed::new(config.live_snapshot_path.clone()));
    info!("Reading live snapshots from {}", feed.path().display());

    let engine = InsightEngine::new(config.insight.clone());
    let poll_interval = config.poll_interval;
    let mut poller = InsightPoller::new(feed, engine, profiles, config);

    let mut ticker = interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    info!("Insight loop started (interval: {}s)", poll_interval.as_secs());

    let shutdown = wait_for_shutdown();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match poller.tick().await {
                    Ok(insights) => info!("Rendered {} insights", insights.len()),
                    Err(e) => error!("Insight refresh failed: {:#}", e),
                }
            }
            _ = &mut shutdown => break,
        }
    }

    info!(
        "Shutting down with {} tracked games",
        poller.engine().trackers().len()
    );

    Ok(())
}

async fn wait_for_shutdown() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            info!("Received shutdown signal");
        }
        Err(err) => {
            error!("Unable to listen for shutdown signal: {}", err);
        }
    }
}
