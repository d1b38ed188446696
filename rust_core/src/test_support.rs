// Shared fixtures for unit tests
use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::models::{GameClock, LiveLinePoint, LiveSnapshot, SeasonProfile, TeamBox};

pub fn profile(team_id: &str, pace: f64, pts_pg: f64) -> SeasonProfile {
    SeasonProfile {
        team_id: team_id.to_string(),
        team_name: format!("Team {}", team_id),
        season: "2024-25".to_string(),
        pace,
        pace_rank: 0,
        pts_pg,
        q1_share: 0.25,
        q2_share: 0.25,
        q3_share: 0.25,
        q4_share: 0.25,
        def_rating: 112.0,
        opp_pts_pg: 110.0,
        opp_efg_allowed: 0.54,
        opp_tov_forced_pct: 0.13,
        drb_pct: 0.72,
        opp_ft_rate_allowed: 0.2,
        psi: 0.0,
        tempo_clamp_rate: 0.0,
        def_drag_score: 50.0,
        transition_kill_rate: 0.5,
        late_slow_tendency: 0.4,
    }
}

pub fn snapshot(
    game_id: &str,
    quarter: u8,
    clock: &str,
    home_points: u32,
    away_points: u32,
    market_total: f64,
) -> LiveSnapshot {
    LiveSnapshot {
        game_id: game_id.to_string(),
        quarter,
        clock: clock.parse::<GameClock>().unwrap(),
        market_total,
        live_pace: None,
        rate_of_change: None,
        home: TeamBox {
            team_id: "h".to_string(),
            points: home_points,
            ..TeamBox::default()
        },
        away: TeamBox {
            team_id: "a".to_string(),
            points: away_points,
            ..TeamBox::default()
        },
        updated: None,
    }
}

pub fn tip_off() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 15, 0, 30, 0).unwrap()
}

/// Line history with one point per minute from tip-off.
pub fn history(totals: &[f64]) -> Vec<LiveLinePoint> {
    totals
        .iter()
        .enumerate()
        .map(|(i, &total)| LiveLinePoint {
            total,
            timestamp: tip_off() + Duration::minutes(i as i64),
        })
        .collect()
}
