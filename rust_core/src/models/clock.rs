//! Basketball game clock.
//!
//! Converts (quarter, time remaining) into elapsed game minutes. Regulation is
//! four 12-minute quarters; every period after the fourth is a 5-minute
//! overtime.

use crate::error::ClockParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const QUARTER_MINUTES: f64 = 12.0;
pub const OVERTIME_MINUTES: f64 = 5.0;
pub const REGULATION_QUARTERS: u8 = 4;
pub const REGULATION_MINUTES: f64 = QUARTER_MINUTES * REGULATION_QUARTERS as f64;

/// Time remaining in the current period, as shown on the scoreboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GameClock {
    remaining_seconds: u32,
}

impl GameClock {
    pub fn from_seconds(remaining_seconds: u32) -> Self {
        Self { remaining_seconds }
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn remaining_minutes(&self) -> f64 {
        self.remaining_seconds as f64 / 60.0
    }
}

impl FromStr for GameClock {
    type Err = ClockParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let err = |reason| ClockParseError {
            raw: raw.to_string(),
            reason,
        };
        let (minutes, seconds) = raw.trim().split_once(':').ok_or_else(|| err("missing ':'"))?;
        let minutes: u32 = minutes.parse().map_err(|_| err("minutes not a number"))?;
        // Final-minute clocks come through with tenths ("0:42.3")
        let seconds: f64 = seconds.parse().map_err(|_| err("seconds not a number"))?;
        if !(0.0..60.0).contains(&seconds) {
            return Err(err("seconds out of range"));
        }
        let remaining_seconds = minutes
            .checked_mul(60)
            .and_then(|s| s.checked_add(seconds.floor() as u32))
            .ok_or_else(|| err("minutes out of range"))?;
        Ok(Self { remaining_seconds })
    }
}

impl TryFrom<String> for GameClock {
    type Error = ClockParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GameClock> for String {
    fn from(clock: GameClock) -> Self {
        clock.to_string()
    }
}

impl fmt::Display for GameClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{:02}",
            self.remaining_seconds / 60,
            self.remaining_seconds % 60
        )
    }
}

/// Length of a period in minutes.
pub fn period_minutes(quarter: u8) -> f64 {
    if quarter > REGULATION_QUARTERS {
        OVERTIME_MINUTES
    } else {
        QUARTER_MINUTES
    }
}

/// Minutes the game is scheduled to last as of `quarter` (48 in regulation,
/// +5 per overtime).
pub fn scheduled_minutes(quarter: u8) -> f64 {
    let overtimes = quarter.saturating_sub(REGULATION_QUARTERS) as f64;
    REGULATION_MINUTES + overtimes * OVERTIME_MINUTES
}

/// Game-clock minutes elapsed at (quarter, clock).
pub fn elapsed_minutes(quarter: u8, clock: &GameClock) -> f64 {
    if quarter == 0 {
        return 0.0;
    }
    let length = period_minutes(quarter);
    let in_period = (length - clock.remaining_minutes().min(length)).max(0.0);

    let completed = if quarter > REGULATION_QUARTERS {
        REGULATION_MINUTES + (quarter - REGULATION_QUARTERS - 1) as f64 * OVERTIME_MINUTES
    } else {
        (quarter - 1) as f64 * QUARTER_MINUTES
    };

    completed + in_period
}

/// Fraction of regulation played, clamped to [0, 1].
pub fn game_progress(elapsed_minutes: f64) -> f64 {
    (elapsed_minutes / REGULATION_MINUTES).clamp(0.0, 1.0)
}
