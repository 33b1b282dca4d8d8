//! Weight history and goal-date projection.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Most recent entries kept in a profile's weight history.
pub const WEIGHT_HISTORY_CAP: usize = 30;

/// Weights this close to the goal count as reached (lbs).
pub const GOAL_TOLERANCE: f64 = 0.1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    /// `YYYY-MM-DD` label of the day the weight was recorded.
    pub date: String,
    pub weight: f64,
}

/// Append a weight, evicting the oldest entries beyond [`WEIGHT_HISTORY_CAP`].
pub fn push_weight(history: &mut Vec<WeightEntry>, date: NaiveDate, weight: f64) {
    history.push(WeightEntry {
        date: crate::clock::date_key(date),
        weight,
    });
    if history.len() > WEIGHT_HISTORY_CAP {
        let excess = history.len() - WEIGHT_HISTORY_CAP;
        history.drain(..excess);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Lose,
    Gain,
}

/// Outcome of projecting when the goal weight will be reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Projection {
    GoalReached,
    OnTrack {
        direction: Direction,
        weeks_remaining: f64,
        date: NaiveDate,
        /// e.g. "March 3, 2025"
        label: String,
    },
}

/// Project the goal date from `today`.
///
/// A weekly rate that is zero, negative or not finite is treated as 1 lb/week.
/// Fractional days are truncated, so 2.5 weeks is 17 days out.
pub fn project_goal_date(
    current_weight: f64,
    goal_weight: f64,
    weekly_rate: f64,
    today: NaiveDate,
) -> Projection {
    let diff = (current_weight - goal_weight).abs();
    if diff <= GOAL_TOLERANCE {
        return Projection::GoalReached;
    }

    let rate = if weekly_rate.is_finite() && weekly_rate > 0.0 {
        weekly_rate
    } else {
        1.0
    };
    let weeks_remaining = diff / rate;
    let days = (weeks_remaining * 7.0).trunc() as i64;
    let date = today + Duration::days(days);
    let direction = if goal_weight > current_weight {
        Direction::Gain
    } else {
        Direction::Lose
    };

    Projection::OnTrack {
        direction,
        weeks_remaining,
        date,
        label: date.format("%B %-d, %Y").to_string(),
    }
}
