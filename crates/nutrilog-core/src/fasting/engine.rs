//! Fasting state machine.
//!
//! Like a wall-clock timer, the state only stores timestamps; everything
//! shown while a fast runs (elapsed time, stage, fill percentage) is derived
//! from `now` on demand. The caller decides how often to re-derive.
//!
//! ## State Transitions
//!
//! ```text
//! Idle --start--> Active --stop--> Idle
//! Active --adjust start--> Active
//! Idle --set goal hours--> Idle
//! ```
//!
//! Commands that do not apply to the current phase are no-ops returning
//! `None`; the caller is expected not to issue them.

use chrono::{DateTime, Days, Duration, Local, NaiveDateTime, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::stage::FastingStage;
use crate::clock::{now_ms, HOUR_MS};
use crate::events::Event;

/// Goal length for a fresh profile.
pub const DEFAULT_GOAL_HOURS: f64 = 16.0;

/// Goal lengths offered as one-tap presets.
pub const GOAL_PRESETS: [f64; 4] = [14.0, 16.0, 18.0, 20.0];

/// Longest goal accepted (one week).
pub const MAX_GOAL_HOURS: f64 = 168.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FastingPhase {
    Idle,
    Active,
}

/// Persisted fasting session.
///
/// When `is_fasting` is true, `start_time` is set and `end_time` is the
/// projected end. After a stop, `end_time` is the actual end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FastingState {
    pub is_fasting: bool,
    /// Epoch milliseconds.
    pub start_time: Option<i64>,
    /// Epoch milliseconds.
    pub end_time: Option<i64>,
    pub goal_hours: f64,
}

impl Default for FastingState {
    fn default() -> Self {
        Self {
            is_fasting: false,
            start_time: None,
            end_time: None,
            goal_hours: DEFAULT_GOAL_HOURS,
        }
    }
}

/// Values derived from an active fast at a given instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FastingProgress {
    pub elapsed_ms: i64,
    pub elapsed_hours: f64,
    /// 0..=100
    pub percentage: f64,
    pub stage: FastingStage,
    pub remaining_ms: i64,
    /// `H:MM:SS`
    pub elapsed_label: String,
}

impl FastingState {
    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> FastingPhase {
        if self.is_fasting && self.start_time.is_some() {
            FastingPhase::Active
        } else {
            FastingPhase::Idle
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase() == FastingPhase::Active
    }

    pub fn goal_ms(&self) -> i64 {
        (self.goal_hours * HOUR_MS as f64) as i64
    }

    /// Derive progress at `now_ms`. `None` while idle.
    pub fn progress_at(&self, now_ms: i64) -> Option<FastingProgress> {
        if !self.is_active() {
            return None;
        }
        let start = self.start_time?;
        let elapsed_ms = now_ms.saturating_sub(start).max(0);
        let elapsed_hours = elapsed_ms as f64 / HOUR_MS as f64;
        let goal_ms = self.goal_ms();
        let percentage = if goal_ms > 0 {
            (elapsed_ms as f64 / goal_ms as f64 * 100.0).min(100.0)
        } else {
            100.0
        };
        Some(FastingProgress {
            elapsed_ms,
            elapsed_hours,
            percentage,
            stage: FastingStage::from_elapsed_hours(elapsed_hours),
            remaining_ms: (goal_ms - elapsed_ms).max(0),
            elapsed_label: format_elapsed(elapsed_ms),
        })
    }

    pub fn progress(&self) -> Option<FastingProgress> {
        self.progress_at(now_ms())
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start_at(&mut self, now_ms: i64) -> Option<Event> {
        if self.is_active() {
            return None;
        }
        let end = now_ms + self.goal_ms();
        self.is_fasting = true;
        self.start_time = Some(now_ms);
        self.end_time = Some(end);
        debug!(start = now_ms, end, goal_hours = self.goal_hours, "fast started");
        Some(Event::FastStarted {
            start_time: now_ms,
            projected_end: end,
            goal_hours: self.goal_hours,
        })
    }

    pub fn start(&mut self) -> Option<Event> {
        self.start_at(now_ms())
    }

    /// End the fast. The projected end is overwritten with the actual end.
    pub fn stop_at(&mut self, now_ms: i64) -> Option<Event> {
        if !self.is_active() {
            return None;
        }
        let start = self.start_time?;
        self.is_fasting = false;
        self.end_time = Some(now_ms);
        debug!(start, end = now_ms, "fast ended");
        Some(Event::FastEnded {
            start_time: start,
            end_time: now_ms,
            elapsed_ms: now_ms.saturating_sub(start).max(0),
            goal_hours: self.goal_hours,
        })
    }

    pub fn stop(&mut self) -> Option<Event> {
        self.stop_at(now_ms())
    }

    /// Move the start of a running fast to `time` on the calendar day of
    /// `now`, or on the day before when that instant would lie in the future.
    pub fn adjust_start_at<Tz: TimeZone>(
        &mut self,
        time: NaiveTime,
        now: &DateTime<Tz>,
    ) -> Option<Event> {
        if !self.is_active() {
            return None;
        }
        let tz = now.timezone();
        let today = now.date_naive();
        let mut start = resolve_local(&tz, today.and_time(time))?;
        if start.timestamp_millis() > now.timestamp_millis() {
            let yesterday = today.checked_sub_days(Days::new(1))?;
            start = resolve_local(&tz, yesterday.and_time(time))?;
        }
        let start_ms = start.timestamp_millis();
        let end = start_ms + self.goal_ms();
        self.start_time = Some(start_ms);
        self.end_time = Some(end);
        debug!(start = start_ms, end, "fast start adjusted");
        Some(Event::FastStartAdjusted {
            start_time: start_ms,
            projected_end: end,
        })
    }

    pub fn adjust_start(&mut self, time: NaiveTime) -> Option<Event> {
        self.adjust_start_at(time, &Local::now())
    }

    /// Change the goal length. Only applies while idle; timestamps are left
    /// untouched.
    pub fn set_goal_hours(&mut self, hours: f64) -> Option<Event> {
        if self.is_active() {
            return None;
        }
        let previous = self.goal_hours;
        self.goal_hours = hours;
        Some(Event::FastGoalChanged {
            previous_hours: previous,
            goal_hours: hours,
        })
    }
}

/// Ambiguous wall-clock times take the earlier instant. A time skipped by a
/// DST jump is pushed forward one hour, past the gap.
fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(&naive).earliest().or_else(|| {
        let shifted = naive.checked_add_signed(Duration::hours(1))?;
        tz.from_local_datetime(&shifted).earliest()
    })
}

/// `H:MM:SS`, hours unbounded.
pub fn format_elapsed(ms: i64) -> String {
    let total_secs = ms.max(0) / 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs / 60) % 60;
    let seconds = total_secs % 60;
    format!("{hours}:{minutes:02}:{seconds:02}")
}
