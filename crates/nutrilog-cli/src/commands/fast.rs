//! Fasting timer commands.
//!
//! The fasting state lives inside the profile, so every command loads the
//! profile, applies one transition and saves it back. Transitions that do not
//! apply to the current state print a notice and leave the profile untouched.

use std::io::Write;

use chrono::NaiveTime;
use clap::Subcommand;
use nutrilog_core::fasting::{FastingTicker, GOAL_PRESETS, MAX_GOAL_HOURS, TICK_PERIOD};
use nutrilog_core::{Event, FastingState, ValidationError};
use serde::Serialize;

use super::{open_store, print_json, require_profile, CmdResult, Store};

#[derive(Subcommand)]
pub enum FastAction {
    /// Start fasting now
    Start,
    /// End the current fast
    Stop,
    /// Move the start of the current fast to a time of day (HH:MM)
    Adjust {
        #[arg(value_parser = parse_time)]
        time: NaiveTime,
    },
    /// Set the goal length in hours (while not fasting)
    Goal { hours: f64 },
    /// Print the fasting state and progress
    Status,
    /// Show live progress until interrupted
    Watch,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FastingStatus<'a> {
    #[serde(flatten)]
    state: &'a FastingState,
    #[serde(skip_serializing_if = "Option::is_none")]
    progress: Option<nutrilog_core::FastingProgress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stage_label: Option<&'static str>,
    goal_presets: &'static [f64],
}

fn parse_time(value: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| format!("expected HH:MM, got '{value}'"))
}

fn validate_goal_hours(hours: f64) -> Result<f64, ValidationError> {
    if hours.is_finite() && hours > 0.0 && hours <= MAX_GOAL_HOURS {
        Ok(hours)
    } else {
        Err(ValidationError::invalid(
            "goalHours",
            format!("must be in (0, {MAX_GOAL_HOURS}]"),
        ))
    }
}

/// Apply a transition to the stored fasting state and persist it.
fn transition<F>(store: &Store, notice: &str, apply: F) -> CmdResult
where
    F: FnOnce(&mut FastingState) -> Option<Event>,
{
    let mut profile = require_profile(store)?;
    match apply(&mut profile.fasting) {
        Some(event) => {
            store.save_profile(profile)?;
            print_json(&event)?;
        }
        None => eprintln!("{notice}"),
    }
    Ok(())
}

fn print_status(state: &FastingState) -> CmdResult {
    let progress = state.progress();
    let stage_label = progress.as_ref().map(|p| p.stage.label());
    print_json(&FastingStatus {
        state,
        progress,
        stage_label,
        goal_presets: &GOAL_PRESETS,
    })?;
    Ok(())
}

pub async fn run(action: FastAction) -> CmdResult {
    let store = open_store()?;

    match action {
        FastAction::Start => transition(&store, "already fasting", FastingState::start)?,
        FastAction::Stop => transition(&store, "not fasting", FastingState::stop)?,
        FastAction::Adjust { time } => {
            transition(&store, "not fasting", |state| state.adjust_start(time))?
        }
        FastAction::Goal { hours } => {
            let hours = validate_goal_hours(hours)?;
            transition(&store, "stop the current fast before changing its goal", |state| {
                state.set_goal_hours(hours)
            })?
        }
        FastAction::Status => {
            let profile = require_profile(&store)?;
            print_status(&profile.fasting)?;
        }
        FastAction::Watch => {
            let profile = require_profile(&store)?;
            if !profile.fasting.is_active() {
                eprintln!("not fasting");
                return Ok(());
            }
            let ticker = FastingTicker::spawn(profile.fasting, TICK_PERIOD, |p| {
                let mut out = std::io::stdout();
                let _ = write!(
                    out,
                    "\r{}  {:>5.1}%  {}   ",
                    p.elapsed_label,
                    p.percentage,
                    p.stage.label()
                );
                let _ = out.flush();
            });
            tokio::signal::ctrl_c().await?;
            ticker.cancel();
            println!();
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_accepts_hours_and_minutes() {
        assert_eq!(parse_time("20:30").unwrap(), NaiveTime::from_hms_opt(20, 30, 0).unwrap());
        assert!(parse_time("8pm").is_err());
    }

    #[test]
    fn goal_hours_bounds() {
        assert!(validate_goal_hours(16.0).is_ok());
        assert!(validate_goal_hours(168.0).is_ok());
        assert!(validate_goal_hours(0.0).is_err());
        assert!(validate_goal_hours(-4.0).is_err());
        assert!(validate_goal_hours(200.0).is_err());
        assert!(validate_goal_hours(f64::NAN).is_err());
    }
}
