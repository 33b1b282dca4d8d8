//! MET-based calories-burned calculator.
//!
//! `burned = MET × body weight (kg) × duration (h)`, rounded to whole
//! calories.

use serde::Serialize;

use crate::diary::ParsedEntry;
use crate::error::ValidationError;

const LBS_PER_KG: f64 = 2.20462;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Activity {
    pub name: &'static str,
    pub met: f64,
}

/// Activities offered by the calculator.
pub const ACTIVITIES: &[Activity] = &[
    Activity { name: "Walking (Moderate)", met: 3.5 },
    Activity { name: "Walking (Brisk)", met: 5.0 },
    Activity { name: "Running (5 mph)", met: 8.3 },
    Activity { name: "Running (6 mph)", met: 9.8 },
    Activity { name: "Cycling (Moderate)", met: 7.5 },
    Activity { name: "Swimming", met: 6.0 },
    Activity { name: "Weight Lifting", met: 3.5 },
    Activity { name: "HIIT Workout", met: 8.0 },
    Activity { name: "Yoga", met: 2.5 },
];

/// Case-insensitive lookup by exact name.
pub fn find_activity(name: &str) -> Option<&'static Activity> {
    ACTIVITIES.iter().find(|a| a.name.eq_ignore_ascii_case(name.trim()))
}

pub fn calories_burned(met: f64, weight_lbs: f64, minutes: u32) -> f64 {
    let weight_kg = weight_lbs / LBS_PER_KG;
    let hours = f64::from(minutes) / 60.0;
    (met * weight_kg * hours).round()
}

/// Build an exercise draft for `minutes` of `activity`.
///
/// # Errors
/// Rejects an unknown activity, a zero duration or a non-positive weight.
pub fn exercise_entry(activity: &str, minutes: u32, weight_lbs: f64) -> Result<ParsedEntry, ValidationError> {
    let activity = find_activity(activity)
        .ok_or_else(|| ValidationError::invalid("activity", format!("unknown activity '{activity}'")))?;
    if minutes == 0 {
        return Err(ValidationError::invalid("minutes", "must be greater than zero"));
    }
    if !(weight_lbs.is_finite() && weight_lbs > 0.0) {
        return Err(ValidationError::invalid("weight", "must be a positive number"));
    }
    Ok(ParsedEntry::exercise(
        activity.name,
        format!("{minutes} mins"),
        calories_burned(activity.met, weight_lbs, minutes),
    ))
}
