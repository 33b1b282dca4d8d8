//! Daily nutrition aggregation.
//!
//! Food entries feed the calorie and macro totals; exercise entries feed a
//! separate burned-calorie accumulator that extends the day's budget. The
//! calorie fill percentage reflects food intake only and is capped at 100,
//! while the remaining figure is left unclamped so an over-budget day reads
//! negative.

use serde::{Deserialize, Serialize};

use super::entry::{DailyLog, EntryType, FoodItem};
use crate::profile::UserGoals;

/// Summed intake for a set of entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub exercise_calories: f64,
}

impl NutritionTotals {
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a FoodItem>) -> Self {
        items.into_iter().fold(Self::default(), |mut acc, item| {
            match item.entry_type {
                EntryType::Exercise => acc.exercise_calories += item.calories,
                EntryType::Food => {
                    acc.calories += item.calories;
                    acc.protein += item.macros.protein;
                    acc.carbs += item.macros.carbs;
                    acc.fat += item.macros.fat;
                }
            }
            acc
        })
    }

    pub fn from_log(log: &DailyLog) -> Self {
        Self::from_items(&log.items)
    }
}

/// Progress of one macro against its goal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroProgress {
    pub consumed: f64,
    pub goal: f64,
    /// goal - consumed; negative when over.
    pub remaining: f64,
    /// consumed / goal * 100, not capped.
    pub percentage: f64,
}

impl MacroProgress {
    pub fn new(consumed: f64, goal: f64) -> Self {
        Self {
            consumed,
            goal,
            remaining: goal - consumed,
            percentage: safe_percentage(consumed, goal),
        }
    }

    /// Percentage clamped into 0..=100 for progress bars.
    pub fn display_percentage(&self) -> f64 {
        self.percentage.clamp(0.0, 100.0)
    }
}

/// Everything the dashboard shows for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub date: String,
    pub totals: NutritionTotals,
    pub goals: UserGoals,
    pub calories_remaining: f64,
    pub calorie_percentage: f64,
    pub protein: MacroProgress,
    pub carbs: MacroProgress,
    pub fat: MacroProgress,
    pub entry_count: usize,
}

impl DailySummary {
    pub fn compute(log: &DailyLog, goals: &UserGoals) -> Self {
        let totals = NutritionTotals::from_log(log);
        Self {
            date: log.date.clone(),
            calories_remaining: calories_remaining(&totals, goals),
            calorie_percentage: calorie_percentage(&totals, goals),
            protein: MacroProgress::new(totals.protein, goals.protein),
            carbs: MacroProgress::new(totals.carbs, goals.carbs),
            fat: MacroProgress::new(totals.fat, goals.fat),
            entry_count: log.items.len(),
            totals,
            goals: *goals,
        }
    }

    pub fn is_over_budget(&self) -> bool {
        self.calories_remaining < 0.0
    }
}

/// `(goal + exercise) - eaten`. Unclamped.
pub fn calories_remaining(totals: &NutritionTotals, goals: &UserGoals) -> f64 {
    (goals.calories + totals.exercise_calories) - totals.calories
}

/// Food intake as a share of the calorie goal, capped at 100.
pub fn calorie_percentage(totals: &NutritionTotals, goals: &UserGoals) -> f64 {
    safe_percentage(totals.calories, goals.calories).min(100.0)
}

/// `part / whole * 100`, or 0 when the whole is not a positive number.
fn safe_percentage(part: f64, whole: f64) -> f64 {
    if whole > 0.0 && whole.is_finite() {
        part / whole * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diary::{EntrySource, Macros, ParsedEntry};

    fn goals() -> UserGoals {
        UserGoals {
            calories: 2000.0,
            protein: 150.0,
            carbs: 200.0,
            fat: 65.0,
        }
    }

    fn log_with(entries: Vec<ParsedEntry>) -> DailyLog {
        DailyLog {
            date: "2024-05-01".into(),
            items: entries
                .into_iter()
                .map(|e| e.into_item(EntrySource::Manual, 0, None))
                .collect(),
        }
    }

    #[test]
    fn empty_log_is_all_zero() {
        let totals = NutritionTotals::from_log(&DailyLog::empty("2024-05-01"));
        assert_eq!(totals, NutritionTotals::default());
        let summary = DailySummary::compute(&DailyLog::empty("2024-05-01"), &goals());
        assert_eq!(summary.calories_remaining, 2000.0);
        assert_eq!(summary.calorie_percentage, 0.0);
    }

    #[test]
    fn worked_example_with_exercise_credit() {
        let log = log_with(vec![
            ParsedEntry::food("Lunch", "1 plate", 1000.0, Macros::new(60.0, 100.0, 30.0)),
            ParsedEntry::food("Dinner", "1 plate", 500.0, Macros::new(40.0, 50.0, 20.0)),
            ParsedEntry::exercise("Running", "30 mins", 300.0),
        ]);
        let summary = DailySummary::compute(&log, &goals());
        assert_eq!(summary.totals.calories, 1500.0);
        assert_eq!(summary.totals.exercise_calories, 300.0);
        assert_eq!(summary.calories_remaining, 800.0);
        assert_eq!(summary.calorie_percentage, 75.0);
        assert_eq!(summary.protein.consumed, 100.0);
        assert_eq!(summary.protein.remaining, 50.0);
        assert!(!summary.is_over_budget());
    }

    #[test]
    fn over_budget_goes_negative_but_percentage_caps() {
        let log = log_with(vec![ParsedEntry::food(
            "Feast",
            "everything",
            2600.0,
            Macros::new(200.0, 300.0, 100.0),
        )]);
        let summary = DailySummary::compute(&log, &goals());
        assert_eq!(summary.calories_remaining, -600.0);
        assert_eq!(summary.calorie_percentage, 100.0);
        assert!(summary.is_over_budget());
        assert!(summary.fat.percentage > 100.0);
        assert_eq!(summary.fat.display_percentage(), 100.0);
    }

    #[test]
    fn zero_goals_do_not_produce_nan() {
        let zero = UserGoals {
            calories: 0.0,
            protein: 0.0,
            carbs: 0.0,
            fat: 0.0,
        };
        let log = log_with(vec![ParsedEntry::food("Snack", "1", 100.0, Macros::new(1.0, 1.0, 1.0))]);
        let summary = DailySummary::compute(&log, &zero);
        assert_eq!(summary.calorie_percentage, 0.0);
        assert_eq!(summary.protein.percentage, 0.0);
        assert_eq!(summary.calories_remaining, -100.0);
    }
}
