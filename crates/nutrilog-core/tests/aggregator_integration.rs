//! Integration tests for daily totals and goal progress.

use nutrilog_core::diary::{DailyLog, DailySummary, EntrySource, Macros, ParsedEntry};
use nutrilog_core::UserGoals;
use proptest::prelude::*;

fn food(calories: f64, protein: f64, carbs: f64, fat: f64) -> nutrilog_core::FoodItem {
    ParsedEntry::food("Food", "1 serving", calories, Macros::new(protein, carbs, fat))
        .into_item(EntrySource::Manual, 0, None)
}

fn exercise(calories: f64) -> nutrilog_core::FoodItem {
    ParsedEntry::exercise("Run", "30 mins", calories).into_item(EntrySource::Calculator, 0, None)
}

fn goals() -> UserGoals {
    UserGoals {
        calories: 2000.0,
        protein: 150.0,
        carbs: 200.0,
        fat: 65.0,
    }
}

#[test]
fn test_mixed_day_summary() {
    let log = DailyLog {
        date: "2024-03-10".into(),
        items: vec![
            food(500.0, 30.0, 50.0, 10.0),
            exercise(300.0),
            food(1000.0, 40.0, 100.0, 30.0),
        ],
    };

    let summary = DailySummary::compute(&log, &goals());
    assert_eq!(summary.totals.calories, 1500.0);
    assert_eq!(summary.totals.exercise_calories, 300.0);
    assert_eq!(summary.calories_remaining, 800.0);
    assert_eq!(summary.calorie_percentage, 75.0);
    assert_eq!(summary.protein.consumed, 70.0);
    assert_eq!(summary.protein.remaining, 80.0);
    assert_eq!(summary.entry_count, 3);
    assert!(!summary.is_over_budget());
}

#[test]
fn test_over_budget_day() {
    let log = DailyLog {
        date: "2024-03-11".into(),
        items: vec![food(2600.0, 100.0, 300.0, 120.0)],
    };
    let summary = DailySummary::compute(&log, &goals());
    assert_eq!(summary.calories_remaining, -600.0);
    assert_eq!(summary.calorie_percentage, 100.0);
    assert!(summary.fat.percentage > 100.0);
    assert_eq!(summary.fat.display_percentage(), 100.0);
    assert!(summary.is_over_budget());
}

#[test]
fn test_summary_serializes_camel_case() {
    let summary = DailySummary::compute(&DailyLog::empty("2024-03-12"), &goals());
    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["caloriesRemaining"], 2000.0);
    assert_eq!(json["totals"]["exerciseCalories"], 0.0);
}

fn item_strategy() -> impl Strategy<Value = (bool, f64, f64, f64, f64)> {
    (
        any::<bool>(),
        0.0f64..2000.0,
        0.0f64..200.0,
        0.0f64..200.0,
        0.0f64..100.0,
    )
}

fn build_log(specs: &[(bool, f64, f64, f64, f64)]) -> DailyLog {
    DailyLog {
        date: "2024-01-01".into(),
        items: specs
            .iter()
            .map(|&(is_exercise, kcal, p, c, f)| {
                if is_exercise {
                    exercise(kcal)
                } else {
                    food(kcal, p, c, f)
                }
            })
            .collect(),
    }
}

proptest! {
    #[test]
    fn remaining_balances_goal_exercise_and_food(specs in prop::collection::vec(item_strategy(), 0..20)) {
        let log = build_log(&specs);
        let summary = DailySummary::compute(&log, &goals());

        let food_kcal: f64 = specs.iter().filter(|s| !s.0).map(|s| s.1).sum();
        let burned: f64 = specs.iter().filter(|s| s.0).map(|s| s.1).sum();
        let protein: f64 = specs.iter().filter(|s| !s.0).map(|s| s.2).sum();

        prop_assert!((summary.totals.calories - food_kcal).abs() < 1e-6);
        prop_assert!((summary.totals.exercise_calories - burned).abs() < 1e-6);
        prop_assert!((summary.totals.protein - protein).abs() < 1e-6);
        prop_assert!((summary.calories_remaining - (2000.0 + burned - food_kcal)).abs() < 1e-6);
        prop_assert!(summary.calorie_percentage >= 0.0 && summary.calorie_percentage <= 100.0);
    }

    #[test]
    fn adding_food_never_raises_remaining(
        specs in prop::collection::vec(item_strategy(), 0..10),
        extra in 0.0f64..1500.0,
    ) {
        let before = DailySummary::compute(&build_log(&specs), &goals());
        let mut log = build_log(&specs);
        log.items.push(food(extra, 0.0, 0.0, 0.0));
        let after = DailySummary::compute(&log, &goals());

        prop_assert!(after.calories_remaining <= before.calories_remaining + 1e-9);
        prop_assert!(after.calorie_percentage >= before.calorie_percentage);
    }

    #[test]
    fn adding_exercise_never_changes_macros(
        specs in prop::collection::vec(item_strategy(), 0..10),
        burned in 0.0f64..1000.0,
    ) {
        let before = DailySummary::compute(&build_log(&specs), &goals());
        let mut log = build_log(&specs);
        log.items.push(exercise(burned));
        let after = DailySummary::compute(&log, &goals());

        prop_assert_eq!(after.totals.protein, before.totals.protein);
        prop_assert_eq!(after.totals.calories, before.totals.calories);
        prop_assert!(after.calories_remaining >= before.calories_remaining);
    }

    #[test]
    fn non_positive_goals_never_produce_nan(calories in -100.0f64..=0.0) {
        let goals = UserGoals { calories, protein: 0.0, carbs: 0.0, fat: 0.0 };
        let summary = DailySummary::compute(&build_log(&[(false, 100.0, 5.0, 5.0, 5.0)]), &goals);
        prop_assert_eq!(summary.calorie_percentage, 0.0);
        prop_assert_eq!(summary.protein.percentage, 0.0);
        prop_assert!(summary.calories_remaining.is_finite());
    }
}
