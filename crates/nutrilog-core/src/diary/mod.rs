mod entry;
mod totals;

pub use entry::{DailyLog, EntrySource, EntryType, FoodItem, Macros, ParsedEntry};
pub use totals::{
    calorie_percentage, calories_remaining, DailySummary, MacroProgress, NutritionTotals,
};
