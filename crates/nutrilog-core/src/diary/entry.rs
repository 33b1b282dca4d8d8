use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Macro-nutrient breakdown in grams.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Macros {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl Macros {
    pub fn new(protein: f64, carbs: f64, fat: f64) -> Self {
        Self { protein, carbs, fat }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Food,
    /// Calories are burned, not eaten. They extend the day's budget.
    Exercise,
}

/// Where a log entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntrySource {
    Manual,
    AiText,
    AiImage,
    Calculator,
}

/// A single logged food or exercise entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodItem {
    pub id: String,
    pub name: String,
    /// e.g. "1 cup", "100g", "30 mins"
    pub portion: String,
    pub calories: f64,
    pub macros: Macros,
    /// Epoch milliseconds.
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub source: EntrySource,
}

impl FoodItem {
    pub fn is_exercise(&self) -> bool {
        self.entry_type == EntryType::Exercise
    }
}

/// Draft entry as produced by a parser or calculator, before it is logged.
///
/// Drafts are freely editable; an id, timestamp and source are attached by
/// [`ParsedEntry::into_item`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedEntry {
    pub name: String,
    pub portion: String,
    pub calories: f64,
    #[serde(rename = "type", default = "default_entry_type")]
    pub entry_type: EntryType,
    #[serde(default)]
    pub macros: Macros,
}

fn default_entry_type() -> EntryType {
    EntryType::Food
}

impl ParsedEntry {
    pub fn food(name: impl Into<String>, portion: impl Into<String>, calories: f64, macros: Macros) -> Self {
        Self {
            name: name.into(),
            portion: portion.into(),
            calories,
            entry_type: EntryType::Food,
            macros,
        }
    }

    pub fn exercise(name: impl Into<String>, portion: impl Into<String>, calories: f64) -> Self {
        Self {
            name: name.into(),
            portion: portion.into(),
            calories,
            entry_type: EntryType::Exercise,
            macros: Macros::default(),
        }
    }

    /// Reject drafts that cannot be logged.
    ///
    /// # Errors
    /// Returns a validation error for a blank name or a negative/non-finite
    /// calorie or macro value.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyText("name".into()));
        }
        let fields = [
            ("calories", self.calories),
            ("protein", self.macros.protein),
            ("carbs", self.macros.carbs),
            ("fat", self.macros.fat),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ValidationError::invalid(field, "must be a non-negative number"));
            }
        }
        Ok(())
    }

    /// Stamp the draft into a loggable item.
    ///
    /// Exercise entries never carry macros, whatever the draft said.
    pub fn into_item(self, source: EntrySource, timestamp: i64, image: Option<String>) -> FoodItem {
        let macros = match self.entry_type {
            EntryType::Food => self.macros,
            EntryType::Exercise => Macros::default(),
        };
        FoodItem {
            id: uuid::Uuid::new_v4().to_string(),
            name: self.name,
            portion: self.portion,
            calories: self.calories,
            macros,
            timestamp,
            image,
            entry_type: self.entry_type,
            source,
        }
    }
}

/// All entries for one local calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLog {
    /// `YYYY-MM-DD`
    pub date: String,
    #[serde(default)]
    pub items: Vec<FoodItem>,
}

impl DailyLog {
    pub fn empty(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            items: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn food_item_uses_browser_field_names() {
        let item = ParsedEntry::food("Oatmeal", "1 cup", 150.0, Macros::new(5.0, 27.0, 3.0))
            .into_item(EntrySource::AiText, 1_700_000_000_000, None);
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "food");
        assert_eq!(json["source"], "ai-text");
        assert_eq!(json["timestamp"], 1_700_000_000_000_i64);
        assert!(json.get("image").is_none());
    }

    #[test]
    fn exercise_drafts_drop_macros_when_logged() {
        let mut draft = ParsedEntry::exercise("Running", "30 mins", 300.0);
        draft.macros = Macros::new(1.0, 1.0, 1.0);
        let item = draft.into_item(EntrySource::Calculator, 0, None);
        assert!(item.is_exercise());
        assert_eq!(item.macros, Macros::default());
    }

    #[test]
    fn parsed_entry_defaults_missing_type_to_food() {
        let draft: ParsedEntry = serde_json::from_str(
            r#"{"name":"Apple","portion":"1 medium","calories":95,"macros":{"protein":0.5,"carbs":25,"fat":0.3}}"#,
        )
        .unwrap();
        assert_eq!(draft.entry_type, EntryType::Food);
    }

    #[test]
    fn validate_rejects_negative_calories() {
        let draft = ParsedEntry::food("Toast", "1 slice", -10.0, Macros::default());
        assert!(draft.validate().is_err());
        let blank = ParsedEntry::food("  ", "1 slice", 10.0, Macros::default());
        assert_eq!(blank.validate(), Err(ValidationError::EmptyText("name".into())));
    }
}
