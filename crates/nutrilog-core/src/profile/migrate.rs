//! Versioned migration for stored profile blobs.
//!
//! Profiles written by older builds (and by the browser app this format comes
//! from) may lack fields that were added later. Migrations run once, at load,
//! on the raw JSON and produce a fully-populated [`UserProfile`]. The
//! `schemaVersion` field tracks which migrations already ran.

use serde_json::{json, Map, Value};
use tracing::debug;

use super::types::{avatar_for, UserProfile};
use crate::error::StorageError;
use crate::fasting::DEFAULT_GOAL_HOURS;

/// Current profile schema version.
///
/// Increment this when adding new migrations.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Bring a stored profile up to the current schema and decode it.
///
/// # Errors
/// Returns [`StorageError::Corrupt`] if the blob is not a JSON object or still
/// does not decode after migration.
pub fn migrate_profile(raw: Value, key: &str) -> Result<UserProfile, StorageError> {
    let Value::Object(mut obj) = raw else {
        return Err(StorageError::Corrupt {
            key: key.to_string(),
            message: "profile is not a JSON object".into(),
        });
    };

    let version = obj
        .get("schemaVersion")
        .and_then(Value::as_u64)
        .unwrap_or(0);

    if version < 1 {
        migrate_v1(&mut obj);
    }

    serde_json::from_value(Value::Object(obj)).map_err(|e| StorageError::Corrupt {
        key: key.to_string(),
        message: e.to_string(),
    })
}

/// Migration v1: backfill fasting, weight history, weekly rate, theme and
/// avatar.
///
/// A weekly rate of zero is treated as missing.
fn migrate_v1(obj: &mut Map<String, Value>) {
    debug!("migrating stored profile to schema v1");

    if is_missing(obj.get("fasting")) {
        obj.insert(
            "fasting".into(),
            json!({
                "isFasting": false,
                "startTime": null,
                "endTime": null,
                "goalHours": DEFAULT_GOAL_HOURS,
            }),
        );
    }
    if is_missing(obj.get("weightHistory")) {
        obj.insert("weightHistory".into(), json!([]));
    }
    let rate = obj.get("weightLossRate").and_then(Value::as_f64);
    if !matches!(rate, Some(r) if r != 0.0) {
        obj.insert("weightLossRate".into(), json!(1.0));
    }
    if is_missing(obj.get("theme")) {
        obj.insert("theme".into(), json!("dark"));
    }
    if is_missing(obj.get("avatar")) {
        let name = obj.get("name").and_then(Value::as_str).unwrap_or_default();
        obj.insert("avatar".into(), json!(avatar_for(name)));
    }

    obj.insert("schemaVersion".into(), json!(1));
}

fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Theme;

    fn legacy_profile() -> Value {
        json!({
            "name": "Sam",
            "age": 41,
            "gender": "female",
            "heightFt": 5,
            "heightIn": 4,
            "currentWeight": 160,
            "goalWeight": 140,
            "activityLevel": "light",
            "regimen": "keto",
            "goals": { "calories": 1700, "protein": 120, "carbs": 40, "fat": 110 }
        })
    }

    #[test]
    fn legacy_profile_is_backfilled() {
        let profile = migrate_profile(legacy_profile(), "nutriai_profile").unwrap();
        assert!(!profile.fasting.is_fasting);
        assert_eq!(profile.fasting.start_time, None);
        assert_eq!(profile.fasting.goal_hours, 16.0);
        assert!(profile.weight_history.is_empty());
        assert_eq!(profile.weight_loss_rate, 1.0);
        assert_eq!(profile.theme, Theme::Dark);
        assert!(profile.avatar.ends_with("seed=Sam"));
        assert_eq!(profile.schema_version, CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn zero_rate_is_defaulted() {
        let mut raw = legacy_profile();
        raw["weightLossRate"] = json!(0);
        let profile = migrate_profile(raw, "nutriai_profile").unwrap();
        assert_eq!(profile.weight_loss_rate, 1.0);
    }

    #[test]
    fn existing_fields_are_preserved() {
        let mut raw = legacy_profile();
        raw["weightLossRate"] = json!(1.5);
        raw["theme"] = json!("light");
        raw["avatar"] = json!("data:image/png;base64,AAAA");
        raw["weightHistory"] = json!([{ "date": "2024-01-01", "weight": 161 }]);
        let profile = migrate_profile(raw, "nutriai_profile").unwrap();
        assert_eq!(profile.weight_loss_rate, 1.5);
        assert_eq!(profile.theme, Theme::Light);
        assert_eq!(profile.avatar, "data:image/png;base64,AAAA");
        assert_eq!(profile.weight_history.len(), 1);
    }

    #[test]
    fn non_object_is_corrupt() {
        let err = migrate_profile(json!([1, 2, 3]), "nutriai_profile").unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { .. }));
    }
}
