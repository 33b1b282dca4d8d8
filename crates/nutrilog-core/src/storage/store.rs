//! Typed access to the three stored collections.
//!
//! [`NutritionStore`] wraps any [`KvStore`] and is the only place that knows
//! how logs, the profile and posts are laid out as JSON. Every operation
//! reads, changes a value in memory and writes it back with a single `set`,
//! so a failure before the write leaves the stored value untouched.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use super::kv::KvStore;
use super::{LOGS_KEY, POSTS_KEY, PROFILE_KEY};
use crate::clock::now_ms;
use crate::community::{self, CommunityPost};
use crate::diary::{DailyLog, FoodItem};
use crate::error::{Result, StorageError};
use crate::events::Event;
use crate::profile::{migrate_profile, push_weight, UserProfile, CURRENT_SCHEMA_VERSION};

/// Date-indexed daily logs as stored under [`LOGS_KEY`].
pub type LogBook = BTreeMap<String, DailyLog>;

pub struct NutritionStore<S> {
    kv: S,
}

impl<S: KvStore> NutritionStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    pub fn kv(&self) -> &S {
        &self.kv
    }

    fn read_raw(&self, key: &str) -> Result<Option<serde_json::Value>> {
        match self.kv.get(key)? {
            Some(text) => {
                let value = serde_json::from_str(&text).map_err(|e| StorageError::Corrupt {
                    key: key.to_string(),
                    message: e.to_string(),
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.read_raw(key)? {
            Some(value) => {
                let decoded = serde_json::from_value(value).map_err(|e| StorageError::Corrupt {
                    key: key.to_string(),
                    message: e.to_string(),
                })?;
                Ok(Some(decoded))
            }
            None => Ok(None),
        }
    }

    fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let text = serde_json::to_string(value)?;
        self.kv.set(key, &text)?;
        Ok(())
    }

    // ── Daily logs ───────────────────────────────────────────────────

    pub fn logs(&self) -> Result<LogBook> {
        Ok(self.read(LOGS_KEY)?.unwrap_or_default())
    }

    /// The log for `date`, or an empty one. Reading never creates a log.
    pub fn log_for_date(&self, date: &str) -> Result<DailyLog> {
        let mut logs = self.logs()?;
        Ok(logs.remove(date).unwrap_or_else(|| DailyLog::empty(date)))
    }

    /// Append an item to the log of `date`, creating the log if absent.
    pub fn save_log_item(&self, item: FoodItem, date: &str) -> Result<(DailyLog, Event)> {
        let mut logs = self.logs()?;
        let event = Event::EntryLogged {
            date: date.to_string(),
            id: item.id.clone(),
            name: item.name.clone(),
            entry_type: item.entry_type,
            calories: item.calories,
        };
        let log = logs
            .entry(date.to_string())
            .or_insert_with(|| DailyLog::empty(date));
        log.items.push(item);
        let log = log.clone();
        self.write(LOGS_KEY, &logs)?;
        debug!(date, items = log.items.len(), "log item saved");
        Ok((log, event))
    }

    /// Remove the item `id` from the log of `date`. `None` when nothing matched.
    pub fn delete_log_item(&self, id: &str, date: &str) -> Result<Option<Event>> {
        let mut logs = self.logs()?;
        let Some(log) = logs.get_mut(date) else {
            return Ok(None);
        };
        let before = log.items.len();
        log.items.retain(|item| item.id != id);
        if log.items.len() == before {
            return Ok(None);
        }
        self.write(LOGS_KEY, &logs)?;
        Ok(Some(Event::EntryDeleted {
            date: date.to_string(),
            id: id.to_string(),
        }))
    }

    // ── Profile ──────────────────────────────────────────────────────

    /// The stored profile, migrated to the current schema.
    ///
    /// `None` means onboarding has not happened yet. A profile stored under an
    /// older schema is written back once in its migrated form.
    pub fn profile(&self) -> Result<Option<UserProfile>> {
        let Some(raw) = self.read_raw(PROFILE_KEY)? else {
            return Ok(None);
        };
        let stored_version = raw
            .get("schemaVersion")
            .and_then(serde_json::Value::as_u64)
            .unwrap_or(0);
        let profile = migrate_profile(raw, PROFILE_KEY)?;
        if stored_version < u64::from(CURRENT_SCHEMA_VERSION) {
            info!(from = stored_version, to = CURRENT_SCHEMA_VERSION, "profile schema migrated");
            self.write(PROFILE_KEY, &profile)?;
        }
        Ok(Some(profile))
    }

    /// Save the profile, recording a weight entry dated `today` when the
    /// current weight differs from the stored one.
    ///
    /// # Errors
    /// Validation errors are returned before anything is written.
    pub fn save_profile_on(
        &self,
        mut profile: UserProfile,
        today: NaiveDate,
    ) -> Result<(UserProfile, Event)> {
        profile.validate()?;
        let previous = self.profile()?;
        let weight_recorded = match previous {
            Some(ref old) if old.current_weight != profile.current_weight => {
                push_weight(&mut profile.weight_history, today, profile.current_weight);
                true
            }
            _ => false,
        };
        profile.schema_version = CURRENT_SCHEMA_VERSION;
        self.write(PROFILE_KEY, &profile)?;
        debug!(weight_recorded, "profile saved");
        let event = Event::ProfileSaved {
            name: profile.name.clone(),
            weight_recorded,
        };
        Ok((profile, event))
    }

    pub fn save_profile(&self, profile: UserProfile) -> Result<(UserProfile, Event)> {
        self.save_profile_on(profile, chrono::Local::now().date_naive())
    }

    // ── Community ────────────────────────────────────────────────────

    /// The feed, newest first. An absent feed is seeded and written.
    pub fn posts(&self) -> Result<Vec<CommunityPost>> {
        match self.read(POSTS_KEY)? {
            Some(posts) => Ok(posts),
            None => {
                let seeded = community::seed_posts(now_ms());
                self.write(POSTS_KEY, &seeded)?;
                Ok(seeded)
            }
        }
    }

    pub fn save_post(&self, post: CommunityPost) -> Result<(Vec<CommunityPost>, Event)> {
        let mut posts = self.posts()?;
        let event = Event::PostCreated {
            id: post.id.clone(),
        };
        posts.insert(0, post);
        self.write(POSTS_KEY, &posts)?;
        Ok((posts, event))
    }

    pub fn toggle_like(&self, id: &str) -> Result<(Vec<CommunityPost>, Option<Event>)> {
        let mut posts = self.posts()?;
        let event = community::toggle_like(&mut posts, id);
        if event.is_some() {
            self.write(POSTS_KEY, &posts)?;
        }
        Ok((posts, event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diary::{EntrySource, Macros, ParsedEntry};
    use crate::error::{CoreError, ValidationError};
    use crate::profile::{ActivityLevel, Gender, ProfileDraft, Regimen, UserGoals};
    use crate::storage::MemoryStore;

    fn store() -> NutritionStore<MemoryStore> {
        NutritionStore::new(MemoryStore::new())
    }

    fn profile(weight: f64) -> UserProfile {
        UserProfile::from_draft(
            ProfileDraft {
                name: "Jo".into(),
                age: 29,
                gender: Gender::Female,
                height_ft: 5,
                height_in: 6,
                current_weight: weight,
                goal_weight: 140.0,
                weight_loss_rate: 1.0,
                activity_level: ActivityLevel::Active,
                regimen: Regimen::Balanced,
            },
            UserGoals::FALLBACK,
        )
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, d).unwrap()
    }

    fn item(name: &str, calories: f64) -> FoodItem {
        ParsedEntry::food(name, "1", calories, Macros::default()).into_item(EntrySource::Manual, 0, None)
    }

    #[test]
    fn reading_missing_log_does_not_create_it() {
        let s = store();
        let log = s.log_for_date("2024-02-01").unwrap();
        assert!(log.items.is_empty());
        assert!(s.kv().is_empty());
    }

    #[test]
    fn save_and_delete_items() {
        let s = store();
        let a = item("Eggs", 140.0);
        let a_id = a.id.clone();
        s.save_log_item(a, "2024-02-01").unwrap();
        let (log, _) = s.save_log_item(item("Toast", 80.0), "2024-02-01").unwrap();
        assert_eq!(log.items.len(), 2);
        assert_eq!(log.items[0].name, "Eggs");

        assert!(s.delete_log_item(&a_id, "2024-02-01").unwrap().is_some());
        assert!(s.delete_log_item(&a_id, "2024-02-01").unwrap().is_none());
        assert!(s.delete_log_item("x", "2030-01-01").unwrap().is_none());
        assert_eq!(s.log_for_date("2024-02-01").unwrap().items.len(), 1);
    }

    #[test]
    fn missing_profile_is_none() {
        assert!(store().profile().unwrap().is_none());
    }

    #[test]
    fn first_save_does_not_record_weight() {
        let s = store();
        let (saved, event) = s.save_profile_on(profile(180.0), day(1)).unwrap();
        assert!(saved.weight_history.is_empty());
        assert_eq!(
            event,
            Event::ProfileSaved {
                name: "Jo".into(),
                weight_recorded: false
            }
        );
    }

    #[test]
    fn weight_change_appends_exactly_one_entry() {
        let s = store();
        s.save_profile_on(profile(180.0), day(1)).unwrap();

        let same = s.profile().unwrap().unwrap();
        let (saved, _) = s.save_profile_on(same, day(2)).unwrap();
        assert!(saved.weight_history.is_empty());

        let mut lighter = s.profile().unwrap().unwrap();
        lighter.current_weight = 178.5;
        let (saved, _) = s.save_profile_on(lighter, day(3)).unwrap();
        assert_eq!(saved.weight_history.len(), 1);
        assert_eq!(saved.weight_history[0].date, "2024-02-03");
        assert_eq!(saved.weight_history[0].weight, 178.5);
    }

    #[test]
    fn invalid_profile_leaves_stored_value_intact() {
        let s = store();
        s.save_profile_on(profile(180.0), day(1)).unwrap();
        let before = s.kv().get(PROFILE_KEY).unwrap();

        let mut bad = s.profile().unwrap().unwrap();
        bad.current_weight = -5.0;
        let err = s.save_profile_on(bad, day(2)).unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::InvalidValue { .. })));
        assert_eq!(s.kv().get(PROFILE_KEY).unwrap(), before);
    }

    #[test]
    fn legacy_profile_is_migrated_and_written_back() {
        let s = store();
        s.kv()
            .set(
                PROFILE_KEY,
                r#"{"name":"Lee","age":50,"gender":"male","heightFt":6,"heightIn":0,
                    "currentWeight":210,"goalWeight":190,"activityLevel":"sedentary",
                    "regimen":"low-carb","goals":{"calories":2100,"protein":160,"carbs":120,"fat":90}}"#,
            )
            .unwrap();
        let profile = s.profile().unwrap().unwrap();
        assert_eq!(profile.weight_loss_rate, 1.0);
        let stored: serde_json::Value =
            serde_json::from_str(&s.kv().get(PROFILE_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(stored["schemaVersion"], 1);
        assert_eq!(stored["fasting"]["goalHours"], 16.0);
    }

    #[test]
    fn corrupt_logs_surface_as_storage_error() {
        let s = store();
        s.kv().set(LOGS_KEY, "not json").unwrap();
        let err = s.logs().unwrap_err();
        assert!(matches!(err, CoreError::Storage(StorageError::Corrupt { .. })));
    }

    #[test]
    fn posts_are_seeded_once_then_prepended() {
        let s = store();
        let seeded = s.posts().unwrap();
        assert_eq!(seeded.len(), 2);
        assert!(s.kv().get(POSTS_KEY).unwrap().is_some());

        let post = CommunityPost::status("Jo", "First week done", now_ms()).unwrap();
        let (posts, _) = s.save_post(post).unwrap();
        assert_eq!(posts.len(), 3);
        assert_eq!(posts[0].content, "First week done");

        let (posts, event) = s.toggle_like("p1").unwrap();
        assert!(event.is_some());
        assert_eq!(posts.iter().find(|p| p.id == "p1").unwrap().likes, 25);
        assert_eq!(s.posts().unwrap()[1].likes, 25);
    }
}
