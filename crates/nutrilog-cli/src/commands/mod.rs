pub mod chat;
pub mod community;
pub mod config;
pub mod fast;
pub mod log;
pub mod profile;
pub mod suggest;

use std::error::Error;

use nutrilog_core::ai::{self, DynAiService};
use nutrilog_core::clock::{date_key, parse_date_key, today_key};
use nutrilog_core::{Config, CoreError, Database, NutritionStore, UserProfile, ValidationError};
use serde::Serialize;

pub type CmdResult = Result<(), Box<dyn Error>>;

pub type Store = NutritionStore<Database>;

pub fn open_store() -> Result<Store, CoreError> {
    Ok(NutritionStore::new(Database::open()?))
}

/// The saved profile, or an error telling the user to onboard first.
pub fn require_profile(store: &Store) -> Result<UserProfile, Box<dyn Error>> {
    store
        .profile()?
        .ok_or_else(|| "no profile yet; run `nutrilog profile init` first".into())
}

pub fn ai_service() -> Result<DynAiService, CoreError> {
    let config = Config::load()?;
    Ok(ai::from_config(&config.ai))
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// `YYYY-MM-DD`, defaulting to today.
pub fn resolve_date(date: Option<String>) -> Result<String, ValidationError> {
    match date {
        None => Ok(today_key()),
        Some(d) => parse_date_key(&d).map(date_key).ok_or_else(|| {
            ValidationError::invalid("date", format!("expected YYYY-MM-DD, got '{d}'"))
        }),
    }
}
