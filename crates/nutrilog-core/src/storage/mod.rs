mod config;
pub mod database;
pub mod kv;
pub mod store;

pub use config::{AiConfig, Config, FastingConfig, LoggingConfig};
pub use database::Database;
pub use kv::{KvStore, MemoryStore};
pub use store::NutritionStore;

use std::path::PathBuf;

/// Storage key of the date-indexed daily logs.
pub const LOGS_KEY: &str = "nutriai_logs";
/// Storage key of the single user profile.
pub const PROFILE_KEY: &str = "nutriai_profile";
/// Storage key of the community feed.
pub const POSTS_KEY: &str = "nutriai_community_posts";

/// Returns the data directory, creating it if needed.
///
/// `NUTRILOG_HOME` overrides the location. Otherwise this is
/// `~/.config/nutrilog[-dev]/`, with NUTRILOG_ENV=dev selecting the
/// development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("NUTRILOG_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("NUTRILOG_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("nutrilog-dev")
            } else {
                base_dir.join("nutrilog")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
