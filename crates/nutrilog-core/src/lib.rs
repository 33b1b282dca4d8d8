//! # NutriLog Core Library
//!
//! Core logic for the NutriLog nutrition and fasting tracker. Everything the
//! app does is available through the `nutrilog` CLI, which is a thin layer over
//! this crate.
//!
//! ## Architecture
//!
//! - **Diary**: food and exercise entries grouped by calendar day, with a pure
//!   aggregator computing totals and goal progress
//! - **Profile**: onboarding attributes, daily goals, weight history and the
//!   goal-date projection
//! - **Fasting**: a wall-clock state machine. Progress is recomputed from the
//!   start time whenever it is read, so nothing drifts while the app is closed
//! - **Storage**: JSON blobs in a SQLite key-value table plus TOML
//!   configuration
//! - **AI**: capability traits for goal generation, entry parsing and the
//!   coach chat, with a Gemini backend and a fallback policy
//!
//! ## Key Components
//!
//! - [`NutritionStore`]: persistence of logs, profile and community posts
//! - [`DailySummary`]: per-day totals against goals
//! - [`FastingState`]: fasting state machine
//! - [`Config`]: application configuration management

pub mod ai;
pub mod clock;
pub mod community;
pub mod diary;
pub mod error;
pub mod events;
pub mod exercise;
pub mod fasting;
pub mod profile;
pub mod storage;

pub use community::{CommunityPost, PostType};
pub use diary::{DailyLog, DailySummary, EntrySource, EntryType, FoodItem, Macros, ParsedEntry};
pub use error::{ConfigError, CoreError, ServiceError, StorageError, ValidationError};
pub use events::Event;
pub use fasting::{FastingProgress, FastingStage, FastingState};
pub use profile::{ProfileDraft, Projection, UserGoals, UserProfile, WeightEntry};
pub use storage::{Config, Database, KvStore, NutritionStore};
