mod migrate;
mod types;
mod weight;

pub use migrate::{migrate_profile, CURRENT_SCHEMA_VERSION};
pub use types::{
    avatar_for, ActivityLevel, Gender, ProfileDraft, Regimen, Theme, UserGoals, UserProfile,
};
pub use weight::{
    project_goal_date, push_weight, Direction, Projection, WeightEntry, GOAL_TOLERANCE,
    WEIGHT_HISTORY_CAP,
};
