use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::weight::WeightEntry;
use crate::error::ValidationError;
use crate::fasting::FastingState;

/// Daily intake targets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UserGoals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl UserGoals {
    /// Targets used whenever plan generation fails.
    pub const FALLBACK: UserGoals = UserGoals {
        calories: 2000.0,
        protein: 150.0,
        carbs: 200.0,
        fat: 65.0,
    };
}

impl Default for UserGoals {
    fn default() -> Self {
        Self::FALLBACK
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    Athlete,
}

/// Diet style. Only goal generation looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Regimen {
    Balanced,
    LowCarb,
    Keto,
    HighProtein,
    Vegan,
    IntermittentFasting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
        }
    }
}

impl ActivityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sedentary => "sedentary",
            Self::Light => "light",
            Self::Moderate => "moderate",
            Self::Active => "active",
            Self::Athlete => "athlete",
        }
    }
}

impl Regimen {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Balanced => "balanced",
            Self::LowCarb => "low-carb",
            Self::Keto => "keto",
            Self::HighProtein => "high-protein",
            Self::Vegan => "vegan",
            Self::IntermittentFasting => "intermittent-fasting",
        }
    }
}

impl FromStr for Gender {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            "other" => Ok(Self::Other),
            _ => Err(ValidationError::invalid("gender", format!("unknown gender '{s}'"))),
        }
    }
}

impl FromStr for ActivityLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sedentary" => Ok(Self::Sedentary),
            "light" => Ok(Self::Light),
            "moderate" => Ok(Self::Moderate),
            "active" => Ok(Self::Active),
            "athlete" => Ok(Self::Athlete),
            _ => Err(ValidationError::invalid(
                "activityLevel",
                format!("unknown activity level '{s}'"),
            )),
        }
    }
}

impl FromStr for Regimen {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "balanced" => Ok(Self::Balanced),
            "low-carb" => Ok(Self::LowCarb),
            "keto" => Ok(Self::Keto),
            "high-protein" => Ok(Self::HighProtein),
            "vegan" => Ok(Self::Vegan),
            "intermittent-fasting" => Ok(Self::IntermittentFasting),
            _ => Err(ValidationError::invalid("regimen", format!("unknown regimen '{s}'"))),
        }
    }
}

/// Attributes collected during onboarding, before goals exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDraft {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub height_ft: u32,
    pub height_in: u32,
    /// lbs
    pub current_weight: f64,
    /// lbs
    pub goal_weight: f64,
    /// lbs per week
    pub weight_loss_rate: f64,
    pub activity_level: ActivityLevel,
    pub regimen: Regimen,
}

impl ProfileDraft {
    pub fn is_gaining(&self) -> bool {
        self.goal_weight > self.current_weight
    }

    /// # Errors
    /// Rejects negative weights, a non-positive weekly rate and a blank name.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyText("name".into()));
        }
        validate_weights(self.current_weight, self.goal_weight)?;
        if !(self.weight_loss_rate.is_finite() && self.weight_loss_rate > 0.0) {
            return Err(ValidationError::invalid(
                "weightLossRate",
                "must be a positive number",
            ));
        }
        Ok(())
    }
}

/// The single user profile of an installation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub avatar: String,
    pub age: u32,
    pub gender: Gender,
    pub height_ft: u32,
    pub height_in: u32,
    pub current_weight: f64,
    pub goal_weight: f64,
    pub weight_loss_rate: f64,
    pub activity_level: ActivityLevel,
    pub regimen: Regimen,
    pub goals: UserGoals,
    pub theme: Theme,
    pub fasting: FastingState,
    pub weight_history: Vec<WeightEntry>,
    pub schema_version: u32,
}

impl UserProfile {
    /// Change the display name. An avatar generated from the old name follows
    /// the new one; an uploaded or explicitly seeded avatar is kept.
    pub fn rename(&mut self, name: &str) {
        if self.avatar == avatar_for(&self.name) {
            self.avatar = avatar_for(name);
        }
        self.name = name.to_string();
    }

    /// Complete an onboarding draft with generated goals and defaults.
    pub fn from_draft(draft: ProfileDraft, goals: UserGoals) -> Self {
        let avatar = avatar_for(&draft.name);
        Self {
            name: draft.name,
            avatar,
            age: draft.age,
            gender: draft.gender,
            height_ft: draft.height_ft,
            height_in: draft.height_in,
            current_weight: draft.current_weight,
            goal_weight: draft.goal_weight,
            weight_loss_rate: draft.weight_loss_rate,
            activity_level: draft.activity_level,
            regimen: draft.regimen,
            goals,
            theme: Theme::default(),
            fasting: FastingState::default(),
            weight_history: Vec::new(),
            schema_version: super::migrate::CURRENT_SCHEMA_VERSION,
        }
    }

    /// The goal-generation inputs of this profile.
    pub fn draft(&self) -> ProfileDraft {
        ProfileDraft {
            name: self.name.clone(),
            age: self.age,
            gender: self.gender,
            height_ft: self.height_ft,
            height_in: self.height_in,
            current_weight: self.current_weight,
            goal_weight: self.goal_weight,
            weight_loss_rate: self.weight_loss_rate,
            activity_level: self.activity_level,
            regimen: self.regimen,
        }
    }

    pub fn is_gaining(&self) -> bool {
        self.goal_weight > self.current_weight
    }

    /// # Errors
    /// Rejects negative weights.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_weights(self.current_weight, self.goal_weight)
    }
}

fn validate_weights(current: f64, goal: f64) -> Result<(), ValidationError> {
    for (field, value) in [("currentWeight", current), ("goalWeight", goal)] {
        if !value.is_finite() || value < 0.0 {
            return Err(ValidationError::invalid(field, "weight cannot be negative"));
        }
    }
    Ok(())
}

/// Base of the generated avatar images.
const AVATAR_BASE_URL: &str = "https://api.dicebear.com/7.x/avataaars/svg";

/// Deterministic avatar URL for a seed (usually the display name).
pub fn avatar_for(seed: &str) -> String {
    let seed = if seed.trim().is_empty() { "User" } else { seed };
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("seed", seed)
        .finish();
    format!("{AVATAR_BASE_URL}?{query}")
}


#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ProfileDraft {
        ProfileDraft {
            name: "Alex".into(),
            age: 34,
            gender: Gender::Other,
            height_ft: 5,
            height_in: 9,
            current_weight: 180.0,
            goal_weight: 165.0,
            weight_loss_rate: 1.0,
            activity_level: ActivityLevel::Moderate,
            regimen: Regimen::HighProtein,
        }
    }

    #[test]
    fn from_draft_fills_defaults() {
        let profile = UserProfile::from_draft(draft(), UserGoals::FALLBACK);
        assert_eq!(profile.theme, Theme::Dark);
        assert!(!profile.fasting.is_fasting);
        assert_eq!(profile.fasting.goal_hours, 16.0);
        assert!(profile.weight_history.is_empty());
        assert_eq!(profile.avatar, "https://api.dicebear.com/7.x/avataaars/svg?seed=Alex");
        assert_eq!(profile.draft(), draft());
    }

    #[test]
    fn avatar_falls_back_to_user_seed() {
        assert!(avatar_for("").ends_with("seed=User"));
    }

    #[test]
    fn avatar_seed_is_query_encoded() {
        assert_eq!(
            avatar_for("Sarah Jenkins"),
            "https://api.dicebear.com/7.x/avataaars/svg?seed=Sarah+Jenkins"
        );
        assert!(avatar_for("Tom & Jerry").ends_with("seed=Tom+%26+Jerry"));
    }

    #[test]
    fn rename_keeps_uploaded_avatar() {
        let mut profile = UserProfile::from_draft(draft(), UserGoals::FALLBACK);
        profile.rename("Robin");
        assert_eq!(profile.avatar, avatar_for("Robin"));

        profile.avatar = avatar_for("Felix");
        profile.rename("Kim");
        assert_eq!(profile.avatar, avatar_for("Felix"));

        profile.avatar = "data:image/png;base64,AAAA".into();
        profile.rename("Sam");
        assert_eq!(profile.name, "Sam");
        assert_eq!(profile.avatar, "data:image/png;base64,AAAA");
    }

    #[test]
    fn negative_weight_is_rejected() {
        let mut d = draft();
        d.goal_weight = -1.0;
        assert!(matches!(
            d.validate(),
            Err(ValidationError::InvalidValue { ref field, .. }) if field == "goalWeight"
        ));
    }

    #[test]
    fn regimen_serializes_kebab_case() {
        let json = serde_json::to_string(&Regimen::IntermittentFasting).unwrap();
        assert_eq!(json, "\"intermittent-fasting\"");
    }

    #[test]
    fn enum_names_parse_back() {
        assert_eq!("low_carb".parse::<Regimen>().unwrap(), Regimen::LowCarb);
        assert_eq!(Regimen::HighProtein.as_str().parse::<Regimen>().unwrap(), Regimen::HighProtein);
        assert_eq!("Female".parse::<Gender>().unwrap(), Gender::Female);
        assert_eq!("athlete".parse::<ActivityLevel>().unwrap(), ActivityLevel::Athlete);
        assert!("couch".parse::<ActivityLevel>().is_err());
    }
}
