//! Onboarding, profile edits and goal-date projection.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use nutrilog_core::ai::{ImageInput, PlanGenerator};
use nutrilog_core::profile::{
    avatar_for, project_goal_date, ActivityLevel, Gender, Regimen, Theme,
};
use nutrilog_core::{Config, ProfileDraft, UserGoals, UserProfile};
use tracing::info;

use super::log::mime_for;
use super::{ai_service, open_store, print_json, require_profile, CmdResult};

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Create the profile and generate daily goals
    Init(InitArgs),
    /// Print the saved profile as JSON
    Show,
    /// Change profile fields or goals
    Update(UpdateArgs),
    /// Estimate when the goal weight will be reached
    Projection,
}

#[derive(Args)]
pub struct InitArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    age: u32,
    /// male, female or other
    #[arg(long)]
    gender: Gender,
    #[arg(long)]
    height_ft: u32,
    #[arg(long, default_value = "0")]
    height_in: u32,
    /// Current weight (lbs)
    #[arg(long)]
    weight: f64,
    /// Goal weight (lbs)
    #[arg(long)]
    goal_weight: f64,
    /// Target change per week (lbs)
    #[arg(long, default_value = "1")]
    rate: f64,
    /// sedentary, light, moderate, active or athlete
    #[arg(long, default_value = "moderate")]
    activity: ActivityLevel,
    /// balanced, low-carb, keto, high-protein, vegan or intermittent-fasting
    #[arg(long, default_value = "balanced")]
    regimen: Regimen,
}

#[derive(Args)]
pub struct UpdateArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    age: Option<u32>,
    #[arg(long)]
    gender: Option<Gender>,
    #[arg(long)]
    height_ft: Option<u32>,
    #[arg(long)]
    height_in: Option<u32>,
    /// Current weight (lbs); a change is recorded in the weight history
    #[arg(long)]
    weight: Option<f64>,
    #[arg(long)]
    goal_weight: Option<f64>,
    #[arg(long)]
    rate: Option<f64>,
    #[arg(long)]
    activity: Option<ActivityLevel>,
    #[arg(long)]
    regimen: Option<Regimen>,
    /// light or dark
    #[arg(long, value_parser = parse_theme)]
    theme: Option<Theme>,
    /// Use a generated avatar with this seed
    #[arg(long, conflicts_with = "avatar_file")]
    avatar_seed: Option<String>,
    /// Use an image file as the avatar
    #[arg(long)]
    avatar_file: Option<PathBuf>,
    /// Ask the AI for new goals after applying the changes
    #[arg(long)]
    regenerate_goals: bool,
    #[arg(long)]
    calories: Option<f64>,
    #[arg(long)]
    protein: Option<f64>,
    #[arg(long)]
    carbs: Option<f64>,
    #[arg(long)]
    fat: Option<f64>,
}

fn parse_theme(value: &str) -> Result<Theme, String> {
    match value.to_ascii_lowercase().as_str() {
        "light" => Ok(Theme::Light),
        "dark" => Ok(Theme::Dark),
        _ => Err(format!("unknown theme '{value}'")),
    }
}

impl InitArgs {
    fn into_draft(self) -> ProfileDraft {
        ProfileDraft {
            name: self.name,
            age: self.age,
            gender: self.gender,
            height_ft: self.height_ft,
            height_in: self.height_in,
            current_weight: self.weight,
            goal_weight: self.goal_weight,
            weight_loss_rate: self.rate,
            activity_level: self.activity,
            regimen: self.regimen,
        }
    }
}

impl UpdateArgs {
    fn apply(&self, profile: &mut UserProfile) {
        if let Some(name) = &self.name {
            profile.rename(name);
        }
        if let Some(age) = self.age {
            profile.age = age;
        }
        if let Some(gender) = self.gender {
            profile.gender = gender;
        }
        if let Some(ft) = self.height_ft {
            profile.height_ft = ft;
        }
        if let Some(inches) = self.height_in {
            profile.height_in = inches;
        }
        if let Some(weight) = self.weight {
            profile.current_weight = weight;
        }
        if let Some(goal) = self.goal_weight {
            profile.goal_weight = goal;
        }
        if let Some(rate) = self.rate {
            profile.weight_loss_rate = rate;
        }
        if let Some(activity) = self.activity {
            profile.activity_level = activity;
        }
        if let Some(regimen) = self.regimen {
            profile.regimen = regimen;
        }
        if let Some(theme) = self.theme {
            profile.theme = theme;
        }
        if let Some(seed) = &self.avatar_seed {
            profile.avatar = avatar_for(seed);
        }
    }

    /// The uploaded avatar as a data URL, if one was given.
    fn avatar_image(&self) -> std::io::Result<Option<String>> {
        let Some(path) = &self.avatar_file else {
            return Ok(None);
        };
        let bytes = std::fs::read(path)?;
        Ok(Some(ImageInput::from_bytes(&bytes, mime_for(path)).to_data_url()))
    }

    fn override_goals(&self, goals: &mut UserGoals) {
        if let Some(calories) = self.calories {
            goals.calories = calories;
        }
        if let Some(protein) = self.protein {
            goals.protein = protein;
        }
        if let Some(carbs) = self.carbs {
            goals.carbs = carbs;
        }
        if let Some(fat) = self.fat {
            goals.fat = fat;
        }
    }
}

pub async fn run(action: ProfileAction) -> CmdResult {
    let store = open_store()?;

    match action {
        ProfileAction::Init(args) => {
            if store.profile()?.is_some() {
                return Err("a profile already exists; use `nutrilog profile update`".into());
            }
            let draft = args.into_draft();
            draft.validate()?;
            let goals = ai_service()?.generate_goals(&draft).await?;
            info!(calories = goals.calories, "goals generated");

            let mut profile = UserProfile::from_draft(draft, goals);
            profile.fasting.goal_hours = Config::load()?.fasting.default_goal_hours;
            let (profile, event) = store.save_profile(profile)?;
            print_json(&event)?;
            print_json(&profile)?;
        }
        ProfileAction::Show => {
            print_json(&require_profile(&store)?)?;
        }
        ProfileAction::Update(args) => {
            let mut profile = require_profile(&store)?;
            let avatar_image = args.avatar_image()?;
            args.apply(&mut profile);
            if let Some(avatar) = avatar_image {
                profile.avatar = avatar;
            }
            if args.regenerate_goals {
                let draft = profile.draft();
                draft.validate()?;
                profile.goals = ai_service()?.generate_goals(&draft).await?;
            }
            args.override_goals(&mut profile.goals);
            let (profile, event) = store.save_profile(profile)?;
            print_json(&event)?;
            print_json(&profile)?;
        }
        ProfileAction::Projection => {
            let profile = require_profile(&store)?;
            let today = chrono::Local::now().date_naive();
            let projection = project_goal_date(
                profile.current_weight,
                profile.goal_weight,
                profile.weight_loss_rate,
                today,
            );
            print_json(&projection)?;
        }
    }
    Ok(())
}
