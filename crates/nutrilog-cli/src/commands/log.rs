use std::path::{Path, PathBuf};

use clap::Subcommand;
use nutrilog_core::ai::{EntryParser, ImageInput};
use nutrilog_core::clock::now_ms;
use nutrilog_core::exercise::{exercise_entry, ACTIVITIES};
use nutrilog_core::{DailySummary, EntrySource, Macros, ParsedEntry};

use super::{ai_service, open_store, print_json, require_profile, resolve_date, CmdResult, Store};

#[derive(Subcommand)]
pub enum LogAction {
    /// Log an entry by hand
    Add {
        name: String,
        /// Calories eaten, or burned with --exercise
        #[arg(long)]
        calories: f64,
        #[arg(long, default_value = "1 serving")]
        portion: String,
        #[arg(long, default_value = "0")]
        protein: f64,
        #[arg(long, default_value = "0")]
        carbs: f64,
        #[arg(long, default_value = "0")]
        fat: f64,
        /// Record as exercise (calories burned)
        #[arg(long)]
        exercise: bool,
        /// Day to log to (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Describe what you ate or did in plain words
    Text {
        text: String,
        #[arg(long)]
        date: Option<String>,
        /// Print the parsed entries without saving them
        #[arg(long)]
        dry_run: bool,
    },
    /// Analyse a meal photo
    Image {
        path: PathBuf,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Log exercise from the MET calculator
    Exercise {
        /// Activity name, see `log activities`
        activity: String,
        minutes: u32,
        /// Body weight (lbs), default from profile
        #[arg(long)]
        weight: Option<f64>,
        #[arg(long)]
        date: Option<String>,
    },
    /// List calculator activities and MET values
    Activities,
    /// Print a day's entries
    List {
        #[arg(long)]
        date: Option<String>,
    },
    /// Delete an entry
    Delete {
        id: String,
        #[arg(long)]
        date: Option<String>,
    },
    /// Totals and goal progress for a day
    Summary {
        #[arg(long)]
        date: Option<String>,
    },
}

pub(super) fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        _ => "image/jpeg",
    }
}

fn save_all(
    store: &Store,
    entries: Vec<ParsedEntry>,
    source: EntrySource,
    date: &str,
    image: Option<String>,
) -> CmdResult {
    if entries.is_empty() {
        eprintln!("nothing recognised; try describing it differently");
        return Ok(());
    }
    for entry in entries {
        entry.validate()?;
        let item = entry.into_item(source, now_ms(), image.clone());
        let (_, event) = store.save_log_item(item, date)?;
        print_json(&event)?;
    }
    Ok(())
}

pub async fn run(action: LogAction) -> CmdResult {
    let store = open_store()?;

    match action {
        LogAction::Add {
            name,
            calories,
            portion,
            protein,
            carbs,
            fat,
            exercise,
            date,
        } => {
            let date = resolve_date(date)?;
            let entry = if exercise {
                ParsedEntry::exercise(name, portion, calories)
            } else {
                ParsedEntry::food(name, portion, calories, Macros::new(protein, carbs, fat))
            };
            save_all(&store, vec![entry], EntrySource::Manual, &date, None)?;
        }
        LogAction::Text { text, date, dry_run } => {
            let date = resolve_date(date)?;
            let entries = ai_service()?
                .parse_text(&text)
                .await
                .map_err(|e| format!("failed to analyze, try again ({e})"))?;
            if dry_run {
                print_json(&entries)?;
            } else {
                save_all(&store, entries, EntrySource::AiText, &date, None)?;
            }
        }
        LogAction::Image { path, date, dry_run } => {
            let date = resolve_date(date)?;
            let bytes = std::fs::read(&path)?;
            let image = ImageInput::from_bytes(&bytes, mime_for(&path));
            let entries = ai_service()?
                .parse_image(&image)
                .await
                .map_err(|e| format!("failed to analyze image, try again ({e})"))?;
            if dry_run {
                print_json(&entries)?;
            } else {
                let data_url = image.to_data_url();
                save_all(&store, entries, EntrySource::AiImage, &date, Some(data_url))?;
            }
        }
        LogAction::Exercise {
            activity,
            minutes,
            weight,
            date,
        } => {
            let date = resolve_date(date)?;
            let weight = match weight {
                Some(w) => w,
                None => require_profile(&store)?.current_weight,
            };
            let entry = exercise_entry(&activity, minutes, weight)?;
            save_all(&store, vec![entry], EntrySource::Calculator, &date, None)?;
        }
        LogAction::Activities => {
            print_json(ACTIVITIES)?;
        }
        LogAction::List { date } => {
            let date = resolve_date(date)?;
            print_json(&store.log_for_date(&date)?)?;
        }
        LogAction::Delete { id, date } => {
            let date = resolve_date(date)?;
            match store.delete_log_item(&id, &date)? {
                Some(event) => print_json(&event)?,
                None => return Err(format!("no entry '{id}' on {date}").into()),
            }
        }
        LogAction::Summary { date } => {
            let date = resolve_date(date)?;
            let profile = require_profile(&store)?;
            let log = store.log_for_date(&date)?;
            print_json(&DailySummary::compute(&log, &profile.goals))?;
        }
    }
    Ok(())
}
