use serde::{Deserialize, Serialize};

use crate::diary::EntryType;

/// Every state change in the system produces an Event.
/// The CLI prints them; a GUI shell would render them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    FastStarted {
        start_time: i64,
        projected_end: i64,
        goal_hours: f64,
    },
    FastEnded {
        start_time: i64,
        end_time: i64,
        elapsed_ms: i64,
        goal_hours: f64,
    },
    FastStartAdjusted {
        start_time: i64,
        projected_end: i64,
    },
    FastGoalChanged {
        previous_hours: f64,
        goal_hours: f64,
    },
    EntryLogged {
        date: String,
        id: String,
        name: String,
        entry_type: EntryType,
        calories: f64,
    },
    EntryDeleted {
        date: String,
        id: String,
    },
    ProfileSaved {
        name: String,
        weight_recorded: bool,
    },
    PostCreated {
        id: String,
    },
    PostLikeToggled {
        id: String,
        liked: bool,
        likes: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_tagged_by_type() {
        let json = serde_json::to_value(Event::EntryDeleted {
            date: "2024-01-01".into(),
            id: "abc".into(),
        })
        .unwrap();
        assert_eq!(json["type"], "entry_deleted");
        assert_eq!(json["id"], "abc");
    }
}
