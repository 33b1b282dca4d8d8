use serde::{Deserialize, Serialize};

/// Physiological phase of a fast, bucketed by elapsed hours.
///
/// Thresholds are fixed: [0,4) rising, [4,8) falling, [8,12) normalization,
/// [12,∞) ketosis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FastingStage {
    BloodSugarRising,
    BloodSugarFalling,
    Normalization,
    Ketosis,
}

impl FastingStage {
    pub fn from_elapsed_hours(hours: f64) -> Self {
        if hours < 4.0 {
            FastingStage::BloodSugarRising
        } else if hours < 8.0 {
            FastingStage::BloodSugarFalling
        } else if hours < 12.0 {
            FastingStage::Normalization
        } else {
            FastingStage::Ketosis
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FastingStage::BloodSugarRising => "Blood Sugar Rising",
            FastingStage::BloodSugarFalling => "Blood Sugar Falling",
            FastingStage::Normalization => "Normalization",
            FastingStage::Ketosis => "Ketosis (Fat Burning)",
        }
    }
}
