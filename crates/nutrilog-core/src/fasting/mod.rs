mod engine;
mod stage;
mod ticker;

pub use engine::{
    format_elapsed, FastingPhase, FastingProgress, FastingState, DEFAULT_GOAL_HOURS,
    GOAL_PRESETS, MAX_GOAL_HOURS,
};
pub use stage::FastingStage;
pub use ticker::{FastingTicker, TICK_PERIOD};
