use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::TimerState;

/// Every state change of the engine or the log store produces an Event.
/// Front ends print or render them; nothing in the core consumes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        plan_id: String,
        elapsed_secs: f64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        elapsed_secs: f64,
        at: DateTime<Utc>,
    },
    TimerReset {
        plan_id: String,
        total_secs: u64,
        at: DateTime<Utc>,
    },
    /// The active segment changed while the engine advanced.
    SegmentChanged {
        from_index: Option<usize>,
        to_index: usize,
        segment_id: String,
        at: DateTime<Utc>,
    },
    SessionSaved {
        log_id: String,
        plan_id: String,
        duration_min: u64,
        evicted: usize,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        plan_id: String,
        elapsed_secs: f64,
        total_secs: u64,
        percent: u32,
        segment_index: Option<usize>,
        segment_id: Option<String>,
        at: DateTime<Utc>,
    },
}
