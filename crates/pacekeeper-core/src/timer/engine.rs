//! Timer engine implementation.
//!
//! The timer engine is an elapsed-time state machine over a [`Plan`]. It
//! does not read a clock or spawn threads: the scheduling loop feeds it
//! frame timestamps through [`TimerEngine::on_frame`], or advances it
//! directly with [`TimerEngine::tick`].
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!   ^________|__________|      (reset from any state)
//! ```
//!
//! There is no completed state. Once elapsed time reaches the plan total
//! the engine stays `Running`, clamped at 100%, until the caller saves the
//! session and resets it.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(plan);
//! engine.start();
//! // In the scheduling loop:
//! engine.on_frame(timestamp_ms); // Returns Some(Event) when the segment changes
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::events::Event;
use crate::plan::{resolve_segment, Plan, Segment};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
}

/// Progress counters handed to the session recorder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EngineState {
    pub status: TimerState,
    pub elapsed_secs: f64,
    pub total_secs: u64,
}

/// Core timer engine.
///
/// Holds only the plan, the status and the elapsed counter. Percent and
/// the active segment are recomputed from those on every query.
#[derive(Debug, Clone)]
pub struct TimerEngine {
    plan: Plan,
    state: TimerState,
    /// Always within `0.0..=total_secs`.
    elapsed_secs: f64,
    /// Timestamp of the previous frame while running.
    last_frame_ms: Option<u64>,
}

impl TimerEngine {
    /// Create a new engine for `plan` in the `Idle` state.
    pub fn new(plan: Plan) -> Self {
        Self {
            plan,
            state: TimerState::Idle,
            elapsed_secs: 0.0,
            last_frame_ms: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_secs
    }

    pub fn total_secs(&self) -> u64 {
        self.plan.total_seconds()
    }

    pub fn remaining_secs(&self) -> f64 {
        (self.total_secs() as f64 - self.elapsed_secs).max(0.0)
    }

    pub fn progress(&self) -> EngineState {
        EngineState {
            status: self.state,
            elapsed_secs: self.elapsed_secs,
            total_secs: self.total_secs(),
        }
    }

    /// Whole-session completion, rounded to the nearest percent.
    /// Zero for a plan without duration.
    pub fn percent(&self) -> u32 {
        let total = self.total_secs();
        if total == 0 {
            return 0;
        }
        (100.0 * self.elapsed_secs / total as f64).round() as u32
    }

    /// The active segment, or `None` for a plan without duration.
    pub fn current_segment(&self) -> Option<&Segment> {
        self.current().map(|(_, segment)| segment)
    }

    pub fn current_segment_index(&self) -> Option<usize> {
        self.current().map(|(index, _)| index)
    }

    /// Seconds spent inside the active segment.
    pub fn segment_elapsed_secs(&self) -> f64 {
        let Some(index) = self.current_segment_index() else {
            return 0.0;
        };
        let start: u64 = self.plan.segments[..index]
            .iter()
            .map(Segment::duration_secs)
            .sum();
        (self.elapsed_secs - start as f64).max(0.0)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        let current = self.current();
        Event::StateSnapshot {
            state: self.state,
            plan_id: self.plan.id.clone(),
            elapsed_secs: self.elapsed_secs,
            total_secs: self.total_secs(),
            percent: self.percent(),
            segment_index: current.map(|(i, _)| i),
            segment_id: current.map(|(_, s)| s.id.clone()),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Idle or Paused -> Running. `None` when already running.
    pub fn start(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Idle | TimerState::Paused => {
                debug!(plan = %self.plan.id, from = ?self.state, "timer started");
                self.state = TimerState::Running;
                self.last_frame_ms = None;
                Some(Event::TimerStarted {
                    plan_id: self.plan.id.clone(),
                    elapsed_secs: self.elapsed_secs,
                    at: Utc::now(),
                })
            }
            TimerState::Running => None,
        }
    }

    /// Running -> Paused, freezing elapsed time. `None` otherwise.
    pub fn pause(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Running => {
                debug!(plan = %self.plan.id, elapsed = self.elapsed_secs, "timer paused");
                self.state = TimerState::Paused;
                self.last_frame_ms = None;
                Some(Event::TimerPaused {
                    elapsed_secs: self.elapsed_secs,
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    /// Any state -> Idle with zero elapsed time.
    pub fn reset(&mut self) -> Option<Event> {
        debug!(plan = %self.plan.id, from = ?self.state, "timer reset");
        self.state = TimerState::Idle;
        self.elapsed_secs = 0.0;
        self.last_frame_ms = None;
        Some(Event::TimerReset {
            plan_id: self.plan.id.clone(),
            total_secs: self.total_secs(),
            at: Utc::now(),
        })
    }

    /// Swap the plan. Always resets against the new plan's total.
    pub fn set_plan(&mut self, plan: Plan) -> Option<Event> {
        debug!(from = %self.plan.id, to = %plan.id, "plan changed");
        self.plan = plan;
        self.reset()
    }

    /// Advance elapsed time by `delta_secs` while running.
    ///
    /// Negative or non-finite deltas count as zero. Elapsed time is clamped
    /// to the plan total. Returns `Some(Event::SegmentChanged)` when the
    /// active segment moves.
    pub fn tick(&mut self, delta_secs: f64) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        let delta = if delta_secs.is_finite() { delta_secs.max(0.0) } else { 0.0 };
        if delta == 0.0 {
            return None;
        }

        let before = self.current_segment_index();
        self.elapsed_secs = (self.elapsed_secs + delta).min(self.total_secs() as f64);
        let (to_index, segment) = self.current()?;
        if before == Some(to_index) {
            return None;
        }

        debug!(plan = %self.plan.id, segment = %segment.id, index = to_index, "segment changed");
        Some(Event::SegmentChanged {
            from_index: before,
            to_index,
            segment_id: segment.id.clone(),
            at: Utc::now(),
        })
    }

    /// Scheduling-loop entry point.
    ///
    /// The first frame after `start` only records the reference timestamp.
    /// Later frames advance by the difference to the previous one; a frame
    /// earlier than its predecessor advances by zero and keeps the newer
    /// reference.
    pub fn on_frame(&mut self, timestamp_ms: u64) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        let Some(previous) = self.last_frame_ms else {
            self.last_frame_ms = Some(timestamp_ms);
            return None;
        };
        self.last_frame_ms = Some(previous.max(timestamp_ms));
        let delta_ms = timestamp_ms.saturating_sub(previous);
        self.tick(delta_ms as f64 / 1000.0)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn current(&self) -> Option<(usize, &Segment)> {
        if self.total_secs() == 0 {
            return None;
        }
        resolve_segment(&self.plan.segments, self.elapsed_secs)
    }
}
