//! # Pacekeeper Core Library
//!
//! This library provides the core logic for Pacekeeper, a guide for
//! fixed-length, multi-segment timed sessions that tracks per-segment
//! performance across sessions. The `pacekeeper` CLI is a thin layer over
//! the same library.
//!
//! ## Architecture
//!
//! - **Timer Engine**: An elapsed-time state machine driven by frame
//!   timestamps from a [`FrameSource`]; it never reads a clock itself
//! - **Session Recorder**: Turns engine progress and user input into an
//!   immutable [`SessionLog`]
//! - **Progress Analyzer**: Percent improvement of a segment metric between
//!   the first and latest recorded session
//! - **Storage**: Injected plan/log/profile stores (SQLite or in-memory)
//!   and TOML configuration
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`SessionRecorder`]: Session log construction
//! - [`ProgressAnalyzer`]: Improvement figures and metric series
//! - [`SqliteStore`]: Persistent plan and session log storage
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod plan;
pub mod session;
pub mod stats;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, StoreError, ValidationError};
pub use events::Event;
pub use plan::{IntensityLevel, MetricDefinition, MetricKind, Plan, Segment};
pub use session::{
    save_session, store_log, MetricInputs, SessionInput, SessionLog, SessionRecorder,
};
pub use stats::{Improvement, ProgressAnalyzer, SessionSummary, Trend};
pub use storage::{Config, LogStore, MemoryStore, PlanStore, ProfileStore, SqliteStore};
pub use timer::{EngineState, FrameSource, TimerEngine, TimerState};
