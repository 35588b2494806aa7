//! Statistics module for Pacekeeper
//!
//! This module derives progress figures from recorded sessions: per-metric
//! improvement between the first and latest values, metric history series
//! and session totals.

mod progress;
mod summary;

pub use progress::{Improvement, ProgressAnalyzer, SegmentProgress, SeriesPoint, Trend};
pub use summary::SessionSummary;
