//! Progress analytics over recorded sessions.
//!
//! Improvement is measured between the first and the most recent value
//! recorded for one (plan, segment) pair:
//! - fewer than two values: no result
//! - baseline of zero: values only, no percent
//! - otherwise: `100 * (latest - baseline) / baseline`
//!
//! The percent is never adjusted for `higher_is_better`; that flag only
//! decides how [`Trend`] labels a change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::plan::Plan;
use crate::session::SessionLog;

/// Improvement between the baseline and the latest value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Improvement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent: Option<f64>,
}

impl Improvement {
    pub fn is_empty(&self) -> bool {
        self.baseline.is_none() && self.latest.is_none()
    }
}

/// How a change reads for the athlete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Declining,
    Steady,
    /// Fewer than two recorded values.
    Insufficient,
}

impl Trend {
    pub fn from_improvement(improvement: &Improvement, higher_is_better: bool) -> Self {
        let (Some(baseline), Some(latest)) = (improvement.baseline, improvement.latest) else {
            return Trend::Insufficient;
        };
        let delta = latest - baseline;
        if delta == 0.0 {
            Trend::Steady
        } else if (delta > 0.0) == higher_is_better {
            Trend::Improving
        } else {
            Trend::Declining
        }
    }
}

/// One point of a metric's history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub at: DateTime<Utc>,
    pub value: f64,
}

/// Per-segment entry of a plan report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentProgress {
    pub segment_id: String,
    pub label: String,
    pub higher_is_better: bool,
    pub samples: usize,
    pub improvement: Improvement,
    pub trend: Trend,
}

/// Derives progress figures from session logs.
///
/// All methods take logs in store order, most recent first.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressAnalyzer;

impl ProgressAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Values recorded for `segment_id` under `plan_id`, oldest first.
    /// Logs without an entry for the segment are skipped.
    pub fn values(&self, logs: &[SessionLog], plan_id: &str, segment_id: &str) -> Vec<f64> {
        self.series(logs, plan_id, segment_id)
            .into_iter()
            .map(|p| p.value)
            .collect()
    }

    /// Timestamped history of one metric, oldest first.
    pub fn series(&self, logs: &[SessionLog], plan_id: &str, segment_id: &str) -> Vec<SeriesPoint> {
        logs.iter()
            .rev()
            .filter(|log| log.plan_id == plan_id)
            .filter_map(|log| {
                log.metric(segment_id).map(|value| SeriesPoint {
                    at: log.timestamp,
                    value,
                })
            })
            .collect()
    }

    pub fn improvement(&self, logs: &[SessionLog], plan_id: &str, segment_id: &str) -> Improvement {
        let values = self.values(logs, plan_id, segment_id);
        if values.len() < 2 {
            return Improvement::default();
        }
        let baseline = values[0];
        let latest = values[values.len() - 1];
        let percent = (baseline != 0.0).then(|| 100.0 * (latest - baseline) / baseline);
        Improvement {
            baseline: Some(baseline),
            latest: Some(latest),
            percent,
        }
    }

    /// Progress for every metric segment of `plan`, in plan order.
    pub fn plan_report(&self, plan: &Plan, logs: &[SessionLog]) -> Vec<SegmentProgress> {
        plan.metric_segments()
            .map(|segment| {
                let higher_is_better = segment
                    .metric
                    .as_ref()
                    .map_or(true, |m| m.higher_is_better);
                let improvement = self.improvement(logs, &plan.id, &segment.id);
                SegmentProgress {
                    segment_id: segment.id.clone(),
                    label: segment.display_label().to_string(),
                    higher_is_better,
                    samples: self.values(logs, &plan.id, &segment.id).len(),
                    trend: Trend::from_improvement(&improvement, higher_is_better),
                    improvement,
                }
            })
            .collect()
    }
}
