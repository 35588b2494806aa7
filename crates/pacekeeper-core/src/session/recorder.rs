//! Turns a finished engine run into a [`SessionLog`].
//!
//! Recording never fails. Metric values and effort ratings arrive as raw
//! user text and malformed input degrades to a default instead of
//! rejecting the session.

use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use super::log::{MetricEntry, SessionLog};
use crate::plan::Plan;
use crate::timer::EngineState;

pub const MIN_EFFORT: u8 = 1;
pub const MAX_EFFORT: u8 = 10;

/// Raw metric text keyed by segment id, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricInputs(Vec<(String, String)>);

impl MetricInputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// One empty entry per metric segment of `plan`, so an unanswered
    /// metric is still recorded (as zero).
    pub fn for_plan(plan: &Plan) -> Self {
        Self(
            plan.metric_segments()
                .map(|s| (s.id.clone(), String::new()))
                .collect(),
        )
    }

    /// Replace the value of `segment_id` in place, or append a new entry.
    pub fn set(&mut self, segment_id: impl Into<String>, raw: impl Into<String>) {
        let segment_id = segment_id.into();
        let raw = raw.into();
        match self.0.iter_mut().find(|(id, _)| *id == segment_id) {
            Some((_, value)) => *value = raw,
            None => self.0.push((segment_id, raw)),
        }
    }

    pub fn get(&self, segment_id: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(id, _)| id == segment_id)
            .map(|(_, raw)| raw.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MetricInputs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut inputs = Self::new();
        for (k, v) in iter {
            inputs.set(k, v);
        }
        inputs
    }
}

/// Parse a metric value. Empty, non-numeric and non-finite text is zero.
pub fn parse_metric_value(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Parse an effort rating. Non-numeric text yields `fallback`; numbers are
/// rounded and clamped into `1..=10`.
pub fn parse_effort(raw: &str, fallback: u8) -> u8 {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => clamp_effort(v),
        _ => clamp_effort(f64::from(fallback)),
    }
}

fn is_number(raw: &str) -> bool {
    raw.trim().parse::<f64>().is_ok_and(f64::is_finite)
}

fn clamp_effort(value: f64) -> u8 {
    value
        .round()
        .clamp(f64::from(MIN_EFFORT), f64::from(MAX_EFFORT)) as u8
}

/// Builds session logs from engine progress and user input.
#[derive(Debug, Clone)]
pub struct SessionRecorder {
    default_effort: u8,
}

impl Default for SessionRecorder {
    fn default() -> Self {
        Self::new(5)
    }
}

impl SessionRecorder {
    pub fn new(default_effort: u8) -> Self {
        Self {
            default_effort: clamp_effort(f64::from(default_effort)),
        }
    }

    pub fn default_effort(&self) -> u8 {
        self.default_effort
    }

    /// Build the log for a session with `effort` given as raw text.
    pub fn finish(
        &self,
        engine: &EngineState,
        inputs: &MetricInputs,
        effort: &str,
        notes: Option<&str>,
        plan_id: &str,
        user_id: Option<&str>,
    ) -> SessionLog {
        let rating = parse_effort(effort, self.default_effort);
        if !effort.trim().is_empty() && !is_number(effort) {
            warn!(raw = effort, fallback = rating, "effort rating is not a number");
        }
        self.finish_with_effort(engine, inputs, rating, notes, plan_id, user_id)
    }

    /// Build the log for a session with a numeric effort rating.
    pub fn finish_with_effort(
        &self,
        engine: &EngineState,
        inputs: &MetricInputs,
        effort: u8,
        notes: Option<&str>,
        plan_id: &str,
        user_id: Option<&str>,
    ) -> SessionLog {
        let metric_entries = inputs
            .iter()
            .map(|(segment_id, raw)| {
                if !raw.trim().is_empty() && !is_number(raw) {
                    warn!(segment = segment_id, raw, "metric value is not a number, recording 0");
                }
                MetricEntry {
                    segment_id: segment_id.to_string(),
                    value: parse_metric_value(raw),
                }
            })
            .collect();

        SessionLog {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.map(str::to_string),
            plan_id: plan_id.to_string(),
            timestamp: Utc::now(),
            duration_min: (engine.elapsed_secs.max(0.0) / 60.0).round() as u64,
            effort_rating: clamp_effort(f64::from(effort)),
            notes: notes
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
            metric_entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{IntensityLevel, MetricDefinition, MetricKind, Segment};
    use crate::timer::TimerState;

    fn state(elapsed_secs: f64) -> EngineState {
        EngineState {
            status: TimerState::Running,
            elapsed_secs,
            total_secs: 2700,
        }
    }

    #[test]
    fn duration_is_rounded_minutes() {
        let recorder = SessionRecorder::default();
        let inputs = MetricInputs::new();
        let log = recorder.finish(&state(1200.0), &inputs, "7", None, "p", None);
        assert_eq!(log.duration_min, 20);
        let log = recorder.finish(&state(89.0), &inputs, "7", None, "p", None);
        assert_eq!(log.duration_min, 1);
        let log = recorder.finish(&state(29.0), &inputs, "7", None, "p", None);
        assert_eq!(log.duration_min, 0);
    }

    #[test]
    fn metric_entries_follow_inputs() {
        let recorder = SessionRecorder::default();
        let inputs: MetricInputs = [("a", "12"), ("b", " 3.5 "), ("c", "lots"), ("d", "")]
            .into_iter()
            .collect();
        let log = recorder.finish(&state(60.0), &inputs, "6", None, "p", None);
        assert_eq!(log.metric_entries.len(), 4);
        assert_eq!(log.metric("a"), Some(12.0));
        assert_eq!(log.metric("b"), Some(3.5));
        assert_eq!(log.metric("c"), Some(0.0));
        assert_eq!(log.metric("d"), Some(0.0));
    }

    #[test]
    fn metric_entries_keep_plan_order() {
        let counted = |label: &str| MetricDefinition::new(MetricKind::Counted).with_label(label);
        let plan = Plan::new(
            "p",
            "Ordered",
            vec![
                Segment::new("warm-up", 10, IntensityLevel::Low).with_metric(counted("Laps")),
                Segment::new("main-set", 35, IntensityLevel::High).with_metric(counted("Rounds")),
            ],
        );
        let mut inputs = MetricInputs::for_plan(&plan);
        inputs.set("main-set", "8");
        inputs.set("warm-up", "4");

        let log = SessionRecorder::default().finish(&state(60.0), &inputs, "5", None, "p", None);
        let ids: Vec<_> = log.metric_entries.iter().map(|e| e.segment_id.as_str()).collect();
        assert_eq!(ids, vec!["warm-up", "main-set"]);
        assert_eq!(log.metric("main-set"), Some(8.0));
    }

    #[test]
    fn for_plan_prefills_metric_segments() {
        let inputs = MetricInputs::for_plan(&Plan::starter());
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs.get("main-set"), Some(""));
    }

    #[test]
    fn effort_falls_back_and_clamps() {
        assert_eq!(parse_effort("8", 5), 8);
        assert_eq!(parse_effort("hard", 5), 5);
        assert_eq!(parse_effort("", 4), 4);
        assert_eq!(parse_effort("42", 5), 10);
        assert_eq!(parse_effort("0", 5), 1);
        assert_eq!(parse_effort("6.6", 5), 7);
    }

    #[test]
    fn metric_parse_rejects_non_finite() {
        assert_eq!(parse_metric_value("inf"), 0.0);
        assert_eq!(parse_metric_value("NaN"), 0.0);
        assert_eq!(parse_metric_value("-2"), -2.0);
    }

    #[test]
    fn log_carries_identity_and_notes() {
        let recorder = SessionRecorder::new(3);
        let log = recorder.finish(
            &state(600.0),
            &MetricInputs::new(),
            "?",
            Some("  felt good "),
            "plan-1",
            Some("me"),
        );
        assert_eq!(log.plan_id, "plan-1");
        assert_eq!(log.user_id.as_deref(), Some("me"));
        assert_eq!(log.effort_rating, 3);
        assert_eq!(log.notes.as_deref(), Some("felt good"));
        assert!(!log.id.is_empty());
    }

    #[test]
    fn blank_notes_are_dropped() {
        let recorder = SessionRecorder::default();
        let log = recorder.finish(&state(0.0), &MetricInputs::new(), "5", Some("  "), "p", None);
        assert!(log.notes.is_none());
    }
}
