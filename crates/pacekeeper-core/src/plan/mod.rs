//! Plans and their segments.
//!
//! A [`Plan`] is an ordered list of [`Segment`]s that together form one
//! session template. Plans are authored outside the engine; the engine only
//! reads them. Every duration the engine uses is derived from the segments
//! themselves, so a malformed plan still produces well-defined timing.

mod resolve;

pub use resolve::{resolve_segment, segment_bounds, SegmentBounds};

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IntensityLevel {
    Low,
    #[default]
    Moderate,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    Counted,
    Timed,
    Distance,
    Custom,
}

/// What a segment measures, if anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDefinition {
    pub kind: MetricKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Presentation hint only: whether a rising value reads as progress.
    #[serde(default = "default_true")]
    pub higher_is_better: bool,
}

fn default_true() -> bool {
    true
}

impl MetricDefinition {
    pub fn new(kind: MetricKind) -> Self {
        Self {
            kind,
            label: None,
            higher_is_better: true,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn lower_is_better(mut self) -> Self {
        self.higher_is_better = false;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: String,
    /// Duration in minutes.
    pub duration_min: u64,
    #[serde(default)]
    pub intensity: IntensityLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<MetricDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Segment {
    pub fn new(id: impl Into<String>, duration_min: u64, intensity: IntensityLevel) -> Self {
        Self {
            id: id.into(),
            duration_min,
            intensity,
            metric: None,
            target_value: None,
            notes: None,
        }
    }

    pub fn with_metric(mut self, metric: MetricDefinition) -> Self {
        self.metric = Some(metric);
        self
    }

    pub fn with_target(mut self, target: f64) -> Self {
        self.target_value = Some(target);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Get segment duration in seconds.
    ///
    /// Uses saturating arithmetic so absurd durations cannot overflow.
    pub fn duration_secs(&self) -> u64 {
        self.duration_min.saturating_mul(60)
    }

    /// Label for display: the metric label when present, else the id.
    pub fn display_label(&self) -> &str {
        self.metric
            .as_ref()
            .and_then(|m| m.label.as_deref())
            .unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    pub segments: Vec<Segment>,
    #[serde(default)]
    pub author: String,
}

impl Plan {
    pub fn new(id: impl Into<String>, title: impl Into<String>, segments: Vec<Segment>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            tags: BTreeSet::new(),
            segments,
            author: String::new(),
        }
    }

    pub fn total_minutes(&self) -> u64 {
        self.segments
            .iter()
            .fold(0u64, |acc, s| acc.saturating_add(s.duration_min))
    }

    pub fn total_seconds(&self) -> u64 {
        self.segments
            .iter()
            .fold(0u64, |acc, s| acc.saturating_add(s.duration_secs()))
    }

    pub fn segment(&self, id: &str) -> Option<&Segment> {
        self.segments.iter().find(|s| s.id == id)
    }

    /// Segments that carry a metric definition, in plan order.
    pub fn metric_segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter().filter(|s| s.metric.is_some())
    }

    /// Authoring-boundary check. The engine never calls this.
    ///
    /// # Errors
    /// Returns the first rule the plan breaks.
    pub fn validate(&self, expected_total_min: u64) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if self.segments.is_empty() {
            return Err(ValidationError::EmptyPlan);
        }
        let mut seen = HashSet::new();
        for segment in &self.segments {
            if !seen.insert(segment.id.as_str()) {
                return Err(ValidationError::DuplicateSegmentId(segment.id.clone()));
            }
        }
        let actual_min = self.total_minutes();
        if actual_min != expected_total_min {
            return Err(ValidationError::DurationMismatch {
                plan: self.title.clone(),
                expected_min: expected_total_min,
                actual_min,
            });
        }
        Ok(())
    }

    /// Built-in 45 minute plan seeded into an empty store.
    pub fn starter() -> Self {
        let mut plan = Self::new(
            "starter",
            "Starter Circuit",
            vec![
                Segment::new("warm-up", 10, IntensityLevel::Low)
                    .with_notes("Easy pace, loosen up"),
                Segment::new("main-set", 30, IntensityLevel::High)
                    .with_metric(MetricDefinition::new(MetricKind::Counted).with_label("Rounds"))
                    .with_target(8.0),
                Segment::new("cool-down", 5, IntensityLevel::Low),
            ],
        );
        plan.tags.insert("starter".into());
        plan.author = "pacekeeper".into();
        plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starter_plan_lasts_45_minutes() {
        let plan = Plan::starter();
        assert_eq!(plan.total_minutes(), 45);
        assert_eq!(plan.total_seconds(), 2700);
        assert!(plan.validate(45).is_ok());
    }

    #[test]
    fn total_is_derived_from_segments() {
        let plan = Plan::new(
            "p",
            "Short",
            vec![
                Segment::new("a", 3, IntensityLevel::Low),
                Segment::new("b", 4, IntensityLevel::High),
            ],
        );
        assert_eq!(plan.total_seconds(), 7 * 60);
    }

    #[test]
    fn empty_plan_has_zero_total() {
        let plan = Plan::new("p", "Empty", vec![]);
        assert_eq!(plan.total_seconds(), 0);
        assert_eq!(plan.validate(45), Err(ValidationError::EmptyPlan));
    }

    #[test]
    fn validate_rejects_wrong_duration() {
        let plan = Plan::new("p", "Legs", vec![Segment::new("a", 40, IntensityLevel::High)]);
        assert_eq!(
            plan.validate(45),
            Err(ValidationError::DurationMismatch {
                plan: "Legs".into(),
                expected_min: 45,
                actual_min: 40,
            })
        );
    }

    #[test]
    fn validate_rejects_duplicate_ids() {
        let plan = Plan::new(
            "p",
            "Dup",
            vec![
                Segment::new("a", 20, IntensityLevel::Low),
                Segment::new("a", 25, IntensityLevel::Low),
            ],
        );
        assert_eq!(
            plan.validate(45),
            Err(ValidationError::DuplicateSegmentId("a".into()))
        );
    }

    #[test]
    fn validate_rejects_blank_title() {
        let plan = Plan::new("p", "   ", vec![Segment::new("a", 45, IntensityLevel::Low)]);
        assert_eq!(plan.validate(45), Err(ValidationError::EmptyTitle));
    }

    #[test]
    fn metric_defaults_to_higher_is_better() {
        let json = r#"{"kind":"timed"}"#;
        let metric: MetricDefinition = serde_json::from_str(json).unwrap();
        assert!(metric.higher_is_better);
        assert_eq!(metric.kind, MetricKind::Timed);
    }

    #[test]
    fn display_label_prefers_metric_label() {
        let plan = Plan::starter();
        assert_eq!(plan.segment("main-set").unwrap().display_label(), "Rounds");
        assert_eq!(plan.segment("warm-up").unwrap().display_label(), "warm-up");
    }
}
