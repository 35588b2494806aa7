use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded metric value for one segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricEntry {
    pub segment_id: String,
    pub value: f64,
}

/// Immutable record of one saved session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionLog {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub plan_id: String,
    pub timestamp: DateTime<Utc>,
    /// Elapsed time at save, rounded to whole minutes.
    pub duration_min: u64,
    /// 1..=10
    pub effort_rating: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub metric_entries: Vec<MetricEntry>,
}

impl SessionLog {
    pub fn metric(&self, segment_id: &str) -> Option<f64> {
        self.metric_entries
            .iter()
            .find(|e| e.segment_id == segment_id)
            .map(|e| e.value)
    }
}
