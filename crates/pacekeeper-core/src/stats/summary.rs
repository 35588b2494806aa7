use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::SessionLog;

/// Totals across recorded sessions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionSummary {
    pub sessions: u64,
    pub total_minutes: u64,
    /// Mean effort rating, 0.0 when there are no sessions.
    pub average_effort: f64,
    pub last_session_at: Option<DateTime<Utc>>,
}

impl SessionSummary {
    /// Summarize `logs`, optionally restricted to one plan.
    pub fn from_logs(logs: &[SessionLog], plan_id: Option<&str>) -> Self {
        let mut summary = Self::default();
        let mut effort_sum = 0u64;
        for log in logs
            .iter()
            .filter(|log| plan_id.map_or(true, |id| log.plan_id == id))
        {
            summary.sessions += 1;
            summary.total_minutes += log.duration_min;
            effort_sum += u64::from(log.effort_rating);
            summary.last_session_at = summary.last_session_at.max(Some(log.timestamp));
        }
        if summary.sessions > 0 {
            summary.average_effort = effort_sum as f64 / summary.sessions as f64;
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn log(plan_id: &str, minutes: u64, effort: u8, days_ago: i64) -> SessionLog {
        SessionLog {
            id: format!("{plan_id}-{days_ago}"),
            user_id: None,
            plan_id: plan_id.into(),
            timestamp: Utc::now() - Duration::days(days_ago),
            duration_min: minutes,
            effort_rating: effort,
            notes: None,
            metric_entries: vec![],
        }
    }

    #[test]
    fn empty_summary() {
        let summary = SessionSummary::from_logs(&[], None);
        assert_eq!(summary, SessionSummary::default());
    }

    #[test]
    fn totals_and_average() {
        let logs = vec![log("a", 45, 8, 0), log("a", 40, 6, 1), log("b", 45, 1, 2)];
        let all = SessionSummary::from_logs(&logs, None);
        assert_eq!(all.sessions, 3);
        assert_eq!(all.total_minutes, 130);
        assert_eq!(all.average_effort, 5.0);
        assert_eq!(all.last_session_at, Some(logs[0].timestamp));

        let only_a = SessionSummary::from_logs(&logs, Some("a"));
        assert_eq!(only_a.sessions, 2);
        assert_eq!(only_a.average_effort, 7.0);
    }
}
