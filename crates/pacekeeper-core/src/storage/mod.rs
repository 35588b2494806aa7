//! Persistence for plans, session logs and the display name.
//!
//! The engine and analyzer only see the [`PlanStore`], [`LogStore`] and
//! [`ProfileStore`] traits. [`SqliteStore`] is the default backing store,
//! [`MemoryStore`] serves tests and embedders.

mod config;
mod memory;
pub mod migrations;
mod sqlite;

pub use config::{Config, SessionConfig, StorageConfig};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use std::path::PathBuf;

use crate::error::Result;
use crate::plan::Plan;
use crate::session::SessionLog;

/// Number of session logs kept unless configured otherwise.
pub const DEFAULT_LOG_CAPACITY: usize = 500;

/// Plan collection. Order and ids are stable across reads.
pub trait PlanStore {
    fn load_plans(&self) -> Result<Vec<Plan>>;

    /// Authoring boundary: validates `plan` against `expected_total_min`,
    /// then inserts it or replaces the plan with the same id.
    fn save_plan(&mut self, plan: Plan, expected_total_min: u64) -> Result<()>;

    /// Returns whether a plan was removed.
    fn remove_plan(&mut self, id: &str) -> Result<bool>;

    fn plan(&self, id: &str) -> Result<Option<Plan>> {
        Ok(self.load_plans()?.into_iter().find(|p| p.id == id))
    }
}

/// Append-only, capacity-bounded session history.
pub trait LogStore {
    /// Logs in most-recent-first order.
    fn load_logs(&self) -> Result<Vec<SessionLog>>;

    /// Prepend `log`, dropping the oldest entries beyond capacity.
    /// Returns how many entries were dropped.
    fn append_log(&mut self, log: SessionLog) -> Result<usize>;
}

pub trait ProfileStore {
    fn display_name(&self) -> Result<Option<String>>;
    fn set_display_name(&mut self, name: &str) -> Result<()>;
}

/// Shared eviction rule: newest first, at most `capacity` entries.
pub fn append_capped(logs: &mut Vec<SessionLog>, log: SessionLog, capacity: usize) -> usize {
    logs.insert(0, log);
    let evicted = logs.len().saturating_sub(capacity);
    logs.truncate(capacity);
    evicted
}

/// Insert `plan`, replacing any plan with the same id in place.
pub(crate) fn upsert_plan(plans: &mut Vec<Plan>, plan: Plan) {
    match plans.iter_mut().find(|p| p.id == plan.id) {
        Some(existing) => *existing = plan,
        None => plans.push(plan),
    }
}

/// Returns the data directory, creating it if needed.
///
/// `PACEKEEPER_DATA_DIR` wins when set. Otherwise `~/.config/pacekeeper`,
/// or `~/.config/pacekeeper-dev` when `PACEKEEPER_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("PACEKEEPER_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("PACEKEEPER_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("pacekeeper-dev")
            } else {
                base_dir.join("pacekeeper")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn log(id: usize) -> SessionLog {
        SessionLog {
            id: id.to_string(),
            user_id: None,
            plan_id: "p".into(),
            timestamp: Utc::now(),
            duration_min: 45,
            effort_rating: 5,
            notes: None,
            metric_entries: vec![],
        }
    }

    #[test]
    fn append_capped_keeps_newest_first() {
        let mut logs = Vec::new();
        for i in 0..3 {
            assert_eq!(append_capped(&mut logs, log(i), 500), 0);
        }
        let ids: Vec<_> = logs.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1", "0"]);
    }

    #[test]
    fn append_to_full_store_drops_oldest() {
        let mut logs = Vec::new();
        for i in 0..DEFAULT_LOG_CAPACITY {
            append_capped(&mut logs, log(i), DEFAULT_LOG_CAPACITY);
        }
        assert_eq!(logs.len(), 500);

        let evicted = append_capped(&mut logs, log(500), DEFAULT_LOG_CAPACITY);
        assert_eq!(evicted, 1);
        assert_eq!(logs.len(), 500);
        assert_eq!(logs.first().unwrap().id, "500");
        assert_eq!(logs.last().unwrap().id, "1");
    }

    #[test]
    fn upsert_replaces_in_place() {
        let mut plans = vec![Plan::starter(), Plan::new("b", "B", vec![])];
        let mut edited = Plan::starter();
        edited.title = "Renamed".into();
        upsert_plan(&mut plans, edited);
        assert_eq!(plans.len(), 2);
        assert_eq!(plans[0].title, "Renamed");
    }
}
