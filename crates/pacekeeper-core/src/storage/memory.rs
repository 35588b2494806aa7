use super::{append_capped, upsert_plan, LogStore, PlanStore, ProfileStore, DEFAULT_LOG_CAPACITY};
use crate::error::Result;
use crate::plan::Plan;
use crate::session::SessionLog;

/// In-process store. Nothing survives the process.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    plans: Vec<Plan>,
    logs: Vec<SessionLog>,
    display_name: Option<String>,
    log_capacity: usize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_LOG_CAPACITY)
    }

    pub fn with_capacity(log_capacity: usize) -> Self {
        Self {
            plans: Vec::new(),
            logs: Vec::new(),
            display_name: None,
            log_capacity,
        }
    }

    /// Store pre-seeded with the starter plan.
    pub fn seeded() -> Self {
        let mut store = Self::new();
        store.plans.push(Plan::starter());
        store
    }
}

impl PlanStore for MemoryStore {
    fn load_plans(&self) -> Result<Vec<Plan>> {
        Ok(self.plans.clone())
    }

    fn save_plan(&mut self, plan: Plan, expected_total_min: u64) -> Result<()> {
        plan.validate(expected_total_min)?;
        upsert_plan(&mut self.plans, plan);
        Ok(())
    }

    fn remove_plan(&mut self, id: &str) -> Result<bool> {
        let before = self.plans.len();
        self.plans.retain(|p| p.id != id);
        Ok(self.plans.len() != before)
    }
}

impl LogStore for MemoryStore {
    fn load_logs(&self) -> Result<Vec<SessionLog>> {
        Ok(self.logs.clone())
    }

    fn append_log(&mut self, log: SessionLog) -> Result<usize> {
        Ok(append_capped(&mut self.logs, log, self.log_capacity))
    }
}

impl ProfileStore for MemoryStore {
    fn display_name(&self) -> Result<Option<String>> {
        Ok(self.display_name.clone())
    }

    fn set_display_name(&mut self, name: &str) -> Result<()> {
        self.display_name = Some(name.to_string());
        Ok(())
    }
}
