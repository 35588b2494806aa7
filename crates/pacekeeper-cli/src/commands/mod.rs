pub mod config;
pub mod log;
pub mod plan;
pub mod profile;
pub mod session;
pub mod stats;

use pacekeeper_core::{Config, CoreError, Plan, PlanStore, SqliteStore};
use serde::Serialize;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Open the default store with the configured log capacity.
pub fn open_store(config: &Config) -> Result<SqliteStore, CoreError> {
    Ok(SqliteStore::open_default()?.with_log_capacity(config.storage.log_capacity))
}

pub fn find_plan(store: &SqliteStore, plan_id: &str) -> Result<Plan, CoreError> {
    store.plan(plan_id)?.ok_or_else(|| CoreError::NotFound {
        kind: "plan",
        id: plan_id.to_string(),
    })
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
