//! SQLite-backed store.
//!
//! Holds three independent JSON entries in a key-value table:
//! - `plans`: the plan list
//! - `logs`: session logs, most recent first
//! - `display_name`: the user's display name

use std::path::Path;

use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::{
    append_capped, data_dir, migrations, upsert_plan, LogStore, PlanStore, ProfileStore,
    DEFAULT_LOG_CAPACITY,
};
use crate::error::{Result, StoreError};
use crate::plan::Plan;
use crate::session::SessionLog;

const PLANS_KEY: &str = "plans";
const LOGS_KEY: &str = "logs";
const DISPLAY_NAME_KEY: &str = "display_name";

pub struct SqliteStore {
    conn: Connection,
    log_capacity: usize,
}

impl SqliteStore {
    /// Open the store at `~/.config/pacekeeper/pacekeeper.db`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or initialized.
    pub fn open_default() -> Result<Self> {
        Self::open(data_dir()?.join("pacekeeper.db"))
    }

    /// Open (creating if needed) and initialize the store at `path`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or initialized.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self {
            conn,
            log_capacity: DEFAULT_LOG_CAPACITY,
        };
        store.init()?;
        Ok(store)
    }

    /// Open an in-memory store.
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn,
            log_capacity: DEFAULT_LOG_CAPACITY,
        };
        store.init()?;
        Ok(store)
    }

    pub fn with_log_capacity(mut self, log_capacity: usize) -> Self {
        self.log_capacity = log_capacity;
        self
    }

    /// Create the schema and seed the starter plan into a fresh store.
    fn init(&self) -> Result<()> {
        migrations::migrate(&self.conn)?;
        if self.kv_get(PLANS_KEY)?.is_none() {
            debug!("seeding starter plan");
            self.put_json(PLANS_KEY, &vec![Plan::starter()])?;
        }
        Ok(())
    }

    fn kv_get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn kv_set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.kv_get(key)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| {
                    StoreError::Corrupt {
                        key: key.to_string(),
                        message: e.to_string(),
                    }
                    .into()
                }),
            None => Ok(None),
        }
    }

    fn put_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.kv_set(key, &raw)?;
        Ok(())
    }
}

impl PlanStore for SqliteStore {
    fn load_plans(&self) -> Result<Vec<Plan>> {
        Ok(self.get_json(PLANS_KEY)?.unwrap_or_default())
    }

    fn save_plan(&mut self, plan: Plan, expected_total_min: u64) -> Result<()> {
        plan.validate(expected_total_min)?;
        let mut plans = self.load_plans()?;
        upsert_plan(&mut plans, plan);
        self.put_json(PLANS_KEY, &plans)
    }

    fn remove_plan(&mut self, id: &str) -> Result<bool> {
        let mut plans = self.load_plans()?;
        let before = plans.len();
        plans.retain(|p| p.id != id);
        if plans.len() == before {
            return Ok(false);
        }
        self.put_json(PLANS_KEY, &plans)?;
        Ok(true)
    }
}

impl LogStore for SqliteStore {
    fn load_logs(&self) -> Result<Vec<SessionLog>> {
        Ok(self.get_json(LOGS_KEY)?.unwrap_or_default())
    }

    fn append_log(&mut self, log: SessionLog) -> Result<usize> {
        let mut logs = self.load_logs()?;
        let evicted = append_capped(&mut logs, log, self.log_capacity);
        self.put_json(LOGS_KEY, &logs)?;
        Ok(evicted)
    }
}

impl ProfileStore for SqliteStore {
    fn display_name(&self) -> Result<Option<String>> {
        self.get_json(DISPLAY_NAME_KEY)
    }

    fn set_display_name(&mut self, name: &str) -> Result<()> {
        self.put_json(DISPLAY_NAME_KEY, name)
    }
}
