//! Session recording.
//!
//! [`SessionRecorder`] builds the immutable [`SessionLog`]; [`save_session`]
//! runs the full hand-off: build the log, append it to the store, reset the
//! engine. Every append goes through [`store_log`].

mod log;
mod recorder;

pub use log::{MetricEntry, SessionLog};
pub use recorder::{
    parse_effort, parse_metric_value, MetricInputs, SessionRecorder, MAX_EFFORT, MIN_EFFORT,
};

use chrono::Utc;
use tracing::info;

use crate::error::Result;
use crate::events::Event;
use crate::storage::LogStore;
use crate::timer::TimerEngine;

/// What the user entered when saving a session.
#[derive(Debug, Clone, Default)]
pub struct SessionInput {
    pub metrics: MetricInputs,
    /// Raw effort text; malformed input falls back to the recorder default.
    pub effort: String,
    pub notes: Option<String>,
    pub user_id: Option<String>,
}

/// Append `log` to `store` and report how many old logs were evicted.
///
/// # Errors
/// Returns an error if the store rejects the append.
pub fn store_log<S: LogStore + ?Sized>(store: &mut S, log: SessionLog) -> Result<usize> {
    let (id, plan_id, duration_min) = (log.id.clone(), log.plan_id.clone(), log.duration_min);
    let evicted = store.append_log(log)?;
    info!(log = %id, plan = %plan_id, duration_min, evicted, "session saved");
    Ok(evicted)
}

/// Finish the running session, append it to `store` and reset `engine`.
///
/// The engine is only reset once the log is stored, so a failed append
/// leaves the session intact for another attempt.
///
/// # Errors
/// Returns an error if the store rejects the append.
pub fn save_session<S: LogStore + ?Sized>(
    engine: &mut TimerEngine,
    store: &mut S,
    recorder: &SessionRecorder,
    input: &SessionInput,
) -> Result<(SessionLog, Event)> {
    let log = recorder.finish(
        &engine.progress(),
        &input.metrics,
        &input.effort,
        input.notes.as_deref(),
        &engine.plan().id,
        input.user_id.as_deref(),
    );
    let evicted = store_log(store, log.clone())?;
    engine.reset();

    let event = Event::SessionSaved {
        log_id: log.id.clone(),
        plan_id: log.plan_id.clone(),
        duration_min: log.duration_min,
        evicted,
        at: Utc::now(),
    };
    Ok((log, event))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::Plan;
    use crate::storage::MemoryStore;
    use crate::timer::TimerState;

    #[test]
    fn save_appends_then_resets() {
        let mut engine = TimerEngine::new(Plan::starter());
        engine.start();
        engine.tick(1200.0);

        let mut store = MemoryStore::seeded();
        let mut input = SessionInput {
            metrics: MetricInputs::for_plan(engine.plan()),
            effort: "7".into(),
            ..Default::default()
        };
        input.metrics.set("main-set", "6");

        let (log, event) =
            save_session(&mut engine, &mut store, &SessionRecorder::default(), &input).unwrap();

        assert_eq!(log.duration_min, 20);
        assert_eq!(log.plan_id, "starter");
        assert_eq!(log.metric("main-set"), Some(6.0));
        assert!(matches!(event, Event::SessionSaved { evicted: 0, .. }));
        assert_eq!(store.load_logs().unwrap(), vec![log]);
        assert_eq!(engine.state(), TimerState::Idle);
        assert_eq!(engine.elapsed_secs(), 0.0);
    }

    #[test]
    fn store_log_reports_evictions() {
        let mut store = MemoryStore::with_capacity(1);
        let recorder = SessionRecorder::default();
        let state = TimerEngine::new(Plan::starter()).progress();
        let first = recorder.finish(&state, &MetricInputs::new(), "5", None, "starter", None);
        let second = recorder.finish(&state, &MetricInputs::new(), "6", None, "starter", None);

        assert_eq!(store_log(&mut store, first).unwrap(), 0);
        assert_eq!(store_log(&mut store, second.clone()).unwrap(), 1);
        assert_eq!(store.load_logs().unwrap(), vec![second]);
    }

    #[test]
    fn failed_save_keeps_session() {
        struct Broken;
        impl LogStore for Broken {
            fn load_logs(&self) -> Result<Vec<SessionLog>> {
                Ok(Vec::new())
            }
            fn append_log(&mut self, _log: SessionLog) -> Result<usize> {
                Err(crate::error::StoreError::Locked.into())
            }
        }

        let mut engine = TimerEngine::new(Plan::starter());
        engine.start();
        engine.tick(300.0);
        let result = save_session(
            &mut engine,
            &mut Broken,
            &SessionRecorder::default(),
            &SessionInput::default(),
        );
        assert!(result.is_err());
        assert_eq!(engine.state(), TimerState::Running);
        assert_eq!(engine.elapsed_secs(), 300.0);
    }
}
