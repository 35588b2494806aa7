use clap::Subcommand;
use pacekeeper_core::{
    store_log, Config, EngineState, LogStore, MetricInputs, SessionRecorder, TimerState,
};

use super::{find_plan, open_store, print_json, CliResult};

#[derive(Subcommand)]
pub enum LogAction {
    /// List session logs, most recent first
    List {
        /// Only show logs of this plan
        #[arg(long)]
        plan: Option<String>,
        /// Maximum number of logs to print
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Record a session that was not timed live
    Add {
        /// Plan ID
        plan_id: String,
        /// Session length in minutes
        #[arg(long)]
        minutes: u64,
        /// Effort rating 1-10
        #[arg(long, default_value = "")]
        effort: String,
        /// Metric value as SEGMENT=VALUE, repeatable
        #[arg(long = "metric", value_name = "SEGMENT=VALUE")]
        metrics: Vec<String>,
        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
    },
}

pub fn run(action: LogAction) -> CliResult {
    let config = Config::load()?;
    let mut store = open_store(&config)?;

    match action {
        LogAction::List { plan, limit } => {
            let logs: Vec<_> = store
                .load_logs()?
                .into_iter()
                .filter(|log| plan.as_deref().map_or(true, |id| log.plan_id == id))
                .take(limit.unwrap_or(usize::MAX))
                .collect();
            print_json(&logs)?;
        }
        LogAction::Add {
            plan_id,
            minutes,
            effort,
            metrics,
            notes,
        } => {
            let plan = find_plan(&store, &plan_id)?;
            let mut inputs = MetricInputs::for_plan(&plan);
            for pair in &metrics {
                let (segment, value) = pair.split_once('=').unwrap_or((pair.as_str(), ""));
                inputs.set(segment.trim(), value);
            }

            let state = EngineState {
                status: TimerState::Idle,
                elapsed_secs: minutes.saturating_mul(60) as f64,
                total_secs: plan.total_seconds(),
            };
            let recorder = SessionRecorder::new(config.session.default_effort);
            let log = recorder.finish(&state, &inputs, &effort, notes.as_deref(), &plan.id, None);
            store_log(&mut store, log.clone())?;
            print_json(&log)?;
        }
    }
    Ok(())
}
