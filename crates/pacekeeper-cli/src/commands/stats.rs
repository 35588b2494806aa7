use pacekeeper_core::{Config, LogStore, ProgressAnalyzer, SessionSummary};

use super::{find_plan, open_store, print_json, CliResult};

pub fn progress(plan_id: &str, segment: Option<&str>) -> CliResult {
    let config = Config::load()?;
    let store = open_store(&config)?;
    let plan = find_plan(&store, plan_id)?;
    let logs = store.load_logs()?;
    let analyzer = ProgressAnalyzer::new();

    match segment {
        Some(segment_id) => {
            if plan.segment(segment_id).is_none() {
                return Err(format!("segment not found in plan {plan_id}: {segment_id}").into());
            }
            print_json(&analyzer.improvement(&logs, &plan.id, segment_id))
        }
        None => print_json(&analyzer.plan_report(&plan, &logs)),
    }
}

pub fn summary(plan_id: Option<&str>) -> CliResult {
    let config = Config::load()?;
    let store = open_store(&config)?;
    let logs = store.load_logs()?;
    print_json(&SessionSummary::from_logs(&logs, plan_id))
}
