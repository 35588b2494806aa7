use std::path::PathBuf;

use clap::Subcommand;
use pacekeeper_core::plan::{segment_bounds, SegmentBounds};
use pacekeeper_core::{Config, Plan, PlanStore};
use serde::Serialize;

use super::{find_plan, open_store, print_json, CliResult};

#[derive(Subcommand)]
pub enum PlanAction {
    /// List all plans
    List,
    /// Show one plan with its segment timeline
    Show {
        /// Plan ID
        id: String,
    },
    /// Add or replace a plan from a JSON file
    Add {
        /// Path to the plan JSON
        file: PathBuf,
    },
    /// Remove a plan
    Remove {
        /// Plan ID
        id: String,
    },
}

#[derive(Serialize)]
struct PlanSummary<'a> {
    id: &'a str,
    title: &'a str,
    segments: usize,
    total_minutes: u64,
}

#[derive(Serialize)]
struct PlanDetail<'a> {
    #[serde(flatten)]
    plan: &'a Plan,
    total_seconds: u64,
    timeline: Vec<SegmentBounds>,
}

pub fn run(action: PlanAction) -> CliResult {
    let config = Config::load()?;
    let mut store = open_store(&config)?;

    match action {
        PlanAction::List => {
            let plans = store.load_plans()?;
            let summaries: Vec<_> = plans
                .iter()
                .map(|p| PlanSummary {
                    id: &p.id,
                    title: &p.title,
                    segments: p.segments.len(),
                    total_minutes: p.total_minutes(),
                })
                .collect();
            print_json(&summaries)?;
        }
        PlanAction::Show { id } => {
            let plan = find_plan(&store, &id)?;
            print_json(&PlanDetail {
                plan: &plan,
                total_seconds: plan.total_seconds(),
                timeline: segment_bounds(&plan.segments),
            })?;
        }
        PlanAction::Add { file } => {
            let content = std::fs::read_to_string(&file)?;
            let plan: Plan = serde_json::from_str(&content)?;
            let id = plan.id.clone();
            store.save_plan(plan, config.session.total_minutes)?;
            eprintln!("Plan saved: {id}");
        }
        PlanAction::Remove { id } => {
            if store.remove_plan(&id)? {
                eprintln!("Plan removed: {id}");
            } else {
                return Err(format!("plan not found: {id}").into());
            }
        }
    }
    Ok(())
}
