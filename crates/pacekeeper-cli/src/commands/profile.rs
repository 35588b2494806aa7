use clap::Subcommand;
use pacekeeper_core::{Config, ProfileStore};
use serde_json::json;

use super::{open_store, print_json, CliResult};

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Print the display name, or set it when NAME is given
    Name {
        name: Option<String>,
    },
}

pub fn run(action: ProfileAction) -> CliResult {
    let config = Config::load()?;
    let mut store = open_store(&config)?;

    let ProfileAction::Name { name } = action;
    if let Some(name) = name {
        store.set_display_name(name.trim())?;
    }
    print_json(&json!({ "display_name": store.display_name()? }))
}
