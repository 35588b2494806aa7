use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "pacekeeper", version, about = "Pacekeeper CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan management
    Plan {
        #[command(subcommand)]
        action: commands::plan::PlanAction,
    },
    /// Run a live session against a plan
    Run {
        /// Plan ID
        plan_id: String,
    },
    /// Session log management
    Log {
        #[command(subcommand)]
        action: commands::log::LogAction,
    },
    /// Metric improvement for a plan
    Progress {
        /// Plan ID
        plan_id: String,
        /// Only report this segment
        #[arg(long)]
        segment: Option<String>,
    },
    /// Session totals
    Stats {
        /// Only count sessions of this plan
        #[arg(long)]
        plan: Option<String>,
    },
    /// Display name management
    Profile {
        #[command(subcommand)]
        action: commands::profile::ProfileAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("PACEKEEPER_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Plan { action } => commands::plan::run(action),
        Commands::Run { plan_id } => commands::session::run(&plan_id),
        Commands::Log { action } => commands::log::run(action),
        Commands::Progress { plan_id, segment } => {
            commands::stats::progress(&plan_id, segment.as_deref())
        }
        Commands::Stats { plan } => commands::stats::summary(plan.as_deref()),
        Commands::Profile { action } => commands::profile::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "pacekeeper", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
