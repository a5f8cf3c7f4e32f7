mod autopilot_cmds;
mod config;
mod household_cmds;
mod insights_cmd;
mod optimize_cmd;
mod status_cmd;
mod store;
mod targets_cmd;
#[cfg(test)]
mod test_util;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use config::SwanConfig;
use store::Store;

#[derive(Parser)]
#[command(name = "swanplan", about = "Household nutrition planner and autopilot")]
struct Cli {
    /// Data directory for change log and insights (overrides XDG default)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Baseline source savings are measured against (overrides SWANPLAN_BASELINE_SOURCE)
    #[arg(long, global = true)]
    baseline_source: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a swanplan config file with defaults
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Household file management
    Household {
        #[command(subcommand)]
        command: HouseholdCommands,
    },
    /// Show effective nutrition targets per person
    Targets {
        /// Path to the household TOML file
        #[arg(default_value = "household.toml")]
        file: PathBuf,
        /// Show one person only
        #[arg(long)]
        person: Option<String>,
    },
    /// Optimize the weekly shop across sources
    Optimize {
        /// Path to the household TOML file
        #[arg(default_value = "household.toml")]
        file: PathBuf,
    },
    /// Autopilot change management
    Autopilot {
        #[command(subcommand)]
        command: AutopilotCommands,
    },
    /// Recompute and show insights
    Insights {
        /// Path to the household TOML file
        #[arg(default_value = "household.toml")]
        file: PathBuf,
    },
    /// Show household status at a glance
    Status {
        /// Path to the household TOML file
        #[arg(default_value = "household.toml")]
        file: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum HouseholdCommands {
    /// Show the parsed household
    Show {
        /// Path to the household TOML file
        #[arg(default_value = "household.toml")]
        file: PathBuf,
    },
    /// Validate a household file without running anything
    Validate {
        /// Path to the household TOML file
        #[arg(default_value = "household.toml")]
        file: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum AutopilotCommands {
    /// Run a proposal pass and record the results
    Propose {
        /// Path to the household TOML file
        #[arg(default_value = "household.toml")]
        file: PathBuf,
    },
    /// List changes (pending by default)
    List {
        /// Include resolved and applied changes
        #[arg(long)]
        all: bool,
    },
    /// Approve a pending change
    Approve {
        /// Change ID to approve
        change_id: String,
    },
    /// Dismiss a pending change
    Dismiss {
        /// Change ID to dismiss
        change_id: String,
    },
    /// Revert an applied change
    Revert {
        /// Change ID to revert
        change_id: String,
        /// Why the change is being rolled back
        #[arg(long)]
        reason: String,
    },
}

/// Execute the `swanplan init` command: write a default config file.
fn cmd_init(force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile {
        budget: config::BudgetSection {
            baseline_source: Some(config::DEFAULT_BASELINE_SOURCE.to_string()),
        },
        ..config::ConfigFile::default()
    };
    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  budget.baseline_source = {}", config::DEFAULT_BASELINE_SOURCE);
    println!();
    println!("Next: write a household.toml and run `swanplan household validate`.");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let store = Store::resolve(cli.data_dir.as_deref());

    match cli.command {
        Commands::Init { force } => {
            cmd_init(force)?;
        }
        Commands::Household { command } => match command {
            HouseholdCommands::Show { file } => {
                household_cmds::run_show(&file)?;
            }
            HouseholdCommands::Validate { file } => {
                household_cmds::run_validate(&file)?;
            }
        },
        Commands::Targets { file, person } => {
            targets_cmd::run_targets(&file, person.as_deref())?;
        }
        Commands::Optimize { file } => {
            let resolved = SwanConfig::resolve(cli.baseline_source.as_deref())?;
            optimize_cmd::run_optimize(&file, &resolved)?;
        }
        Commands::Autopilot { command } => match command {
            AutopilotCommands::Propose { file } => {
                let resolved = SwanConfig::resolve(cli.baseline_source.as_deref())?;
                autopilot_cmds::run_propose(&file, &store, &resolved)?;
            }
            AutopilotCommands::List { all } => {
                autopilot_cmds::run_list(&store, all)?;
            }
            AutopilotCommands::Approve { change_id } => {
                autopilot_cmds::run_approve(&store, &change_id)?;
            }
            AutopilotCommands::Dismiss { change_id } => {
                autopilot_cmds::run_dismiss(&store, &change_id)?;
            }
            AutopilotCommands::Revert { change_id, reason } => {
                autopilot_cmds::run_revert(&store, &change_id, &reason)?;
            }
        },
        Commands::Insights { file } => {
            let resolved = SwanConfig::resolve(cli.baseline_source.as_deref())?;
            insights_cmd::run_insights(&file, &store, &resolved)?;
        }
        Commands::Status { file } => {
            let resolved = SwanConfig::resolve(cli.baseline_source.as_deref())?;
            status_cmd::run_status(&file, &store, &resolved)?;
        }
    }

    Ok(())
}
