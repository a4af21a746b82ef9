mod config;
mod flows;
mod interactive;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use crate::flows::{
    open_context, run_check_command, run_interactive_command, run_list_command,
    run_refresh_command, run_schedule_command, run_upgrade_all_command, ExitStatus,
};

#[derive(Parser, Debug)]
#[command(name = "uplift")]
#[command(about = "Review and apply package upgrades selectively", long_about = None)]
struct Cli {
    /// State root to operate on (default: $UPLIFT_ROOT, else ~/.uplift).
    #[arg(long, global = true)]
    state_root: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve and display upgrade candidates.
    Check {
        /// Also offer version-controlled checkouts for syncing.
        #[arg(long)]
        include_vc: bool,
    },
    /// Upgrade every candidate without a selection step.
    UpgradeAll {
        #[arg(long)]
        include_vc: bool,
    },
    /// Review candidates in a selection list, then upgrade the chosen ones.
    Interactive {
        #[arg(long)]
        include_vc: bool,
    },
    /// Run the unattended check-and-upgrade flow daily at a wall-clock time.
    Schedule {
        /// Firing time, HH:MM (24-hour) or H:MM followed by am/pm.
        time: String,
    },
    /// Refresh the catalog from the configured source.
    Refresh,
    /// List installed packages.
    List,
    /// Generate shell completions.
    Completions { shell: Shell },
}

fn main() {
    let cli = Cli::parse();
    match run_cli(cli) {
        Ok(ExitStatus::Clean) => {}
        Ok(ExitStatus::PartialFailure) => std::process::exit(1),
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(2);
        }
    }
}

fn run_cli(cli: Cli) -> Result<ExitStatus> {
    match cli.command {
        Commands::Check { include_vc } => {
            let context = open_context(cli.state_root)?;
            run_check_command(&context, include_vc)
        }
        Commands::UpgradeAll { include_vc } => {
            let context = open_context(cli.state_root)?;
            run_upgrade_all_command(&context, include_vc)
        }
        Commands::Interactive { include_vc } => {
            let context = open_context(cli.state_root)?;
            run_interactive_command(&context, include_vc)
        }
        Commands::Schedule { time } => {
            let context = open_context(cli.state_root)?;
            run_schedule_command(&context, &time)
        }
        Commands::Refresh => {
            let context = open_context(cli.state_root)?;
            run_refresh_command(&context)
        }
        Commands::List => {
            let context = open_context(cli.state_root)?;
            run_list_command(&context)
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "uplift", &mut std::io::stdout());
            Ok(ExitStatus::Clean)
        }
    }
}
