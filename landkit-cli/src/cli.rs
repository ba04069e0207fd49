use clap::{ArgAction, Parser, Subcommand};

use crate::check::{self, CheckArgs};
use crate::logging;
use crate::replay::{self, ReplayArgs};

#[derive(Debug, Parser)]
#[command(
    name = "landkit",
    version,
    about = "Check contact form payloads and replay scripted landing page sessions"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate a contact form payload against the field rules
    Check(CheckArgs),
    /// Replay a JSON step script against the standard landing page
    Replay(ReplayArgs),
}

/// Parse the command line and run the selected command.
///
/// # Errors
///
/// Returns an error if logging cannot be installed or the command fails.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;
    match cli.command {
        Command::Check(args) => check::run(&args),
        Command::Replay(args) => replay::run(&args).await,
    }
}
