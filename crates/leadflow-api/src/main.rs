//! Leadflow CLI entry point.
//!
//! Binary name: `lflow`
//!
//! Parses CLI arguments, initializes the database and configuration, then
//! dispatches to the appropriate command handler.

mod cli;
mod state;

use clap::{CommandFactory, Parser};
use clap_complete::generate;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let enable_otel = std::env::var("LEADFLOW_OTEL").is_ok_and(|v| v == "1");
    leadflow_observe::tracing_setup::init_tracing(cli.verbose, cli.quiet, enable_otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = Cli::command();
        generate(*shell, &mut cmd, "lflow", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init().await?;

    let outcome = match cli.command {
        Commands::Import(args) => cli::import::run_import(&state, args, cli.json).await,
        Commands::Session { action } => cli::session::run(&state, action, cli.json).await,
        Commands::Status => cli::status::status(&state, cli.json).await,
        Commands::Completions { .. } => unreachable!("handled above"),
    };

    leadflow_observe::tracing_setup::shutdown_tracing();
    outcome
}
