use clap::Parser;

use crate::{
    commands::{run_command, Cli},
    logging::init_tracing,
};

/// Run the Pastelens CLI application.
///
/// Parses command-line arguments, initializes tracing and executes the
/// requested command.
///
/// # Returns
/// Returns `Ok(())` on success, or the first `PastelensError` raised by the command.
pub async fn run() -> pastelens::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.json, cli.verbose);

    run_command(cli).await
}
