mod cli;
mod commands;
mod error;

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;
use crate::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

/// Logs go to stderr; stdout carries only the report summary.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "ndfscout=debug,ndfscout_core=debug"
    } else {
        "ndfscout=info,ndfscout_core=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: &Cli) -> Result<(), CliError> {
    let output = commands::run(cli).await?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(output.text.as_bytes())?;
    if let Some(path) = &output.saved_to {
        writeln!(stdout, "\nDetailed results saved to: {}", path.display())?;
    }
    stdout.flush()?;

    Ok(())
}
