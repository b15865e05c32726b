//! CLI argument definitions for ndfscout.
//!
//! # Commands
//!
//! | Command | Report prefix | Description |
//! |---------|---------------|-------------|
//! | `coverage` | `forward_coverage_analysis` | Spot + outright forward coverage per pair |
//! | `check-ndf` | `ndf_verification_results` | Known NDF ticker families |
//! | `discover` | `ndf_discovery_results` | Search for alternative forward tickers |
//! | `verify` | `ndf_complete_mapping` | Alternative families merged into the final mapping |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--base-url` | `$NDFSCOUT_GATEWAY_URL` or built-in | Gateway base URL |
//! | `--timeout-ms` | `30000` | Per-call transport timeout |
//! | `--interval-ms` | per command | Minimum spacing between gateway calls |
//! | `--output-dir` | `.` | Directory for JSON reports |
//! | `--catalog` | embedded | Ticker catalog JSON file |
//! | `--no-save` | `false` | Print the summary without writing a report |
//! | `--verbose` | `false` | Debug-level logs (overridden by `RUST_LOG`) |
//!
//! The bearer token is read from `NDFSCOUT_API_KEY` (default `test`).
//!
//! # Examples
//!
//! ```bash
//! ndfscout coverage
//! ndfscout check-ndf --output-dir reports
//! ndfscout verify --catalog catalog/ndf_catalog.json --interval-ms 2000
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ndfscout_core::http_client::DEFAULT_TIMEOUT_MS;

/// NDF and FX forward ticker scout for a Bloomberg reference-data gateway.
#[derive(Debug, Parser)]
#[command(
    name = "ndfscout",
    author,
    version,
    about = "Discover and validate NDF and FX forward tickers",
    long_about = "ndfscout probes a Bloomberg reference-data gateway for forward-curve tickers.\n\
Each command prints a summary to stdout, logs progress to stderr and saves a\n\
timestamped JSON report.\n\
\n\
Use 'ndfscout <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Gateway base URL.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Per-call transport timeout in milliseconds.
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// Minimum spacing between gateway calls in milliseconds.
    ///
    /// Defaults to 500 for coverage and check-ndf, 1000 for discover and verify.
    /// Zero disables pacing.
    #[arg(long, global = true)]
    pub interval_ms: Option<u64>,

    /// Directory the JSON report is written to.
    #[arg(long, global = true, default_value = ".")]
    pub output_dir: PathBuf,

    /// Ticker catalog to use instead of the embedded one.
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Print the summary without writing a report file.
    #[arg(long, global = true, default_value_t = false)]
    pub no_save: bool,

    /// Enable debug-level logging.
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Check spot and 12 outright forward tenors for every pair in the universe.
    ///
    /// Pairs are classified into coverage tiers (full_5y, full_3y,
    /// partial_long, partial_short, spot_only, no_data).
    Coverage,

    /// Check the catalog's known NDF ticker families.
    CheckNdf,

    /// Search for alternative forward tickers for poorly covered pairs.
    Discover,

    /// Verify alternative NDF families and print the final format mapping.
    Verify,
}

impl Command {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Coverage => "coverage",
            Self::CheckNdf => "check-ndf",
            Self::Discover => "discover",
            Self::Verify => "verify",
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn parses_subcommand_with_defaults() {
        let cli = Cli::try_parse_from(["ndfscout", "check-ndf"]).expect("parse");

        assert_eq!(cli.command, Command::CheckNdf);
        assert_eq!(cli.timeout_ms, 30_000);
        assert_eq!(cli.interval_ms, None);
        assert_eq!(cli.output_dir, PathBuf::from("."));
        assert!(cli.catalog.is_none());
        assert!(!cli.no_save);
    }

    #[test]
    fn global_options_are_accepted_after_subcommand() {
        let cli = Cli::try_parse_from([
            "ndfscout",
            "verify",
            "--base-url",
            "http://gateway.test:8080",
            "--interval-ms",
            "0",
            "--output-dir",
            "reports",
            "--no-save",
        ])
        .expect("parse");

        assert_eq!(cli.command, Command::Verify);
        assert_eq!(cli.base_url.as_deref(), Some("http://gateway.test:8080"));
        assert_eq!(cli.interval_ms, Some(0));
        assert_eq!(cli.output_dir, PathBuf::from("reports"));
        assert!(cli.no_save);
    }

    #[test]
    fn rejects_unknown_subcommand_and_bad_numbers() {
        assert!(Cli::try_parse_from(["ndfscout", "quote"]).is_err());
        assert!(Cli::try_parse_from(["ndfscout", "coverage", "--timeout-ms", "soon"]).is_err());
    }
}
