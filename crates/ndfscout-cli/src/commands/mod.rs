mod check_ndf;
mod coverage;
mod discover;
mod verify;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use ndfscout_core::{
    BloombergGateway, Catalog, GatewayConfig, Report, ReportWriter, ReqwestHttpClient,
    RequestPacer,
};

use crate::cli::{Cli, Command};
use crate::error::CliError;

/// Summary text plus where the report was saved, if it was.
#[derive(Debug)]
pub struct CommandOutput {
    pub text: String,
    pub saved_to: Option<PathBuf>,
}

/// Shared collaborators built once from the global options.
pub struct Context {
    pub gateway: BloombergGateway,
    pub catalog: Catalog,
    writer: Option<ReportWriter>,
    interval_ms: Option<u64>,
}

impl Context {
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let mut config = GatewayConfig::from_env().with_timeout_ms(cli.timeout_ms);
        if let Some(base_url) = &cli.base_url {
            config = config.with_base_url(base_url.clone());
        }

        let catalog = match &cli.catalog {
            Some(path) => Catalog::load(path)?,
            None => Catalog::embedded()?,
        };
        tracing::debug!(version = %catalog.version, base_url = %config.base_url, "configuration loaded");

        Ok(Self {
            gateway: BloombergGateway::new(config, Arc::new(ReqwestHttpClient::new())),
            catalog,
            writer: (!cli.no_save).then(|| ReportWriter::new(cli.output_dir.clone())),
            interval_ms: cli.interval_ms,
        })
    }

    /// Pacer for one command; `--interval-ms` overrides `default_ms`.
    pub fn pacer(&self, default_ms: u64) -> RequestPacer {
        let interval = Duration::from_millis(self.interval_ms.unwrap_or(default_ms));
        RequestPacer::fixed_interval(interval)
    }

    pub fn finish<R: Report>(&self, report: &R) -> Result<CommandOutput, CliError> {
        let saved_to = match &self.writer {
            Some(writer) => Some(writer.write(report)?),
            None => None,
        };

        Ok(CommandOutput {
            text: report.render_text(),
            saved_to,
        })
    }
}

pub async fn run(cli: &Cli) -> Result<CommandOutput, CliError> {
    let context = Context::from_cli(cli)?;
    tracing::info!(command = cli.command.name(), "running");

    match cli.command {
        Command::Coverage => coverage::run(&context).await,
        Command::CheckNdf => check_ndf::run(&context).await,
        Command::Discover => discover::run(&context).await,
        Command::Verify => verify::run(&context).await,
    }
}
