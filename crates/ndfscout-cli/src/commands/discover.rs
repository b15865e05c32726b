use ndfscout_core::probe::ndf_discovery::{self as probe, DiscoveryProbe};
use ndfscout_core::BatchValidator;

use super::{CommandOutput, Context};
use crate::error::CliError;

pub async fn run(context: &Context) -> Result<CommandOutput, CliError> {
    let pacer = context.pacer(probe::DEFAULT_INTERVAL_MS);
    let validator = BatchValidator::new(context.gateway.clone(), pacer.clone(), probe::CHUNK_SIZE)?
        .with_validate_endpoint();

    let report = DiscoveryProbe::new(context.gateway.clone(), pacer, validator)
        .run(&context.catalog)
        .await;
    context.finish(&report)
}
