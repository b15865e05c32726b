use ndfscout_core::probe::mapping as probe;
use ndfscout_core::validator::MAPPING_FIELDS;
use ndfscout_core::BatchValidator;

use super::{CommandOutput, Context};
use crate::error::CliError;

pub async fn run(context: &Context) -> Result<CommandOutput, CliError> {
    let validator = BatchValidator::new(
        context.gateway.clone(),
        context.pacer(probe::DEFAULT_INTERVAL_MS),
        probe::CHUNK_SIZE,
    )?
    .with_fields(&MAPPING_FIELDS);

    let report = probe::run(&validator, &context.catalog).await;
    context.finish(&report)
}
