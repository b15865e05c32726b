use ndfscout_core::probe::coverage as probe;
use ndfscout_core::validator::COVERAGE_FIELDS;
use ndfscout_core::{BatchValidator, ClassifierPolicy};

use super::{CommandOutput, Context};
use crate::error::CliError;

pub async fn run(context: &Context) -> Result<CommandOutput, CliError> {
    let validator = BatchValidator::new(
        context.gateway.clone(),
        context.pacer(probe::DEFAULT_INTERVAL_MS),
        probe::CHUNK_SIZE,
    )?
    .with_fields(&COVERAGE_FIELDS);

    let report = probe::run(&validator, &context.catalog, &ClassifierPolicy::default()).await;
    context.finish(&report)
}
