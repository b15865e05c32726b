use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ndfscout_core::ValidationError),

    #[error(transparent)]
    Catalog(#[from] ndfscout_core::CatalogError),

    #[error(transparent)]
    Report(#[from] ndfscout_core::ReportError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Catalog(_) => 2,
            Self::Report(ndfscout_core::ReportError::Serialization(_)) => 4,
            Self::Report(ndfscout_core::ReportError::Write { .. }) => 10,
            Self::Io(_) => 10,
        }
    }
}
