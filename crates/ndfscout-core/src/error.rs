use thiserror::Error;

/// Validation and contract errors exposed by `ndfscout-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid tenor '{value}', expected one of 1W, 2W, 1M, 2M, 3M, 6M, 9M, 1Y, 18M, 2Y, 3Y, 5Y")]
    InvalidTenor { value: String },

    #[error("currency pair must be six ASCII letters: '{value}'")]
    InvalidPair { value: String },
    #[error("currency must be a 3-letter ASCII code: '{value}'")]
    InvalidCurrency { value: String },

    #[error("ticker template cannot be empty")]
    EmptyTemplate,
    #[error("ticker template '{template}' has unknown placeholder '{{{name}}}'")]
    UnknownPlaceholder { template: String, name: String },
    #[error("ticker template '{template}' has an unterminated placeholder")]
    UnterminatedPlaceholder { template: String },

    #[error("chunk size must be greater than zero")]
    ZeroChunkSize,

    #[error("tenor day table is missing an entry for {tenor}")]
    MissingTenorDays { tenor: String },

    #[error("timestamp must be RFC3339 UTC: '{value}'")]
    TimestampNotUtc { value: String },
}

/// Catalog loading and consistency errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("catalog version cannot be empty")]
    EmptyVersion,

    #[error("catalog lists pair {pair} more than once in '{section}'")]
    DuplicatePair { section: &'static str, pair: String },

    #[error("family '{family}' for {pair} has no tenors")]
    EmptyFamily { pair: String, family: String },

    #[error("family '{family}' for {pair} does not use the {{tenor}} placeholder")]
    FamilyWithoutTenor { pair: String, family: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Errors raised while persisting a report artifact.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write report '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),
}
