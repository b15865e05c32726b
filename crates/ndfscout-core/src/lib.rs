//! # ndfscout Core
//!
//! Ticker discovery and forward-curve coverage probes for a Bloomberg
//! reference-data gateway.
//!
//! ## Overview
//!
//! - **Domain types** for tenors, currency pairs, candidates and results
//! - **Pattern generation** from ticker templates and catalog families
//! - **Batch validation** in paced, fixed-size chunks
//! - **Coverage classification** into ordered tiers
//! - **Reports** rendered as text and saved as timestamped JSON
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`catalog`] | Versioned format families, universes and confirmed formats |
//! | [`classifier`] | Coverage tiers and classification policy |
//! | [`discovery`] | Free-form search payloads and hit filtering |
//! | [`domain`] | Tenor, pair, candidate, result and timestamp types |
//! | [`error`] | Validation, catalog and report errors |
//! | [`gateway`] | Typed client for the three gateway endpoints |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`patterns`] | Ticker templates and candidate generation |
//! | [`probe`] | The four probe runners and their reports |
//! | [`report`] | Report trait, metadata and file writer |
//! | [`throttling`] | Fixed-interval request pacer |
//! | [`validator`] | Chunked ticker validation |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use ndfscout_core::{
//!     probe, BatchValidator, BloombergGateway, Catalog, GatewayConfig, Report, ReportWriter,
//!     ReqwestHttpClient, RequestPacer,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let gateway = BloombergGateway::new(GatewayConfig::from_env(), Arc::new(ReqwestHttpClient::new()));
//!     let pacer = RequestPacer::fixed_interval(Duration::from_millis(500));
//!     let validator = BatchValidator::new(gateway, pacer, probe::ndf_check::CHUNK_SIZE)?;
//!
//!     let report = probe::ndf_check::run(&validator, &Catalog::embedded()?).await;
//!     println!("{}", report.render_text());
//!     ReportWriter::new(".").write(&report)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Gateway failures are per unit of work: a failed chunk or search is
//! logged, recorded in the report and processing continues. Only report
//! persistence and configuration errors stop a run.
//!
//! ```rust
//! use ndfscout_core::{GatewayError, GatewayErrorKind};
//!
//! fn describe(error: &GatewayError) -> &'static str {
//!     match error.kind() {
//!         GatewayErrorKind::Transport => "network",
//!         GatewayErrorKind::Status => "http status",
//!         GatewayErrorKind::MalformedResponse => "unexpected body",
//!         GatewayErrorKind::Rejected => "success=false",
//!         GatewayErrorKind::InvalidRequest => "bad input",
//!     }
//! }
//! ```

pub mod catalog;
pub mod classifier;
pub mod discovery;
pub mod domain;
pub mod error;
pub mod gateway;
pub mod http_client;
pub mod patterns;
pub mod probe;
pub mod report;
pub mod throttling;
pub mod validator;

// Catalog
pub use catalog::{Catalog, ConfirmedFormat, DiscoveryTarget, FormatHint, PairFamilies, TargetKind};

// Classification
pub use classifier::{ClassifierPolicy, CoverageTier, PairCoverage};

// Domain models
pub use domain::{
    coverage_span, validate_currency_code, CurrencyPair, Price, Tenor, TickerCandidate,
    UtcDateTime, ValidationResult,
};

// Error types
pub use error::{CatalogError, ReportError, ValidationError};

// Gateway
pub use gateway::{
    BloombergGateway, DiscoveredTicker, GatewayConfig, GatewayError, GatewayErrorKind,
    SecurityRecord, TickerCheck,
};

// HTTP client types
pub use http_client::{
    BearerToken, HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient,
};

// Candidate generation
pub use patterns::{outright_forward_candidates, FormatFamily, PatternGenerator, TickerTemplate};

// Reports
pub use report::{report_file_name, Report, ReportMeta, ReportWriter, RunId};

// Throttling
pub use throttling::RequestPacer;

// Validation
pub use validator::{BatchOutcome, BatchValidator, ChunkFailure, LookupMode};
