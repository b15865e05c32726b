//! Chunked ticker validation against the gateway.
//!
//! A ticker is valid iff the gateway marks it successful AND `PX_LAST` is
//! present and non-null. Chunk failures never abort a batch: the chunk is
//! logged, recorded in [`BatchOutcome::failures`] and contributes nothing.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::gateway::{BloombergGateway, GatewayError, SecurityRecord, TickerCheck};
use crate::throttling::RequestPacer;
use crate::{Price, TickerCandidate, ValidationError, ValidationResult};

/// Fields requested by the outright coverage scan.
pub const COVERAGE_FIELDS: [&str; 3] = ["PX_LAST", "NAME", "LAST_UPDATE"];
/// Fields requested when checking known NDF families.
pub const NDF_CHECK_FIELDS: [&str; 5] = ["PX_LAST", "NAME", "LAST_UPDATE", "PX_BID", "PX_ASK"];
/// Fields requested when verifying alternative families.
pub const MAPPING_FIELDS: [&str; 4] = ["PX_LAST", "NAME", "PX_BID", "PX_ASK"];

/// Which gateway endpoint answers the lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupMode {
    /// `POST /reference` with the given field list.
    Reference { fields: Vec<String> },
    /// `POST /validate-tickers`.
    ValidateEndpoint,
}

/// A chunk whose request failed; its tickers count as unresolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkFailure {
    pub chunk: usize,
    pub tickers: Vec<String>,
    pub code: String,
    pub message: String,
}

impl ChunkFailure {
    fn new(chunk: usize, tickers: Vec<String>, error: &GatewayError) -> Self {
        Self {
            chunk,
            tickers,
            code: String::from(error.code()),
            message: error.message().to_owned(),
        }
    }

    /// One-line summary kept in per-pair reports.
    pub fn describe(&self) -> String {
        format!("chunk {}: {} ({})", self.chunk, self.message, self.code)
    }
}

/// Result of validating one candidate sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutcome {
    pub tested: usize,
    pub valid: Vec<ValidationResult>,
    pub failures: Vec<ChunkFailure>,
}

impl BatchOutcome {
    pub fn failure_messages(&self) -> Vec<String> {
        self.failures.iter().map(ChunkFailure::describe).collect()
    }
}

/// Sends candidate chunks to the gateway, pacing every call.
#[derive(Debug, Clone)]
pub struct BatchValidator {
    gateway: BloombergGateway,
    pacer: RequestPacer,
    chunk_size: usize,
    mode: LookupMode,
}

impl BatchValidator {
    /// Reference-mode validator requesting [`NDF_CHECK_FIELDS`].
    pub fn new(
        gateway: BloombergGateway,
        pacer: RequestPacer,
        chunk_size: usize,
    ) -> Result<Self, ValidationError> {
        if chunk_size == 0 {
            return Err(ValidationError::ZeroChunkSize);
        }

        Ok(Self {
            gateway,
            pacer,
            chunk_size,
            mode: LookupMode::Reference {
                fields: NDF_CHECK_FIELDS.iter().map(|f| String::from(*f)).collect(),
            },
        })
    }

    pub fn with_fields(mut self, fields: &[&str]) -> Self {
        self.mode = LookupMode::Reference {
            fields: fields.iter().map(|f| String::from(*f)).collect(),
        };
        self
    }

    pub fn with_validate_endpoint(mut self) -> Self {
        self.mode = LookupMode::ValidateEndpoint;
        self
    }

    /// Validates `candidates` chunk by chunk, in order.
    ///
    /// Only an empty candidate list is an error; per-chunk gateway errors
    /// are folded into the outcome.
    pub async fn validate(
        &self,
        candidates: &[TickerCandidate],
    ) -> Result<BatchOutcome, GatewayError> {
        if candidates.is_empty() {
            return Err(GatewayError::invalid_request(
                "batch validation requires at least one candidate ticker",
            ));
        }

        let mut outcome = BatchOutcome {
            tested: candidates.len(),
            ..BatchOutcome::default()
        };

        for (index, chunk) in candidates.chunks(self.chunk_size).enumerate() {
            let tickers = chunk.iter().map(|c| c.ticker.clone()).collect::<Vec<_>>();
            self.pacer.wait().await;

            match self.lookup(&tickers, chunk).await {
                Ok(results) => outcome.valid.extend(results),
                Err(error) => {
                    tracing::warn!(
                        chunk = index,
                        size = tickers.len(),
                        code = error.code(),
                        "chunk failed: {}",
                        error.message()
                    );
                    outcome.failures.push(ChunkFailure::new(index, tickers, &error));
                }
            }
        }

        Ok(outcome)
    }

    async fn lookup(
        &self,
        tickers: &[String],
        chunk: &[TickerCandidate],
    ) -> Result<Vec<ValidationResult>, GatewayError> {
        let by_ticker = chunk.iter().fold(HashMap::new(), |mut map, candidate| {
            map.entry(candidate.ticker.as_str()).or_insert(candidate);
            map
        });

        let parsed = match &self.mode {
            LookupMode::Reference { fields } => {
                let fields = fields.iter().map(String::as_str).collect::<Vec<_>>();
                self.gateway
                    .reference(tickers, &fields)
                    .await?
                    .iter()
                    .filter_map(parse_security)
                    .collect::<Vec<_>>()
            }
            LookupMode::ValidateEndpoint => self
                .gateway
                .validate_tickers(tickers)
                .await?
                .iter()
                .filter_map(parse_check)
                .collect::<Vec<_>>(),
        };

        let mut results = Vec::with_capacity(parsed.len());
        for result in parsed {
            let Some(candidate) = by_ticker.get(result.ticker.as_str()) else {
                tracing::warn!(ticker = %result.ticker, "gateway returned a ticker that was not requested");
                continue;
            };
            let result = result.attributed_to(candidate);
            tracing::info!(
                ticker = %result.ticker,
                px_last = %result.px_last,
                name = result.name.as_deref().unwrap_or(""),
                "valid ticker"
            );
            results.push(result);
        }

        Ok(results)
    }
}

/// Valid iff `success` and a non-null `PX_LAST`.
pub fn parse_security(record: &SecurityRecord) -> Option<ValidationResult> {
    if !record.success {
        return None;
    }
    priced_result(&record.security, record.fields.as_ref()?)
}

/// Valid iff `valid` and a non-null `data.PX_LAST`.
pub fn parse_check(check: &TickerCheck) -> Option<ValidationResult> {
    if !check.valid {
        return None;
    }
    priced_result(&check.ticker, check.data.as_ref()?)
}

fn priced_result(ticker: &str, fields: &Map<String, Value>) -> Option<ValidationResult> {
    let px_last = fields.get("PX_LAST").and_then(Price::from_field)?;
    if let Price::Raw(raw) = &px_last {
        tracing::debug!(ticker, value = %raw, "PX_LAST is not numeric; kept as reported");
    }

    let name = fields
        .get("NAME")
        .and_then(Value::as_str)
        .map(str::to_owned);
    let bid = fields.get("PX_BID").and_then(numeric);
    let ask = fields.get("PX_ASK").and_then(numeric);

    Some(
        ValidationResult::new(ticker, px_last)
            .with_quotes(bid, ask)
            .with_name(name),
    )
}

fn numeric(value: &Value) -> Option<f64> {
    Price::from_field(value).as_ref().and_then(Price::as_f64)
}
