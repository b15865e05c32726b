//! Client for the Bloomberg reference-data gateway.
//!
//! Three endpoints are used, all `POST` with a JSON body:
//!
//! | Endpoint | Body | Response |
//! |----------|------|----------|
//! | `/api/bloomberg/reference` | `{securities, fields}` | `{success, data: {securities_data: [..]}}` |
//! | `/api/bloomberg/ticker-discovery` | free-form search parameters | `{success, tickers: [..]}` |
//! | `/api/bloomberg/validate-tickers` | `[ticker, ..]` | `{success, results: [..]}` |
//!
//! Responses are decoded into typed wire structs. Any shape mismatch becomes
//! a single [`GatewayErrorKind::MalformedResponse`] error.

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::http_client::{BearerToken, HttpClient, HttpRequest, DEFAULT_TIMEOUT_MS};

pub const DEFAULT_BASE_URL: &str = "http://20.172.249.92:8080";
pub const DEFAULT_API_KEY: &str = "test";

pub const API_KEY_ENV: &str = "NDFSCOUT_API_KEY";
pub const BASE_URL_ENV: &str = "NDFSCOUT_GATEWAY_URL";

const REFERENCE_PATH: &str = "/api/bloomberg/reference";
const DISCOVERY_PATH: &str = "/api/bloomberg/ticker-discovery";
const VALIDATE_PATH: &str = "/api/bloomberg/validate-tickers";

/// Connection settings for the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_ms: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_BASE_URL),
            api_key: String::from(DEFAULT_API_KEY),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl GatewayConfig {
    /// Defaults overridden by `NDFSCOUT_GATEWAY_URL` and `NDFSCOUT_API_KEY`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var(BASE_URL_ENV).unwrap_or(defaults.base_url),
            api_key: std::env::var(API_KEY_ENV).unwrap_or(defaults.api_key),
            timeout_ms: defaults.timeout_ms,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }
}

/// Gateway error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayErrorKind {
    Transport,
    Status,
    MalformedResponse,
    Rejected,
    InvalidRequest,
}

/// Structured gateway error; callers log it and treat the unit as empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayError {
    kind: GatewayErrorKind,
    message: String,
}

impl GatewayError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: GatewayErrorKind::Transport,
            message: message.into(),
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            kind: GatewayErrorKind::Status,
            message: format!("gateway returned status {status}"),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self {
            kind: GatewayErrorKind::MalformedResponse,
            message: message.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            kind: GatewayErrorKind::Rejected,
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: GatewayErrorKind::InvalidRequest,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> GatewayErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            GatewayErrorKind::Transport => "gateway.transport",
            GatewayErrorKind::Status => "gateway.status",
            GatewayErrorKind::MalformedResponse => "gateway.malformed_response",
            GatewayErrorKind::Rejected => "gateway.rejected",
            GatewayErrorKind::InvalidRequest => "gateway.invalid_request",
        }
    }
}

impl Display for GatewayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for GatewayError {}

/// One entry of `data.securities_data`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SecurityRecord {
    pub security: String,
    /// A missing flag reads as `false`: only this record is invalid.
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub fields: Option<Map<String, Value>>,
}

/// One hit from the ticker-discovery endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredTicker {
    #[serde(default)]
    pub ticker: String,
    #[serde(default)]
    pub description: String,
}

/// One entry from the validate-tickers endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TickerCheck {
    pub ticker: String,
    #[serde(default)]
    pub valid: bool,
    #[serde(default)]
    pub data: Option<Map<String, Value>>,
}

#[derive(Debug, Serialize)]
struct ReferenceBody<'a> {
    securities: &'a [String],
    fields: &'a [&'a str],
}

#[derive(Debug, Deserialize)]
struct ReferenceEnvelope {
    success: bool,
    #[serde(default)]
    data: Option<ReferenceData>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReferenceData {
    securities_data: Vec<SecurityRecord>,
}

#[derive(Debug, Deserialize)]
struct DiscoveryEnvelope {
    success: bool,
    #[serde(default)]
    tickers: Vec<DiscoveredTicker>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ValidateEnvelope {
    success: bool,
    #[serde(default)]
    results: Vec<TickerCheck>,
    #[serde(default)]
    error: Option<String>,
}

/// Bloomberg gateway client over an injectable transport.
#[derive(Clone)]
pub struct BloombergGateway {
    config: GatewayConfig,
    token: BearerToken,
    http_client: Arc<dyn HttpClient>,
}

impl BloombergGateway {
    pub fn new(config: GatewayConfig, http_client: Arc<dyn HttpClient>) -> Self {
        let token = BearerToken::new(config.api_key.clone());
        Self {
            config,
            token,
            http_client,
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Batch reference lookup for `securities` with the given `fields`.
    pub async fn reference(
        &self,
        securities: &[String],
        fields: &[&str],
    ) -> Result<Vec<SecurityRecord>, GatewayError> {
        if securities.is_empty() {
            return Err(GatewayError::invalid_request(
                "reference request must include at least one security",
            ));
        }

        let body = serde_json::to_string(&ReferenceBody { securities, fields })
            .map_err(|e| GatewayError::invalid_request(format!("failed to encode request: {e}")))?;
        let envelope: ReferenceEnvelope = self.post(REFERENCE_PATH, body).await?;

        if !envelope.success {
            return Err(rejected("reference", envelope.error));
        }

        envelope
            .data
            .map(|data| data.securities_data)
            .ok_or_else(|| GatewayError::malformed("reference response is missing 'data'"))
    }

    /// Free-form ticker search; `query` is forwarded verbatim.
    pub async fn discover(&self, query: &Value) -> Result<Vec<DiscoveredTicker>, GatewayError> {
        let body = serde_json::to_string(query)
            .map_err(|e| GatewayError::invalid_request(format!("failed to encode request: {e}")))?;
        let envelope: DiscoveryEnvelope = self.post(DISCOVERY_PATH, body).await?;

        if !envelope.success {
            return Err(rejected("ticker-discovery", envelope.error));
        }

        Ok(envelope.tickers)
    }

    /// Existence check for a list of candidate tickers.
    pub async fn validate_tickers(
        &self,
        tickers: &[String],
    ) -> Result<Vec<TickerCheck>, GatewayError> {
        if tickers.is_empty() {
            return Err(GatewayError::invalid_request(
                "validate-tickers request must include at least one ticker",
            ));
        }

        let body = serde_json::to_string(tickers)
            .map_err(|e| GatewayError::invalid_request(format!("failed to encode request: {e}")))?;
        let envelope: ValidateEnvelope = self.post(VALIDATE_PATH, body).await?;

        if !envelope.success {
            return Err(rejected("validate-tickers", envelope.error));
        }

        Ok(envelope.results)
    }

    async fn post<T>(&self, path: &str, body: String) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
    {
        let request = HttpRequest::post_json(self.config.endpoint(path), body)
            .with_bearer(&self.token)
            .with_timeout_ms(self.config.timeout_ms);

        let response = self.http_client.execute(request).await.map_err(|e| {
            if e.is_timeout() {
                GatewayError::transport(format!("gateway timed out on {path}: {}", e.message()))
            } else {
                GatewayError::transport(format!("gateway transport error: {}", e.message()))
            }
        })?;

        if !response.is_success() {
            return Err(GatewayError::status(response.status));
        }

        serde_json::from_str(&response.body).map_err(|e| {
            GatewayError::malformed(format!("unexpected response shape from {path}: {e}"))
        })
    }
}

impl std::fmt::Debug for BloombergGateway {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BloombergGateway")
            .field("base_url", &self.config.base_url)
            .field("timeout_ms", &self.config.timeout_ms)
            .finish_non_exhaustive()
    }
}

fn rejected(endpoint: &str, error: Option<String>) -> GatewayError {
    match error {
        Some(detail) => GatewayError::rejected(format!("{endpoint} request rejected: {detail}")),
        None => GatewayError::rejected(format!("{endpoint} request reported success=false")),
    }
}
