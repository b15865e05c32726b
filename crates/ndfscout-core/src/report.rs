//! Report persistence.
//!
//! Every probe writes exactly one pretty-printed JSON document named
//! `<tool>_<YYYYMMDD_HHMMSS>.json` (UTC). Write failures are returned to the
//! caller; there is no fallback location.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ReportError;
use crate::UtcDateTime;

/// Run identifier (UUID v4) carried in every report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(Uuid);

impl RunId {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// Metadata shared by all report documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMeta {
    pub timestamp: UtcDateTime,
    pub run_id: RunId,
}

impl ReportMeta {
    pub fn now() -> Self {
        Self::at(UtcDateTime::now())
    }

    pub fn at(timestamp: UtcDateTime) -> Self {
        Self {
            timestamp,
            run_id: RunId::new_v4(),
        }
    }
}

/// A report document a probe can persist and print.
pub trait Report: Serialize {
    /// File name prefix, e.g. `forward_coverage_analysis`.
    fn tool(&self) -> &'static str;

    fn meta(&self) -> &ReportMeta;

    /// Deterministic console summary.
    fn render_text(&self) -> String;
}

/// `<tool>_<YYYYMMDD_HHMMSS>.json`
pub fn report_file_name(tool: &str, timestamp: UtcDateTime) -> String {
    format!("{tool}_{}.json", timestamp.file_stamp())
}

/// Writes report documents into one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportWriter {
    dir: PathBuf,
}

impl ReportWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Serializes `report` and writes it; returns the path written.
    pub fn write<R: Report>(&self, report: &R) -> Result<PathBuf, ReportError> {
        let path = self
            .dir
            .join(report_file_name(report.tool(), report.meta().timestamp));
        let body = serde_json::to_string_pretty(report)?;

        std::fs::write(&path, body).map_err(|source| ReportError::Write {
            path: path.display().to_string(),
            source,
        })?;

        tracing::info!(path = %path.display(), tool = report.tool(), "report saved");
        Ok(path)
    }
}
