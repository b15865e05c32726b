//! Verifies alternative NDF families and merges them with the catalog's
//! confirmed formats into the final pair → format mapping.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

use serde::Serialize;

use super::{banner, check_candidates, PairCheck};
use crate::catalog::{Catalog, PairFamilies};
use crate::report::{Report, ReportMeta};
use crate::validator::BatchValidator;
use crate::{coverage_span, CurrencyPair};

pub const TOOL: &str = "ndf_complete_mapping";
pub const CHUNK_SIZE: usize = 20;
pub const DEFAULT_INTERVAL_MS: u64 = 1_000;
const SAMPLE_TICKERS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatSource {
    /// Carried over from the catalog's confirmed formats.
    Confirmed,
    /// Found working in this run.
    Verified,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkingFormat {
    pub summary: String,
    pub source: FormatSource,
}

/// One row of the recommended-format table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingRow {
    pub pair: CurrencyPair,
    pub format: String,
    pub example: String,
    pub coverage: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TickerFormat {
    pub format: String,
    pub example: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub working_tickers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MappingReport {
    #[serde(flatten)]
    pub meta: ReportMeta,
    pub working_ndfs: BTreeMap<CurrencyPair, WorkingFormat>,
    pub detailed_results: BTreeMap<CurrencyPair, PairCheck>,
    pub ticker_formats: BTreeMap<CurrencyPair, TickerFormat>,
    pub still_missing: Vec<CurrencyPair>,
    /// Table rows: confirmed formats first, then this run's discoveries.
    pub recommended: Vec<MappingRow>,
}

impl MappingReport {
    /// `checks` pairs each verified catalog entry with its result, in catalog order.
    pub fn build(
        meta: ReportMeta,
        catalog: &Catalog,
        checks: Vec<(&PairFamilies, PairCheck)>,
    ) -> Self {
        let mut working_ndfs = BTreeMap::new();
        let mut ticker_formats = BTreeMap::new();
        let mut recommended = Vec::new();

        for confirmed in &catalog.confirmed_formats {
            working_ndfs.insert(
                confirmed.pair.clone(),
                WorkingFormat {
                    summary: confirmed.summary.clone(),
                    source: FormatSource::Confirmed,
                },
            );
            ticker_formats.insert(
                confirmed.pair.clone(),
                TickerFormat {
                    format: confirmed.format.clone(),
                    example: confirmed.example.clone(),
                    working_tickers: Vec::new(),
                },
            );
            recommended.push(MappingRow {
                pair: confirmed.pair.clone(),
                format: confirmed.format.clone(),
                example: confirmed.example.clone(),
                coverage: confirmed.coverage.clone(),
            });
        }

        for (entry, check) in &checks {
            if !check.is_working() || working_ndfs.contains_key(&entry.pair) {
                continue;
            }

            let tenors = check.tenors();
            let detected = check.families().join("/");
            let coverage = coverage_span(tenors.iter().copied());
            working_ndfs.insert(
                entry.pair.clone(),
                WorkingFormat {
                    summary: format!("{detected} format ({} tenors: {coverage})", tenors.len()),
                    source: FormatSource::Verified,
                },
            );

            let (format, example) = match &entry.format_hint {
                Some(hint) => (hint.format.clone(), hint.example.clone()),
                None => (
                    detected,
                    check.tickers.first().map(|t| t.ticker.clone()).unwrap_or_default(),
                ),
            };
            ticker_formats.insert(
                entry.pair.clone(),
                TickerFormat {
                    format: format.clone(),
                    example: example.clone(),
                    working_tickers: check.tickers.iter().map(|t| t.ticker.clone()).collect(),
                },
            );
            recommended.push(MappingRow {
                pair: entry.pair.clone(),
                format,
                example,
                coverage,
            });
        }

        let still_missing = checks
            .iter()
            .map(|(entry, _)| &entry.pair)
            .filter(|pair| !working_ndfs.contains_key(*pair))
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        Self {
            meta,
            working_ndfs,
            detailed_results: checks
                .into_iter()
                .map(|(entry, check)| (entry.pair.clone(), check))
                .collect(),
            ticker_formats,
            still_missing,
            recommended,
        }
    }
}

impl Report for MappingReport {
    fn tool(&self) -> &'static str {
        TOOL
    }

    fn meta(&self) -> &ReportMeta {
        &self.meta
    }

    fn render_text(&self) -> String {
        let mut out = String::new();
        banner(&mut out, "FINAL NDF TICKER SUMMARY");

        out.push_str("\nCOMPLETE NDF TICKER MAPPING:\n");
        for (pair, working) in &self.working_ndfs {
            let _ = writeln!(out, "\n{pair}: {}", working.summary);
            if working.source != FormatSource::Verified {
                continue;
            }
            if let Some(check) = self.detailed_results.get(pair) {
                for result in check.tickers.iter().take(SAMPLE_TICKERS) {
                    let _ = writeln!(out, "  - {}: {}", result.ticker, result.px_last);
                }
            }
        }

        if !self.still_missing.is_empty() {
            let _ = writeln!(
                out,
                "\nSTILL NO NDF TICKERS FOUND ({}):",
                self.still_missing.len()
            );
            for pair in &self.still_missing {
                let _ = writeln!(out, "  - {pair}");
            }
        }

        out.push('\n');
        banner(&mut out, "RECOMMENDED NDF TICKER FORMATS:");
        out.push_str("\n| Currency Pair | NDF Format | Example Ticker    | Coverage |\n");
        out.push_str("|---------------|------------|-------------------|----------|\n");
        for row in &self.recommended {
            let _ = writeln!(
                out,
                "| {:<13} | {:<10} | {:<17} | {:<8} |",
                row.pair.as_str(),
                row.format,
                row.example,
                row.coverage
            );
        }

        out
    }
}

/// Verifies every entry of `catalog.ndf_verify` and builds the mapping.
pub async fn run(validator: &BatchValidator, catalog: &Catalog) -> MappingReport {
    let meta = ReportMeta::now();
    tracing::info!(pairs = catalog.ndf_verify.len(), run_id = %meta.run_id, "starting NDF pattern verification");

    let mut checks = Vec::with_capacity(catalog.ndf_verify.len());
    for entry in &catalog.ndf_verify {
        tracing::info!(pair = %entry.pair, families = entry.families.len(), "verifying tickers");
        let check = check_candidates(validator, &entry.candidates()).await;
        checks.push((entry, check));
    }

    MappingReport::build(meta, catalog, checks)
}
