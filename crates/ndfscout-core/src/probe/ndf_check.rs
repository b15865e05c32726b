//! Checks the catalog's known NDF families pair by pair.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::Serialize;

use super::{banner, check_candidates, PairCheck};
use crate::catalog::{Catalog, PairFamilies};
use crate::report::{Report, ReportMeta};
use crate::validator::BatchValidator;
use crate::CurrencyPair;

pub const TOOL: &str = "ndf_verification_results";
pub const CHUNK_SIZE: usize = 10;
pub const DEFAULT_INTERVAL_MS: u64 = 500;
const SAMPLE_TICKERS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckSummary {
    pub successful: Vec<CurrencyPair>,
    pub failed: Vec<CurrencyPair>,
    pub total_tested: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NdfCheckReport {
    #[serde(flatten)]
    pub meta: ReportMeta,
    pub results: BTreeMap<CurrencyPair, PairCheck>,
    pub summary: CheckSummary,
}

impl NdfCheckReport {
    /// `checks` in processing order; the summary keeps that order.
    pub fn build(meta: ReportMeta, checks: Vec<(CurrencyPair, PairCheck)>) -> Self {
        let (successful, failed): (Vec<_>, Vec<_>) = checks
            .iter()
            .map(|(pair, check)| (pair.clone(), check.is_working()))
            .partition(|(_, working)| *working);

        Self {
            meta,
            summary: CheckSummary {
                successful: successful.into_iter().map(|(pair, _)| pair).collect(),
                failed: failed.into_iter().map(|(pair, _)| pair).collect(),
                total_tested: checks.len(),
            },
            results: checks.into_iter().collect(),
        }
    }
}

impl Report for NdfCheckReport {
    fn tool(&self) -> &'static str {
        TOOL
    }

    fn meta(&self) -> &ReportMeta {
        &self.meta
    }

    fn render_text(&self) -> String {
        let mut out = String::new();
        banner(&mut out, "NDF TICKER VERIFICATION SUMMARY");

        let _ = writeln!(
            out,
            "\nCURRENCIES WITH WORKING NDF TICKERS ({}):",
            self.summary.successful.len()
        );
        for pair in &self.summary.successful {
            let Some(check) = self.results.get(pair) else {
                continue;
            };
            let _ = writeln!(out, "\n{pair}: {}/{} tickers working", check.valid, check.tested);

            let by_tenor = check.by_tenor();
            if by_tenor.is_empty() {
                continue;
            }
            let tenors = by_tenor
                .keys()
                .map(|tenor| tenor.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            let _ = writeln!(out, "  Available tenors: {tenors}");
            out.push_str("  Sample tickers:\n");
            for result in by_tenor.values().take(SAMPLE_TICKERS) {
                let _ = writeln!(out, "    - {}: {}", result.ticker, result.px_last);
            }
        }

        let _ = writeln!(
            out,
            "\nCURRENCIES WITHOUT WORKING NDF TICKERS ({}):",
            self.summary.failed.len()
        );
        for pair in &self.summary.failed {
            let _ = writeln!(out, "  - {pair}");
        }

        out
    }
}

/// Validates every family of one catalog entry.
pub async fn check_pair(validator: &BatchValidator, entry: &PairFamilies) -> PairCheck {
    tracing::info!(pair = %entry.pair, families = entry.families.len(), "checking NDF tickers");
    let candidates = entry.candidates();
    check_candidates(validator, &candidates).await
}

/// Runs the known-family check over `catalog.ndf_check`.
pub async fn run(validator: &BatchValidator, catalog: &Catalog) -> NdfCheckReport {
    let meta = ReportMeta::now();
    tracing::info!(pairs = catalog.ndf_check.len(), run_id = %meta.run_id, "starting NDF ticker verification");

    let mut checks = Vec::with_capacity(catalog.ndf_check.len());
    for entry in &catalog.ndf_check {
        let check = check_pair(validator, entry).await;
        checks.push((entry.pair.clone(), check));
    }

    NdfCheckReport::build(meta, checks)
}
