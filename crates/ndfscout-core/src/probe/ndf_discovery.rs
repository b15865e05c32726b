//! Searches for alternative forward tickers for poorly covered pairs.
//!
//! Per target pair: the six free-form searches, then the generated NDF
//! templates through the validate-tickers endpoint.

use std::collections::{BTreeMap, HashSet};
use std::fmt::Write as _;

use serde::Serialize;

use super::banner;
use crate::catalog::{Catalog, DiscoveryTarget, TargetKind};
use crate::discovery::{search, search_queries};
use crate::gateway::BloombergGateway;
use crate::patterns::PatternGenerator;
use crate::report::{Report, ReportMeta};
use crate::throttling::RequestPacer;
use crate::validator::BatchValidator;
use crate::CurrencyPair;

pub const TOOL: &str = "ndf_discovery_results";
/// Chunk size for the validate-tickers endpoint.
pub const CHUNK_SIZE: usize = 20;
pub const DEFAULT_INTERVAL_MS: u64 = 1_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairDiscovery {
    pub description: String,
    #[serde(rename = "type")]
    pub kind: TargetKind,
    /// Search hits first, then validated generated tickers.
    pub discovered_tickers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoverySummary {
    pub successful: Vec<CurrencyPair>,
    pub failed: Vec<CurrencyPair>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveryReport {
    #[serde(flatten)]
    pub meta: ReportMeta,
    pub discoveries: BTreeMap<CurrencyPair, PairDiscovery>,
    pub summary: DiscoverySummary,
}

impl DiscoveryReport {
    pub fn build(meta: ReportMeta, discoveries: Vec<(CurrencyPair, PairDiscovery)>) -> Self {
        let mut successful = Vec::new();
        let mut failed = Vec::new();
        for (pair, discovery) in &discoveries {
            if discovery.discovered_tickers.is_empty() {
                failed.push(pair.clone());
            } else {
                successful.push(pair.clone());
            }
        }

        Self {
            meta,
            discoveries: discoveries.into_iter().collect(),
            summary: DiscoverySummary { successful, failed },
        }
    }
}

impl Report for DiscoveryReport {
    fn tool(&self) -> &'static str {
        TOOL
    }

    fn meta(&self) -> &ReportMeta {
        &self.meta
    }

    fn render_text(&self) -> String {
        let mut out = String::new();
        banner(&mut out, "DISCOVERY SUMMARY");

        let _ = writeln!(
            out,
            "\nDISCOVERED ALTERNATIVE TICKERS ({} currencies):",
            self.summary.successful.len()
        );
        for pair in &self.summary.successful {
            let Some(discovery) = self.discoveries.get(pair) else {
                continue;
            };
            let _ = writeln!(out, "\n{pair} ({}):", discovery.description);
            for ticker in &discovery.discovered_tickers {
                let _ = writeln!(out, "  - {ticker}");
            }
        }

        let _ = writeln!(
            out,
            "\nNO ALTERNATIVES FOUND ({} currencies):",
            self.summary.failed.len()
        );
        for pair in &self.summary.failed {
            let description = self
                .discoveries
                .get(pair)
                .map(|d| d.description.as_str())
                .unwrap_or_default();
            let _ = writeln!(out, "  - {pair} ({description})");
        }

        out
    }
}

/// Discovery runner. The search calls and the validator share one pacer.
#[derive(Debug, Clone)]
pub struct DiscoveryProbe {
    gateway: BloombergGateway,
    pacer: RequestPacer,
    validator: BatchValidator,
    generator: PatternGenerator,
}

impl DiscoveryProbe {
    /// `validator` should be in validate-endpoint mode and share `pacer`.
    pub fn new(gateway: BloombergGateway, pacer: RequestPacer, validator: BatchValidator) -> Self {
        Self {
            gateway,
            pacer,
            validator,
            generator: PatternGenerator::ndf_discovery(),
        }
    }

    pub async fn discover_pair(&self, target: &DiscoveryTarget) -> PairDiscovery {
        let pair = &target.pair;
        tracing::info!(%pair, currency = pair.ndf_currency(), "discovering tickers");

        let mut discovered = Vec::new();
        let mut errors = Vec::new();

        for query in search_queries(pair) {
            match search(&self.gateway, &self.pacer, &query).await {
                Ok(hits) => discovered.extend(hits.into_iter().map(|hit| hit.ticker)),
                Err(error) => {
                    tracing::warn!(%pair, %query, code = error.code(), "search failed: {}", error.message());
                    errors.push(format!("search {query}: {error}"));
                }
            }
        }

        let candidates = self.generator.generate(pair, pair.ndf_currency());
        tracing::info!(%pair, count = candidates.len(), "validating generated ticker patterns");
        match self.validator.validate(&candidates).await {
            Ok(outcome) => {
                errors.extend(outcome.failure_messages());
                discovered.extend(outcome.valid.into_iter().map(|result| result.ticker));
            }
            Err(error) => errors.push(error.to_string()),
        }

        let mut seen = HashSet::new();
        discovered.retain(|ticker| seen.insert(ticker.clone()));

        PairDiscovery {
            description: target.description.clone(),
            kind: target.kind,
            discovered_tickers: discovered,
            errors,
        }
    }

    /// Runs every catalog discovery target in order.
    pub async fn run(&self, catalog: &Catalog) -> DiscoveryReport {
        let meta = ReportMeta::now();
        tracing::info!(
            targets = catalog.discovery_targets.len(),
            run_id = %meta.run_id,
            "starting alternative ticker discovery"
        );

        let mut discoveries = Vec::with_capacity(catalog.discovery_targets.len());
        for target in &catalog.discovery_targets {
            let discovery = self.discover_pair(target).await;
            discoveries.push((target.pair.clone(), discovery));
        }

        DiscoveryReport::build(meta, discoveries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UtcDateTime;

    fn pair(code: &str) -> CurrencyPair {
        CurrencyPair::parse(code).expect("valid")
    }

    #[test]
    fn report_text_lists_found_and_missing() {
        let report = DiscoveryReport::build(
            ReportMeta::at(UtcDateTime::parse("2025-01-02T03:04:05Z").expect("valid")),
            vec![
                (
                    pair("USDINR"),
                    PairDiscovery {
                        description: String::from("Indian Rupee - NDF likely"),
                        kind: TargetKind::SpotOnly,
                        discovered_tickers: vec![String::from("IRN1M Curncy")],
                        errors: Vec::new(),
                    },
                ),
                (
                    pair("USDPEN"),
                    PairDiscovery {
                        description: String::from("Peruvian Sol"),
                        kind: TargetKind::SpotOnly,
                        discovered_tickers: Vec::new(),
                        errors: Vec::new(),
                    },
                ),
            ],
        );

        let text = report.render_text();
        assert!(text.contains("DISCOVERED ALTERNATIVE TICKERS (1 currencies):"));
        assert!(text.contains("USDINR (Indian Rupee - NDF likely):\n  - IRN1M Curncy"));
        assert!(text.contains("NO ALTERNATIVES FOUND (1 currencies):\n  - USDPEN (Peruvian Sol)"));

        let json = serde_json::to_value(&report).expect("serialize");
        assert_eq!(json["discoveries"]["USDINR"]["type"], "spot_only");
        assert_eq!(json["summary"]["failed"][0], "USDPEN");
    }
}
