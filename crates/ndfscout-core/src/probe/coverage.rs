//! Outright forward coverage scan over the catalog's pair universe.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::Serialize;

use super::{banner, percent};
use crate::catalog::Catalog;
use crate::classifier::{ClassifierPolicy, CoverageTier, PairCoverage};
use crate::patterns::outright_forward_candidates;
use crate::report::{Report, ReportMeta};
use crate::validator::BatchValidator;
use crate::{CurrencyPair, Tenor};

pub const TOOL: &str = "forward_coverage_analysis";
/// Spot plus twelve tenors go out in a single request per pair.
pub const CHUNK_SIZE: usize = 13;
pub const DEFAULT_INTERVAL_MS: u64 = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverageSummary {
    pub total_pairs: usize,
    pub categories: BTreeMap<CoverageTier, usize>,
}

/// Per-category counts for the "by category" section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryStats {
    pub category: String,
    pub total: usize,
    pub with_5y: usize,
    pub with_forwards: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageReport {
    #[serde(flatten)]
    pub meta: ReportMeta,
    pub summary: CoverageSummary,
    /// Pairs per tier, sorted.
    pub categories: BTreeMap<CoverageTier, Vec<CurrencyPair>>,
    pub category_stats: Vec<CategoryStats>,
    /// Spot-only pairs quoted in a likely NDF currency.
    pub ndf_candidates: Vec<CurrencyPair>,
    pub detailed_results: BTreeMap<CurrencyPair, PairCoverage>,
}

impl CoverageReport {
    /// Aggregates per-pair coverage in universe order.
    pub fn build(meta: ReportMeta, catalog: &Catalog, coverages: Vec<PairCoverage>) -> Self {
        let mut categories = CoverageTier::ALL
            .into_iter()
            .map(|tier| (tier, Vec::new()))
            .collect::<BTreeMap<_, _>>();
        for coverage in &coverages {
            categories
                .entry(coverage.tier)
                .or_default()
                .push(coverage.pair.clone());
        }
        for pairs in categories.values_mut() {
            pairs.sort();
        }

        let category_stats = catalog
            .coverage_universe
            .iter()
            .map(|category| {
                let members = coverages
                    .iter()
                    .filter(|c| c.category == category.category)
                    .collect::<Vec<_>>();
                CategoryStats {
                    category: category.category.clone(),
                    total: category.pairs.len(),
                    with_5y: members
                        .iter()
                        .filter(|c| c.available_forwards.contains(&Tenor::FiveYears))
                        .count(),
                    with_forwards: members
                        .iter()
                        .filter(|c| !c.available_forwards.is_empty())
                        .count(),
                }
            })
            .collect();

        let ndf_candidates = categories
            .get(&CoverageTier::SpotOnly)
            .map(|pairs| {
                pairs
                    .iter()
                    .filter(|pair| {
                        catalog
                            .ndf_candidate_currencies
                            .iter()
                            .any(|ccy| pair.as_str().contains(ccy.as_str()))
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        let summary = CoverageSummary {
            total_pairs: coverages.len(),
            categories: categories
                .iter()
                .map(|(tier, pairs)| (*tier, pairs.len()))
                .collect(),
        };

        Self {
            meta,
            summary,
            categories,
            category_stats,
            ndf_candidates,
            detailed_results: coverages
                .into_iter()
                .map(|coverage| (coverage.pair.clone(), coverage))
                .collect(),
        }
    }
}

impl Report for CoverageReport {
    fn tool(&self) -> &'static str {
        TOOL
    }

    fn meta(&self) -> &ReportMeta {
        &self.meta
    }

    fn render_text(&self) -> String {
        let mut out = String::new();
        let total = self.summary.total_pairs;

        banner(&mut out, "COVERAGE SUMMARY");
        for tier in CoverageTier::ALL {
            let Some(pairs) = self.categories.get(&tier).filter(|p| !p.is_empty()) else {
                continue;
            };
            let _ = writeln!(
                out,
                "\n{} ({} pairs - {:.1}%):",
                tier.title(),
                pairs.len(),
                percent(pairs.len(), total)
            );
            for pair in pairs {
                match self.detailed_results.get(pair).and_then(|c| c.longest_tenor) {
                    Some(longest) => {
                        let _ = writeln!(out, "   {pair}: up to {longest}");
                    }
                    None => {
                        let _ = writeln!(out, "   {pair}");
                    }
                }
            }
        }

        out.push('\n');
        banner(&mut out, "ANALYSIS BY CATEGORY");
        for stats in &self.category_stats {
            let _ = writeln!(out, "\n{}:", stats.category);
            let _ = writeln!(out, "  Total pairs: {}", stats.total);
            let _ = writeln!(
                out,
                "  With 5Y data: {} ({:.1}%)",
                stats.with_5y,
                percent(stats.with_5y, stats.total)
            );
            let _ = writeln!(
                out,
                "  With any forwards: {} ({:.1}%)",
                stats.with_forwards,
                percent(stats.with_forwards, stats.total)
            );
        }

        if !self.ndf_candidates.is_empty() {
            out.push('\n');
            banner(&mut out, "SPECIAL CASES");
            out.push_str("\nPotential NDF currencies (spot only):\n");
            for pair in &self.ndf_candidates {
                let _ = writeln!(out, "  - {pair}");
            }
        }

        out
    }
}

/// Scans every pair in the catalog's coverage universe.
///
/// `validator` should request [`COVERAGE_FIELDS`](crate::validator::COVERAGE_FIELDS).
pub async fn run(
    validator: &BatchValidator,
    catalog: &Catalog,
    policy: &ClassifierPolicy,
) -> CoverageReport {
    let meta = ReportMeta::now();
    tracing::info!(
        pairs = catalog.universe_len(),
        tenors = Tenor::ALL.len(),
        run_id = %meta.run_id,
        "starting forward coverage analysis"
    );

    let mut coverages = Vec::with_capacity(catalog.universe_len());
    for category in &catalog.coverage_universe {
        for pair in &category.pairs {
            let coverage = analyze_pair(validator, pair, &category.category, policy).await;
            coverages.push(coverage);
        }
    }

    CoverageReport::build(meta, catalog, coverages)
}

/// Spot plus outright forwards for one pair, classified.
pub async fn analyze_pair(
    validator: &BatchValidator,
    pair: &CurrencyPair,
    category: &str,
    policy: &ClassifierPolicy,
) -> PairCoverage {
    tracing::info!(%pair, category, "analyzing pair");
    let candidates = outright_forward_candidates(pair);
    let check = super::check_candidates(validator, &candidates).await;

    let coverage =
        PairCoverage::derive(pair.clone(), category, &check.tickers, check.errors, policy);
    match (coverage.longest_tenor, coverage.has_spot) {
        (Some(longest), _) => tracing::info!(
            %pair,
            tenors = coverage.available_forwards.len(),
            %longest,
            tier = %coverage.tier,
            "forward data found"
        ),
        (None, true) => tracing::info!(%pair, "spot only, no forward data"),
        (None, false) => tracing::info!(%pair, "no data available"),
    }
    coverage
}
