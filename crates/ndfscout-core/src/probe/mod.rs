//! # Probes
//!
//! One runner per tool. Each runner walks its pairs sequentially, validates
//! candidates through a [`BatchValidator`](crate::validator::BatchValidator)
//! and returns a [`Report`](crate::report::Report) ready to print and save.
//!
//! | Probe | Tool prefix | Lookup |
//! |-------|-------------|--------|
//! | [`coverage`] | `forward_coverage_analysis` | reference, spot + 12 outright tenors |
//! | [`ndf_check`] | `ndf_verification_results` | reference, known NDF families |
//! | [`ndf_discovery`] | `ndf_discovery_results` | ticker search + validate-tickers |
//! | [`mapping`] | `ndf_complete_mapping` | reference, alternative families |

pub mod coverage;
pub mod mapping;
pub mod ndf_check;
pub mod ndf_discovery;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::validator::{BatchOutcome, BatchValidator};
use crate::{Tenor, TickerCandidate, ValidationResult};

const RULE_WIDTH: usize = 80;

/// Validation results for one pair's candidate list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairCheck {
    pub tested: usize,
    pub valid: usize,
    pub tickers: Vec<ValidationResult>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl PairCheck {
    fn from_outcome(outcome: BatchOutcome) -> Self {
        let errors = outcome.failure_messages();
        Self {
            tested: outcome.tested,
            valid: outcome.valid.len(),
            tickers: outcome.valid,
            errors,
        }
    }

    pub fn is_working(&self) -> bool {
        self.valid > 0
    }

    /// Distinct tenors among working tickers, in tenor order.
    pub fn tenors(&self) -> Vec<Tenor> {
        self.by_tenor().into_keys().collect()
    }

    /// First working ticker per tenor, in tenor order.
    pub fn by_tenor(&self) -> BTreeMap<Tenor, &ValidationResult> {
        let mut by_tenor = BTreeMap::new();
        for result in &self.tickers {
            if let Some(tenor) = result.tenor {
                by_tenor.entry(tenor).or_insert(result);
            }
        }
        by_tenor
    }

    /// Family codes of working tickers, in first-seen order.
    pub fn families(&self) -> Vec<&str> {
        let mut families = Vec::new();
        for family in self.tickers.iter().filter_map(|r| r.family.as_deref()) {
            if !families.contains(&family) {
                families.push(family);
            }
        }
        families
    }
}

/// Validates `candidates`; a batch-level error becomes an empty check.
async fn check_candidates(validator: &BatchValidator, candidates: &[TickerCandidate]) -> PairCheck {
    match validator.validate(candidates).await {
        Ok(outcome) => PairCheck::from_outcome(outcome),
        Err(error) => {
            tracing::warn!(code = error.code(), "batch skipped: {}", error.message());
            PairCheck {
                tested: candidates.len(),
                valid: 0,
                tickers: Vec::new(),
                errors: vec![error.to_string()],
            }
        }
    }
}

fn banner(out: &mut String, title: &str) {
    let rule = "=".repeat(RULE_WIDTH);
    out.push_str(&rule);
    out.push('\n');
    out.push_str(title);
    out.push('\n');
    out.push_str(&rule);
    out.push('\n');
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    part as f64 / total as f64 * 100.0
}
