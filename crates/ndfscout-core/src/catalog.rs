//! Versioned ticker catalog.
//!
//! Format families, pair universes and previously confirmed formats are
//! data, not code. The default catalog is embedded from
//! `catalog/ndf_catalog.json`; a reviewed replacement can be loaded from
//! disk with [`Catalog::load`].

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::patterns::FormatFamily;
use crate::{validate_currency_code, CurrencyPair, TickerCandidate};

pub const EMBEDDED_CATALOG: &str = include_str!("../catalog/ndf_catalog.json");

/// Root catalog document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Catalog {
    pub version: String,
    #[serde(default)]
    pub notes: Vec<String>,
    pub coverage_universe: Vec<PairCategory>,
    /// Quote currencies flagged as NDF candidates when only spot resolves.
    pub ndf_candidate_currencies: Vec<String>,
    pub ndf_check: Vec<PairFamilies>,
    pub ndf_verify: Vec<PairFamilies>,
    pub discovery_targets: Vec<DiscoveryTarget>,
    pub confirmed_formats: Vec<ConfirmedFormat>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PairCategory {
    pub category: String,
    pub pairs: Vec<CurrencyPair>,
}

/// Format families probed for one pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PairFamilies {
    pub pair: CurrencyPair,
    pub families: Vec<FormatFamily>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format_hint: Option<FormatHint>,
}

impl PairFamilies {
    /// All family candidates, family by family in catalog order.
    pub fn candidates(&self) -> Vec<TickerCandidate> {
        self.families
            .iter()
            .flat_map(|family| family.expand(&self.pair))
            .collect()
    }
}

/// Recommended format label and example ticker shown in the mapping table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormatHint {
    pub format: String,
    pub example: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    SpotOnly,
    LimitedCoverage,
}

impl TargetKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SpotOnly => "spot_only",
            Self::LimitedCoverage => "limited_coverage",
        }
    }
}

/// Pair that needs alternative forward tickers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiscoveryTarget {
    pub pair: CurrencyPair,
    pub description: String,
    pub kind: TargetKind,
}

/// Format already confirmed by an earlier run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfirmedFormat {
    pub pair: CurrencyPair,
    pub format: String,
    pub example: String,
    pub coverage: String,
    pub summary: String,
}

impl Catalog {
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_json(EMBEDDED_CATALOG)
    }

    pub fn from_json(input: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(input)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let input = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&input)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.version.trim().is_empty() {
            return Err(CatalogError::EmptyVersion);
        }

        for currency in &self.ndf_candidate_currencies {
            validate_currency_code(currency)?;
        }

        let mut seen = BTreeSet::new();
        for pair in self.coverage_universe.iter().flat_map(|c| c.pairs.iter()) {
            if !seen.insert(pair) {
                return Err(CatalogError::DuplicatePair {
                    section: "coverage_universe",
                    pair: pair.to_string(),
                });
            }
        }

        validate_families("ndf_check", &self.ndf_check)?;
        validate_families("ndf_verify", &self.ndf_verify)?;

        let mut seen = BTreeSet::new();
        for target in &self.discovery_targets {
            if !seen.insert(&target.pair) {
                return Err(CatalogError::DuplicatePair {
                    section: "discovery_targets",
                    pair: target.pair.to_string(),
                });
            }
        }

        Ok(())
    }

    /// Category of `pair` in the coverage universe.
    pub fn category_of(&self, pair: &CurrencyPair) -> Option<&str> {
        self.coverage_universe
            .iter()
            .find(|category| category.pairs.contains(pair))
            .map(|category| category.category.as_str())
    }

    pub fn universe_len(&self) -> usize {
        self.coverage_universe.iter().map(|c| c.pairs.len()).sum()
    }
}

fn validate_families(section: &'static str, entries: &[PairFamilies]) -> Result<(), CatalogError> {
    let mut seen = BTreeSet::new();
    for entry in entries {
        if !seen.insert(&entry.pair) {
            return Err(CatalogError::DuplicatePair {
                section,
                pair: entry.pair.to_string(),
            });
        }
        for family in &entry.families {
            if family.tenors.is_empty() {
                return Err(CatalogError::EmptyFamily {
                    pair: entry.pair.to_string(),
                    family: family.code.clone(),
                });
            }
            if !family.template.uses_tenor() {
                return Err(CatalogError::FamilyWithoutTenor {
                    pair: entry.pair.to_string(),
                    family: family.code.clone(),
                });
            }
        }
    }
    Ok(())
}
