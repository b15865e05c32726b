//! Coverage classification.
//!
//! A pair's set of resolved forward tenors maps to exactly one
//! [`CoverageTier`]; the first matching rule wins:
//!
//! | Tier | Rule |
//! |------|------|
//! | `full_5y` | includes `5Y` and at least `full_5y_min_tenors` tenors (10) |
//! | `full_3y` | includes `3Y` and at least `full_3y_min_tenors` tenors (8) |
//! | `partial_long` | longest tenor is one of `long_tenors` (`2Y`, `3Y`, `5Y`) |
//! | `partial_short` | at least one tenor |
//! | `spot_only` | no tenor, spot resolved |
//! | `no_data` | nothing resolved |

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{CurrencyPair, Price, Tenor, ValidationError, ValidationResult};

/// Forward-curve coverage bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CoverageTier {
    #[serde(rename = "full_5y")]
    Full5y,
    #[serde(rename = "full_3y")]
    Full3y,
    #[serde(rename = "partial_long")]
    PartialLong,
    #[serde(rename = "partial_short")]
    PartialShort,
    #[serde(rename = "spot_only")]
    SpotOnly,
    #[serde(rename = "no_data")]
    NoData,
}

impl CoverageTier {
    pub const ALL: [Self; 6] = [
        Self::Full5y,
        Self::Full3y,
        Self::PartialLong,
        Self::PartialShort,
        Self::SpotOnly,
        Self::NoData,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Full5y => "full_5y",
            Self::Full3y => "full_3y",
            Self::PartialLong => "partial_long",
            Self::PartialShort => "partial_short",
            Self::SpotOnly => "spot_only",
            Self::NoData => "no_data",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::Full5y => "Full 5Y Coverage",
            Self::Full3y => "Full 3Y Coverage",
            Self::PartialLong => "Partial Long-dated",
            Self::PartialShort => "Partial Short-dated",
            Self::SpotOnly => "Spot Only",
            Self::NoData => "No Data",
        }
    }
}

impl Display for CoverageTier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Policy constants for tier classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierPolicy {
    tenor_days: BTreeMap<Tenor, u32>,
    pub full_5y_min_tenors: usize,
    pub full_3y_min_tenors: usize,
    pub long_tenors: BTreeSet<Tenor>,
}

impl Default for ClassifierPolicy {
    fn default() -> Self {
        Self {
            tenor_days: Tenor::ALL
                .into_iter()
                .map(|tenor| (tenor, tenor.standard_days()))
                .collect(),
            full_5y_min_tenors: 10,
            full_3y_min_tenors: 8,
            long_tenors: BTreeSet::from([Tenor::TwoYears, Tenor::ThreeYears, Tenor::FiveYears]),
        }
    }
}

impl ClassifierPolicy {
    /// Replaces the day-count table; every tenor must have an entry.
    pub fn with_tenor_days(
        mut self,
        tenor_days: BTreeMap<Tenor, u32>,
    ) -> Result<Self, ValidationError> {
        let missing = Tenor::ALL
            .into_iter()
            .find(|tenor| !tenor_days.contains_key(tenor));
        if let Some(missing) = missing {
            return Err(ValidationError::MissingTenorDays {
                tenor: missing.to_string(),
            });
        }
        self.tenor_days = tenor_days;
        Ok(self)
    }

    pub fn days(&self, tenor: Tenor) -> u32 {
        self.tenor_days
            .get(&tenor)
            .copied()
            .unwrap_or_else(|| tenor.standard_days())
    }

    /// Member of `tenors` with the largest day count.
    pub fn longest_tenor<'a, I>(&self, tenors: I) -> Option<Tenor>
    where
        I: IntoIterator<Item = &'a Tenor>,
    {
        tenors.into_iter().copied().max_by_key(|tenor| self.days(*tenor))
    }

    pub fn classify(&self, tenors: &BTreeSet<Tenor>, has_spot: bool) -> CoverageTier {
        let count = tenors.len();

        if tenors.contains(&Tenor::FiveYears) && count >= self.full_5y_min_tenors {
            return CoverageTier::Full5y;
        }
        if tenors.contains(&Tenor::ThreeYears) && count >= self.full_3y_min_tenors {
            return CoverageTier::Full3y;
        }
        if self
            .longest_tenor(tenors)
            .is_some_and(|longest| self.long_tenors.contains(&longest))
        {
            return CoverageTier::PartialLong;
        }
        if count > 0 {
            return CoverageTier::PartialShort;
        }
        if has_spot {
            return CoverageTier::SpotOnly;
        }
        CoverageTier::NoData
    }
}

/// Derived forward-curve coverage for one pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairCoverage {
    pub pair: CurrencyPair,
    pub category: String,
    pub has_spot: bool,
    pub spot: Option<Price>,
    pub available_forwards: Vec<Tenor>,
    pub missing_forwards: Vec<Tenor>,
    pub longest_tenor: Option<Tenor>,
    pub tier: CoverageTier,
    pub data_points: BTreeMap<Tenor, Price>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl PairCoverage {
    /// Builds the coverage record from the pair's valid results.
    ///
    /// Results without a tenor are treated as the spot quote.
    pub fn derive(
        pair: CurrencyPair,
        category: impl Into<String>,
        results: &[ValidationResult],
        errors: Vec<String>,
        policy: &ClassifierPolicy,
    ) -> Self {
        let mut spot = None;
        let mut data_points = BTreeMap::new();
        for result in results {
            match result.tenor {
                Some(tenor) => {
                    data_points
                        .entry(tenor)
                        .or_insert_with(|| result.px_last.clone());
                }
                None => {
                    if spot.is_none() {
                        spot = Some(result.px_last.clone());
                    }
                }
            }
        }

        let tenors = data_points.keys().copied().collect::<BTreeSet<_>>();
        let has_spot = spot.is_some();
        let tier = policy.classify(&tenors, has_spot);
        let longest_tenor = policy.longest_tenor(&tenors);

        Self {
            pair,
            category: category.into(),
            has_spot,
            spot,
            available_forwards: tenors.iter().copied().collect(),
            missing_forwards: Tenor::ALL
                .into_iter()
                .filter(|tenor| !tenors.contains(tenor))
                .collect(),
            longest_tenor,
            tier,
            data_points,
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(labels: &[&str]) -> BTreeSet<Tenor> {
        labels
            .iter()
            .map(|label| label.parse::<Tenor>().expect("valid tenor"))
            .collect()
    }

    #[test]
    fn ten_tenors_with_five_year_is_full_5y() {
        let policy = ClassifierPolicy::default();
        let tenors = set(&["1W", "1M", "3M", "6M", "1Y", "2Y", "3Y", "5Y", "18M", "9M"]);
        assert_eq!(policy.classify(&tenors, true), CoverageTier::Full5y);
    }

    #[test]
    fn nine_tenors_with_five_and_three_year_fall_to_full_3y() {
        let policy = ClassifierPolicy::default();
        let tenors = set(&["1W", "1M", "3M", "6M", "1Y", "2Y", "3Y", "5Y", "9M"]);
        assert_eq!(policy.classify(&tenors, true), CoverageTier::Full3y);
    }

    #[test]
    fn sparse_long_curve_is_partial_long() {
        let policy = ClassifierPolicy::default();
        assert_eq!(
            policy.classify(&set(&["1M", "5Y"]), false),
            CoverageTier::PartialLong
        );
        assert_eq!(
            policy.classify(&set(&["1M", "3M", "2Y"]), true),
            CoverageTier::PartialLong
        );
    }

    #[test]
    fn eighteen_months_is_not_long() {
        let policy = ClassifierPolicy::default();
        assert_eq!(
            policy.classify(&set(&["1M", "1Y", "18M"]), true),
            CoverageTier::PartialShort
        );
    }

    #[test]
    fn single_short_tenor_is_partial_short() {
        let policy = ClassifierPolicy::default();
        assert_eq!(policy.classify(&set(&["1M"]), false), CoverageTier::PartialShort);
    }

    #[test]
    fn empty_set_depends_on_spot() {
        let policy = ClassifierPolicy::default();
        assert_eq!(policy.classify(&BTreeSet::new(), true), CoverageTier::SpotOnly);
        assert_eq!(policy.classify(&BTreeSet::new(), false), CoverageTier::NoData);
    }

    #[test]
    fn longest_tenor_uses_day_table() {
        let policy = ClassifierPolicy::default();
        assert_eq!(
            policy.longest_tenor(&set(&["9M", "18M", "1Y"])),
            Some(Tenor::EighteenMonths)
        );
        assert_eq!(policy.longest_tenor(&BTreeSet::new()), None);
    }

    #[test]
    fn custom_thresholds_and_days_are_honored() {
        let mut days = Tenor::ALL
            .into_iter()
            .map(|tenor| (tenor, tenor.standard_days()))
            .collect::<BTreeMap<_, _>>();
        days.insert(Tenor::OneWeek, 5_000);
        let mut policy = ClassifierPolicy::default()
            .with_tenor_days(days)
            .expect("complete table");
        policy.full_3y_min_tenors = 2;

        assert_eq!(policy.longest_tenor(&set(&["1W", "5Y"])), Some(Tenor::OneWeek));
        assert_eq!(policy.classify(&set(&["1M", "3Y"]), false), CoverageTier::Full3y);
    }

    #[test]
    fn incomplete_day_table_is_rejected() {
        let err = ClassifierPolicy::default()
            .with_tenor_days(BTreeMap::from([(Tenor::OneWeek, 7)]))
            .expect_err("must fail");
        assert!(matches!(err, ValidationError::MissingTenorDays { .. }));
    }

    #[test]
    fn derive_separates_spot_and_forwards() {
        let pair = CurrencyPair::parse("USDKRW").expect("valid");
        let mut spot = ValidationResult::new("USDKRW Curncy", 1375.2);
        spot.tenor = None;
        let mut one_month = ValidationResult::new("USDKRW1M Curncy", -2.5);
        one_month.tenor = Some(Tenor::OneMonth);
        let mut nine_month = ValidationResult::new("USDKRW9M Curncy", -18.0);
        nine_month.tenor = Some(Tenor::NineMonths);

        let coverage = PairCoverage::derive(
            pair,
            "EM_ASIA",
            &[nine_month, spot, one_month],
            Vec::new(),
            &ClassifierPolicy::default(),
        );

        assert!(coverage.has_spot);
        assert_eq!(coverage.spot, Some(Price::Number(1375.2)));
        assert_eq!(coverage.available_forwards, vec![Tenor::OneMonth, Tenor::NineMonths]);
        assert_eq!(coverage.longest_tenor, Some(Tenor::NineMonths));
        assert_eq!(coverage.tier, CoverageTier::PartialShort);
        assert_eq!(coverage.missing_forwards.len(), 10);
    }

    #[test]
    fn tier_serializes_with_report_names() {
        let json = serde_json::to_string(&CoverageTier::Full5y).expect("serialize");
        assert_eq!(json, "\"full_5y\"");
    }
}
