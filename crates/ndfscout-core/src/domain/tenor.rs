use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Forward tenor label.
///
/// Variants are declared in maturity order, so the derived `Ord` sorts
/// `9M` before `1Y` and `18M` before `2Y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Tenor {
    OneWeek,
    TwoWeeks,
    OneMonth,
    TwoMonths,
    ThreeMonths,
    SixMonths,
    NineMonths,
    OneYear,
    EighteenMonths,
    TwoYears,
    ThreeYears,
    FiveYears,
}

impl Tenor {
    /// Every outright forward tenor checked by the coverage analysis.
    pub const ALL: [Self; 12] = [
        Self::OneWeek,
        Self::TwoWeeks,
        Self::OneMonth,
        Self::TwoMonths,
        Self::ThreeMonths,
        Self::SixMonths,
        Self::NineMonths,
        Self::OneYear,
        Self::EighteenMonths,
        Self::TwoYears,
        Self::ThreeYears,
        Self::FiveYears,
    ];

    /// Tenors quoted for NDF families; the broken 18M date is not listed.
    pub const NDF: [Self; 11] = [
        Self::OneWeek,
        Self::TwoWeeks,
        Self::OneMonth,
        Self::TwoMonths,
        Self::ThreeMonths,
        Self::SixMonths,
        Self::NineMonths,
        Self::OneYear,
        Self::TwoYears,
        Self::ThreeYears,
        Self::FiveYears,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneWeek => "1W",
            Self::TwoWeeks => "2W",
            Self::OneMonth => "1M",
            Self::TwoMonths => "2M",
            Self::ThreeMonths => "3M",
            Self::SixMonths => "6M",
            Self::NineMonths => "9M",
            Self::OneYear => "1Y",
            Self::EighteenMonths => "18M",
            Self::TwoYears => "2Y",
            Self::ThreeYears => "3Y",
            Self::FiveYears => "5Y",
        }
    }

    /// Standard day count used to rank tenors by maturity.
    pub const fn standard_days(self) -> u32 {
        match self {
            Self::OneWeek => 7,
            Self::TwoWeeks => 14,
            Self::OneMonth => 30,
            Self::TwoMonths => 60,
            Self::ThreeMonths => 90,
            Self::SixMonths => 180,
            Self::NineMonths => 270,
            Self::OneYear => 365,
            Self::EighteenMonths => 545,
            Self::TwoYears => 730,
            Self::ThreeYears => 1095,
            Self::FiveYears => 1825,
        }
    }
}

impl Display for Tenor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tenor {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|tenor| tenor.as_str() == normalized)
            .ok_or(ValidationError::InvalidTenor {
                value: value.to_owned(),
            })
    }
}

impl TryFrom<String> for Tenor {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Tenor> for String {
    fn from(value: Tenor) -> Self {
        value.as_str().to_owned()
    }
}

/// Renders a compact coverage label such as `1W-5Y`.
///
/// More than two distinct tenors collapse to `first-last`; one or two are
/// comma-joined; an empty input yields `Unknown`.
pub fn coverage_span<I>(tenors: I) -> String
where
    I: IntoIterator<Item = Tenor>,
{
    let mut sorted = tenors.into_iter().collect::<Vec<_>>();
    sorted.sort();
    sorted.dedup();

    match sorted.as_slice() {
        [] => String::from("Unknown"),
        [first, .., last] if sorted.len() > 2 => format!("{first}-{last}"),
        short => short
            .iter()
            .map(|tenor| tenor.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    }
}
