use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const PAIR_LEN: usize = 6;

/// Normalized six-letter currency pair code such as `USDINR`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyPair(String);

impl CurrencyPair {
    /// Parse and normalize a pair to uppercase.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let normalized = input.trim().to_ascii_uppercase();
        if normalized.len() != PAIR_LEN || !normalized.chars().all(|ch| ch.is_ascii_alphabetic()) {
            return Err(ValidationError::InvalidPair {
                value: input.to_owned(),
            });
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn base(&self) -> &str {
        &self.0[..3]
    }

    pub fn quote(&self) -> &str {
        &self.0[3..]
    }

    /// Currency code used in NDF ticker conventions: the pair without its USD leg.
    pub fn ndf_currency(&self) -> &str {
        if self.base() == "USD" {
            self.quote()
        } else if self.quote() == "USD" {
            self.base()
        } else {
            self.quote()
        }
    }

    /// Spot ticker, e.g. `USDINR Curncy`.
    pub fn spot_ticker(&self) -> String {
        format!("{} Curncy", self.0)
    }
}

impl Display for CurrencyPair {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for CurrencyPair {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for CurrencyPair {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<CurrencyPair> for String {
    fn from(value: CurrencyPair) -> Self {
        value.0
    }
}

/// Validates and normalizes a three-letter currency code.
pub fn validate_currency_code(input: &str) -> Result<String, ValidationError> {
    let normalized = input.trim().to_ascii_uppercase();
    if normalized.len() != 3 || !normalized.chars().all(|ch| ch.is_ascii_alphabetic()) {
        return Err(ValidationError::InvalidCurrency {
            value: input.to_owned(),
        });
    }
    Ok(normalized)
}
