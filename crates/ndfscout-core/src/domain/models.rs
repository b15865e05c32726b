use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{CurrencyPair, Tenor};

/// Candidate ticker plus the decomposition it was generated from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerCandidate {
    pub ticker: String,
    pub pair: CurrencyPair,
    /// `None` for the spot ticker.
    pub tenor: Option<Tenor>,
    /// Format family label, e.g. `NTN` or `outright`.
    pub family: String,
}

impl TickerCandidate {
    pub fn new(
        ticker: impl Into<String>,
        pair: CurrencyPair,
        tenor: Option<Tenor>,
        family: impl Into<String>,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            pair,
            tenor,
            family: family.into(),
        }
    }

    pub fn spot(pair: CurrencyPair) -> Self {
        let ticker = pair.spot_ticker();
        Self::new(ticker, pair, None, "spot")
    }

    pub fn is_spot(&self) -> bool {
        self.tenor.is_none()
    }
}

/// `PX_LAST` as the gateway reported it.
///
/// Numbers and numeric strings become [`Price::Number`]; any other non-null
/// value (`"#N/A ..."`, objects) is kept verbatim in [`Price::Raw`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Price {
    Number(f64),
    Raw(Value),
}

impl Price {
    /// `None` only for JSON `null`.
    pub fn from_field(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Number(number) => Some(
                number
                    .as_f64()
                    .map_or_else(|| Self::Raw(value.clone()), Self::Number),
            ),
            Value::String(text) => match text.trim().parse::<f64>() {
                Ok(parsed) if parsed.is_finite() => Some(Self::Number(parsed)),
                _ => Some(Self::Raw(value.clone())),
            },
            other => Some(Self::Raw(other.clone())),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Raw(_) => None,
        }
    }
}

impl From<f64> for Price {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl Display for Price {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Raw(Value::String(text)) => f.write_str(text),
            Self::Raw(other) => write!(f, "{other}"),
        }
    }
}

/// A ticker whose `PX_LAST` came back present and non-null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub ticker: String,
    pub px_last: Price,
    pub bid: Option<f64>,
    pub ask: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenor: Option<Tenor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
}

impl ValidationResult {
    pub fn new(ticker: impl Into<String>, px_last: impl Into<Price>) -> Self {
        Self {
            ticker: ticker.into(),
            px_last: px_last.into(),
            bid: None,
            ask: None,
            name: None,
            tenor: None,
            family: None,
        }
    }

    pub fn with_quotes(mut self, bid: Option<f64>, ask: Option<f64>) -> Self {
        self.bid = bid;
        self.ask = ask;
        self
    }

    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name.filter(|value| !value.is_empty());
        self
    }

    /// Attaches the tenor/family decomposition of the candidate that produced this result.
    pub fn attributed_to(mut self, candidate: &TickerCandidate) -> Self {
        self.tenor = candidate.tenor;
        self.family = Some(candidate.family.clone());
        self
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn any_non_null_value_is_a_price() {
        assert_eq!(Price::from_field(&json!(31.42)), Some(Price::Number(31.42)));
        assert_eq!(Price::from_field(&json!(" 83.25 ")), Some(Price::Number(83.25)));
        assert_eq!(
            Price::from_field(&json!("#N/A Invalid Security")),
            Some(Price::Raw(json!("#N/A Invalid Security")))
        );
        assert_eq!(Price::from_field(&json!(false)), Some(Price::Raw(json!(false))));
        assert_eq!(Price::from_field(&Value::Null), None);
    }

    #[test]
    fn raw_prices_render_verbatim_and_have_no_numeric_value() {
        let raw = Price::Raw(json!("N/A"));
        assert_eq!(raw.to_string(), "N/A");
        assert_eq!(raw.as_f64(), None);
        assert_eq!(Price::from(1.5).to_string(), "1.5");
    }

    #[test]
    fn prices_serialize_untagged() {
        let result = ValidationResult::new("IRN3M Curncy", Price::Raw(json!("N/A")));
        let json = serde_json::to_value(&result).expect("serialize");
        assert_eq!(json["px_last"], json!("N/A"));

        let back: ValidationResult = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back.px_last, Price::Raw(json!("N/A")));
    }
}
