//! Candidate ticker generation.
//!
//! Templates use three placeholders: `{pair}` (e.g. `USDINR`), `{ccy}`
//! (e.g. `INR`) and `{tenor}` (e.g. `1M`). Generation is pure: identical
//! inputs always produce the identical ordered candidate list, duplicates
//! included.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{CurrencyPair, Tenor, TickerCandidate, ValidationError};

/// Templates tried when searching for an NDF curve with no known family.
pub const NDF_DISCOVERY_TEMPLATES: [&str; 6] = [
    "{pair}N{tenor} Curncy",
    "{pair}{tenor}N Curncy",
    "NDF{pair}{tenor} Curncy",
    "{pair}{tenor} NDF Curncy",
    "{ccy}NDF{tenor} Curncy",
    "USD{ccy}N{tenor} Curncy",
];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Pair,
    Currency,
    Tenor,
}

/// Parsed ticker template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TickerTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl TickerTemplate {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        if raw.trim().is_empty() {
            return Err(ValidationError::EmptyTemplate);
        }

        let mut segments = Vec::new();
        let mut rest = raw;
        while let Some(open) = rest.find('{') {
            if open > 0 {
                segments.push(Segment::Literal(rest[..open].to_owned()));
            }
            let after = &rest[open + 1..];
            let close = after
                .find('}')
                .ok_or_else(|| ValidationError::UnterminatedPlaceholder {
                    template: raw.to_owned(),
                })?;
            let segment = match &after[..close] {
                "pair" => Segment::Pair,
                "ccy" => Segment::Currency,
                "tenor" => Segment::Tenor,
                other => {
                    return Err(ValidationError::UnknownPlaceholder {
                        template: raw.to_owned(),
                        name: other.to_owned(),
                    })
                }
            };
            segments.push(segment);
            rest = &after[close + 1..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_owned()));
        }

        Ok(Self {
            raw: raw.to_owned(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn uses_tenor(&self) -> bool {
        self.segments.contains(&Segment::Tenor)
    }

    /// Substitutes the placeholders. A missing tenor renders as nothing.
    pub fn render(&self, pair: &CurrencyPair, currency: &str, tenor: Option<Tenor>) -> String {
        let mut out = String::with_capacity(self.raw.len() + 8);
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Pair => out.push_str(pair.as_str()),
                Segment::Currency => out.push_str(currency),
                Segment::Tenor => {
                    if let Some(tenor) = tenor {
                        out.push_str(tenor.as_str());
                    }
                }
            }
        }
        out
    }
}

impl Display for TickerTemplate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

impl TryFrom<String> for TickerTemplate {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TickerTemplate> for String {
    fn from(value: TickerTemplate) -> Self {
        value.raw
    }
}

/// Ticker format family: a template applied to an explicit tenor list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormatFamily {
    /// Short code such as `NTN` or `NDFUSDTWD`.
    pub code: String,
    pub template: TickerTemplate,
    pub tenors: Vec<Tenor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl FormatFamily {
    /// Candidates in the family's listed tenor order.
    pub fn expand(&self, pair: &CurrencyPair) -> Vec<TickerCandidate> {
        self.tenors
            .iter()
            .map(|tenor| {
                TickerCandidate::new(
                    self.template.render(pair, pair.ndf_currency(), Some(*tenor)),
                    pair.clone(),
                    Some(*tenor),
                    self.code.clone(),
                )
            })
            .collect()
    }
}

/// Cartesian template × tenor generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternGenerator {
    templates: Vec<TickerTemplate>,
    tenors: Vec<Tenor>,
}

impl PatternGenerator {
    pub fn new(templates: Vec<TickerTemplate>, tenors: Vec<Tenor>) -> Self {
        Self { templates, tenors }
    }

    /// The six NDF discovery templates over the eleven NDF tenors.
    pub fn ndf_discovery() -> Self {
        let templates = NDF_DISCOVERY_TEMPLATES
            .iter()
            .map(|raw| TickerTemplate::parse(raw).expect("discovery templates are valid"))
            .collect();
        Self::new(templates, Tenor::NDF.to_vec())
    }

    pub fn templates(&self) -> &[TickerTemplate] {
        &self.templates
    }

    /// For each tenor in order, every template in order.
    pub fn generate(&self, pair: &CurrencyPair, currency: &str) -> Vec<TickerCandidate> {
        let mut candidates = Vec::with_capacity(self.templates.len() * self.tenors.len());
        for tenor in &self.tenors {
            for template in &self.templates {
                candidates.push(TickerCandidate::new(
                    template.render(pair, currency, Some(*tenor)),
                    pair.clone(),
                    Some(*tenor),
                    template.as_str(),
                ));
            }
        }
        candidates
    }
}

/// Spot ticker followed by `{pair}{tenor} Curncy` for every tenor.
pub fn outright_forward_candidates(pair: &CurrencyPair) -> Vec<TickerCandidate> {
    let mut candidates = Vec::with_capacity(Tenor::ALL.len() + 1);
    candidates.push(TickerCandidate::spot(pair.clone()));
    for tenor in Tenor::ALL {
        candidates.push(TickerCandidate::new(
            format!("{}{} Curncy", pair.as_str(), tenor.as_str()),
            pair.clone(),
            Some(tenor),
            "outright",
        ));
    }
    candidates
}
