//! Free-form ticker search against the discovery endpoint.

use serde_json::{json, Value};

use crate::gateway::{BloombergGateway, DiscoveredTicker, GatewayError};
use crate::throttling::RequestPacer;
use crate::CurrencyPair;

const TICKER_KEYWORDS: [&str; 3] = ["NDF", "NON", "DELIVER"];
const DESCRIPTION_KEYWORDS: [&str; 3] = ["NDF", "NON-DELIVERABLE", "FORWARD"];

/// Maximum hits requested by wildcard searches.
pub const PATTERN_SEARCH_LIMIT: u32 = 20;

/// Search payloads tried for one pair, in order.
pub fn search_queries(pair: &CurrencyPair) -> Vec<Value> {
    let currency = pair.ndf_currency();
    vec![
        json!({"search_type": "ndf", "currency": currency}),
        json!({"search_type": "fx_forward", "currency": currency}),
        json!({"search_type": "fx", "currency": currency, "instrument_type": "ndf"}),
        json!({"search_pattern": format!("{currency}*NDF*"), "max_results": PATTERN_SEARCH_LIMIT}),
        json!({"search_pattern": format!("NDF*{currency}*"), "max_results": PATTERN_SEARCH_LIMIT}),
        json!({"search_pattern": format!("{}*NDF*", pair.as_str()), "max_results": PATTERN_SEARCH_LIMIT}),
    ]
}

/// Keeps hits whose ticker or description looks like a non-deliverable forward.
pub fn is_ndf_hit(hit: &DiscoveredTicker) -> bool {
    let ticker = hit.ticker.to_ascii_uppercase();
    let description = hit.description.to_ascii_uppercase();

    TICKER_KEYWORDS.iter().any(|keyword| ticker.contains(keyword))
        || DESCRIPTION_KEYWORDS
            .iter()
            .any(|keyword| description.contains(keyword))
}

/// Runs one paced search and returns the filtered hits.
pub async fn search(
    gateway: &BloombergGateway,
    pacer: &RequestPacer,
    query: &Value,
) -> Result<Vec<DiscoveredTicker>, GatewayError> {
    pacer.wait().await;
    let hits = gateway.discover(query).await?;
    let total = hits.len();

    let kept = hits
        .into_iter()
        .filter(|hit| !hit.ticker.is_empty() && is_ndf_hit(hit))
        .inspect(|hit| {
            tracing::info!(ticker = %hit.ticker, description = %hit.description, "search hit");
        })
        .collect::<Vec<_>>();

    tracing::debug!(%query, total, kept = kept.len(), "search finished");
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(ticker: &str, description: &str) -> DiscoveredTicker {
        DiscoveredTicker {
            ticker: ticker.to_owned(),
            description: description.to_owned(),
        }
    }

    #[test]
    fn queries_cover_types_and_patterns() {
        let pair = CurrencyPair::parse("USDINR").expect("valid");
        let queries = search_queries(&pair);

        assert_eq!(queries.len(), 6);
        assert_eq!(queries[0], json!({"search_type": "ndf", "currency": "INR"}));
        assert_eq!(queries[3]["search_pattern"], "INR*NDF*");
        assert_eq!(queries[4]["search_pattern"], "NDF*INR*");
        assert_eq!(queries[5]["search_pattern"], "USDINR*NDF*");
        assert_eq!(queries[5]["max_results"], 20);
    }

    #[test]
    fn keyword_filter_checks_ticker_and_description() {
        assert!(is_ndf_hit(&hit("inrndf1m curncy", "")));
        assert!(is_ndf_hit(&hit("IRN1M Curncy", "USD-INR non-deliverable 1M")));
        assert!(is_ndf_hit(&hit("IRN1M Curncy", "Rupee Forward")));
        assert!(is_ndf_hit(&hit("XNONX Curncy", "")));
        assert!(!is_ndf_hit(&hit("USDINR Curncy", "Indian Rupee spot")));
    }

    #[test]
    fn description_non_without_hyphen_is_not_enough() {
        assert!(!is_ndf_hit(&hit("IRN1M Curncy", "non deliverable")));
    }
}
