//! Behavior-driven tests for the probe workflows
//!
//! These tests run each probe end to end against a scripted gateway and
//! check what ends up in the report: summaries, ordering, formats and the
//! file written to disk.

use std::sync::Arc;
use std::time::{Duration, Instant};

use ndfscout_core::probe::{coverage, mapping, ndf_check, ndf_discovery};
use ndfscout_core::validator::{COVERAGE_FIELDS, MAPPING_FIELDS};
use ndfscout_core::{
    BatchValidator, Catalog, ClassifierPolicy, CoverageTier, CurrencyPair, Price, Report,
    ReportWriter, RequestPacer, Tenor,
};
use ndfscout_tests::{gateway, FakeGateway, Fault};
use serde_json::Value;

fn pair(value: &str) -> CurrencyPair {
    CurrencyPair::parse(value).expect("valid pair")
}

fn family_tickers(prefix: &str, tenors: &[Tenor]) -> Vec<String> {
    tenors
        .iter()
        .map(|tenor| format!("{prefix}{tenor} Curncy"))
        .collect()
}

fn priced(fake: FakeGateway, tickers: &[String], price: f64) -> FakeGateway {
    let refs = tickers.iter().map(String::as_str).collect::<Vec<_>>();
    fake.with_prices(&refs, price)
}

fn validator(fake: &Arc<FakeGateway>, chunk_size: usize) -> BatchValidator {
    BatchValidator::new(gateway(fake), RequestPacer::unlimited(), chunk_size).expect("chunk size")
}

// =============================================================================
// NDF Check
// =============================================================================

#[tokio::test]
async fn when_only_ntn_family_prices_check_reports_usdtwd_as_the_single_success() {
    // Given: The embedded catalog and a gateway that prices the NTN family only
    let catalog = Catalog::embedded().expect("embedded catalog");
    let fake = Arc::new(priced(
        FakeGateway::new(),
        &family_tickers("NTN", &Tenor::NDF),
        31.7,
    ));
    let validator = validator(&fake, ndf_check::CHUNK_SIZE);

    // When: The known-family check runs over every catalog pair
    let report = ndf_check::run(&validator, &catalog).await;

    // Then: Only USDTWD works and all ten pairs were tested
    assert_eq!(report.summary.successful, vec![pair("USDTWD")]);
    assert_eq!(report.summary.failed.len(), 9);
    assert_eq!(report.summary.total_tested, 10);

    let twd = &report.results[&pair("USDTWD")];
    assert_eq!(twd.tested, 14);
    assert_eq!(twd.valid, 11);
    assert_eq!(twd.families(), vec!["NTN"]);
    assert_eq!(twd.tenors().first(), Some(&Tenor::OneWeek));
    assert_eq!(twd.tenors().last(), Some(&Tenor::FiveYears));

    // And: Every pair was chunked by ten
    assert_eq!(fake.call_count(), 19);

    // And: The summary text shows counts and tenor-ordered samples
    let text = report.render_text();
    assert!(text.contains("CURRENCIES WITH WORKING NDF TICKERS (1):"));
    assert!(text.contains("USDTWD: 11/14 tickers working"));
    assert!(text.contains("    - NTN1W Curncy: 31.7"));
    assert!(text.contains("CURRENCIES WITHOUT WORKING NDF TICKERS (9):"));
}

#[tokio::test]
async fn when_first_chunk_fails_later_chunks_still_contribute() {
    // Given: USDINR's sixteen candidates and a gateway failing the first call
    let catalog = Catalog::embedded().expect("embedded catalog");
    let entry = &catalog.ndf_check[0];
    assert_eq!(entry.pair, pair("USDINR"));

    let irn_tenors = [
        Tenor::OneWeek,
        Tenor::TwoWeeks,
        Tenor::OneMonth,
        Tenor::TwoMonths,
        Tenor::ThreeMonths,
        Tenor::SixMonths,
        Tenor::OneYear,
    ];
    let fake = Arc::new(
        priced(FakeGateway::new(), &family_tickers("IRN", &irn_tenors), 83.1)
            .with_fault(0, Fault::Status(500)),
    );
    let validator = validator(&fake, ndf_check::CHUNK_SIZE);

    // When: The pair is checked
    let check = ndf_check::check_pair(&validator, entry).await;

    // Then: The second chunk (IRN 2W..1Y) still resolves
    assert_eq!(fake.call_count(), 2);
    assert_eq!(check.tested, 16);
    assert_eq!(check.valid, 6);
    assert!(check.tickers.iter().all(|t| t.ticker != "IRN1W Curncy"));

    // And: The failed chunk is recorded, not retried
    assert_eq!(check.errors.len(), 1);
    assert!(check.errors[0].starts_with("chunk 0:"));
    assert!(check.errors[0].contains("gateway.status"));
}

// =============================================================================
// Coverage
// =============================================================================

#[tokio::test]
async fn when_spot_and_every_tenor_price_pair_is_full_5y() {
    // Given: EURUSD spot plus all twelve outright tenors
    let mut tickers = vec![String::from("EURUSD Curncy")];
    tickers.extend(family_tickers("EURUSD", &Tenor::ALL));
    let fake = Arc::new(priced(FakeGateway::new(), &tickers, 1.08));
    let validator = validator(&fake, coverage::CHUNK_SIZE).with_fields(&COVERAGE_FIELDS);

    // When: The pair is analyzed
    let result = coverage::analyze_pair(
        &validator,
        &pair("EURUSD"),
        "G10",
        &ClassifierPolicy::default(),
    )
    .await;

    // Then: One request covers the pair and it lands in the top tier
    assert_eq!(fake.call_count(), 1);
    assert_eq!(fake.bodies()[0]["fields"], serde_json::json!(COVERAGE_FIELDS));
    assert_eq!(result.tier, CoverageTier::Full5y);
    assert!(result.has_spot);
    assert_eq!(result.spot, Some(Price::Number(1.08)));
    assert_eq!(result.available_forwards.len(), 12);
    assert!(result.missing_forwards.is_empty());
    assert_eq!(result.longest_tenor, Some(Tenor::FiveYears));
}

#[tokio::test]
async fn when_coverage_runs_over_universe_every_pair_is_classified() {
    // Given: A gateway that only prices USDINR spot and GBPUSD out to 1Y
    let catalog = Catalog::embedded().expect("embedded catalog");
    let gbp = [
        Tenor::OneWeek,
        Tenor::OneMonth,
        Tenor::ThreeMonths,
        Tenor::SixMonths,
        Tenor::OneYear,
    ];
    let fake = Arc::new(
        priced(FakeGateway::new(), &family_tickers("GBPUSD", &gbp), 1.27)
            .with_price("GBPUSD Curncy", 1.27)
            .with_price("USDINR Curncy", 83.0),
    );
    let validator = validator(&fake, coverage::CHUNK_SIZE).with_fields(&COVERAGE_FIELDS);

    // When: The full coverage scan runs
    let report = coverage::run(&validator, &catalog, &ClassifierPolicy::default()).await;

    // Then: All 45 pairs are classified, one request each
    assert_eq!(report.summary.total_pairs, 45);
    assert_eq!(fake.call_count(), 45);
    assert_eq!(report.summary.categories[&CoverageTier::PartialShort], 1);
    assert_eq!(report.summary.categories[&CoverageTier::SpotOnly], 1);
    assert_eq!(report.summary.categories[&CoverageTier::NoData], 43);

    // And: USDINR is flagged as a potential NDF currency
    assert_eq!(report.ndf_candidates, vec![pair("USDINR")]);

    // And: The text report lists the tiers
    let text = report.render_text();
    assert!(text.contains("COVERAGE SUMMARY"));
    assert!(text.contains("GBPUSD: up to 1Y"));
    assert!(text.contains("Potential NDF currencies (spot only):"));
}

// =============================================================================
// Discovery
// =============================================================================

#[tokio::test]
async fn when_discovering_search_hits_precede_validated_patterns() {
    // Given: One NDF search hit, one spot hit, five failing searches and one
    // generated pattern that validates
    let catalog = Catalog::embedded().expect("embedded catalog");
    let target = &catalog.discovery_targets[0];
    assert_eq!(target.pair, pair("USDINR"));

    let mut fake = FakeGateway::new()
        .with_search_hit("IRN1M Curncy", "INR 1M NDF")
        .with_search_hit("USDINR Curncy", "Indian Rupee Spot")
        .with_price("USDINRN1M Curncy", 83.4);
    for call in 1..=5 {
        fake = fake.with_fault(call, Fault::Transport);
    }
    let fake = Arc::new(fake);

    let pacer = RequestPacer::unlimited();
    let validator = BatchValidator::new(gateway(&fake), pacer.clone(), ndf_discovery::CHUNK_SIZE)
        .expect("chunk size")
        .with_validate_endpoint();
    let probe = ndf_discovery::DiscoveryProbe::new(gateway(&fake), pacer, validator);

    // When: The pair is discovered
    let discovery = probe.discover_pair(target).await;

    // Then: Search hits come first, then validated generated tickers
    assert_eq!(
        discovery.discovered_tickers,
        vec![String::from("IRN1M Curncy"), String::from("USDINRN1M Curncy")]
    );

    // And: Each failed search is recorded with its query
    assert_eq!(discovery.errors.len(), 5);
    assert!(discovery.errors.iter().all(|e| e.starts_with("search {")));

    // And: Six searches ran before 66 candidates were validated in chunks of 20
    let urls = fake.requests().into_iter().map(|r| r.url).collect::<Vec<_>>();
    assert_eq!(urls.len(), 10);
    assert!(urls[..6].iter().all(|u| u.ends_with("/ticker-discovery")));
    assert!(urls[6..].iter().all(|u| u.ends_with("/validate-tickers")));
}

#[tokio::test]
async fn when_a_ticker_is_found_twice_it_is_listed_once_at_first_sighting() {
    // Given: A search hit that a generated template also produces, and the
    // two USD templates that both expand to USDINRN1M
    let catalog = Catalog::embedded().expect("embedded catalog");
    let target = &catalog.discovery_targets[0];
    let fake = Arc::new(
        FakeGateway::new()
            .with_search_hit("USDINRN3M Curncy", "INR 3M NDF")
            .with_prices(&["USDINRN1M Curncy", "USDINRN3M Curncy"], 83.4),
    );

    let pacer = RequestPacer::unlimited();
    let validator = BatchValidator::new(gateway(&fake), pacer.clone(), ndf_discovery::CHUNK_SIZE)
        .expect("chunk size")
        .with_validate_endpoint();
    let discoverer = ndf_discovery::DiscoveryProbe::new(gateway(&fake), pacer, validator);

    // When: The pair is discovered
    let discovery = discoverer.discover_pair(target).await;

    // Then: Every ticker appears once, where it was first seen
    assert_eq!(
        discovery.discovered_tickers,
        vec![String::from("USDINRN3M Curncy"), String::from("USDINRN1M Curncy")]
    );
    assert!(discovery.errors.is_empty());
}

// =============================================================================
// Mapping
// =============================================================================

#[tokio::test]
async fn when_kwn_family_verifies_mapping_adds_it_after_confirmed_formats() {
    // Given: A gateway pricing the KWN family
    let catalog = Catalog::embedded().expect("embedded catalog");
    let fake = Arc::new(priced(
        FakeGateway::new(),
        &family_tickers("KWN", &Tenor::NDF),
        1_350.0,
    ));
    let validator = validator(&fake, mapping::CHUNK_SIZE).with_fields(&MAPPING_FIELDS);

    // When: The verification probe runs
    let report = mapping::run(&validator, &catalog).await;

    // Then: USDKRW joins the four confirmed formats
    assert_eq!(report.working_ndfs.len(), 5);
    let krw = &report.working_ndfs[&pair("USDKRW")];
    assert_eq!(krw.source, mapping::FormatSource::Verified);
    assert_eq!(krw.summary, "KWN format (11 tenors: 1W-5Y)");

    let format = &report.ticker_formats[&pair("USDKRW")];
    assert_eq!(format.format, "KWN");
    assert_eq!(format.example, "KWN1M Curncy");
    assert_eq!(format.working_tickers.len(), 11);

    // And: The recommended table keeps confirmed rows first
    let rows = report.recommended.iter().map(|r| r.pair.as_str()).collect::<Vec<_>>();
    assert_eq!(rows, vec!["USDINR", "USDTWD", "USDMYR", "USDCOP", "USDKRW"]);

    // And: Pairs with nothing working are listed sorted
    let missing = report.still_missing.iter().map(|p| p.as_str()).collect::<Vec<_>>();
    assert_eq!(missing, vec!["USDARS", "USDBRL", "USDCLP", "USDIDR", "USDPEN", "USDPHP"]);

    let text = report.render_text();
    assert!(text.contains("RECOMMENDED NDF TICKER FORMATS:"));
    assert!(text.contains("STILL NO NDF TICKERS FOUND (6):"));
}

// =============================================================================
// Reports and Pacing
// =============================================================================

#[tokio::test]
async fn when_report_is_saved_file_is_timestamped_json_in_output_dir() {
    // Given: A finished check report and a temporary output directory
    let catalog = Catalog::embedded().expect("embedded catalog");
    let fake = Arc::new(FakeGateway::new());
    let report = ndf_check::run(&validator(&fake, ndf_check::CHUNK_SIZE), &catalog).await;
    let dir = tempfile::tempdir().expect("tempdir");

    // When: The report is written
    let path = ReportWriter::new(dir.path())
        .write(&report)
        .expect("report should be written");

    // Then: The file name is tool + file stamp and the body is the report
    let file_name = path.file_name().and_then(|n| n.to_str()).expect("file name");
    assert_eq!(path.parent(), Some(dir.path()));
    assert!(file_name.starts_with("ndf_verification_results_"));
    assert!(file_name.ends_with(".json"));
    assert_eq!(file_name, ndfscout_core::report_file_name(ndf_check::TOOL, report.meta.timestamp));

    let json: Value =
        serde_json::from_str(&std::fs::read_to_string(&path).expect("read")).expect("json");
    assert_eq!(json["timestamp"], report.meta.timestamp.to_string());
    assert_eq!(json["run_id"], report.meta.run_id.to_string());
    assert_eq!(json["summary"]["total_tested"], 10);
    assert_eq!(json["summary"]["failed"].as_array().map(Vec::len), Some(10));
}

#[tokio::test]
async fn when_pacer_has_interval_chunks_are_spaced_apart() {
    // Given: A 60 ms pacer and a pair needing two chunks
    let catalog = Catalog::embedded().expect("embedded catalog");
    let fake = Arc::new(FakeGateway::new());
    let pacer = RequestPacer::fixed_interval(Duration::from_millis(60));
    let validator =
        BatchValidator::new(gateway(&fake), pacer, ndf_check::CHUNK_SIZE).expect("chunk size");

    // When: USDINR is checked
    let started = Instant::now();
    let _ = ndf_check::check_pair(&validator, &catalog.ndf_check[0]).await;

    // Then: The second call waited for the interval
    assert_eq!(fake.call_count(), 2);
    assert!(started.elapsed() >= Duration::from_millis(50));
}
