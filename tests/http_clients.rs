use chrono::NaiveDate;
use fare_fx::app::pipeline::run_report;
use fare_fx::data::{ExchangeRateClient, FlixbusClient};
use fare_fx::domain::currency::lookup;
use fare_fx::domain::{DepartureDate, ReportConfig, TripQuery};
use fare_fx::error::EXIT_UPSTREAM;
use fare_fx::report::PriceReporter;
use httpmock::prelude::*;
use serde_json::json;

const SEARCH_PATH: &str = "/search/service/v4/search";

fn query() -> TripQuery {
    TripQuery {
        departure: DepartureDate::On(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()),
        ..TripQuery::default()
    }
}

fn trips_body(prices: &[f64], fee: &str) -> serde_json::Value {
    let results: serde_json::Map<String, serde_json::Value> = prices
        .iter()
        .enumerate()
        .map(|(i, p)| (format!("uid-{i}"), json!({ "price": { "original": p, "total": p } })))
        .collect();
    json!({
        "trips": [{ "results": results }],
        "global_platform_fees": [
            { "fee_amount": fee },
            { "fee_amount": "9.99", "abTestFlag": "platform_fee_test" }
        ]
    })
}

#[test]
fn trip_search_sends_fixed_parameters() {
    let server = MockServer::start();
    let search_mock = server.mock(|when, then| {
        when.method(GET)
            .path(SEARCH_PATH)
            .query_param("from_city_id", "490d29d8-7151-4e05-86df-68fba4f000be")
            .query_param("to_city_id", "30e3dcd2-f9a7-4900-8f39-7a77c261904e")
            .query_param("departure_date", "01.03.2026")
            .query_param("products", r#"{"adult":1}"#)
            .query_param("currency", "USD")
            .query_param("locale", "en_US")
            .query_param("search_by", "cities")
            .query_param("include_after_midnight_rides", "1");
        then.status(200).json_body(trips_body(&[45.0, 39.5], "2.50"));
    });

    let client = FlixbusClient::with_url(server.url(SEARCH_PATH), query()).unwrap();
    let search = client.search("USD").unwrap();

    search_mock.assert();
    let prices: Vec<f64> = search.original_prices().collect();
    assert_eq!(prices, vec![45.0, 39.5]);
    assert_eq!(search.global_platform_fees.len(), 2);
}

#[test]
fn trip_search_non_success_status_is_an_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(SEARCH_PATH);
        then.status(503).body("unavailable");
    });

    let client = FlixbusClient::with_url(server.url(SEARCH_PATH), query()).unwrap();
    let err = client.search("EUR").unwrap_err();
    assert_eq!(err.exit_code(), EXIT_UPSTREAM);
    assert!(err.message().contains("503"), "{err}");
}

#[test]
fn exchange_rates_are_parsed() {
    let server = MockServer::start();
    let rates_mock = server.mock(|when, then| {
        when.method(GET).path("/v6/test-key/latest/EUR");
        then.status(200).json_body(json!({
            "result": "success",
            "base_code": "EUR",
            "conversion_rates": { "EUR": 1, "USD": 1.1, "JPY": 161.25 }
        }));
    });

    let client = ExchangeRateClient::with_url(server.base_url(), "test-key");
    let table = client.latest("eur").unwrap();

    rates_mock.assert();
    assert_eq!(table.base(), "EUR");
    assert_eq!(table.rate("USD"), Some(1.1));
    assert_eq!(table.to_base(161.25, "JPY").unwrap(), 1.0);
}

#[test]
fn exchange_rate_error_body_is_reported() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v6/bad-key/latest/EUR");
        then.status(403).json_body(json!({ "result": "error", "error-type": "invalid-key" }));
    });

    let client = ExchangeRateClient::with_url(server.base_url(), "bad-key");
    let err = client.latest("EUR").unwrap_err();
    assert!(err.message().contains("invalid-key"), "{err}");
    assert!(!err.message().contains("bad-key"), "{err}");
}

#[test]
fn exchange_rates_without_table_are_an_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v6/k/latest/EUR");
        then.status(200).json_body(json!({ "result": "success" }));
    });

    let client = ExchangeRateClient::with_url(server.base_url(), "k");
    let err = client.latest("EUR").unwrap_err();
    assert!(err.message().contains("conversion_rates"), "{err}");
}

#[test]
fn reporter_issues_one_search_per_currency() {
    let server = MockServer::start();
    let search_mock = server.mock(|when, then| {
        when.method(GET).path(SEARCH_PATH).query_param("currency", "GBP");
        then.status(200).json_body(trips_body(&[12.0], "0"));
    });

    let trips = FlixbusClient::with_url(server.url(SEARCH_PATH), query()).unwrap();
    let rates = ExchangeRateClient::with_url(server.base_url(), "unused");
    let mut reporter = PriceReporter::new(trips, rates, ReportConfig::for_base(lookup("EUR").unwrap()));

    reporter.trip_info("GBP").unwrap();
    reporter.trip_info("GBP").unwrap();

    search_mock.assert_hits(1);
}

#[test]
fn report_end_to_end() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(SEARCH_PATH).query_param("currency", "EUR");
        then.status(200).json_body(trips_body(&[20.0, 25.0], "1.00"));
    });
    server.mock(|when, then| {
        when.method(GET).path(SEARCH_PATH).query_param("currency", "USD");
        then.status(200).json_body(trips_body(&[22.0], "0"));
    });
    server.mock(|when, then| {
        when.method(GET).path(SEARCH_PATH).query_param("currency", "GBP");
        then.status(200).json_body(json!({ "trips": [] }));
    });
    let rates_mock = server.mock(|when, then| {
        when.method(GET).path("/v6/k/latest/EUR");
        then.status(200).json_body(json!({
            "result": "success",
            "conversion_rates": { "EUR": 1.0, "USD": 1.1, "GBP": 0.85 }
        }));
    });

    let mut config = ReportConfig::for_base(lookup("EUR").unwrap());
    config.currencies = ["EUR", "GBP", "USD"].iter().map(|c| lookup(c).unwrap()).collect();

    let output = run_report(
        FlixbusClient::with_url(server.url(SEARCH_PATH), query()).unwrap(),
        ExchangeRateClient::with_url(server.base_url(), "k"),
        config,
    )
    .unwrap();

    rates_mock.assert_hits(1);
    let lines: Vec<&str> = output.text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "usd   95.24% - [20.00] EUR",
            "EUR  100.00% - [21.00, 26.00] EUR (+1.00 inc.)",
        ]
    );
}
