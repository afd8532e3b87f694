//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - sets up logging
//! - wires the HTTP clients into the reporter
//! - prints the comparison

use clap::Parser;

use crate::cli::Cli;
use crate::data::{ExchangeRateClient, FlixbusClient};
use crate::data::rates::API_KEY_ENV;
use crate::domain::{CATALOG, Currency, DepartureDate, ReportConfig, TripQuery};
use crate::domain::currency::lookup;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `fares` binary.
pub fn run() -> Result<(), AppError> {
    // Before parsing, so clap sees keys defined in `.env`.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    crate::logging::init(cli.verbose);

    let config = report_config_from_args(&cli)?;
    let query = trip_query_from_args(&cli);
    let api_key = cli
        .api_key
        .clone()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| AppError::config(format!("Missing exchange rate API key (--api-key or {API_KEY_ENV}).")))?;

    let trips = FlixbusClient::with_url(&cli.search_url, query)?;
    tracing::info!(
        base = config.base.code,
        currencies = config.currencies.len(),
        departure = %trips.departure_date(),
        "comparing fares"
    );
    let rates = ExchangeRateClient::with_url(&cli.rates_url, api_key);

    let output = pipeline::run_report(trips, rates, config)?;
    print!("{}", output.text);
    Ok(())
}

pub fn report_config_from_args(cli: &Cli) -> Result<ReportConfig, AppError> {
    let base = resolve_currency(&cli.base)?;

    let currencies = if cli.currencies.is_empty() {
        CATALOG.to_vec()
    } else {
        let mut selected = cli
            .currencies
            .iter()
            .map(|code| resolve_currency(code))
            .collect::<Result<Vec<_>, _>>()?;
        selected.sort_by_key(|c| c.code);
        selected.dedup();
        selected
    };

    if cli.preview == 0 {
        return Err(AppError::config("--preview must be > 0."));
    }

    Ok(ReportConfig {
        base,
        currencies,
        fee_policy: cli.fee_policy,
        fee_placement: cli.fee_placement,
        preview_len: cli.preview,
        show_symbol: cli.symbol,
        parallel: cli.parallel,
    })
}

pub fn trip_query_from_args(cli: &Cli) -> TripQuery {
    let departure = match cli.date {
        Some(date) => DepartureDate::On(date),
        None => DepartureDate::DaysAhead(cli.days_ahead),
    };
    TripQuery {
        from_city_id: cli.from_city.clone(),
        to_city_id: cli.to_city.clone(),
        departure,
        adults: cli.adults,
        locale: cli.locale.clone(),
    }
}

fn resolve_currency(code: &str) -> Result<Currency, AppError> {
    lookup(code.trim()).ok_or_else(|| AppError::config(format!("Unsupported currency '{code}'.")))
}
