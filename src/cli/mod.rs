//! Command-line parsing for the fare comparison.
//!
//! Every flag has a default matching the classic report (LA to Las Vegas,
//! one adult, a week out, EUR base), so a bare `fares` run needs only the
//! exchange-rate API key.

use chrono::NaiveDate;
use clap::Parser;

use crate::data::flixbus::SEARCH_URL;
use crate::data::rates::{API_KEY_ENV, API_URL};
use crate::domain::{
    DEFAULT_DAYS_AHEAD, DEFAULT_FROM_CITY, DEFAULT_LOCALE, DEFAULT_PREVIEW_LEN, DEFAULT_TO_CITY,
    FeePlacement, FeePolicy,
};

/// Top-level CLI.
#[derive(Debug, Parser, Clone)]
#[command(name = "fares", version, about = "Compare FlixBus fares across currencies")]
pub struct Cli {
    /// Currency every price is converted into.
    #[arg(short = 'b', long, default_value = "EUR")]
    pub base: String,

    /// Only compare these currencies (repeatable or comma-separated).
    #[arg(short = 'c', long = "currency", value_delimiter = ',')]
    pub currencies: Vec<String>,

    /// Search departures this many days from today.
    #[arg(long, default_value_t = DEFAULT_DAYS_AHEAD)]
    pub days_ahead: i64,

    /// Search a fixed departure date (YYYY-MM-DD or DD.MM.YYYY).
    #[arg(long, value_parser = parse_date, conflicts_with = "days_ahead")]
    pub date: Option<NaiveDate>,

    /// Departure city UUID.
    #[arg(long, default_value = DEFAULT_FROM_CITY)]
    pub from_city: String,

    /// Destination city UUID.
    #[arg(long, default_value = DEFAULT_TO_CITY)]
    pub to_city: String,

    /// Number of adult passengers.
    #[arg(long, default_value_t = 1)]
    pub adults: u32,

    /// Locale sent to the search API.
    #[arg(long, default_value = DEFAULT_LOCALE)]
    pub locale: String,

    /// Which platform fees count towards the additional fee.
    #[arg(long, value_enum, default_value_t = FeePolicy::Unflagged)]
    pub fee_policy: FeePolicy,

    /// Fold the fee into every price or report it separately.
    #[arg(long, value_enum, default_value_t = FeePlacement::Folded)]
    pub fee_placement: FeePlacement,

    /// Number of prices shown per currency.
    #[arg(long, default_value_t = DEFAULT_PREVIEW_LEN)]
    pub preview: usize,

    /// Show the base currency as a symbol (e.g. €) instead of its code.
    #[arg(long)]
    pub symbol: bool,

    /// Fetch all currencies concurrently before building the report.
    #[arg(long)]
    pub parallel: bool,

    /// exchangerate-api.com key.
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, default_value = SEARCH_URL, hide = true)]
    pub search_url: String,

    #[arg(long, default_value = API_URL, hide = true)]
    pub rates_url: String,

    /// Debug logging on stderr (RUST_LOG overrides).
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d.%m.%Y"))
        .map_err(|_| format!("invalid date '{raw}' (expected YYYY-MM-DD or DD.MM.YYYY)"))
}
