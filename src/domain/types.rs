//! Shared domain types.
//!
//! Everything here is plain data: query parameters for the trip search,
//! the policy knobs that decide how platform fees are treated, the report
//! configuration, and the rows the reporter produces.

use chrono::{Duration, NaiveDate};
use clap::ValueEnum;

use super::currency::{self, Currency};

/// Los Angeles, CA.
pub const DEFAULT_FROM_CITY: &str = "490d29d8-7151-4e05-86df-68fba4f000be";
/// Las Vegas, NV.
pub const DEFAULT_TO_CITY: &str = "30e3dcd2-f9a7-4900-8f39-7a77c261904e";
pub const DEFAULT_LOCALE: &str = "en_US";
pub const DEFAULT_DAYS_AHEAD: i64 = 7;
pub const DEFAULT_PREVIEW_LEN: usize = 4;

/// Which platform-fee entries count towards the additional fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FeePolicy {
    /// Sum only entries without an A/B test flag.
    #[default]
    Unflagged,
    /// Sum every entry, flagged or not.
    All,
}

/// Where the additional fee shows up in a report row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FeePlacement {
    /// Add the fee to every listed price (suffix reads `inc.`).
    #[default]
    Folded,
    /// List bare prices and report the fee only in the suffix (`extra`).
    Separate,
}

impl FeePlacement {
    pub fn suffix_label(self) -> &'static str {
        match self {
            FeePlacement::Folded => "inc.",
            FeePlacement::Separate => "extra",
        }
    }
}

/// Departure date of the searched trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepartureDate {
    /// Offset in days from the local date at query time.
    DaysAhead(i64),
    /// A fixed calendar date.
    On(NaiveDate),
}

impl Default for DepartureDate {
    fn default() -> Self {
        DepartureDate::DaysAhead(DEFAULT_DAYS_AHEAD)
    }
}

impl DepartureDate {
    /// Calendar date of departure, or `None` if the offset leaves chrono's range.
    pub fn resolve(self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            DepartureDate::DaysAhead(days) => {
                Duration::try_days(days).and_then(|offset| today.checked_add_signed(offset))
            }
            DepartureDate::On(date) => Some(date),
        }
    }
}

/// Fixed trip parameters shared by every per-currency search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripQuery {
    pub from_city_id: String,
    pub to_city_id: String,
    pub departure: DepartureDate,
    pub adults: u32,
    pub locale: String,
}

impl Default for TripQuery {
    fn default() -> Self {
        Self {
            from_city_id: DEFAULT_FROM_CITY.to_string(),
            to_city_id: DEFAULT_TO_CITY.to_string(),
            departure: DepartureDate::default(),
            adults: 1,
            locale: DEFAULT_LOCALE.to_string(),
        }
    }
}

impl TripQuery {
    /// JSON passenger description the search endpoint expects in `products`.
    pub fn products(&self) -> String {
        serde_json::json!({ "adult": self.adults }).to_string()
    }
}

/// Report settings after CLI parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    pub base: Currency,
    /// Currencies to compare. The base currency is always part of the set.
    pub currencies: Vec<Currency>,
    pub fee_policy: FeePolicy,
    pub fee_placement: FeePlacement,
    pub preview_len: usize,
    /// Render the base currency as its symbol instead of its code.
    pub show_symbol: bool,
    pub parallel: bool,
}

impl ReportConfig {
    /// Config comparing every catalog currency against `base`.
    pub fn for_base(base: Currency) -> Self {
        Self {
            base,
            currencies: currency::CATALOG.to_vec(),
            fee_policy: FeePolicy::default(),
            fee_placement: FeePlacement::default(),
            preview_len: DEFAULT_PREVIEW_LEN,
            show_symbol: false,
            parallel: false,
        }
    }

    /// Base currency label used as the suffix of every line.
    pub fn base_label(&self) -> &'static str {
        if self.show_symbol {
            self.base.symbol()
        } else {
            self.base.code
        }
    }
}

/// One currency's line of the comparison, with prices already in base.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRow {
    pub currency: Currency,
    /// Normalized prices in upstream result order. Never empty.
    pub prices: Vec<f64>,
    /// Normalized additional fee.
    pub extra_fee: f64,
}

impl PriceRow {
    pub fn first_price(&self) -> f64 {
        self.prices[0]
    }
}
