//! Upstream data sources.
//!
//! - FlixBus trip search (`flixbus`)
//! - exchangerate-api.com conversion rates (`rates`)
//!
//! The reporter only talks to the traits below, so it can be driven by
//! in-memory sources in tests.

pub mod flixbus;
pub mod rates;

pub use flixbus::{FlixbusClient, TripSearch};
pub use rates::{ExchangeRateClient, RateTable};

use crate::error::AppError;

/// Anything that can run a trip search in a given currency.
///
/// `Sync` so searches can be prefetched from a thread pool.
pub trait TripSource: Sync {
    fn search(&self, currency: &str) -> Result<TripSearch, AppError>;
}

/// Anything that can load conversion rates relative to a base currency.
pub trait RateSource {
    fn latest(&self, base: &str) -> Result<RateTable, AppError>;
}
