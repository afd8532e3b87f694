//! Per-currency price rows and their ordering.
//!
//! `PriceReporter` owns the two per-run caches (trip searches by currency,
//! the conversion-rate table). Both are filled on first access and never
//! invalidated; a process run is one report.

use std::collections::HashMap;

use rayon::prelude::*;

use crate::data::{RateSource, RateTable, TripSearch, TripSource};
use crate::domain::{Currency, FeePlacement, PriceRow, ReportConfig};
use crate::error::AppError;
use crate::pricing::{additional_fee, normalize};

pub mod format;

pub use format::{format_report, format_row};

pub struct PriceReporter<T, R> {
    trips: T,
    rates: R,
    config: ReportConfig,
    // Failures are cached too: one upstream call per currency per run.
    trip_cache: HashMap<String, Result<TripSearch, AppError>>,
    rate_cache: Option<RateTable>,
}

impl<T: TripSource, R: RateSource> PriceReporter<T, R> {
    pub fn new(trips: T, rates: R, mut config: ReportConfig) -> Self {
        if !config.currencies.contains(&config.base) {
            config.currencies.push(config.base);
            config.currencies.sort_by_key(|c| c.code);
        }
        Self {
            trips,
            rates,
            config,
            trip_cache: HashMap::new(),
            rate_cache: None,
        }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Trip search for `currency`, fetched at most once per reporter.
    pub fn trip_info(&mut self, currency: &str) -> Result<&TripSearch, AppError> {
        let key = currency.to_ascii_uppercase();
        if !self.trip_cache.contains_key(&key) {
            let result = self.trips.search(&key);
            self.trip_cache.insert(key.clone(), result);
        }
        match &self.trip_cache[&key] {
            Ok(search) => Ok(search),
            Err(err) => Err(err.clone()),
        }
    }

    /// Conversion rates for the base currency, loaded on first use.
    pub fn conversion_rates(&mut self) -> Result<&RateTable, AppError> {
        let table = match self.rate_cache.take() {
            Some(table) => table,
            None => self.rates.latest(self.config.base.code)?,
        };
        Ok(&*self.rate_cache.insert(table))
    }

    /// Fetch every configured currency's trips in parallel into the cache.
    ///
    /// Already cached currencies are not fetched again.
    pub fn prefetch(&mut self) {
        let pending: Vec<&'static str> = self
            .config
            .currencies
            .iter()
            .map(|c| c.code)
            .filter(|code| !self.trip_cache.contains_key(*code))
            .collect();

        tracing::debug!(currencies = pending.len(), "prefetching trip searches");

        let source = &self.trips;
        let fetched: Vec<(&'static str, Result<TripSearch, AppError>)> = pending
            .par_iter()
            .map(|code| (*code, source.search(code)))
            .collect();

        for (code, result) in fetched {
            self.trip_cache.insert(code.to_string(), result);
        }
    }

    /// Row for one currency.
    ///
    /// `Ok(None)` means the currency is left out of the report: no trips, a
    /// failed search, or no usable conversion rate. Only a failure to load the
    /// rate table itself is returned as an error.
    pub fn price_row(&mut self, currency: Currency) -> Result<Option<PriceRow>, AppError> {
        let policy = self.config.fee_policy;
        let placement = self.config.fee_placement;

        let (fee, originals) = match self.trip_info(currency.code) {
            Ok(search) if search.trips.is_empty() => {
                tracing::debug!(currency = currency.code, "no trips, skipping");
                return Ok(None);
            }
            Ok(search) => {
                let originals: Vec<f64> = search.original_prices().filter(|p| *p > 0.0).collect();
                (additional_fee(search, policy), originals)
            }
            Err(err) => {
                tracing::warn!(currency = currency.code, error = %err, "trip search failed, skipping");
                return Ok(None);
            }
        };

        if originals.is_empty() {
            tracing::debug!(currency = currency.code, "no positive prices, skipping");
            return Ok(None);
        }

        let rates = self.conversion_rates()?;
        match build_row(currency, &originals, fee, placement, rates) {
            Ok(row) => Ok(Some(row)),
            Err(err) => {
                tracing::warn!(currency = currency.code, error = %err, "conversion failed, skipping");
                Ok(None)
            }
        }
    }

    /// Rows for every configured currency, sorted by first listed price.
    pub fn build_rows(&mut self) -> Result<Vec<PriceRow>, AppError> {
        if self.config.parallel {
            self.prefetch();
        }

        let currencies = self.config.currencies.clone();
        let mut rows = Vec::with_capacity(currencies.len());
        for currency in currencies {
            if let Some(row) = self.price_row(currency)? {
                rows.push(row);
            }
        }

        tracing::info!(
            compared = rows.len(),
            skipped = self.config.currencies.len() - rows.len(),
            "built price rows"
        );

        sort_rows(&mut rows);
        Ok(rows)
    }
}

fn build_row(
    currency: Currency,
    originals: &[f64],
    fee: f64,
    placement: FeePlacement,
    rates: &RateTable,
) -> Result<PriceRow, AppError> {
    let listed_fee = match placement {
        FeePlacement::Folded => fee,
        FeePlacement::Separate => 0.0,
    };

    let prices = originals
        .iter()
        .map(|p| normalize(p + listed_fee, currency.code, rates))
        .collect::<Result<Vec<_>, _>>()?;
    let extra_fee = normalize(fee, currency.code, rates)?;

    Ok(PriceRow {
        currency,
        prices,
        extra_fee,
    })
}

/// Stable ascending sort on the first listed price; ties keep input order.
pub fn sort_rows(rows: &mut [PriceRow]) {
    rows.sort_by(|a, b| {
        a.first_price()
            .partial_cmp(&b.first_price())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}
