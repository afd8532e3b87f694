//! Fee extraction and price normalization.
//!
//! Both are pure functions over data that was already fetched.

use crate::data::flixbus::TripSearch;
use crate::data::RateTable;
use crate::domain::FeePolicy;
use crate::error::AppError;

/// Sum of the platform fees that apply under `policy`, in the searched currency.
///
/// Entries without a `fee_amount` count as zero. The result is never negative.
pub fn additional_fee(search: &TripSearch, policy: FeePolicy) -> f64 {
    let total: f64 = search
        .global_platform_fees
        .iter()
        .filter(|fee| match policy {
            FeePolicy::All => true,
            FeePolicy::Unflagged => !fee.is_flagged(),
        })
        .map(|fee| match &fee.fee_amount {
            None => 0.0,
            Some(amount) => amount.value().unwrap_or_else(|| {
                tracing::warn!(fee_amount = ?amount, "ignoring unparseable platform fee");
                0.0
            }),
        })
        .sum();

    total.max(0.0)
}

/// Convert `amount` quoted in `currency` into the table's base currency.
pub fn normalize(amount: f64, currency: &str, rates: &RateTable) -> Result<f64, AppError> {
    rates.to_base(amount, currency)
}
