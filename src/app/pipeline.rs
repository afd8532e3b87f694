//! Shared report pipeline.
//!
//! trip searches -> fee extraction -> normalization -> sort -> text
//!
//! Kept apart from `app::run` so it can be driven by any `TripSource` /
//! `RateSource`, including local mock servers in integration tests.

use crate::data::{RateSource, TripSource};
use crate::domain::{PriceRow, ReportConfig};
use crate::error::AppError;
use crate::report::{PriceReporter, format_report};

/// All computed outputs of a single report run.
#[derive(Debug, Clone)]
pub struct ReportOutput {
    pub rows: Vec<PriceRow>,
    pub text: String,
}

pub fn run_report<T, R>(trips: T, rates: R, config: ReportConfig) -> Result<ReportOutput, AppError>
where
    T: TripSource,
    R: RateSource,
{
    let mut reporter = PriceReporter::new(trips, rates, config);
    let rows = reporter.build_rows()?;
    let text = format_report(&rows, reporter.config());
    Ok(ReportOutput { rows, text })
}
