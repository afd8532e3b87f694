//! Domain types used throughout the report.
//!
//! This module defines:
//!
//! - the static currency catalog (`Currency`, `CATALOG`)
//! - trip search parameters (`TripQuery`, `DepartureDate`)
//! - fee handling policies (`FeePolicy`, `FeePlacement`)
//! - report configuration and output rows (`ReportConfig`, `PriceRow`)

pub mod currency;
pub mod types;

pub use currency::{CATALOG, Currency};
pub use types::*;
