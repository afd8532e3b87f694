//! `fare-fx` library crate.
//!
//! Compares FlixBus fares quoted in every supported currency after converting
//! them into one base currency. The binary (`fares`) is a thin wrapper so the
//! reporting logic is testable without spawning processes or hitting the
//! network.

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod logging;
pub mod pricing;
pub mod report;
