//! ionian-wx — core library for the Corfu/Epirus weather station scraper.
//!
//! Holds everything that does not touch the network: the reading model,
//! unit normalization, numeric extraction from scraped text, the hardcoded
//! station directories and the append-only run report.

pub mod directory;
pub mod extract;
pub mod report;
pub mod types;
pub mod units;

pub use directory::{Station, StationDirectory};
pub use report::ReportWriter;
pub use types::*;
pub use units::{Quantity, Unit, UnitSystem};
