//! Profitability and discount-impact reporting for Superstore-style
//! transaction exports.
//!
//! The pipeline is a single linear pass: load the CSV into typed records,
//! run the two reducers (average profit margin by region, discount impact by
//! category), then render a formatted report and a findings summary.

pub mod analysis;
pub mod error;
pub mod loader;
pub mod output;
pub mod report;
pub mod types;
pub mod util;
