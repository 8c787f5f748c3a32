//! homeview-stats - Statistical helpers for the dashboard
//!
//! This crate provides the small set of statistics the dashboard needs:
//!
//! - **Summary**: count, mean, median, spread of a numeric sample
//! - **Group**: grouped mean/count aggregates keyed by any ordered key
//! - **Growth**: percent change and mean step-to-step growth
//!
//! Non-finite values are treated as missing everywhere.

pub mod group;
pub mod growth;
pub mod summary;

pub use group::*;
pub use growth::*;
pub use summary::*;
