//! homeview-features - Feature derivation for house listings
//!
//! Turns raw listing rows into typed [`HouseRecord`]s and appends six
//! derived categorical columns:
//!
//! - **age_house**: `old` for houses built before 1955, else `new`
//! - **basement**: `yes` when the basement area is positive
//! - **year** / **month**: calendar parts of the transaction date
//! - **is_renovated**: `yes` when a renovation year is recorded
//! - **season**: meteorological season of the transaction month
//! - **complete_bathroom**: `yes` for whole bathroom counts, `no` for
//!   counts with half/quarter baths, `unknown` otherwise
//!
//! # Design
//!
//! Derivation is a per-record pure function: [`FeatureDeriver::augment`]
//! consumes a record and returns a new [`AugmentedRecord`]. Nothing is
//! mutated in place, so reapplying the deriver is idempotent and record
//! order never matters.

pub mod buckets;
pub mod derive;
pub mod error;
pub mod record;

pub use buckets::*;
pub use derive::*;
pub use error::*;
pub use record::*;
