//! homeview-core - Dashboard engine for real-estate sales data
//!
//! This crate turns the loaded inputs into everything the dashboard shows.
//!
//! # Key Components
//!
//! - **Hypotheses**: ten fixed claims about prices, each backed by a grouped
//!   aggregate, a bar chart, and a conclusion computed from the data
//! - **Reports**: buy and sell recommendation tables, filterable by zip code
//!   and condition
//! - **Maps**: a clustered density map and a mean-price choropleth of the
//!   filtered buy report
//! - **Page**: a single HTML document assembling all of the above
//!
//! # Pipeline
//!
//! Loading is done once ([`DashboardData::load`]); every request then builds
//! a [`DashboardView`] for its filter from the immutable loaded data.

pub mod axis;
pub mod chart;
pub mod colormap;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod hypothesis;
pub mod map;
pub mod page;
pub mod report;

pub use axis::*;
pub use chart::*;
pub use colormap::*;
pub use config::*;
pub use dashboard::*;
pub use error::*;
pub use export::*;
pub use hypothesis::*;
pub use map::*;
pub use page::*;
pub use report::*;
