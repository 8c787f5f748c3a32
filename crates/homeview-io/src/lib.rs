//! homeview-io - Data I/O for the real-estate dashboard
//!
//! This crate provides readers for the dashboard's inputs:
//!
//! - **CSV**: Comma-separated tables with per-column type inference
//! - **GeoJSON**: Zip code boundaries for the price choropleth, from a file or URL
//!
//! # Design
//!
//! Tabular readers implement the `DataReader` trait for uniform access.
//! Datasets are small and static, so a reader parses its input once and
//! serves columns and tables from memory.

pub mod csv_reader;
pub mod geojson;
pub mod reader;
pub mod schema;

pub use csv_reader::*;
pub use geojson::*;
pub use reader::*;
pub use schema::*;
