//! homeview-filter - Row filters for report tables
//!
//! Filters are small boolean expressions evaluated row by row over a
//! [`FilterContext`] (any [`homeview_io::DataTable`] is one):
//!
//! # Expression Syntax
//!
//! - **Membership**: `zipcode in [98001, 98002]`
//! - **Comparisons**: `price >= 500000`, `season == "summer"`
//! - **Set operations**: `(A || B) && !C`
//! - **Constants**: `all`, `none`
//!
//! # Examples
//!
//! ```ignore
//! use homeview_filter::{parse_filter, filter_table};
//!
//! let expr = parse_filter("zipcode in [98001] && condition in [3, 4]")?;
//! let filtered = filter_table(&table, &expr)?;
//! ```
//!
//! The dashboard's zip/condition sidebar is a [`ReportFilter`], which
//! lowers to the same AST.

pub mod ast;
pub mod eval;
pub mod parser;
pub mod report_filter;

pub use ast::*;
pub use eval::*;
pub use parser::*;
pub use report_filter::*;
