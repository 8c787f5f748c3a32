//! Table sources and loading errors
//!
//! Listings and both recommendation reports arrive as delimited text.
//! `DataReader` hides which delimiter and which origin a table came from.

use crate::csv_reader::{CsvOptions, CsvReader};
use crate::schema::{DataColumn, DataSchema, DataTable};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("No such input: {0}")]
    FileNotFound(String),

    #[error("Could not open input: {0}")]
    OpenFailed(String),

    #[error("Malformed input: {0}")]
    InvalidFormat(String),

    #[error("Input has no column '{0}'")]
    ColumnNotFound(String),

    #[error("Failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("I/O error: {0}")]
    Io(String),
}

pub type IoResult<T> = Result<T, IoError>;

/// A parsed table source
pub trait DataReader: Send + Sync {
    /// Column names, inferred types and row count
    fn read_schema(&self) -> IoResult<DataSchema>;

    fn read_column(&self, name: &str) -> IoResult<DataColumn>;

    fn read_table(&self) -> IoResult<DataTable>;

    /// Where the rows came from, for log lines
    fn source(&self) -> &str;
}

// MARK: - Formats

/// Delimited formats recognised by extension
const FORMATS: &[(&str, u8)] = &[("csv", b','), ("tsv", b'\t')];

/// Extensions `open_file` accepts
pub fn supported_extensions() -> Vec<&'static str> {
    FORMATS.iter().map(|(ext, _)| *ext).collect()
}

/// Pick a reader for `path` from its extension
pub fn open_file(path: &str) -> IoResult<Box<dyn DataReader>> {
    let extension = path
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    let delimiter = FORMATS
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, delimiter)| *delimiter)
        .ok_or_else(|| {
            IoError::InvalidFormat(format!("{path}: expected one of {:?}", supported_extensions()))
        })?;

    let options = CsvOptions::default().with_delimiter(delimiter);
    Ok(Box::new(CsvReader::open_with_options(path, options)?))
}

/// Open `path` and load all of it
pub fn read_table(path: &str) -> IoResult<DataTable> {
    let reader = open_file(path)?;
    let table = reader.read_table()?;
    tracing::info!(
        source = reader.source(),
        rows = table.num_rows(),
        columns = table.num_columns(),
        "Loaded table"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_extensions() {
        assert_eq!(supported_extensions(), vec!["csv", "tsv"]);
    }

    #[test]
    fn test_unknown_extension() {
        assert!(matches!(
            open_file("houses.parquet"),
            Err(IoError::InvalidFormat(_))
        ));
        assert!(matches!(open_file("houses"), Err(IoError::InvalidFormat(_))));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            open_file("/nonexistent/houses.csv"),
            Err(IoError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_tsv_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".TSV").tempfile().unwrap();
        write!(file, "zipcode\tcondition\n98001\t3\n").unwrap();

        let table = read_table(file.path().to_str().unwrap()).unwrap();
        assert_eq!(table.num_rows(), 1);
        assert_eq!(table.column_names(), vec!["zipcode", "condition"]);
    }
}
