//! CSV export of report and feature tables

use crate::error::{HomeviewError, HomeviewResult};
use homeview_io::DataTable;
use std::path::Path;

/// Export a table to CSV
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExporter {
    /// Whether to include header row
    pub include_header: bool,

    /// Column delimiter
    pub delimiter: u8,

    /// Columns to export, in order (empty = all)
    pub columns: Vec<String>,
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvExporter {
    pub fn new() -> Self {
        Self {
            include_header: true,
            delimiter: b',',
            columns: Vec::new(),
        }
    }

    /// Set columns to export
    pub fn with_columns<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn without_header(mut self) -> Self {
        self.include_header = false;
        self
    }

    /// Generate CSV content. Null cells are written empty.
    pub fn export(&self, table: &DataTable) -> HomeviewResult<String> {
        let names: Vec<String> = if self.columns.is_empty() {
            table.column_names().into_iter().map(String::from).collect()
        } else {
            self.columns.clone()
        };
        let columns = names
            .iter()
            .map(|name| {
                table.column(name).ok_or_else(|| {
                    HomeviewError::Export(format!("no column named '{}'", name))
                })
            })
            .collect::<HomeviewResult<Vec<_>>>()?;

        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(Vec::new());

        if self.include_header {
            writer.write_record(&names).map_err(export_error)?;
        }
        for row in 0..table.num_rows() {
            writer
                .write_record(columns.iter().map(|c| c.cell(row).to_string()))
                .map_err(export_error)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| HomeviewError::Export(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| HomeviewError::Export(e.to_string()))
    }

    /// Write CSV content to a file
    pub fn write_to(&self, table: &DataTable, path: &Path) -> HomeviewResult<()> {
        let content = self.export(table)?;
        std::fs::write(path, content)?;
        tracing::info!(path = %path.display(), rows = table.num_rows(), "Exported CSV");
        Ok(())
    }
}

fn export_error(err: csv::Error) -> HomeviewError {
    HomeviewError::Export(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use homeview_io::DataColumn;

    fn table() -> DataTable {
        DataTable::new()
            .with_column("zipcode", DataColumn::Int64(vec![Some(98001), None]))
            .with_column("price", DataColumn::Float64(vec![Some(1.5), Some(2.0)]))
            .with_column(
                "status",
                DataColumn::String(vec![Some("buy, soon".to_string()), Some("sell".to_string())]),
            )
    }

    #[test]
    fn test_export_all_columns() {
        let csv = CsvExporter::new().export(&table()).unwrap();
        assert_eq!(csv, "zipcode,price,status\n98001,1.5,\"buy, soon\"\n,2,sell\n");
    }

    #[test]
    fn test_export_selected_columns() {
        let csv = CsvExporter::new()
            .with_columns(["status", "zipcode"])
            .with_delimiter(b';')
            .without_header()
            .export(&table())
            .unwrap();
        assert_eq!(csv, "buy, soon;98001\nsell;\n");
    }

    #[test]
    fn test_export_unknown_column() {
        let err = CsvExporter::new()
            .with_columns(["lat"])
            .export(&table())
            .unwrap_err();
        assert!(matches!(err, HomeviewError::Export(_)));
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        CsvExporter::new().write_to(&table(), &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("zipcode,price,status\n"));
    }
}
