//! CSV file reader with type inference

use crate::reader::{DataReader, IoError, IoResult};
use crate::schema::{ColumnDescriptor, ColumnType, DataColumn, DataSchema, DataTable};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Options controlling how a CSV input is parsed
#[derive(Debug, Clone, Copy)]
pub struct CsvOptions {
    /// Field delimiter
    pub delimiter: u8,
    /// Whether the first record is a header
    pub has_header: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_header: true,
        }
    }
}

impl CsvOptions {
    /// Set the delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set whether a header row is present
    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }
}

/// CSV reader. The whole input is parsed on open and kept in memory.
pub struct CsvReader {
    source: String,
    schema: DataSchema,
    /// Raw cell text, one vector per column
    cells: Vec<Vec<String>>,
}

impl CsvReader {
    /// Open a CSV file
    pub fn open(path: &str) -> IoResult<Self> {
        Self::open_with_options(path, CsvOptions::default())
    }

    /// Open a CSV file with options
    pub fn open_with_options(path: &str, options: CsvOptions) -> IoResult<Self> {
        if !Path::new(path).exists() {
            return Err(IoError::FileNotFound(path.to_string()));
        }

        let file = File::open(path).map_err(|e| IoError::OpenFailed(e.to_string()))?;
        let mut reader = Self::from_reader(BufReader::new(file), options)?;
        reader.source = path.to_string();
        Ok(reader)
    }

    /// Parse CSV text held in memory
    pub fn from_text(text: &str) -> IoResult<Self> {
        Self::from_reader(text.as_bytes(), CsvOptions::default())
    }

    /// Parse CSV from any reader
    pub fn from_reader<R: Read>(input: R, options: CsvOptions) -> IoResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .has_headers(options.has_header)
            .from_reader(input);

        let mut headers: Vec<String> = if options.has_header {
            reader
                .headers()
                .map_err(|e| IoError::InvalidFormat(e.to_string()))?
                .iter()
                .map(|s| s.trim().to_string())
                .collect()
        } else {
            Vec::new()
        };

        let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
        let mut num_records = 0;

        for result in reader.records() {
            let record = result.map_err(|e| IoError::InvalidFormat(e.to_string()))?;

            // Generate column names on the first record when there is no header
            if !options.has_header && headers.is_empty() {
                headers = (0..record.len()).map(|i| format!("col_{}", i)).collect();
                cells = vec![Vec::new(); headers.len()];
            }

            for (i, column) in cells.iter_mut().enumerate() {
                column.push(record.get(i).unwrap_or("").trim().to_string());
            }
            num_records += 1;
        }

        let columns: Vec<ColumnDescriptor> = headers
            .into_iter()
            .zip(cells.iter())
            .map(|(name, values)| ColumnDescriptor::new(name, infer_type(values)))
            .collect();

        let mut schema = DataSchema::new(columns, num_records);
        schema
            .metadata
            .insert("delimiter".to_string(), (options.delimiter as char).to_string());

        Ok(Self {
            source: "<memory>".to_string(),
            schema,
            cells,
        })
    }
}

impl DataReader for CsvReader {
    fn read_schema(&self) -> IoResult<DataSchema> {
        Ok(self.schema.clone())
    }

    fn read_column(&self, name: &str) -> IoResult<DataColumn> {
        let col_index = self
            .schema
            .column_index(name)
            .ok_or_else(|| IoError::ColumnNotFound(name.to_string()))?;

        let col_desc = &self.schema.columns[col_index];
        Ok(parse_column(&self.cells[col_index], col_desc.dtype))
    }

    fn read_table(&self) -> IoResult<DataTable> {
        let mut table = DataTable::new();
        for (col_desc, values) in self.schema.columns.iter().zip(self.cells.iter()) {
            table.add_column(&col_desc.name, parse_column(values, col_desc.dtype));
        }
        Ok(table)
    }

    fn source(&self) -> &str {
        &self.source
    }
}

/// Infer column type from every value; empty cells are ignored
fn infer_type(values: &[String]) -> ColumnType {
    let non_empty: Vec<&str> = values
        .iter()
        .map(|s| s.as_str())
        .filter(|s| !s.is_empty())
        .collect();
    if non_empty.is_empty() {
        return ColumnType::String;
    }

    // Try parsing as integers
    if non_empty.iter().all(|s| s.parse::<i64>().is_ok()) {
        return ColumnType::Int64;
    }

    // Try parsing as floats
    if non_empty.iter().all(|s| s.parse::<f64>().is_ok()) {
        return ColumnType::Float64;
    }

    // Try parsing as booleans
    if non_empty.iter().all(|s| parse_bool(s).is_some()) {
        return ColumnType::Bool;
    }

    ColumnType::String
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "yes" => Some(true),
        "false" | "no" => Some(false),
        _ => None,
    }
}

/// Parse column values into a DataColumn
fn parse_column(values: &[String], dtype: ColumnType) -> DataColumn {
    let non_empty = |s: &String| if s.is_empty() { None } else { Some(s.clone()) };

    match dtype {
        ColumnType::Int64 => {
            DataColumn::Int64(values.iter().map(|s| s.parse().ok()).collect())
        }
        ColumnType::Float64 => {
            DataColumn::Float64(values.iter().map(|s| s.parse().ok()).collect())
        }
        ColumnType::Bool => DataColumn::Bool(values.iter().map(|s| parse_bool(s)).collect()),
        ColumnType::String => DataColumn::String(values.iter().map(non_empty).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_infer_type_int() {
        assert_eq!(infer_type(&strings(&["1", "2", "3"])), ColumnType::Int64);
    }

    #[test]
    fn test_infer_type_float() {
        assert_eq!(infer_type(&strings(&["1", "2.25", ""])), ColumnType::Float64);
    }

    #[test]
    fn test_infer_type_bool() {
        assert_eq!(infer_type(&strings(&["true", "false", "yes"])), ColumnType::Bool);
    }

    #[test]
    fn test_infer_type_string() {
        assert_eq!(
            infer_type(&strings(&["20141013T000000", "20150225T000000"])),
            ColumnType::String
        );
    }

    #[test]
    fn test_read_table_from_text() {
        let reader = CsvReader::from_text(
            "id,date,price,bathrooms\n1,20141013T000000,221900,1\n2,20141209T000000,538000,2.25\n3,20150225T000000,,3\n",
        )
        .unwrap();

        let schema = reader.read_schema().unwrap();
        assert_eq!(schema.num_records, 3);
        assert_eq!(schema.metadata.get("delimiter").map(String::as_str), Some(","));
        assert_eq!(schema.column("id").unwrap().dtype, ColumnType::Int64);
        assert_eq!(schema.column("date").unwrap().dtype, ColumnType::String);
        assert_eq!(schema.column("bathrooms").unwrap().dtype, ColumnType::Float64);

        let table = reader.read_table().unwrap();
        let price = table.column("price").unwrap();
        assert_eq!(price.f64_at(0), Some(221900.0));
        assert_eq!(price.f64_at(2), None);
    }

    #[test]
    fn test_read_column_not_found() {
        let reader = CsvReader::from_text("a,b\n1,2\n").unwrap();
        assert!(matches!(
            reader.read_column("c"),
            Err(IoError::ColumnNotFound(_))
        ));
    }

    #[test]
    fn test_open_file_on_disk() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "zipcode,condition").unwrap();
        writeln!(file, "98001,3").unwrap();
        writeln!(file, "98002,4").unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let reader = CsvReader::open(&path).unwrap();
        assert_eq!(reader.source(), path);
        assert_eq!(reader.read_table().unwrap().num_rows(), 2);
    }
}
