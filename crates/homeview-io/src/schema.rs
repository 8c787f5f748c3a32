//! Schema and column types for tabular data

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Schema describing the structure of a table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataSchema {
    /// Column descriptors, in file order
    pub columns: Vec<ColumnDescriptor>,

    /// Number of records
    pub num_records: usize,

    /// Additional metadata
    pub metadata: HashMap<String, String>,
}

impl DataSchema {
    /// Create a new schema
    pub fn new(columns: Vec<ColumnDescriptor>, num_records: usize) -> Self {
        Self {
            columns,
            num_records,
            metadata: HashMap::new(),
        }
    }

    /// Get a column by name
    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Get column index by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Get column names
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Number of columns
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }
}

/// Descriptor for a column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name
    pub name: String,

    /// Data type
    pub dtype: ColumnType,

    /// Description
    pub description: Option<String>,
}

impl ColumnDescriptor {
    /// Create a new column descriptor
    pub fn new(name: impl Into<String>, dtype: ColumnType) -> Self {
        Self {
            name: name.into(),
            dtype,
            description: None,
        }
    }

    /// Set the description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }
}

/// Column data type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Int64,
    Float64,
    Bool,
    String,
}

impl ColumnType {
    /// Check if this is a numeric type
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Float64 | ColumnType::Int64)
    }

    /// Get the type name used in error messages
    pub fn name(&self) -> &'static str {
        match self {
            ColumnType::Int64 => "integer",
            ColumnType::Float64 => "float",
            ColumnType::Bool => "boolean",
            ColumnType::String => "string",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A column of nullable values. Empty CSV cells are `None`.
#[derive(Debug, Clone, PartialEq)]
pub enum DataColumn {
    Int64(Vec<Option<i64>>),
    Float64(Vec<Option<f64>>),
    Bool(Vec<Option<bool>>),
    String(Vec<Option<String>>),
}

impl DataColumn {
    /// Get the column type
    pub fn dtype(&self) -> ColumnType {
        match self {
            DataColumn::Int64(_) => ColumnType::Int64,
            DataColumn::Float64(_) => ColumnType::Float64,
            DataColumn::Bool(_) => ColumnType::Bool,
            DataColumn::String(_) => ColumnType::String,
        }
    }

    /// Get the number of elements
    pub fn len(&self) -> usize {
        match self {
            DataColumn::Int64(v) => v.len(),
            DataColumn::Float64(v) => v.len(),
            DataColumn::Bool(v) => v.len(),
            DataColumn::String(v) => v.len(),
        }
    }

    /// Check if the column is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Numeric value at a row (None for nulls and non-numeric columns)
    pub fn f64_at(&self, row: usize) -> Option<f64> {
        match self {
            DataColumn::Int64(v) => v.get(row).copied().flatten().map(|x| x as f64),
            DataColumn::Float64(v) => v.get(row).copied().flatten(),
            DataColumn::Bool(v) => v
                .get(row)
                .copied()
                .flatten()
                .map(|b| if b { 1.0 } else { 0.0 }),
            DataColumn::String(_) => None,
        }
    }

    /// Integer value at a row; floats are accepted when they hold a whole number
    pub fn i64_at(&self, row: usize) -> Option<i64> {
        match self {
            DataColumn::Int64(v) => v.get(row).copied().flatten(),
            DataColumn::Float64(v) => v
                .get(row)
                .copied()
                .flatten()
                .filter(|x| x.fract() == 0.0)
                .map(|x| x as i64),
            DataColumn::Bool(v) => v.get(row).copied().flatten().map(i64::from),
            DataColumn::String(_) => None,
        }
    }

    /// Cell value at a row
    pub fn cell(&self, row: usize) -> CellValue {
        let cell = match self {
            DataColumn::Int64(v) => v.get(row).cloned().flatten().map(CellValue::Int),
            DataColumn::Float64(v) => v.get(row).cloned().flatten().map(CellValue::Float),
            DataColumn::Bool(v) => v.get(row).cloned().flatten().map(CellValue::Bool),
            DataColumn::String(v) => v.get(row).cloned().flatten().map(CellValue::Text),
        };
        cell.unwrap_or(CellValue::Null)
    }

    /// Convert to f64 (for numeric types), nulls become NaN
    pub fn to_f64(&self) -> Option<Vec<f64>> {
        match self {
            DataColumn::Int64(v) => Some(
                v.iter()
                    .map(|x| x.map(|x| x as f64).unwrap_or(f64::NAN))
                    .collect(),
            ),
            DataColumn::Float64(v) => Some(v.iter().map(|x| x.unwrap_or(f64::NAN)).collect()),
            _ => None,
        }
    }

    /// Build a new column holding the given rows, in the given order
    pub fn take(&self, indices: &[usize]) -> DataColumn {
        fn pick<T: Clone>(values: &[Option<T>], indices: &[usize]) -> Vec<Option<T>> {
            indices
                .iter()
                .map(|&i| values.get(i).cloned().flatten())
                .collect()
        }

        match self {
            DataColumn::Int64(v) => DataColumn::Int64(pick(v, indices)),
            DataColumn::Float64(v) => DataColumn::Float64(pick(v, indices)),
            DataColumn::Bool(v) => DataColumn::Bool(pick(v, indices)),
            DataColumn::String(v) => DataColumn::String(pick(v, indices)),
        }
    }
}

/// A single cell, used for display and export
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl CellValue {
    /// Check if the cell is null
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Int(v) => write!(f, "{}", v),
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Bool(v) => write!(f, "{}", v),
            CellValue::Text(v) => f.write_str(v),
        }
    }
}

/// An in-memory table: a schema plus one column per descriptor
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataTable {
    schema: DataSchema,
    columns: Vec<DataColumn>,
}

impl DataTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column. The first column fixes the row count.
    pub fn add_column(&mut self, name: impl Into<String>, data: DataColumn) {
        if self.columns.is_empty() {
            self.schema.num_records = data.len();
        }
        let name = name.into();
        let descriptor = ColumnDescriptor::new(name.clone(), data.dtype());

        match self.schema.column_index(&name) {
            Some(index) => {
                self.schema.columns[index] = descriptor;
                self.columns[index] = data;
            }
            None => {
                self.schema.columns.push(descriptor);
                self.columns.push(data);
            }
        }
    }

    /// Builder-style `add_column`
    pub fn with_column(mut self, name: impl Into<String>, data: DataColumn) -> Self {
        self.add_column(name, data);
        self
    }

    /// Get the schema
    pub fn schema(&self) -> &DataSchema {
        &self.schema
    }

    /// Get a column by name
    pub fn column(&self, name: &str) -> Option<&DataColumn> {
        self.schema
            .column_index(name)
            .and_then(|index| self.columns.get(index))
    }

    /// Iterate over (name, column) pairs in schema order
    pub fn iter_columns(&self) -> impl Iterator<Item = (&str, &DataColumn)> {
        self.schema
            .columns
            .iter()
            .map(|c| c.name.as_str())
            .zip(self.columns.iter())
    }

    /// Get column names
    pub fn column_names(&self) -> Vec<&str> {
        self.schema.column_names()
    }

    /// Number of rows
    pub fn num_rows(&self) -> usize {
        self.schema.num_records
    }

    /// Number of columns
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Check if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.num_rows() == 0
    }

    /// All cells of one row, in schema order
    pub fn row(&self, index: usize) -> Vec<CellValue> {
        self.columns.iter().map(|c| c.cell(index)).collect()
    }

    /// New table with the given rows, in the given order
    pub fn take(&self, indices: &[usize]) -> DataTable {
        let mut table = DataTable::new();
        for (name, column) in self.iter_columns() {
            table.add_column(name, column.take(indices));
        }
        table.schema.num_records = indices.len();
        table
    }

    /// New table without the named columns; unknown names are ignored
    pub fn without_columns(&self, names: &[&str]) -> DataTable {
        let mut table = DataTable::new();
        for (name, column) in self.iter_columns() {
            if !names.contains(&name) {
                table.add_column(name, column.clone());
            }
        }
        table.schema.num_records = self.num_rows();
        table
    }

    /// Distinct integer values of a column, sorted ascending
    pub fn distinct_i64(&self, name: &str) -> Option<Vec<i64>> {
        let column = self.column(name)?;
        let mut values: Vec<i64> = (0..column.len()).filter_map(|i| column.i64_at(i)).collect();
        values.sort_unstable();
        values.dedup();
        Some(values)
    }
}
