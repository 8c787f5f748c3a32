//! Typed house records built from a raw listing table

use crate::error::{DataValidationError, ValidationResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use homeview_io::{ColumnType, DataColumn, DataTable};
use serde::{Deserialize, Serialize};

/// Columns every listing table must provide
pub const REQUIRED_COLUMNS: [&str; 13] = [
    "date",
    "price",
    "bathrooms",
    "floors",
    "waterfront",
    "sqft_lot",
    "sqft_basement",
    "yr_built",
    "yr_renovated",
    "zipcode",
    "condition",
    "lat",
    "long",
];

const NUMERIC: [ColumnType; 2] = [ColumnType::Int64, ColumnType::Float64];

/// One property listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseRecord {
    /// Listing id, when the source carries one
    pub id: Option<i64>,
    /// Transaction date
    pub date: NaiveDate,
    pub price: f64,
    /// Bathroom count; fractions denote half or quarter baths
    pub bathrooms: f64,
    pub floors: f64,
    pub waterfront: bool,
    pub sqft_lot: f64,
    pub sqft_basement: f64,
    pub yr_built: i32,
    /// Renovation year, 0 if never renovated
    pub yr_renovated: i32,
    pub zipcode: i64,
    pub condition: i64,
    pub lat: f64,
    pub long: f64,
}

impl HouseRecord {
    /// Build records from every row of a listing table
    ///
    /// Fails on the first missing column, incompatible column type,
    /// empty required cell, or unparsable date.
    pub fn from_table(table: &DataTable) -> ValidationResult<Vec<HouseRecord>> {
        let columns = Columns::resolve(table)?;
        let records = (0..table.num_rows())
            .map(|row| columns.record(row))
            .collect::<ValidationResult<Vec<_>>>()?;

        tracing::debug!(records = records.len(), "Built house records");
        Ok(records)
    }
}

/// Required columns, resolved and type-checked once per table
struct Columns<'a> {
    id: Option<&'a DataColumn>,
    date: &'a DataColumn,
    price: &'a DataColumn,
    bathrooms: &'a DataColumn,
    floors: &'a DataColumn,
    waterfront: &'a DataColumn,
    sqft_lot: &'a DataColumn,
    sqft_basement: &'a DataColumn,
    yr_built: &'a DataColumn,
    yr_renovated: &'a DataColumn,
    zipcode: &'a DataColumn,
    condition: &'a DataColumn,
    lat: &'a DataColumn,
    long: &'a DataColumn,
}

impl<'a> Columns<'a> {
    fn resolve(table: &'a DataTable) -> ValidationResult<Self> {
        let numeric = |name: &str| require(table, name, &NUMERIC);

        Ok(Self {
            id: table.column("id").filter(|c| c.dtype() == ColumnType::Int64),
            date: require(table, "date", &[ColumnType::String, ColumnType::Int64])?,
            price: numeric("price")?,
            bathrooms: numeric("bathrooms")?,
            floors: numeric("floors")?,
            waterfront: require(
                table,
                "waterfront",
                &[ColumnType::Int64, ColumnType::Float64, ColumnType::Bool],
            )?,
            sqft_lot: numeric("sqft_lot")?,
            sqft_basement: numeric("sqft_basement")?,
            yr_built: numeric("yr_built")?,
            yr_renovated: numeric("yr_renovated")?,
            zipcode: numeric("zipcode")?,
            condition: numeric("condition")?,
            lat: numeric("lat")?,
            long: numeric("long")?,
        })
    }

    fn record(&self, row: usize) -> ValidationResult<HouseRecord> {
        Ok(HouseRecord {
            id: self.id.and_then(|c| c.i64_at(row)),
            date: date_at(self.date, row)?,
            price: f64_at(self.price, "price", row)?,
            bathrooms: f64_at(self.bathrooms, "bathrooms", row)?,
            floors: f64_at(self.floors, "floors", row)?,
            waterfront: f64_at(self.waterfront, "waterfront", row)? != 0.0,
            sqft_lot: f64_at(self.sqft_lot, "sqft_lot", row)?,
            sqft_basement: f64_at(self.sqft_basement, "sqft_basement", row)?,
            yr_built: year_at(self.yr_built, "yr_built", row)?,
            yr_renovated: year_at(self.yr_renovated, "yr_renovated", row)?,
            zipcode: i64_at(self.zipcode, "zipcode", row)?,
            condition: i64_at(self.condition, "condition", row)?,
            lat: f64_at(self.lat, "lat", row)?,
            long: f64_at(self.long, "long", row)?,
        })
    }
}

fn require<'a>(
    table: &'a DataTable,
    name: &str,
    accepted: &[ColumnType],
) -> ValidationResult<&'a DataColumn> {
    let column = table
        .column(name)
        .ok_or_else(|| DataValidationError::MissingColumn {
            field: name.to_string(),
        })?;

    if !accepted.contains(&column.dtype()) {
        return Err(DataValidationError::WrongType {
            field: name.to_string(),
            expected: accepted
                .iter()
                .map(|t| t.name())
                .collect::<Vec<_>>()
                .join(" or "),
            actual: column.dtype().name().to_string(),
        });
    }
    Ok(column)
}

fn missing(field: &str, row: usize) -> DataValidationError {
    DataValidationError::MissingValue {
        field: field.to_string(),
        row,
    }
}

fn f64_at(column: &DataColumn, field: &str, row: usize) -> ValidationResult<f64> {
    column
        .f64_at(row)
        .filter(|v| v.is_finite())
        .ok_or_else(|| missing(field, row))
}

fn i64_at(column: &DataColumn, field: &str, row: usize) -> ValidationResult<i64> {
    match column.i64_at(row) {
        Some(value) => Ok(value),
        None => match column.f64_at(row) {
            Some(value) => Err(DataValidationError::InvalidValue {
                field: field.to_string(),
                row,
                value: value.to_string(),
                reason: "expected a whole number".to_string(),
            }),
            None => Err(missing(field, row)),
        },
    }
}

fn year_at(column: &DataColumn, field: &str, row: usize) -> ValidationResult<i32> {
    let value = i64_at(column, field, row)?;
    i32::try_from(value).map_err(|_| DataValidationError::InvalidValue {
        field: field.to_string(),
        row,
        value: value.to_string(),
        reason: "year out of range".to_string(),
    })
}

fn date_at(column: &DataColumn, row: usize) -> ValidationResult<NaiveDate> {
    let text = match column {
        DataColumn::String(values) => values.get(row).cloned().flatten(),
        DataColumn::Int64(values) => values.get(row).copied().flatten().map(|v| v.to_string()),
        _ => None,
    }
    .ok_or_else(|| missing("date", row))?;

    parse_date(&text).ok_or_else(|| DataValidationError::InvalidValue {
        field: "date".to_string(),
        row,
        value: text.clone(),
        reason: "unrecognized date format".to_string(),
    })
}

/// Parse a transaction date
///
/// Accepts `20141013T000000`, `20141013`, `2014-10-13`,
/// `2014-10-13T00:00:00`, and RFC 3339 timestamps.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();

    const DATETIME_FORMATS: [&str; 3] = ["%Y%m%dT%H%M%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];
    const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y%m%d"];

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        })
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use homeview_io::CsvReader;
    use homeview_io::DataReader;

    const HEADER: &str = "id,date,price,bedrooms,bathrooms,sqft_living,sqft_lot,floors,waterfront,view,condition,grade,sqft_above,sqft_basement,yr_built,yr_renovated,zipcode,lat,long";

    fn table(rows: &[&str]) -> DataTable {
        let text = format!("{}\n{}\n", HEADER, rows.join("\n"));
        CsvReader::from_text(&text).unwrap().read_table().unwrap()
    }

    #[test]
    fn test_from_table() {
        let table = table(&[
            "7129300520,20141013T000000,221900,3,1,1180,5650,1,0,0,3,7,1180,0,1955,0,98178,47.5112,-122.257",
            "6414100192,20141209T000000,538000,3,2.25,2570,7242,2,0,0,3,7,2170,400,1951,1991,98125,47.721,-122.319",
        ]);

        let records = HouseRecord::from_table(&table).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, Some(7129300520));
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2014, 10, 13).unwrap());
        assert_eq!(records[1].bathrooms, 2.25);
        assert_eq!(records[1].yr_renovated, 1991);
        assert!(!records[1].waterfront);
    }

    #[test]
    fn test_missing_column() {
        let text = "date,bathrooms\n20141013T000000,1\n";
        let table = CsvReader::from_text(text).unwrap().read_table().unwrap();
        let err = HouseRecord::from_table(&table).unwrap_err();
        assert_eq!(
            err,
            DataValidationError::MissingColumn {
                field: "price".to_string()
            }
        );
    }

    #[test]
    fn test_wrong_type() {
        let table = table(&[
            "1,20141013T000000,cheap,3,1,1180,5650,1,0,0,3,7,1180,0,1955,0,98178,47.5,-122.2",
        ]);
        let err = HouseRecord::from_table(&table).unwrap_err();
        assert!(matches!(err, DataValidationError::WrongType { ref field, .. } if field == "price"));
    }

    #[test]
    fn test_missing_value() {
        let table = table(&[
            "1,20141013T000000,221900,3,1,1180,5650,1,0,0,3,7,1180,0,1955,0,98178,47.5,-122.2",
            "2,20141013T000000,221900,3,1,1180,5650,1,0,0,3,7,1180,0,,0,98178,47.5,-122.2",
        ]);
        let err = HouseRecord::from_table(&table).unwrap_err();
        assert_eq!(
            err,
            DataValidationError::MissingValue {
                field: "yr_built".to_string(),
                row: 1
            }
        );
    }

    #[test]
    fn test_invalid_date() {
        let table = table(&[
            "1,13/10/2014,221900,3,1,1180,5650,1,0,0,3,7,1180,0,1955,0,98178,47.5,-122.2",
        ]);
        let err = HouseRecord::from_table(&table).unwrap_err();
        assert_eq!(err.field(), "date");
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2015, 2, 25).unwrap();
        assert_eq!(parse_date("20150225T000000"), Some(expected));
        assert_eq!(parse_date("2015-02-25"), Some(expected));
        assert_eq!(parse_date("20150225"), Some(expected));
        assert_eq!(parse_date("2015-02-25T10:30:00"), Some(expected));
        assert_eq!(parse_date("2015-02-25T10:30:00Z"), Some(expected));
        assert_eq!(parse_date("yesterday"), None);
    }
}
