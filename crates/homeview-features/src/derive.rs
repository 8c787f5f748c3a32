//! The feature deriver

use crate::buckets::{AgeClass, BathroomClass, Season, YesNo};
use crate::record::HouseRecord;
use chrono::Datelike;
use homeview_io::{DataColumn, DataTable};
use serde::{Deserialize, Serialize};

/// The six derived attributes of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedFeatures {
    pub age_house: AgeClass,
    pub basement: YesNo,
    pub year: i32,
    pub month: u32,
    pub is_renovated: YesNo,
    pub season: Season,
    pub complete_bathroom: BathroomClass,
}

/// A listing together with its derived attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AugmentedRecord {
    #[serde(flatten)]
    pub record: HouseRecord,
    #[serde(flatten)]
    pub features: DerivedFeatures,
}

/// Stateless transform from listings to augmented listings
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureDeriver;

impl FeatureDeriver {
    pub fn new() -> Self {
        Self
    }

    /// Compute the derived attributes of one record
    pub fn derive(&self, record: &HouseRecord) -> DerivedFeatures {
        let month = record.date.month();

        DerivedFeatures {
            age_house: AgeClass::from_build_year(record.yr_built),
            basement: YesNo::from_bool(record.sqft_basement > 0.0),
            year: record.date.year(),
            month,
            is_renovated: YesNo::from_bool(record.yr_renovated > 0),
            // chrono months are always 1..=12
            season: Season::from_month(month).unwrap_or(Season::Winter),
            complete_bathroom: BathroomClass::classify(record.bathrooms),
        }
    }

    /// Attach derived attributes to a record
    pub fn augment(&self, record: HouseRecord) -> AugmentedRecord {
        let features = self.derive(&record);
        AugmentedRecord { record, features }
    }

    /// Augment a whole dataset, preserving order
    pub fn augment_all(&self, records: Vec<HouseRecord>) -> Vec<AugmentedRecord> {
        let augmented: Vec<AugmentedRecord> =
            records.into_iter().map(|r| self.augment(r)).collect();

        let unknown = augmented
            .iter()
            .filter(|r| !r.features.complete_bathroom.is_known())
            .count();
        if unknown > 0 {
            tracing::warn!(
                unknown,
                "Bathroom counts outside both allow-lists classified as unknown"
            );
        }
        tracing::debug!(records = augmented.len(), "Derived features");

        augmented
    }

    /// Recompute the derived attributes of an already augmented record
    ///
    /// Derived attributes depend only on the stored inputs, so the result
    /// equals the input.
    pub fn reapply(&self, augmented: &AugmentedRecord) -> AugmentedRecord {
        self.augment(augmented.record.clone())
    }
}

/// Render augmented records as a table: input columns, then derived columns
pub fn augmented_table(records: &[AugmentedRecord]) -> DataTable {
    fn float(records: &[AugmentedRecord], f: impl Fn(&HouseRecord) -> f64) -> DataColumn {
        DataColumn::Float64(records.iter().map(|r| Some(f(&r.record))).collect())
    }
    fn int(records: &[AugmentedRecord], f: impl Fn(&AugmentedRecord) -> i64) -> DataColumn {
        DataColumn::Int64(records.iter().map(|r| Some(f(r))).collect())
    }
    fn text(records: &[AugmentedRecord], f: impl Fn(&DerivedFeatures) -> &'static str) -> DataColumn {
        DataColumn::String(
            records
                .iter()
                .map(|r| Some(f(&r.features).to_string()))
                .collect(),
        )
    }

    DataTable::new()
        .with_column(
            "id",
            DataColumn::Int64(records.iter().map(|r| r.record.id).collect()),
        )
        .with_column(
            "date",
            DataColumn::String(
                records
                    .iter()
                    .map(|r| Some(r.record.date.format("%Y-%m-%d").to_string()))
                    .collect(),
            ),
        )
        .with_column("price", float(records, |r| r.price))
        .with_column("bathrooms", float(records, |r| r.bathrooms))
        .with_column("floors", float(records, |r| r.floors))
        .with_column("waterfront", int(records, |r| i64::from(r.record.waterfront)))
        .with_column("sqft_lot", float(records, |r| r.sqft_lot))
        .with_column("sqft_basement", float(records, |r| r.sqft_basement))
        .with_column("yr_built", int(records, |r| i64::from(r.record.yr_built)))
        .with_column("yr_renovated", int(records, |r| i64::from(r.record.yr_renovated)))
        .with_column("zipcode", int(records, |r| r.record.zipcode))
        .with_column("condition", int(records, |r| r.record.condition))
        .with_column("lat", float(records, |r| r.lat))
        .with_column("long", float(records, |r| r.long))
        .with_column("age_house", text(records, |f| f.age_house.as_str()))
        .with_column("basement", text(records, |f| f.basement.as_str()))
        .with_column("year", int(records, |r| i64::from(r.features.year)))
        .with_column("month", int(records, |r| i64::from(r.features.month)))
        .with_column("is_renovated", text(records, |f| f.is_renovated.as_str()))
        .with_column("season", text(records, |f| f.season.as_str()))
        .with_column(
            "complete_bathroom",
            text(records, |f| f.complete_bathroom.as_str()),
        )
}
