//! Zip code / condition selection shared by both recommendation reports

use crate::ast::FilterExpr;
use crate::parser::ParseError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Column holding the zip code
pub const ZIPCODE_FIELD: &str = "zipcode";

/// Column holding the condition rating
pub const CONDITION_FIELD: &str = "condition";

/// Sidebar selection: an empty set means "no constraint" on that column
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFilter {
    #[serde(default)]
    pub zipcodes: BTreeSet<i64>,
    #[serde(default)]
    pub conditions: BTreeSet<i64>,
}

impl ReportFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_zipcodes(mut self, zipcodes: impl IntoIterator<Item = i64>) -> Self {
        self.zipcodes.extend(zipcodes);
        self
    }

    pub fn with_conditions(mut self, conditions: impl IntoIterator<Item = i64>) -> Self {
        self.conditions.extend(conditions);
        self
    }

    /// Build from comma separated lists such as `"98001, 98002"` and `"3,4"`
    pub fn from_lists(zipcodes: &str, conditions: &str) -> Result<Self, ParseError> {
        Ok(Self {
            zipcodes: parse_int_list(zipcodes)?,
            conditions: parse_int_list(conditions)?,
        })
    }

    /// True when neither set constrains the rows
    pub fn is_empty(&self) -> bool {
        self.zipcodes.is_empty() && self.conditions.is_empty()
    }

    /// Lower to a filter expression
    ///
    /// Both sets: zip AND condition. One set: that column only. Neither: all rows.
    pub fn to_expr(&self) -> FilterExpr {
        let zip = FilterExpr::in_ints(ZIPCODE_FIELD, self.zipcodes.iter().copied());
        let condition = FilterExpr::in_ints(CONDITION_FIELD, self.conditions.iter().copied());

        match (self.zipcodes.is_empty(), self.conditions.is_empty()) {
            (false, false) => FilterExpr::and(zip, condition),
            (false, true) => zip,
            (true, false) => condition,
            (true, true) => FilterExpr::All,
        }
    }
}

/// Parse a comma separated list of integers; blanks are skipped
pub fn parse_int_list(input: &str) -> Result<BTreeSet<i64>, ParseError> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>()
                .map_err(|_| ParseError::Parse(format!("'{}' is not an integer", s)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_four_cases() {
        let both = ReportFilter::new().with_zipcodes([98001]).with_conditions([3]);
        assert!(matches!(both.to_expr(), FilterExpr::And(_, _)));

        let zips = ReportFilter::new().with_zipcodes([98001]);
        assert_eq!(zips.to_expr(), FilterExpr::in_ints("zipcode", [98001]));

        let conditions = ReportFilter::new().with_conditions([4, 3]);
        assert_eq!(conditions.to_expr(), FilterExpr::in_ints("condition", [3, 4]));

        assert_eq!(ReportFilter::new().to_expr(), FilterExpr::All);
        assert!(ReportFilter::new().is_empty());
    }

    #[test]
    fn test_from_lists() {
        let filter = ReportFilter::from_lists("98002, 98001,", " ").unwrap();
        assert_eq!(filter.zipcodes.into_iter().collect::<Vec<_>>(), vec![98001, 98002]);
        assert!(filter.conditions.is_empty());

        assert!(ReportFilter::from_lists("98001,abc", "").is_err());
    }
}
