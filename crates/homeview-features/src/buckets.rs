//! Categorical buckets produced by the feature deriver

use serde::{Deserialize, Serialize};
use std::fmt;

/// Build year before which a house counts as old
pub const OLD_HOUSE_CUTOFF_YEAR: i32 = 1955;

/// Bathroom counts with a full bath (shower, sink, toilet) in every room
pub const COMPLETE_BATHROOM_COUNTS: [f64; 8] = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 8.0];

/// Bathroom counts that include half or quarter baths
pub const PARTIAL_BATHROOM_COUNTS: [f64; 22] = [
    0.5, 0.75, 1.25, 1.5, 1.75, 2.25, 2.5, 2.75, 3.25, 3.5, 3.75, 4.25, 4.5, 4.75, 5.25, 5.5,
    5.75, 6.25, 6.5, 6.75, 7.5, 7.75,
];

/// House age class
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeClass {
    New,
    Old,
}

impl AgeClass {
    /// Classify a build year
    pub fn from_build_year(yr_built: i32) -> Self {
        if yr_built < OLD_HOUSE_CUTOFF_YEAR {
            AgeClass::Old
        } else {
            AgeClass::New
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgeClass::New => "new",
            AgeClass::Old => "old",
        }
    }
}

/// A yes/no flag column
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YesNo {
    No,
    Yes,
}

impl YesNo {
    /// `Yes` when the condition holds
    pub fn from_bool(value: bool) -> Self {
        if value {
            YesNo::Yes
        } else {
            YesNo::No
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            YesNo::No => "no",
            YesNo::Yes => "yes",
        }
    }
}

/// Season of the transaction month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    /// All seasons in calendar order
    pub const ALL: [Season; 4] = [Season::Winter, Season::Spring, Season::Summer, Season::Fall];

    /// Bucket a month (1-12) using the bins (0,2], (2,5], (5,8], (8,11], (11,12].
    ///
    /// December wraps around to winter. Returns `None` outside 1..=12.
    pub fn from_month(month: u32) -> Option<Self> {
        match month {
            1..=2 => Some(Season::Winter),
            3..=5 => Some(Season::Spring),
            6..=8 => Some(Season::Summer),
            9..=11 => Some(Season::Fall),
            12 => Some(Season::Winter),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Winter => "winter",
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Fall => "fall",
        }
    }
}

/// Whether a bathroom count describes complete bathrooms
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BathroomClass {
    /// Listed whole count, rendered "yes"
    #[serde(rename = "yes")]
    Complete,
    /// Listed fractional count, rendered "no"
    #[serde(rename = "no")]
    Partial,
    /// Count on neither list
    Unknown,
}

impl BathroomClass {
    /// Classify a bathroom count against the two allow-lists
    pub fn classify(bathrooms: f64) -> Self {
        let listed = |counts: &[f64]| counts.iter().any(|&c| (c - bathrooms).abs() < 1e-9);

        if listed(&COMPLETE_BATHROOM_COUNTS) {
            BathroomClass::Complete
        } else if listed(&PARTIAL_BATHROOM_COUNTS) {
            BathroomClass::Partial
        } else {
            BathroomClass::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BathroomClass::Complete => "yes",
            BathroomClass::Partial => "no",
            BathroomClass::Unknown => "unknown",
        }
    }

    /// True for counts on either allow-list
    pub fn is_known(&self) -> bool {
        !matches!(self, BathroomClass::Unknown)
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

display_as_str!(AgeClass, YesNo, Season, BathroomClass);
