//! The ten dashboard hypotheses
//!
//! Each hypothesis states a claimed percent effect, groups the augmented
//! listings into a bar chart, measures the observed percent effect from
//! that grouping, and judges the claim. Conclusions are built from the
//! measured numbers, so they follow the data.

use crate::axis::format_number;
use crate::chart::{Bar, BarChart};
use homeview_features::{AgeClass, AugmentedRecord, BathroomClass, Season, YesNo};
use homeview_stats::{mean_step_growth, percent_change, Aggregation, FloatKey, GroupedAggregate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of checking a claim against the data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Holds,
    Rejected,
    Inconclusive,
}

impl Verdict {
    /// Judge a claimed percent effect against an observed one
    ///
    /// The claim holds when the observation points the same way and its
    /// magnitude lies in `[|claim|, |claim| * (1 + tolerance)]`. The
    /// observation is judged as conclusions print it, to two decimals.
    pub fn judge(claim: f64, observed: Option<f64>, tolerance: f64) -> Self {
        let Some(observed) = observed.filter(|x| x.is_finite()) else {
            return Verdict::Inconclusive;
        };

        let observed = round_percent(observed);
        let same_direction = observed != 0.0 && observed.signum() == claim.signum();
        let magnitude = observed.abs();
        let claimed = claim.abs();

        if same_direction && magnitude >= claimed && magnitude <= claimed * (1.0 + tolerance) {
            Verdict::Holds
        } else {
            Verdict::Rejected
        }
    }

    /// Word used in conclusions
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Holds => "true",
            Verdict::Rejected => "false",
            Verdict::Inconclusive => "inconclusive",
        }
    }
}

/// Percent rounded to the two decimals shown in conclusions
fn round_percent(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A hypothesis checked against the data
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hypothesis {
    /// Stable identifier, `h1` to `h10`
    pub id: String,
    pub number: u8,
    /// Chart heading
    pub title: String,
    /// The claim in words
    pub statement: String,
    /// Claimed percent effect (negative for "cheaper", "smaller")
    pub claim_percent: f64,
    /// Measured percent effect, if it could be computed
    pub observed_percent: Option<f64>,
    pub verdict: Verdict,
    /// One sentence summarizing the verdict and the measurement
    pub conclusion: String,
    pub chart: BarChart,
}

/// What a single hypothesis measured
struct Evidence {
    chart: BarChart,
    observed: Option<f64>,
    finding: String,
}

struct Definition {
    title: &'static str,
    statement: &'static str,
    claim: f64,
    measure: fn(&[AugmentedRecord]) -> Evidence,
}

const DEFINITIONS: [Definition; 10] = [
    Definition {
        title: "Houses per waterview",
        statement: "Waterfront houses are 30% more expensive on average",
        claim: 30.0,
        measure: waterfront_premium,
    },
    Definition {
        title: "Houses per age",
        statement: "Houses built before 1955 are 50% cheaper on average",
        claim: -50.0,
        measure: old_house_discount,
    },
    Definition {
        title: "Houses with/without basement",
        statement: "Houses without basement have 40% larger lots on average",
        claim: 40.0,
        measure: basement_lot_size,
    },
    Definition {
        title: "Houses with price per year",
        statement: "Year-over-year price growth is 10%",
        claim: 10.0,
        measure: yearly_growth,
    },
    Definition {
        title: "Houses with price per month",
        statement: "Houses with 3 bathrooms grow 15% month-over-month on average",
        claim: 15.0,
        measure: three_bathroom_monthly_growth,
    },
    Definition {
        title: "Houses renovated",
        statement: "Renovated houses are 30% more expensive on average",
        claim: 30.0,
        measure: renovation_premium,
    },
    Definition {
        title: "Sales per season",
        statement: "Houses sell 30% more in summer on average",
        claim: 30.0,
        measure: summer_sales,
    },
    Definition {
        title: "Price per season",
        statement: "Houses are 20% more expensive in summer on average",
        claim: 20.0,
        measure: summer_prices,
    },
    Definition {
        title: "Houses per type of bathroom",
        statement: "Houses with complete bathrooms are 10% more expensive on average",
        claim: 10.0,
        measure: complete_bathroom_premium,
    },
    Definition {
        title: "Houses per floors",
        statement: "Each extra floor raises the mean price by 20%",
        claim: 20.0,
        measure: floor_growth,
    },
];

/// Evaluates every hypothesis over a dataset
#[derive(Debug, Clone, Copy)]
pub struct HypothesisEngine {
    tolerance: f64,
}

impl Default for HypothesisEngine {
    fn default() -> Self {
        Self { tolerance: 1.0 }
    }
}

impl HypothesisEngine {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// Evaluate all ten hypotheses, in order
    pub fn evaluate(&self, records: &[AugmentedRecord]) -> Vec<Hypothesis> {
        let hypotheses: Vec<Hypothesis> = DEFINITIONS
            .iter()
            .zip(1u8..)
            .map(|(def, number)| self.evaluate_one(def, number, records))
            .collect();

        let holding = hypotheses
            .iter()
            .filter(|h| h.verdict == Verdict::Holds)
            .count();
        tracing::info!(records = records.len(), holding, "Evaluated hypotheses");
        hypotheses
    }

    fn evaluate_one(&self, def: &Definition, number: u8, records: &[AugmentedRecord]) -> Hypothesis {
        let evidence = (def.measure)(records);
        let verdict = Verdict::judge(def.claim, evidence.observed, self.tolerance);

        Hypothesis {
            id: format!("h{}", number),
            number,
            title: def.title.to_string(),
            statement: def.statement.to_string(),
            claim_percent: def.claim,
            observed_percent: evidence.observed,
            verdict,
            conclusion: format!("Hypothesis {} is {}: {}.", number, verdict, evidence.finding),
            chart: evidence.chart,
        }
    }
}

/// Find a hypothesis by id (`h3`) or number (`3`)
pub fn find_hypothesis<'a>(hypotheses: &'a [Hypothesis], id: &str) -> Option<&'a Hypothesis> {
    let id = id.trim().to_lowercase();
    hypotheses
        .iter()
        .find(|h| h.id == id || h.number.to_string() == id)
}

// MARK: - Measurements

const NOT_ENOUGH_DATA: &str = "the data does not contain the groups needed to compare";

fn group_by<K: Ord + Clone>(
    records: &[AugmentedRecord],
    key: impl Fn(&AugmentedRecord) -> K,
    value: impl Fn(&AugmentedRecord) -> f64,
) -> GroupedAggregate<K> {
    GroupedAggregate::from_items(records, |r| key(*r), |r| value(*r))
}

fn bars<K: Ord + Clone>(
    grouped: &GroupedAggregate<K>,
    aggregation: Aggregation,
    label: impl Fn(&K) -> String,
) -> Vec<Bar> {
    grouped
        .series(aggregation)
        .into_iter()
        .map(|(k, v)| Bar::new(label(&k), v))
        .collect()
}

fn either(x: f64, positive: &'static str, negative: &'static str) -> &'static str {
    if x >= 0.0 {
        positive
    } else {
        negative
    }
}

/// Evidence for a two-group mean comparison
fn compare_means<K: Ord + Clone>(
    grouped: &GroupedAggregate<K>,
    chart: BarChart,
    base: K,
    subject: K,
    describe: impl Fn(f64) -> String,
) -> Evidence {
    let observed = match (grouped.mean(&base), grouped.mean(&subject)) {
        (Some(b), Some(s)) => percent_change(b, s),
        _ => None,
    };
    evidence(chart, observed, describe)
}

fn evidence(chart: BarChart, observed: Option<f64>, describe: impl Fn(f64) -> String) -> Evidence {
    Evidence {
        chart,
        observed,
        finding: observed.map(describe).unwrap_or_else(|| NOT_ENOUGH_DATA.to_string()),
    }
}

fn price(r: &AugmentedRecord) -> f64 {
    r.record.price
}

fn waterfront_premium(records: &[AugmentedRecord]) -> Evidence {
    let grouped = group_by(records, |r| YesNo::from_bool(r.record.waterfront), price);
    let chart = BarChart::new("Houses per waterview", "waterfront", "price")
        .with_bars(bars(&grouped, Aggregation::Mean, |k| k.as_str().to_string()));

    compare_means(&grouped, chart, YesNo::No, YesNo::Yes, |x| {
        format!(
            "waterfront houses are {:.2}% {} on average",
            x.abs(),
            either(x, "more expensive", "cheaper")
        )
    })
}

fn old_house_discount(records: &[AugmentedRecord]) -> Evidence {
    let grouped = group_by(records, |r| r.features.age_house, price);
    let chart = BarChart::new("Houses per age", "age_house", "price")
        .with_bars(bars(&grouped, Aggregation::Mean, |k| k.as_str().to_string()));

    compare_means(&grouped, chart, AgeClass::New, AgeClass::Old, |x| {
        format!(
            "houses built before 1955 are {:.2}% {} on average",
            x.abs(),
            either(x, "more expensive", "cheaper")
        )
    })
}

fn basement_lot_size(records: &[AugmentedRecord]) -> Evidence {
    let grouped = group_by(records, |r| r.features.basement, |r| r.record.sqft_lot);
    let chart = BarChart::new("Houses with/without basement", "basement", "sqft_lot")
        .with_bars(bars(&grouped, Aggregation::Mean, |k| k.as_str().to_string()));

    compare_means(&grouped, chart, YesNo::Yes, YesNo::No, |x| {
        format!(
            "houses without basement have {:.2}% {} lots on average",
            x.abs(),
            either(x, "larger", "smaller")
        )
    })
}

fn yearly_growth(records: &[AugmentedRecord]) -> Evidence {
    let grouped = group_by(records, |r| r.features.year, price);
    let series: Vec<f64> = grouped.series(Aggregation::Mean).into_iter().map(|(_, v)| v).collect();
    let chart = BarChart::new("Houses with price per year", "year", "price")
        .with_bars(bars(&grouped, Aggregation::Mean, |k| k.to_string()));

    evidence(chart, mean_step_growth(&series), |x| {
        format!(
            "prices {} {:.2}% year over year on average",
            either(x, "grow", "shrink"),
            x.abs()
        )
    })
}

fn three_bathroom_monthly_growth(records: &[AugmentedRecord]) -> Evidence {
    let three_bathrooms: Vec<AugmentedRecord> = records
        .iter()
        .filter(|r| (r.record.bathrooms - 3.0).abs() < 1e-9)
        .cloned()
        .collect();
    let grouped = group_by(&three_bathrooms, |r| r.features.month, price);
    let series: Vec<f64> = grouped.series(Aggregation::Mean).into_iter().map(|(_, v)| v).collect();
    let chart = BarChart::new("Houses with price per month", "month", "price")
        .with_bars(bars(&grouped, Aggregation::Mean, |k| k.to_string()));

    evidence(chart, mean_step_growth(&series), |x| {
        format!(
            "prices of houses with 3 bathrooms {} {:.2}% month over month on average",
            either(x, "grow", "shrink"),
            x.abs()
        )
    })
}

fn renovation_premium(records: &[AugmentedRecord]) -> Evidence {
    let grouped = group_by(records, |r| r.features.is_renovated, price);
    let chart = BarChart::new("Houses renovated", "is_renovated", "price")
        .with_bars(bars(&grouped, Aggregation::Mean, |k| k.as_str().to_string()));

    compare_means(&grouped, chart, YesNo::No, YesNo::Yes, |x| {
        format!(
            "renovated houses are {:.2}% {} on average",
            x.abs(),
            either(x, "more expensive", "cheaper")
        )
    })
}

/// Summer against the strongest other season under `aggregation`
fn summer_against_best_other(
    grouped: &GroupedAggregate<Season>,
    aggregation: Aggregation,
) -> Option<(Season, f64)> {
    let summer = grouped.get(&Season::Summer)?.value(aggregation)?;
    let (base_season, base) = grouped.max_by(aggregation, |s| *s != Season::Summer)?;
    percent_change(base, summer).map(|x| (base_season, x))
}

fn summer_sales(records: &[AugmentedRecord]) -> Evidence {
    let grouped = group_by(records, |r| r.features.season, price);
    let chart = BarChart::new("Sales per season", "season", "sales")
        .with_bars(bars(&grouped, Aggregation::Count, |k| k.as_str().to_string()));

    let comparison = summer_against_best_other(&grouped, Aggregation::Count);
    let observed = comparison.map(|(_, x)| x);
    let base = comparison.map(|(s, _)| s).unwrap_or(Season::Spring);
    evidence(chart, observed, |x| {
        format!(
            "houses sell {:.2}% {} in summer than in {} (the strongest other season)",
            x.abs(),
            either(x, "more", "less"),
            base
        )
    })
}

fn summer_prices(records: &[AugmentedRecord]) -> Evidence {
    let grouped = group_by(records, |r| r.features.season, price);
    let chart = BarChart::new("Price per season", "season", "price")
        .with_bars(bars(&grouped, Aggregation::Mean, |k| k.as_str().to_string()));

    let comparison = summer_against_best_other(&grouped, Aggregation::Mean);
    let observed = comparison.map(|(_, x)| x);
    let base = comparison.map(|(s, _)| s).unwrap_or(Season::Spring);
    evidence(chart, observed, |x| {
        format!(
            "houses are {:.2}% {} in summer than in {} (the most expensive other season)",
            x.abs(),
            either(x, "more expensive", "cheaper"),
            base
        )
    })
}

fn complete_bathroom_premium(records: &[AugmentedRecord]) -> Evidence {
    let known: Vec<AugmentedRecord> = records
        .iter()
        .filter(|r| r.features.complete_bathroom.is_known())
        .cloned()
        .collect();
    let grouped = group_by(&known, |r| r.features.complete_bathroom, price);
    let chart = BarChart::new("Houses per type of bathroom", "complete_bathroom", "price")
        .with_bars(bars(&grouped, Aggregation::Mean, |k| k.as_str().to_string()));

    compare_means(&grouped, chart, BathroomClass::Partial, BathroomClass::Complete, |x| {
        format!(
            "houses with complete bathrooms are {:.2}% {} than houses without",
            x.abs(),
            either(x, "more expensive", "cheaper")
        )
    })
}

fn floor_growth(records: &[AugmentedRecord]) -> Evidence {
    let grouped = group_by(records, |r| FloatKey(r.record.floors), price);
    let series: Vec<f64> = grouped.series(Aggregation::Mean).into_iter().map(|(_, v)| v).collect();
    let chart = BarChart::new("Houses per floors", "floors", "price")
        .with_bars(bars(&grouped, Aggregation::Mean, |k| format_number(k.0)));

    evidence(chart, mean_step_growth(&series), |x| {
        format!(
            "the mean price {} {:.2}% per extra floor level on average",
            either(x, "rises", "falls"),
            x.abs()
        )
    })
}
