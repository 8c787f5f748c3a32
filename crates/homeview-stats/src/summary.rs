//! Descriptive statistics over price and size columns

use serde::{Deserialize, Serialize};

/// Count, extremes and moments of the finite values in a sample.
///
/// NaN and infinite entries are tallied in `missing` and otherwise ignored,
/// so a column read with nulls as NaN can be passed as is. With no finite
/// values every float field is NaN.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryStats {
    pub count: usize,
    pub missing: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    pub median: f64,
}

impl SummaryStats {
    pub fn from_data(data: &[f64]) -> Self {
        let mut finite: Vec<f64> = Vec::with_capacity(data.len());
        let (mut lo, mut hi, mut sum) = (f64::INFINITY, f64::NEG_INFINITY, 0.0);
        for &x in data.iter().filter(|x| x.is_finite()) {
            lo = lo.min(x);
            hi = hi.max(x);
            sum += x;
            finite.push(x);
        }

        let count = finite.len();
        let missing = data.len() - count;
        if count == 0 {
            return Self {
                count,
                missing,
                min: f64::NAN,
                max: f64::NAN,
                mean: f64::NAN,
                std_dev: f64::NAN,
                median: f64::NAN,
            };
        }

        let n = count as f64;
        let mean = sum / n;
        let std_dev = (finite.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / n).sqrt();

        Self {
            count,
            missing,
            min: lo,
            max: hi,
            mean,
            std_dev,
            median: median_of(&mut finite),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Where `x` falls between `min` and `max`, in [0, 1]. A sample with a
    /// single distinct value puts everything at 0.5.
    pub fn normalize(&self, x: f64) -> f64 {
        let span = self.range();
        if span.is_finite() && span > 0.0 {
            ((x - self.min) / span).clamp(0.0, 1.0)
        } else {
            0.5
        }
    }
}

/// Median of a non-empty slice; reorders it
fn median_of(values: &mut [f64]) -> f64 {
    let len = values.len();
    let (lower, upper, _) = values.select_nth_unstable_by(len / 2, f64::total_cmp);
    if len % 2 == 1 {
        *upper
    } else {
        let below = lower.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        (below + *upper) / 2.0
    }
}

/// Mean of the finite values, None if there are none
pub fn mean(data: &[f64]) -> Option<f64> {
    let stats = SummaryStats::from_data(data);
    (!stats.is_empty()).then_some(stats.mean)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_prices() {
        let prices = [221_900.0, 538_000.0, 180_000.0, 604_000.0, 510_000.0];
        let stats = SummaryStats::from_data(&prices);

        assert_eq!(stats.count, 5);
        assert_eq!(stats.missing, 0);
        assert_eq!(stats.min, 180_000.0);
        assert_eq!(stats.max, 604_000.0);
        assert_eq!(stats.median, 510_000.0);
        assert!((stats.mean - 410_780.0).abs() < 1e-6);
    }

    #[rstest]
    #[case(&[4.0, 1.0, 3.0, 2.0], 2.5)]
    #[case(&[9.0, 1.0], 5.0)]
    #[case(&[7.0], 7.0)]
    #[case(&[2.0, f64::NAN, 8.0, 5.0], 5.0)]
    fn test_median(#[case] data: &[f64], #[case] expected: f64) {
        assert_eq!(SummaryStats::from_data(data).median, expected);
    }

    #[test]
    fn test_std_dev() {
        let stats = SummaryStats::from_data(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!((stats.std_dev - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_non_finite_are_missing() {
        let stats = SummaryStats::from_data(&[f64::NAN, f64::INFINITY]);
        assert!(stats.is_empty());
        assert_eq!(stats.missing, 2);
        assert!(stats.mean.is_nan());
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[1.0, f64::NAN, 3.0]), Some(2.0));
    }

    #[test]
    fn test_normalize() {
        let stats = SummaryStats::from_data(&[100.0, 200.0, 300.0]);
        assert_eq!(stats.normalize(100.0), 0.0);
        assert_eq!(stats.normalize(200.0), 0.5);
        assert_eq!(stats.normalize(500.0), 1.0);

        let flat = SummaryStats::from_data(&[7.0, 7.0]);
        assert_eq!(flat.normalize(7.0), 0.5);
    }
}
