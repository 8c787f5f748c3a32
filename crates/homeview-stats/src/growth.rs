//! Percent change and growth rates

/// Percent change from `base` to `value`: `(value / base - 1) * 100`
///
/// None when `base` is zero or either side is not finite.
pub fn percent_change(base: f64, value: f64) -> Option<f64> {
    if !base.is_finite() || !value.is_finite() || base == 0.0 {
        return None;
    }
    Some((value / base - 1.0) * 100.0)
}

/// Mean of the percent changes between consecutive values
///
/// Steps that cannot be computed are skipped; None if no step remains.
pub fn mean_step_growth(values: &[f64]) -> Option<f64> {
    let steps: Vec<f64> = values
        .windows(2)
        .filter_map(|w| percent_change(w[0], w[1]))
        .collect();

    if steps.is_empty() {
        return None;
    }
    Some(steps.iter().sum::<f64>() / steps.len() as f64)
}
