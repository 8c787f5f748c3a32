//! Linear value axis for bar charts
//!
//! Provides "nice" tick spacing (1, 2, 5 times a power of ten) and compact
//! labels for prices and counts.

use serde::{Deserialize, Serialize};

/// A tick mark on an axis
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TickMark {
    /// Position in data coordinates
    pub value: f64,

    /// Position in normalized coordinates (0.0 to 1.0)
    pub normalized: f64,

    /// Label text
    pub label: String,
}

/// A linear axis spanning `[min, max]`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearAxis {
    pub min: f64,
    pub max: f64,
    pub ticks: Vec<TickMark>,
}

impl LinearAxis {
    /// Axis from zero up to a nice bound above `max_value`, with about `target` ticks
    pub fn from_zero(max_value: f64, target: usize) -> Self {
        let max_value = if max_value.is_finite() && max_value > 0.0 {
            max_value
        } else {
            1.0
        };
        let step = nice_step(max_value, target);
        let max = (max_value / step).ceil() * step;
        let ticks = calculate_ticks(0.0, max, step);
        Self { min: 0.0, max, ticks }
    }

    /// Position of `value` within the axis, 0.0 at `min` and 1.0 at `max`
    pub fn normalize(&self, value: f64) -> f64 {
        let range = self.max - self.min;
        if range <= 0.0 {
            return 0.0;
        }
        ((value - self.min) / range).clamp(0.0, 1.0)
    }
}

/// Nice tick spacing for a range split into roughly `target` steps
pub fn nice_step(range: f64, target: usize) -> f64 {
    let rough_step = range / target.max(1) as f64;
    let magnitude = 10.0_f64.powi(rough_step.abs().log10().floor() as i32);
    let residual = rough_step / magnitude;

    if residual <= 1.5 {
        1.0 * magnitude
    } else if residual <= 3.0 {
        2.0 * magnitude
    } else if residual <= 7.0 {
        5.0 * magnitude
    } else {
        10.0 * magnitude
    }
}

fn calculate_ticks(min: f64, max: f64, step: f64) -> Vec<TickMark> {
    let range = max - min;
    if range <= 0.0 || step <= 0.0 {
        return vec![];
    }

    let count = (range / step).round() as usize;
    (0..=count)
        .map(|i| {
            let value = min + step * i as f64;
            TickMark {
                value,
                normalized: ((value - min) / range).clamp(0.0, 1.0),
                label: format_number(value),
            }
        })
        .collect()
}

/// Format a number compactly: 1.5M, 250k, 42, 0.75
pub fn format_number(value: f64) -> String {
    let abs = value.abs();
    let trim = |s: String| {
        if s.contains('.') {
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        } else {
            s
        }
    };

    if value == 0.0 {
        "0".to_string()
    } else if abs >= 1e9 {
        format!("{}B", trim(format!("{:.2}", value / 1e9)))
    } else if abs >= 1e6 {
        format!("{}M", trim(format!("{:.2}", value / 1e6)))
    } else if abs >= 1e4 {
        format!("{}k", trim(format!("{:.1}", value / 1e3)))
    } else if value.fract().abs() < 1e-10 {
        format!("{:.0}", value)
    } else {
        trim(format!("{:.2}", value))
    }
}
