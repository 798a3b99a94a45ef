use std::collections::BTreeSet;

use ordered_float::OrderedFloat;

use crate::utils::{axis_decimal_places, format_axis_label};

/// Mantissas of the round numbers labelled in each decade
const NICE_MULTIPLES: [f64; 3] = [1.0, 2.0, 5.0];

#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    pub value: f64,
    pub decimals: usize,
    pub label: String,
}

/// Round-number labels ({1, 2, 5} × 10^k) inside `[x_min, x_max]`, ascending.
///
/// Empty for an empty, inverted or non-positive range.
pub fn axis_ticks(x_min: f64, x_max: f64) -> Vec<AxisTick> {
    if !(x_min > 0.0) || !x_max.is_finite() || x_min >= x_max {
        return Vec::new();
    }

    let first_decade = x_min.log10().floor() as i32;
    let last_decade = x_max.log10().ceil() as i32;

    let mut values = BTreeSet::new();
    for decade in first_decade..=last_decade {
        let base = 10f64.powi(decade);
        for multiple in NICE_MULTIPLES {
            let value = multiple * base;
            if value >= x_min && value <= x_max {
                values.insert(OrderedFloat(value));
            }
        }
    }

    values
        .into_iter()
        .map(|OrderedFloat(value)| AxisTick {
            value,
            decimals: axis_decimal_places(value),
            label: format_axis_label(value),
        })
        .collect()
}
