use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::GraphExtent;
use crate::utils::{from_f64, to_f64};

/// Default on-screen width of one histogram bucket in pixels
pub const BUCKET_WIDTH_PX: f64 = 50.0;

/// Price interval of one histogram bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketBounds {
    #[serde(with = "rust_decimal::serde::str")]
    pub lower: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub upper: Decimal,
}

impl BucketBounds {
    pub fn new(lower: Decimal, upper: Decimal) -> Self {
        Self { lower, upper }
    }
}

/// Two independent partitions meeting at the pivot price
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BucketLayout {
    /// Ascending, last bucket ends at the pivot
    pub low: Vec<BucketBounds>,
    /// Ascending, first bucket starts at the pivot
    pub high: Vec<BucketBounds>,
    pub ratio: f64,
}

impl BucketLayout {
    pub fn is_empty(&self) -> bool {
        self.low.is_empty() && self.high.is_empty()
    }
}

/// Buckets that fit the container, plus one for the bucket split at the current price
pub fn bucket_count(container_width: f64, bucket_width_px: f64) -> usize {
    if container_width <= 0.0 || bucket_width_px <= 0.0 || !container_width.is_finite() {
        return 1;
    }
    (container_width / bucket_width_px).ceil() as usize + 1
}

/// Common ratio `r` with `r^count = xMax / xMin`, the extent rounded to one significant digit.
///
/// Falls back to 1 when there are no buckets or the extent has no usable width.
pub fn bucket_ratio(extent: &GraphExtent, count: usize) -> f64 {
    if count == 0 {
        return 1.0;
    }

    let (x_min, x_max) = extent.rounded(1);
    let width = to_f64(x_max) / to_f64(x_min);
    let ratio = (width.ln() / count as f64).exp();

    if ratio.is_finite() && ratio > 0.0 {
        ratio
    } else {
        1.0
    }
}

/// Boundaries this close to a stop bound, relative to it, are taken to be on it
const STOP_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Walk {
    Down,
    Up,
}

/// Partition prices geometrically outward from `pivot`.
///
/// The low side divides down by `ratio` until a boundary reaches `stop.0`, the high side
/// multiplies up until a boundary reaches `stop.1`; each side runs at most `count` steps.
/// Boundary `k` is `pivot · ratio^±k` computed from the pivot, so float error does not
/// accumulate, and a boundary within `STOP_TOLERANCE` of its stop lands exactly on it.
/// A pivot outside the stop bounds yields no buckets on that side. A ratio of one cannot
/// make progress, so each side becomes a single bucket from the pivot to its stop bound.
pub fn generate_buckets(pivot: Decimal, ratio: f64, count: usize, stop: (Decimal, Decimal)) -> BucketLayout {
    let (lower_stop, upper_stop) = stop;
    let mut layout = BucketLayout {
        ratio,
        ..Default::default()
    };

    if pivot <= Decimal::ZERO || count == 0 {
        return layout;
    }

    if !ratio.is_finite() || ratio <= 1.0 + STOP_TOLERANCE {
        if pivot > lower_stop {
            layout.low.push(BucketBounds::new(lower_stop, pivot));
        }
        if pivot < upper_stop {
            layout.high.push(BucketBounds::new(pivot, upper_stop));
        }
        return layout;
    }

    layout.low = walk(pivot, ratio, count, lower_stop, Walk::Down);
    layout.low.reverse();
    layout.high = walk(pivot, ratio, count, upper_stop, Walk::Up);
    layout
}

fn walk(pivot: Decimal, ratio: f64, count: usize, stop: Decimal, direction: Walk) -> Vec<BucketBounds> {
    let log_step = match direction {
        Walk::Down => -ratio.ln(),
        Walk::Up => ratio.ln(),
    };
    let pivot_f = to_f64(pivot);
    let stop_f = to_f64(stop);

    let mut buckets = Vec::new();
    let mut value = pivot;
    for k in 1..=count {
        let reached = match direction {
            Walk::Down => value <= stop,
            Walk::Up => value >= stop,
        };
        if reached {
            break;
        }

        let next_f = pivot_f * (k as f64 * log_step).exp();
        let next = if (next_f - stop_f).abs() <= stop_f.abs() * STOP_TOLERANCE {
            stop
        } else {
            match from_f64(next_f) {
                Some(next) => next,
                None => break,
            }
        };

        // too small a step to survive the decimal conversion
        let progressed = match direction {
            Walk::Down => next < value,
            Walk::Up => next > value,
        };
        if !progressed {
            break;
        }

        buckets.push(match direction {
            Walk::Down => BucketBounds::new(next, value),
            Walk::Up => BucketBounds::new(value, next),
        });
        value = next;
    }
    buckets
}
