use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{BucketBounds, BucketLayout};
use crate::data::Tick;
use crate::utils::to_f64;

/// Histogram bucket with the liquidity summed inside it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    #[serde(with = "rust_decimal::serde::str")]
    pub lower_bound: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub upper_bound: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub reserve_a: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub reserve_b: Decimal,
}

impl Bucket {
    pub fn total(&self) -> Decimal {
        self.reserve_a.saturating_add(self.reserve_b)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilledBuckets {
    pub low: Vec<Bucket>,
    pub high: Vec<Bucket>,
}

impl FilledBuckets {
    pub fn iter(&self) -> impl Iterator<Item = &Bucket> {
        self.low.iter().chain(self.high.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.low.is_empty() && self.high.is_empty()
    }

    /// Tallest single-side value; the histogram's vertical scale
    pub fn max_height(&self) -> f64 {
        self.iter()
            .map(|bucket| to_f64(bucket.reserve_a.max(bucket.reserve_b)))
            .fold(0.0, f64::max)
    }
}

/// Ticks sorted by price so each bucket is found by binary search
pub struct PriceIndex<'a> {
    sorted: Vec<&'a Tick>,
}

impl<'a> PriceIndex<'a> {
    pub fn new(ticks: &'a [Tick]) -> Self {
        let mut sorted: Vec<&Tick> = ticks.iter().collect();
        sorted.sort_by(|a, b| a.price.cmp(&b.price));
        Self { sorted }
    }

    /// Ticks priced within `[lower, upper]`, both ends inclusive
    pub fn range(&self, lower: Decimal, upper: Decimal) -> &[&'a Tick] {
        if upper < lower {
            return &[];
        }
        let start = self.sorted.partition_point(|tick| tick.price < lower);
        let end = self.sorted.partition_point(|tick| tick.price <= upper);
        &self.sorted[start..end]
    }
}

/// Sum reserves per bucket. A tick exactly on a shared boundary counts in both
/// neighbours; buckets holding nothing are dropped.
pub fn fill_buckets(bounds: &[BucketBounds], ticks: &[Tick]) -> Vec<Bucket> {
    let index = PriceIndex::new(ticks);
    fill_with_index(bounds, &index)
}

fn fill_with_index(bounds: &[BucketBounds], index: &PriceIndex<'_>) -> Vec<Bucket> {
    bounds
        .iter()
        .filter_map(|bound| {
            let (reserve_a, reserve_b) = index
                .range(bound.lower, bound.upper)
                .iter()
                .fold((Decimal::ZERO, Decimal::ZERO), |(a, b), tick| {
                    (a.saturating_add(tick.reserve_a), b.saturating_add(tick.reserve_b))
                });

            if reserve_a.is_zero() && reserve_b.is_zero() {
                None
            } else {
                Some(Bucket {
                    lower_bound: bound.lower,
                    upper_bound: bound.upper,
                    reserve_a,
                    reserve_b,
                })
            }
        })
        .collect()
}

pub fn fill_layout(layout: &BucketLayout, ticks: &[Tick]) -> FilledBuckets {
    let index = PriceIndex::new(ticks);
    FilledBuckets {
        low: fill_with_index(&layout.low, &index),
        high: fill_with_index(&layout.high, &index),
    }
}
