use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::data::{user_price_bounds, Tick};
use crate::utils::{round_significant, RoundDirection};

/// Multiple of the current price the chart shows on either side by default
const INITIAL_SPAN: Decimal = Decimal::from_parts(4, 0, 0, false, 0);
/// Margin around user ticks in focus mode
const FOCUS_MARGIN: Decimal = Decimal::from_parts(9, 0, 0, false, 1);

fn min_extent_end() -> Decimal {
    Decimal::new(11, 1)
}

fn min_extent_start() -> Decimal {
    Decimal::ONE / min_extent_end()
}

/// Visible price window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphExtent {
    #[serde(with = "rust_decimal::serde::str")]
    pub start: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub end: Decimal,
}

impl GraphExtent {
    pub fn new(start: Decimal, end: Decimal) -> Self {
        Self { start, end }
    }

    /// Window used when no ticks are known: [1/1.1, 1.1]
    pub fn fallback() -> Self {
        Self::new(min_extent_start(), min_extent_end())
    }

    /// Extent rounded outward to `digits` significant digits
    pub fn rounded(&self, digits: u32) -> (Decimal, Decimal) {
        (
            round_significant(self.start, digits, RoundDirection::Down),
            round_significant(self.end, digits, RoundDirection::Up),
        )
    }

    pub fn contains(&self, price: Decimal) -> bool {
        price >= self.start && price <= self.end
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Price span of the existing liquidity, or the fallback window when there is none
pub fn data_extent(ticks: &[Tick]) -> GraphExtent {
    let bounds = ticks.iter().fold(None, |bounds: Option<(Decimal, Decimal)>, tick| {
        Some(match bounds {
            None => (tick.price, tick.price),
            Some((min, max)) => (min.min(tick.price), max.max(tick.price)),
        })
    });

    match bounds {
        Some((start, end)) => GraphExtent::new(start, end),
        None => GraphExtent::fallback(),
    }
}

/// Default window of a quarter to four times the current price, never narrower than the fallback
pub fn initial_extent(current_price: Decimal) -> GraphExtent {
    let start = current_price / INITIAL_SPAN;
    let end = current_price.checked_mul(INITIAL_SPAN).unwrap_or(Decimal::MAX);
    GraphExtent::new(start.max(min_extent_start()), end.max(min_extent_end()))
}

/// Extent to draw: wide enough for existing and user liquidity, or hugging the user
/// ticks when `focus_user_ticks` is set and any exist.
pub fn graph_extent(
    data: &GraphExtent,
    initial: &GraphExtent,
    user_ticks: &[Option<Tick>],
    focus_user_ticks: bool,
) -> GraphExtent {
    let user_bounds = user_price_bounds(user_ticks);

    if focus_user_ticks {
        if let Some((min, max)) = user_bounds {
            let end = max.checked_div(FOCUS_MARGIN).unwrap_or(Decimal::MAX);
            return GraphExtent::new(min * FOCUS_MARGIN, end);
        }
    }

    let (min_tick, max_tick) = match user_bounds {
        Some((min, max)) => (min.min(data.start), max.max(data.end)),
        None => (data.start, data.end),
    };

    GraphExtent::new(min_tick.min(initial.start), max_tick.max(initial.end))
}
