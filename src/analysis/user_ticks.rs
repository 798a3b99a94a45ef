use std::cmp::Ordering;

use rust_decimal::Decimal;

use crate::data::{present_ticks, Tick, TickSide};
use crate::utils::to_f64;

/// Height fraction given to the tallest bar when it dominates its side
const FULL_SCALE: f64 = 0.925;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickDiff {
    Unchanged,
    Increased,
    Decreased,
}

/// One user tick ready to draw in percent units (0..1 of the inner chart height)
#[derive(Debug, Clone, PartialEq)]
pub struct UserTickBar {
    /// Slot in the user tick collection
    pub index: usize,
    pub price: Decimal,
    pub side: TickSide,
    pub value: f64,
    pub background_value: f64,
    pub is_selected: bool,
    /// Differs from its background tick
    pub is_edited: bool,
    pub diff: TickDiff,
    /// Liquidity placed on the wrong side of the current price
    pub price_warning: bool,
}

impl UserTickBar {
    pub fn is_zero(&self) -> bool {
        self.value == 0.0
    }

    pub fn min_value(&self) -> f64 {
        self.value.min(self.background_value)
    }

    pub fn max_value(&self) -> f64 {
        self.value.max(self.background_value)
    }
}

/// Smallest fraction the tallest bar is scaled up to, shrinking as ticks are added
pub fn min_bar_height(tick_count: usize) -> f64 {
    1.0 / ((tick_count as f64 - 2.0) / 3.0 + 2.0) + 0.4
}

#[derive(Debug, Clone, Copy)]
struct SideScale {
    cumulative: f64,
    factor: f64,
}

impl SideScale {
    fn new(user: &[f64], background: &[f64]) -> Self {
        let cumulative = user.iter().sum::<f64>().max(background.iter().sum::<f64>());
        let max = user.iter().chain(background).copied().fold(0.0, f64::max);
        let min_height = min_bar_height(background.len());

        let factor = if cumulative == 0.0 || max / cumulative > min_height {
            FULL_SCALE
        } else {
            FULL_SCALE / (max / cumulative) * min_height
        };

        Self { cumulative, factor }
    }

    fn fraction(&self, reserve: Decimal, factor: f64) -> f64 {
        if self.cumulative == 0.0 {
            0.0
        } else {
            to_f64(reserve) * factor / self.cumulative
        }
    }
}

fn nonzero_reserves(ticks: &[Option<Tick>], side: TickSide) -> Vec<f64> {
    ticks
        .iter()
        .flatten()
        .map(|tick| match side {
            TickSide::A => to_f64(tick.reserve_a),
            TickSide::B => to_f64(tick.reserve_b),
        })
        .filter(|value| *value != 0.0)
        .collect()
}

/// Lay out present user ticks against their background (pre-edit) counterparts.
///
/// A missing background slot makes the tick its own background. Bars come back in
/// draw order: taller before shorter, the selected tick last.
pub fn layout_user_ticks(
    user_ticks: &[Option<Tick>],
    background_ticks: &[Option<Tick>],
    selected: Option<usize>,
    current_price: Decimal,
) -> Vec<UserTickBar> {
    let scale_a = SideScale::new(
        &nonzero_reserves(user_ticks, TickSide::A),
        &nonzero_reserves(background_ticks, TickSide::A),
    );
    let scale_b = SideScale::new(
        &nonzero_reserves(user_ticks, TickSide::B),
        &nonzero_reserves(background_ticks, TickSide::B),
    );

    let value_of = |tick: &Tick, factor: f64| match tick.side() {
        TickSide::A => scale_a.fraction(tick.reserve_a, factor),
        TickSide::B => scale_b.fraction(tick.reserve_b, factor),
    };

    let mut bars: Vec<(UserTickBar, Decimal)> = present_ticks(user_ticks)
        .map(|(index, tick)| {
            let background = background_ticks
                .get(index)
                .and_then(Option::as_ref)
                .unwrap_or(tick);
            let factor = match background.side() {
                TickSide::A => scale_a.factor,
                TickSide::B => scale_b.factor,
            };

            let value = value_of(tick, factor);
            let background_value = value_of(background, factor);
            let side = tick.side();
            let diff = match value.partial_cmp(&background_value) {
                Some(Ordering::Greater) => TickDiff::Increased,
                Some(Ordering::Less) => TickDiff::Decreased,
                _ => TickDiff::Unchanged,
            };
            let price_warning = match side {
                TickSide::A => tick.price > current_price,
                TickSide::B => tick.price < current_price,
            };

            let bar = UserTickBar {
                index,
                price: tick.price,
                side,
                value,
                background_value,
                is_selected: selected == Some(index),
                is_edited: tick != background,
                diff,
                price_warning,
            };
            (bar, tick.total_reserves())
        })
        .collect();

    bars.sort_by(|(a, a_total), (b, b_total)| {
        a.is_selected
            .cmp(&b.is_selected)
            .then_with(|| b_total.cmp(a_total))
    });

    bars.into_iter().map(|(bar, _)| bar).collect()
}
