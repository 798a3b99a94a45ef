use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::chart::{pole_prices, SelectorHost};
use crate::data::{present_ticks, seed_user_ticks, Tick, UserTickSeed, UserTicks};
use crate::utils::{format_price, PRICE_SIGNIFICANT_DIGITS};

/// Smallest number of ticks a range is spread over when reseeding
const MIN_SEED_TICKS: usize = 2;

/// The viewer's copy of the user ticks and range inputs; the selector edits it through
/// `SelectorHost`.
#[derive(Debug, Clone, Default)]
pub struct SelectorState {
    pub user_ticks: UserTicks,
    /// Ticks as they were before the current round of edits
    pub background_ticks: UserTicks,
    pub selected: Option<usize>,
    pub range_min: String,
    pub range_max: String,
    range_dirty: bool,
}

impl SelectorState {
    pub fn new(user_ticks: UserTicks) -> Self {
        let (range_min, range_max) = pole_prices(&user_ticks)
            .map(|(min, max)| {
                (
                    format_price(min, PRICE_SIGNIFICANT_DIGITS),
                    format_price(max, PRICE_SIGNIFICANT_DIGITS),
                )
            })
            .unwrap_or_default();

        Self {
            background_ticks: user_ticks.clone(),
            user_ticks,
            selected: None,
            range_min,
            range_max,
            range_dirty: false,
        }
    }

    /// Parsed range inputs, ordered low to high
    pub fn range_bounds(&self) -> Option<(Decimal, Decimal)> {
        let min = self.range_min.trim().parse::<Decimal>().ok()?;
        let max = self.range_max.trim().parse::<Decimal>().ok()?;
        Some((min.min(max), min.max(max)))
    }

    pub fn is_range_dirty(&self) -> bool {
        self.range_dirty
    }

    pub fn mark_range_dirty(&mut self) {
        self.range_dirty = true;
    }

    /// Respread the existing liquidity over the range inputs after they changed.
    ///
    /// Keeps tokens, fee and totals of the current ticks; returns whether anything changed.
    pub fn reseed(&mut self, current_price: Decimal) -> bool {
        if !self.range_dirty {
            return false;
        }
        self.range_dirty = false;

        let Some((range_min, range_max)) = self.range_bounds() else {
            warn!("Ignoring unparseable range {:?} - {:?}", self.range_min, self.range_max);
            return false;
        };
        let Some((_, template)) = present_ticks(&self.user_ticks).next() else {
            return false;
        };

        let (total_a, total_b) = present_ticks(&self.user_ticks).fold((Decimal::ZERO, Decimal::ZERO), |(a, b), (_, tick)| {
            (a.saturating_add(tick.reserve_a), b.saturating_add(tick.reserve_b))
        });
        let count = present_ticks(&self.user_ticks).count().max(MIN_SEED_TICKS);

        let seed = UserTickSeed {
            token_a: template.token_a.clone(),
            token_b: template.token_b.clone(),
            range_min,
            range_max,
            count,
            current_price,
            total_a,
            total_b,
            fee: template.fee,
            fee_index: template.fee_index,
        };

        let ticks = seed_user_ticks(&seed);
        if ticks.is_empty() {
            warn!(
                "Range {} - {} cannot hold {} {} and {} {} around price {}, keeping current ticks",
                range_min, range_max, total_a, seed.token_a.symbol, total_b, seed.token_b.symbol, current_price
            );
            self.restore_range();
            return false;
        }
        debug!("Reseeded {} user ticks over {} - {}", ticks.len(), range_min, range_max);
        self.background_ticks = ticks.clone();
        self.user_ticks = ticks;
        self.selected = None;
        true
    }

    /// Put the range inputs back on the current poles
    fn restore_range(&mut self) {
        if let Some((min, max)) = pole_prices(&self.user_ticks) {
            self.range_min = format_price(min, PRICE_SIGNIFICANT_DIGITS);
            self.range_max = format_price(max, PRICE_SIGNIFICANT_DIGITS);
        }
    }

    /// Leave a hole where the selected tick was
    pub fn delete_selected(&mut self) -> Option<Tick> {
        let index = self.selected.take()?;
        self.user_ticks.get_mut(index).and_then(Option::take)
    }

    /// Accept the current edits as the new baseline
    pub fn commit_edits(&mut self) {
        self.background_ticks = self.user_ticks.clone();
    }

    pub fn reset_edits(&mut self) {
        self.user_ticks = self.background_ticks.clone();
    }

    pub fn selected_tick(&self) -> Option<&Tick> {
        self.selected
            .and_then(|index| self.user_ticks.get(index))
            .and_then(Option::as_ref)
    }
}

impl SelectorHost for SelectorState {
    fn user_ticks(&self) -> &UserTicks {
        &self.user_ticks
    }

    fn set_user_ticks(&mut self, transform: &dyn Fn(&UserTicks) -> UserTicks) {
        self.user_ticks = transform(&self.user_ticks);
    }

    fn set_range_min(&mut self, price: String) {
        self.range_min = price;
        self.range_dirty = true;
    }

    fn set_range_max(&mut self, price: String) {
        self.range_max = price;
        self.range_dirty = true;
    }

    fn set_user_tick_selected(&mut self, index: usize) {
        self.selected = Some(index);
    }
}
