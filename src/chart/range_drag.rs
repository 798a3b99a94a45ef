use rust_decimal::Decimal;
use tracing::debug;

use super::{ChartMapper, SelectorHost};
use crate::data::{present_ticks, Tick};
use crate::utils::{format_price, from_f64, round_price, PRICE_SIGNIFICANT_DIGITS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangePole {
    Min,
    Max,
}

/// Prices of the first and last present user ticks, the two poles of the range area
pub fn pole_prices(user_ticks: &[Option<Tick>]) -> Option<(Decimal, Decimal)> {
    let mut present = present_ticks(user_ticks);
    let (_, first) = present.next()?;
    let last = present.last().map_or(first, |(_, tick)| tick);
    Some((first.price, last.price))
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PoleSnapshot {
    pole: RangePole,
    start_price: Decimal,
    end_price: Decimal,
}

/// Drags one end of the range area horizontally and reports the new bound.
#[derive(Debug, Clone)]
pub struct RangeDragController {
    snapshot: Option<PoleSnapshot>,
    price_significant_digits: u32,
}

impl Default for RangeDragController {
    fn default() -> Self {
        Self::new(PRICE_SIGNIFICANT_DIGITS)
    }
}

impl RangeDragController {
    pub fn new(price_significant_digits: u32) -> Self {
        Self {
            snapshot: None,
            price_significant_digits,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.snapshot.is_some()
    }

    pub fn dragged_pole(&self) -> Option<RangePole> {
        self.snapshot.map(|snapshot| snapshot.pole)
    }

    pub fn begin(&mut self, pole: RangePole, user_ticks: &[Option<Tick>]) -> bool {
        let Some((start_price, end_price)) = pole_prices(user_ticks) else {
            return false;
        };
        debug!("Range drag started on {:?} pole ({} - {})", pole, start_price, end_price);
        self.snapshot = Some(PoleSnapshot {
            pole,
            start_price,
            end_price,
        });
        true
    }

    /// Move the dragged pole by `dx` pixels from where it started.
    ///
    /// A pole dragged past the opposite one drags that bound along with it.
    pub fn drag<H: SelectorHost + ?Sized>(&mut self, dx: f64, mapper: &ChartMapper, host: &mut H) -> Option<Decimal> {
        let snapshot = self.snapshot?;
        if dx == 0.0 {
            return None;
        }

        let anchor = match snapshot.pole {
            RangePole::Min => snapshot.start_price,
            RangePole::Max => snapshot.end_price,
        };
        let new_price = from_f64(mapper.plot_x_inverse(mapper.plot_x_decimal(anchor) + dx))?;
        let new_price = round_price(new_price, self.price_significant_digits);
        let label = format_price(new_price, self.price_significant_digits);

        match snapshot.pole {
            RangePole::Min => {
                host.set_range_min(label.clone());
                if snapshot.end_price <= new_price {
                    host.set_range_max(label);
                }
            }
            RangePole::Max => {
                host.set_range_max(label.clone());
                if snapshot.start_price >= new_price {
                    host.set_range_min(label);
                }
            }
        }

        Some(new_price)
    }

    pub fn release(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            debug!("Range drag released on {:?} pole", snapshot.pole);
        }
    }
}
