//! Mathematical utilities for decimal prices and reserves

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

/// Price step between neighbouring tick indexes: price = TICK_BASE ^ tick_index
pub const TICK_BASE: f64 = 1.0001;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundDirection {
    /// Toward zero
    Down,
    /// Away from zero
    Up,
}

/// Round to a number of significant digits in the given direction.
///
/// Zero and requests for zero digits pass through unchanged.
pub fn round_significant(value: Decimal, digits: u32, direction: RoundDirection) -> Decimal {
    if value.is_zero() || digits == 0 {
        return value;
    }

    let strategy = match direction {
        RoundDirection::Down => RoundingStrategy::ToZero,
        RoundDirection::Up => RoundingStrategy::AwayFromZero,
    };

    value
        .round_sf_with_strategy(digits, strategy)
        .map(|rounded| rounded.normalize())
        .unwrap_or(value)
}

/// Lossy conversion for logarithmic and pixel math.
pub fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// Bring a float result back into decimal space. Non-finite input has no decimal form.
pub fn from_f64(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_f64(value)
}

/// `numerator / denominator`, or `None` for a zero denominator or overflow.
pub fn checked_ratio(numerator: Decimal, denominator: Decimal) -> Option<Decimal> {
    if denominator.is_zero() {
        None
    } else {
        numerator.checked_div(denominator)
    }
}

/// Multiplicative inverse; zero has none.
pub fn inverse(value: Decimal) -> Option<Decimal> {
    checked_ratio(Decimal::ONE, value)
}

/// Nearest tick index for a price on the 1.0001 lattice.
pub fn price_to_tick_index(price: Decimal) -> Option<i64> {
    let price = to_f64(price);
    if price <= 0.0 {
        return None;
    }
    let index = (price.ln() / TICK_BASE.ln()).round();
    index.is_finite().then_some(index as i64)
}

pub fn lerp(start: f64, end: f64, t: f64) -> f64 {
    start + t * (end - start)
}
