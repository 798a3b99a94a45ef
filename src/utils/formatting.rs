//! Formatting utilities for display

use rust_decimal::Decimal;

/// Significant digits used when a dragged price is written back
pub const PRICE_SIGNIFICANT_DIGITS: u32 = 6;

/// Round a price to the standard display precision (nearest, ties away from zero).
pub fn round_price(price: Decimal, significant_digits: u32) -> Decimal {
    if price.is_zero() || significant_digits == 0 {
        return price;
    }
    price
        .round_sf(significant_digits)
        .map(|rounded| rounded.normalize())
        .unwrap_or(price)
}

/// String form handed to `set_range_min` / `set_range_max`
pub fn format_price(price: Decimal, significant_digits: u32) -> String {
    round_price(price, significant_digits).to_string()
}

/// Axis labels: values >= 1 show no decimals, sub-unit values show enough to be distinct
pub fn axis_decimal_places(value: f64) -> usize {
    if value <= 0.0 || !value.is_finite() {
        return 0;
    }
    (-value.log10().floor()).max(0.0) as usize
}

pub fn format_axis_label(value: f64) -> String {
    format!("{:.prec$}", value, prec = axis_decimal_places(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(dec!(1000), PRICE_SIGNIFICANT_DIGITS), "1000");
        assert_eq!(format_price(dec!(1.23456789), PRICE_SIGNIFICANT_DIGITS), "1.23457");
        assert_eq!(format_price(dec!(0.000123456789), 3), "0.000123");
        assert_eq!(format_price(Decimal::ZERO, 3), "0");
    }

    #[test]
    fn test_axis_decimal_places() {
        assert_eq!(axis_decimal_places(5.0), 0);
        assert_eq!(axis_decimal_places(200.0), 0);
        assert_eq!(axis_decimal_places(0.5), 1);
        assert_eq!(axis_decimal_places(0.02), 2);
    }

    #[test]
    fn test_format_axis_label() {
        assert_eq!(format_axis_label(20.0), "20");
        assert_eq!(format_axis_label(0.05), "0.05");
    }
}
