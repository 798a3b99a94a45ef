use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::analysis::GraphExtent;
use crate::utils::{lerp, to_f64};

/// Margins as fractions of the container size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Padding {
    /// Left and right, each
    pub horizontal: f64,
    /// Top and bottom, each
    pub vertical: f64,
}

impl Default for Padding {
    fn default() -> Self {
        Self {
            horizontal: 0.1,
            vertical: 0.05,
        }
    }
}

/// Price ⇄ pixel mapping for one container size and extent.
///
/// Screen coordinates: x grows rightward, y grows downward from the top edge. Prices are
/// placed on a log scale; heights are linear above the baseline at the bottom margin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartMapper {
    width: f64,
    height: f64,
    x_min: f64,
    x_max: f64,
    graph_height: f64,
    padding: Padding,
}

impl ChartMapper {
    /// Mapper over the extent rounded outward to two significant digits
    pub fn new(width: f64, height: f64, extent: &GraphExtent, graph_height: f64, padding: Padding) -> Self {
        let (x_min, x_max) = extent.rounded(2);
        Self::with_bounds(width, height, to_f64(x_min), to_f64(x_max), graph_height, padding)
    }

    pub fn with_bounds(width: f64, height: f64, x_min: f64, x_max: f64, graph_height: f64, padding: Padding) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
            x_min,
            x_max,
            graph_height,
            padding,
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn x_bounds(&self) -> (f64, f64) {
        (self.x_min, self.x_max)
    }

    pub fn graph_height(&self) -> f64 {
        self.graph_height
    }

    fn left_padding(&self) -> f64 {
        self.width * self.padding.horizontal
    }

    fn inner_width(&self) -> f64 {
        self.width - 2.0 * self.left_padding()
    }

    fn bottom_padding(&self) -> f64 {
        self.height * self.padding.vertical
    }

    fn inner_height(&self) -> f64 {
        self.height - 2.0 * self.bottom_padding()
    }

    /// y coordinate of a zero value
    pub fn baseline(&self) -> f64 {
        self.height - self.bottom_padding()
    }

    fn log_span(&self) -> Option<(f64, f64)> {
        if self.x_min > 0.0 && self.x_max > 0.0 && self.x_min != self.x_max {
            let log_min = self.x_min.ln();
            Some((log_min, self.x_max.ln() - log_min))
        } else {
            None
        }
    }

    /// Horizontal pixel of a price. A collapsed extent maps everything to the midpoint;
    /// non-positive prices sit at the container's left edge.
    pub fn plot_x(&self, price: f64) -> f64 {
        let Some((log_min, log_span)) = self.log_span() else {
            return self.left_padding() + self.inner_width() / 2.0;
        };
        if price <= 0.0 {
            return 0.0;
        }
        self.left_padding() + self.inner_width() * (price.ln() - log_min) / log_span
    }

    pub fn plot_x_decimal(&self, price: Decimal) -> f64 {
        self.plot_x(to_f64(price))
    }

    /// Price under a horizontal pixel; exact inverse of `plot_x`
    pub fn plot_x_inverse(&self, x: f64) -> f64 {
        let inner_width = self.inner_width();
        match self.log_span() {
            Some((log_min, log_span)) if inner_width > 0.0 => {
                ((x - self.left_padding()) * log_span / inner_width + log_min).exp()
            }
            _ => self.x_min,
        }
    }

    /// Vertical pixel of an absolute reserve value against the tallest bucket
    pub fn plot_y(&self, value: f64) -> f64 {
        if self.graph_height == 0.0 {
            return self.baseline();
        }
        self.baseline() - self.inner_height() * value / self.graph_height
    }

    /// Vertical pixel of a fraction of the inner height
    pub fn percent_y(&self, fraction: f64) -> f64 {
        lerp(self.baseline(), self.baseline() - self.inner_height(), fraction)
    }

    /// Pixel distance covered by one decade of price
    pub fn decade_pixels(&self) -> f64 {
        self.plot_x(10.0) - self.plot_x(1.0)
    }

    /// On-screen width of a bucket spanning a factor of `ratio`
    pub fn bucket_pixel_width(&self, ratio: f64) -> f64 {
        self.plot_x(ratio) - self.plot_x(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn mapper() -> ChartMapper {
        ChartMapper::with_bounds(1000.0, 200.0, 1.0, 100.0, 50.0, Padding::default())
    }

    #[test]
    fn test_plot_x_log_scale() {
        let m = mapper();
        assert!((m.plot_x(1.0) - 100.0).abs() < 1e-9);
        assert!((m.plot_x(10.0) - 500.0).abs() < 1e-9);
        assert!((m.plot_x(100.0) - 900.0).abs() < 1e-9);
        assert!((m.decade_pixels() - 400.0).abs() < 1e-9);
    }

    #[test]
    fn test_plot_x_inverse_round_trip() {
        let m = mapper();
        for price in [1.5, 3.7, 42.0, 99.9] {
            let back = m.plot_x_inverse(m.plot_x(price));
            assert!((back - price).abs() / price < 1e-12);
        }
    }

    #[test]
    fn test_collapsed_extent_midpoint() {
        let m = ChartMapper::with_bounds(1000.0, 200.0, 2.0, 2.0, 0.0, Padding::default());
        assert_eq!(m.plot_x(2.0), 500.0);
        assert_eq!(m.plot_x(7.0), 500.0);
        assert_eq!(m.plot_x_inverse(123.0), 2.0);

        let zero = ChartMapper::with_bounds(1000.0, 200.0, 0.0, 0.0, 0.0, Padding::default());
        assert_eq!(zero.plot_x(1.0), 500.0);
    }

    #[test]
    fn test_plot_y() {
        let m = mapper();
        assert_eq!(m.baseline(), 190.0);
        assert_eq!(m.plot_y(0.0), 190.0);
        assert!((m.plot_y(50.0) - 10.0).abs() < 1e-9);
        assert!((m.plot_y(25.0) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_plot_y_pins_without_liquidity() {
        let m = ChartMapper::with_bounds(1000.0, 200.0, 1.0, 100.0, 0.0, Padding::default());
        assert_eq!(m.plot_y(0.0), m.baseline());
        assert_eq!(m.plot_y(1234.0), m.baseline());
    }

    #[test]
    fn test_percent_y() {
        let m = mapper();
        assert_eq!(m.percent_y(0.0), 190.0);
        assert!((m.percent_y(1.0) - 10.0).abs() < 1e-9);
        assert!((m.percent_y(1.0) - m.percent_y(0.0) + 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_new_rounds_extent() {
        let extent = GraphExtent::new(dec!(0.9123), dec!(3.01));
        let m = ChartMapper::new(500.0, 100.0, &extent, 0.0, Padding::default());
        assert_eq!(m.x_bounds(), (0.91, 3.1));
    }

    #[test]
    fn test_bucket_pixel_width() {
        let m = mapper();
        assert!((m.bucket_pixel_width(10.0) - m.decade_pixels()).abs() < 1e-9);
        assert_eq!(m.bucket_pixel_width(1.0), 0.0);
    }
}
