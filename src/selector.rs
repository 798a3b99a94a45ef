use rust_decimal::Decimal;
use tracing::trace;

use crate::analysis::{
    axis_ticks, bucket_count, bucket_ratio, data_extent, fill_layout, generate_buckets, graph_extent, initial_extent,
    layout_user_ticks, AxisTick, BucketLayout, FilledBuckets, GraphExtent, UserTickBar, BUCKET_WIDTH_PX,
};
use crate::chart::{pole_prices, ChartMapper, Padding};
use crate::data::{filter_fee_tier, normalize_ticks, FeeTiers, RawTick, Tick, TickGroup, Token};
use crate::utils::to_f64;

/// Axis labels run this far past the visible extent on both sides
pub const AXIS_EXTENT_FACTOR: f64 = 1.2;

/// Everything one frame of the selector depends on
#[derive(Debug, Clone, Copy)]
pub struct SelectorInput<'a> {
    pub ticks: &'a [RawTick],
    pub token_a: &'a Token,
    pub token_b: &'a Token,
    pub fee_tier: Option<Decimal>,
    /// Defaults to 1 when unknown
    pub current_price: Option<Decimal>,
    pub width: f64,
    pub height: f64,
    pub user_ticks: &'a [Option<Tick>],
    /// Pre-edit counterparts of `user_ticks`, slot for slot
    pub background_ticks: &'a [Option<Tick>],
    pub selected: Option<usize>,
    pub focus_user_ticks: bool,
    pub advanced: bool,
}

/// Shaded area between the first and last user tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeArea {
    pub start_price: Decimal,
    pub end_price: Decimal,
}

#[derive(Debug, Clone)]
pub struct SelectorView {
    pub ticks: TickGroup,
    pub fee_ticks: TickGroup,
    pub current_price: Decimal,
    pub data_extent: GraphExtent,
    pub graph_extent: GraphExtent,
    pub bucket_count: usize,
    pub layout: BucketLayout,
    /// Histogram of the selected fee tier
    pub buckets: FilledBuckets,
    /// Tallest bucket side across all fee tiers
    pub graph_height: f64,
    pub mapper: ChartMapper,
    pub axis: Vec<AxisTick>,
    /// Simple mode only
    pub range: Option<RangeArea>,
    /// Advanced mode only
    pub bars: Vec<UserTickBar>,
}

impl SelectorView {
    /// A zero-width window has nothing to draw
    pub fn is_available(&self) -> bool {
        !self.graph_extent.end.is_zero()
    }

    /// Pixel span of the range area, if any
    pub fn range_pixels(&self) -> Option<(f64, f64)> {
        self.range
            .map(|area| (self.mapper.plot_x_decimal(area.start_price), self.mapper.plot_x_decimal(area.end_price)))
    }

    pub fn current_price_x(&self) -> f64 {
        self.mapper.plot_x(to_f64(self.current_price))
    }
}

/// Liquidity histogram and user tick editor, recomputed from scratch for every input
#[derive(Debug, Clone)]
pub struct LiquiditySelector {
    fee_tiers: FeeTiers,
    bucket_width_px: f64,
    padding: Padding,
    axis_extent_factor: f64,
}

impl Default for LiquiditySelector {
    fn default() -> Self {
        Self {
            fee_tiers: FeeTiers::default(),
            bucket_width_px: BUCKET_WIDTH_PX,
            padding: Padding::default(),
            axis_extent_factor: AXIS_EXTENT_FACTOR,
        }
    }
}

impl LiquiditySelector {
    pub fn new(fee_tiers: FeeTiers, bucket_width_px: f64, padding: Padding, axis_extent_factor: f64) -> Self {
        Self {
            fee_tiers,
            bucket_width_px,
            padding,
            axis_extent_factor,
        }
    }

    pub fn fee_tiers(&self) -> &FeeTiers {
        &self.fee_tiers
    }

    pub fn view(&self, input: &SelectorInput<'_>) -> SelectorView {
        let ticks = normalize_ticks(input.ticks, input.token_a, input.token_b);
        let fee_ticks = filter_fee_tier(&ticks, input.fee_tier, &self.fee_tiers);
        let current_price = input.current_price.unwrap_or(Decimal::ONE);

        let data = data_extent(&ticks);
        let initial = initial_extent(current_price);
        let extent = graph_extent(&data, &initial, input.user_ticks, input.focus_user_ticks);

        let count = bucket_count(input.width, self.bucket_width_px);
        let ratio = bucket_ratio(&extent, count);
        let layout = generate_buckets(current_price, ratio, count, data.rounded(2));

        let buckets = fill_layout(&layout, &fee_ticks);
        let graph_height = if input.fee_tier.is_some() {
            fill_layout(&layout, &ticks).max_height()
        } else {
            buckets.max_height()
        };

        let mapper = ChartMapper::new(input.width, input.height, &extent, graph_height, self.padding);
        let (x_min, x_max) = mapper.x_bounds();
        let axis = axis_ticks(x_min / self.axis_extent_factor, x_max * self.axis_extent_factor);

        let (range, bars) = if input.advanced {
            let bars = layout_user_ticks(input.user_ticks, input.background_ticks, input.selected, current_price);
            (None, bars)
        } else {
            let range = pole_prices(input.user_ticks).map(|(start_price, end_price)| RangeArea {
                start_price,
                end_price,
            });
            (range, Vec::new())
        };

        trace!(
            "Selector view: {} ticks, {} buckets (ratio {:.4}), extent {} - {}",
            ticks.len(),
            layout.low.len() + layout.high.len(),
            ratio,
            extent.start,
            extent.end
        );

        SelectorView {
            ticks,
            fee_ticks,
            current_price,
            data_extent: data,
            graph_extent: extent,
            bucket_count: count,
            layout,
            buckets,
            graph_height,
            mapper,
            axis,
            range,
            bars,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tick::test_support::{raw_tick, tick, token_a, token_b};
    use rust_decimal_macros::dec;

    fn input<'a>(
        ticks: &'a [RawTick],
        a: &'a Token,
        b: &'a Token,
        user_ticks: &'a [Option<Tick>],
    ) -> SelectorInput<'a> {
        SelectorInput {
            ticks,
            token_a: a,
            token_b: b,
            fee_tier: None,
            current_price: Some(dec!(1)),
            width: 500.0,
            height: 200.0,
            user_ticks,
            background_ticks: user_ticks,
            selected: None,
            focus_user_ticks: false,
            advanced: false,
        }
    }

    #[test]
    fn test_empty_ticks() {
        let (a, b) = (token_a(), token_b());
        let view = LiquiditySelector::default().view(&input(&[], &a, &b, &[]));

        assert!(view.ticks.is_empty());
        assert!(view.buckets.is_empty());
        assert_eq!(view.graph_height, 0.0);
        assert_eq!(view.mapper.plot_y(10.0), view.mapper.baseline());
        assert!(view.range.is_none());
        assert!(view.bars.is_empty());
        assert!(view.is_available());
        assert!(axis_ticks(0.0, 0.0).is_empty());
    }

    #[test]
    fn test_histogram_from_raw_ticks() {
        let (a, b) = (token_a(), token_b());
        let raw = vec![
            raw_tick(dec!(0.8), dec!(10), dec!(0), 1),
            raw_tick(dec!(1.5), dec!(0), dec!(7), 1),
            raw_tick(dec!(1.6), dec!(0), dec!(0), 1),
        ];
        let view = LiquiditySelector::default().view(&input(&raw, &a, &b, &[]));

        assert_eq!(view.ticks.len(), 2);
        assert_eq!(view.bucket_count, 11);
        let total_a: Decimal = view.buckets.iter().map(|bucket| bucket.reserve_a).sum();
        let total_b: Decimal = view.buckets.iter().map(|bucket| bucket.reserve_b).sum();
        assert!(total_a >= dec!(10));
        assert!(total_b >= dec!(7));
        assert!(view.buckets.low.iter().all(|bucket| bucket.upper_bound <= dec!(1)));
        assert!(view.buckets.high.iter().all(|bucket| bucket.lower_bound >= dec!(1)));
        assert!(view.graph_height >= 10.0);
    }

    #[test]
    fn test_fee_tier_filters_histogram_not_height() {
        let (a, b) = (token_a(), token_b());
        let raw = vec![raw_tick(dec!(0.8), dec!(10), dec!(0), 1), raw_tick(dec!(0.8), dec!(40), dec!(0), 2)];
        let mut selector_input = input(&raw, &a, &b, &[]);
        selector_input.fee_tier = Some(dec!(0.0005));
        let view = LiquiditySelector::default().view(&selector_input);

        assert_eq!(view.fee_ticks.len(), 1);
        let total_a: Decimal = view.buckets.iter().map(|bucket| bucket.reserve_a).sum();
        assert_eq!(total_a, dec!(10));
        assert_eq!(view.graph_height, 50.0);
    }

    #[test]
    fn test_reversed_pair_normalized() {
        let (a, b) = (token_a(), token_b());
        let mut reversed = raw_tick(dec!(2), dec!(0), dec!(6), 1);
        std::mem::swap(&mut reversed.token0, &mut reversed.token1);
        let view = LiquiditySelector::default().view(&input(&[reversed], &a, &b, &[]));

        assert_eq!(view.ticks.len(), 1);
        assert_eq!(view.ticks[0].price, dec!(0.5));
        assert_eq!(view.ticks[0].reserve_a, dec!(6));
    }

    #[test]
    fn test_simple_mode_range_area() {
        let (a, b) = (token_a(), token_b());
        let user = vec![Some(tick(dec!(0.5), dec!(1), dec!(0))), None, Some(tick(dec!(3), dec!(0), dec!(1)))];
        let view = LiquiditySelector::default().view(&input(&[], &a, &b, &user));

        assert_eq!(
            view.range,
            Some(RangeArea {
                start_price: dec!(0.5),
                end_price: dec!(3)
            })
        );
        let (start_x, end_x) = view.range_pixels().unwrap();
        assert!(start_x < view.current_price_x() && view.current_price_x() < end_x);
        assert!(view.bars.is_empty());
    }

    #[test]
    fn test_advanced_mode_bars() {
        let (a, b) = (token_a(), token_b());
        let user = vec![Some(tick(dec!(0.5), dec!(1), dec!(0))), Some(tick(dec!(3), dec!(0), dec!(1)))];
        let mut selector_input = input(&[], &a, &b, &user);
        selector_input.advanced = true;
        selector_input.selected = Some(0);
        let view = LiquiditySelector::default().view(&selector_input);

        assert!(view.range.is_none());
        assert_eq!(view.bars.len(), 2);
        assert_eq!(view.bars.last().map(|bar| bar.index), Some(0));
    }

    #[test]
    fn test_focus_mode_hugs_user_ticks() {
        let (a, b) = (token_a(), token_b());
        let user = vec![Some(tick(dec!(0.9), dec!(1), dec!(0))), Some(tick(dec!(1.8), dec!(0), dec!(1)))];
        let mut selector_input = input(&[], &a, &b, &user);
        selector_input.focus_user_ticks = true;
        let view = LiquiditySelector::default().view(&selector_input);

        assert_eq!(view.graph_extent, GraphExtent::new(dec!(0.81), dec!(2)));
    }

    #[test]
    fn test_axis_spans_past_extent() {
        let (a, b) = (token_a(), token_b());
        let view = LiquiditySelector::default().view(&input(&[], &a, &b, &[]));
        let (x_min, x_max) = view.mapper.x_bounds();

        assert!(!view.axis.is_empty());
        assert!(view.axis.iter().all(|t| t.value >= x_min / AXIS_EXTENT_FACTOR));
        assert!(view.axis.iter().all(|t| t.value <= x_max * AXIS_EXTENT_FACTOR));
    }
}
