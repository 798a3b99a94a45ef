use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Response, Sense, Stroke, Ui, Vec2};

use super::{SelectorState, SelectorTheme};
use crate::analysis::UserTickBar;
use crate::chart::{ChartMapper, Displacement, DragPermissions, RangeDragController, RangePole, TickDragController};
use crate::selector::SelectorView;
use crate::utils::to_f64;

/// How far from a tick line or pole the pointer may be and still grab it
const HIT_TOLERANCE_PX: f64 = 6.0;
/// Bars this short still get a grabbable height
const MIN_HIT_HEIGHT_PX: f64 = 12.0;
const BAR_WIDTH: f32 = 3.0;
const MIN_FLAG_WIDTH_PX: f64 = 8.0;
const FLAG_HEIGHT_PX: f64 = 12.0;

/// Topmost user tick bar under a point in chart coordinates
pub fn hit_test_bar(bars: &[UserTickBar], mapper: &ChartMapper, x: f64, y: f64) -> Option<usize> {
    let baseline = mapper.baseline();
    bars.iter()
        .rev()
        .find(|bar| {
            let bar_x = mapper.plot_x_decimal(bar.price);
            let top = mapper.percent_y(bar.max_value()).min(baseline - MIN_HIT_HEIGHT_PX);
            (x - bar_x).abs() <= HIT_TOLERANCE_PX && y >= top - HIT_TOLERANCE_PX && y <= baseline + HIT_TOLERANCE_PX
        })
        .map(|bar| bar.index)
}

/// Range pole nearest to `x`, if close enough to grab
pub fn hit_test_pole(range_pixels: Option<(f64, f64)>, x: f64) -> Option<RangePole> {
    let (start_x, end_x) = range_pixels?;
    let to_start = (x - start_x).abs();
    let to_end = (x - end_x).abs();

    if to_start > HIT_TOLERANCE_PX && to_end > HIT_TOLERANCE_PX {
        None
    } else if to_end < to_start || (to_end == to_start && x >= end_x) {
        Some(RangePole::Max)
    } else {
        Some(RangePole::Min)
    }
}

/// Range pole flags are one histogram bucket wide
pub fn pole_flag_width(mapper: &ChartMapper, ratio: f64) -> f64 {
    let width = mapper.bucket_pixel_width(ratio);
    if width.is_finite() {
        width.max(MIN_FLAG_WIDTH_PX)
    } else {
        MIN_FLAG_WIDTH_PX
    }
}

/// Paints a `SelectorView` and turns pointer gestures into edits of a `SelectorState`
pub struct SelectorPanel {
    tick_drag: TickDragController,
    range_drag: RangeDragController,
    drag_origin: Option<Pos2>,
}

impl SelectorPanel {
    pub fn new(tick_drag: TickDragController, range_drag: RangeDragController) -> Self {
        Self {
            tick_drag,
            range_drag,
            drag_origin: None,
        }
    }

    pub fn set_permissions(&mut self, permissions: DragPermissions) {
        self.tick_drag.set_permissions(permissions);
    }

    pub fn is_dragging(&self) -> bool {
        self.tick_drag.is_dragging() || self.range_drag.is_dragging()
    }

    pub fn show(&mut self, ui: &mut Ui, view: &SelectorView, state: &mut SelectorState) -> Response {
        let size = Vec2::new(view.mapper.width() as f32, view.mapper.height() as f32);
        let (response, painter) = ui.allocate_painter(size, Sense::click_and_drag());
        let origin = response.rect.min;

        self.draw_chart(&painter, origin, view);
        self.handle_pointer(&response, origin, view, state);

        response
    }

    fn handle_pointer(&mut self, response: &Response, origin: Pos2, view: &SelectorView, state: &mut SelectorState) {
        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                let local = pos - origin;
                if let Some(index) = hit_test_bar(&view.bars, &view.mapper, local.x as f64, local.y as f64) {
                    state.selected = Some(index);
                }
            }
        }

        if response.drag_started() {
            if let Some(pos) = response.interact_pointer_pos() {
                let local = pos - origin;
                let (x, y) = (local.x as f64, local.y as f64);

                // select and drag in one gesture
                let started = match hit_test_bar(&view.bars, &view.mapper, x, y) {
                    Some(index) => self.tick_drag.begin(index, state),
                    None => match hit_test_pole(view.range_pixels(), x) {
                        Some(pole) => self.range_drag.begin(pole, &state.user_ticks),
                        None => false,
                    },
                };
                self.drag_origin = started.then_some(pos);
            }
        }

        if response.dragged() {
            if let (Some(start), Some(pos)) = (self.drag_origin, response.interact_pointer_pos()) {
                let delta = pos - start;
                if self.tick_drag.is_dragging() {
                    let background = state.background_ticks.clone();
                    let displacement = Displacement::new(delta.x as f64, delta.y as f64);
                    self.tick_drag.drag(displacement, &view.mapper, &background, state);
                } else if self.range_drag.is_dragging() {
                    self.range_drag.drag(delta.x as f64, &view.mapper, state);
                }
            }
        }

        if response.drag_released() {
            self.tick_drag.release();
            self.range_drag.release();
            self.drag_origin = None;
        }
    }

    fn draw_chart(&self, painter: &Painter, origin: Pos2, view: &SelectorView) {
        let mapper = &view.mapper;
        let at = |x: f64, y: f64| origin + Vec2::new(x as f32, y as f32);

        painter.rect_filled(
            Rect::from_min_size(origin, Vec2::new(mapper.width() as f32, mapper.height() as f32)),
            0.0,
            SelectorTheme::BACKGROUND,
        );

        if !view.is_available() {
            painter.text(
                at(mapper.width() / 2.0, mapper.height() / 2.0),
                Align2::CENTER_CENTER,
                "Chart is not currently available",
                FontId::proportional(14.0),
                SelectorTheme::TEXT_MUTED,
            );
            return;
        }

        if let Some((start_x, end_x)) = view.range_pixels() {
            let width = (end_x - start_x).max(0.0);
            painter.rect_filled(
                Rect::from_min_max(at(start_x, mapper.percent_y(1.0)), at(start_x + width, mapper.percent_y(0.0))),
                0.0,
                SelectorTheme::RANGE_FILL,
            );
        }

        self.draw_buckets(painter, origin, view);
        self.draw_axis(painter, origin, view);

        let price_x = view.current_price_x();
        painter.line_segment(
            [at(price_x, mapper.percent_y(1.0)), at(price_x, mapper.baseline())],
            Stroke::new(1.0, SelectorTheme::TEXT_SECONDARY),
        );

        if view.bars.is_empty() {
            self.draw_poles(painter, origin, view);
        } else {
            self.draw_bars(painter, origin, view);
        }
    }

    fn draw_buckets(&self, painter: &Painter, origin: Pos2, view: &SelectorView) {
        let mapper = &view.mapper;
        let at = |x: f64, y: f64| origin + Vec2::new(x as f32, y as f32);

        for bucket in view.buckets.iter() {
            let left = mapper.plot_x_decimal(bucket.lower_bound);
            let right = mapper.plot_x_decimal(bucket.upper_bound);
            let reserve_a = to_f64(bucket.reserve_a);
            let reserve_b = to_f64(bucket.reserve_b);

            // tokenB stacks on top of tokenA
            if reserve_a > 0.0 {
                painter.rect_filled(
                    Rect::from_min_max(at(left, mapper.plot_y(reserve_a)), at(right, mapper.baseline())),
                    0.0,
                    SelectorTheme::TOKEN_A_COLOR.gamma_multiply(0.6),
                );
            }
            if reserve_b > 0.0 {
                painter.rect_filled(
                    Rect::from_min_max(at(left, mapper.plot_y(reserve_a + reserve_b)), at(right, mapper.plot_y(reserve_a))),
                    0.0,
                    SelectorTheme::TOKEN_B_COLOR.gamma_multiply(0.6),
                );
            }
        }
    }

    fn draw_axis(&self, painter: &Painter, origin: Pos2, view: &SelectorView) {
        let mapper = &view.mapper;
        let at = |x: f64, y: f64| origin + Vec2::new(x as f32, y as f32);
        let baseline = mapper.baseline();

        painter.line_segment(
            [at(0.0, baseline), at(mapper.width(), baseline)],
            Stroke::new(1.0, SelectorTheme::GRID_COLOR),
        );

        for tick in &view.axis {
            let x = mapper.plot_x(tick.value);
            painter.line_segment([at(x, baseline), at(x, baseline + 2.0)], Stroke::new(1.0, SelectorTheme::BORDER_COLOR));
            painter.text(
                at(x, baseline + 4.0),
                Align2::CENTER_TOP,
                &tick.label,
                FontId::monospace(10.0),
                SelectorTheme::TEXT_SECONDARY,
            );
        }
    }

    fn draw_poles(&self, painter: &Painter, origin: Pos2, view: &SelectorView) {
        let Some((start_x, end_x)) = view.range_pixels() else {
            return;
        };
        let mapper = &view.mapper;
        let at = |x: f64, y: f64| origin + Vec2::new(x as f32, y as f32);
        let dragged = self.range_drag.dragged_pole();
        let flag_width = pole_flag_width(mapper, view.layout.ratio);
        let top = mapper.percent_y(1.0);

        for (pole, x) in [(RangePole::Min, start_x), (RangePole::Max, end_x)] {
            let color = if dragged == Some(pole) {
                SelectorTheme::SELECTED
            } else {
                SelectorTheme::TEXT_PRIMARY
            };
            painter.line_segment([at(x, top), at(x, mapper.baseline())], Stroke::new(2.0, color));

            // flags point away from the range
            let flag_x = match pole {
                RangePole::Min => x - flag_width,
                RangePole::Max => x + flag_width,
            };
            painter.rect_filled(
                Rect::from_two_pos(at(x, top), at(flag_x, top + FLAG_HEIGHT_PX)),
                2.0,
                color.gamma_multiply(0.8),
            );
        }
    }

    fn draw_bars(&self, painter: &Painter, origin: Pos2, view: &SelectorView) {
        let mapper = &view.mapper;
        let at = |x: f64, y: f64| origin + Vec2::new(x as f32, y as f32);
        let baseline = mapper.baseline();

        for bar in &view.bars {
            let x = mapper.plot_x_decimal(bar.price);
            let color = SelectorTheme::bar_color(bar);
            let top = mapper.percent_y(bar.value);

            if bar.is_zero() {
                painter.circle_stroke(at(x, baseline), 3.0, Stroke::new(1.0, color));
            } else {
                painter.line_segment([at(x, baseline), at(x, top)], Stroke::new(BAR_WIDTH, color));
                painter.circle_filled(at(x, top), 3.0, color);
            }

            if let Some(diff_color) = SelectorTheme::diff_color(bar.diff) {
                painter.line_segment(
                    [at(x, mapper.percent_y(bar.min_value())), at(x, mapper.percent_y(bar.max_value()))],
                    Stroke::new(BAR_WIDTH, diff_color),
                );
            }

            if bar.is_selected {
                painter.text(
                    at(x, top - 6.0),
                    Align2::CENTER_BOTTOM,
                    bar.price.to_string(),
                    FontId::monospace(11.0),
                    Color32::WHITE,
                );
            }
        }
    }
}
