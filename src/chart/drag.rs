use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ChartMapper, SelectorHost};
use crate::data::{Tick, UserTicks};
use crate::utils::{from_f64, price_to_tick_index, round_price, PRICE_SIGNIFICANT_DIGITS};

/// Multiplier applied to vertical drag distance, larger is faster
pub const DRAG_SPEED_FACTOR: f64 = 5.0;

/// Pointer movement since the gesture started, in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Displacement {
    pub x: f64,
    pub y: f64,
}

impl Displacement {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Directions a user tick may be dragged in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DragPermissions {
    pub can_move_up: bool,
    pub can_move_down: bool,
    pub can_move_x: bool,
}

/// Tick as it was when the gesture started
#[derive(Debug, Clone, PartialEq)]
pub struct DragSnapshot {
    pub index: usize,
    pub tick: Tick,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSnapshot),
}

/// Complete new values for the dragged tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragEdit {
    Price(Decimal),
    Reserves { reserve_a: Decimal, reserve_b: Decimal },
}

impl DragEdit {
    pub fn apply(&self, tick: &Tick) -> Tick {
        match *self {
            DragEdit::Price(price) => Tick {
                price,
                tick_index: price_to_tick_index(price).unwrap_or(tick.tick_index),
                ..tick.clone()
            },
            DragEdit::Reserves { reserve_a, reserve_b } => Tick {
                reserve_a,
                reserve_b,
                ..tick.clone()
            },
        }
    }
}

/// Copy of `user_ticks` with only slot `index` edited; holes stay holes
pub fn apply_drag_edit(user_ticks: &UserTicks, index: usize, edit: &DragEdit) -> UserTicks {
    user_ticks
        .iter()
        .enumerate()
        .map(|(slot, tick)| match tick {
            Some(tick) if slot == index => Some(edit.apply(tick)),
            other => other.clone(),
        })
        .collect()
}

/// Turns pointer movement into price or reserve edits of one selected user tick.
///
/// Every sample is computed from the gesture-start snapshot and the cumulative
/// displacement, so sparse or dense sampling ends at the same result.
#[derive(Debug, Clone)]
pub struct TickDragController {
    state: DragState,
    permissions: DragPermissions,
    speed_factor: f64,
    price_significant_digits: u32,
}

impl Default for TickDragController {
    fn default() -> Self {
        Self::new(DragPermissions::default())
    }
}

impl TickDragController {
    pub fn new(permissions: DragPermissions) -> Self {
        Self {
            state: DragState::Idle,
            permissions,
            speed_factor: DRAG_SPEED_FACTOR,
            price_significant_digits: PRICE_SIGNIFICANT_DIGITS,
        }
    }

    pub fn with_speed_factor(mut self, speed_factor: f64) -> Self {
        self.speed_factor = speed_factor;
        self
    }

    pub fn with_price_significant_digits(mut self, digits: u32) -> Self {
        self.price_significant_digits = digits;
        self
    }

    pub fn set_permissions(&mut self, permissions: DragPermissions) {
        self.permissions = permissions;
    }

    pub fn permissions(&self) -> DragPermissions {
        self.permissions
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub fn dragged_index(&self) -> Option<usize> {
        match &self.state {
            DragState::Dragging(snapshot) => Some(snapshot.index),
            DragState::Idle => None,
        }
    }

    /// Select slot `index` and start dragging it. An empty slot leaves the controller idle.
    pub fn begin<H: SelectorHost + ?Sized>(&mut self, index: usize, host: &mut H) -> bool {
        let Some(tick) = host.user_ticks().get(index).and_then(Option::clone) else {
            debug!("Ignoring drag start on empty user tick slot {}", index);
            return false;
        };

        debug!("Drag started on user tick {} at price {}", index, tick.price);
        host.set_user_tick_selected(index);
        self.state = DragState::Dragging(DragSnapshot { index, tick });
        true
    }

    /// Apply one movement sample and forward the edit to the host.
    ///
    /// Returns the edit that was applied; `None` when idle, cancelled or the sample
    /// maps to no representable value.
    pub fn drag<H: SelectorHost + ?Sized>(
        &mut self,
        displacement: Displacement,
        mapper: &ChartMapper,
        background_ticks: &[Option<Tick>],
        host: &mut H,
    ) -> Option<DragEdit> {
        let DragState::Dragging(snapshot) = &self.state else {
            return None;
        };
        let index = snapshot.index;

        if !matches!(host.user_ticks().get(index), Some(Some(_))) {
            debug!("User tick {} disappeared, cancelling drag", index);
            self.state = DragState::Idle;
            return None;
        }

        let edit = self.edit_for(snapshot, displacement, mapper, background_ticks)?;
        host.set_user_ticks(&move |ticks: &UserTicks| apply_drag_edit(ticks, index, &edit));
        Some(edit)
    }

    /// Edit a sample would produce, without touching any state
    pub fn edit_for(
        &self,
        snapshot: &DragSnapshot,
        displacement: Displacement,
        mapper: &ChartMapper,
        background_ticks: &[Option<Tick>],
    ) -> Option<DragEdit> {
        if self.permissions.can_move_x && displacement.x.abs() > displacement.y.abs() {
            self.price_edit(&snapshot.tick, displacement.x, mapper)
        } else {
            let background = background_ticks
                .get(snapshot.index)
                .and_then(Option::as_ref)
                .unwrap_or(&snapshot.tick);
            self.value_edit(&snapshot.tick, background, displacement.y, mapper)
        }
    }

    fn price_edit(&self, tick: &Tick, dx: f64, mapper: &ChartMapper) -> Option<DragEdit> {
        let decade_pixels = mapper.decade_pixels();
        if decade_pixels == 0.0 || !decade_pixels.is_finite() {
            return None;
        }

        let ratio = from_f64(10f64.powf(dx / decade_pixels))?;
        let price = tick.price.checked_mul(ratio)?;
        Some(DragEdit::Price(round_price(price, self.price_significant_digits)))
    }

    fn value_edit(&self, tick: &Tick, background: &Tick, dy: f64, mapper: &ChartMapper) -> Option<DragEdit> {
        let linear_pixels = mapper.percent_y(1.0) - mapper.percent_y(0.0);
        let displacement_percent = if linear_pixels == 0.0 { 0.0 } else { dy / linear_pixels };
        let factor = from_f64(1.0 + self.speed_factor * displacement_percent)?;

        Some(DragEdit::Reserves {
            reserve_a: self.clamp(tick.reserve_a.checked_mul(factor)?, background.reserve_a),
            reserve_b: self.clamp(tick.reserve_b.checked_mul(factor)?, background.reserve_b),
        })
    }

    fn clamp(&self, value: Decimal, background: Decimal) -> Decimal {
        let blocked = (!self.permissions.can_move_down && value < background)
            || (!self.permissions.can_move_up && value > background);
        let value = if blocked { background } else { value };
        value.max(Decimal::ZERO)
    }

    pub fn release(&mut self) {
        if let DragState::Dragging(snapshot) = &self.state {
            debug!("Drag released on user tick {}", snapshot.index);
        }
        self.state = DragState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::host::test_support::RecordingHost;
    use crate::chart::Padding;
    use crate::data::tick::test_support::tick;
    use rust_decimal_macros::dec;

    const ALL: DragPermissions = DragPermissions {
        can_move_up: true,
        can_move_down: true,
        can_move_x: true,
    };

    fn mapper() -> ChartMapper {
        ChartMapper::with_bounds(1000.0, 200.0, 1.0, 10000.0, 50.0, Padding::default())
    }

    fn host() -> RecordingHost {
        RecordingHost::new(vec![
            Some(tick(dec!(50), dec!(10), dec!(0))),
            None,
            Some(tick(dec!(100), dec!(10), dec!(0))),
        ])
    }

    fn selected(host: &RecordingHost, index: usize) -> &Tick {
        host.user_ticks[index].as_ref().unwrap()
    }

    #[test]
    fn test_begin_selects_tick() {
        let mut host = host();
        let mut controller = TickDragController::new(ALL);
        assert!(controller.begin(2, &mut host));
        assert_eq!(host.selected, Some(2));
        assert!(controller.is_dragging());
        assert_eq!(controller.dragged_index(), Some(2));
    }

    #[test]
    fn test_begin_on_hole_stays_idle() {
        let mut host = host();
        let mut controller = TickDragController::new(ALL);
        assert!(!controller.begin(1, &mut host));
        assert!(!controller.begin(7, &mut host));
        assert_eq!(controller.state(), &DragState::Idle);
        assert_eq!(host.selected, None);
    }

    #[test]
    fn test_price_move_one_decade() {
        let mut host = host();
        let mapper = mapper();
        let mut controller = TickDragController::new(ALL);
        controller.begin(2, &mut host);

        let edit = controller.drag(Displacement::new(mapper.decade_pixels(), 0.0), &mapper, &[], &mut host);
        assert_eq!(edit, Some(DragEdit::Price(dec!(1000))));
        assert_eq!(selected(&host, 2).price, dec!(1000));
        assert_eq!(selected(&host, 2).reserve_a, dec!(10));
        // other slots untouched
        assert_eq!(selected(&host, 0).price, dec!(50));
        assert!(host.user_ticks[1].is_none());
    }

    #[test]
    fn test_price_move_uses_snapshot() {
        let mut host = host();
        let mapper = mapper();
        let mut controller = TickDragController::new(ALL);
        controller.begin(2, &mut host);

        let half = mapper.decade_pixels() / 2.0;
        controller.drag(Displacement::new(half, 0.0), &mapper, &[], &mut host);
        controller.drag(Displacement::new(half * 2.0, 0.0), &mapper, &[], &mut host);
        // cumulative displacement from the original 100, not compounded
        assert_eq!(selected(&host, 2).price, dec!(1000));
    }

    #[test]
    fn test_price_move_requires_permission() {
        let mut host = host();
        let mapper = mapper();
        let mut controller = TickDragController::new(DragPermissions {
            can_move_up: true,
            can_move_down: true,
            can_move_x: false,
        });
        controller.begin(2, &mut host);
        let edit = controller.drag(Displacement::new(100.0, 0.0), &mapper, &[], &mut host);
        assert!(matches!(edit, Some(DragEdit::Reserves { .. })));
        assert_eq!(selected(&host, 2).price, dec!(100));
    }

    #[test]
    fn test_value_move_up() {
        let mut host = host();
        let mapper = mapper();
        let mut controller = TickDragController::new(ALL);
        controller.begin(0, &mut host);

        // inner height is 180px; moving up 36px is 20% of it, factor 1 + 5 * 0.2 = 2
        let edit = controller.drag(Displacement::new(0.0, -36.0), &mapper, &[], &mut host);
        assert_eq!(
            edit,
            Some(DragEdit::Reserves {
                reserve_a: dec!(20),
                reserve_b: dec!(0)
            })
        );
        assert_eq!(selected(&host, 0).reserve_a, dec!(20));
    }

    #[test]
    fn test_value_move_clamped_down() {
        let mut host = host();
        let mapper = mapper();
        let mut controller = TickDragController::new(DragPermissions {
            can_move_up: true,
            can_move_down: false,
            can_move_x: false,
        });
        let background = vec![Some(tick(dec!(50), dec!(8), dec!(0)))];
        controller.begin(0, &mut host);

        controller.drag(Displacement::new(0.0, 30.0), &mapper, &background, &mut host);
        assert_eq!(selected(&host, 0).reserve_a, dec!(8));

        controller.drag(Displacement::new(0.0, -18.0), &mapper, &background, &mut host);
        assert_eq!(selected(&host, 0).reserve_a, dec!(15));
    }

    #[test]
    fn test_value_move_clamped_up_against_own_snapshot() {
        let mut host = host();
        let mapper = mapper();
        let mut controller = TickDragController::new(DragPermissions {
            can_move_up: false,
            can_move_down: true,
            can_move_x: false,
        });
        controller.begin(0, &mut host);

        // no background slot: the snapshot is its own background
        controller.drag(Displacement::new(0.0, -50.0), &mapper, &[], &mut host);
        assert_eq!(selected(&host, 0).reserve_a, dec!(10));
    }

    #[test]
    fn test_value_move_floors_at_zero() {
        let mut host = host();
        let mapper = mapper();
        let mut controller = TickDragController::new(ALL);
        controller.begin(0, &mut host);

        controller.drag(Displacement::new(0.0, 180.0), &mapper, &[], &mut host);
        assert_eq!(selected(&host, 0).reserve_a, Decimal::ZERO);
    }

    #[test]
    fn test_axis_reclassified_per_sample() {
        let mut host = host();
        let mapper = mapper();
        let mut controller = TickDragController::new(ALL);
        controller.begin(2, &mut host);

        let edit = controller.drag(Displacement::new(10.0, 5.0), &mapper, &[], &mut host);
        assert!(matches!(edit, Some(DragEdit::Price(_))));
        let edit = controller.drag(Displacement::new(10.0, 20.0), &mapper, &[], &mut host);
        assert!(matches!(edit, Some(DragEdit::Reserves { .. })));
        // equal magnitudes fall to the value move
        let edit = controller.drag(Displacement::new(-15.0, 15.0), &mapper, &[], &mut host);
        assert!(matches!(edit, Some(DragEdit::Reserves { .. })));
    }

    #[test]
    fn test_cancel_when_tick_disappears() {
        let mut host = host();
        let mapper = mapper();
        let mut controller = TickDragController::new(ALL);
        controller.begin(2, &mut host);

        host.user_ticks[2] = None;
        assert_eq!(controller.drag(Displacement::new(0.0, -10.0), &mapper, &[], &mut host), None);
        assert!(!controller.is_dragging());

        host.user_ticks[2] = Some(tick(dec!(100), dec!(10), dec!(0)));
        assert_eq!(controller.drag(Displacement::new(0.0, -10.0), &mapper, &[], &mut host), None);
        assert_eq!(host.tick_updates, 0);
    }

    #[test]
    fn test_release_stops_updates() {
        let mut host = host();
        let mapper = mapper();
        let mut controller = TickDragController::new(ALL);
        controller.begin(0, &mut host);
        controller.drag(Displacement::new(0.0, -36.0), &mapper, &[], &mut host);
        controller.release();

        assert_eq!(controller.drag(Displacement::new(0.0, -90.0), &mapper, &[], &mut host), None);
        assert_eq!(host.tick_updates, 1);
        assert_eq!(selected(&host, 0).reserve_a, dec!(20));
    }

    #[test]
    fn test_custom_speed_and_precision() {
        let mut host = host();
        let mapper = mapper();
        let mut controller = TickDragController::new(ALL)
            .with_speed_factor(1.0)
            .with_price_significant_digits(2);
        controller.begin(0, &mut host);

        controller.drag(Displacement::new(0.0, -90.0), &mapper, &[], &mut host);
        assert_eq!(selected(&host, 0).reserve_a, dec!(15));

        controller.drag(Displacement::new(mapper.decade_pixels() * 0.3, 0.0), &mapper, &[], &mut host);
        // 50 * 10^0.3 = 99.76..., two significant digits
        assert_eq!(selected(&host, 0).price, dec!(100));
    }
}
