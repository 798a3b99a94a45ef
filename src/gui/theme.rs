use egui::{Color32, Rounding, Stroke, Style, Visuals};

use crate::analysis::{TickDiff, UserTickBar};
use crate::data::TickSide;

pub struct SelectorTheme;

impl SelectorTheme {
    // Color palette
    pub const BACKGROUND: Color32 = Color32::from_rgb(30, 30, 30);           // #1e1e1e
    pub const PANEL_BACKGROUND: Color32 = Color32::from_rgb(35, 35, 35);      // #232323
    pub const SURFACE: Color32 = Color32::from_rgb(40, 40, 40);               // #282828
    pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(224, 224, 224);       // #e0e0e0
    pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(180, 180, 180);     // #b4b4b4
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(140, 140, 140);         // #8c8c8c

    // Liquidity sides
    pub const TOKEN_A_COLOR: Color32 = Color32::from_rgb(100, 181, 246);      // #64b5f6
    pub const TOKEN_B_COLOR: Color32 = Color32::from_rgb(156, 39, 176);       // #9c27b0

    // Edits
    pub const INCREASE_COLOR: Color32 = Color32::from_rgb(0, 255, 136);       // #00ff88
    pub const DECREASE_COLOR: Color32 = Color32::from_rgb(255, 68, 68);       // #ff4444
    pub const WARNING: Color32 = Color32::from_rgb(255, 193, 7);              // #ffc107
    pub const SELECTED: Color32 = Color32::from_rgb(255, 170, 0);             // #ffaa00

    // Grid and border colors
    pub const GRID_COLOR: Color32 = Color32::from_rgb(60, 60, 60);            // #3c3c3c
    pub const BORDER_COLOR: Color32 = Color32::from_rgb(80, 80, 80);          // #505050
    pub const RANGE_FILL: Color32 = Color32::from_rgba_premultiplied(60, 60, 60, 60);

    pub fn apply_dark_theme(ctx: &egui::Context) {
        let mut style = Style::default();
        let mut visuals = Visuals::dark();

        visuals.panel_fill = Self::PANEL_BACKGROUND;
        visuals.window_fill = Self::BACKGROUND;
        visuals.extreme_bg_color = Self::SURFACE;
        visuals.faint_bg_color = Self::SURFACE;

        visuals.widgets.noninteractive.bg_fill = Self::SURFACE;
        visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, Self::TEXT_SECONDARY);
        visuals.widgets.inactive.bg_fill = Self::SURFACE;
        visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, Self::TEXT_SECONDARY);
        visuals.widgets.hovered.bg_fill = Self::TOKEN_A_COLOR.gamma_multiply(0.3);
        visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, Self::TEXT_PRIMARY);
        visuals.widgets.active.bg_fill = Self::TOKEN_A_COLOR.gamma_multiply(0.5);
        visuals.widgets.active.fg_stroke = Stroke::new(1.0, Self::TEXT_PRIMARY);

        visuals.selection.bg_fill = Self::TOKEN_A_COLOR.gamma_multiply(0.4);
        visuals.selection.stroke = Stroke::new(1.0, Self::TOKEN_A_COLOR);

        visuals.window_rounding = Rounding::same(8.0);
        visuals.widgets.noninteractive.rounding = Rounding::same(4.0);
        visuals.widgets.inactive.rounding = Rounding::same(4.0);
        visuals.widgets.hovered.rounding = Rounding::same(4.0);
        visuals.widgets.active.rounding = Rounding::same(4.0);

        style.visuals = visuals;
        style.spacing.item_spacing = egui::vec2(8.0, 6.0);
        style.spacing.button_padding = egui::vec2(12.0, 6.0);

        ctx.set_style(style);
    }

    pub fn side_color(side: TickSide) -> Color32 {
        match side {
            TickSide::A => Self::TOKEN_A_COLOR,
            TickSide::B => Self::TOKEN_B_COLOR,
        }
    }

    /// Fill of a user tick bar: warnings win over selection, selection over side
    pub fn bar_color(bar: &UserTickBar) -> Color32 {
        if bar.price_warning {
            Self::WARNING
        } else if bar.is_selected {
            Self::SELECTED
        } else {
            Self::side_color(bar.side)
        }
    }

    /// Color of the segment between a bar and its pre-edit height
    pub fn diff_color(diff: TickDiff) -> Option<Color32> {
        match diff {
            TickDiff::Increased => Some(Self::INCREASE_COLOR),
            TickDiff::Decreased => Some(Self::DECREASE_COLOR),
            TickDiff::Unchanged => None,
        }
    }
}
