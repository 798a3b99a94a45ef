use egui::Ui;
use rust_decimal::Decimal;
use std::cmp::Ordering;

use super::{SelectorState, SelectorTheme};
use crate::analysis::TickDiff;
use crate::data::present_ticks;

#[derive(Debug, Clone, PartialEq)]
pub struct TickRow {
    pub index: usize,
    pub price: Decimal,
    pub reserve_a: Decimal,
    pub reserve_b: Decimal,
    pub diff: TickDiff,
    pub is_selected: bool,
}

/// One row per present user tick, in slot order
pub fn tick_rows(state: &SelectorState) -> Vec<TickRow> {
    present_ticks(&state.user_ticks)
        .map(|(index, tick)| {
            let before = state
                .background_ticks
                .get(index)
                .and_then(Option::as_ref)
                .map_or(tick.total_reserves(), |background| background.total_reserves());

            TickRow {
                index,
                price: tick.price,
                reserve_a: tick.reserve_a,
                reserve_b: tick.reserve_b,
                diff: match tick.total_reserves().cmp(&before) {
                    Ordering::Greater => TickDiff::Increased,
                    Ordering::Less => TickDiff::Decreased,
                    Ordering::Equal => TickDiff::Unchanged,
                },
                is_selected: state.selected == Some(index),
            }
        })
        .collect()
}

pub fn show_tick_table(ui: &mut Ui, state: &mut SelectorState) {
    use egui_extras::{Column, TableBuilder};

    let rows = tick_rows(state);

    TableBuilder::new(ui)
        .striped(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::auto()) // Slot
        .column(Column::auto().resizable(true)) // Price
        .column(Column::auto().resizable(true)) // Reserve A
        .column(Column::remainder()) // Reserve B
        .header(22.0, |mut header| {
            header.col(|ui| {
                ui.strong("#");
            });
            header.col(|ui| {
                ui.strong("Price");
            });
            header.col(|ui| {
                ui.strong("Reserve A");
            });
            header.col(|ui| {
                ui.strong("Reserve B");
            });
        })
        .body(|body| {
            body.rows(20.0, rows.len(), |row_index, mut row| {
                let Some(tick_row) = rows.get(row_index) else {
                    return;
                };
                let color = SelectorTheme::diff_color(tick_row.diff).unwrap_or(SelectorTheme::TEXT_PRIMARY);

                row.col(|ui| {
                    if ui.selectable_label(tick_row.is_selected, tick_row.index.to_string()).clicked() {
                        state.selected = Some(tick_row.index);
                    }
                });
                row.col(|ui| {
                    ui.label(tick_row.price.to_string());
                });
                row.col(|ui| {
                    ui.colored_label(color, tick_row.reserve_a.round_dp(6).to_string());
                });
                row.col(|ui| {
                    ui.colored_label(color, tick_row.reserve_b.round_dp(6).to_string());
                });
            });
        });
}
