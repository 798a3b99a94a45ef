use eframe::egui;
use rust_decimal::Decimal;
use std::path::PathBuf;

use crate::chart::{RangeDragController, TickDragController};
use crate::config::{AppSettings, Settings};
use crate::data::{save_snapshot, FeeTiers, TickSnapshot};
use crate::selector::{LiquiditySelector, SelectorInput};
use super::{show_tick_table, SelectorPanel, SelectorState, SelectorTheme};

pub struct SelectorApp {
    settings: Settings,
    app_settings: AppSettings,
    selector: LiquiditySelector,
    panel: SelectorPanel,
    state: SelectorState,

    // Upstream data
    snapshot: TickSnapshot,
    snapshot_path: Option<PathBuf>,

    status: Option<String>,
}

impl SelectorApp {
    pub fn new(settings: Settings, app_settings: AppSettings, snapshot: TickSnapshot) -> Self {
        let tick_drag = TickDragController::new(app_settings.permissions)
            .with_speed_factor(settings.drag.speed_factor)
            .with_price_significant_digits(settings.drag.price_significant_digits);
        let range_drag = RangeDragController::new(settings.drag.price_significant_digits);

        Self {
            selector: settings.selector(),
            panel: SelectorPanel::new(tick_drag, range_drag),
            state: SelectorState::new(snapshot.user_ticks.clone()),
            snapshot_path: settings.data.snapshot_path.clone(),
            snapshot,
            settings,
            app_settings,
            status: None,
        }
    }

    fn current_price(&self) -> Decimal {
        self.snapshot.current_price.unwrap_or(self.settings.market.current_price)
    }

    fn draw_controls(&mut self, ui: &mut egui::Ui) {
        let mut changed = false;

        ui.horizontal(|ui| {
            changed |= ui.checkbox(&mut self.app_settings.view.advanced, "Advanced").changed();
            changed |= ui
                .checkbox(&mut self.app_settings.view.focus_user_ticks, "Focus on my ticks")
                .changed();

            ui.separator();

            let selected_label = self
                .app_settings
                .view
                .fee_tier
                .map(FeeTiers::label)
                .unwrap_or_else(|| "All fees".to_string());
            egui::ComboBox::from_label("Fee tier")
                .selected_text(selected_label)
                .show_ui(ui, |ui| {
                    changed |= ui
                        .selectable_value(&mut self.app_settings.view.fee_tier, None, "All fees")
                        .changed();
                    for tier in self.selector.fee_tiers().tiers.clone() {
                        changed |= ui
                            .selectable_value(&mut self.app_settings.view.fee_tier, Some(tier), FeeTiers::label(tier))
                            .changed();
                    }
                });

            ui.separator();

            let permissions = &mut self.app_settings.permissions;
            changed |= ui.checkbox(&mut permissions.can_move_up, "Move up").changed();
            changed |= ui.checkbox(&mut permissions.can_move_down, "Move down").changed();
            changed |= ui.checkbox(&mut permissions.can_move_x, "Move price").changed();
        });

        ui.horizontal(|ui| {
            if !self.app_settings.view.advanced {
                ui.label("Min");
                if ui.text_edit_singleline(&mut self.state.range_min).lost_focus() {
                    self.state.mark_range_dirty();
                }
                ui.label("Max");
                if ui.text_edit_singleline(&mut self.state.range_max).lost_focus() {
                    self.state.mark_range_dirty();
                }
                ui.separator();
            }

            if ui.button("Commit edits").clicked() {
                self.state.commit_edits();
            }
            if ui.button("Reset edits").clicked() {
                self.state.reset_edits();
            }
            if ui
                .add_enabled(self.state.selected.is_some(), egui::Button::new("Delete tick"))
                .clicked()
            {
                if let Some(tick) = self.state.delete_selected() {
                    tracing::info!("Deleted user tick at price {}", tick.price);
                }
            }
            if ui
                .add_enabled(self.snapshot_path.is_some(), egui::Button::new("Save snapshot"))
                .clicked()
            {
                self.save();
            }

            if let Some(tick) = self.state.selected_tick() {
                ui.separator();
                ui.label(format!(
                    "Selected: {} @ {} ({} / {})",
                    tick.token_a.symbol, tick.price, tick.reserve_a, tick.reserve_b
                ));
            }
        });

        if changed {
            self.panel.set_permissions(self.app_settings.permissions);
            self.app_settings.auto_save();
        }
    }

    fn save(&mut self) {
        let Some(path) = self.snapshot_path.clone() else {
            return;
        };

        let snapshot = TickSnapshot {
            ticks: self.snapshot.ticks.clone(),
            user_ticks: self.state.user_ticks.clone(),
            current_price: self.snapshot.current_price,
            saved_at: Some(chrono::Utc::now()),
        };
        self.status = Some(match save_snapshot(&path, &snapshot) {
            Ok(()) => format!(
                "Saved to {} at {}",
                path.display(),
                chrono::Local::now().format("%H:%M:%S")
            ),
            Err(e) => {
                tracing::warn!("Failed to save snapshot: {}", e);
                format!("Save failed: {}", e)
            }
        });
    }

    fn draw_selector(&mut self, ui: &mut egui::Ui) {
        let current_price = self.current_price();
        if self.state.reseed(current_price) {
            self.status = Some(format!("Range {} - {}", self.state.range_min, self.state.range_max));
        }

        let size = ui.available_size();
        let view = {
            let input = SelectorInput {
                ticks: &self.snapshot.ticks,
                token_a: &self.settings.market.token_a,
                token_b: &self.settings.market.token_b,
                fee_tier: self.app_settings.view.fee_tier,
                current_price: Some(current_price),
                width: size.x as f64,
                height: size.y as f64,
                user_ticks: &self.state.user_ticks,
                background_ticks: &self.state.background_ticks,
                selected: self.state.selected,
                focus_user_ticks: self.app_settings.view.focus_user_ticks,
                advanced: self.app_settings.view.advanced,
            };
            self.selector.view(&input)
        };

        self.panel.show(ui, &view, &mut self.state);
    }
}

impl eframe::App for SelectorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        SelectorTheme::apply_dark_theme(ctx);

        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.add_space(4.0);
            self.draw_controls(ui);
            ui.add_space(4.0);
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!(
                    "{}/{} @ {}",
                    self.settings.market.token_a.symbol,
                    self.settings.market.token_b.symbol,
                    self.current_price()
                ));
                ui.label(format!("{} ticks", self.snapshot.ticks.len()));
                if let Some(status) = &self.status {
                    ui.separator();
                    ui.label(status);
                }
            });
        });

        egui::SidePanel::right("user_ticks")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| {
                ui.heading("My ticks");
                ui.separator();
                show_tick_table(ui, &mut self.state);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_selector(ui);
        });

        if self.panel.is_dragging() {
            ctx.request_repaint();
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.app_settings.auto_save();
        tracing::info!("Application shutting down");
    }
}
