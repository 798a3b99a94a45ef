use eframe::egui;
use tracing::{info, warn};

use liquidity_selector::config::{AppSettings, Settings};
use liquidity_selector::data::{load_snapshot, TickSnapshot};
use liquidity_selector::gui::SelectorApp;

fn main() -> anyhow::Result<()> {
    let settings = Settings::new()?;

    tracing_subscriber::fmt()
        .with_max_level(settings.log_level())
        .init();
    info!("Starting Liquidity Selector");

    let app_settings = AppSettings::load();

    let snapshot = match &settings.data.snapshot_path {
        Some(path) if path.exists() => load_snapshot(path).unwrap_or_else(|e| {
            warn!("Starting without ticks: {}", e);
            TickSnapshot::default()
        }),
        Some(path) => {
            warn!("Tick snapshot {:?} not found, starting empty", path);
            TickSnapshot::default()
        }
        None => TickSnapshot::default(),
    };

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([
                app_settings.ui.window_width.unwrap_or(1100.0),
                app_settings.ui.window_height.unwrap_or(640.0),
            ])
            .with_title("Liquidity Selector"),
        ..Default::default()
    };

    eframe::run_native(
        "Liquidity Selector",
        native_options,
        Box::new(|_cc| Box::new(SelectorApp::new(settings, app_settings, snapshot))),
    )
    .map_err(|e| anyhow::anyhow!("GUI error: {}", e))?;

    info!("Liquidity Selector stopped");
    Ok(())
}
