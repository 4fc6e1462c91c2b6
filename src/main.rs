mod app;
mod color;
mod config;
mod data;
mod error;
mod state;
mod ui;

use anyhow::Context;
use app::ReelDashApp;
use config::DashboardConfig;
use eframe::egui;
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = DashboardConfig::from_env();
    log::info!("Using dataset {}", config.data_path.display());

    // Without the table no dashboard can render.
    let mut state = AppState::new(config);
    if let Err(e) = state.load_configured() {
        log::error!("{e:#}");
        return Err(e).context("loading movie dataset");
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([900.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Netflix Interactive Dashboard",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
            Ok(Box::new(ReelDashApp::new(state)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {e}"))
}
