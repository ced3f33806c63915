//! Transaction Dashboard - top addresses, value movers and hourly volume
//!
//! Reads a transaction log once and renders three aggregate charts.

mod app_config;
mod charts;
mod data;
mod gui;
mod pipeline;

use app_config::DashboardConfig;
use eframe::egui;
use gui::DashboardApp;
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> anyhow::Result<()> {
    let config = DashboardConfig::load();
    let level = config
        .as_ref()
        .map(DashboardConfig::tracing_level)
        .unwrap_or(tracing::Level::INFO);

    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = config.unwrap_or_else(|e| {
        warn!(error = %e, "invalid dashboard.toml, using defaults");
        DashboardConfig::default()
    });
    info!(source = %config.source.display(), top_n = config.top_n, "starting dashboard");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([1000.0, 700.0])
            .with_title(config.page_title.as_str()),
        ..Default::default()
    };

    let title = config.page_title.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, &config)))),
    )
    .map_err(|e| anyhow::anyhow!("failed to start dashboard window: {}", e))
}
