//! Dashboard Main Application
//! Hosts the pipeline: one run per source file, redraws reuse the result.

use crate::app_config::DashboardConfig;
use crate::gui::{Banner, ChartViewer, ControlPanel, ControlPanelAction};
use crate::pipeline::{self, RenderModel};
use egui::{RichText, TopBottomPanel};
use std::path::PathBuf;
use tracing::{error, info};

/// Main application window.
pub struct DashboardApp {
    top_n: usize,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
    model: Option<RenderModel>,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: &DashboardConfig) -> Self {
        let mut app = Self {
            top_n: config.top_n,
            control_panel: ControlPanel::new(&config.page_title, &config.intro, &config.source),
            chart_viewer: ChartViewer::new(),
            model: None,
        };
        app.load(config.source.clone());
        app
    }

    /// Run the pipeline against `source`. A failure clears every chart.
    fn load(&mut self, source: PathBuf) {
        self.control_panel.source = source.clone();

        match pipeline::run(&source, self.top_n) {
            Ok(model) => {
                info!(
                    path = %model.source().display(),
                    senders = model.aggregates().top_senders.len(),
                    receivers = model.aggregates().top_receivers.len(),
                    "dashboard ready"
                );
                self.control_panel.banner = Banner::loaded(&model);
                self.model = Some(model);
            }
            Err(e) => {
                error!(path = %source.display(), error = %e, "dashboard run halted");
                self.control_panel.banner = Banner::failed(&e);
                self.model = None;
            }
        }
    }

    /// Handle CSV file selection
    fn handle_browse_csv(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.load(path);
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        TopBottomPanel::top("control_panel").show(ctx, |ui| {
            if self.control_panel.show(ui) == ControlPanelAction::BrowseCsv {
                self.handle_browse_csv();
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| match self.model.as_mut() {
            Some(model) => self.chart_viewer.show(ui, model),
            None => {
                ui.centered_and_justified(|ui| {
                    ui.label(RichText::new("No Data").size(20.0));
                });
            }
        });
    }
}
