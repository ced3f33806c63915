//! Control Panel Widget
//! Top panel with page title, introduction, data source and status banner.

use crate::pipeline::RenderModel;
use egui::{Color32, RichText};
use std::path::{Path, PathBuf};

const SUCCESS_COLOR: Color32 = Color32::from_rgb(40, 167, 69);
const ERROR_COLOR: Color32 = Color32::from_rgb(220, 53, 69);

/// Outcome notification shown under the page header.
#[derive(Debug, Clone, PartialEq)]
pub enum Banner {
    None,
    Success(String),
    Error(String),
}

impl Banner {
    pub fn loaded(model: &RenderModel) -> Self {
        let mut text = format!(
            "Data loaded successfully! {}",
            plural(model.row_count(), "transaction", "transactions")
        );
        if model.dropped_rows() > 0 {
            text.push_str(&format!(
                ", {} skipped for a non-numeric Value or Time",
                plural(model.dropped_rows(), "row", "rows")
            ));
        }
        text.push('.');
        Banner::Success(text)
    }

    pub fn failed(error: &impl std::fmt::Display) -> Self {
        Banner::Error(format!("Error: {}", error))
    }
}

fn plural(count: usize, one: &str, many: &str) -> String {
    format!("{} {}", count, if count == 1 { one } else { many })
}

/// Page header with the data source and the load banner.
pub struct ControlPanel {
    pub page_title: String,
    pub intro: String,
    pub source: PathBuf,
    pub banner: Banner,
}

impl ControlPanel {
    pub fn new(page_title: &str, intro: &str, source: &Path) -> Self {
        Self {
            page_title: page_title.to_string(),
            intro: intro.to_string(),
            source: source.to_path_buf(),
            banner: Banner::None,
        }
    }

    /// Draw the panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.add_space(8.0);
        ui.label(RichText::new(&self.page_title).size(26.0).strong());
        ui.add_space(4.0);
        ui.label(RichText::new(&self.intro).size(13.0));
        ui.add_space(10.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new("📁 Data Source").size(13.0).strong());
                    ui.label(RichText::new(self.source.display().to_string()).size(12.0));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseCsv;
                        }
                    });
                });
            });

        ui.add_space(8.0);
        self.show_banner(ui);
        ui.add_space(8.0);

        action
    }

    fn show_banner(&self, ui: &mut egui::Ui) {
        let (text, color) = match &self.banner {
            Banner::None => return,
            Banner::Success(text) => (text, SUCCESS_COLOR),
            Banner::Error(text) => (text, ERROR_COLOR),
        };

        egui::Frame::none()
            .rounding(5.0)
            .stroke(egui::Stroke::new(1.5, color))
            .fill(color.gamma_multiply(0.15))
            .inner_margin(10.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(RichText::new(text).size(14.0).color(color));
            });
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
}
