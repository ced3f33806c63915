//! Chart Viewer Widget
//! Scrollable page with the three chart sections stacked vertically.

use crate::charts::{AddressType, ChartPlotter};
use crate::pipeline::RenderModel;
use egui::{ComboBox, RichText, ScrollArea};

const SECTION_SPACING: f32 = 20.0;

/// Draws the dashboard sections for a loaded model.
#[derive(Default)]
pub struct ChartViewer;

impl ChartViewer {
    pub fn new() -> Self {
        Self
    }

    /// Draw every section. The selector mutates only the model's toggle state.
    pub fn show(&mut self, ui: &mut egui::Ui, model: &mut RenderModel) {
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                let header = format!("Top {} Active Addresses", model.top_n());
                Self::section_header(ui, &header);
                Self::address_selector(ui, model);
                ChartPlotter::draw_bar_chart(
                    ui,
                    "active_addresses",
                    &model.active_addresses_chart(),
                );
                ui.add_space(SECTION_SPACING);

                Self::section_header(ui, "Total Transaction Value by Address");
                ChartPlotter::draw_panel_chart(ui, "value_by_address", &model.value_chart());
                ui.add_space(SECTION_SPACING);

                Self::section_header(ui, "Hourly Transaction Count Over Time");
                ChartPlotter::draw_line_chart(ui, "hourly_volume", &model.hourly_chart());
                ui.add_space(SECTION_SPACING);
            });
    }

    fn section_header(ui: &mut egui::Ui, text: &str) {
        ui.separator();
        ui.label(RichText::new(text).size(20.0).strong());
        ui.add_space(6.0);
    }

    fn address_selector(ui: &mut egui::Ui, model: &mut RenderModel) {
        let mut selected = model.address_type();

        ui.horizontal(|ui| {
            ui.label("Select Address Type:");
            ComboBox::from_id_salt("address_type")
                .width(150.0)
                .selected_text(selected.label())
                .show_ui(ui, |ui| {
                    for kind in AddressType::ALL {
                        ui.selectable_value(&mut selected, kind, kind.label());
                    }
                });
        });

        model.select(selected);
    }
}
