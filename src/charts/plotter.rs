//! Chart Plotter Module
//! Draws chart descriptions interactively using egui_plot.

use crate::charts::figure::{abbreviate_address, BarChartSpec, LineChartSpec, PanelChartSpec};
use chrono::DateTime;
use egui::epaint::TextShape;
use egui::{Align2, FontId, RichText, Sense};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoint, PlotPoints, Points};

const BAR_CHART_HEIGHT: f32 = 320.0;
const LINE_CHART_HEIGHT: f32 = 340.0;
const BAR_WIDTH: f64 = 0.7;
const LABEL_FONT_SIZE: f32 = 11.0;

/// Draws the dashboard charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Draw a categorical bar chart. Hidden series are skipped entirely.
    pub fn draw_bar_chart(ui: &mut egui::Ui, id: &str, spec: &BarChartSpec) {
        ui.label(RichText::new(&spec.title).size(15.0).strong());

        let categories: Vec<String> = spec
            .visible_series()
            .next()
            .map(|s| s.categories.clone())
            .unwrap_or_default();

        let mut plot = Plot::new(id)
            .height(BAR_CHART_HEIGHT)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .include_y(0.0)
            .y_axis_label(spec.y_title.as_str())
            .x_axis_formatter(|_mark, _range| String::new());
        if spec.show_legend {
            plot = plot.legend(Legend::default());
        }

        let response = plot.show(ui, |plot_ui| {
            for series in spec.visible_series() {
                let bars: Vec<Bar> = series
                    .categories
                    .iter()
                    .zip(series.values.iter())
                    .enumerate()
                    .map(|(i, (address, &value))| {
                        Bar::new(i as f64, value)
                            .width(BAR_WIDTH)
                            .name(address)
                            .fill(series.color)
                    })
                    .collect();

                plot_ui.bar_chart(BarChart::new(bars).color(series.color).name(&series.name));
            }
        });

        Self::draw_category_labels(ui, &response.transform, &categories, spec.tick_angle);
        ui.vertical_centered(|ui| {
            ui.label(RichText::new(&spec.x_title).size(12.0));
        });
    }

    /// Draw panels side by side; each panel keeps its own y-scale.
    pub fn draw_panel_chart(ui: &mut egui::Ui, id: &str, spec: &PanelChartSpec) {
        ui.vertical_centered(|ui| {
            ui.label(RichText::new(&spec.title).size(16.0).strong());
        });
        ui.add_space(6.0);

        ui.columns(spec.panels.len().max(1), |columns| {
            for (i, (column, panel)) in columns.iter_mut().zip(spec.panels.iter()).enumerate() {
                Self::draw_bar_chart(column, &format!("{}_{}", id, i), panel);
            }
        });
    }

    /// Draw a line-and-marker chart over hourly timestamps.
    pub fn draw_line_chart(ui: &mut egui::Ui, id: &str, spec: &LineChartSpec) {
        ui.label(RichText::new(&spec.title).size(15.0).strong());

        let points: Vec<[f64; 2]> = spec
            .points
            .iter()
            .map(|p| [p.time.timestamp() as f64, p.value])
            .collect();

        Plot::new(id)
            .height(LINE_CHART_HEIGHT)
            .allow_scroll(false)
            .include_y(0.0)
            .x_axis_label(spec.x_title.as_str())
            .y_axis_label(spec.y_title.as_str())
            .x_axis_formatter(|mark, _range| Self::format_timestamp(mark.value))
            .label_formatter(|name, value| {
                format!("{}\n{}: {:.0}", Self::format_timestamp(value.x), name, value.y)
            })
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                if points.is_empty() {
                    return;
                }

                plot_ui.line(
                    Line::new(PlotPoints::from_iter(points.iter().copied()))
                        .color(spec.color)
                        .width(2.0)
                        .name(&spec.series_name),
                );

                if spec.markers {
                    plot_ui.points(
                        Points::new(PlotPoints::from_iter(points.iter().copied()))
                            .radius(3.5)
                            .color(spec.color),
                    );
                }
            });
    }

    /// Paint category labels under the plot, rotated by `angle` degrees.
    fn draw_category_labels(
        ui: &mut egui::Ui,
        transform: &egui_plot::PlotTransform,
        categories: &[String],
        angle: f32,
    ) {
        let band_height = if angle.abs() > f32::EPSILON { 70.0 } else { 20.0 };
        let size = egui::vec2(ui.available_width(), band_height);
        let (rect, _) = ui.allocate_exact_size(size, Sense::hover());
        let painter = ui.painter_at(rect);
        let color = ui.visuals().text_color();

        for (i, category) in categories.iter().enumerate() {
            let anchor = transform.position_from_point(&PlotPoint::new(i as f64, 0.0));
            let text = abbreviate_address(category);

            if angle.abs() > f32::EPSILON {
                let galley =
                    painter.layout_no_wrap(text, FontId::proportional(LABEL_FONT_SIZE), color);
                let pos = egui::pos2(anchor.x, rect.top() + 2.0);
                painter.add(TextShape::new(pos, galley, color).with_angle(angle.to_radians()));
            } else {
                painter.text(
                    egui::pos2(anchor.x, rect.top() + 2.0),
                    Align2::CENTER_TOP,
                    text,
                    FontId::proportional(LABEL_FONT_SIZE),
                    color,
                );
            }
        }
    }

    fn format_timestamp(seconds: f64) -> String {
        DateTime::from_timestamp(seconds as i64, 0)
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default()
    }
}
