//! Charts module - chart descriptions and rendering

mod figure;
mod plotter;

pub use figure::{AddressType, BarChartSpec, ChartBuilder, LineChartSpec, PanelChartSpec};
pub use plotter::ChartPlotter;
