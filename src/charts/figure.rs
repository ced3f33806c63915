//! Chart Descriptions
//! Renderable, UI-independent descriptions of the three dashboard charts.

use crate::data::{AddressCount, AddressRole, AddressValue, HourlyBucket};
use chrono::{DateTime, Utc};
use egui::Color32;

pub const STEEL_BLUE: Color32 = Color32::from_rgb(70, 130, 180);
pub const DARK_ORANGE: Color32 = Color32::from_rgb(255, 140, 0);
pub const FIREBRICK: Color32 = Color32::from_rgb(178, 34, 34);
pub const FOREST_GREEN: Color32 = Color32::from_rgb(34, 139, 34);
pub const LINE_BLUE: Color32 = Color32::from_rgb(99, 110, 250);

/// Which top-address series the active-address chart shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressType {
    #[default]
    Sender,
    Receiver,
}

impl AddressType {
    pub const ALL: [AddressType; 2] = [AddressType::Sender, AddressType::Receiver];

    pub fn label(self) -> &'static str {
        match self {
            AddressType::Sender => "Sender",
            AddressType::Receiver => "Receiver",
        }
    }

    fn plural(self) -> &'static str {
        match self {
            AddressType::Sender => "Senders",
            AddressType::Receiver => "Receivers",
        }
    }
}

impl From<AddressType> for AddressRole {
    fn from(kind: AddressType) -> Self {
        match kind {
            AddressType::Sender => AddressRole::Sender,
            AddressType::Receiver => AddressRole::Receiver,
        }
    }
}

/// One bar series over categorical addresses.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    pub name: String,
    pub color: Color32,
    pub categories: Vec<String>,
    pub values: Vec<f64>,
    pub visible: bool,
}

impl BarSeries {
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Bar chart with a category x-axis.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChartSpec {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    /// Category label rotation in degrees, clockwise.
    pub tick_angle: f32,
    pub show_legend: bool,
    pub series: Vec<BarSeries>,
}

impl BarChartSpec {
    /// Series that should actually be drawn.
    pub fn visible_series(&self) -> impl Iterator<Item = &BarSeries> {
        self.series.iter().filter(|s| s.visible)
    }

    pub fn has_data(&self) -> bool {
        self.visible_series().any(|s| !s.is_empty())
    }
}

/// Side-by-side bar panels sharing one title, each with its own y-scale.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelChartSpec {
    pub title: String,
    pub panels: Vec<BarChartSpec>,
}

/// Point on the hourly line.
#[derive(Debug, Clone, PartialEq)]
pub struct TimePoint {
    pub time: DateTime<Utc>,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineChartSpec {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub series_name: String,
    pub color: Color32,
    pub markers: bool,
    pub points: Vec<TimePoint>,
}

impl LineChartSpec {
    pub fn has_data(&self) -> bool {
        !self.points.is_empty()
    }
}

/// Builds chart descriptions from aggregation results.
pub struct ChartBuilder;

impl ChartBuilder {
    /// Active-address bars; only the `selected` series is visible.
    pub fn active_addresses(
        senders: &[AddressCount],
        receivers: &[AddressCount],
        selected: AddressType,
        top_n: usize,
    ) -> BarChartSpec {
        let series = |kind: AddressType, color: Color32, counts: &[AddressCount]| BarSeries {
            name: kind.label().to_string(),
            color,
            categories: counts.iter().map(|c| c.address.clone()).collect(),
            values: counts.iter().map(|c| c.count as f64).collect(),
            visible: kind == selected,
        };

        BarChartSpec {
            title: format!("Top {} {}", top_n, selected.plural()),
            x_title: "Address".to_string(),
            y_title: "Transaction Count".to_string(),
            tick_angle: 0.0,
            show_legend: false,
            series: vec![
                series(AddressType::Sender, STEEL_BLUE, senders),
                series(AddressType::Receiver, DARK_ORANGE, receivers),
            ],
        }
    }

    /// Pay vs. receive totals as two panels.
    pub fn value_comparison(
        payers: &[AddressValue],
        payees: &[AddressValue],
        top_n: usize,
    ) -> PanelChartSpec {
        let panel = |title: String, name: &str, color: Color32, totals: &[AddressValue]| {
            BarChartSpec {
                title,
                x_title: "Address".to_string(),
                y_title: "Total Value".to_string(),
                tick_angle: 45.0,
                show_legend: false,
                series: vec![BarSeries {
                    name: name.to_string(),
                    color,
                    categories: totals.iter().map(|t| t.address.clone()).collect(),
                    values: totals.iter().map(|t| t.total).collect(),
                    visible: true,
                }],
            }
        };

        PanelChartSpec {
            title: "Total Transaction Value by Address (Pay vs. Receive)".to_string(),
            panels: vec![
                panel(
                    format!("Top {} Paying Addresses", top_n),
                    "Pay Value",
                    FIREBRICK,
                    payers,
                ),
                panel(
                    format!("Top {} Receiving Addresses", top_n),
                    "Receive Value",
                    FOREST_GREEN,
                    payees,
                ),
            ],
        }
    }

    pub fn hourly_trend(buckets: &[HourlyBucket]) -> LineChartSpec {
        LineChartSpec {
            title: "Hourly Transactions".to_string(),
            x_title: "Date".to_string(),
            y_title: "Number of Transactions".to_string(),
            series_name: "Transaction Count".to_string(),
            color: LINE_BLUE,
            markers: true,
            points: buckets
                .iter()
                .map(|b| TimePoint {
                    time: b.hour,
                    value: b.count as f64,
                })
                .collect(),
        }
    }
}

/// Shorten a long address to `head…tail` for axis labels.
pub fn abbreviate_address(address: &str) -> String {
    const HEAD: usize = 6;
    const TAIL: usize = 4;

    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= HEAD + TAIL + 1 {
        return address.to_string();
    }
    let head: String = chars[..HEAD].iter().collect();
    let tail: String = chars[chars.len() - TAIL..].iter().collect();
    format!("{}…{}", head, tail)
}
