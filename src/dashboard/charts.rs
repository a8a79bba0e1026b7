//! Chart datasets for the summary page.
//!
//! Pure data: labels, series and display options in the shape common
//! chart libraries accept as JSON. Drawing is the host's business.

use serde::Serialize;

use crate::inventory::Product;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Pie,
}

/// One colour or a per-point palette.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Paint {
    Single(String),
    Palette(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
    pub background_color: Paint,
    pub border_color: Paint,
    pub border_width: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub responsive: bool,
    pub legend_position: &'static str,
    pub title: String,
    pub y_begin_at_zero: bool,
    /// Tick label template: `{}` is replaced with the value at two decimals.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_tick_format: Option<&'static str>,
}

impl ChartOptions {
    fn titled(title: &str) -> Self {
        Self { responsive: true, legend_position: "top", title: title.to_string(), y_begin_at_zero: false, y_tick_format: None }
    }

    pub fn format_tick(&self, value: f64) -> String {
        match self.y_tick_format {
            Some(tpl) => tpl.replace("{}", &format!("{:.2}", value)),
            None => value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
    pub options: ChartOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryCharts {
    pub inventory: ChartSpec,
    pub distribution: ChartSpec,
    pub financial: ChartSpec,
}

pub const NO_DATA_MESSAGE: &str = "No data available for charts";

// (r, g, b): blue, red, green, amber, purple, pink
const PALETTE: [(u8, u8, u8); 6] = [
    (59, 130, 246),
    (239, 68, 68),
    (34, 197, 94),
    (245, 158, 11),
    (147, 51, 234),
    (236, 72, 153),
];
const BLUE: (u8, u8, u8) = PALETTE[0];
const RED: (u8, u8, u8) = PALETTE[1];
const GREEN: (u8, u8, u8) = PALETTE[2];
const AMBER: (u8, u8, u8) = PALETTE[3];

fn rgba((r, g, b): (u8, u8, u8), alpha: f32) -> String { format!("rgba({}, {}, {}, {})", r, g, b, alpha) }
fn rgb((r, g, b): (u8, u8, u8)) -> String { format!("rgb({}, {}, {})", r, g, b) }

fn bar_series(label: &str, data: Vec<f64>, colour: (u8, u8, u8)) -> Dataset {
    Dataset {
        label: label.to_string(),
        data,
        background_color: Paint::Single(rgba(colour, 0.5)),
        border_color: Paint::Single(rgb(colour)),
        border_width: 1,
    }
}

fn finite_or_zero(v: f64) -> f64 { if v.is_finite() { v } else { 0.0 } }

impl SummaryCharts {
    /// `None` when there is nothing to plot.
    pub fn from_products(products: &[Product]) -> Option<Self> {
        if products.is_empty() { return None; }
        let labels: Vec<String> = products.iter().map(|p| p.name.clone()).collect();
        let series = |f: fn(&Product) -> f64| products.iter().map(|p| finite_or_zero(f(p))).collect::<Vec<f64>>();

        let inventory = ChartSpec {
            kind: ChartKind::Bar,
            labels: labels.clone(),
            datasets: vec![
                bar_series("Added Quantity", series(|p| p.total_added_qty as f64), BLUE),
                bar_series("Sold Quantity", series(|p| p.total_sold_qty as f64), RED),
                bar_series("Available Stock", series(|p| p.available_stock as f64), GREEN),
            ],
            options: ChartOptions::titled("Inventory Overview"),
        };

        // palette cycles when there are more products than colours
        let palette: Vec<(u8, u8, u8)> = (0..products.len()).map(|i| PALETTE[i % PALETTE.len()]).collect();
        let distribution = ChartSpec {
            kind: ChartKind::Pie,
            labels: labels.clone(),
            datasets: vec![Dataset {
                label: "Available Stock Distribution".to_string(),
                data: series(|p| p.available_stock as f64),
                background_color: Paint::Palette(palette.iter().map(|c| rgba(*c, 0.8)).collect()),
                border_color: Paint::Palette(palette.iter().map(|c| rgb(*c)).collect()),
                border_width: 2,
            }],
            options: ChartOptions::titled("Stock Distribution"),
        };

        let financial = ChartSpec {
            kind: ChartKind::Bar,
            labels,
            datasets: vec![
                bar_series("Added Value ($)", series(|p| p.total_added_amount), GREEN),
                bar_series("Revenue ($)", series(|p| p.total_sold_amount), AMBER),
            ],
            options: ChartOptions { y_begin_at_zero: true, y_tick_format: Some("${}"), ..ChartOptions::titled("Financial Overview ($)") },
        };

        Some(Self { inventory, distribution, financial })
    }
}
