//! Render-ready dashboard models: the role-gated navigation bar and the
//! summary chart datasets.

mod charts;
mod nav;

pub use charts::{ChartKind, ChartOptions, ChartSpec, Dataset, Paint, SummaryCharts, NO_DATA_MESSAGE};
pub use nav::{NavItem, NavMenu, RenderedItem, RenderedNav, BRAND, DEFAULT_ITEMS};
