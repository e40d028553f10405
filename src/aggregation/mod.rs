//! Aggregation layer: shaping transforms and the overview pipeline.

mod overview;
mod shaping;

pub use overview::{build_overview_report, LoadError, OverviewMetrics, OverviewReport};
pub use shaping::{bar_chart_order, daily_series, grid_rows, grid_slots, GridSlot};
