//! Visualization layer for the terminal dashboard and chart export.

pub mod dashboard;
mod export;

pub use dashboard::{render_error, render_live_notice, render_report};
pub use export::{export_overview_png, export_overview_svg, open_file};
