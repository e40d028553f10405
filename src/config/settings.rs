//! Application settings and path constants.

use std::path::PathBuf;


/// Refresh interval for the live dashboard (seconds).
pub const DEFAULT_REFRESH_INTERVAL: u64 = 5;

/// Name of the source table holding pre-aggregated revenue rows.
pub const SOURCE_TABLE: &str = "corporate_rr";

/// Trailing window for the summary metrics and the top-10 ranking (days).
pub const SUMMARY_WINDOW_DAYS: i64 = 30;

/// Trailing window for the per-group time series (days).
pub const SERIES_WINDOW_DAYS: i64 = 365;

/// Number of groups shown in the bar chart and the small-multiples grid.
pub const TOP_GROUPS: usize = 10;

/// Columns in the small-multiples grid.
pub const GRID_COLS: usize = 2;

/// The daily trend always starts at this literal date, not a trailing window.
pub const DAILY_TREND_START: &str = "2024-01-01";


/// Get the database path.
pub fn get_db_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".rr-overview")
        .join("revenue.db")
}
