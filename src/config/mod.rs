//! Configuration and settings for rr-overview.

mod settings;

pub use settings::{
    get_db_path,
    DAILY_TREND_START,
    DEFAULT_REFRESH_INTERVAL,
    GRID_COLS,
    SERIES_WINDOW_DAYS,
    SOURCE_TABLE,
    SUMMARY_WINDOW_DAYS,
    TOP_GROUPS,
};
