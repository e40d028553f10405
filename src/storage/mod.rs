//! Storage layer for the revenue database.

mod database;

pub use database::{
    daily_totals,
    escape_label,
    group_summaries,
    group_time_series,
    init_database,
    load_failure_hints,
    max_usage_date,
    open_database,
    save_records,
    total_annualized_dollars,
};
