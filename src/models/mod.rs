//! Models for revenue reporting rows and derived aggregates.

mod usage_record;

pub use usage_record::{DailyTotal, GroupSummary, GroupTimeSeries, UsageRecord};
