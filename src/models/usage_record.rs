//! Row models for the pre-aggregated revenue table.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};


/// A single row of the `corporate_rr` source table.
///
/// Each row is one day of pre-aggregated consumption for one group rollup.
/// `snowflake_group_rollup` is nullable upstream; rows without a label stay
/// in the table but never appear in group-keyed aggregates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageRecord {
    #[serde(alias = "USAGE_DATE")]
    pub usage_date: NaiveDate,
    #[serde(alias = "SNOWFLAKE_GROUP_ROLLUP", default)]
    pub snowflake_group_rollup: Option<String>,
    #[serde(alias = "TOTAL_CREDITS")]
    pub total_credits: f64,
    #[serde(alias = "ANNUAL_RR_CREDITS")]
    pub annual_rr_credits: f64,
    #[serde(alias = "ANNUAL_RR_DOLLARS")]
    pub annual_rr_dollars: f64,
}


impl UsageRecord {
    /// Get date string in YYYY-MM-DD format for storage.
    pub fn date_key(&self) -> String {
        self.usage_date.format("%Y-%m-%d").to_string()
    }
}


/// One point of the daily total-credits trend.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyTotal {
    pub usage_date: NaiveDate,
    pub total_daily_credits: f64,
}


/// Windowed per-group aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub group_label: String,
    pub total_credits: f64,
    pub annualized_rr_credits: f64,
    pub annualized_rr_dollars: f64,
}


/// Full-year time series for one group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupTimeSeries {
    pub group_label: String,
    pub dates: Vec<NaiveDate>,
    pub values: Vec<f64>,
}


#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> UsageRecord {
        UsageRecord {
            usage_date: NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
            snowflake_group_rollup: Some("Studios".to_string()),
            total_credits: 120.5,
            annual_rr_credits: 1446.0,
            annual_rr_dollars: 4338.0,
        }
    }

    #[test]
    fn test_date_key() {
        let record = sample_record();
        assert_eq!(record.date_key(), "2024-06-15");
    }

    #[test]
    fn test_jsonl_round_trip() {
        let record = sample_record();
        let json = serde_json::to_string(&record).unwrap();
        let parsed: UsageRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.usage_date, record.usage_date);
        assert_eq!(parsed.snowflake_group_rollup, record.snowflake_group_rollup);
    }
}
