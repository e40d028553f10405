//! The overview pipeline: every query, in order, inside one error boundary.

use chrono::{Duration, NaiveDate};
use rusqlite::Connection;
use thiserror::Error;

use crate::config::{
    DAILY_TREND_START, SERIES_WINDOW_DAYS, SOURCE_TABLE, SUMMARY_WINDOW_DAYS, TOP_GROUPS,
};
use crate::models::{GroupSummary, GroupTimeSeries};
use crate::storage;

use super::shaping::{self, GridSlot};


/// A failed pipeline pass. One catch-all taxonomy: missing table, misnamed
/// columns, an empty table, and permission problems all land here.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no rows found in {SOURCE_TABLE}")]
    NoData,

    #[error(transparent)]
    Sql(#[from] rusqlite::Error),
}


/// Headline metrics for the trailing 30-day window.
#[derive(Debug, Clone, PartialEq)]
pub struct OverviewMetrics {
    pub total_groups: usize,
    pub annualized_rr_dollars: f64,
}


/// Everything one dashboard pass renders, built fresh per invocation.
#[derive(Debug, Clone)]
pub struct OverviewReport {
    /// Newest date anywhere in the table.
    pub max_date: NaiveDate,
    /// Start of the banner window, `max_date - 30 days`.
    pub window_start: NaiveDate,
    /// Daily trend, newest day first (query order, preserved).
    pub daily_dates: Vec<NaiveDate>,
    pub daily_values: Vec<f64>,
    pub metrics: OverviewMetrics,
    /// Top groups by trailing-30-day credits, descending.
    pub top_groups: Vec<GroupSummary>,
    /// Full-year series for each top group with at least one year row,
    /// in top-group order. Parallel to `grid`.
    pub series: Vec<GroupTimeSeries>,
    pub grid: Vec<GridSlot>,
}


impl OverviewReport {
    /// Bar-chart rows, reversed so the largest bar sits at the axis origin.
    pub fn bar_rows(&self) -> Vec<GroupSummary> {
        shaping::bar_chart_order(&self.top_groups)
    }
}


/// Run the full query-and-shape pass.
///
/// Queries are issued strictly in sequence; the per-group loop makes up to
/// ten further round trips. Any failure aborts the rest of the pass, so the
/// caller renders either the whole report or a single error banner.
pub fn build_overview_report(conn: &Connection) -> Result<OverviewReport, LoadError> {
    let max_date = storage::max_usage_date(conn)?.ok_or(LoadError::NoData)?;
    let window_start = max_date - Duration::days(SUMMARY_WINDOW_DAYS);

    let totals = storage::daily_totals(conn, DAILY_TREND_START)?;
    let (daily_dates, daily_values) = shaping::daily_series(&totals);

    let all_groups = storage::group_summaries(conn, SUMMARY_WINDOW_DAYS, None)?;
    let annualized_rr_dollars = storage::total_annualized_dollars(conn, SUMMARY_WINDOW_DAYS)?;
    let metrics = OverviewMetrics {
        total_groups: all_groups.len(),
        annualized_rr_dollars,
    };

    let top_groups = storage::group_summaries(conn, SUMMARY_WINDOW_DAYS, Some(TOP_GROUPS))?;

    let series = assemble_series(&top_groups, |label| {
        storage::group_time_series(conn, label, SERIES_WINDOW_DAYS)
    })?;

    let grid = shaping::grid_slots(series.len(), crate::config::GRID_COLS);

    Ok(OverviewReport {
        max_date,
        window_start,
        daily_dates,
        daily_values,
        metrics,
        top_groups,
        series,
        grid,
    })
}


/// Fetch the year series for each ranked group, one sequential round trip
/// per group. Groups whose fetch comes back empty are dropped, so they never
/// occupy a grid slot.
fn assemble_series<F>(
    top_groups: &[GroupSummary],
    mut fetch: F,
) -> Result<Vec<GroupTimeSeries>, LoadError>
where
    F: FnMut(&str) -> rusqlite::Result<Vec<(NaiveDate, f64)>>,
{
    let mut series = Vec::new();
    for group in top_groups {
        let points = fetch(&group.group_label)?;
        if points.is_empty() {
            continue;
        }

        let (dates, values) = points.into_iter().unzip();
        series.push(GroupTimeSeries {
            group_label: group.group_label.clone(),
            dates,
            values,
        });
    }

    Ok(series)
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;
    use tempfile::TempDir;

    use crate::models::UsageRecord;
    use crate::storage::{init_database, save_records};

    fn record(date: NaiveDate, group: Option<&str>, credits: f64, dollars: f64) -> UsageRecord {
        UsageRecord {
            usage_date: date,
            snowflake_group_rollup: group.map(String::from),
            total_credits: credits,
            annual_rr_credits: credits * 12.0,
            annual_rr_dollars: dollars,
        }
    }

    fn days_ago(n: i64) -> NaiveDate {
        Local::now().date_naive() - Duration::days(n)
    }

    fn seeded_conn(records: &[UsageRecord]) -> (TempDir, Connection) {
        let tmp_dir = TempDir::new().unwrap();
        let db_path = tmp_dir.path().join("test.db");
        init_database(&db_path).unwrap();
        save_records(records, &db_path).unwrap();
        (tmp_dir, Connection::open(db_path).unwrap())
    }

    #[test]
    fn test_two_group_scenario() {
        // A at $100 and B at $50, both only inside the last 30 days.
        let (_tmp, conn) = seeded_conn(&[
            record(days_ago(10), Some("A"), 100.0, 100.0),
            record(days_ago(12), Some("B"), 50.0, 50.0),
        ]);

        let report = build_overview_report(&conn).unwrap();

        assert_eq!(report.max_date, days_ago(10));
        assert_eq!(report.window_start, days_ago(10) - Duration::days(30));

        let labels: Vec<&str> = report
            .top_groups
            .iter()
            .map(|g| g.group_label.as_str())
            .collect();
        assert_eq!(labels, vec!["A", "B"]);

        let bar_labels: Vec<String> = report
            .bar_rows()
            .iter()
            .map(|g| g.group_label.clone())
            .collect();
        assert_eq!(bar_labels, vec!["B", "A"]);

        assert_eq!(report.metrics.total_groups, 2);
        assert_eq!(report.metrics.annualized_rr_dollars, 150.0);

        // Both groups have year rows, so both get a grid slot
        assert_eq!(report.series.len(), 2);
        assert_eq!(report.grid.len(), 2);
    }

    fn summary(label: &str) -> GroupSummary {
        GroupSummary {
            group_label: label.to_string(),
            total_credits: 1.0,
            annualized_rr_credits: 12.0,
            annualized_rr_dollars: 36.0,
        }
    }

    #[test]
    fn test_ranked_group_with_empty_series_is_dropped() {
        // A group can rank in the 30-day top list yet come back empty from
        // the year query when rows disappear between the two round trips.
        let ranked = vec![summary("Fresh"), summary("Stale"), summary("Steady")];

        let series = assemble_series(&ranked, |label| {
            if label == "Stale" {
                Ok(Vec::new())
            } else {
                Ok(vec![(days_ago(5), 10.0)])
            }
        })
        .unwrap();

        let labels: Vec<&str> = series.iter().map(|s| s.group_label.as_str()).collect();
        assert_eq!(labels, vec!["Fresh", "Steady"]);

        // Grid slots cover exactly the surviving series
        let grid = shaping::grid_slots(series.len(), 2);
        assert_eq!(grid.len(), 2);
    }

    #[test]
    fn test_series_fetch_failure_aborts_the_pass() {
        let ranked = vec![summary("A"), summary("B")];

        let result = assemble_series(&ranked, |label| {
            if label == "B" {
                Err(rusqlite::Error::InvalidQuery)
            } else {
                Ok(vec![(days_ago(5), 10.0)])
            }
        });

        assert!(matches!(result, Err(LoadError::Sql(_))));
    }

    #[test]
    fn test_empty_table_takes_failure_path() {
        let (_tmp, conn) = seeded_conn(&[]);

        let err = build_overview_report(&conn).unwrap_err();
        assert!(matches!(err, LoadError::NoData));
    }

    #[test]
    fn test_missing_table_takes_failure_path() {
        let tmp_dir = TempDir::new().unwrap();
        let conn = Connection::open(tmp_dir.path().join("blank.db")).unwrap();

        let err = build_overview_report(&conn).unwrap_err();
        assert!(matches!(err, LoadError::Sql(_)));
    }

    #[test]
    fn test_daily_trend_is_newest_first() {
        let (_tmp, conn) = seeded_conn(&[
            record(days_ago(3), Some("A"), 1.0, 1.0),
            record(days_ago(1), Some("A"), 2.0, 2.0),
            record(days_ago(2), Some("A"), 3.0, 3.0),
        ]);

        let report = build_overview_report(&conn).unwrap();

        // Reversed chronology, kept on purpose: the upstream report feeds the
        // trend chart newest-first while every other series is ascending.
        assert_eq!(
            report.daily_dates,
            vec![days_ago(1), days_ago(2), days_ago(3)]
        );
        assert_eq!(report.daily_values, vec![2.0, 3.0, 1.0]);
    }

    #[test]
    fn test_null_groups_never_ranked() {
        let (_tmp, conn) = seeded_conn(&[
            record(days_ago(4), None, 500.0, 500.0),
            record(days_ago(4), Some("A"), 1.0, 1.0),
        ]);

        let report = build_overview_report(&conn).unwrap();
        assert_eq!(report.metrics.total_groups, 1);
        assert_eq!(report.top_groups.len(), 1);
        assert_eq!(report.top_groups[0].group_label, "A");
    }
}
