//! SQLite operations against the pre-aggregated revenue table.
//!
//! The reporting pipeline is read-only over `corporate_rr`; the only writer
//! is [`save_records`], used by the `load` command to ingest an extract.
//! Every window below is computed relative to the current date at query time,
//! except the daily trend which starts at a literal date.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Duration, Local, NaiveDate};
use rusqlite::{params, Connection};

use crate::config::SOURCE_TABLE;
use crate::models::{DailyTotal, GroupSummary, UsageRecord};


/// Initialize the database with the revenue table.
pub fn init_database(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open database: {}", db_path.display()))?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS corporate_rr (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            usage_date TEXT NOT NULL,
            snowflake_group_rollup TEXT,
            total_credits REAL NOT NULL,
            annual_rr_credits REAL NOT NULL,
            annual_rr_dollars REAL NOT NULL
        )",
        [],
    )?;

    // One row per day per group; unlabeled rows dedupe against ''.
    conn.execute(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_corporate_rr_day_group
         ON corporate_rr(usage_date, COALESCE(snowflake_group_rollup, ''))",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_corporate_rr_date ON corporate_rr(usage_date)",
        [],
    )?;

    Ok(())
}


/// Open an existing database for the reporting pipeline.
pub fn open_database(db_path: &Path) -> Result<Connection> {
    Connection::open(db_path)
        .with_context(|| format!("Failed to open database: {}", db_path.display()))
}


/// Save usage records to the database.
///
/// Returns the number of new rows saved; duplicate day/group rows are skipped.
pub fn save_records(records: &[UsageRecord], db_path: &Path) -> Result<usize> {
    if records.is_empty() {
        return Ok(0);
    }

    init_database(db_path)?;

    let conn = Connection::open(db_path)?;
    let mut saved_count = 0;

    for record in records {
        let result = conn.execute(
            "INSERT INTO corporate_rr (
                usage_date, snowflake_group_rollup,
                total_credits, annual_rr_credits, annual_rr_dollars
            ) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.date_key(),
                record.snowflake_group_rollup,
                record.total_credits,
                record.annual_rr_credits,
                record.annual_rr_dollars,
            ],
        );

        match result {
            Ok(_) => saved_count += 1,
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                // Row already exists, skip
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(saved_count)
}


/// Double every embedded single quote so a label is safe to splice into a
/// string literal.
pub fn escape_label(label: &str) -> String {
    label.replace('\'', "''")
}


/// Maximum `usage_date` over the whole table. None when the table is empty.
pub fn max_usage_date(conn: &Connection) -> rusqlite::Result<Option<NaiveDate>> {
    conn.query_row(
        "SELECT MAX(usage_date) FROM corporate_rr",
        [],
        |row| row.get(0),
    )
}


/// Daily total credits from a literal start date, newest day first.
///
/// The descending order is deliberate: the overview trend consumes this
/// series exactly as returned.
pub fn daily_totals(conn: &Connection, start_date: &str) -> rusqlite::Result<Vec<DailyTotal>> {
    let mut stmt = conn.prepare(
        "SELECT usage_date, SUM(total_credits) AS total_daily_credits
         FROM corporate_rr
         WHERE usage_date >= ?1
         GROUP BY usage_date
         ORDER BY usage_date DESC",
    )?;

    let rows = stmt.query_map(params![start_date], |row| {
        Ok(DailyTotal {
            usage_date: row.get(0)?,
            total_daily_credits: row.get(1)?,
        })
    })?;

    rows.collect()
}


/// Per-group summary over the trailing window `[today - days, today)`,
/// descending by total credits. NULL group labels are excluded.
pub fn group_summaries(
    conn: &Connection,
    window_days: i64,
    limit: Option<usize>,
) -> rusqlite::Result<Vec<GroupSummary>> {
    let today = Local::now().date_naive();
    let start = today - Duration::days(window_days);

    let mut sql = String::from(
        "SELECT snowflake_group_rollup,
                SUM(total_credits) AS total_credits,
                SUM(annual_rr_credits) AS annualized_rr_credits,
                SUM(annual_rr_dollars) AS annualized_rr_dollars
         FROM corporate_rr
         WHERE usage_date >= ?1
           AND usage_date < ?2
           AND snowflake_group_rollup IS NOT NULL
         GROUP BY snowflake_group_rollup
         ORDER BY total_credits DESC",
    );
    if let Some(n) = limit {
        sql.push_str(&format!(" LIMIT {n}"));
    }

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![start, today], |row| {
        Ok(GroupSummary {
            group_label: row.get(0)?,
            total_credits: row.get(1)?,
            annualized_rr_credits: row.get(2)?,
            annualized_rr_dollars: row.get(3)?,
        })
    })?;

    rows.collect()
}


/// Daily `(usage_date, annual_rr_dollars)` points for one group over the
/// trailing window, ascending by date.
///
/// The label is spliced into the query text after quote-doubling, matching
/// the upstream report's interpolation.
pub fn group_time_series(
    conn: &Connection,
    group_label: &str,
    window_days: i64,
) -> rusqlite::Result<Vec<(NaiveDate, f64)>> {
    let today = Local::now().date_naive();
    let start = today - Duration::days(window_days);
    let escaped = escape_label(group_label);

    let sql = format!(
        "SELECT usage_date, annual_rr_dollars
         FROM corporate_rr
         WHERE snowflake_group_rollup = '{escaped}'
           AND usage_date >= ?1
           AND usage_date < ?2
         ORDER BY usage_date",
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![start, today], |row| {
        Ok((row.get(0)?, row.get(1)?))
    })?;

    rows.collect()
}


/// Total annualized dollars over the trailing window, all groups.
pub fn total_annualized_dollars(
    conn: &Connection,
    window_days: i64,
) -> rusqlite::Result<f64> {
    let today = Local::now().date_naive();
    let start = today - Duration::days(window_days);

    conn.query_row(
        "SELECT COALESCE(SUM(annual_rr_dollars), 0)
         FROM corporate_rr
         WHERE usage_date >= ?1
           AND usage_date < ?2",
        params![start, today],
        |row| row.get(0),
    )
}


/// Static hint lines shown under a data-load failure.
pub fn load_failure_hints() -> [String; 3] {
    [
        format!("Table name: {SOURCE_TABLE}"),
        "Column names: USAGE_DATE, SNOWFLAKE_GROUP_ROLLUP, TOTAL_CREDITS, \
         ANNUAL_RR_CREDITS, ANNUAL_RR_DOLLARS"
            .to_string(),
        "Check database permissions".to_string(),
    ]
}


#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

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

    fn open_seeded(records: &[UsageRecord]) -> (TempDir, Connection) {
        let tmp_dir = TempDir::new().unwrap();
        let db_path = tmp_dir.path().join("test.db");
        init_database(&db_path).unwrap();
        save_records(records, &db_path).unwrap();
        let conn = Connection::open(&db_path).unwrap();
        (tmp_dir, conn)
    }

    #[test]
    fn test_init_database() {
        let tmp_dir = TempDir::new().unwrap();
        let db_path = tmp_dir.path().join("test.db");

        init_database(&db_path).unwrap();
        assert!(db_path.exists());
    }

    #[test]
    fn test_duplicate_day_group_skipped() {
        let tmp_dir = TempDir::new().unwrap();
        let db_path = tmp_dir.path().join("test.db");

        let r = record(days_ago(3), Some("Studios"), 10.0, 100.0);
        assert_eq!(save_records(&[r.clone()], &db_path).unwrap(), 1);
        assert_eq!(save_records(&[r], &db_path).unwrap(), 0);
    }

    #[test]
    fn test_max_usage_date_empty_table() {
        let (_tmp, conn) = open_seeded(&[]);
        assert_eq!(max_usage_date(&conn).unwrap(), None);
    }

    #[test]
    fn test_max_usage_date() {
        let (_tmp, conn) = open_seeded(&[
            record(days_ago(10), Some("A"), 1.0, 10.0),
            record(days_ago(2), Some("A"), 1.0, 10.0),
        ]);
        assert_eq!(max_usage_date(&conn).unwrap(), Some(days_ago(2)));
    }

    #[test]
    fn test_daily_totals_descending_and_summed() {
        let (_tmp, conn) = open_seeded(&[
            record(days_ago(5), Some("A"), 4.0, 10.0),
            record(days_ago(5), Some("B"), 6.0, 10.0),
            record(days_ago(3), Some("A"), 2.0, 10.0),
        ]);

        let totals = daily_totals(&conn, "2024-01-01").unwrap();
        assert_eq!(totals.len(), 2);
        // Newest day first
        assert_eq!(totals[0].usage_date, days_ago(3));
        assert_eq!(totals[0].total_daily_credits, 2.0);
        assert_eq!(totals[1].usage_date, days_ago(5));
        assert_eq!(totals[1].total_daily_credits, 10.0);
    }

    #[test]
    fn test_daily_totals_literal_start_date() {
        let (_tmp, conn) = open_seeded(&[record(
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
            Some("A"),
            4.0,
            10.0,
        )]);

        let totals = daily_totals(&conn, "2024-01-01").unwrap();
        assert!(totals.is_empty());
    }

    #[test]
    fn test_group_summaries_window_and_order() {
        let (_tmp, conn) = open_seeded(&[
            record(days_ago(10), Some("B"), 50.0, 500.0),
            record(days_ago(11), Some("A"), 100.0, 1000.0),
            // Outside the 30-day window
            record(days_ago(40), Some("C"), 999.0, 9990.0),
            // Unlabeled rows never appear in group aggregates
            record(days_ago(12), None, 999.0, 9990.0),
        ]);

        let summaries = group_summaries(&conn, 30, None).unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].group_label, "A");
        assert_eq!(summaries[1].group_label, "B");

        // The same shape with the year window picks up C as well
        let year = group_summaries(&conn, 365, None).unwrap();
        assert_eq!(year.len(), 3);
    }

    #[test]
    fn test_group_summaries_excludes_today() {
        let (_tmp, conn) = open_seeded(&[record(days_ago(0), Some("A"), 5.0, 50.0)]);

        let summaries = group_summaries(&conn, 30, None).unwrap();
        assert!(summaries.is_empty());
    }

    #[test]
    fn test_group_summaries_limit() {
        let records: Vec<UsageRecord> = (0..12)
            .map(|i| record(days_ago(5), Some(&format!("G{i:02}")), i as f64, 1.0))
            .collect();
        let (_tmp, conn) = open_seeded(&records);

        let top = group_summaries(&conn, 30, Some(10)).unwrap();
        assert_eq!(top.len(), 10);
        assert_eq!(top[0].group_label, "G11");
    }

    #[test]
    fn test_group_time_series_ascending() {
        let (_tmp, conn) = open_seeded(&[
            record(days_ago(3), Some("A"), 1.0, 30.0),
            record(days_ago(9), Some("A"), 1.0, 10.0),
            record(days_ago(6), Some("B"), 1.0, 99.0),
        ]);

        let series = group_time_series(&conn, "A", 365).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0], (days_ago(9), 10.0));
        assert_eq!(series[1], (days_ago(3), 30.0));
    }

    #[test]
    fn test_escape_label() {
        assert_eq!(escape_label("O'Brien"), "O''Brien");
        assert_eq!(escape_label("plain"), "plain");
        assert_eq!(escape_label("a''b"), "a''''b");
    }

    #[test]
    fn test_quoted_label_queries_literal_group() {
        let (_tmp, conn) = open_seeded(&[
            record(days_ago(4), Some("O'Brien"), 1.0, 77.0),
            record(days_ago(4), Some("OBrien"), 1.0, 11.0),
        ]);

        let series = group_time_series(&conn, "O'Brien", 365).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].1, 77.0);
    }

    #[test]
    fn test_total_annualized_dollars() {
        let (_tmp, conn) = open_seeded(&[
            record(days_ago(5), Some("A"), 1.0, 100.0),
            record(days_ago(6), Some("B"), 1.0, 50.0),
            record(days_ago(60), Some("A"), 1.0, 9999.0),
        ]);

        let total = total_annualized_dollars(&conn, 30).unwrap();
        assert_eq!(total, 150.0);
    }

    #[test]
    fn test_total_annualized_dollars_empty_window() {
        let (_tmp, conn) = open_seeded(&[]);
        assert_eq!(total_annualized_dollars(&conn, 30).unwrap(), 0.0);
    }

    #[test]
    fn test_query_against_missing_table_fails() {
        let tmp_dir = TempDir::new().unwrap();
        let db_path = tmp_dir.path().join("empty.db");
        let conn = Connection::open(&db_path).unwrap();

        assert!(max_usage_date(&conn).is_err());
    }
}
