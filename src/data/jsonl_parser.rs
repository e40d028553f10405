//! JSONL parser for warehouse extract files.
//!
//! An extract file carries one JSON object per line with the columns of the
//! `corporate_rr` table. Warehouse exports use upper-case column names; the
//! row model accepts either casing.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::UsageRecord;


/// Parse a single JSONL extract file and return UsageRecord objects.
///
/// Malformed lines are skipped with a warning rather than failing the file.
pub fn parse_jsonl_file(file_path: &Path) -> Result<Vec<UsageRecord>> {
    let file = File::open(file_path)
        .with_context(|| format!("Failed to open file: {}", file_path.display()))?;

    let reader = BufReader::new(file);
    let mut records = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = match line_result {
            Ok(l) => l,
            Err(e) => {
                eprintln!(
                    "Warning: Error reading line {} in {}: {}",
                    line_num + 1,
                    file_path.display(),
                    e
                );
                continue;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<UsageRecord>(line) {
            Ok(record) => records.push(record),
            Err(e) => {
                eprintln!(
                    "Warning: Skipping malformed row at {}:{}: {}",
                    file_path.display(),
                    line_num + 1,
                    e
                );
            }
        }
    }

    Ok(records)
}


/// Parse multiple extract files and return all usage records.
pub fn parse_all_jsonl_files(file_paths: &[&Path]) -> Result<Vec<UsageRecord>> {
    if file_paths.is_empty() {
        anyhow::bail!("No extract files provided to parse");
    }

    let mut all_records = Vec::new();

    for file_path in file_paths {
        match parse_jsonl_file(file_path) {
            Ok(records) => all_records.extend(records),
            Err(e) => {
                eprintln!("Warning: Error parsing {}: {}", file_path.display(), e);
            }
        }
    }

    Ok(all_records)
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_lowercase_row() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"usage_date":"2024-06-15","snowflake_group_rollup":"Studios","total_credits":120.5,"annual_rr_credits":1446.0,"annual_rr_dollars":4338.0}}"#
        )
        .unwrap();

        let records = parse_jsonl_file(file.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].snowflake_group_rollup.as_deref(), Some("Studios"));
        assert_eq!(records[0].total_credits, 120.5);
    }

    #[test]
    fn test_parse_uppercase_and_null_group() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"USAGE_DATE":"2024-06-16","SNOWFLAKE_GROUP_ROLLUP":null,"TOTAL_CREDITS":3.0,"ANNUAL_RR_CREDITS":36.0,"ANNUAL_RR_DOLLARS":108.0}}"#
        )
        .unwrap();

        let records = parse_jsonl_file(file.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].snowflake_group_rollup.is_none());
    }

    #[test]
    fn test_malformed_lines_skipped() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not json").unwrap();
        writeln!(file).unwrap();
        writeln!(
            file,
            r#"{{"usage_date":"2024-06-17","snowflake_group_rollup":"Parks","total_credits":9.0,"annual_rr_credits":108.0,"annual_rr_dollars":324.0}}"#
        )
        .unwrap();

        let records = parse_jsonl_file(file.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].snowflake_group_rollup.as_deref(), Some("Parks"));
    }

    #[test]
    fn test_no_files_is_an_error() {
        assert!(parse_all_jsonl_files(&[]).is_err());
    }
}
