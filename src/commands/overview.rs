//! Overview dashboard command.

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::Result;

use crate::aggregation::build_overview_report;
use crate::config::{get_db_path, DEFAULT_REFRESH_INTERVAL};
use crate::storage::open_database;
use crate::visualization::{render_error, render_live_notice, render_report};


/// Run the overview command.
pub fn run(live: bool, debug: bool, db: Option<String>) -> Result<()> {
    let db_path = db.map(PathBuf::from).unwrap_or_else(get_db_path);

    if !db_path.exists() {
        eprintln!("Error: No revenue database found at {}.", db_path.display());
        eprintln!("Run 'rro load <extract.jsonl>' first to ingest data.");
        return Ok(());
    }

    if live {
        render_live_notice(DEFAULT_REFRESH_INTERVAL);
        loop {
            render_pass(&db_path, debug, true)?;
            thread::sleep(Duration::from_secs(DEFAULT_REFRESH_INTERVAL));
        }
    } else {
        render_pass(&db_path, debug, false)?;
    }

    Ok(())
}


/// One full pipeline pass: query, shape, render. All-or-nothing; a failed
/// pass renders only the error banner.
fn render_pass(db_path: &PathBuf, debug: bool, clear_screen: bool) -> Result<()> {
    let conn = open_database(db_path)?;

    match build_overview_report(&conn) {
        Ok(report) => render_report(&report, clear_screen),
        Err(e) => render_error(&e, debug),
    }

    Ok(())
}
