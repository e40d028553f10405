//! Export command for the overview report.

use std::path::PathBuf;

use anyhow::Result;

use crate::aggregation::build_overview_report;
use crate::config::get_db_path;
use crate::storage::open_database;
use crate::visualization::{
    export_overview_png, export_overview_svg, open_file, render_error,
};


/// Run the export command.
pub fn run(
    svg: bool,
    should_open: bool,
    output: Option<String>,
    db: Option<String>,
) -> Result<()> {
    let db_path = db.map(PathBuf::from).unwrap_or_else(get_db_path);

    if !db_path.exists() {
        eprintln!("Error: No revenue database found at {}.", db_path.display());
        eprintln!("Run 'rro load <extract.jsonl>' first to ingest data.");
        return Ok(());
    }

    let format_type = if svg { "svg" } else { "png" };
    let output_path = if let Some(path) = output {
        PathBuf::from(path)
    } else {
        let default_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".rr-overview");
        std::fs::create_dir_all(&default_dir)?;
        default_dir.join(format!("revenue-overview.{}", format_type))
    };

    let conn = open_database(&db_path)?;

    let report = match build_overview_report(&conn) {
        Ok(report) => report,
        Err(e) => {
            render_error(&e, false);
            return Ok(());
        }
    };

    println!("Exporting to {}...", format_type.to_uppercase());

    if svg {
        export_overview_svg(&report, &output_path)?;
    } else {
        export_overview_png(&report, &output_path)?;
    }

    println!("\x1b[32m+ Exported to: {}\x1b[0m", output_path.display());

    if should_open {
        println!("Opening {}...", format_type.to_uppercase());
        open_file(&output_path)?;
    }

    Ok(())
}
