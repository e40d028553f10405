//! Load command: ingest warehouse extract files into the revenue database.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::config::get_db_path;
use crate::data::parse_all_jsonl_files;
use crate::storage::save_records;


/// Run the load command.
pub fn run(files: Vec<String>, db: Option<String>) -> Result<()> {
    let db_path = db.map(PathBuf::from).unwrap_or_else(get_db_path);

    println!("Loading {} extract file(s)...", files.len());

    let paths: Vec<&Path> = files.iter().map(Path::new).collect();
    let records = parse_all_jsonl_files(&paths)?;

    println!("Parsed {} rows", records.len());

    let saved = save_records(&records, &db_path)?;

    println!("Saved {} new rows to database", saved);
    println!("Database: {}", db_path.display());

    Ok(())
}
