//! Data access layer for warehouse extract files.

mod jsonl_parser;

pub use jsonl_parser::{parse_all_jsonl_files, parse_jsonl_file};
