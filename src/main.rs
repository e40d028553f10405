//! rr-overview CLI
//!
//! Revenue run-rate reporting over a pre-aggregated warehouse extract.

mod aggregation;
mod cli;
mod commands;
mod config;
mod data;
mod models;
mod storage;
mod visualization;


fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
