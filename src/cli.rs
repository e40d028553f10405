//! CLI definitions using clap.

use clap::{Parser, Subcommand};

use crate::commands;


/// rr-overview - CLI for revenue run-rate reporting and dashboard export
#[derive(Parser)]
#[command(name = "rro")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}


#[derive(Subcommand)]
enum Commands {
    /// Show the revenue overview dashboard
    Overview {
        /// Auto-refresh dashboard every 5 seconds
        #[arg(long)]
        live: bool,

        /// Show raw error details when a data-load failure occurs
        #[arg(long)]
        debug: bool,

        /// Database path (default: ~/.rr-overview/revenue.db)
        #[arg(long)]
        db: Option<String>,
    },

    /// Export the overview report as PNG or SVG
    Export {
        /// Export as SVG instead of PNG
        #[arg(long)]
        svg: bool,

        /// Open file after export
        #[arg(long)]
        open: bool,

        /// Output file path
        #[arg(short, long)]
        output: Option<String>,

        /// Database path (default: ~/.rr-overview/revenue.db)
        #[arg(long)]
        db: Option<String>,
    },

    /// Load warehouse extract files (JSONL) into the local database
    Load {
        /// Extract files, one JSON row object per line
        #[arg(required = true)]
        files: Vec<String>,

        /// Database path (default: ~/.rr-overview/revenue.db)
        #[arg(long)]
        db: Option<String>,
    },

    /// Remove the local revenue database
    Remove {
        /// Force deletion without confirmation
        #[arg(short, long)]
        force: bool,

        /// Database path (default: ~/.rr-overview/revenue.db)
        #[arg(long)]
        db: Option<String>,
    },

    /// Restore the database from backup
    Restore {
        /// Database path (default: ~/.rr-overview/revenue.db)
        #[arg(long)]
        db: Option<String>,
    },
}


/// Run the CLI.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Overview { live, debug, db }) => {
            commands::overview::run(live, debug, db)?;
        }
        Some(Commands::Export { svg, open, output, db }) => {
            commands::export::run(svg, open, output, db)?;
        }
        Some(Commands::Load { files, db }) => {
            commands::load::run(files, db)?;
        }
        Some(Commands::Remove { force, db }) => {
            commands::remove::run(force, db)?;
        }
        Some(Commands::Restore { db }) => {
            commands::restore::run(db)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
        }
    }

    Ok(())
}
