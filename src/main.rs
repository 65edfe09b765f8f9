//! Restolist: keep a list of restaurants and pick one at random.
//!
//! # Usage
//!
//! ```bash
//! restolist add "Pizza Place"
//! restolist list --output json
//! restolist find --open
//! restolist            # interactive session
//! ```
//!
//! Environment variables can also be used:
//! - `RESTOLIST_DATA_DIR`: Directory holding the database
//! - `RESTOLIST_SAVE_POLICY`: `atomic` or `statement-wise`
//! - `RUST_LOG`: Log level (trace, debug, info, warn, error)

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use restolist::config::Config;
use restolist::observability::tracing::init_tracing;
use std::fs;

/// Keep a list of restaurants and pick one at random.
#[derive(Parser)]
#[command(name = "restolist")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(flatten)]
    config: Config,

    /// Output format (text, json)
    #[arg(short, long, global = true, default_value = "text")]
    output: OutputFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("unknown output format: {}", s)),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show the list
    List,
    /// Add a restaurant
    Add {
        /// Restaurant name
        name: String,
    },
    /// Rename a restaurant
    Edit {
        /// Position in the list (starting at 1)
        position: usize,
        /// New name
        name: String,
    },
    /// Remove one or more restaurants
    Remove {
        /// Positions in the list (starting at 1)
        #[arg(required = true)]
        positions: Vec<usize>,
    },
    /// Map search for a random restaurant
    Find {
        /// Open the search in the default browser
        #[arg(long)]
        open: bool,
    },
    /// Print the database path
    Path,
    /// Interactive session (the default)
    Session {
        /// Open `find` results in the default browser
        #[arg(long)]
        open: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.config;

    init_tracing(&config.log_level, config.log_format);

    let data_dir = config.resolve_data_dir();
    fs::create_dir_all(&data_dir)
        .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

    match cli.command.unwrap_or(Commands::Session { open: false }) {
        Commands::List => commands::items::list(&config, cli.output)?,
        Commands::Add { name } => commands::items::add(&config, name, cli.output)?,
        Commands::Edit { position, name } => {
            commands::items::edit(&config, position, name, cli.output)?;
        }
        Commands::Remove { positions } => {
            commands::items::remove(&config, &positions, cli.output)?;
        }
        Commands::Find { open } => commands::find::run(&config, open, cli.output)?,
        Commands::Path => println!("{}", config.db_path().display()),
        Commands::Session { open } => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("failed to start runtime")?;
            let result = runtime.block_on(commands::session::run(&config, open));
            // A blocked stdin read must not keep the process alive.
            runtime.shutdown_background();
            result?;
        }
    }

    Ok(())
}
