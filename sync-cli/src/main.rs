//! # leadsync
//!
//! Lead retrieval from the command line, with an offline capture queue.
//!
//! ## Commands
//!
//! - `login`: Store API credentials
//! - `scan`: Capture a badge
//! - `note`: Attach a note to a lead
//! - `retry`: Retry queued work for a lead
//! - `show`: Show what is stored for a lead
//! - `push-state`: Push device UI state (best effort)
//!
//! ## Example
//!
//! ```bash
//! leadsync login --key KEY --secret SECRET
//! leadsync scan "A1:xyz:VALIDATOR1"
//! leadsync note A1 "Interested in the Rust workshop"
//!
//! # After a network failure
//! leadsync retry A1
//! leadsync show A1
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{login, note, open_engine, push_state, retry, scan, show};
use config::Config;

/// Lead retrieval client with an offline capture queue.
#[derive(Parser, Debug)]
#[command(name = "leadsync")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Data directory for credentials and queued records
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Config file (default: leadsync.toml in the data directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Use mock transport that accepts every request (for testing/demo)
    #[arg(long, global = true)]
    mock: bool,

    /// Log at debug level unless RUST_LOG is set
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Store API credentials
    Login {
        /// API key
        #[arg(long)]
        key: String,

        /// API secret
        #[arg(long)]
        secret: String,
    },

    /// Capture a badge
    Scan {
        /// Badge payload, `<access code>:...:<validator>`
        scan_data: String,

        /// Access code to record (default: first segment of the payload)
        #[arg(long)]
        access_code: Option<String>,
    },

    /// Attach a note to a lead
    Note {
        /// Attendee access code
        access_code: String,

        /// Note text
        text: String,
    },

    /// Retry queued scan and note for a lead
    Retry {
        /// Attendee access code
        access_code: String,
    },

    /// Show what is stored for a lead
    Show {
        /// Attendee access code
        access_code: String,
    },

    /// Push device UI state to the remote (best effort)
    PushState {
        /// State as a JSON document
        json: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Determine data directory
    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => default_data_dir()?,
    };

    tokio::fs::create_dir_all(&data_dir)
        .await
        .context("Failed to create data directory")?;

    let config = Config::load(cli.config.as_deref(), &data_dir).await?;
    let engine = open_engine(&data_dir, &config, cli.mock).await?;

    match cli.command {
        Commands::Login { key, secret } => {
            login::run(&data_dir, &key, &secret).await?;
        }
        Commands::Scan {
            scan_data,
            access_code,
        } => {
            scan::run(&engine, &scan_data, access_code.as_deref()).await?;
        }
        Commands::Note { access_code, text } => {
            note::run(&engine, &access_code, &text).await?;
        }
        Commands::Retry { access_code } => {
            retry::run(&engine, &access_code).await?;
        }
        Commands::Show { access_code } => {
            show::run(&engine, &access_code).await?;
        }
        Commands::PushState { json } => {
            push_state::run(&engine, &json).await?;
        }
    }

    Ok(())
}

/// Log to stderr so command output stays clean.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Get the default data directory for leadsync.
fn default_data_dir() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("io", "ydun", "leadsync")
        .context("Could not determine home directory")?;
    Ok(dirs.data_dir().to_path_buf())
}
