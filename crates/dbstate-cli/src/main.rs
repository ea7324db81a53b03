//! dbstate - inspect the descriptor of a locally running database server.
//!
//! Reads the running-instance file written by the server launcher and reports
//! how to reach the server, with the password redacted.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dbstate_core::{AbsentReason, LoadOutcome, RunningInfoStore};
use std::path::PathBuf;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "dbstate")]
#[command(about = "Inspect the descriptor of a locally running database server")]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the running instance, if any
    Status {
        /// Descriptor file (defaults to the platform location)
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Print the default descriptor location
    Path,
    /// Delete the descriptor file
    Remove {
        /// Descriptor file (defaults to the platform location)
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

fn open_store(file: Option<PathBuf>) -> Result<RunningInfoStore> {
    match file {
        Some(path) => Ok(RunningInfoStore::new(path)),
        None => RunningInfoStore::default_location()
            .context("Failed to resolve the descriptor location"),
    }
}

fn status(store: &RunningInfoStore) -> Result<()> {
    let outcome = store
        .load()
        .with_context(|| format!("Failed to read {}", store.path().display()))?;

    match outcome {
        LoadOutcome::Found(running) => {
            if !running.is_current_version() {
                info!(
                    "Descriptor struct version {} differs from this tool's",
                    running.struct_version
                );
            }
            print!("{}", running);
            if let Some(url) = running.connection_string() {
                println!("{}", url);
            }
        }
        LoadOutcome::Absent(reason) => {
            if reason == AbsentReason::Unparseable {
                info!(
                    "Ignoring unreadable descriptor at {}",
                    store.path().display()
                );
            }
            println!("no running instance");
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    match args.command {
        Command::Status { file } => {
            let store = open_store(file)?;
            debug!("Descriptor file: {}", store.path().display());
            status(&store)
        }
        Command::Path => {
            let store = open_store(None)?;
            println!("{}", store.path().display());
            Ok(())
        }
        Command::Remove { file } => {
            let store = open_store(file)?;
            store
                .remove()
                .with_context(|| format!("Failed to remove {}", store.path().display()))?;
            info!("Removed {}", store.path().display());
            Ok(())
        }
    }
}
