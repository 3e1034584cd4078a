//! Command-line surface over the record store.
//!
//! Binds one store per invocation (`--repo`/`--config` + `--database`) and
//! exposes the CRUD and listing operations. Payload JSON goes to stdout;
//! status lines go to stderr so output stays pipeable.

use crate::core::config::StoreConfig;
use crate::core::error::StoreError;
use crate::core::store::{Layout, RecordPayload, Store};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::io::{self, Read, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gitstore")]
#[command(about = "Versioned JSON record store backed by a git repository")]
pub struct Cli {
    /// Repository root (overrides --config).
    #[arg(long)]
    pub repo: Option<PathBuf>,

    /// JSON config file with {"database-address": "..."}.
    #[arg(long, default_value = "config.json")]
    pub config: PathBuf,

    /// Subdirectory of the repository holding this store's records.
    #[arg(long, default_value = "records")]
    pub database: String,

    /// Use the BagIt layout ({id}/data/{id}.json) instead of flat files.
    #[arg(long)]
    pub bagged: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load one record from the working tree.
    Find {
        /// Record identifier.
        id: u64,
    },
    /// List every record at head with its content loaded.
    List,
    /// Insert (no --id) or update (--id) a record, then commit.
    Save {
        /// Existing identifier to update; omit to insert.
        #[arg(long)]
        id: Option<u64>,
        /// JSON content (if omitted, reads from stdin).
        #[arg(long)]
        content: Option<String>,
    },
    /// Delete a record's flat file, then commit.
    Delete {
        /// Record identifier.
        id: u64,
    },
    /// Show a path's raw content as committed on a branch.
    Show {
        /// Path relative to the repository root.
        path: String,
        /// Branch to read from.
        #[arg(long, default_value = "master")]
        branch: String,
    },
    /// Raw tree listing at head, parsed.
    LsTree {
        /// Path prefix to scope the listing (e.g. "records/").
        #[arg(default_value = "")]
        scope: String,
    },
}

fn bind_store(cli: &Cli) -> Result<Store, StoreError> {
    let config = match &cli.repo {
        Some(root) => StoreConfig::new(root.clone()),
        None => StoreConfig::from_file(&cli.config)?,
    };
    let layout = if cli.bagged {
        Layout::Bagged
    } else {
        Layout::Flat
    };
    Store::new(config, &cli.database, layout)
}

pub fn run_cli(cli: Cli) -> Result<(), StoreError> {
    match &cli.command {
        Command::Find { id } => {
            let store = bind_store(&cli)?;
            let record = store.find(*id)?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Command::List => {
            let store = bind_store(&cli)?;
            let entries = store.find_all()?;
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        Command::Save { id, content } => {
            let body = match content {
                Some(raw) => raw.clone(),
                None => {
                    let mut buffer = String::new();
                    std::io::stdin().read_to_string(&mut buffer)?;
                    buffer
                }
            };
            let content: serde_json::Value = serde_json::from_str(&body)?;
            let mut store = bind_store(&cli)?;
            let stored = store.save(RecordPayload { id: *id, content })?;
            if let Some(new_id) = store.last_inserted_id() {
                eprintln!(
                    "{} inserted record {} into {}",
                    "ok:".green(),
                    new_id,
                    store.database()
                );
            } else if let Some(id) = id {
                eprintln!(
                    "{} updated record {} in {}",
                    "ok:".green(),
                    id,
                    store.database()
                );
            }
            println!("{}", stored);
        }
        Command::Delete { id } => {
            let mut store = bind_store(&cli)?;
            store.delete(*id)?;
            eprintln!("{} deleted record {}", "ok:".green(), id);
        }
        Command::Show { path, branch } => {
            let store = bind_store(&cli)?;
            let content = store.show_file(path, Some(branch))?;
            io::stdout().write_all(&content)?;
        }
        Command::LsTree { scope } => {
            let store = bind_store(&cli)?;
            let entries = store.ls_tree_head(scope)?;
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
    }
    Ok(())
}
