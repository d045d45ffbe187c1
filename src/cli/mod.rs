pub mod import;
pub mod init_db;
pub mod migrate;
pub mod search;

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};

use fakturace::settings::Settings;
use fakturace::store::InvoiceStore;

#[derive(Parser)]
#[command(name = "fakturace", version, about = "Abra Flexi issued invoices into Pohoda XML.")]
pub struct Cli {
    /// SQLite database file (default: <data_dir>/db/abra_invoices.sqlite)
    #[arg(long = "db-path", global = true)]
    pub db_path: Option<PathBuf>,
    /// Settings file (default: <data_dir>/fakturace.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the invoice tables.
    InitDb {
        /// Drop existing tables first
        #[arg(long)]
        reset: bool,
    },
    /// Import an Abra Flexi XML export into the store.
    Import {
        /// Path to the faktura-vydana XML export
        xml: PathBuf,
        /// Drop existing tables first
        #[arg(long)]
        reset: bool,
        /// Export to Pohoda afterwards
        #[arg(long)]
        migrate: bool,
        /// Output file for --migrate (relative paths go under the output dir)
        #[arg(long, requires = "migrate")]
        output: Option<PathBuf>,
    },
    /// List stored invoices.
    Search {
        /// Substring of the document code
        #[arg(long)]
        code: Option<String>,
        /// Substring of the partner company name
        #[arg(long)]
        partner: Option<String>,
        /// Only the most recently stored invoice
        #[arg(long)]
        last: bool,
        #[arg(long)]
        limit: Option<usize>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Write every stored invoice as a Pohoda dataPack.
    Migrate {
        /// Output file (relative paths go under the output dir)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Settings plus the resolved database location for one command.
pub struct Context {
    pub settings: Settings,
    pub db_path: PathBuf,
}

impl Context {
    pub fn new(settings: Settings, db_path: Option<PathBuf>) -> Result<Self> {
        settings
            .ensure_dirs()
            .with_context(|| format!("creating data directories under {}", settings.data_dir.display()))?;
        let db_path = db_path.unwrap_or_else(|| settings.db_path());
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        Ok(Self { settings, db_path })
    }

    pub fn open_store(&self) -> Result<InvoiceStore> {
        InvoiceStore::open(&self.db_path)
            .with_context(|| format!("opening database {}", self.db_path.display()))
    }
}
