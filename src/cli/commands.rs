//! CLI commands and argument parsing

use crate::catalog::DEFAULT_CATALOG;
use crate::config::DEFAULT_CONFIG_FILE;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Provision a Redshift warehouse and run the staging-to-star-schema ETL
#[derive(Parser, Debug)]
#[command(name = "dwh-etl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (TOML)
    #[arg(
        short = 'C',
        long,
        global = true,
        env = "DWH_CONFIG",
        default_value = DEFAULT_CONFIG_FILE
    )]
    pub config: PathBuf,

    /// Statement catalog: built-in name or YAML file
    #[arg(short, long, global = true, default_value = DEFAULT_CATALOG)]
    pub catalog: String,

    /// Output format for status, plans and check rows
    #[arg(short, long, global = true, default_value = "pretty")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Create the role and cluster if missing, wait until ready and save the endpoint
    Up {
        /// Show what would be created without changing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Delete the cluster and then the role
    Down {
        /// Show what would be deleted without changing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the current cluster and role state
    Status,

    /// Drop and recreate all tables
    CreateTables {
        /// Run against a local DuckDB file instead of the cluster
        #[arg(long)]
        local: Option<PathBuf>,
    },

    /// Load the staging tables and then the star schema tables
    Etl {
        /// Run against a local DuckDB file instead of the cluster
        #[arg(long)]
        local: Option<PathBuf>,
    },

    /// Run the data quality checks and print their rows
    Check {
        /// Run against a local DuckDB file instead of the cluster
        #[arg(long)]
        local: Option<PathBuf>,
    },

    /// List built-in catalogs
    Catalogs,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}
