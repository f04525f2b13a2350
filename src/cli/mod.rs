//! CLI module
//!
//! Command-line interface for provisioning and the ETL pipeline.
//!
//! # Commands
//!
//! - `up` - Create role and cluster, wait, save endpoint
//! - `down` - Delete cluster and role
//! - `status` - Show cluster and role state
//! - `create-tables` - Drop and recreate tables
//! - `etl` - Load staging tables and the star schema
//! - `check` - Run data quality checks
//! - `catalogs` - List built-in statement catalogs

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
