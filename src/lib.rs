// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # dwh-etl
//!
//! Provision a Redshift data warehouse and load it from S3.
//!
//! ## Features
//!
//! - **Idempotent provisioning**: create the access role and cluster only when missing
//! - **Readiness polling**: wait on a fixed interval until the cluster is available
//! - **Config write-back**: save the endpoint and role ARN for later commands
//! - **Statement catalogs**: ordered drop/create/copy/insert/check SQL in YAML
//! - **Local runs**: point the pipeline at a DuckDB file instead of the cluster
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dwh_etl::catalog::{load_catalog, Phase};
//! use dwh_etl::config::DwhConfig;
//! use dwh_etl::database::Warehouse;
//! use dwh_etl::statements::run_all;
//!
//! #[tokio::main]
//! async fn main() -> dwh_etl::Result<()> {
//!     let config = DwhConfig::load("dwh.toml")?;
//!     let catalog = load_catalog("sparkify")?;
//!     let creates = catalog.render(Phase::CreateTables, &config.template_context())?;
//!
//!     let mut warehouse = Warehouse::connect(&config, None).await?;
//!     run_all(&creates, &mut warehouse).await?;
//!     warehouse.close().await
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  up / down / status          create-tables / etl / check     │
//! └──────────────┬───────────────────────────────┬───────────────┘
//!                │                               │
//! ┌──────────────┴──────────────┐ ┌──────────────┴───────────────┐
//! │ Provisioner                 │ │ Catalog → render → Runner    │
//! │  exists · poller · sink     │ │                              │
//! ├─────────────┬───────────────┤ ├──────────────┬───────────────┤
//! │ ClusterApi  │ RoleApi       │ │ Redshift     │ DuckDB        │
//! │ (Redshift)  │ (IAM)         │ │ (sqlx)       │ (local)       │
//! └─────────────┴───────────────┘ └──────────────┴───────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Warehouse configuration file
pub mod config;

/// Template interpolation
pub mod template;

/// Cluster and role clients
pub mod cloud;

/// Role and cluster provisioning
pub mod provision;

/// Statement catalogs
pub mod catalog;

/// Warehouse connections
pub mod database;

/// Statement runner and quality checks
pub mod statements;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use catalog::{load_catalog, StatementCatalog};
pub use config::DwhConfig;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
