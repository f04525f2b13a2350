//! Statement catalog module
//!
//! Ordered SQL statements for each pipeline phase, loaded from YAML.
//!
//! # Overview
//!
//! The catalog module provides:
//! - `StatementCatalog` - drop, create, copy, insert and quality-check lists
//! - `Phase` - selects one of those lists
//! - Built-in catalogs by name and custom catalogs by path

mod builtin;
mod parser;
mod types;

pub use builtin::{get_builtin, list_builtin};
pub use parser::{load_catalog, load_catalog_from_str};
pub use types::{Phase, StatementCatalog};

/// Name of the catalog used when none is given
pub const DEFAULT_CATALOG: &str = "sparkify";
