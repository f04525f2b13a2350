//! YAML parser for statement catalogs
//!
//! Supports both built-in catalogs (by name) and custom YAML files (by path).

use super::builtin;
use super::types::{Phase, StatementCatalog};
use crate::error::{Error, Result};
use crate::template::{extract_variables, has_templates};
use std::fs;
use std::path::Path;

/// Load a catalog from a built-in name or a file path
///
/// ```ignore
/// let catalog = load_catalog("sparkify")?;
/// let catalog = load_catalog("./my-catalog.yaml")?;
/// ```
pub fn load_catalog(path: impl AsRef<Path>) -> Result<StatementCatalog> {
    let path = path.as_ref();
    let path_str = path.to_string_lossy();

    if !path_str.contains('/')
        && !path_str.contains('\\')
        && !path_str.ends_with(".yaml")
        && !path_str.ends_with(".yml")
    {
        if let Some(yaml) = builtin::get_builtin(&path_str) {
            return load_catalog_from_str(yaml);
        }
    }

    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::catalog(format!(
                "Catalog '{}' not found. Built-in catalogs: {}. Or provide a path to a YAML file.",
                path.display(),
                builtin::list_builtin().join(", ")
            ))
        } else {
            Error::catalog(format!(
                "Failed to read catalog file '{}': {e}",
                path.display()
            ))
        }
    })?;
    load_catalog_from_str(&content)
}

/// Load a catalog from a YAML string
pub fn load_catalog_from_str(yaml: &str) -> Result<StatementCatalog> {
    let catalog: StatementCatalog = serde_yaml::from_str(yaml)
        .map_err(|e| Error::catalog(format!("Failed to parse catalog YAML: {e}")))?;

    validate_catalog(&catalog)?;
    Ok(catalog)
}

/// Validate a catalog
fn validate_catalog(catalog: &StatementCatalog) -> Result<()> {
    if catalog.name.trim().is_empty() {
        return Err(Error::catalog("Catalog name cannot be empty"));
    }

    if catalog.create_tables.is_empty() {
        return Err(Error::catalog("Catalog must have at least one create_tables statement"));
    }

    if catalog.quality_checks.is_empty() {
        return Err(Error::catalog("Catalog must have at least one quality check"));
    }

    for phase in Phase::ALL {
        for (i, statement) in catalog.statements(phase).iter().enumerate() {
            if statement.trim().is_empty() {
                return Err(Error::catalog(format!(
                    "Statement {} in '{phase}' is blank",
                    i + 1
                )));
            }
            if has_templates(statement) {
                validate_placeholders(catalog, phase, i, statement)?;
            }
        }
    }

    Ok(())
}

/// Reject placeholders that can never resolve
///
/// Values under `cluster` and `s3` come from the configuration at render
/// time; anything else must be declared in the catalog's `vars`.
fn validate_placeholders(
    catalog: &StatementCatalog,
    phase: Phase,
    index: usize,
    statement: &str,
) -> Result<()> {
    for variable in extract_variables(statement) {
        let mut parts = variable.split('.');
        let known = match (parts.next(), parts.next()) {
            (Some("cluster" | "s3"), Some(_)) => true,
            (Some("vars"), Some(name)) => catalog.vars.contains_key(name),
            (Some(name), None) => catalog.vars.contains_key(name),
            _ => false,
        };
        if !known {
            return Err(Error::catalog(format!(
                "Statement {} in '{phase}' uses unknown placeholder '{variable}'",
                index + 1
            )));
        }
    }
    Ok(())
}
