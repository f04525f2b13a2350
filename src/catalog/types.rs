//! Catalog types
//!
//! Declarative statement catalog types for YAML parsing.

use crate::error::Result;
use crate::template::{render, TemplateContext};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Statement Catalog
// ============================================================================

/// Ordered SQL statements for every pipeline phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StatementCatalog {
    /// Catalog name
    pub name: String,
    /// Human readable description
    #[serde(default)]
    pub description: Option<String>,
    /// Drop statements, run before `create_tables`
    #[serde(default)]
    pub drop_tables: Vec<String>,
    /// Table creation statements
    pub create_tables: Vec<String>,
    /// Bulk loads into the staging tables
    #[serde(default)]
    pub copy_tables: Vec<String>,
    /// Staging to star schema inserts
    #[serde(default)]
    pub insert_tables: Vec<String>,
    /// Queries that must each return at least one row
    pub quality_checks: Vec<String>,
    /// Catalog-level values available as `{{ vars.name }}` or `{{ name }}`
    #[serde(default)]
    pub vars: BTreeMap<String, String>,
}

impl StatementCatalog {
    /// Raw statements of a phase
    pub fn statements(&self, phase: Phase) -> &[String] {
        match phase {
            Phase::DropTables => &self.drop_tables,
            Phase::CreateTables => &self.create_tables,
            Phase::CopyTables => &self.copy_tables,
            Phase::InsertTables => &self.insert_tables,
            Phase::QualityChecks => &self.quality_checks,
        }
    }

    /// Render every statement of a phase
    ///
    /// Nothing is returned unless all statements render, so a missing
    /// placeholder is reported before any statement runs.
    pub fn render(&self, phase: Phase, ctx: &TemplateContext) -> Result<Vec<String>> {
        let mut ctx = ctx.clone();
        if !self.vars.is_empty() {
            ctx.set_vars(json!(self.vars));
        }

        self.statements(phase)
            .iter()
            .map(|statement| render(statement.trim(), &ctx))
            .collect()
    }
}

// ============================================================================
// Phase
// ============================================================================

/// Pipeline phase a statement list belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    DropTables,
    CreateTables,
    CopyTables,
    InsertTables,
    QualityChecks,
}

impl Phase {
    /// All phases in pipeline order
    pub const ALL: [Phase; 5] = [
        Phase::DropTables,
        Phase::CreateTables,
        Phase::CopyTables,
        Phase::InsertTables,
        Phase::QualityChecks,
    ];

    /// Catalog key of this phase
    pub fn key(self) -> &'static str {
        match self {
            Phase::DropTables => "drop_tables",
            Phase::CreateTables => "create_tables",
            Phase::CopyTables => "copy_tables",
            Phase::InsertTables => "insert_tables",
            Phase::QualityChecks => "quality_checks",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
