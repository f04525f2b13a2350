//! Error types for dwh-etl
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for dwh-etl
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Cloud Errors
    // ============================================================================
    #[error("{service} request failed: {message}")]
    Cloud { service: String, message: String },

    #[error("Cluster '{identifier}' is not ready: {message}")]
    ClusterNotReady { identifier: String, message: String },

    #[error("Cluster '{identifier}' entered failed status '{status}'")]
    ResourceFailed { identifier: String, status: String },

    #[error("Cluster '{identifier}' still '{status}' after {attempts} poll attempts")]
    PollTimeout {
        identifier: String,
        status: String,
        attempts: u32,
    },

    #[error("Failed to create cluster '{identifier}': {message}")]
    CreateFailed { identifier: String, message: String },

    // ============================================================================
    // Database Errors
    // ============================================================================
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    #[error("Statement failed: {message}\n{statement}")]
    Statement { statement: String, message: String },

    #[error("Query did not return results: {statement}")]
    EmptyResult { statement: String },

    // ============================================================================
    // Catalog Errors
    // ============================================================================
    #[error("Catalog error: {message}")]
    Catalog { message: String },

    // ============================================================================
    // Template Errors
    // ============================================================================
    #[error("Undefined variable in template: {variable}")]
    UndefinedVariable { variable: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a cloud service error
    pub fn cloud(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Cloud {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Create a cluster-not-ready error
    pub fn not_ready(identifier: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ClusterNotReady {
            identifier: identifier.into(),
            message: message.into(),
        }
    }

    /// Create a statement error
    pub fn statement(statement: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Statement {
            statement: statement.into(),
            message: message.into(),
        }
    }

    /// Create an empty result error
    pub fn empty_result(statement: impl Into<String>) -> Self {
        Self::EmptyResult {
            statement: statement.into(),
        }
    }

    /// Create a catalog error
    pub fn catalog(message: impl Into<String>) -> Self {
        Self::Catalog {
            message: message.into(),
        }
    }

    /// Create an undefined variable error
    pub fn undefined_var(variable: impl Into<String>) -> Self {
        Self::UndefinedVariable {
            variable: variable.into(),
        }
    }

    /// Check if this error ends a poll loop because the cluster is unusable
    pub fn is_terminal_cluster_state(&self) -> bool {
        matches!(self, Error::ResourceFailed { .. } | Error::PollTimeout { .. })
    }
}

/// Result type alias for dwh-etl
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
