//! Common types used throughout dwh-etl
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// One result row rendered as text, `None` for SQL NULL
pub type Row = Vec<Option<String>>;

// ============================================================================
// Cluster Status
// ============================================================================

/// Lifecycle status of a warehouse cluster
///
/// Redshift reports status as a free-form lowercase string. Known values map
/// to dedicated variants; the `incompatible-*` family and other unrecoverable
/// states map to `Failed`, anything else is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ClusterStatus {
    Creating,
    Available,
    Modifying,
    Rebooting,
    Resizing,
    Deleting,
    FinalSnapshot,
    Paused,
    Pausing,
    Resuming,
    /// Unrecoverable status (raw value kept)
    Failed(String),
    /// Status not known to this crate (raw value kept)
    Other(String),
}

impl ClusterStatus {
    /// Parse a status string as reported by the cluster API
    pub fn parse(raw: &str) -> Self {
        let lower = raw.trim().to_ascii_lowercase();
        match lower.as_str() {
            "creating" => Self::Creating,
            "available" => Self::Available,
            "modifying" => Self::Modifying,
            "rebooting" => Self::Rebooting,
            "resizing" => Self::Resizing,
            "deleting" => Self::Deleting,
            "final-snapshot" => Self::FinalSnapshot,
            "paused" => Self::Paused,
            "pausing" => Self::Pausing,
            "resuming" => Self::Resuming,
            "hardware-failure" | "storage-full" => Self::Failed(raw.trim().to_string()),
            s if s.starts_with("incompatible-") => Self::Failed(raw.trim().to_string()),
            _ => Self::Other(raw.to_string()),
        }
    }

    /// The status string as the API spells it
    pub fn as_str(&self) -> &str {
        match self {
            Self::Creating => "creating",
            Self::Available => "available",
            Self::Modifying => "modifying",
            Self::Rebooting => "rebooting",
            Self::Resizing => "resizing",
            Self::Deleting => "deleting",
            Self::FinalSnapshot => "final-snapshot",
            Self::Paused => "paused",
            Self::Pausing => "pausing",
            Self::Resuming => "resuming",
            Self::Failed(raw) | Self::Other(raw) => raw,
        }
    }

    /// Check if the cluster accepts connections
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }

    /// Check if the cluster is in an unrecoverable status
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl fmt::Display for ClusterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for ClusterStatus {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<ClusterStatus> for String {
    fn from(status: ClusterStatus) -> Self {
        status.as_str().to_string()
    }
}

// ============================================================================
// Provision Outcome
// ============================================================================

/// What the provisioner did for a single resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// The resource was absent and a creation request succeeded
    Created,
    /// The resource was already present, nothing was issued
    AlreadyExisted,
    /// The creation request failed; the flow continued to describe and poll
    CreateFailed(String),
}

impl ProvisionOutcome {
    /// Check if this run issued a successful creation request
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created)
    }
}

impl fmt::Display for ProvisionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => f.write_str("created"),
            Self::AlreadyExisted => f.write_str("already existed"),
            Self::CreateFailed(message) => write!(f, "create failed ({message})"),
        }
    }
}

// ============================================================================
// Utilities
// ============================================================================

/// Extension trait for Option<String> to handle empty strings
pub trait OptionStringExt {
    /// Returns None if the string is empty
    fn none_if_empty(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_empty(self) -> Option<String> {
        self.filter(|s| !s.is_empty())
    }
}

impl OptionStringExt for String {
    fn none_if_empty(self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("creating", ClusterStatus::Creating; "creating")]
    #[test_case("available", ClusterStatus::Available; "available")]
    #[test_case("Available", ClusterStatus::Available; "mixed case")]
    #[test_case("deleting", ClusterStatus::Deleting; "deleting")]
    #[test_case("final-snapshot", ClusterStatus::FinalSnapshot; "final snapshot")]
    #[test_case("incompatible-network", ClusterStatus::Failed("incompatible-network".into()); "incompatible")]
    #[test_case("hardware-failure", ClusterStatus::Failed("hardware-failure".into()); "hardware failure")]
    #[test_case("cancelling-resize", ClusterStatus::Other("cancelling-resize".into()); "unknown")]
    fn test_cluster_status_parse(raw: &str, expected: ClusterStatus) {
        assert_eq!(ClusterStatus::parse(raw), expected);
    }

    #[test]
    fn test_cluster_status_round_trips_raw_string() {
        for raw in ["creating", "available", "incompatible-hsm", "cancelling-resize"] {
            assert_eq!(ClusterStatus::parse(raw).as_str(), raw);
        }
    }

    #[test]
    fn test_failed_status_keeps_original_spelling() {
        let status = ClusterStatus::parse("Incompatible-Network");
        assert!(status.is_failed());
        assert_eq!(status.as_str(), "Incompatible-Network");
        assert_eq!(
            ClusterStatus::parse(" Storage-Full "),
            ClusterStatus::Failed("Storage-Full".into())
        );
    }

    #[test]
    fn test_cluster_status_predicates() {
        assert!(ClusterStatus::Available.is_available());
        assert!(!ClusterStatus::Creating.is_available());
        assert!(ClusterStatus::parse("storage-full").is_failed());
        assert!(!ClusterStatus::Deleting.is_failed());
    }

    #[test]
    fn test_cluster_status_serde() {
        let status: ClusterStatus = serde_json::from_str("\"creating\"").unwrap();
        assert_eq!(status, ClusterStatus::Creating);

        let json = serde_json::to_string(&ClusterStatus::FinalSnapshot).unwrap();
        assert_eq!(json, "\"final-snapshot\"");
    }

    #[test]
    fn test_provision_outcome_display() {
        assert_eq!(ProvisionOutcome::Created.to_string(), "created");
        assert_eq!(
            ProvisionOutcome::CreateFailed("quota".into()).to_string(),
            "create failed (quota)"
        );
        assert!(ProvisionOutcome::Created.is_created());
        assert!(!ProvisionOutcome::AlreadyExisted.is_created());
    }

    #[test]
    fn test_option_string_none_if_empty() {
        assert_eq!(
            Some("test".to_string()).none_if_empty(),
            Some("test".to_string())
        );
        assert_eq!(Some(String::new()).none_if_empty(), None);
        assert_eq!(None::<String>.none_if_empty(), None);
        assert_eq!("test".to_string().none_if_empty(), Some("test".to_string()));
        assert_eq!(String::new().none_if_empty(), None);
    }
}
