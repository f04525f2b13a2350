//! Resource descriptions and creation payloads

use crate::config::ClusterConfig;
use crate::types::ClusterStatus;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Managed policy granting the cluster read access to the source bucket
pub const S3_READ_ONLY_POLICY_ARN: &str = "arn:aws:iam::aws:policy/AmazonS3ReadOnlyAccess";

/// Service principal allowed to assume the warehouse role
const WAREHOUSE_SERVICE_PRINCIPAL: &str = "redshift.amazonaws.com";

// ============================================================================
// Cluster
// ============================================================================

/// Snapshot of a cluster as returned by describe
///
/// Field names follow the provider's wire shape so a raw describe payload
/// deserializes directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ClusterDescription {
    /// Cluster identifier
    #[serde(default)]
    pub cluster_identifier: String,

    /// Current lifecycle status
    pub cluster_status: ClusterStatus,

    /// Network endpoint, present once the cluster is available
    #[serde(default)]
    pub endpoint: Option<Endpoint>,

    /// Roles attached to the cluster
    #[serde(default)]
    pub iam_roles: Vec<ClusterIamRole>,
}

impl ClusterDescription {
    /// Create a description with no endpoint and no roles
    pub fn new(identifier: impl Into<String>, status: ClusterStatus) -> Self {
        Self {
            cluster_identifier: identifier.into(),
            cluster_status: status,
            endpoint: None,
            iam_roles: Vec::new(),
        }
    }

    /// First attached role ARN
    pub fn first_role_arn(&self) -> Option<&str> {
        self.iam_roles.first().map(|r| r.iam_role_arn.as_str())
    }
}

/// Cluster network endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Endpoint {
    /// Host name
    pub address: String,
    /// Port
    pub port: i32,
}

/// Role reference attached to a cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ClusterIamRole {
    /// Role ARN
    pub iam_role_arn: String,
    /// Attachment status (`in-sync`, `adding`, `removing`)
    #[serde(default)]
    pub apply_status: Option<String>,
}

/// Payload of a create-cluster request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateClusterRequest {
    pub cluster_identifier: String,
    pub cluster_type: String,
    pub node_type: String,
    /// Only sent for multi-node clusters
    pub number_of_nodes: Option<i32>,
    pub db_name: String,
    pub master_username: String,
    pub master_user_password: String,
    pub port: i32,
    pub iam_roles: Vec<String>,
}

impl CreateClusterRequest {
    /// Build the request from the cluster section and the role to attach
    pub fn from_config(cluster: &ClusterConfig, role_arn: &str) -> Self {
        Self {
            cluster_identifier: cluster.identifier.clone(),
            cluster_type: cluster.cluster_type.clone(),
            node_type: cluster.node_type.clone(),
            number_of_nodes: cluster
                .is_multi_node()
                .then(|| i32::try_from(cluster.num_nodes).unwrap_or(i32::MAX)),
            db_name: cluster.db_name.clone(),
            master_username: cluster.db_user.clone(),
            master_user_password: cluster.db_password.clone(),
            port: i32::from(cluster.db_port),
            iam_roles: vec![role_arn.to_string()],
        }
    }
}

// ============================================================================
// Role
// ============================================================================

/// Snapshot of a role as returned by get
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDescription {
    /// Role name
    pub role_name: String,
    /// Role ARN
    pub arn: String,
    /// ARNs of attached managed policies
    #[serde(default)]
    pub attached_policies: Vec<String>,
}

impl RoleDescription {
    /// Check if a managed policy is attached
    pub fn has_policy(&self, policy_arn: &str) -> bool {
        self.attached_policies.iter().any(|p| p == policy_arn)
    }
}

/// Payload of a create-role request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRoleRequest {
    pub path: String,
    pub role_name: String,
    pub description: String,
    /// Serialized trust policy
    pub assume_role_policy_document: String,
}

impl CreateRoleRequest {
    /// Role the warehouse service can assume to read the source bucket
    pub fn for_warehouse(role_name: impl Into<String>) -> Self {
        Self {
            path: "/".to_string(),
            role_name: role_name.into(),
            description: "Allow Redshift to call AWS services".to_string(),
            assume_role_policy_document: trust_policy_document().to_string(),
        }
    }
}

/// Trust policy letting the warehouse service assume the role
pub fn trust_policy_document() -> Value {
    json!({
        "Statement": [{
            "Action": "sts:AssumeRole",
            "Effect": "Allow",
            "Principal": {"Service": WAREHOUSE_SERVICE_PRINCIPAL}
        }],
        "Version": "2012-10-17"
    })
}
