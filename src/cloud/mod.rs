//! Cloud resource clients
//!
//! Capability traits for the two resource families the provisioner manages,
//! plus their AWS SDK implementations.
//!
//! # Overview
//!
//! - `DescribeResource` - single-resource lookup returning `Option`
//! - `ClusterApi` - Redshift cluster describe/create/delete
//! - `RoleApi` - IAM role get/create/attach/detach/delete
//!
//! "Not found" faults are mapped to `Ok(None)` inside the implementations, so
//! callers never match on provider-specific error types.

mod iam;
mod redshift;
mod types;

#[cfg(test)]
pub(crate) mod fake;

pub use iam::IamRoles;
pub use redshift::RedshiftClusters;
pub use types::{
    trust_policy_document, ClusterDescription, ClusterIamRole, CreateClusterRequest,
    CreateRoleRequest, Endpoint, RoleDescription, S3_READ_ONLY_POLICY_ARN,
};

use crate::error::Result;
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_redshift::config::Credentials;
use tracing::debug;

/// Environment variable holding the access key id
pub const ACCESS_KEY_ENV: &str = "KEY";

/// Environment variable holding the secret access key
pub const SECRET_KEY_ENV: &str = "SECRET";

/// Lookup of a single named resource
#[async_trait]
pub trait DescribeResource: Send + Sync {
    /// Description returned for an existing resource
    type Description: Send;

    /// Resource family name used in logs and errors
    fn family(&self) -> &'static str;

    /// Describe a resource, `None` when it does not exist
    async fn describe(&self, identifier: &str) -> Result<Option<Self::Description>>;
}

/// Cluster management surface
#[async_trait]
pub trait ClusterApi: DescribeResource<Description = ClusterDescription> {
    /// Issue a create-cluster request (returns before the cluster is ready)
    async fn create_cluster(&self, request: &CreateClusterRequest) -> Result<()>;

    /// Issue a delete-cluster request without a final snapshot
    async fn delete_cluster(&self, identifier: &str) -> Result<()>;
}

/// Role management surface
#[async_trait]
pub trait RoleApi: DescribeResource<Description = RoleDescription> {
    /// Create a role and return its description
    async fn create_role(&self, request: &CreateRoleRequest) -> Result<RoleDescription>;

    /// Attach a managed policy to a role
    async fn attach_policy(&self, role_name: &str, policy_arn: &str) -> Result<()>;

    /// Detach a managed policy from a role
    async fn detach_policy(&self, role_name: &str, policy_arn: &str) -> Result<()>;

    /// Delete a role (all policies must be detached first)
    async fn delete_role(&self, role_name: &str) -> Result<()>;
}

/// Build the shared SDK configuration for a region
///
/// Uses static credentials from `KEY`/`SECRET` when both are set, otherwise
/// the default provider chain (profile, environment, instance metadata).
pub async fn load_sdk_config(region: &str) -> SdkConfig {
    let mut loader =
        aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region.to_string()));

    if let (Ok(key), Ok(secret)) = (
        std::env::var(ACCESS_KEY_ENV),
        std::env::var(SECRET_KEY_ENV),
    ) {
        debug!("Using static credentials from {ACCESS_KEY_ENV}/{SECRET_KEY_ENV}");
        loader = loader.credentials_provider(Credentials::new(key, secret, None, None, "dwh-env"));
    }

    loader.load().await
}
