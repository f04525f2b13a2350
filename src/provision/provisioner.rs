//! Idempotent role and cluster provisioning

use super::exists::exists;
use super::poller::{PollOutcome, Poller};
use crate::cloud::{
    ClusterApi, ClusterDescription, CreateClusterRequest, CreateRoleRequest, RoleApi,
    RoleDescription, S3_READ_ONLY_POLICY_ARN,
};
use crate::config::DwhConfig;
use crate::error::{Error, Result};
use crate::types::{ClusterStatus, ProvisionOutcome};
use serde::Serialize;
use std::fmt;
use tracing::{info, instrument, warn};

/// Role and cluster after a successful `provision`
#[derive(Debug, Clone)]
pub struct Provisioned {
    pub role: RoleDescription,
    pub role_outcome: ProvisionOutcome,
    pub cluster: ClusterDescription,
    pub cluster_outcome: ProvisionOutcome,
}

/// Current state of both resources
#[derive(Debug, Clone, Serialize)]
pub struct ResourceStatus {
    pub cluster: Option<ClusterDescription>,
    pub role: Option<RoleDescription>,
}

/// Step a dry run would take
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PlannedAction {
    CreateRole { name: String },
    KeepRole { name: String },
    DeleteRole { name: String, detach: Vec<String> },
    CreateCluster { identifier: String },
    KeepCluster { identifier: String, status: String },
    DeleteCluster { identifier: String },
    Nothing { resource: String },
}

impl fmt::Display for PlannedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateRole { name } => write!(f, "create role {name} and attach S3 read-only policy"),
            Self::KeepRole { name } => write!(f, "keep existing role {name}"),
            Self::DeleteRole { name, detach } => {
                write!(f, "detach {} policies and delete role {name}", detach.len())
            }
            Self::CreateCluster { identifier } => write!(f, "create cluster {identifier}"),
            Self::KeepCluster { identifier, status } => {
                write!(f, "keep existing cluster {identifier} ({status})")
            }
            Self::DeleteCluster { identifier } => write!(f, "delete cluster {identifier}"),
            Self::Nothing { resource } => write!(f, "nothing to do for {resource}"),
        }
    }
}

/// Reconciles the warehouse role and cluster against the configuration
pub struct Provisioner<'a, C: ?Sized, R: ?Sized> {
    config: &'a DwhConfig,
    clusters: &'a C,
    roles: &'a R,
    poller: Poller,
}

impl<'a, C, R> Provisioner<'a, C, R>
where
    C: ClusterApi + ?Sized,
    R: RoleApi + ?Sized,
{
    /// Create a provisioner
    pub fn new(config: &'a DwhConfig, clusters: &'a C, roles: &'a R, poller: Poller) -> Self {
        Self {
            config,
            clusters,
            roles,
            poller,
        }
    }

    fn cluster_id(&self) -> &str {
        &self.config.cluster.identifier
    }

    fn role_name(&self) -> &str {
        &self.config.iam_role.name
    }

    /// Ensure the role, then the cluster, and wait for the cluster
    pub async fn provision(&self) -> Result<Provisioned> {
        let (role, role_outcome) = self.ensure_role().await?;
        let (cluster, cluster_outcome) = self.ensure_cluster(&role).await?;
        Ok(Provisioned {
            role,
            role_outcome,
            cluster,
            cluster_outcome,
        })
    }

    /// Create the role with its storage policy unless it already exists
    ///
    /// A failure between create and attach is not rolled back.
    #[instrument(skip(self), fields(role = %self.role_name()))]
    pub async fn ensure_role(&self) -> Result<(RoleDescription, ProvisionOutcome)> {
        let name = self.role_name();

        if let Some(existing) = self.roles.describe(name).await? {
            info!("Role {name} already exists");
            if !existing.has_policy(S3_READ_ONLY_POLICY_ARN) {
                warn!("Role {name} does not carry {S3_READ_ONLY_POLICY_ARN}; COPY may be denied");
            }
            return Ok((existing, ProvisionOutcome::AlreadyExisted));
        }

        let mut role = self
            .roles
            .create_role(&CreateRoleRequest::for_warehouse(name))
            .await?;
        self.roles
            .attach_policy(name, S3_READ_ONLY_POLICY_ARN)
            .await?;
        role.attached_policies.push(S3_READ_ONLY_POLICY_ARN.to_string());

        info!(arn = %role.arn, "Created role {name}");
        Ok((role, ProvisionOutcome::Created))
    }

    /// Create the cluster unless it already exists, then wait until it leaves
    /// `creating`
    ///
    /// A failed create request is logged and reported as
    /// `ProvisionOutcome::CreateFailed`; the flow still polls so a request
    /// that failed after the cluster was accepted is not mistaken for absence.
    #[instrument(skip(self, role), fields(cluster = %self.cluster_id()))]
    pub async fn ensure_cluster(
        &self,
        role: &RoleDescription,
    ) -> Result<(ClusterDescription, ProvisionOutcome)> {
        let identifier = self.cluster_id();

        let outcome = if exists(self.clusters, identifier).await? {
            info!("Cluster {identifier} already exists");
            ProvisionOutcome::AlreadyExisted
        } else {
            let request = CreateClusterRequest::from_config(&self.config.cluster, &role.arn);
            match self.clusters.create_cluster(&request).await {
                Ok(()) => {
                    info!("Requested cluster {identifier}");
                    ProvisionOutcome::Created
                }
                Err(e) => {
                    warn!("Exception creating cluster: {e}");
                    ProvisionOutcome::CreateFailed(e.to_string())
                }
            }
        };

        let report = self
            .poller
            .poll_until(self.clusters, identifier, &ClusterStatus::Creating)
            .await?;

        let description = match (report.outcome, &outcome) {
            (PollOutcome::Settled(description), _) => description,
            (PollOutcome::Absent, ProvisionOutcome::CreateFailed(message)) => {
                return Err(Error::CreateFailed {
                    identifier: identifier.to_string(),
                    message: message.clone(),
                });
            }
            (PollOutcome::Absent, _) => {
                return Err(Error::not_ready(
                    identifier,
                    "cluster disappeared while waiting for it",
                ));
            }
        };

        let status = &description.cluster_status;
        if status.is_failed() {
            return Err(Error::ResourceFailed {
                identifier: identifier.to_string(),
                status: status.to_string(),
            });
        }
        if !status.is_available() {
            return Err(Error::not_ready(identifier, format!("status is '{status}'")));
        }

        info!(sleeps = report.sleeps, "Cluster {identifier} is available");
        Ok((description, outcome))
    }

    /// Delete the cluster and then the role
    pub async fn teardown(&self) -> Result<()> {
        self.delete_cluster().await?;
        self.delete_role().await?;
        Ok(())
    }

    /// Delete the cluster without a final snapshot and wait until it is gone
    ///
    /// Returns `false` when there was nothing to delete.
    #[instrument(skip(self), fields(cluster = %self.cluster_id()))]
    pub async fn delete_cluster(&self) -> Result<bool> {
        let identifier = self.cluster_id();

        if !exists(self.clusters, identifier).await? {
            info!("Nothing to do for {identifier}");
            return Ok(false);
        }

        self.clusters.delete_cluster(identifier).await?;

        let report = self
            .poller
            .poll_until_absent(self.clusters, identifier, &ClusterStatus::Available)
            .await?;

        match report.outcome {
            PollOutcome::Absent => {
                info!(sleeps = report.sleeps, "Cluster deleted");
                Ok(true)
            }
            PollOutcome::Settled(description) => Err(Error::cloud(
                self.clusters.family(),
                format!(
                    "cluster {identifier} stopped deleting with status '{}'",
                    description.cluster_status
                ),
            )),
        }
    }

    /// Detach every managed policy from the role and delete it
    ///
    /// Returns `false` when there was nothing to delete.
    #[instrument(skip(self), fields(role = %self.role_name()))]
    pub async fn delete_role(&self) -> Result<bool> {
        let name = self.role_name();

        let Some(role) = self.roles.describe(name).await? else {
            info!("No role to delete");
            return Ok(false);
        };

        for policy_arn in &role.attached_policies {
            self.roles.detach_policy(name, policy_arn).await?;
        }
        self.roles.delete_role(name).await?;

        info!("iam role deleted");
        Ok(true)
    }

    /// Describe both resources without changing anything
    pub async fn status(&self) -> Result<ResourceStatus> {
        Ok(ResourceStatus {
            cluster: self.clusters.describe(self.cluster_id()).await?,
            role: self.roles.describe(self.role_name()).await?,
        })
    }

    /// Steps `provision` would take
    pub async fn plan_provision(&self) -> Result<Vec<PlannedAction>> {
        let status = self.status().await?;
        let name = self.role_name().to_string();
        let identifier = self.cluster_id().to_string();

        Ok(vec![
            match status.role {
                Some(_) => PlannedAction::KeepRole { name },
                None => PlannedAction::CreateRole { name },
            },
            match status.cluster {
                Some(cluster) => PlannedAction::KeepCluster {
                    identifier,
                    status: cluster.cluster_status.to_string(),
                },
                None => PlannedAction::CreateCluster { identifier },
            },
        ])
    }

    /// Steps `teardown` would take
    pub async fn plan_teardown(&self) -> Result<Vec<PlannedAction>> {
        let status = self.status().await?;
        let name = self.role_name().to_string();
        let identifier = self.cluster_id().to_string();

        Ok(vec![
            match status.cluster {
                Some(_) => PlannedAction::DeleteCluster { identifier },
                None => PlannedAction::Nothing {
                    resource: identifier,
                },
            },
            match status.role {
                Some(role) => PlannedAction::DeleteRole {
                    name,
                    detach: role.attached_policies,
                },
                None => PlannedAction::Nothing { resource: name },
            },
        ])
    }
}
