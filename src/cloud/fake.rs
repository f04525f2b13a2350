//! In-memory cloud surfaces for tests

use super::types::{
    ClusterDescription, ClusterIamRole, CreateClusterRequest, CreateRoleRequest, Endpoint,
    RoleDescription,
};
use super::{ClusterApi, DescribeResource, RoleApi};
use crate::error::{Error, Result};
use crate::types::ClusterStatus;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Scripted describe answer
#[derive(Debug, Clone)]
pub(crate) enum Scripted {
    Status(ClusterStatus),
    Absent,
    Fail(String),
}

#[derive(Debug, Default)]
struct ClusterState {
    clusters: HashMap<String, ClusterDescription>,
    script: VecDeque<Scripted>,
    create_error: Option<String>,
    create_calls: u32,
    delete_calls: u32,
    describe_calls: u32,
}

/// Cluster surface whose describe answers can be scripted
///
/// Scripted answers are consumed first, one per describe call. Once the script
/// is empty, describe answers from the stored clusters.
#[derive(Debug, Default)]
pub(crate) struct FakeClusters {
    state: Mutex<ClusterState>,
}

impl FakeClusters {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Store an existing cluster
    pub(crate) fn with_cluster(self, description: ClusterDescription) -> Self {
        self.state
            .lock()
            .unwrap()
            .clusters
            .insert(description.cluster_identifier.clone(), description);
        self
    }

    /// Queue describe answers
    pub(crate) fn with_script(self, script: impl IntoIterator<Item = Scripted>) -> Self {
        self.state.lock().unwrap().script.extend(script);
        self
    }

    /// Make create-cluster fail
    pub(crate) fn failing_create(self, message: &str) -> Self {
        self.state.lock().unwrap().create_error = Some(message.to_string());
        self
    }

    pub(crate) fn create_calls(&self) -> u32 {
        self.state.lock().unwrap().create_calls
    }

    pub(crate) fn delete_calls(&self) -> u32 {
        self.state.lock().unwrap().delete_calls
    }

    pub(crate) fn describe_calls(&self) -> u32 {
        self.state.lock().unwrap().describe_calls
    }
}

/// An available cluster with an endpoint and one role
pub(crate) fn available_cluster(identifier: &str, role_arn: &str) -> ClusterDescription {
    ClusterDescription {
        cluster_identifier: identifier.to_string(),
        cluster_status: ClusterStatus::Available,
        endpoint: Some(Endpoint {
            address: format!("{identifier}.example.us-west-2.redshift.amazonaws.com"),
            port: 5439,
        }),
        iam_roles: vec![ClusterIamRole {
            iam_role_arn: role_arn.to_string(),
            apply_status: Some("in-sync".to_string()),
        }],
    }
}

#[async_trait]
impl DescribeResource for FakeClusters {
    type Description = ClusterDescription;

    fn family(&self) -> &'static str {
        "redshift"
    }

    async fn describe(&self, identifier: &str) -> Result<Option<ClusterDescription>> {
        let mut state = self.state.lock().unwrap();
        state.describe_calls += 1;

        match state.script.pop_front() {
            Some(Scripted::Status(status)) => {
                // A scripted status sticks to a stored cluster
                if let Some(stored) = state.clusters.get_mut(identifier) {
                    stored.cluster_status = status;
                    return Ok(Some(stored.clone()));
                }
                Ok(Some(ClusterDescription::new(identifier, status)))
            }
            Some(Scripted::Absent) => Ok(None),
            Some(Scripted::Fail(message)) => Err(Error::cloud("redshift", message)),
            None => Ok(state.clusters.get(identifier).cloned()),
        }
    }
}

#[async_trait]
impl ClusterApi for FakeClusters {
    async fn create_cluster(&self, request: &CreateClusterRequest) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.create_calls += 1;
        if let Some(message) = state.create_error.clone() {
            return Err(Error::cloud("redshift", message));
        }

        let mut description = available_cluster(
            &request.cluster_identifier,
            request.iam_roles.first().map_or("", String::as_str),
        );
        description.cluster_status = ClusterStatus::Creating;
        state
            .clusters
            .insert(request.cluster_identifier.clone(), description);
        Ok(())
    }

    async fn delete_cluster(&self, identifier: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.delete_calls += 1;
        state.clusters.remove(identifier);
        Ok(())
    }
}

#[derive(Debug, Default)]
struct RoleState {
    roles: HashMap<String, RoleDescription>,
    calls: Vec<String>,
}

/// Role surface backed by a map, recording every mutating call
#[derive(Debug, Default)]
pub(crate) struct FakeRoles {
    state: Mutex<RoleState>,
}

impl FakeRoles {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Store an existing role with the given policies
    pub(crate) fn with_role(self, name: &str, policies: &[&str]) -> Self {
        self.state.lock().unwrap().roles.insert(
            name.to_string(),
            RoleDescription {
                role_name: name.to_string(),
                arn: role_arn(name),
                attached_policies: policies.iter().map(ToString::to_string).collect(),
            },
        );
        self
    }

    /// Mutating calls in order, e.g. `create:dwhRole`
    pub(crate) fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }
}

pub(crate) fn role_arn(name: &str) -> String {
    format!("arn:aws:iam::123456789012:role/{name}")
}

#[async_trait]
impl DescribeResource for FakeRoles {
    type Description = RoleDescription;

    fn family(&self) -> &'static str {
        "iam"
    }

    async fn describe(&self, role_name: &str) -> Result<Option<RoleDescription>> {
        Ok(self.state.lock().unwrap().roles.get(role_name).cloned())
    }
}

#[async_trait]
impl RoleApi for FakeRoles {
    async fn create_role(&self, request: &CreateRoleRequest) -> Result<RoleDescription> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("create:{}", request.role_name));
        let role = RoleDescription {
            role_name: request.role_name.clone(),
            arn: role_arn(&request.role_name),
            attached_policies: Vec::new(),
        };
        state.roles.insert(request.role_name.clone(), role.clone());
        Ok(role)
    }

    async fn attach_policy(&self, role_name: &str, policy_arn: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("attach:{role_name}:{policy_arn}"));
        let role = state
            .roles
            .get_mut(role_name)
            .ok_or_else(|| Error::cloud("iam", format!("no role {role_name}")))?;
        role.attached_policies.push(policy_arn.to_string());
        Ok(())
    }

    async fn detach_policy(&self, role_name: &str, policy_arn: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("detach:{role_name}:{policy_arn}"));
        if let Some(role) = state.roles.get_mut(role_name) {
            role.attached_policies.retain(|p| p != policy_arn);
        }
        Ok(())
    }

    async fn delete_role(&self, role_name: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("delete:{role_name}"));
        let attached = state
            .roles
            .get(role_name)
            .is_some_and(|r| !r.attached_policies.is_empty());
        if attached {
            return Err(Error::cloud("iam", "DeleteConflict: detach policies first"));
        }
        state.roles.remove(role_name);
        Ok(())
    }
}
