//! IAM role client

use super::types::{CreateRoleRequest, RoleDescription};
use super::{DescribeResource, RoleApi};
use crate::error::{Error, Result};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_iam::error::DisplayErrorContext;
use aws_sdk_iam::operation::get_role::GetRoleError;
use aws_sdk_iam::Client;
use tracing::debug;

const SERVICE: &str = "iam";

/// Role surface backed by the IAM API
#[derive(Debug, Clone)]
pub struct IamRoles {
    client: Client,
}

impl IamRoles {
    /// Create a client from shared SDK configuration
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self::from_client(Client::new(sdk_config))
    }

    /// Wrap an existing client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    async fn attached_policies(&self, role_name: &str) -> Result<Vec<String>> {
        let output = self
            .client
            .list_attached_role_policies()
            .role_name(role_name)
            .send()
            .await
            .map_err(|e| Error::cloud(SERVICE, DisplayErrorContext(&e).to_string()))?;

        Ok(output
            .attached_policies()
            .iter()
            .filter_map(|p| p.policy_arn().map(String::from))
            .collect())
    }
}

#[async_trait]
impl DescribeResource for IamRoles {
    type Description = RoleDescription;

    fn family(&self) -> &'static str {
        SERVICE
    }

    async fn describe(&self, role_name: &str) -> Result<Option<RoleDescription>> {
        let output = match self.client.get_role().role_name(role_name).send().await {
            Ok(output) => output,
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(GetRoleError::is_no_such_entity_exception) =>
            {
                debug!("Role {role_name} not found");
                return Ok(None);
            }
            Err(err) => return Err(Error::cloud(SERVICE, DisplayErrorContext(&err).to_string())),
        };

        let Some(role) = output.role() else {
            return Ok(None);
        };

        Ok(Some(RoleDescription {
            role_name: role.role_name().to_string(),
            arn: role.arn().to_string(),
            attached_policies: self.attached_policies(role_name).await?,
        }))
    }
}

#[async_trait]
impl RoleApi for IamRoles {
    async fn create_role(&self, request: &CreateRoleRequest) -> Result<RoleDescription> {
        let output = self
            .client
            .create_role()
            .path(&request.path)
            .role_name(&request.role_name)
            .description(&request.description)
            .assume_role_policy_document(&request.assume_role_policy_document)
            .send()
            .await
            .map_err(|e| Error::cloud(SERVICE, DisplayErrorContext(&e).to_string()))?;

        let role = output
            .role()
            .ok_or_else(|| Error::cloud(SERVICE, "create-role response carried no role"))?;

        Ok(RoleDescription {
            role_name: role.role_name().to_string(),
            arn: role.arn().to_string(),
            attached_policies: Vec::new(),
        })
    }

    async fn attach_policy(&self, role_name: &str, policy_arn: &str) -> Result<()> {
        self.client
            .attach_role_policy()
            .role_name(role_name)
            .policy_arn(policy_arn)
            .send()
            .await
            .map_err(|e| Error::cloud(SERVICE, DisplayErrorContext(&e).to_string()))?;
        Ok(())
    }

    async fn detach_policy(&self, role_name: &str, policy_arn: &str) -> Result<()> {
        self.client
            .detach_role_policy()
            .role_name(role_name)
            .policy_arn(policy_arn)
            .send()
            .await
            .map_err(|e| Error::cloud(SERVICE, DisplayErrorContext(&e).to_string()))?;
        Ok(())
    }

    async fn delete_role(&self, role_name: &str) -> Result<()> {
        self.client
            .delete_role()
            .role_name(role_name)
            .send()
            .await
            .map_err(|e| Error::cloud(SERVICE, DisplayErrorContext(&e).to_string()))?;
        Ok(())
    }
}
