//! Redshift cluster client

use super::types::{ClusterDescription, ClusterIamRole, CreateClusterRequest, Endpoint};
use super::{ClusterApi, DescribeResource};
use crate::error::{Error, Result};
use crate::types::ClusterStatus;
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_redshift::error::DisplayErrorContext;
use aws_sdk_redshift::operation::describe_clusters::DescribeClustersError;
use aws_sdk_redshift::types::Cluster;
use aws_sdk_redshift::Client;
use tracing::debug;

const SERVICE: &str = "redshift";

/// Cluster surface backed by the Redshift API
#[derive(Debug, Clone)]
pub struct RedshiftClusters {
    client: Client,
}

impl RedshiftClusters {
    /// Create a client from shared SDK configuration
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self::from_client(Client::new(sdk_config))
    }

    /// Wrap an existing client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DescribeResource for RedshiftClusters {
    type Description = ClusterDescription;

    fn family(&self) -> &'static str {
        SERVICE
    }

    async fn describe(&self, identifier: &str) -> Result<Option<ClusterDescription>> {
        match self
            .client
            .describe_clusters()
            .cluster_identifier(identifier)
            .send()
            .await
        {
            Ok(output) => Ok(output.clusters().first().map(to_description)),
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(DescribeClustersError::is_cluster_not_found_fault) =>
            {
                debug!("Cluster {identifier} not found");
                Ok(None)
            }
            Err(err) => Err(Error::cloud(SERVICE, DisplayErrorContext(&err).to_string())),
        }
    }
}

#[async_trait]
impl ClusterApi for RedshiftClusters {
    async fn create_cluster(&self, request: &CreateClusterRequest) -> Result<()> {
        self.client
            .create_cluster()
            .cluster_identifier(&request.cluster_identifier)
            .cluster_type(&request.cluster_type)
            .node_type(&request.node_type)
            .set_number_of_nodes(request.number_of_nodes)
            .db_name(&request.db_name)
            .master_username(&request.master_username)
            .master_user_password(&request.master_user_password)
            .port(request.port)
            .set_iam_roles(Some(request.iam_roles.clone()))
            .send()
            .await
            .map_err(|e| Error::cloud(SERVICE, DisplayErrorContext(&e).to_string()))?;
        Ok(())
    }

    async fn delete_cluster(&self, identifier: &str) -> Result<()> {
        self.client
            .delete_cluster()
            .cluster_identifier(identifier)
            .skip_final_cluster_snapshot(true)
            .send()
            .await
            .map_err(|e| Error::cloud(SERVICE, DisplayErrorContext(&e).to_string()))?;
        Ok(())
    }
}

/// Convert an SDK cluster into a description
fn to_description(cluster: &Cluster) -> ClusterDescription {
    ClusterDescription {
        cluster_identifier: cluster.cluster_identifier().unwrap_or_default().to_string(),
        cluster_status: ClusterStatus::parse(cluster.cluster_status().unwrap_or_default()),
        endpoint: cluster.endpoint().and_then(|e| {
            Some(Endpoint {
                address: e.address()?.to_string(),
                port: e.port().unwrap_or_default(),
            })
        }),
        iam_roles: cluster
            .iam_roles()
            .iter()
            .filter_map(|r| {
                Some(ClusterIamRole {
                    iam_role_arn: r.iam_role_arn()?.to_string(),
                    apply_status: r.apply_status().map(String::from),
                })
            })
            .collect(),
    }
}
