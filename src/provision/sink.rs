//! Configuration sink for provisioned connection values

use crate::cloud::ClusterDescription;
use crate::config::DwhConfig;
use crate::error::{Error, Result};
use std::path::Path;
use tracing::info;

/// Copy the endpoint address and first role ARN into the `CLUSTER` section
///
/// Only `DWH_ENDPOINT` and `DWH_ROLE_ARN` change. Fails when the cluster does
/// not expose an endpoint or a role yet.
pub fn apply_cluster_description(
    config: &mut DwhConfig,
    description: &ClusterDescription,
) -> Result<()> {
    let identifier = &description.cluster_identifier;

    let endpoint = description
        .endpoint
        .as_ref()
        .ok_or_else(|| Error::not_ready(identifier, "no endpoint yet"))?;
    let role_arn = description
        .first_role_arn()
        .ok_or_else(|| Error::not_ready(identifier, "no attached role"))?;

    info!("DWH endpoint: {}", endpoint.address);
    info!("DWH role ARN: {role_arn}");

    config.cluster.endpoint = Some(endpoint.address.clone());
    config.cluster.role_arn = Some(role_arn.to_string());
    Ok(())
}

/// Apply a ready cluster's description and flush the configuration file
pub fn persist(
    config: &mut DwhConfig,
    description: &ClusterDescription,
    path: impl AsRef<Path>,
) -> Result<()> {
    apply_cluster_description(config, description)?;
    config.save(path)
}
