//! Warehouse configuration
//!
//! The configuration file is a sectioned TOML document shared by every
//! command. Provisioning writes the derived `DWH_ENDPOINT` and `DWH_ROLE_ARN`
//! back into the `CLUSTER` section; the table, ETL and check commands read
//! them. Keys this crate does not know about are carried through a
//! load/save cycle unchanged.
//!
//! ```toml
//! [CLUSTER]
//! DWH_REGION = "us-west-2"
//! DWH_CLUSTER_IDENTIFIER = "dwhCluster"
//! DWH_CLUSTER_TYPE = "multi-node"
//! DWH_NODE_TYPE = "dc2.large"
//! DWH_NUM_NODES = 4
//! DB_NAME = "dwh"
//! DB_USER = "dwhuser"
//! DB_PASSWORD = "Passw0rd"
//! DB_PORT = 5439
//!
//! [IAM_ROLE]
//! DWH_IAM_ROLE_NAME = "dwhRole"
//! ```

use crate::error::{Error, Result};
use crate::template::TemplateContext;
use crate::types::OptionStringExt;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "dwh.toml";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete warehouse configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DwhConfig {
    /// Cluster shape, database credentials and derived connection values
    #[serde(rename = "CLUSTER")]
    pub cluster: ClusterConfig,

    /// Access role used by the cluster to read the source bucket
    #[serde(rename = "IAM_ROLE")]
    pub iam_role: IamRoleConfig,

    /// Source data locations
    #[serde(rename = "S3", default, skip_serializing_if = "Option::is_none")]
    pub s3: Option<S3Config>,

    /// Readiness polling settings
    #[serde(rename = "POLL", default, skip_serializing_if = "Option::is_none")]
    pub poll: Option<PollConfig>,

    /// Sections not used by this crate
    #[serde(flatten)]
    pub extra: BTreeMap<String, toml::Value>,
}

impl DwhConfig {
    /// Parse and validate a configuration document
    pub fn parse(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML document
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Load configuration from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("Failed to read config file: {e}")))?;
        Self::parse(&contents)
    }

    /// Write the configuration back to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let contents = self.to_toml_string()?;

        // Write to temp file first, then rename for atomicity
        let temp_path = path.with_extension("tmp");
        std::fs::write(&temp_path, &contents)
            .map_err(|e| Error::config(format!("Failed to write config file: {e}")))?;
        std::fs::rename(&temp_path, path)
            .map_err(|e| Error::config(format!("Failed to rename config file: {e}")))?;

        Ok(())
    }

    /// Validate required fields and value ranges
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("DWH_REGION", &self.cluster.region),
            ("DWH_CLUSTER_IDENTIFIER", &self.cluster.identifier),
            ("DB_NAME", &self.cluster.db_name),
            ("DB_USER", &self.cluster.db_user),
            ("DB_PASSWORD", &self.cluster.db_password),
            ("DWH_IAM_ROLE_NAME", &self.iam_role.name),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(Error::missing_field(field));
            }
        }

        match self.cluster.cluster_type.as_str() {
            "single-node" => {}
            "multi-node" => {
                if self.cluster.num_nodes < 2 {
                    return Err(Error::invalid_value(
                        "DWH_NUM_NODES",
                        "multi-node clusters need at least 2 nodes",
                    ));
                }
            }
            other => {
                return Err(Error::invalid_value(
                    "DWH_CLUSTER_TYPE",
                    format!("expected 'single-node' or 'multi-node', got '{other}'"),
                ));
            }
        }

        if self.cluster.db_port == 0 {
            return Err(Error::invalid_value("DB_PORT", "port cannot be 0"));
        }

        if self.poll.as_ref().is_some_and(|poll| poll.interval_seconds == 0) {
            return Err(Error::invalid_value(
                "INTERVAL_SECONDS",
                "poll interval must be at least 1 second",
            ));
        }

        Ok(())
    }

    /// Source locations, falling back to defaults when the section is absent
    pub fn sources(&self) -> S3Config {
        self.s3.clone().unwrap_or_default()
    }

    /// Poll settings, falling back to defaults when the section is absent
    pub fn polling(&self) -> PollConfig {
        self.poll.clone().unwrap_or_default()
    }

    /// Template context for rendering catalog statements
    ///
    /// Exposes `cluster.*` and `s3.*` variables. Provisioned values that are
    /// not set yet are left undefined so statements that need them fail to
    /// render instead of running with an empty value.
    pub fn template_context(&self) -> TemplateContext {
        let mut cluster = json!({
            "region": self.cluster.region,
            "identifier": self.cluster.identifier,
            "db_name": self.cluster.db_name,
            "db_user": self.cluster.db_user,
            "db_port": self.cluster.db_port,
        });
        if let Some(endpoint) = self.cluster.endpoint.clone().none_if_empty() {
            cluster["endpoint"] = json!(endpoint);
        }
        if let Some(role_arn) = self.cluster.role_arn.clone().none_if_empty() {
            cluster["role_arn"] = json!(role_arn);
        }

        let s3 = self.sources();
        let mut context = TemplateContext::new();
        context.set_cluster(cluster).set_s3(json!({
            "log_data": s3.log_data,
            "log_jsonpath": s3.log_jsonpath,
            "song_data": s3.song_data,
            "region": s3.region,
        }));
        context
    }
}

// ============================================================================
// CLUSTER Section
// ============================================================================

/// Cluster and database settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// AWS region hosting the cluster and role clients
    #[serde(rename = "DWH_REGION")]
    pub region: String,

    /// Cluster identifier
    #[serde(rename = "DWH_CLUSTER_IDENTIFIER")]
    pub identifier: String,

    /// `single-node` or `multi-node`
    #[serde(rename = "DWH_CLUSTER_TYPE", default = "default_cluster_type")]
    pub cluster_type: String,

    /// Node shape
    #[serde(rename = "DWH_NODE_TYPE", default = "default_node_type")]
    pub node_type: String,

    /// Node count (ignored for single-node clusters)
    #[serde(rename = "DWH_NUM_NODES", default = "default_num_nodes")]
    pub num_nodes: u32,

    /// Database created with the cluster
    #[serde(rename = "DB_NAME")]
    pub db_name: String,

    /// Master username
    #[serde(rename = "DB_USER")]
    pub db_user: String,

    /// Master password
    #[serde(rename = "DB_PASSWORD")]
    pub db_password: String,

    /// Database port
    #[serde(rename = "DB_PORT", default = "default_db_port")]
    pub db_port: u16,

    /// Endpoint address, written after provisioning
    #[serde(
        rename = "DWH_ENDPOINT",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub endpoint: Option<String>,

    /// Role ARN attached to the cluster, written after provisioning
    #[serde(
        rename = "DWH_ROLE_ARN",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub role_arn: Option<String>,

    /// Keys not used by this crate
    #[serde(flatten)]
    pub extra: BTreeMap<String, toml::Value>,
}

impl ClusterConfig {
    /// Endpoint address, required before connecting to the warehouse
    pub fn endpoint(&self) -> Result<&str> {
        self.endpoint
            .as_deref()
            .filter(|e| !e.is_empty())
            .ok_or_else(|| Error::missing_field("DWH_ENDPOINT (run `dwh-etl up` first)"))
    }

    /// Whether this is a multi-node cluster
    pub fn is_multi_node(&self) -> bool {
        self.cluster_type == "multi-node"
    }
}

fn default_cluster_type() -> String {
    "multi-node".to_string()
}

fn default_node_type() -> String {
    "dc2.large".to_string()
}

fn default_num_nodes() -> u32 {
    4
}

fn default_db_port() -> u16 {
    5439
}

// ============================================================================
// IAM_ROLE Section
// ============================================================================

/// Access role settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IamRoleConfig {
    /// Role name
    #[serde(rename = "DWH_IAM_ROLE_NAME")]
    pub name: String,

    /// Keys not used by this crate
    #[serde(flatten)]
    pub extra: BTreeMap<String, toml::Value>,
}

// ============================================================================
// S3 Section
// ============================================================================

/// Locations of the raw log and song files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct S3Config {
    /// Prefix holding the event log files
    #[serde(rename = "LOG_DATA", default = "default_log_data")]
    pub log_data: String,

    /// JSONPaths file describing the log record layout
    #[serde(rename = "LOG_JSONPATH", default = "default_log_jsonpath")]
    pub log_jsonpath: String,

    /// Prefix holding the song metadata files
    #[serde(rename = "SONG_DATA", default = "default_song_data")]
    pub song_data: String,

    /// Region of the source bucket
    #[serde(rename = "REGION", default = "default_source_region")]
    pub region: String,
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            log_data: default_log_data(),
            log_jsonpath: default_log_jsonpath(),
            song_data: default_song_data(),
            region: default_source_region(),
        }
    }
}

fn default_log_data() -> String {
    "s3://udacity-dend/log_data".to_string()
}

fn default_log_jsonpath() -> String {
    "s3://udacity-dend/log_json_path.json".to_string()
}

fn default_song_data() -> String {
    "s3://udacity-dend/song_data".to_string()
}

fn default_source_region() -> String {
    "us-west-2".to_string()
}

// ============================================================================
// POLL Section
// ============================================================================

/// Readiness polling settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollConfig {
    /// Seconds to sleep between status fetches
    #[serde(rename = "INTERVAL_SECONDS", default = "default_poll_interval")]
    pub interval_seconds: u64,

    /// Maximum status fetches before giving up (0 = unbounded)
    #[serde(rename = "MAX_ATTEMPTS", default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl PollConfig {
    /// Interval as a duration
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_seconds: default_poll_interval(),
            max_attempts: default_max_attempts(),
        }
    }
}

fn default_poll_interval() -> u64 {
    30
}

fn default_max_attempts() -> u32 {
    120
}
