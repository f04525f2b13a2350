//! Provisioning state reconciliation
//!
//! Create-or-adopt logic for the warehouse role and cluster, the readiness
//! poll loop, teardown, and the sink that hands the provisioned endpoint and
//! role ARN to later commands through the configuration file.
//!
//! # Overview
//!
//! - `exists` - existence pre-check over any `DescribeResource`
//! - `Poller` - fixed-interval status polling with an attempt bound
//! - `Provisioner` - ensure/teardown/status for role and cluster
//! - `persist` - write derived connection values into the configuration

mod exists;
mod poller;
mod provisioner;
mod sink;

pub use exists::exists;
pub use poller::{PollOutcome, PollReport, Poller};
pub use provisioner::{PlannedAction, Provisioned, Provisioner, ResourceStatus};
pub use sink::{apply_cluster_description, persist};
