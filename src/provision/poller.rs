//! Readiness poller
//!
//! Re-describes a cluster on a fixed interval while it sits in a transitional
//! status. The interval and the attempt bound come from the `POLL` section.

use crate::cloud::{ClusterApi, ClusterDescription};
use crate::config::PollConfig;
use crate::error::{Error, Result};
use crate::types::ClusterStatus;
use std::time::Duration;
use tracing::info;

/// Final state observed by a poll loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// The cluster left the transitional status
    Settled(ClusterDescription),
    /// The cluster no longer exists
    Absent,
}

/// Result of a poll loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollReport {
    /// Final state
    pub outcome: PollOutcome,
    /// Number of sleeps performed
    pub sleeps: u32,
}

/// Fixed-interval status poller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Poller {
    interval: Duration,
    max_attempts: u32,
}

impl Default for Poller {
    fn default() -> Self {
        Self::from_config(&PollConfig::default())
    }
}

impl Poller {
    /// Create a poller; `max_attempts` of 0 polls without bound
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    /// Create a poller from the `POLL` section
    pub fn from_config(config: &PollConfig) -> Self {
        Self::new(config.interval(), config.max_attempts)
    }

    /// Wait while the cluster's status equals `transitional`
    ///
    /// Returns the first description in any other status, including failed
    /// ones, or `Absent` if the cluster disappears.
    pub async fn poll_until<C>(
        &self,
        clusters: &C,
        identifier: &str,
        transitional: &ClusterStatus,
    ) -> Result<PollReport>
    where
        C: ClusterApi + ?Sized,
    {
        self.poll_while(clusters, identifier, |status| status == transitional)
            .await
    }

    /// Wait for a cluster to disappear after a delete request
    ///
    /// Keeps waiting while the status is `transitional` or any deletion
    /// status. Settling in another status means deletion stopped.
    pub async fn poll_until_absent<C>(
        &self,
        clusters: &C,
        identifier: &str,
        transitional: &ClusterStatus,
    ) -> Result<PollReport>
    where
        C: ClusterApi + ?Sized,
    {
        self.poll_while(clusters, identifier, |status| {
            status == transitional
                || matches!(status, ClusterStatus::Deleting | ClusterStatus::FinalSnapshot)
        })
        .await
    }

    async fn poll_while<C, F>(
        &self,
        clusters: &C,
        identifier: &str,
        keep_waiting: F,
    ) -> Result<PollReport>
    where
        C: ClusterApi + ?Sized,
        F: Fn(&ClusterStatus) -> bool,
    {
        let mut attempts = 0u32;
        let mut sleeps = 0u32;

        loop {
            let description = clusters.describe(identifier).await?;
            attempts += 1;

            let Some(description) = description else {
                return Ok(PollReport {
                    outcome: PollOutcome::Absent,
                    sleeps,
                });
            };

            if !keep_waiting(&description.cluster_status) {
                return Ok(PollReport {
                    outcome: PollOutcome::Settled(description),
                    sleeps,
                });
            }

            if self.max_attempts > 0 && attempts >= self.max_attempts {
                return Err(Error::PollTimeout {
                    identifier: identifier.to_string(),
                    status: description.cluster_status.to_string(),
                    attempts,
                });
            }

            info!(
                "Waiting for redshift cluster {identifier}. Status: {}. Sleeping for {} seconds.",
                description.cluster_status,
                self.interval.as_secs()
            );
            tokio::time::sleep(self.interval).await;
            sleeps += 1;
        }
    }
}
