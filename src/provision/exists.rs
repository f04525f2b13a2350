//! Existence pre-check

use crate::cloud::DescribeResource;
use crate::error::Result;
use tracing::debug;

/// Report whether a named resource currently exists
///
/// Absence is `Ok(false)`; any other lookup failure propagates.
pub async fn exists<R>(family: &R, identifier: &str) -> Result<bool>
where
    R: DescribeResource + ?Sized,
{
    let found = family.describe(identifier).await?.is_some();
    debug!(family = family.family(), identifier, found, "Existence check");
    Ok(found)
}
