//! Verification suites.
//!
//! - [`ProvisioningSuite`]: apply each fixture manifest, read it back, assert identity
//! - [`GitOpsSuite`]: read-only identity checks against a reconciled cluster

pub mod gitops;
pub mod provisioning;

pub use gitops::{GitOpsSuite, GroupOutcome, GroupStatus, VerificationReport};
pub use provisioning::ProvisioningSuite;

use crate::cluster::{ClusterConnection, ClusterError};
use crate::manifests::ManifestError;
use crate::plan::{IdentityMismatch, ResourceKind, ResourceRef};
use thiserror::Error;

/// Errors that fail a check. Each one aborts the remaining steps of its unit.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    Mismatch(#[from] IdentityMismatch),

    #[error("Creating {kind} {name} succeeded although it already existed")]
    DuplicateAccepted { kind: ResourceKind, name: String },

    #[error("Check groups failed: {}", .groups.join(", "))]
    GroupsFailed { groups: Vec<String> },

    #[error(transparent)]
    Cluster(#[from] ClusterError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

/// Read `expected` back from the cluster and compare identity fields.
pub async fn check_identity(
    cluster: &ClusterConnection,
    expected: &ResourceRef,
) -> Result<(), CheckError> {
    let observed = cluster.read(expected).await?;
    expected.verify(&observed)?;
    tracing::debug!(resource = %expected, "Identity verified");
    Ok(())
}
