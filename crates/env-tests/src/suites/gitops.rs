//! Verification-only mode: read-then-assert.
//!
//! Resources are expected to exist already, applied by a GitOps controller.

use super::{check_identity, CheckError};
use crate::cluster::ClusterConnection;
use crate::plan::{CheckGroup, PlannedGroup, ResourceRef, VerificationPlan};
use tracing::{info, instrument, warn};

/// Result of one check group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupStatus {
    Passed { checked: usize },
    /// `resource` was the first check to fail; later checks in the group did not run.
    Failed { resource: ResourceRef, error: String },
    Skipped { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupOutcome {
    pub name: String,
    pub status: GroupStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationReport {
    pub groups: Vec<GroupOutcome>,
}

impl VerificationReport {
    /// Number of checks that passed.
    pub fn checked(&self) -> usize {
        self.groups
            .iter()
            .map(|g| match g.status {
                GroupStatus::Passed { checked } => checked,
                GroupStatus::Failed { .. } | GroupStatus::Skipped { .. } => 0,
            })
            .sum()
    }

    pub fn skipped_groups(&self) -> impl Iterator<Item = &GroupOutcome> {
        self.groups
            .iter()
            .filter(|g| matches!(g.status, GroupStatus::Skipped { .. }))
    }

    pub fn failed_groups(&self) -> impl Iterator<Item = &GroupOutcome> {
        self.groups
            .iter()
            .filter(|g| matches!(g.status, GroupStatus::Failed { .. }))
    }

    /// `Err(GroupsFailed)` naming every failed group, if any.
    pub fn ensure_passed(&self) -> Result<(), CheckError> {
        let failed: Vec<String> = self.failed_groups().map(|g| g.name.clone()).collect();
        if failed.is_empty() {
            Ok(())
        } else {
            Err(CheckError::GroupsFailed { groups: failed })
        }
    }
}

pub struct GitOpsSuite {
    cluster: ClusterConnection,
}

impl GitOpsSuite {
    pub fn new(cluster: ClusterConnection) -> Self {
        Self { cluster }
    }

    /// Execute every active group in plan order.
    ///
    /// A failing check ends its own group only; later groups still run. Use
    /// [`VerificationReport::ensure_passed`] to turn the report into a verdict.
    pub async fn run(&self, plan: &VerificationPlan) -> VerificationReport {
        let mut report = VerificationReport::default();

        for planned in plan.groups() {
            let status = match planned {
                PlannedGroup::Active(group) => self.verify_group(group).await,
                PlannedGroup::Skipped { name, reason } => {
                    info!(group = %name, reason = %reason, "Skipping check group");
                    GroupStatus::Skipped {
                        reason: reason.clone(),
                    }
                }
            };

            report.groups.push(GroupOutcome {
                name: planned.name().to_string(),
                status,
            });
        }

        report
    }

    /// Check every resource in `group`, stopping at the first failure.
    #[instrument(skip_all, fields(group = %group.name))]
    pub async fn verify_group(&self, group: &CheckGroup) -> GroupStatus {
        for expected in &group.checks {
            if let Err(e) = check_identity(&self.cluster, expected).await {
                warn!(resource = %expected, error = %e, "Check group failed");
                return GroupStatus::Failed {
                    resource: expected.clone(),
                    error: e.to_string(),
                };
            }
        }
        info!(checked = group.checks.len(), "Check group passed");
        GroupStatus::Passed {
            checked: group.checks.len(),
        }
    }
}
