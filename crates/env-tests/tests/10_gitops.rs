//! GitOps Post-Deploy Checks
//!
//! Read-only checks of resources the GitOps controller applied. Nothing is
//! created or deleted. The development-only group is skipped on
//! `kind-cluster2` and `kind-cluster3`.

#![cfg(feature = "gitops")]

use env_tests::cluster::ClusterConnection;
use env_tests::config::HarnessConfig;
use env_tests::plan::{PlannedGroup, ResourceRef, VerificationPlan, NON_DEVELOPMENT_CONTEXTS};
use env_tests::suites::{check_identity, GitOpsSuite, GroupStatus};

async fn cluster(config: &HarnessConfig) -> ClusterConnection {
    ClusterConnection::connect(config)
        .await
        .expect("Failed to connect to cluster - check GITOPS_CONTEXT and kubeconfig")
}

#[tokio::test]
async fn test_flask_application_namespace() {
    let cluster = cluster(&HarnessConfig::from_env()).await;

    check_identity(&cluster, &ResourceRef::namespace("test-namespace"))
        .await
        .expect("test-namespace should exist");
}

#[tokio::test]
async fn test_flask_application_deployment() {
    let cluster = cluster(&HarnessConfig::from_env()).await;

    check_identity(&cluster, &ResourceRef::deployment("flask", "test-namespace"))
        .await
        .expect("flask deployment should exist in test-namespace");
}

#[tokio::test]
async fn test_flask_application_service() {
    let cluster = cluster(&HarnessConfig::from_env()).await;

    check_identity(&cluster, &ResourceRef::service("flask", "test-namespace"))
        .await
        .expect("flask service should exist in test-namespace");
}

#[tokio::test]
async fn test_flask_application_ingress() {
    let cluster = cluster(&HarnessConfig::from_env()).await;

    check_identity(&cluster, &ResourceRef::ingress("flask", "test-namespace"))
        .await
        .expect("flask ingress should exist in test-namespace");
}

#[tokio::test]
async fn test_gitops_plan() {
    let config = HarnessConfig::from_env();
    let plan = VerificationPlan::gitops(&config);

    let report = GitOpsSuite::new(cluster(&config).await).run(&plan).await;
    report
        .ensure_passed()
        .unwrap_or_else(|e| panic!("{}: {:?}", e, report.groups));

    let on_development = !config
        .context()
        .is_some_and(|ctx| NON_DEVELOPMENT_CONTEXTS.contains(&ctx));

    for (planned, outcome) in plan.groups().iter().zip(&report.groups) {
        match planned {
            PlannedGroup::Active(group) => assert_eq!(
                outcome.status,
                GroupStatus::Passed {
                    checked: group.checks.len()
                }
            ),
            PlannedGroup::Skipped { .. } => {
                assert!(!on_development, "{} skipped on development", outcome.name)
            }
        }
    }
}
