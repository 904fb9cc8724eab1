//! Provisioning mode: apply-then-verify.
//!
//! Steps run in a fixed order (namespace, deployment, service, ingress). A
//! failing step returns immediately, so later steps never run.

use super::{check_identity, CheckError};
use crate::cluster::{ClusterConnection, ClusterError};
use crate::eventual::ConsistencyCategory;
use crate::manifests::ManifestSet;
use crate::plan::{ResourceKind, ResourceRef, APP_NAME, TEST_NAMESPACE};
use tracing::{error, info, instrument};

pub struct ProvisioningSuite {
    cluster: ClusterConnection,
    manifests: ManifestSet,
    teardown_wait: ConsistencyCategory,
}

impl ProvisioningSuite {
    pub fn new(cluster: ClusterConnection, manifests: ManifestSet) -> Self {
        Self {
            cluster,
            manifests,
            teardown_wait: ConsistencyCategory::K8sResourceUpdate,
        }
    }

    /// Override how long teardown waits for the namespace to disappear.
    pub fn with_teardown_wait(mut self, category: ConsistencyCategory) -> Self {
        self.teardown_wait = category;
        self
    }

    /// Run every step in order, stopping at the first failure.
    ///
    /// Returns the identities that were applied and verified.
    pub async fn apply_all(&self) -> Result<Vec<ResourceRef>, CheckError> {
        Ok(vec![
            self.apply_namespace().await?,
            self.apply_deployment().await?,
            self.apply_service().await?,
            self.apply_ingress().await?,
        ])
    }

    #[instrument(skip_all, name = "provision.namespace")]
    pub async fn apply_namespace(&self) -> Result<ResourceRef, CheckError> {
        let manifest = self.manifests.namespace()?;
        self.cluster.create_namespace(&manifest).await?;

        let expected = ResourceRef::namespace(TEST_NAMESPACE);
        check_identity(&self.cluster, &expected).await?;
        info!(resource = %expected, "Applied");
        Ok(expected)
    }

    /// Submit the namespace manifest a second time; the API server must reject it.
    #[instrument(skip_all, name = "provision.namespace_again")]
    pub async fn apply_namespace_again(&self) -> Result<(), CheckError> {
        let manifest = self.manifests.namespace()?;

        match self.cluster.create_namespace(&manifest).await {
            Ok(_) => Err(CheckError::DuplicateAccepted {
                kind: ResourceKind::Namespace,
                name: TEST_NAMESPACE.to_string(),
            }),
            Err(e) if e.is_already_exists() => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip_all, name = "provision.deployment")]
    pub async fn apply_deployment(&self) -> Result<ResourceRef, CheckError> {
        let manifest = self.manifests.deployment()?;
        self.cluster
            .create_deployment(TEST_NAMESPACE, &manifest)
            .await?;

        let expected = ResourceRef::deployment(APP_NAME, TEST_NAMESPACE);
        check_identity(&self.cluster, &expected).await?;
        info!(resource = %expected, "Applied");
        Ok(expected)
    }

    #[instrument(skip_all, name = "provision.service")]
    pub async fn apply_service(&self) -> Result<ResourceRef, CheckError> {
        let manifest = self.manifests.service()?;
        self.cluster.create_service(TEST_NAMESPACE, &manifest).await?;

        let expected = ResourceRef::service(APP_NAME, TEST_NAMESPACE);
        check_identity(&self.cluster, &expected).await?;
        info!(resource = %expected, "Applied");
        Ok(expected)
    }

    #[instrument(skip_all, name = "provision.ingress")]
    pub async fn apply_ingress(&self) -> Result<ResourceRef, CheckError> {
        let manifest = self.manifests.ingress()?;
        self.cluster.create_ingress(TEST_NAMESPACE, &manifest).await?;

        let expected = ResourceRef::ingress(APP_NAME, TEST_NAMESPACE);
        check_identity(&self.cluster, &expected).await?;
        info!(resource = %expected, "Applied");
        Ok(expected)
    }

    /// Run [`apply_all`](Self::apply_all), then tear down whatever it created.
    ///
    /// Teardown always runs. When both fail, the apply error is returned and
    /// the teardown error is logged.
    pub async fn apply_and_teardown(&self) -> Result<Vec<ResourceRef>, CheckError> {
        let applied = self.apply_all().await;
        let torn_down = self.teardown().await;

        match (applied, torn_down) {
            (Ok(applied), Ok(())) => Ok(applied),
            (Ok(_), Err(teardown_err)) => Err(teardown_err.into()),
            (Err(apply_err), Ok(())) => Err(apply_err),
            (Err(apply_err), Err(teardown_err)) => {
                error!(
                    error = %teardown_err,
                    "Teardown also failed after a provisioning failure"
                );
                Err(apply_err)
            }
        }
    }

    /// Delete `test-namespace` and block until the API server no longer returns it.
    #[instrument(skip_all, name = "provision.teardown")]
    pub async fn teardown(&self) -> Result<(), ClusterError> {
        self.cluster.delete_namespace(TEST_NAMESPACE).await?;
        self.cluster
            .wait_for_namespace_deletion(TEST_NAMESPACE, self.teardown_wait)
            .await?;
        info!(namespace = TEST_NAMESPACE, "Teardown complete");
        Ok(())
    }
}
