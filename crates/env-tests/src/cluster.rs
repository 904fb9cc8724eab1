//! Cluster connection and API helpers.
//!
//! This module provides the `ClusterConnection` type wrapping a `kube::Client`
//! for the context selected in [`HarnessConfig`]. Every method is a single
//! request against the API server; nothing here retries.

use crate::config::HarnessConfig;
use crate::eventual::{assert_eventually, ConsistencyCategory};
use crate::plan::{ObservedIdentity, ResourceKind, ResourceRef};
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{Namespace, Service};
use k8s_openapi::api::networking::v1::Ingress;
use kube::api::{Api, DeleteParams, PostParams};
use kube::config::{KubeConfigOptions, KubeconfigError};
use kube::{Client, Config, Resource};
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use std::sync::Mutex;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

/// Cluster connection errors.
#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("Failed to load kubeconfig for context {context}: {source}")]
    Kubeconfig {
        context: String,
        #[source]
        source: KubeconfigError,
    },

    #[error("Failed to build Kubernetes client: {0}")]
    ClientBuild(#[source] kube::Error),

    #[error("Kubernetes API request failed: {0}")]
    Api(#[from] kube::Error),

    #[error("Namespace {name} was not removed: {message}")]
    TeardownTimeout { name: String, message: String },
}

impl ClusterError {
    /// HTTP status code returned by the API server, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClusterError::Api(kube::Error::Api(response)) => Some(response.code),
            _ => None,
        }
    }

    /// The create was rejected because the object already exists.
    pub fn is_already_exists(&self) -> bool {
        self.status_code() == Some(409)
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }
}

/// Connection to the cluster selected by the harness configuration.
#[derive(Clone)]
pub struct ClusterConnection {
    client: Client,
}

impl ClusterConnection {
    /// Connect using the local kubeconfig.
    ///
    /// Uses `config.context` when given, otherwise the kubeconfig's current
    /// context.
    pub async fn connect(config: &HarnessConfig) -> Result<Self, ClusterError> {
        let options = KubeConfigOptions {
            context: config.context.clone(),
            ..Default::default()
        };

        let kube_config = Config::from_kubeconfig(&options)
            .await
            .map_err(|source| ClusterError::Kubeconfig {
                context: config.context().unwrap_or("<current>").to_string(),
                source,
            })?;

        info!(
            context = config.context().unwrap_or("<current>"),
            cluster_url = %kube_config.cluster_url,
            "Connecting to cluster"
        );

        let client = Client::try_from(kube_config).map_err(ClusterError::ClientBuild)?;

        Ok(Self { client })
    }

    /// Wrap an existing client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    fn namespaces(&self) -> Api<Namespace> {
        Api::all(self.client.clone())
    }

    /// Create a namespace. Fails with 409 if it already exists.
    #[instrument(skip_all, fields(name = ?namespace.metadata.name))]
    pub async fn create_namespace(&self, namespace: &Namespace) -> Result<Namespace, ClusterError> {
        Ok(self
            .namespaces()
            .create(&PostParams::default(), namespace)
            .await?)
    }

    #[instrument(skip(self, deployment), fields(name = ?deployment.metadata.name))]
    pub async fn create_deployment(
        &self,
        namespace: &str,
        deployment: &Deployment,
    ) -> Result<Deployment, ClusterError> {
        let api: Api<Deployment> = Api::namespaced(self.client.clone(), namespace);
        Ok(api.create(&PostParams::default(), deployment).await?)
    }

    #[instrument(skip(self, service), fields(name = ?service.metadata.name))]
    pub async fn create_service(
        &self,
        namespace: &str,
        service: &Service,
    ) -> Result<Service, ClusterError> {
        let api: Api<Service> = Api::namespaced(self.client.clone(), namespace);
        Ok(api.create(&PostParams::default(), service).await?)
    }

    #[instrument(skip(self, ingress), fields(name = ?ingress.metadata.name))]
    pub async fn create_ingress(
        &self,
        namespace: &str,
        ingress: &Ingress,
    ) -> Result<Ingress, ClusterError> {
        let api: Api<Ingress> = Api::namespaced(self.client.clone(), namespace);
        Ok(api.create(&PostParams::default(), ingress).await?)
    }

    /// Read back the identity fields of `target`. A missing object is an error.
    #[instrument(skip_all, fields(resource = %target))]
    pub async fn read(&self, target: &ResourceRef) -> Result<ObservedIdentity, ClusterError> {
        let namespace = target
            .namespace_name()
            .unwrap_or_else(|| self.client.default_namespace());

        match target.kind() {
            ResourceKind::Namespace => observe(self.namespaces(), target.name()).await,
            ResourceKind::Deployment => {
                let api: Api<Deployment> = Api::namespaced(self.client.clone(), namespace);
                observe(api, target.name()).await
            }
            ResourceKind::Service => {
                let api: Api<Service> = Api::namespaced(self.client.clone(), namespace);
                observe(api, target.name()).await
            }
            ResourceKind::Ingress => {
                let api: Api<Ingress> = Api::namespaced(self.client.clone(), namespace);
                observe(api, target.name()).await
            }
        }
    }

    /// Request deletion of a namespace. An already-absent namespace is not an error.
    #[instrument(skip(self))]
    pub async fn delete_namespace(&self, name: &str) -> Result<(), ClusterError> {
        match self.namespaces().delete(name, &DeleteParams::default()).await {
            Ok(_) => {
                debug!("Namespace deletion requested");
                Ok(())
            }
            Err(err) => {
                let err = ClusterError::from(err);
                if err.is_not_found() {
                    debug!("Namespace already absent");
                    Ok(())
                } else {
                    Err(err)
                }
            }
        }
    }

    pub async fn namespace_exists(&self, name: &str) -> Result<bool, ClusterError> {
        Ok(self.namespaces().get_opt(name).await?.is_some())
    }

    /// Block until `name` is no longer returned by the API server.
    #[instrument(skip(self))]
    pub async fn wait_for_namespace_deletion(
        &self,
        name: &str,
        category: ConsistencyCategory,
    ) -> Result<(), ClusterError> {
        let last_error: Mutex<Option<String>> = Mutex::new(None);
        let last_error = &last_error;

        let outcome = assert_eventually(category, move || async move {
            match self.namespace_exists(name).await {
                Ok(exists) => !exists,
                Err(e) => {
                    warn!(error = %e, "Failed to poll namespace during teardown");
                    if let Ok(mut slot) = last_error.lock() {
                        *slot = Some(e.to_string());
                    }
                    false
                }
            }
        })
        .await;

        outcome.map_err(|message| {
            let last = last_error.lock().ok().and_then(|mut slot| slot.take());
            ClusterError::TeardownTimeout {
                name: name.to_string(),
                message: match last {
                    Some(cause) => format!("{}; last poll error: {}", message, cause),
                    None => message,
                },
            }
        })
    }
}

async fn observe<K>(api: Api<K>, name: &str) -> Result<ObservedIdentity, ClusterError>
where
    K: Resource + Clone + DeserializeOwned + Debug,
{
    let object = api.get(name).await?;
    Ok(ObservedIdentity::from_meta(object.meta()))
}
