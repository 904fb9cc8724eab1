//! Manifest fixtures.
//!
//! Manifests are plain YAML files submitted verbatim to the API server. The
//! harness only deserializes them into the matching `k8s_openapi` type.

use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{Namespace, Service};
use k8s_openapi::api::networking::v1::Ingress;
use serde::de::DeserializeOwned;
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Environment variable overriding the manifest directory.
pub const MANIFEST_DIR_VAR: &str = "GITOPS_MANIFEST_DIR";

pub const NAMESPACE_MANIFEST: &str = "namespace.yaml";
pub const DEPLOYMENT_MANIFEST: &str = "deployment.yaml";
pub const SERVICE_MANIFEST: &str = "service.yaml";
pub const INGRESS_MANIFEST: &str = "ingress.yaml";

/// Manifest loading errors.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Failed to read manifest {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse manifest {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Directory holding the four fixture manifests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestSet {
    dir: PathBuf,
}

impl ManifestSet {
    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `GITOPS_MANIFEST_DIR` if set, otherwise `manifests/` at the workspace root.
    pub fn default_dir() -> PathBuf {
        env::var_os(MANIFEST_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                Path::new(env!("CARGO_MANIFEST_DIR"))
                    .join("..")
                    .join("..")
                    .join("manifests")
            })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn namespace(&self) -> Result<Namespace, ManifestError> {
        load(&self.dir.join(NAMESPACE_MANIFEST))
    }

    pub fn deployment(&self) -> Result<Deployment, ManifestError> {
        load(&self.dir.join(DEPLOYMENT_MANIFEST))
    }

    pub fn service(&self) -> Result<Service, ManifestError> {
        load(&self.dir.join(SERVICE_MANIFEST))
    }

    pub fn ingress(&self) -> Result<Ingress, ManifestError> {
        load(&self.dir.join(INGRESS_MANIFEST))
    }
}

impl Default for ManifestSet {
    fn default() -> Self {
        Self::from_dir(Self::default_dir())
    }
}

/// Read a YAML manifest and deserialize it into `K`.
pub fn load<K: DeserializeOwned>(path: &Path) -> Result<K, ManifestError> {
    debug!(path = %path.display(), "Loading manifest");

    let contents = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_yaml::from_str(&contents).map_err(|source| ManifestError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
