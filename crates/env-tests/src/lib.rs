//! GitOps Verification Harness
//!
//! This crate checks a Kubernetes cluster running the GitOps demo responder.
//! Checks run sequentially against the real API server and the deployed
//! service; each is a single request with an immediate pass/fail result.
//!
//! # Features
//!
//! - `provision`: Apply the fixture manifests, read each back, tear down
//! - `gitops`: Read-only checks of resources applied by a GitOps controller
//! - `e2e`: HTTP checks against the deployed responder
//! - `all`: Enable all test categories
//!
//! # Runtime parameters
//!
//! - `GITOPS_CONTEXT` (`--context`): kubeconfig context of the target cluster
//! - `GITOPS_ENDPOINT` (`--endpoint`): `host:port` of the deployed responder
//! - `GITOPS_MANIFEST_DIR` (`--manifests`): fixture directory, defaults to `manifests/`
//!
//! # Usage
//!
//! ```bash
//! # From repo root - runs only the offline tests (no default features)
//! cargo test -p env-tests
//!
//! # Provisioning smoke test against kind-cluster1
//! GITOPS_CONTEXT=kind-cluster1 cargo test -p env-tests --features provision
//!
//! # Post-deploy checks
//! GITOPS_CONTEXT=kind-cluster2 GITOPS_ENDPOINT=localhost:8080 \
//!     cargo test -p env-tests --features gitops,e2e
//!
//! # Same checks without cargo
//! gitops-check --context kind-cluster2 verify
//! ```

pub mod cluster;
pub mod config;
pub mod eventual;
pub mod fixtures;
pub mod manifests;
pub mod plan;
pub mod suites;
