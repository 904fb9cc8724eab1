//! Shared helpers for tests that talk to a mock Kubernetes API server.
//!
//! The mock is a `wiremock` server; `kube::Client` is pointed at it over
//! plain HTTP, so requests follow the real API paths.

#![allow(dead_code)]

use env_tests::cluster::ClusterConnection;
use env_tests::manifests::ManifestSet;
use serde_json::{json, Value};
use std::path::Path;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Start a mock API server and a connection pointed at it.
pub async fn mock_cluster() -> (MockServer, ClusterConnection) {
    let server = MockServer::start().await;
    let config = kube::Config::new(server.uri().parse().expect("mock server uri"));
    let client = kube::Client::try_from(config).expect("client for mock server");
    (server, ClusterConnection::from_client(client))
}

/// The repository's fixture manifests.
pub fn repo_manifests() -> ManifestSet {
    ManifestSet::from_dir(
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("manifests"),
    )
}

pub fn namespace_json(name: &str) -> Value {
    json!({
        "apiVersion": "v1",
        "kind": "Namespace",
        "metadata": { "name": name },
        "status": { "phase": "Active" }
    })
}

pub fn deployment_json(name: &str, namespace: &str) -> Value {
    json!({
        "apiVersion": "apps/v1",
        "kind": "Deployment",
        "metadata": { "name": name, "namespace": namespace }
    })
}

pub fn service_json(name: &str, namespace: &str) -> Value {
    json!({
        "apiVersion": "v1",
        "kind": "Service",
        "metadata": { "name": name, "namespace": namespace }
    })
}

pub fn ingress_json(name: &str, namespace: &str) -> Value {
    json!({
        "apiVersion": "networking.k8s.io/v1",
        "kind": "Ingress",
        "metadata": { "name": name, "namespace": namespace }
    })
}

/// A `metav1.Status` failure body, as the API server returns on errors.
pub fn status_json(code: u16, reason: &str, message: &str) -> Value {
    json!({
        "apiVersion": "v1",
        "kind": "Status",
        "metadata": {},
        "status": "Failure",
        "message": message,
        "reason": reason,
        "code": code
    })
}

pub fn status_response(code: u16, reason: &str, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(code).set_body_json(status_json(code, reason, message))
}

/// Path of a namespaced object collection, e.g. `/apis/apps/v1/namespaces/ns/deployments`.
pub fn collection_path(api_prefix: &str, namespace: &str, plural: &str) -> String {
    format!("{}/namespaces/{}/{}", api_prefix, namespace, plural)
}

/// Mount a GET that returns `body` for `object_path`.
pub async fn mount_get(server: &MockServer, object_path: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(object_path))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mount a POST to `collection` answering 201 with `body`, expected exactly `times` times.
pub async fn mount_create(server: &MockServer, collection: &str, body: Value, times: u64) {
    Mock::given(method("POST"))
        .and(path(collection))
        .respond_with(ResponseTemplate::new(201).set_body_json(body))
        .expect(times)
        .mount(server)
        .await;
}

/// Mount GETs for every resource in the always-on GitOps group.
pub async fn mount_flask_application(server: &MockServer) {
    mount_get(
        server,
        "/api/v1/namespaces/test-namespace",
        namespace_json("test-namespace"),
    )
    .await;
    mount_get(
        server,
        "/apis/apps/v1/namespaces/test-namespace/deployments/flask",
        deployment_json("flask", "test-namespace"),
    )
    .await;
    mount_get(
        server,
        "/api/v1/namespaces/test-namespace/services/flask",
        service_json("flask", "test-namespace"),
    )
    .await;
    mount_get(
        server,
        "/apis/networking.k8s.io/v1/namespaces/test-namespace/ingresses/flask",
        ingress_json("flask", "test-namespace"),
    )
    .await;
}

/// Mount GETs for the development-only group, each expected `times` times.
pub async fn mount_development_only(server: &MockServer, times: u64) {
    let objects = [
        (
            "/apis/apps/v1/namespaces/test-namespace/deployments/flask-internal",
            deployment_json("flask-internal", "test-namespace"),
        ),
        (
            "/api/v1/namespaces/test-namespace/services/flask-internal",
            service_json("flask-internal", "test-namespace"),
        ),
        ("/api/v1/namespaces/service2", namespace_json("service2")),
        (
            "/apis/apps/v1/namespaces/service2/deployments/flask-different-namespace",
            deployment_json("flask-different-namespace", "service2"),
        ),
        (
            "/api/v1/namespaces/service2/services/flask-different-namespace",
            service_json("flask-different-namespace", "service2"),
        ),
    ];

    for (object_path, body) in objects {
        Mock::given(method("GET"))
            .and(path(object_path))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(times)
            .mount(server)
            .await;
    }
}
