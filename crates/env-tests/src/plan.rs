//! Resource identities and verification plans.
//!
//! A plan is a list of check groups. Each group may carry a declarative
//! [`SkipWhen`] predicate; predicates are evaluated once, when the plan is
//! built, so a skipped group is never executed.

use crate::config::HarnessConfig;
use kube::api::ObjectMeta;
use std::fmt;

/// Namespace shared by every fixture resource.
pub const TEST_NAMESPACE: &str = "test-namespace";

/// Name of the responder's deployment, service and ingress.
pub const APP_NAME: &str = "flask";

/// Responder variant deployed only to the development cluster.
pub const INTERNAL_APP_NAME: &str = "flask-internal";

/// Namespace of the second responder instance.
pub const SECOND_NAMESPACE: &str = "service2";

/// Responder deployed into [`SECOND_NAMESPACE`].
pub const SECOND_APP_NAME: &str = "flask-different-namespace";

/// Contexts whose clusters do not run the development-only resources.
pub const NON_DEVELOPMENT_CONTEXTS: [&str; 2] = ["kind-cluster2", "kind-cluster3"];

/// Kinds of cluster objects the harness reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Namespace,
    Deployment,
    Service,
    Ingress,
}

impl ResourceKind {
    /// Whether objects of this kind live inside a namespace.
    pub fn is_namespaced(self) -> bool {
        !matches!(self, ResourceKind::Namespace)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Namespace => "namespace",
            ResourceKind::Deployment => "deployment",
            ResourceKind::Service => "service",
            ResourceKind::Ingress => "ingress",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Expected identity of a cluster object.
///
/// `namespace` is `Some` exactly when the kind is namespaced; the
/// constructors are the only way to build one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRef {
    kind: ResourceKind,
    name: String,
    namespace: Option<String>,
}

impl ResourceRef {
    pub fn namespace(name: impl Into<String>) -> Self {
        Self {
            kind: ResourceKind::Namespace,
            name: name.into(),
            namespace: None,
        }
    }

    pub fn deployment(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self::namespaced(ResourceKind::Deployment, name, namespace)
    }

    pub fn service(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self::namespaced(ResourceKind::Service, name, namespace)
    }

    pub fn ingress(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self::namespaced(ResourceKind::Ingress, name, namespace)
    }

    fn namespaced(
        kind: ResourceKind,
        name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            namespace: Some(namespace.into()),
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Containing namespace; `None` for cluster-scoped kinds.
    pub fn namespace_name(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Compare an observed identity against this one.
    ///
    /// The name must match. For namespaced kinds the namespace must match too.
    pub fn verify(&self, observed: &ObservedIdentity) -> Result<(), IdentityMismatch> {
        if observed.name.as_deref() != Some(self.name.as_str()) {
            return Err(IdentityMismatch {
                kind: self.kind,
                field: "name",
                expected: self.name.clone(),
                actual: observed.name.clone(),
            });
        }

        if let Some(expected_ns) = &self.namespace {
            if observed.namespace.as_ref() != Some(expected_ns) {
                return Err(IdentityMismatch {
                    kind: self.kind,
                    field: "namespace",
                    expected: expected_ns.clone(),
                    actual: observed.namespace.clone(),
                });
            }
        }

        Ok(())
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{} {}/{}", self.kind, ns, self.name),
            None => write!(f, "{} {}", self.kind, self.name),
        }
    }
}

/// Identity fields read back from the cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservedIdentity {
    pub name: Option<String>,
    pub namespace: Option<String>,
}

impl ObservedIdentity {
    pub fn from_meta(meta: &ObjectMeta) -> Self {
        Self {
            name: meta.name.clone(),
            namespace: meta.namespace.clone(),
        }
    }
}

/// An observed identity field that differs from the expected literal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} {field} mismatch: expected {expected:?}, got {actual:?}")]
pub struct IdentityMismatch {
    pub kind: ResourceKind,
    pub field: &'static str,
    pub expected: String,
    pub actual: Option<String>,
}

/// Declarative skip predicate for a check group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipWhen {
    /// Skip when the target context is one of these names.
    ContextIn(Vec<String>),
}

impl SkipWhen {
    pub fn applies_to(&self, config: &HarnessConfig) -> bool {
        match self {
            SkipWhen::ContextIn(contexts) => config
                .context()
                .is_some_and(|ctx| contexts.iter().any(|c| c == ctx)),
        }
    }
}

/// A named group of identity checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckGroup {
    pub name: String,
    pub checks: Vec<ResourceRef>,
    skip: Option<(SkipWhen, String)>,
}

impl CheckGroup {
    pub fn new(name: impl Into<String>, checks: Vec<ResourceRef>) -> Self {
        Self {
            name: name.into(),
            checks,
            skip: None,
        }
    }

    /// Attach a skip predicate with the reason reported when it applies.
    pub fn skip_when(mut self, predicate: SkipWhen, reason: impl Into<String>) -> Self {
        self.skip = Some((predicate, reason.into()));
        self
    }
}

/// A check group after its skip predicate has been evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedGroup {
    Active(CheckGroup),
    Skipped { name: String, reason: String },
}

impl PlannedGroup {
    pub fn name(&self) -> &str {
        match self {
            PlannedGroup::Active(group) => &group.name,
            PlannedGroup::Skipped { name, .. } => name,
        }
    }
}

/// Ordered, fully resolved list of check groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationPlan {
    groups: Vec<PlannedGroup>,
}

impl VerificationPlan {
    /// Resolve every group's skip predicate against `config`.
    pub fn build(groups: Vec<CheckGroup>, config: &HarnessConfig) -> Self {
        let groups = groups
            .into_iter()
            .map(|group| match &group.skip {
                Some((predicate, reason)) if predicate.applies_to(config) => {
                    PlannedGroup::Skipped {
                        name: group.name.clone(),
                        reason: reason.clone(),
                    }
                }
                _ => PlannedGroup::Active(group),
            })
            .collect();

        Self { groups }
    }

    /// Plan for a cluster reconciled by the GitOps controller.
    pub fn gitops(config: &HarnessConfig) -> Self {
        Self::build(gitops_groups(), config)
    }

    pub fn groups(&self) -> &[PlannedGroup] {
        &self.groups
    }
}

/// Check groups expected on a GitOps-managed cluster.
pub fn gitops_groups() -> Vec<CheckGroup> {
    vec![
        CheckGroup::new(
            "flask-application",
            vec![
                ResourceRef::namespace(TEST_NAMESPACE),
                ResourceRef::deployment(APP_NAME, TEST_NAMESPACE),
                ResourceRef::service(APP_NAME, TEST_NAMESPACE),
                ResourceRef::ingress(APP_NAME, TEST_NAMESPACE),
            ],
        ),
        CheckGroup::new(
            "development-only",
            vec![
                ResourceRef::deployment(INTERNAL_APP_NAME, TEST_NAMESPACE),
                ResourceRef::service(INTERNAL_APP_NAME, TEST_NAMESPACE),
                ResourceRef::namespace(SECOND_NAMESPACE),
                ResourceRef::deployment(SECOND_APP_NAME, SECOND_NAMESPACE),
                ResourceRef::service(SECOND_APP_NAME, SECOND_NAMESPACE),
            ],
        )
        .skip_when(
            SkipWhen::ContextIn(
                NON_DEVELOPMENT_CONTEXTS
                    .iter()
                    .map(|c| c.to_string())
                    .collect(),
            ),
            "only deployed on development",
        ),
    ]
}
