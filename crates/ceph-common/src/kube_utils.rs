//! Shared Kubernetes metadata types and ownership registration
//!
//! Compiled manifests carry [`ObjectMeta`] rather than the k8s-openapi type so
//! that every optional field has a stable, deterministic serialization.
//! Owner references are attached in a separate step through
//! [`OwnerRegistrar`], which keeps manifest construction a pure function.

use std::collections::BTreeMap;

use kube::discovery::ApiResource;
use tracing::debug;

#[cfg(test)]
use mockall::automock;

use crate::{Error, Result};

// =============================================================================
// ObjectMeta
// =============================================================================

/// Standard Kubernetes ObjectMeta for compiled resources.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    /// Resource name
    pub name: String,
    /// Resource namespace
    pub namespace: String,
    /// Labels
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    /// Annotations
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
    /// Owners whose deletion cascades to this resource
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub owner_references: Vec<OwnerReference>,
}

impl ObjectMeta {
    /// Create new metadata with no labels or annotations
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            ..Default::default()
        }
    }
}

/// Link from a child resource to the parent that owns its lifecycle
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OwnerReference {
    /// API version of the owner
    pub api_version: String,
    /// Kind of the owner
    pub kind: String,
    /// Name of the owner
    pub name: String,
    /// UID of the owner
    pub uid: String,
    /// Whether the owner is the managing controller
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller: Option<bool>,
    /// Block owner deletion until this resource is removed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_owner_deletion: Option<bool>,
}

impl From<k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference> for OwnerReference {
    fn from(oref: k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference) -> Self {
        Self {
            api_version: oref.api_version,
            kind: oref.kind,
            name: oref.name,
            uid: oref.uid,
            controller: oref.controller,
            block_owner_deletion: oref.block_owner_deletion,
        }
    }
}

// =============================================================================
// HasApiResource Trait
// =============================================================================

/// Trait for manifest types that have a known API group, version, and kind.
///
/// The apply collaborator uses [`HasApiResource::api_resource`] to build a
/// dynamic API handle for a compiled manifest.
pub trait HasApiResource {
    /// Full API version (e.g., "apps/v1", "v1")
    const API_VERSION: &'static str;
    /// Resource kind (e.g., "Deployment")
    const KIND: &'static str;

    /// Build an ApiResource from the type's constants.
    fn api_resource() -> ApiResource {
        build_api_resource(Self::API_VERSION, Self::KIND)
    }
}

/// Build an ApiResource from an apiVersion string and kind.
pub fn build_api_resource(api_version: &str, kind: &str) -> ApiResource {
    let (group, version) = match api_version.split_once('/') {
        Some((group, version)) => (group.to_string(), version.to_string()),
        None => (String::new(), api_version.to_string()),
    };
    ApiResource {
        group,
        version,
        kind: kind.to_string(),
        api_version: api_version.to_string(),
        plural: format!("{}s", kind.to_lowercase()),
    }
}

// =============================================================================
// Ownership registration
// =============================================================================

/// Attaches owner references to compiled manifests.
///
/// Implementations may consult the cluster; errors are returned to the
/// caller unchanged and the manifest must not be submitted.
#[cfg_attr(test, automock)]
pub trait OwnerRegistrar: Send + Sync {
    /// Link `meta` (a resource in `namespace`) to `owner`.
    fn set_owner_ref(
        &self,
        namespace: &str,
        meta: &mut ObjectMeta,
        owner: &OwnerReference,
    ) -> Result<()>;
}

/// Registrar for owners that live in the cluster the manifest is applied to.
///
/// Kubernetes garbage collection ignores references from a namespaced child
/// to a namespaced owner in another namespace, so such references are
/// rejected instead of silently producing an orphan.
#[derive(Clone, Debug, Default)]
pub struct ClusterOwnerRegistrar {
    owner_namespace: Option<String>,
}

impl ClusterOwnerRegistrar {
    /// Registrar for a namespaced owner
    pub fn namespaced(owner_namespace: impl Into<String>) -> Self {
        Self {
            owner_namespace: Some(owner_namespace.into()),
        }
    }

    /// Registrar for a cluster-scoped owner
    pub fn cluster_scoped() -> Self {
        Self::default()
    }
}

impl OwnerRegistrar for ClusterOwnerRegistrar {
    fn set_owner_ref(
        &self,
        namespace: &str,
        meta: &mut ObjectMeta,
        owner: &OwnerReference,
    ) -> Result<()> {
        let missing = [
            ("apiVersion", owner.api_version.as_str()),
            ("kind", owner.kind.as_str()),
            ("name", owner.name.as_str()),
            ("uid", owner.uid.as_str()),
        ]
        .into_iter()
        .find(|(_, value)| value.is_empty());
        if let Some((field, _)) = missing {
            return Err(Error::owner_reference(
                &meta.name,
                format!("owner reference has empty {field}"),
            ));
        }

        if let Some(owner_ns) = &self.owner_namespace {
            if owner_ns != namespace {
                return Err(Error::owner_reference(
                    &meta.name,
                    format!(
                        "owner {}/{} is in namespace {owner_ns}, resource is in {namespace}",
                        owner.kind, owner.name
                    ),
                ));
            }
        }

        if meta.owner_references.iter().any(|r| r.uid == owner.uid) {
            debug!(resource = %meta.name, owner = %owner.name, "owner reference already set");
            return Ok(());
        }

        meta.owner_references.push(owner.clone());
        debug!(resource = %meta.name, owner = %owner.name, kind = %owner.kind, "owner reference set");
        Ok(())
    }
}
