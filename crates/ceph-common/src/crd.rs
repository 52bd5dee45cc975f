//! Custom Resource Definitions for Ceph clusters
//!
//! `CephCluster` is the parent resource every daemon manifest is owned by.
//! Deleting it cascades to the daemon workloads through owner references.

use std::collections::BTreeMap;

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::k8s::ResourceRequirements;
use crate::placement::{Placement, PLACEMENT_ALL};

/// Specification for a CephCluster
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "ceph.rook.io",
    version = "v1beta1",
    kind = "CephCluster",
    plural = "cephclusters",
    namespaced,
    printcolumn = r#"{"name":"Version","type":"string","jsonPath":".spec.version"}"#,
    printcolumn = r#"{"name":"Age","type":"date","jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct CephClusterSpec {
    /// Rook image version (tag) or full image reference for daemon pods
    pub version: String,

    /// Host directory for daemons that persist state; manager pods always
    /// use an emptyDir
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir_host_path: Option<String>,

    /// Network settings
    #[serde(default)]
    pub network: NetworkSpec,

    /// Placement rules keyed by daemon role, plus `all` for every role
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub placement: BTreeMap<String, Placement>,

    /// Resource requirements keyed by daemon role
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub resources: BTreeMap<String, ResourceRequirements>,

    /// Manager daemon settings
    #[serde(default)]
    pub mgr: MgrSpec,
}

/// Network settings for daemon pods
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSpec {
    /// Run daemons in the host network namespace
    #[serde(default)]
    pub host_network: bool,
}

/// Manager daemon settings
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MgrSpec {
    /// Number of manager daemons
    #[serde(default = "default_mgr_count")]
    pub count: u32,
}

fn default_mgr_count() -> u32 {
    1
}

impl Default for MgrSpec {
    fn default() -> Self {
        Self {
            count: default_mgr_count(),
        }
    }
}

impl CephClusterSpec {
    /// Placement for a daemon role: the `all` rules with the role's rules
    /// merged on top.
    pub fn placement_for(&self, role: &str) -> Placement {
        let all = self
            .placement
            .get(PLACEMENT_ALL)
            .cloned()
            .unwrap_or_default();
        match self.placement.get(role) {
            Some(specific) => all.merge(specific),
            None => all,
        }
    }

    /// Resource requirements declared for a daemon role
    pub fn resources_for(&self, role: &str) -> Option<ResourceRequirements> {
        self.resources.get(role).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::CustomResourceExt;

    fn parse_spec(value: serde_json::Value) -> CephClusterSpec {
        serde_json::from_value(value).expect("parse spec")
    }

    #[test]
    fn minimal_spec_uses_defaults() {
        let spec = parse_spec(serde_json::json!({"version": "v0.8.0"}));

        assert_eq!(spec.version, "v0.8.0");
        assert!(!spec.network.host_network);
        assert_eq!(spec.mgr.count, 1);
        assert!(spec.data_dir_host_path.is_none());
        assert_eq!(spec.placement_for("mgr"), Placement::default());
        assert!(spec.resources_for("mgr").is_none());
    }

    #[test]
    fn full_spec_parses() {
        let spec = parse_spec(serde_json::json!({
            "version": "v0.8.0",
            "dataDirHostPath": "/var/lib/rook",
            "network": {"hostNetwork": true},
            "placement": {
                "all": {"tolerations": [{"key": "storage", "operator": "Exists"}]},
                "mgr": {"tolerations": [{"key": "mgr", "operator": "Exists"}]}
            },
            "resources": {
                "mgr": {"limits": {"cpu": "500m", "memory": "1Gi"}}
            },
            "mgr": {"count": 2}
        }));

        assert!(spec.network.host_network);
        assert_eq!(spec.mgr.count, 2);
        assert_eq!(spec.data_dir_host_path.as_deref(), Some("/var/lib/rook"));

        let placement = spec.placement_for("mgr");
        assert_eq!(placement.tolerations.len(), 2);
        assert_eq!(placement.tolerations[0].key.as_deref(), Some("storage"));
        assert_eq!(placement.tolerations[1].key.as_deref(), Some("mgr"));

        let limits = spec
            .resources_for("mgr")
            .and_then(|r| r.limits)
            .expect("limits should be set");
        assert_eq!(limits.cpu.as_deref(), Some("500m"));
        assert_eq!(limits.memory.as_deref(), Some("1Gi"));
    }

    #[test]
    fn placement_for_other_role_uses_all_only() {
        let spec = parse_spec(serde_json::json!({
            "version": "v0.8.0",
            "placement": {
                "all": {"tolerations": [{"key": "storage", "operator": "Exists"}]},
                "mon": {"tolerations": [{"key": "mon", "operator": "Exists"}]}
            }
        }));

        assert_eq!(spec.placement_for("mgr").tolerations.len(), 1);
    }

    #[test]
    fn crd_has_expected_identity() {
        let crd = CephCluster::crd();
        assert_eq!(crd.spec.group, "ceph.rook.io");
        assert_eq!(crd.spec.names.kind, "CephCluster");
        assert_eq!(crd.spec.scope, "Namespaced");
    }
}
