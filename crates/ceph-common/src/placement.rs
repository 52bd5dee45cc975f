//! Daemon placement rules
//!
//! A [`Placement`] carries the scheduling constraints a cluster resource
//! declares for a daemon role. Rules for the `all` key apply to every role
//! and are merged with the role-specific rules before being written onto
//! a pod spec.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::k8s::{Affinity, PodSpec, Toleration};

/// Placement key whose rules apply to every daemon role
pub const PLACEMENT_ALL: &str = "all";

/// Scheduling constraints for one daemon role
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    /// Node affinity rules
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_affinity: Option<serde_json::Value>,
    /// Pod affinity rules
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_affinity: Option<serde_json::Value>,
    /// Pod anti-affinity rules
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_anti_affinity: Option<serde_json::Value>,
    /// Tolerations
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tolerations: Vec<Toleration>,
}

impl Placement {
    /// Merge `other` on top of `self`.
    ///
    /// Affinity rules set in `other` replace those in `self`; tolerations
    /// from both are kept, `self` first.
    pub fn merge(&self, other: &Placement) -> Placement {
        let mut merged = self.clone();
        if other.node_affinity.is_some() {
            merged.node_affinity = other.node_affinity.clone();
        }
        if other.pod_affinity.is_some() {
            merged.pod_affinity = other.pod_affinity.clone();
        }
        if other.pod_anti_affinity.is_some() {
            merged.pod_anti_affinity = other.pod_anti_affinity.clone();
        }
        merged.tolerations.extend(other.tolerations.iter().cloned());
        merged
    }

    /// Write these constraints onto a pod spec.
    ///
    /// Only rules that are set overwrite the pod spec; unset rules leave the
    /// existing values in place.
    pub fn apply_to_pod_spec(&self, spec: &mut PodSpec) {
        let mut affinity = spec.affinity.take().unwrap_or_default();
        if let Some(node) = &self.node_affinity {
            affinity.node_affinity = Some(node.clone());
        }
        if let Some(pod) = &self.pod_affinity {
            affinity.pod_affinity = Some(pod.clone());
        }
        if let Some(anti) = &self.pod_anti_affinity {
            affinity.pod_anti_affinity = Some(anti.clone());
        }
        spec.affinity = (!affinity.is_empty()).then_some(affinity);

        if !self.tolerations.is_empty() {
            spec.tolerations = self.tolerations.clone();
        }
    }
}
