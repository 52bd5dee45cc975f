//! Build inputs: which daemon to build and the cluster it belongs to
//!
//! Both types are immutable values handed to every builder call; nothing in
//! this crate holds cluster state between calls.

use ceph_common::crd::CephCluster;
use ceph_common::daemon::index_to_name;
use ceph_common::k8s::ResourceRequirements;
use ceph_common::kube_utils::OwnerReference;
use ceph_common::placement::Placement;
use ceph_common::{Error, Result};
use kube::{Resource, ResourceExt};

use crate::{APP_NAME, DAEMON_TYPE};

/// Identity of one manager daemon
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DaemonIdentity {
    /// Daemon id passed to `ceph-mgr --id`, e.g. `a`
    pub daemon_name: String,
    /// Name of the Deployment and the keyring Secret, e.g. `rook-ceph-mgr-a`
    pub resource_name: String,
}

impl DaemonIdentity {
    /// Identity from explicit names
    pub fn new(daemon_name: impl Into<String>, resource_name: impl Into<String>) -> Self {
        Self {
            daemon_name: daemon_name.into(),
            resource_name: resource_name.into(),
        }
    }

    /// Identity of the `index`-th manager: `a` / `rook-ceph-mgr-a`, `b` / ...
    pub fn for_index(index: u32) -> Self {
        let daemon_name = index_to_name(index);
        let resource_name = format!("{APP_NAME}-{daemon_name}");
        Self {
            daemon_name,
            resource_name,
        }
    }
}

/// Cluster-wide settings every manager manifest is derived from
#[derive(Clone, Debug, PartialEq)]
pub struct ClusterContext {
    /// Namespace the cluster and its daemons live in
    pub namespace: String,
    /// Rook version or full image reference
    pub image_version: String,
    /// Run the daemon in the host network namespace
    pub host_network: bool,
    /// Scheduling constraints for manager pods
    pub placement: Placement,
    /// Resource requirements for both containers
    pub resources: Option<ResourceRequirements>,
    /// Reference to the parent cluster resource
    pub owner_ref: OwnerReference,
}

impl ClusterContext {
    /// Context with default network, placement, and resources
    pub fn new(
        namespace: impl Into<String>,
        image_version: impl Into<String>,
        owner_ref: OwnerReference,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            image_version: image_version.into(),
            host_network: false,
            placement: Placement::default(),
            resources: None,
            owner_ref,
        }
    }

    /// Set host networking
    pub fn with_host_network(mut self, host_network: bool) -> Self {
        self.host_network = host_network;
        self
    }

    /// Set placement rules
    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    /// Set container resource requirements
    pub fn with_resources(mut self, resources: ResourceRequirements) -> Self {
        self.resources = Some(resources);
        self
    }

    /// Derive the manager context from the parent cluster resource.
    ///
    /// The cluster must have been read from the API server: namespace and
    /// uid are needed for the owner reference.
    pub fn from_cluster(cluster: &CephCluster) -> Result<Self> {
        let name = cluster.name_any();
        let namespace = cluster
            .namespace()
            .ok_or_else(|| Error::validation(&name, "cluster has no namespace"))?;
        let owner_ref = cluster
            .controller_owner_ref(&())
            .ok_or_else(|| Error::validation(&name, "cluster has no uid"))?;

        let spec = &cluster.spec;
        Ok(Self {
            namespace,
            image_version: spec.version.clone(),
            host_network: spec.network.host_network,
            placement: spec.placement_for(DAEMON_TYPE),
            resources: spec.resources_for(DAEMON_TYPE),
            owner_ref: owner_ref.into(),
        })
    }
}
