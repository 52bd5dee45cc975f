//! Rendering a CephCluster into its manager Deployments

use ceph_common::crd::CephCluster;
use ceph_common::kube_utils::ClusterOwnerRegistrar;
use ceph_common::Result;
use kube::CustomResourceExt;
use tracing::info;

use crate::compiler::assemble_manifest;
use crate::config::{ClusterContext, DaemonIdentity};
use crate::workload::Deployment;

/// Parse a CephCluster resource from JSON.
pub fn parse_cluster(raw: &str) -> Result<CephCluster> {
    Ok(serde_json::from_str(raw)?)
}

/// One owned Deployment per manager the cluster asks for, in daemon order.
pub fn render_deployments(cluster: &CephCluster) -> Result<Vec<Deployment>> {
    let ctx = ClusterContext::from_cluster(cluster)?;
    let registrar = ClusterOwnerRegistrar::namespaced(&ctx.namespace);
    let count = cluster.spec.mgr.count;
    info!(namespace = %ctx.namespace, count, "rendering mgr deployments");

    (0..count)
        .map(|index| assemble_manifest(&DaemonIdentity::for_index(index), &ctx, &registrar))
        .collect()
}

/// The CephCluster CRD as pretty JSON
pub fn render_crd() -> Result<String> {
    Ok(serde_json::to_string_pretty(&CephCluster::crd())?)
}
