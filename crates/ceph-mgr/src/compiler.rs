//! Manager Deployment assembly
//!
//! [`MgrCompiler::build`] is a pure function of its inputs. Owner references
//! are attached afterwards by [`MgrCompiler::assemble`] through an
//! [`OwnerRegistrar`], so the pod template can be tested without a cluster.

use std::collections::BTreeMap;

use ceph_common::daemon::volumes::pod_volumes;
use ceph_common::k8s::{PodMeta, PodSpec, PodTemplateSpec};
use ceph_common::kube_utils::{ObjectMeta, OwnerRegistrar};
use ceph_common::Result;
use tracing::debug;

use crate::config::{ClusterContext, DaemonIdentity};
use crate::container::{bootstrap_container, daemon_container};
use crate::labels::compose_labels;
use crate::workload::{Deployment, DeploymentSpec, LabelSelector};
use crate::METRICS_PORT;

/// Annotation asking prometheus to scrape the pod
pub const PROMETHEUS_SCRAPE_ANNOTATION: &str = "prometheus.io/scrape";

/// Annotation naming the port prometheus scrapes
pub const PROMETHEUS_PORT_ANNOTATION: &str = "prometheus.io/port";

/// DNS policy required for cluster DNS from host-network pods
pub const DNS_CLUSTER_FIRST_WITH_HOST_NET: &str = "ClusterFirstWithHostNet";

/// Manager daemons are never scaled horizontally; each gets its own Deployment
const MGR_REPLICAS: u32 = 1;

/// Compiles the Deployment for one manager daemon.
pub struct MgrCompiler<'a> {
    identity: &'a DaemonIdentity,
    ctx: &'a ClusterContext,
}

impl<'a> MgrCompiler<'a> {
    /// Compiler for `identity` in the cluster described by `ctx`
    pub fn new(identity: &'a DaemonIdentity, ctx: &'a ClusterContext) -> Self {
        Self { identity, ctx }
    }

    /// Build the Deployment without owner references.
    ///
    /// Manager state is disposable, so the data dir is always an emptyDir
    /// even when the cluster persists other daemons under a host path.
    pub fn build(&self) -> Deployment {
        let template = self.pod_template();
        let selector = LabelSelector {
            match_labels: template.metadata.labels.clone(),
        };

        Deployment::new(
            ObjectMeta::new(&self.identity.resource_name, &self.ctx.namespace),
            DeploymentSpec {
                replicas: MGR_REPLICAS,
                selector,
                template,
            },
        )
    }

    /// Build the Deployment and link it to the parent cluster resource.
    ///
    /// Registrar errors are returned unchanged and no Deployment is
    /// produced.
    pub fn assemble(&self, registrar: &dyn OwnerRegistrar) -> Result<Deployment> {
        let mut deployment = self.build();
        registrar.set_owner_ref(
            &self.ctx.namespace,
            &mut deployment.metadata,
            &self.ctx.owner_ref,
        )?;
        debug!(
            deployment = %deployment.metadata.name,
            namespace = %deployment.metadata.namespace,
            daemon = %self.identity.daemon_name,
            "assembled mgr deployment"
        );
        Ok(deployment)
    }

    fn pod_template(&self) -> PodTemplateSpec {
        let metadata = PodMeta {
            name: Some(self.identity.resource_name.clone()),
            labels: compose_labels(&self.ctx.namespace, &self.identity.daemon_name),
            annotations: BTreeMap::from([
                (PROMETHEUS_SCRAPE_ANNOTATION.to_string(), "true".to_string()),
                (PROMETHEUS_PORT_ANNOTATION.to_string(), METRICS_PORT.to_string()),
            ]),
        };

        let mut spec = PodSpec {
            init_containers: vec![bootstrap_container(self.identity, self.ctx)],
            containers: vec![daemon_container(self.identity, self.ctx)],
            restart_policy: Some("Always".to_string()),
            volumes: pod_volumes(None),
            host_network: self.ctx.host_network,
            ..Default::default()
        };
        if self.ctx.host_network {
            spec.dns_policy = Some(DNS_CLUSTER_FIRST_WITH_HOST_NET.to_string());
        }
        self.ctx.placement.apply_to_pod_spec(&mut spec);

        PodTemplateSpec { metadata, spec }
    }
}

/// Build the manager Deployment without owner references.
pub fn build_manifest(identity: &DaemonIdentity, ctx: &ClusterContext) -> Deployment {
    MgrCompiler::new(identity, ctx).build()
}

/// Build the manager Deployment and attach the cluster owner reference.
pub fn assemble_manifest(
    identity: &DaemonIdentity,
    ctx: &ClusterContext,
    registrar: &dyn OwnerRegistrar,
) -> Result<Deployment> {
    MgrCompiler::new(identity, ctx).assemble(registrar)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ceph_common::crd::{CephCluster, CephClusterSpec};
    use ceph_common::k8s::Toleration;
    use ceph_common::kube_utils::{ClusterOwnerRegistrar, OwnerReference};
    use ceph_common::placement::Placement;
    use ceph_common::Error;
    use mockall::mock;

    mock! {
        Registrar {}

        impl OwnerRegistrar for Registrar {
            fn set_owner_ref(
                &self,
                namespace: &str,
                meta: &mut ObjectMeta,
                owner: &OwnerReference,
            ) -> Result<()>;
        }
    }

    fn owner() -> OwnerReference {
        OwnerReference {
            api_version: "ceph.rook.io/v1beta1".to_string(),
            kind: "CephCluster".to_string(),
            name: "rook-ceph".to_string(),
            uid: "uid-1234".to_string(),
            controller: Some(true),
            block_owner_deletion: Some(true),
        }
    }

    fn identity() -> DaemonIdentity {
        DaemonIdentity::new("a", "rook-ceph-mgr-a")
    }

    fn ctx() -> ClusterContext {
        ClusterContext::new("rook-ceph", "v0.8.0", owner())
    }

    fn assemble(identity: &DaemonIdentity, ctx: &ClusterContext) -> Deployment {
        assemble_manifest(identity, ctx, &ClusterOwnerRegistrar::namespaced(&ctx.namespace))
            .expect("assembly should succeed")
    }

    // =========================================================================
    // Story: Default manager deployment
    // =========================================================================

    #[test]
    fn first_mgr_deployment() {
        let deployment = assemble(&identity(), &ctx());

        assert_eq!(deployment.api_version, "apps/v1");
        assert_eq!(deployment.kind, "Deployment");
        assert_eq!(deployment.metadata.name, "rook-ceph-mgr-a");
        assert_eq!(deployment.metadata.namespace, "rook-ceph");
        assert_eq!(deployment.spec.replicas, 1);

        let pod = &deployment.spec.template;
        assert_eq!(pod.metadata.name.as_deref(), Some("rook-ceph-mgr-a"));
        assert_eq!(pod.metadata.labels.get("instance"), Some(&"a".to_string()));
        assert_eq!(
            pod.metadata.annotations.get("prometheus.io/scrape"),
            Some(&"true".to_string())
        );
        assert_eq!(
            pod.metadata.annotations.get("prometheus.io/port"),
            Some(&"9283".to_string())
        );
    }

    #[test]
    fn one_init_container_then_one_daemon_container() {
        let deployment = build_manifest(&identity(), &ctx());
        let spec = &deployment.spec.template.spec;

        assert_eq!(spec.init_containers.len(), 1);
        assert_eq!(spec.containers.len(), 1);
        assert_eq!(spec.init_containers[0].name, "config-init");
        assert_eq!(spec.containers[0].name, "mgr");
        assert_eq!(spec.restart_policy.as_deref(), Some("Always"));
    }

    #[test]
    fn selector_matches_pod_labels() {
        let deployment = build_manifest(&identity(), &ctx());
        assert_eq!(
            deployment.spec.selector.match_labels,
            deployment.spec.template.metadata.labels
        );
    }

    #[test]
    fn data_dir_is_empty_dir_even_with_host_path() {
        let spec: CephClusterSpec = serde_json::from_value(serde_json::json!({
            "version": "v0.8.0",
            "dataDirHostPath": "/var/lib/rook"
        }))
        .expect("parse spec");
        let mut cluster = CephCluster::new("rook-ceph", spec);
        cluster.metadata.namespace = Some("rook-ceph".to_string());
        cluster.metadata.uid = Some("uid-1234".to_string());
        let ctx = ClusterContext::from_cluster(&cluster).expect("context");

        let deployment = build_manifest(&identity(), &ctx);
        let volumes = &deployment.spec.template.spec.volumes;
        assert_eq!(volumes, &pod_volumes(None));

        let data_dir = volumes
            .iter()
            .find(|v| v.name == "rook-data")
            .expect("rook-data volume");
        assert!(data_dir.empty_dir.is_some());
        assert!(data_dir.host_path.is_none());
    }

    #[test]
    fn building_twice_is_identical() {
        let ctx = ctx()
            .with_host_network(true)
            .with_placement(Placement {
                tolerations: vec![Toleration {
                    key: Some("storage".to_string()),
                    operator: Some("Exists".to_string()),
                    ..Default::default()
                }],
                ..Default::default()
            });

        let first = assemble(&identity(), &ctx);
        let second = assemble(&identity(), &ctx);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    // =========================================================================
    // Story: Host networking
    // =========================================================================

    #[test]
    fn host_network_uses_host_aware_dns() {
        let deployment = build_manifest(&identity(), &ctx().with_host_network(true));
        let spec = &deployment.spec.template.spec;

        assert!(spec.host_network);
        assert_eq!(spec.dns_policy.as_deref(), Some("ClusterFirstWithHostNet"));
    }

    #[test]
    fn pod_network_leaves_dns_default() {
        let deployment = build_manifest(&identity(), &ctx());
        let spec = &deployment.spec.template.spec;

        assert!(!spec.host_network);
        assert!(spec.dns_policy.is_none());

        let json = serde_json::to_value(&deployment).unwrap();
        assert!(json["spec"]["template"]["spec"].get("dnsPolicy").is_none());
    }

    // =========================================================================
    // Story: Placement
    // =========================================================================

    #[test]
    fn placement_is_applied_to_pod_spec() {
        let toleration = Toleration {
            key: Some("mgr".to_string()),
            operator: Some("Exists".to_string()),
            ..Default::default()
        };
        let ctx = ctx().with_placement(Placement {
            pod_anti_affinity: Some(serde_json::json!({"preferred": true})),
            tolerations: vec![toleration.clone()],
            ..Default::default()
        });

        let deployment = build_manifest(&identity(), &ctx);
        let spec = &deployment.spec.template.spec;
        assert_eq!(spec.tolerations, vec![toleration]);
        assert!(spec
            .affinity
            .as_ref()
            .and_then(|a| a.pod_anti_affinity.as_ref())
            .is_some());
    }

    // =========================================================================
    // Story: Ownership
    // =========================================================================

    #[test]
    fn build_has_no_owner_and_assemble_adds_one() {
        assert!(build_manifest(&identity(), &ctx())
            .metadata
            .owner_references
            .is_empty());

        let deployment = assemble(&identity(), &ctx());
        assert_eq!(deployment.metadata.owner_references, vec![owner()]);
    }

    #[test]
    fn registrar_receives_namespace_and_owner() {
        let mut registrar = MockRegistrar::new();
        registrar
            .expect_set_owner_ref()
            .withf(|namespace, meta, owner| {
                namespace == "rook-ceph"
                    && meta.name == "rook-ceph-mgr-a"
                    && owner.uid == "uid-1234"
            })
            .times(1)
            .returning(|_, meta, owner| {
                meta.owner_references.push(owner.clone());
                Ok(())
            });

        let deployment = assemble_manifest(&identity(), &ctx(), &registrar).expect("assemble");
        assert_eq!(deployment.metadata.owner_references.len(), 1);
    }

    #[test]
    fn registrar_error_is_propagated() {
        let mut registrar = MockRegistrar::new();
        registrar
            .expect_set_owner_ref()
            .times(1)
            .returning(|_, meta, _| Err(Error::owner_reference(&meta.name, "api unavailable")));

        let err = assemble_manifest(&identity(), &ctx(), &registrar).unwrap_err();
        assert_eq!(
            err.to_string(),
            "owner reference error for rook-ceph-mgr-a: api unavailable"
        );
    }
}
