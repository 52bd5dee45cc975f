//! Container builders for the manager pod
//!
//! The `config-init` container runs the rook binary's `mgr-init` action,
//! which writes ceph.conf and the keyring into the shared volumes. The `mgr`
//! container then runs `ceph-mgr` against the default paths those files
//! were written to.

use ceph_common::daemon::env::{
    cluster_daemon_env_vars, config_override_env_var, pod_ip_env_var, PRIVATE_IP_ENV_VAR,
    PUBLIC_IP_ENV_VAR,
};
use ceph_common::daemon::make_rook_image;
use ceph_common::daemon::volumes::{ceph_volume_mounts, rook_volume_mounts};
use ceph_common::k8s::{Container, ContainerPort, EnvVar};
use ceph_common::{mon, DATA_DIR};

use crate::config::{ClusterContext, DaemonIdentity};
use crate::{DASHBOARD_PORT, METRICS_PORT, MGR_PORT};

/// Name of the init container that writes daemon config
pub const CONFIG_INIT_CONTAINER_NAME: &str = "config-init";

/// Name of the daemon container
pub const MGR_CONTAINER_NAME: &str = "mgr";

/// Rook action that writes manager config and keyring
pub const MGR_INIT_COMMAND: &str = "mgr-init";

/// Manager executable
pub const MGR_DAEMON_COMMAND: &str = "ceph-mgr";

/// Env var carrying the manager keyring into `mgr-init`
pub const KEYRING_ENV_VAR: &str = "ROOK_MGR_KEYRING";

/// Key of the keyring in the per-daemon Secret
pub const KEYRING_SECRET_KEY: &str = "keyring";

/// Build the init container that materializes config and keyring.
///
/// The keyring is read from the Secret named after the daemon's resource,
/// never passed inline. The container serves nothing, so it declares no
/// ports.
pub fn bootstrap_container(identity: &DaemonIdentity, ctx: &ClusterContext) -> Container {
    Container {
        name: CONFIG_INIT_CONTAINER_NAME.to_string(),
        image: make_rook_image(&ctx.image_version),
        command: None,
        args: Some(vec![
            "ceph".to_string(),
            MGR_INIT_COMMAND.to_string(),
            format!("--config-dir={DATA_DIR}"),
            format!("--mgr-name={}", identity.daemon_name),
        ]),
        env: vec![
            EnvVar::from_secret(KEYRING_ENV_VAR, &identity.resource_name, KEYRING_SECRET_KEY),
            pod_ip_env_var(PRIVATE_IP_ENV_VAR),
            pod_ip_env_var(PUBLIC_IP_ENV_VAR),
            mon::cluster_name_env_var(&ctx.namespace),
            mon::endpoint_env_var(),
            mon::secret_env_var(),
            mon::admin_secret_env_var(),
            config_override_env_var(),
        ],
        ports: vec![],
        resources: ctx.resources.clone(),
        volume_mounts: rook_volume_mounts(),
    }
}

/// Build the long-running manager container.
///
/// `--cluster`, `--conf` and `--keyring` are left off so `ceph-mgr` reads
/// the defaults under /etc/ceph that `config-init` populated.
pub fn daemon_container(identity: &DaemonIdentity, ctx: &ClusterContext) -> Container {
    Container {
        name: MGR_CONTAINER_NAME.to_string(),
        image: make_rook_image(&ctx.image_version),
        command: Some(vec![MGR_DAEMON_COMMAND.to_string()]),
        args: Some(vec![
            "--foreground".to_string(),
            "--id".to_string(),
            identity.daemon_name.clone(),
        ]),
        env: cluster_daemon_env_vars(),
        ports: vec![
            ContainerPort::tcp("mgr", MGR_PORT),
            ContainerPort::tcp("http-metrics", METRICS_PORT),
            ContainerPort::tcp("dashboard", DASHBOARD_PORT),
        ],
        resources: ctx.resources.clone(),
        volume_mounts: ceph_volume_mounts(),
    }
}
