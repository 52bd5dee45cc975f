//! Environment variables shared by daemon containers

use crate::daemon::volumes::{CONFIG_OVERRIDE_FILE, CONFIG_OVERRIDE_MOUNT_PATH};
use crate::k8s::EnvVar;

/// Env var holding the address other daemons reach this pod on
pub const PRIVATE_IP_ENV_VAR: &str = "ROOK_PRIVATE_IP";

/// Env var holding the address clients reach this pod on
pub const PUBLIC_IP_ENV_VAR: &str = "ROOK_PUBLIC_IP";

/// Env var pointing at the user-supplied ceph config override file
pub const CONFIG_OVERRIDE_ENV_VAR: &str = "ROOK_CEPH_CONFIG_OVERRIDE";

/// Env var sourced from the pod IP
pub fn pod_ip_env_var(name: &str) -> EnvVar {
    EnvVar::from_field(name, "status.podIP")
}

/// Env var locating the config override file inside the container
pub fn config_override_env_var() -> EnvVar {
    EnvVar::literal(
        CONFIG_OVERRIDE_ENV_VAR,
        format!("{CONFIG_OVERRIDE_MOUNT_PATH}/{CONFIG_OVERRIDE_FILE}"),
    )
}

/// Environment every long-running daemon container receives.
///
/// Pod identity comes from the downward API and container limits from the
/// resource field selectors, so daemons can size caches to their limits.
pub fn cluster_daemon_env_vars() -> Vec<EnvVar> {
    vec![
        EnvVar::from_field("POD_NAME", "metadata.name"),
        EnvVar::from_field("POD_NAMESPACE", "metadata.namespace"),
        EnvVar::from_field("NODE_NAME", "spec.nodeName"),
        EnvVar::from_resource("POD_MEMORY_LIMIT", "limits.memory"),
        EnvVar::from_resource("POD_MEMORY_REQUEST", "requests.memory"),
        EnvVar::from_resource("POD_CPU_LIMIT", "limits.cpu"),
        EnvVar::from_resource("POD_CPU_REQUEST", "requests.cpu"),
    ]
}
