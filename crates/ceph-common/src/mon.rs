//! Monitor connection details for daemon containers
//!
//! The monitor subsystem publishes its endpoints in a ConfigMap and its
//! keys in a Secret. Daemon init containers receive references to both so
//! they can write a working ceph config before the daemon starts.

use crate::k8s::EnvVar;

/// ConfigMap the mon subsystem publishes its endpoints to
pub const MON_ENDPOINTS_CONFIG_MAP: &str = "rook-ceph-mon-endpoints";

/// Key of the endpoint list in [`MON_ENDPOINTS_CONFIG_MAP`]
pub const MON_ENDPOINTS_KEY: &str = "data";

/// Secret holding the mon and admin keys
pub const MON_SECRET_NAME: &str = "rook-ceph-mon";

/// Key of the mon keyring secret in [`MON_SECRET_NAME`]
pub const MON_SECRET_KEY: &str = "mon-secret";

/// Key of the admin keyring secret in [`MON_SECRET_NAME`]
pub const ADMIN_SECRET_KEY: &str = "admin-secret";

/// Cluster name; the cluster is named after its namespace
pub fn cluster_name_env_var(namespace: &str) -> EnvVar {
    EnvVar::literal("ROOK_CLUSTER_NAME", namespace)
}

/// Current mon endpoints
pub fn endpoint_env_var() -> EnvVar {
    EnvVar::from_config_map("ROOK_MON_ENDPOINTS", MON_ENDPOINTS_CONFIG_MAP, MON_ENDPOINTS_KEY)
}

/// Mon keyring secret
pub fn secret_env_var() -> EnvVar {
    EnvVar::from_secret("ROOK_MON_SECRET", MON_SECRET_NAME, MON_SECRET_KEY)
}

/// Admin keyring secret
pub fn admin_secret_env_var() -> EnvVar {
    EnvVar::from_secret("ROOK_ADMIN_SECRET", MON_SECRET_NAME, ADMIN_SECRET_KEY)
}
