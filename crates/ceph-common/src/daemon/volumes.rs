//! Volume and mount sets shared by daemon pods
//!
//! Init containers that materialize configuration see the override config
//! map; long-running daemons only see the data dir and the generated
//! default config dir.

use crate::k8s::{Volume, VolumeMount};
use crate::DATA_DIR;

/// Volume holding the daemon data dir
pub const DATA_DIR_VOLUME: &str = "rook-data";

/// Name of both the override ConfigMap and the volume projecting it
pub const CONFIG_OVERRIDE_NAME: &str = "rook-config-override";

/// Key of the override ConfigMap holding the ceph config snippet
pub const CONFIG_OVERRIDE_KEY: &str = "config";

/// File the override snippet is projected to
pub const CONFIG_OVERRIDE_FILE: &str = "override.conf";

/// Directory the override ConfigMap is mounted at
pub const CONFIG_OVERRIDE_MOUNT_PATH: &str = "/etc/rook/config";

/// Volume for the config dir ceph daemons read by default
pub const DEFAULT_CONFIG_DIR_VOLUME: &str = "ceph-default-config-dir";

/// Directory ceph daemons read their config and keyring from by default
pub const DEFAULT_CONFIG_DIR: &str = "/etc/ceph";

/// Volumes every daemon pod declares.
///
/// The data dir is an emptyDir unless `data_dir_host_path` names a node
/// directory to persist it in.
pub fn pod_volumes(data_dir_host_path: Option<&str>) -> Vec<Volume> {
    let data_dir = match data_dir_host_path {
        Some(path) if !path.is_empty() => Volume::from_host_path(DATA_DIR_VOLUME, path),
        _ => Volume::from_empty_dir(DATA_DIR_VOLUME),
    };
    vec![
        data_dir,
        Volume::from_config_map_item(
            CONFIG_OVERRIDE_NAME,
            CONFIG_OVERRIDE_NAME,
            CONFIG_OVERRIDE_KEY,
            CONFIG_OVERRIDE_FILE,
        ),
        Volume::from_empty_dir(DEFAULT_CONFIG_DIR_VOLUME),
    ]
}

/// Mounts for init containers that write daemon configuration
pub fn rook_volume_mounts() -> Vec<VolumeMount> {
    vec![
        VolumeMount::new(DATA_DIR_VOLUME, DATA_DIR),
        VolumeMount::new(CONFIG_OVERRIDE_NAME, CONFIG_OVERRIDE_MOUNT_PATH),
        VolumeMount::new(DEFAULT_CONFIG_DIR_VOLUME, DEFAULT_CONFIG_DIR),
    ]
}

/// Mounts for long-running ceph daemon containers
pub fn ceph_volume_mounts() -> Vec<VolumeMount> {
    vec![
        VolumeMount::new(DATA_DIR_VOLUME, DATA_DIR),
        VolumeMount::new(DEFAULT_CONFIG_DIR_VOLUME, DEFAULT_CONFIG_DIR),
    ]
}
