//! Collaborators shared by every Ceph daemon manifest
//!
//! Image resolution, pod labels, and daemon naming live here; env var and
//! volume helpers are in the submodules.

pub mod env;
pub mod volumes;

use std::collections::BTreeMap;

use crate::{LABEL_APP, LABEL_CLUSTER, LABEL_DAEMON_TYPE};

/// Repository daemon images are pulled from when only a version is given
pub const ROOK_IMAGE_REPOSITORY: &str = "rook/rook";

/// Resolve the image reference for a rook version.
///
/// A bare version becomes `rook/rook:<version>`. A value that already names
/// a repository or carries a tag is used as given.
pub fn make_rook_image(version: &str) -> String {
    if version.contains('/') || version.contains(':') {
        version.to_string()
    } else {
        format!("{ROOK_IMAGE_REPOSITORY}:{version}")
    }
}

/// Base identity labels for a daemon pod.
///
/// `daemon_type` is written both as the role label and as the key holding
/// the daemon id, so selectors can match `mgr=a` directly.
pub fn pod_labels(
    app_name: &str,
    namespace: &str,
    daemon_type: &str,
    daemon_id: &str,
) -> BTreeMap<String, String> {
    BTreeMap::from([
        (LABEL_APP.to_string(), app_name.to_string()),
        (LABEL_CLUSTER.to_string(), namespace.to_string()),
        (LABEL_DAEMON_TYPE.to_string(), daemon_type.to_string()),
        (daemon_type.to_string(), daemon_id.to_string()),
    ])
}

/// Convert a zero-based daemon index to its name: `a`..`z`, `aa`, `ab`, ...
pub fn index_to_name(index: u32) -> String {
    let mut name = Vec::new();
    let mut n = u64::from(index) + 1;
    while n > 0 {
        n -= 1;
        name.push(b'a' + (n % 26) as u8);
        n /= 26;
    }
    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_version_gets_rook_repository() {
        assert_eq!(make_rook_image("v0.8.0"), "rook/rook:v0.8.0");
    }

    #[test]
    fn full_image_reference_is_kept() {
        assert_eq!(
            make_rook_image("registry.local/rook/rook:v0.8.0"),
            "registry.local/rook/rook:v0.8.0"
        );
        assert_eq!(make_rook_image("rook:dev"), "rook:dev");
    }

    #[test]
    fn pod_labels_include_role_and_id() {
        let labels = pod_labels("rook-ceph-mgr", "rook-ceph", "mgr", "a");

        assert_eq!(labels.len(), 4);
        assert_eq!(labels.get(LABEL_APP), Some(&"rook-ceph-mgr".to_string()));
        assert_eq!(labels.get(LABEL_CLUSTER), Some(&"rook-ceph".to_string()));
        assert_eq!(labels.get(LABEL_DAEMON_TYPE), Some(&"mgr".to_string()));
        assert_eq!(labels.get("mgr"), Some(&"a".to_string()));
    }

    #[test]
    fn index_to_name_is_bijective_base26() {
        assert_eq!(index_to_name(0), "a");
        assert_eq!(index_to_name(1), "b");
        assert_eq!(index_to_name(25), "z");
        assert_eq!(index_to_name(26), "aa");
        assert_eq!(index_to_name(27), "ab");
        assert_eq!(index_to_name(701), "zz");
        assert_eq!(index_to_name(702), "aaa");
    }

    #[test]
    fn index_to_name_handles_largest_index() {
        let name = index_to_name(u32::MAX);
        assert_eq!(name.len(), 7);
        assert!(name.bytes().all(|b| b.is_ascii_lowercase()));
    }
}
