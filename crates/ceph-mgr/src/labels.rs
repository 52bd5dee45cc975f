//! Pod labels for manager daemons

use std::collections::BTreeMap;

use ceph_common::daemon::pod_labels;
use ceph_common::LABEL_INSTANCE;

use crate::{APP_NAME, DAEMON_TYPE};

/// Labels for a manager pod.
///
/// The shared daemon label set plus `instance=<daemon_name>`, which older
/// selectors still match on. `instance` is written last so it holds the
/// daemon name whatever the base set contains.
pub fn compose_labels(namespace: &str, daemon_name: &str) -> BTreeMap<String, String> {
    let mut labels = pod_labels(APP_NAME, namespace, DAEMON_TYPE, daemon_name);
    labels.insert(LABEL_INSTANCE.to_string(), daemon_name.to_string());
    labels
}
