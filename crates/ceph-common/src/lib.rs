//! Common types for Ceph daemon workloads: CRDs, errors, and collaborators
//!
//! Daemon-specific crates (e.g. `ceph-mgr`) compose the value types and
//! helpers in this crate into complete Kubernetes manifests.

#![deny(missing_docs)]

pub mod crd;
pub mod daemon;
pub mod error;
pub mod k8s;
pub mod kube_utils;
pub mod mon;
pub mod placement;
pub mod telemetry;

pub use error::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Label key identifying the application a pod belongs to
pub const LABEL_APP: &str = "app";

/// Label key identifying the cluster (namespace) a daemon belongs to
pub const LABEL_CLUSTER: &str = "rook_cluster";

/// Label key identifying the daemon role (mgr, mon, osd, ...)
pub const LABEL_DAEMON_TYPE: &str = "ceph_daemon_type";

/// Legacy label key carrying the daemon name, kept for older selectors
pub const LABEL_INSTANCE: &str = "instance";

/// Directory on every daemon pod holding rook and ceph state
pub const DATA_DIR: &str = "/var/lib/rook";
