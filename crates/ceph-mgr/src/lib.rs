//! Deployment synthesis for the Ceph manager daemon
//!
//! Builds the Deployment that runs one `ceph-mgr` instance: a `config-init`
//! container writes the daemon's config and keyring, then the long-running
//! `mgr` container starts against the default config paths.
//!
//! # Usage
//!
//! ```rust,ignore
//! let identity = DaemonIdentity::for_index(0);
//! let ctx = ClusterContext::from_cluster(&cluster)?;
//! let registrar = ClusterOwnerRegistrar::namespaced(&ctx.namespace);
//! let deployment = MgrCompiler::new(&identity, &ctx).assemble(&registrar)?;
//! ```

mod compiler;
pub mod config;
pub mod container;
pub mod labels;
pub mod render;
pub mod workload;

pub use compiler::{assemble_manifest, build_manifest, MgrCompiler};
pub use config::{ClusterContext, DaemonIdentity};
pub use workload::{Deployment, DeploymentSpec};

/// Application name shared by all manager pods
pub const APP_NAME: &str = "rook-ceph-mgr";

/// Daemon role
pub const DAEMON_TYPE: &str = "mgr";

/// Port the manager daemon binds for cluster RPC
pub const MGR_PORT: u16 = 6800;

/// Port of the prometheus metrics module
pub const METRICS_PORT: u16 = 9283;

/// Port of the web dashboard module
pub const DASHBOARD_PORT: u16 = 7000;
