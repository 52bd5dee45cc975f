//! Render manager Deployments for a CephCluster
//!
//! Reads a CephCluster resource as JSON and prints one Deployment per
//! configured manager daemon to stdout. Logs go to stderr.

use std::path::PathBuf;

use anyhow::Context;
use ceph_common::telemetry::{init_tracing, LogFormat, TelemetryConfig};
use ceph_mgr::render::{parse_cluster, render_crd, render_deployments};
use clap::Parser;

/// Render Ceph manager Deployments from a CephCluster resource
#[derive(Parser, Debug)]
#[command(name = "ceph-mgr-render", version, about, long_about = None)]
struct Cli {
    /// Print the CephCluster CRD and exit
    #[arg(long)]
    crd: bool,

    /// Path to the CephCluster resource (JSON)
    #[arg(long, env = "CEPH_CLUSTER_FILE", required_unless_present = "crd")]
    cluster: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(TelemetryConfig {
        format: if cli.log_json {
            LogFormat::Json
        } else {
            LogFormat::Text
        },
        ..Default::default()
    })?;

    if cli.crd {
        println!("{}", render_crd()?);
        return Ok(());
    }

    let path = cli
        .cluster
        .context("--cluster is required unless --crd is given")?;
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let cluster = parse_cluster(&raw)
        .with_context(|| format!("failed to parse CephCluster from {}", path.display()))?;

    for deployment in render_deployments(&cluster)? {
        println!("{}", serde_json::to_string_pretty(&deployment)?);
    }

    Ok(())
}
