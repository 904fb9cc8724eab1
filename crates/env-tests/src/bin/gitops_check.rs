//! gitops-check - run the verification suites once against a cluster.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_tests::cluster::ClusterConnection;
use env_tests::config::HarnessConfig;
use env_tests::fixtures::ResponderClient;
use env_tests::manifests::ManifestSet;
use env_tests::plan::VerificationPlan;
use env_tests::suites::{GitOpsSuite, GroupStatus, ProvisioningSuite};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Verify the GitOps demo deployment on a Kubernetes cluster.
#[derive(Parser)]
#[command(name = "gitops-check")]
#[command(about = "Cluster and endpoint checks for the GitOps demo")]
#[command(version)]
struct Cli {
    /// Kubeconfig context of the target cluster (defaults to the current context)
    #[arg(long, env = "GITOPS_CONTEXT", global = true)]
    context: Option<String>,

    /// host:port of the deployed responder
    #[arg(long, env = "GITOPS_ENDPOINT", global = true)]
    endpoint: Option<String>,

    /// Directory holding namespace/deployment/service/ingress manifests
    #[arg(long, env = "GITOPS_MANIFEST_DIR", global = true)]
    manifests: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply the fixture manifests, read each back, then delete the namespace
    Provision {
        /// Leave test-namespace in place instead of tearing it down
        #[arg(long)]
        keep: bool,
    },

    /// Read-only checks of resources applied by the GitOps controller
    Verify,

    /// HTTP checks against the deployed responder
    E2e,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "env_tests=info".into()))
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = HarnessConfig::new(cli.endpoint, cli.context);

    let result = match cli.command {
        Commands::Provision { keep } => provision(&config, cli.manifests, keep).await,
        Commands::Verify => verify(&config).await,
        Commands::E2e => end_to_end(&config).await,
    };

    if let Err(e) = &result {
        error!("Check failed: {:#}", e);
    }
    result
}

async fn provision(config: &HarnessConfig, manifests: Option<PathBuf>, keep: bool) -> Result<()> {
    let cluster = ClusterConnection::connect(config).await?;
    let manifests = manifests
        .map(ManifestSet::from_dir)
        .unwrap_or_default();
    let suite = ProvisioningSuite::new(cluster, manifests);

    let applied = if keep {
        let applied = suite.apply_all().await;
        info!("Leaving test-namespace in place (--keep)");
        applied
    } else {
        suite.apply_and_teardown().await
    };

    let applied = applied.context("Provisioning failed")?;
    info!(resources = applied.len(), "Provisioning checks passed");
    Ok(())
}

async fn verify(config: &HarnessConfig) -> Result<()> {
    let cluster = ClusterConnection::connect(config).await?;
    let plan = VerificationPlan::gitops(config);

    let report = GitOpsSuite::new(cluster).run(&plan).await;

    for group in &report.groups {
        match &group.status {
            GroupStatus::Passed { checked } => info!(group = %group.name, checked, "passed"),
            GroupStatus::Failed { resource, error } => {
                error!(group = %group.name, %resource, %error, "failed")
            }
            GroupStatus::Skipped { reason } => info!(group = %group.name, %reason, "skipped"),
        }
    }

    report
        .ensure_passed()
        .context("GitOps verification failed")?;
    info!(checked = report.checked(), "GitOps checks passed");
    Ok(())
}

async fn end_to_end(config: &HarnessConfig) -> Result<()> {
    let client = ResponderClient::new(config.endpoint()?);

    client.check_index().await?;
    let identity = client.check_cluster().await?;

    info!(
        service = %identity.name,
        cluster = %identity.cluster,
        "End-to-end checks passed"
    );
    Ok(())
}
