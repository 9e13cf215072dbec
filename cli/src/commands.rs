pub mod block;
pub mod show;
pub mod unblock;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use blackhole_common::config::{Config, DEFAULT_DEBUG_IMAGE, DEFAULT_DEBUG_PROGRAM, ExecConfig};
use blackhole_common::progress::{NoProgress, ProgressSink};
use blackhole_core::Orchestrator;
use blackhole_core::adapters::{DebugNodeExecutor, KubeConnector, SystemResolver};
use clap::{Args, Parser, Subcommand};

use crate::terminal::progress::SpanProgress;

#[derive(Parser)]
#[command(name = "kube-blackhole", version)]
#[command(about = "Simulate a network partition between clusters using blackhole routes.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Block access to a cluster from the target clusters
    #[command(alias = "b")]
    Block(ClusterArgs),
    /// Remove the blackhole routes added by block
    #[command(alias = "u")]
    Unblock(ClusterArgs),
    /// Show blackhole status of every target node
    #[command(alias = "s")]
    Show(ClusterArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ClusterArgs {
    /// Context of the cluster to make unreachable
    pub cluster: String,

    /// Contexts of the clusters losing access, comma separated
    #[arg(long, value_delimiter = ',', required = true)]
    pub contexts: Vec<String>,

    /// Kubeconfig holding every context (default: $KUBECONFIG, then ~/.kube/config)
    #[arg(long)]
    pub kubeconfig: Option<PathBuf>,

    /// Show a progress bar
    #[arg(long)]
    pub progress: bool,

    /// Log every remote command
    #[arg(short, long)]
    pub verbose: bool,

    /// Give up on a node after this many seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Image of the node debug pod
    #[arg(long, default_value = DEFAULT_DEBUG_IMAGE)]
    pub image: String,

    /// Path to the `oc` binary
    #[arg(long, default_value = DEFAULT_DEBUG_PROGRAM)]
    pub oc: String,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn args(&self) -> &ClusterArgs {
        match &self.command {
            Commands::Block(args) | Commands::Unblock(args) | Commands::Show(args) => args,
        }
    }
}

impl ClusterArgs {
    pub fn config(&self) -> anyhow::Result<Config> {
        let mut config = Config::new(
            self.kubeconfig.clone(),
            &self.cluster,
            self.contexts.clone(),
        );
        config.exec = ExecConfig {
            program: self.oc.clone(),
            image: self.image.clone(),
            timeout: self.timeout.map(Duration::from_secs),
        };
        Ok(config)
    }

    fn progress(&self) -> Arc<dyn ProgressSink> {
        if self.progress {
            Arc::new(SpanProgress::new())
        } else {
            Arc::new(NoProgress)
        }
    }
}

/// Validates the arguments, then connects to every cluster.
pub async fn connect(args: &ClusterArgs) -> anyhow::Result<Orchestrator> {
    let config = args.config()?;
    config.validate()?;

    let connector = KubeConnector::load(config.kubeconfig.as_deref())?;
    let executor = DebugNodeExecutor::new(config.kubeconfig.clone(), config.exec.clone());

    let orchestrator = Orchestrator::connect(
        &config,
        &connector,
        Arc::new(SystemResolver),
        Arc::new(executor),
        args.progress(),
    )
    .await?;

    Ok(orchestrator)
}
