use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use kubeinspect_core::{ReportKind, ResourceAggregator};
use kubeinspect_k8s::KubeClient;

mod config;
mod output;
mod reports;
mod shell;

use config::{Config, Overrides, Settings};
use output::OutputFormat;

/// Kubeinspect - images, resources, replicas, metrics and logs of Kubernetes workloads
#[derive(Parser, Debug)]
#[command(name = "kubeinspect")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Kubernetes context to use (defaults to the kubeconfig current context)
    #[arg(long, global = true, env = "KUBEINSPECT_CONTEXT")]
    context: Option<String>,

    /// Config file (defaults to ~/.config/kubeinspect/config.toml)
    #[arg(long, global = true, env = "KUBEINSPECT_CONFIG")]
    config: Option<PathBuf>,

    /// Containers starting with this prefix are left out of metrics and logs
    #[arg(long, global = true)]
    sidecar_prefix: Option<String>,

    /// Number of historical log lines to fetch per container
    #[arg(long, global = true)]
    tail_lines: Option<i64>,

    /// Output format for subcommands
    #[arg(long, short, global = true, value_enum)]
    output: Option<OutputFormat>,

    /// Log cluster calls to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Run once and print instead of starting the interactive shell
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List namespaces with their phase
    Namespaces,
    /// Container images and last update time per workload
    Images {
        #[arg(short, long)]
        namespace: String,
    },
    /// Declared requests and limits per container
    Resources {
        #[arg(short, long)]
        namespace: String,
    },
    /// Desired against ready replicas per workload
    Replicas {
        #[arg(short, long)]
        namespace: String,
    },
    /// Current CPU and memory per pod, sidecars excluded
    Metrics {
        #[arg(short, long)]
        namespace: String,
    },
    /// Recent log lines of a deployment or stateful set
    Logs {
        #[arg(short, long)]
        namespace: String,
        /// Workload name
        workload: String,
    },
}

impl Command {
    fn report_kind(&self) -> Option<(ReportKind, &str)> {
        match self {
            Self::Images { namespace } => Some((ReportKind::Images, namespace)),
            Self::Resources { namespace } => Some((ReportKind::Resources, namespace)),
            Self::Replicas { namespace } => Some((ReportKind::Replicas, namespace)),
            Self::Metrics { namespace } => Some((ReportKind::Metrics, namespace)),
            Self::Namespaces | Self::Logs { .. } => None,
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(args).await {
        output::print_error(&format!("Error: {:#}", e));
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let config = Config::load(args.config.as_deref())?;
    let settings = Settings::resolve(
        config,
        Overrides {
            sidecar_prefix: args.sidecar_prefix,
            tail_lines: args.tail_lines,
            output: args.output,
        },
    )?;
    tracing::debug!(?settings, "resolved settings");

    let kube = KubeClient::new()?;

    let Some(command) = args.command else {
        return shell::run(kube, args.context, settings).await;
    };

    let context = match args.context.as_deref().or(kube.current_context()) {
        Some(context) => context.to_string(),
        None => anyhow::bail!("No current context in kubeconfig; pass --context"),
    };
    if !kube.get_contexts().iter().any(|c| c.name == context) {
        anyhow::bail!("Context '{}' not found in kubeconfig", context);
    }

    let client = kube.client_for_context(&context).await?;
    let aggregator = ResourceAggregator::new(settings.aggregator);

    if settings.output == OutputFormat::Table {
        output::print_info(&format!("Context: {}", context));
    }

    if let Some((kind, namespace)) = command.report_kind() {
        let report = reports::build_report(&kube, &client, namespace, kind, &aggregator).await?;
        return output::print_report(&report, settings.output);
    }

    match command {
        Command::Namespaces => {
            let namespaces = kube.get_namespaces(&client).await?;
            output::print_namespaces(&namespaces, settings.output)
        }
        Command::Logs {
            namespace,
            workload,
        } => {
            let lines = reports::workload_logs(
                &kube,
                &client,
                &namespace,
                &workload,
                settings.tail_lines,
                &aggregator,
            )
            .await?;
            output::print_logs(&lines, settings.output)
        }
        _ => Ok(()),
    }
}
