//! Kubernetes client for kubeinspect

use anyhow::{Context, Result};
use k8s_openapi::api::apps::v1::{Deployment, StatefulSet};
use k8s_openapi::api::core::v1::{Namespace, Pod};
use kube::Api;
use kube::api::{ListParams, LogParams};
use kube::config::{KubeConfigOptions, Kubeconfig};

use kubeinspect_core::{ResourceAggregator, Workload, derive_label_selector};
use kubeinspect_logs::LogParser;
use kubeinspect_types::{
    ContextInfo, LogLine, NamespaceInfo, PodMetricSample, WorkloadResourceRow, WorkloadSummary,
};

use crate::metrics::PodMetrics;

/// Kubernetes client wrapper
pub struct KubeClient {
    kubeconfig: Kubeconfig,
    current_context: Option<String>,
}

impl KubeClient {
    /// Create a new KubeClient by loading the kubeconfig
    pub fn new() -> Result<Self> {
        let kubeconfig =
            Kubeconfig::read().context("Failed to read kubeconfig. Is kubectl configured?")?;

        let current_context = kubeconfig.current_context.clone();

        Ok(Self {
            kubeconfig,
            current_context,
        })
    }

    /// Get all available contexts from kubeconfig
    pub fn get_contexts(&self) -> Vec<ContextInfo> {
        self.kubeconfig
            .contexts
            .iter()
            .map(|ctx| {
                let context = ctx.context.as_ref();
                ContextInfo::new(
                    ctx.name.clone(),
                    context.map(|c| c.cluster.clone()).unwrap_or_default(),
                    context.and_then(|c| c.user.clone()).unwrap_or_default(),
                    context.and_then(|c| c.namespace.clone()),
                    Some(&ctx.name) == self.current_context.as_ref(),
                )
            })
            .collect()
    }

    /// Get the current context name
    pub fn current_context(&self) -> Option<&str> {
        self.current_context.as_deref()
    }

    /// Create a kube::Client for a specific context
    pub async fn client_for_context(&self, context_name: &str) -> Result<kube::Client> {
        tracing::debug!(context = context_name, "connecting");

        let config = kube::Config::from_custom_kubeconfig(
            self.kubeconfig.clone(),
            &KubeConfigOptions {
                context: Some(context_name.to_string()),
                ..Default::default()
            },
        )
        .await
        .context(format!(
            "Failed to create config for context: {}",
            context_name
        ))?;

        kube::Client::try_from(config).context(format!(
            "Failed to create client for context: {}",
            context_name
        ))
    }

    /// Fetch all namespaces from the cluster
    pub async fn get_namespaces(&self, client: &kube::Client) -> Result<Vec<NamespaceInfo>> {
        let namespaces: Api<Namespace> = Api::all(client.clone());
        let list = namespaces
            .list(&ListParams::default())
            .await
            .context("Failed to list namespaces")?;

        Ok(list
            .items
            .into_iter()
            .map(|ns| {
                let name = ns.metadata.name.unwrap_or_default();
                let status = ns
                    .status
                    .and_then(|s| s.phase)
                    .unwrap_or_else(|| "Unknown".to_string());
                NamespaceInfo::new(name, status)
            })
            .collect())
    }

    /// Fetch all deployments and stateful sets in a namespace
    pub async fn get_workloads(&self, client: &kube::Client, namespace: &str) -> Result<Workloads> {
        let deployments: Api<Deployment> = Api::namespaced(client.clone(), namespace);
        let deployments = deployments
            .list(&ListParams::default())
            .await
            .context(format!("Failed to list deployments in {}", namespace))?
            .items;

        let statefulsets: Api<StatefulSet> = Api::namespaced(client.clone(), namespace);
        let statefulsets = statefulsets
            .list(&ListParams::default())
            .await
            .context(format!("Failed to list stateful sets in {}", namespace))?
            .items;

        tracing::debug!(
            namespace,
            deployments = deployments.len(),
            statefulsets = statefulsets.len(),
            "listed workloads"
        );

        Ok(Workloads {
            namespace: namespace.to_string(),
            deployments,
            statefulsets,
        })
    }

    /// Fetch current usage of every pod in a namespace from the metrics server
    pub async fn get_pod_metrics(
        &self,
        client: &kube::Client,
        namespace: &str,
    ) -> Result<Vec<PodMetrics>> {
        let metrics: Api<PodMetrics> = Api::namespaced(client.clone(), namespace);
        let list = metrics.list(&ListParams::default()).await.context(format!(
            "Failed to fetch pod metrics in {} (is metrics-server installed?)",
            namespace
        ))?;

        Ok(list.items)
    }

    /// Fetch the last `tail_lines` lines of every non-sidecar container in the
    /// pods matching `selector`, merged in timestamp order.
    pub async fn get_logs(
        &self,
        client: &kube::Client,
        namespace: &str,
        selector: &str,
        tail_lines: i64,
        aggregator: &ResourceAggregator,
    ) -> Result<Vec<LogLine>> {
        // An empty selector would match every pod in the namespace
        if selector.is_empty() {
            anyhow::bail!("Refusing to fetch logs with an empty label selector");
        }

        let pods: Api<Pod> = Api::namespaced(client.clone(), namespace);

        let list = pods
            .list(&ListParams::default().labels(selector))
            .await
            .context(format!("Failed to list pods matching '{}'", selector))?;

        let mut lines = Vec::new();

        for pod in list.items {
            let pod_name = pod.metadata.name.clone().unwrap_or_default();
            let containers = pod
                .spec
                .iter()
                .flat_map(|s| s.containers.iter())
                .map(|c| c.name.clone())
                .filter(|name| !aggregator.is_sidecar(name));

            for container in containers {
                let params = LogParams {
                    container: Some(container.clone()),
                    tail_lines: Some(tail_lines),
                    timestamps: true,
                    ..Default::default()
                };

                match pods.logs(&pod_name, &params).await {
                    Ok(text) => {
                        lines.extend(
                            text.lines()
                                .map(|raw| LogParser::parse(raw, &pod_name, &container)),
                        );
                    }
                    Err(e) => {
                        // Pods still starting have no log yet
                        tracing::warn!(pod = %pod_name, %container, error = %e, "failed to fetch logs");
                    }
                }
            }
        }

        // Stable sort keeps per-container order for lines without a timestamp
        lines.sort_by_key(|l| l.timestamp);

        Ok(lines)
    }
}

/// The deployments and stateful sets of one namespace
#[derive(Clone, Debug, Default)]
pub struct Workloads {
    pub namespace: String,
    pub deployments: Vec<Deployment>,
    pub statefulsets: Vec<StatefulSet>,
}

impl Workloads {
    /// Summaries of every workload, deployments first; malformed ones are skipped
    pub fn summaries(&self) -> Vec<WorkloadSummary> {
        let deployments = self.deployments.iter().filter_map(summarize_or_skip);
        let statefulsets = self.statefulsets.iter().filter_map(summarize_or_skip);
        deployments.chain(statefulsets).collect()
    }

    /// Resource rows of every workload, deployments first; malformed ones are skipped
    pub fn resource_rows(&self, aggregator: &ResourceAggregator) -> Vec<WorkloadResourceRow> {
        let mut rows = Vec::new();
        for deploy in &self.deployments {
            rows.extend(rows_or_skip(aggregator, deploy));
        }
        for sts in &self.statefulsets {
            rows.extend(rows_or_skip(aggregator, sts));
        }
        rows
    }

    /// Selector of the named workload
    pub fn selector_for(&self, name: &str) -> Option<kubeinspect_types::Result<String>> {
        if let Some(deploy) = self.deployments.iter().find(|d| d.name() == name) {
            return Some(derive_label_selector(deploy));
        }
        self.statefulsets
            .iter()
            .find(|s| s.name() == name)
            .map(derive_label_selector)
    }
}

fn summarize_or_skip<W: Workload>(workload: &W) -> Option<WorkloadSummary> {
    kubeinspect_core::summarize_workload(workload)
        .inspect_err(|e| tracing::warn!(error = %e, "skipping workload"))
        .ok()
}

fn rows_or_skip<W: Workload>(aggregator: &ResourceAggregator, workload: &W) -> Vec<WorkloadResourceRow> {
    aggregator
        .aggregate_workload_resources(workload)
        .inspect_err(|e| tracing::warn!(error = %e, "skipping workload"))
        .unwrap_or_default()
}

/// Aggregate metrics samples, skipping pods with malformed quantities
pub fn metric_samples(metrics: &[PodMetrics], aggregator: &ResourceAggregator) -> Vec<PodMetricSample> {
    metrics
        .iter()
        .filter_map(|m| {
            aggregator
                .aggregate_pod_metrics(m.pod_name(), &m.container_usage())
                .inspect_err(|e| tracing::warn!(pod = m.pod_name(), error = %e, "skipping pod"))
                .ok()
        })
        .collect()
}
