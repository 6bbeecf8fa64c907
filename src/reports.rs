//! Cluster fetches behind each report and the log viewer

use anyhow::{Context, Result};

use kubeinspect_core::{Report, ReportKind, ResourceAggregator};
use kubeinspect_k8s::{KubeClient, metric_samples};
use kubeinspect_types::{LogLine, WorkloadSummary};

/// Fetch what `kind` needs from `namespace` and build the table
pub async fn build_report(
    kube: &KubeClient,
    client: &kube::Client,
    namespace: &str,
    kind: ReportKind,
    aggregator: &ResourceAggregator,
) -> Result<Report> {
    tracing::debug!(namespace, report = %kind, "building report");

    let report = match kind {
        ReportKind::Images => {
            let workloads = kube.get_workloads(client, namespace).await?;
            Report::images(namespace, &workloads.summaries())
        }
        ReportKind::Resources => {
            let workloads = kube.get_workloads(client, namespace).await?;
            Report::resources(namespace, &workloads.resource_rows(aggregator))
        }
        ReportKind::Replicas => {
            let workloads = kube.get_workloads(client, namespace).await?;
            Report::replicas(namespace, &workloads.summaries())
        }
        ReportKind::Metrics => {
            let metrics = kube.get_pod_metrics(client, namespace).await?;
            Report::metrics(namespace, &metric_samples(&metrics, aggregator))
        }
    };

    Ok(report)
}

pub async fn list_workloads(
    kube: &KubeClient,
    client: &kube::Client,
    namespace: &str,
) -> Result<Vec<WorkloadSummary>> {
    Ok(kube.get_workloads(client, namespace).await?.summaries())
}

/// Logs of the pods behind the named deployment or stateful set
pub async fn workload_logs(
    kube: &KubeClient,
    client: &kube::Client,
    namespace: &str,
    workload: &str,
    tail_lines: i64,
    aggregator: &ResourceAggregator,
) -> Result<Vec<LogLine>> {
    let workloads = kube.get_workloads(client, namespace).await?;
    let selector = workloads
        .selector_for(workload)
        .with_context(|| {
            format!(
                "No deployment or stateful set named '{}' in {}",
                workload, namespace
            )
        })??;

    kube.get_logs(client, namespace, &selector, tail_lines, aggregator)
        .await
}
