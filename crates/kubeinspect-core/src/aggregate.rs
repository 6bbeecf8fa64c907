use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::Container;
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;

use kubeinspect_types::{
    ContainerResourceRow, ContainerUsage, InspectError, NOT_SET, PodMetricSample, ResourceKind,
    Result, WorkloadResourceRow,
};

use crate::inspect::{Workload, workload_containers};
use crate::units::{cpu_to_cores, memory_to_megabytes};

/// Service-mesh proxies injected next to the application container
pub const DEFAULT_SIDECAR_PREFIX: &str = "istio";

/// Aggregator settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AggregatorConfig {
    /// Containers whose name starts with this are left out of metric sums.
    /// An empty prefix leaves nothing out.
    pub sidecar_prefix: String,

    /// Resource kinds to emit a row for, in output order
    pub resource_kinds: Vec<ResourceKind>,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            sidecar_prefix: DEFAULT_SIDECAR_PREFIX.to_string(),
            resource_kinds: vec![ResourceKind::Requests, ResourceKind::Limits],
        }
    }
}

/// Builds resource and metrics rows from container specs and usage samples
#[derive(Clone, Debug, Default)]
pub struct ResourceAggregator {
    config: AggregatorConfig,
}

impl ResourceAggregator {
    pub fn new(config: AggregatorConfig) -> Self {
        Self { config }
    }

    /// Whether a container is an injected sidecar
    pub fn is_sidecar(&self, container_name: &str) -> bool {
        !self.config.sidecar_prefix.is_empty()
            && container_name.starts_with(&self.config.sidecar_prefix)
    }

    /// One row per container and configured resource kind, in container order.
    ///
    /// Values are passed through as the cluster wrote them; absent entries
    /// become [`NOT_SET`].
    pub fn aggregate_container_resources(&self, containers: &[Container]) -> Vec<ContainerResourceRow> {
        let mut rows = Vec::with_capacity(containers.len() * self.config.resource_kinds.len());

        for container in containers {
            let resources = container.resources.as_ref();
            for kind in &self.config.resource_kinds {
                let values = resources.and_then(|r| match kind {
                    ResourceKind::Requests => r.requests.as_ref(),
                    ResourceKind::Limits => r.limits.as_ref(),
                });

                rows.push(ContainerResourceRow {
                    container: container.name.clone(),
                    kind: *kind,
                    cpu: quantity_or_not_set(values, "cpu"),
                    memory: quantity_or_not_set(values, "memory"),
                });
            }
        }

        rows
    }

    /// Resource rows for every container of a workload, tagged with the workload
    pub fn aggregate_workload_resources<W: Workload>(
        &self,
        workload: &W,
    ) -> Result<Vec<WorkloadResourceRow>> {
        let containers = workload_containers(workload)?;

        Ok(self
            .aggregate_container_resources(containers)
            .into_iter()
            .map(|row| WorkloadResourceRow {
                workload_kind: W::KIND,
                workload: workload.name().to_string(),
                row,
            })
            .collect())
    }

    /// Sum usage over a pod's containers, skipping sidecars.
    ///
    /// A pod with nothing left to sum yields zeros. Any malformed quantity on a
    /// counted container fails the whole sample.
    pub fn aggregate_pod_metrics(
        &self,
        pod: &str,
        containers: &[ContainerUsage],
    ) -> Result<PodMetricSample> {
        let mut cpu_cores = 0.0;
        let mut memory_mb: u64 = 0;

        for usage in containers.iter().filter(|c| !self.is_sidecar(&c.name)) {
            cpu_cores += cpu_to_cores(&usage.cpu)?;
            let megabytes = memory_to_megabytes(&usage.memory)?;
            memory_mb = memory_mb.checked_add(megabytes).ok_or_else(|| {
                InspectError::quantity(&usage.memory, "pod memory total overflows")
            })?;
        }

        Ok(PodMetricSample {
            pod: pod.to_string(),
            cpu_cores,
            memory_mb,
        })
    }
}

fn quantity_or_not_set(values: Option<&BTreeMap<String, Quantity>>, key: &str) -> String {
    values
        .and_then(|v| v.get(key))
        .map(|q| q.0.clone())
        .unwrap_or_else(|| NOT_SET.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::core::v1::ResourceRequirements;

    fn quantities(cpu: Option<&str>, memory: Option<&str>) -> BTreeMap<String, Quantity> {
        let mut map = BTreeMap::new();
        if let Some(cpu) = cpu {
            map.insert("cpu".to_string(), Quantity(cpu.to_string()));
        }
        if let Some(memory) = memory {
            map.insert("memory".to_string(), Quantity(memory.to_string()));
        }
        map
    }

    fn container(
        name: &str,
        requests: Option<BTreeMap<String, Quantity>>,
        limits: Option<BTreeMap<String, Quantity>>,
    ) -> Container {
        Container {
            name: name.to_string(),
            resources: Some(ResourceRequirements {
                requests,
                limits,
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_requests_then_limits_per_container() {
        let containers = vec![
            container(
                "app",
                Some(quantities(Some("100m"), Some("128Mi"))),
                Some(quantities(Some("500m"), Some("256Mi"))),
            ),
            container("worker", Some(quantities(Some("1"), None)), None),
        ];

        let rows = ResourceAggregator::default().aggregate_container_resources(&containers);

        let flat: Vec<(&str, ResourceKind, &str, &str)> = rows
            .iter()
            .map(|r| (r.container.as_str(), r.kind, r.cpu.as_str(), r.memory.as_str()))
            .collect();
        assert_eq!(
            flat,
            vec![
                ("app", ResourceKind::Requests, "100m", "128Mi"),
                ("app", ResourceKind::Limits, "500m", "256Mi"),
                ("worker", ResourceKind::Requests, "1", "None"),
                ("worker", ResourceKind::Limits, "None", "None"),
            ]
        );
    }

    #[test]
    fn test_container_without_resources_block() {
        let bare = Container {
            name: "bare".to_string(),
            ..Default::default()
        };

        let rows = ResourceAggregator::default().aggregate_container_resources(&[bare]);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.cpu == NOT_SET && r.memory == NOT_SET));
    }

    #[test]
    fn test_no_containers_is_empty() {
        let rows = ResourceAggregator::default().aggregate_container_resources(&[]);
        assert!(rows.is_empty());
    }

    #[test]
    fn test_configured_resource_kinds() {
        let aggregator = ResourceAggregator::new(AggregatorConfig {
            resource_kinds: vec![ResourceKind::Limits],
            ..Default::default()
        });
        let containers = vec![container(
            "app",
            Some(quantities(Some("100m"), None)),
            Some(quantities(Some("200m"), None)),
        )];

        let rows = aggregator.aggregate_container_resources(&containers);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind, ResourceKind::Limits);
        assert_eq!(rows[0].cpu, "200m");
    }

    #[test]
    fn test_pod_metrics_skip_sidecar() {
        let usage = vec![
            ContainerUsage::new("app", "100m", "128Mi"),
            ContainerUsage::new("istio-proxy", "50m", "64Mi"),
        ];

        let sample = ResourceAggregator::default()
            .aggregate_pod_metrics("web-0", &usage)
            .unwrap();

        assert_eq!(sample.pod, "web-0");
        assert!((sample.cpu_cores - 0.10).abs() < 1e-9);
        assert_eq!(sample.memory_mb, 128);
    }

    #[test]
    fn test_pod_metrics_sum_containers() {
        let usage = vec![
            ContainerUsage::new("app", "250000000n", "1Gi"),
            ContainerUsage::new("worker", "750m", "512Mi"),
        ];

        let sample = ResourceAggregator::default()
            .aggregate_pod_metrics("web-0", &usage)
            .unwrap();

        assert!((sample.cpu_cores - 1.0).abs() < 1e-9);
        assert_eq!(sample.memory_mb, 1536);
    }

    #[test]
    fn test_pod_metrics_only_sidecars_is_zero() {
        let usage = vec![ContainerUsage::new("istio-proxy", "50m", "64Mi")];

        let sample = ResourceAggregator::default()
            .aggregate_pod_metrics("web-0", &usage)
            .unwrap();

        assert_eq!(sample.cpu_cores, 0.0);
        assert_eq!(sample.memory_mb, 0);
    }

    #[test]
    fn test_pod_metrics_malformed_quantity() {
        let usage = vec![ContainerUsage::new("app", "lots", "128Mi")];
        assert!(
            ResourceAggregator::default()
                .aggregate_pod_metrics("web-0", &usage)
                .is_err()
        );
    }

    #[test]
    fn test_pod_metrics_memory_overflow() {
        // Each fits in u64 on its own; together they are 2^64 Mi
        let usage = vec![
            ContainerUsage::new("app", "100m", "8388608Ei"),
            ContainerUsage::new("worker", "100m", "8388608Ei"),
        ];

        let err = ResourceAggregator::default()
            .aggregate_pod_metrics("web-0", &usage)
            .unwrap_err();
        assert!(matches!(err, InspectError::MalformedQuantity { .. }));
    }

    #[test]
    fn test_malformed_sidecar_is_ignored() {
        let usage = vec![
            ContainerUsage::new("app", "100m", "128Mi"),
            ContainerUsage::new("istio-proxy", "garbage", "garbage"),
        ];
        assert!(
            ResourceAggregator::default()
                .aggregate_pod_metrics("web-0", &usage)
                .is_ok()
        );
    }

    #[test]
    fn test_custom_and_empty_sidecar_prefix() {
        let usage = vec![
            ContainerUsage::new("app", "100m", "128Mi"),
            ContainerUsage::new("linkerd-proxy", "50m", "64Mi"),
        ];

        let linkerd = ResourceAggregator::new(AggregatorConfig {
            sidecar_prefix: "linkerd".to_string(),
            ..Default::default()
        });
        assert_eq!(linkerd.aggregate_pod_metrics("p", &usage).unwrap().memory_mb, 128);

        let everything = ResourceAggregator::new(AggregatorConfig {
            sidecar_prefix: String::new(),
            ..Default::default()
        });
        assert_eq!(everything.aggregate_pod_metrics("p", &usage).unwrap().memory_mb, 192);
    }
}
