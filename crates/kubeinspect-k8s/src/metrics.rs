use kube::api::ObjectMeta;
use serde::{Deserialize, Serialize};

use kubeinspect_types::ContainerUsage;

// kubectl get --raw /apis/metrics.k8s.io/v1beta1/namespaces/<ns>/pods

/// CPU and memory usage as quantity strings
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    pub cpu: String,
    pub memory: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PodMetricsContainer {
    pub name: String,
    pub usage: Usage,
}

/// A pod's usage sample from the metrics server
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PodMetrics {
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub containers: Vec<PodMetricsContainer>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub window: Option<String>,
}

impl PodMetrics {
    pub fn pod_name(&self) -> &str {
        self.metadata.name.as_deref().unwrap_or_default()
    }

    /// Per-container usage in the shape the aggregator takes
    pub fn container_usage(&self) -> Vec<ContainerUsage> {
        self.containers
            .iter()
            .map(|c| ContainerUsage::new(&c.name, &c.usage.cpu, &c.usage.memory))
            .collect()
    }
}

// k8s-openapi has no bindings for the metrics API
impl k8s_openapi::Resource for PodMetrics {
    const GROUP: &'static str = "metrics.k8s.io";
    const KIND: &'static str = "PodMetrics";
    const VERSION: &'static str = "v1beta1";
    const API_VERSION: &'static str = "metrics.k8s.io/v1beta1";
    const URL_PATH_SEGMENT: &'static str = "pods";
    type Scope = k8s_openapi::NamespaceResourceScope;
}

impl k8s_openapi::Metadata for PodMetrics {
    type Ty = ObjectMeta;

    fn metadata(&self) -> &Self::Ty {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut Self::Ty {
        &mut self.metadata
    }
}
