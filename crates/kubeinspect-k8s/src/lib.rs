//! Kubernetes client for kubeinspect
//!
//! This crate provides Kubernetes API integration for fetching contexts,
//! namespaces, workloads, pod metrics and pod logs.

mod client;
mod metrics;

pub use client::{KubeClient, Workloads, metric_samples};
pub use metrics::{PodMetrics, PodMetricsContainer, Usage};

// Re-export types that are used in our public API
pub use kubeinspect_types::{ContextInfo, LogLine, NamespaceInfo, PodMetricSample};
