//! Shared types for kubeinspect
//!
//! This crate contains the data structures passed between the cluster client,
//! the reporting core and the terminal UI.

mod error;

pub use error::{InspectError, Result};

use chrono::{DateTime, Utc};
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shown in place of a request or limit that the container does not declare
pub const NOT_SET: &str = "None";

/// Shown when a workload has no progressing condition to take a timestamp from
pub const NOT_AVAILABLE: &str = "N/A";

// ============================================================================
// Cluster Types
// ============================================================================

/// Kubernetes context information
#[derive(Clone, Debug)]
pub struct ContextInfo {
    pub name: String,
    pub cluster: String,
    pub user: String,
    pub namespace: Option<String>,
    pub is_current: bool,
}

impl ContextInfo {
    pub fn new(
        name: String,
        cluster: String,
        user: String,
        namespace: Option<String>,
        is_current: bool,
    ) -> Self {
        Self {
            name,
            cluster,
            user,
            namespace,
            is_current,
        }
    }
}

/// Namespace information
#[derive(Clone, Debug, Serialize)]
pub struct NamespaceInfo {
    pub name: String,
    pub status: String,
}

impl NamespaceInfo {
    pub fn new(name: String, status: String) -> Self {
        Self { name, status }
    }
}

/// The workload types kubeinspect reports on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum WorkloadKind {
    Deployment,
    StatefulSet,
}

impl WorkloadKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deployment => "Deployment",
            Self::StatefulSet => "StatefulSet",
        }
    }
}

impl fmt::Display for WorkloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Resource Rows
// ============================================================================

/// Which side of a container's resource requirements a row describes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Requests,
    Limits,
}

impl ResourceKind {
    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Requests => "Requests",
            Self::Limits => "Limits",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Declared CPU and memory for one container and one resource kind.
///
/// Values are the raw cluster strings (`"250m"`, `"512Mi"`), or [`NOT_SET`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ContainerResourceRow {
    pub container: String,
    pub kind: ResourceKind,
    pub cpu: String,
    pub memory: String,
}

/// A [`ContainerResourceRow`] tagged with the workload it came from
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WorkloadResourceRow {
    pub workload_kind: WorkloadKind,
    pub workload: String,
    #[serde(flatten)]
    pub row: ContainerResourceRow,
}

// ============================================================================
// Workload Summaries
// ============================================================================

/// Images used by a workload's pod template and when it last progressed
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ImageSummary {
    pub images: Vec<String>,
    pub last_update_time: Option<DateTime<Utc>>,
}

impl ImageSummary {
    /// Timestamp for display, [`NOT_AVAILABLE`] when unknown
    pub fn last_update_display(&self) -> String {
        format_timestamp(self.last_update_time)
    }
}

/// Desired and ready replica counts.
///
/// `ready` is `None` while the cluster has not reported it yet, which is not the
/// same thing as zero ready replicas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ReplicaSummary {
    pub desired: i32,
    pub ready: Option<i32>,
}

impl ReplicaSummary {
    pub fn ready_display(&self) -> String {
        self.ready
            .map(|r| r.to_string())
            .unwrap_or_else(|| NOT_SET.to_string())
    }

    /// All desired replicas are reported ready
    pub fn is_healthy(&self) -> bool {
        self.desired > 0 && self.ready == Some(self.desired)
    }
}

/// Everything the reports need to know about one workload
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WorkloadSummary {
    pub kind: WorkloadKind,
    pub name: String,
    pub namespace: String,
    pub images: Vec<String>,
    pub last_update_time: Option<DateTime<Utc>>,
    pub desired_replicas: i32,
    pub ready_replicas: Option<i32>,
    /// Label selector resolving the workload's pods
    pub selector: String,
}

impl WorkloadSummary {
    pub fn replicas(&self) -> ReplicaSummary {
        ReplicaSummary {
            desired: self.desired_replicas,
            ready: self.ready_replicas,
        }
    }

    pub fn last_update_display(&self) -> String {
        format_timestamp(self.last_update_time)
    }
}

fn format_timestamp(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

// ============================================================================
// Metrics
// ============================================================================

/// Current usage of one container as reported by the metrics API
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContainerUsage {
    pub name: String,
    pub cpu: String,
    pub memory: String,
}

impl ContainerUsage {
    pub fn new(name: impl Into<String>, cpu: impl Into<String>, memory: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cpu: cpu.into(),
            memory: memory.into(),
        }
    }
}

/// Usage of a pod summed across its non-sidecar containers
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PodMetricSample {
    pub pod: String,
    pub cpu_cores: f64,
    pub memory_mb: u64,
}

// ============================================================================
// Log Types
// ============================================================================

/// Log severity level
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
    #[default]
    Unknown,
}

impl LogLevel {
    /// Parse a level name in any of the usual spellings
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "trace" | "trc" => Self::Trace,
            "debug" | "dbg" => Self::Debug,
            "info" | "inf" | "information" => Self::Info,
            "warn" | "warning" | "wrn" => Self::Warn,
            "error" | "err" => Self::Error,
            "fatal" | "panic" | "critical" | "crit" => Self::Fatal,
            _ => Self::Unknown,
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Self::Trace => Color::DarkGray,
            Self::Debug => Color::Cyan,
            Self::Info => Color::Green,
            Self::Warn => Color::Yellow,
            Self::Error => Color::Red,
            Self::Fatal => Color::Magenta,
            Self::Unknown => Color::White,
        }
    }

    /// Short display string (3 chars)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "TRC",
            Self::Debug => "DBG",
            Self::Info => "INF",
            Self::Warn => "WRN",
            Self::Error => "ERR",
            Self::Fatal => "FTL",
            Self::Unknown => "???",
        }
    }
}

/// A single line fetched from a container's log
#[derive(Clone, Debug)]
pub struct LogLine {
    pub pod: String,
    pub container: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub level: LogLevel,
    /// Line content with the API timestamp prefix removed
    pub message: String,
}

impl LogLine {
    pub fn new(pod: String, container: String, message: String) -> Self {
        Self {
            pod,
            container,
            timestamp: None,
            level: LogLevel::Unknown,
            message,
        }
    }
}
