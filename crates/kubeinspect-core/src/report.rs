use std::fmt;

use kubeinspect_types::{PodMetricSample, WorkloadResourceRow, WorkloadSummary};

/// The table reports kubeinspect can produce for a namespace
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReportKind {
    Images,
    Resources,
    Replicas,
    Metrics,
}

impl ReportKind {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Images => "Container Images",
            Self::Resources => "Resource Requests & Limits",
            Self::Replicas => "Replica Counts",
            Self::Metrics => "Pod Metrics",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// A rendered table: headers plus rows of cells, numbered from 1
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Report {
    fn new<I, R>(title: String, headers: &[&str], rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = String>,
    {
        let mut all_headers = vec!["#".to_string()];
        all_headers.extend(headers.iter().map(|h| h.to_string()));

        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(i, cells)| {
                let mut row = vec![(i + 1).to_string()];
                row.extend(cells);
                row
            })
            .collect();

        Self {
            title,
            headers: all_headers,
            rows,
        }
    }

    /// Images and last update time per workload
    pub fn images(namespace: &str, workloads: &[WorkloadSummary]) -> Self {
        Self::new(
            format!("{} in {}", ReportKind::Images, namespace),
            &["Type", "Name", "Image Used", "Last Update Time"],
            workloads.iter().map(|w| {
                [
                    w.kind.to_string(),
                    w.name.clone(),
                    w.images.join(",\n"),
                    w.last_update_display(),
                ]
            }),
        )
    }

    /// Declared requests and limits per container
    pub fn resources(namespace: &str, rows: &[WorkloadResourceRow]) -> Self {
        Self::new(
            format!("{} in {}", ReportKind::Resources, namespace),
            &["Workload", "Container Name", "Resource Type", "CPU", "Memory"],
            rows.iter().map(|r| {
                [
                    format!("{}/{}", r.workload_kind, r.workload),
                    r.row.container.clone(),
                    r.row.kind.to_string(),
                    r.row.cpu.clone(),
                    r.row.memory.clone(),
                ]
            }),
        )
    }

    /// Desired against ready replicas per workload
    pub fn replicas(namespace: &str, workloads: &[WorkloadSummary]) -> Self {
        Self::new(
            format!("{} in {}", ReportKind::Replicas, namespace),
            &["Type", "Name", "Namespace", "Replicas Set", "Replicas Ready"],
            workloads.iter().map(|w| {
                [
                    w.kind.to_string(),
                    w.name.clone(),
                    w.namespace.clone(),
                    w.desired_replicas.to_string(),
                    w.replicas().ready_display(),
                ]
            }),
        )
    }

    /// Current usage per pod
    pub fn metrics(namespace: &str, samples: &[PodMetricSample]) -> Self {
        Self::new(
            format!("{} in {}", ReportKind::Metrics, namespace),
            &["Pod", "CPU (cores)", "Memory (MB)"],
            samples.iter().map(|s| {
                [
                    s.pod.clone(),
                    format!("{:.3}", s.cpu_cores),
                    s.memory_mb.to_string(),
                ]
            }),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Widest cell per column, counting each line of multi-line cells separately
    pub fn column_widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(col, header)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(col))
                    .flat_map(|cell| cell.lines())
                    .map(|line| line.chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }
}
