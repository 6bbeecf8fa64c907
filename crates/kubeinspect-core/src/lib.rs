//! Reporting core for kubeinspect
//!
//! Turns already-fetched workload and metrics objects into the rows shown in
//! reports: quantity conversion, resource aggregation, workload inspection and
//! table building. Nothing in here talks to the cluster.

mod aggregate;
mod inspect;
mod report;
mod units;

pub use aggregate::{AggregatorConfig, DEFAULT_SIDECAR_PREFIX, ResourceAggregator};
pub use inspect::{
    Workload, WorkloadCondition, derive_image_summary, derive_label_selector,
    derive_replica_summary, summarize_workload,
};
pub use report::{Report, ReportKind};
pub use units::{QuantityKind, ResourceQuantity, cpu_to_cores, memory_to_megabytes};

// Re-export types used in our public API
pub use kubeinspect_types::{InspectError, Result};
