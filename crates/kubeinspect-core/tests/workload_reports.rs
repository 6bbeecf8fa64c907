use k8s_openapi::api::apps::v1::{Deployment, StatefulSet};
use serde_json::json;

use kubeinspect_core::{
    AggregatorConfig, Report, ResourceAggregator, derive_image_summary, derive_label_selector,
    derive_replica_summary, summarize_workload,
};
use kubeinspect_types::{ContainerUsage, ResourceKind, WorkloadKind};

fn deployment() -> Deployment {
    serde_json::from_value(json!({
        "apiVersion": "apps/v1",
        "kind": "Deployment",
        "metadata": { "name": "checkout", "namespace": "shop" },
        "spec": {
            "replicas": 3,
            "selector": { "matchLabels": { "app": "checkout", "team": "payments" } },
            "template": {
                "metadata": { "labels": { "app": "checkout", "team": "payments" } },
                "spec": {
                    "containers": [
                        {
                            "name": "app",
                            "image": "registry.local/checkout:1.4.2",
                            "resources": {
                                "requests": { "cpu": "100m", "memory": "128Mi" },
                                "limits": { "cpu": "500m", "memory": "256Mi" }
                            }
                        },
                        {
                            "name": "istio-proxy",
                            "image": "istio/proxyv2:1.20",
                            "resources": { "requests": { "cpu": "10m" } }
                        }
                    ]
                }
            }
        },
        "status": {
            "conditions": [
                {
                    "type": "Available",
                    "status": "True",
                    "lastUpdateTime": "2024-04-01T09:00:00Z"
                },
                {
                    "type": "Progressing",
                    "status": "True",
                    "lastUpdateTime": "2024-04-02T10:30:00Z",
                    "lastTransitionTime": "2024-03-30T08:00:00Z"
                }
            ]
        }
    }))
    .expect("valid deployment")
}

fn statefulset() -> StatefulSet {
    serde_json::from_value(json!({
        "apiVersion": "apps/v1",
        "kind": "StatefulSet",
        "metadata": { "name": "orders-db", "namespace": "shop" },
        "spec": {
            "replicas": 2,
            "serviceName": "orders-db",
            "selector": { "matchLabels": { "app": "orders-db" } },
            "template": {
                "metadata": { "labels": { "app": "orders-db" } },
                "spec": {
                    "containers": [
                        { "name": "postgres", "image": "postgres:16" },
                        { "name": "exporter", "image": "prom/postgres-exporter:0.15" }
                    ]
                }
            }
        },
        "status": { "replicas": 2, "readyReplicas": 1 }
    }))
    .expect("valid statefulset")
}

#[test]
fn deployment_summary_from_api_json() {
    let deploy = deployment();

    let images = derive_image_summary(&deploy).unwrap();
    assert_eq!(
        images.images,
        vec!["registry.local/checkout:1.4.2", "istio/proxyv2:1.20"]
    );
    assert_eq!(
        images.last_update_display(),
        "2024-04-02 10:30:00 UTC"
    );

    assert_eq!(derive_label_selector(&deploy).unwrap(), "app=checkout,team=payments");

    let replicas = derive_replica_summary(&deploy).unwrap();
    assert_eq!(replicas.desired, 3);
    assert_eq!(replicas.ready, None);
}

#[test]
fn statefulset_containers_are_listed_once() {
    let sts = statefulset();

    let rows = ResourceAggregator::default()
        .aggregate_workload_resources(&sts)
        .unwrap();

    // Two containers, one requests row and one limits row each
    assert_eq!(rows.len(), 4);
    assert!(rows.iter().all(|r| r.workload_kind == WorkloadKind::StatefulSet));
    assert_eq!(rows[0].row.container, "postgres");
    assert_eq!(rows[0].row.kind, ResourceKind::Requests);
    assert_eq!(rows[1].row.kind, ResourceKind::Limits);
    assert_eq!(rows[2].row.container, "exporter");
    assert!(rows.iter().all(|r| r.row.cpu == "None" && r.row.memory == "None"));
}

#[test]
fn namespace_reports_cover_both_workload_kinds() {
    let deploy = deployment();
    let sts = statefulset();

    let summaries = vec![
        summarize_workload(&deploy).unwrap(),
        summarize_workload(&sts).unwrap(),
    ];

    let replicas = Report::replicas("shop", &summaries);
    assert_eq!(
        replicas.rows,
        vec![
            vec!["1", "Deployment", "checkout", "shop", "3", "None"],
            vec!["2", "StatefulSet", "orders-db", "shop", "2", "1"],
        ]
    );

    let images = Report::images("shop", &summaries);
    assert_eq!(images.rows[1][4], "N/A");

    let aggregator = ResourceAggregator::new(AggregatorConfig::default());
    let mut resource_rows = aggregator.aggregate_workload_resources(&deploy).unwrap();
    resource_rows.extend(aggregator.aggregate_workload_resources(&sts).unwrap());
    let resources = Report::resources("shop", &resource_rows);
    assert_eq!(resources.rows.len(), 8);
    assert_eq!(
        resources.rows[3],
        vec!["4", "Deployment/checkout", "istio-proxy", "Limits", "None", "None"]
    );
}

#[test]
fn pod_metrics_exclude_mesh_sidecar() {
    let usage = vec![
        ContainerUsage::new("app", "100m", "128Mi"),
        ContainerUsage::new("istio-proxy", "50m", "64Mi"),
    ];

    let sample = ResourceAggregator::default()
        .aggregate_pod_metrics("checkout-7d9f-abcde", &usage)
        .unwrap();

    assert!((sample.cpu_cores - 0.10).abs() < 1e-9);
    assert_eq!(sample.memory_mb, 128);

    let report = Report::metrics("shop", &[sample]);
    assert_eq!(report.rows[0], vec!["1", "checkout-7d9f-abcde", "0.100", "128"]);
}
