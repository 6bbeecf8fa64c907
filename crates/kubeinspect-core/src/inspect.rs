//! Attributes derived from Deployment and StatefulSet objects

use chrono::{DateTime, Utc};
use k8s_openapi::api::apps::v1::{Deployment, StatefulSet};
use k8s_openapi::api::core::v1::{Container, PodTemplateSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};

use kubeinspect_types::{
    ImageSummary, InspectError, ReplicaSummary, Result, WorkloadKind, WorkloadSummary,
};

const PROGRESSING: &str = "Progressing";

/// A status condition reduced to the fields the reports look at
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkloadCondition<'a> {
    pub type_: &'a str,
    pub status: &'a str,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Common view over the workload types kubeinspect reports on
pub trait Workload {
    const KIND: WorkloadKind;

    fn metadata(&self) -> &ObjectMeta;

    /// Pod template, `None` when the object has no spec
    fn pod_template(&self) -> Option<&PodTemplateSpec>;

    /// Selector, `None` when the object has no spec
    fn selector(&self) -> Option<&LabelSelector>;

    /// Desired replicas with the API default applied, `None` when the object has no spec
    fn desired_replicas(&self) -> Option<i32>;

    /// Ready replicas, `None` until the controller reports them
    fn ready_replicas(&self) -> Option<i32>;

    /// Status conditions in the order the API returned them
    fn conditions(&self) -> Vec<WorkloadCondition<'_>>;

    fn name(&self) -> &str {
        self.metadata().name.as_deref().unwrap_or_default()
    }

    fn namespace(&self) -> &str {
        self.metadata().namespace.as_deref().unwrap_or_default()
    }
}

impl Workload for Deployment {
    const KIND: WorkloadKind = WorkloadKind::Deployment;

    fn metadata(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn pod_template(&self) -> Option<&PodTemplateSpec> {
        self.spec.as_ref().map(|s| &s.template)
    }

    fn selector(&self) -> Option<&LabelSelector> {
        self.spec.as_ref().map(|s| &s.selector)
    }

    fn desired_replicas(&self) -> Option<i32> {
        self.spec.as_ref().map(|s| s.replicas.unwrap_or(1))
    }

    fn ready_replicas(&self) -> Option<i32> {
        self.status.as_ref().and_then(|s| s.ready_replicas)
    }

    fn conditions(&self) -> Vec<WorkloadCondition<'_>> {
        self.status
            .iter()
            .flat_map(|s| s.conditions.iter().flatten())
            .map(|c| WorkloadCondition {
                type_: &c.type_,
                status: &c.status,
                timestamp: c
                    .last_update_time
                    .as_ref()
                    .or(c.last_transition_time.as_ref())
                    .map(|t| t.0),
            })
            .collect()
    }
}

impl Workload for StatefulSet {
    const KIND: WorkloadKind = WorkloadKind::StatefulSet;

    fn metadata(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn pod_template(&self) -> Option<&PodTemplateSpec> {
        self.spec.as_ref().map(|s| &s.template)
    }

    fn selector(&self) -> Option<&LabelSelector> {
        self.spec.as_ref().map(|s| &s.selector)
    }

    fn desired_replicas(&self) -> Option<i32> {
        self.spec.as_ref().map(|s| s.replicas.unwrap_or(1))
    }

    fn ready_replicas(&self) -> Option<i32> {
        self.status.as_ref().and_then(|s| s.ready_replicas)
    }

    fn conditions(&self) -> Vec<WorkloadCondition<'_>> {
        // StatefulSet conditions only carry a transition time
        self.status
            .iter()
            .flat_map(|s| s.conditions.iter().flatten())
            .map(|c| WorkloadCondition {
                type_: &c.type_,
                status: &c.status,
                timestamp: c.last_transition_time.as_ref().map(|t| t.0),
            })
            .collect()
    }
}

fn malformed<W: Workload>(workload: &W, reason: &str) -> InspectError {
    InspectError::workload(W::KIND.as_str(), workload.name(), reason)
}

/// Containers of the workload's pod template.
///
/// Fails when the template is missing or declares no containers; the API never
/// admits such a workload.
pub(crate) fn workload_containers<W: Workload>(workload: &W) -> Result<&[Container]> {
    let template = workload
        .pod_template()
        .ok_or_else(|| malformed(workload, "object has no spec"))?;
    let spec = template
        .spec
        .as_ref()
        .ok_or_else(|| malformed(workload, "pod template has no spec"))?;

    if spec.containers.is_empty() {
        return Err(malformed(workload, "pod template declares no containers"));
    }

    Ok(&spec.containers)
}

/// Images of every container in declaration order, and the time of the first
/// `Progressing=True` condition.
pub fn derive_image_summary<W: Workload>(workload: &W) -> Result<ImageSummary> {
    let images = workload_containers(workload)?
        .iter()
        .map(|c| c.image.clone().unwrap_or_default())
        .collect();

    let last_update_time = workload
        .conditions()
        .into_iter()
        .find(|c| c.type_ == PROGRESSING && c.status == "True")
        .and_then(|c| c.timestamp);

    Ok(ImageSummary {
        images,
        last_update_time,
    })
}

/// Selector string resolving the workload's pods.
///
/// `matchLabels` come first as `key=value` in key order, followed by any
/// `matchExpressions` in set-based syntax. An empty selector is an empty string.
pub fn derive_label_selector<W: Workload>(workload: &W) -> Result<String> {
    let selector = workload
        .selector()
        .ok_or_else(|| malformed(workload, "object has no spec"))?;

    let mut terms: Vec<String> = selector
        .match_labels
        .iter()
        .flatten()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect();

    for req in selector.match_expressions.iter().flatten() {
        let values = req.values.as_deref().unwrap_or_default().join(",");
        let term = match req.operator.as_str() {
            "In" => format!("{} in ({})", req.key, values),
            "NotIn" => format!("{} notin ({})", req.key, values),
            "Exists" => req.key.clone(),
            "DoesNotExist" => format!("!{}", req.key),
            other => {
                return Err(malformed(
                    workload,
                    &format!("unsupported selector operator '{}'", other),
                ));
            }
        };
        terms.push(term);
    }

    Ok(terms.join(","))
}

/// Desired replicas from the spec, ready replicas from the status
pub fn derive_replica_summary<W: Workload>(workload: &W) -> Result<ReplicaSummary> {
    let desired = workload
        .desired_replicas()
        .ok_or_else(|| malformed(workload, "object has no spec"))?;

    Ok(ReplicaSummary {
        desired,
        ready: workload.ready_replicas(),
    })
}

/// Everything the workload reports show, in one pass
pub fn summarize_workload<W: Workload>(workload: &W) -> Result<WorkloadSummary> {
    let images = derive_image_summary(workload)?;
    let replicas = derive_replica_summary(workload)?;
    let selector = derive_label_selector(workload)?;

    Ok(WorkloadSummary {
        kind: W::KIND,
        name: workload.name().to_string(),
        namespace: workload.namespace().to_string(),
        images: images.images,
        last_update_time: images.last_update_time,
        desired_replicas: replicas.desired,
        ready_replicas: replicas.ready,
        selector,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use k8s_openapi::api::apps::v1::{
        DeploymentCondition, DeploymentSpec, DeploymentStatus, StatefulSetCondition,
        StatefulSetSpec, StatefulSetStatus,
    };
    use k8s_openapi::api::core::v1::PodSpec;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelectorRequirement, Time};
    use std::collections::BTreeMap;

    fn container(name: &str, image: &str) -> Container {
        Container {
            name: name.to_string(),
            image: Some(image.to_string()),
            ..Default::default()
        }
    }

    fn template(containers: Vec<Container>) -> PodTemplateSpec {
        PodTemplateSpec {
            metadata: None,
            spec: Some(PodSpec {
                containers,
                ..Default::default()
            }),
        }
    }

    fn deployment(name: &str, containers: Vec<Container>) -> Deployment {
        Deployment {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some("default".to_string()),
                ..Default::default()
            },
            spec: Some(DeploymentSpec {
                replicas: Some(3),
                template: template(containers),
                ..Default::default()
            }),
            status: None,
        }
    }

    fn condition(type_: &str, status: &str, ts: DateTime<Utc>) -> DeploymentCondition {
        DeploymentCondition {
            type_: type_.to_string(),
            status: status.to_string(),
            last_update_time: Some(Time(ts)),
            ..Default::default()
        }
    }

    #[test]
    fn test_images_without_progressing_condition() {
        let deploy = deployment("web", vec![container("a", "a:1"), container("b", "b:2")]);

        let summary = derive_image_summary(&deploy).unwrap();
        assert_eq!(summary.images, vec!["a:1", "b:2"]);
        assert_eq!(summary.last_update_time, None);
        assert_eq!(summary.last_update_display(), "N/A");
    }

    #[test]
    fn test_first_progressing_condition_wins() {
        let first = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2024, 2, 1, 8, 0, 0).unwrap();
        let mut deploy = deployment("web", vec![container("a", "a:1")]);
        deploy.status = Some(DeploymentStatus {
            conditions: Some(vec![
                condition("Available", "True", second),
                condition("Progressing", "False", second),
                condition("Progressing", "True", first),
                condition("Progressing", "True", second),
            ]),
            ..Default::default()
        });

        let summary = derive_image_summary(&deploy).unwrap();
        assert_eq!(summary.last_update_time, Some(first));
    }

    #[test]
    fn test_deployment_condition_falls_back_to_transition_time() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 3, 3, 3, 3).unwrap();
        let mut deploy = deployment("web", vec![container("a", "a:1")]);
        deploy.status = Some(DeploymentStatus {
            conditions: Some(vec![DeploymentCondition {
                type_: "Progressing".to_string(),
                status: "True".to_string(),
                last_transition_time: Some(Time(ts)),
                ..Default::default()
            }]),
            ..Default::default()
        });

        assert_eq!(derive_image_summary(&deploy).unwrap().last_update_time, Some(ts));
    }

    #[test]
    fn test_statefulset_uses_transition_time() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let sts = StatefulSet {
            metadata: ObjectMeta {
                name: Some("db".to_string()),
                ..Default::default()
            },
            spec: Some(StatefulSetSpec {
                template: template(vec![container("postgres", "postgres:16")]),
                ..Default::default()
            }),
            status: Some(StatefulSetStatus {
                conditions: Some(vec![StatefulSetCondition {
                    type_: "Progressing".to_string(),
                    status: "True".to_string(),
                    last_transition_time: Some(Time(ts)),
                    ..Default::default()
                }]),
                ..Default::default()
            }),
        };

        let summary = derive_image_summary(&sts).unwrap();
        assert_eq!(summary.images, vec!["postgres:16"]);
        assert_eq!(summary.last_update_time, Some(ts));
    }

    #[test]
    fn test_missing_containers_is_malformed() {
        let deploy = deployment("empty", vec![]);
        let err = derive_image_summary(&deploy).unwrap_err();
        assert!(matches!(err, InspectError::MalformedWorkload { .. }));

        let mut no_spec = deployment("bare", vec![]);
        no_spec.spec = None;
        assert!(derive_image_summary(&no_spec).is_err());
        assert!(derive_replica_summary(&no_spec).is_err());
        assert!(derive_label_selector(&no_spec).is_err());
    }

    #[test]
    fn test_label_selector_from_match_labels() {
        let mut deploy = deployment("web", vec![container("a", "a:1")]);
        let labels = BTreeMap::from([
            ("app".to_string(), "web".to_string()),
            ("tier".to_string(), "frontend".to_string()),
        ]);
        deploy.spec.as_mut().unwrap().selector.match_labels = Some(labels);

        assert_eq!(derive_label_selector(&deploy).unwrap(), "app=web,tier=frontend");
    }

    #[test]
    fn test_label_selector_empty() {
        let deploy = deployment("web", vec![container("a", "a:1")]);
        assert_eq!(derive_label_selector(&deploy).unwrap(), "");
    }

    #[test]
    fn test_label_selector_with_expressions() {
        let mut deploy = deployment("web", vec![container("a", "a:1")]);
        let selector = &mut deploy.spec.as_mut().unwrap().selector;
        selector.match_labels = Some(BTreeMap::from([("app".to_string(), "web".to_string())]));
        selector.match_expressions = Some(vec![
            LabelSelectorRequirement {
                key: "env".to_string(),
                operator: "In".to_string(),
                values: Some(vec!["prod".to_string(), "staging".to_string()]),
            },
            LabelSelectorRequirement {
                key: "canary".to_string(),
                operator: "DoesNotExist".to_string(),
                values: None,
            },
        ]);

        assert_eq!(
            derive_label_selector(&deploy).unwrap(),
            "app=web,env in (prod,staging),!canary"
        );
    }

    #[test]
    fn test_ready_replicas_absent_is_not_zero() {
        let mut deploy = deployment("web", vec![container("a", "a:1")]);
        deploy.status = Some(DeploymentStatus::default());

        let replicas = derive_replica_summary(&deploy).unwrap();
        assert_eq!(replicas.desired, 3);
        assert_eq!(replicas.ready, None);
        assert_eq!(replicas.ready_display(), "None");
    }

    #[test]
    fn test_ready_replicas_reported() {
        let mut deploy = deployment("web", vec![container("a", "a:1")]);
        deploy.status = Some(DeploymentStatus {
            ready_replicas: Some(0),
            ..Default::default()
        });

        assert_eq!(derive_replica_summary(&deploy).unwrap().ready, Some(0));
    }

    #[test]
    fn test_summarize_workload() {
        let mut deploy = deployment("web", vec![container("a", "a:1")]);
        deploy.spec.as_mut().unwrap().selector.match_labels =
            Some(BTreeMap::from([("app".to_string(), "web".to_string())]));
        deploy.status = Some(DeploymentStatus {
            ready_replicas: Some(3),
            ..Default::default()
        });

        let summary = summarize_workload(&deploy).unwrap();
        assert_eq!(summary.kind, WorkloadKind::Deployment);
        assert_eq!(summary.name, "web");
        assert_eq!(summary.namespace, "default");
        assert_eq!(summary.selector, "app=web");
        assert!(summary.replicas().is_healthy());
    }
}
