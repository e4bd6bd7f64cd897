// Copyright 2025 kube-dup Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use super::classifier::WorkloadKind;
use super::source::SourceResource;
use crate::shared::error::{DupError, Result};
use k8s_openapi::api::apps::v1::{Deployment, StatefulSet};
use k8s_openapi::api::batch::v1::{CronJob, Job};
use k8s_openapi::api::core::v1::{Pod, PodSpec, PodTemplateSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::de::DeserializeOwned;

/// Typed view over a workload that carries a pod template.
#[derive(Debug, Clone)]
pub enum PodTemplateSource {
    Pod(Pod),
    Deployment(Deployment),
    StatefulSet(StatefulSet),
    Job(Job),
    CronJob(CronJob),
}

impl PodTemplateSource {
    /// Converts the raw object into the kind's typed shape. The source is only read.
    pub fn decode(kind: WorkloadKind, source: &SourceResource) -> Result<Self> {
        let raw = serde_json::to_value(source.object())
            .map_err(|e| DupError::decode(kind.as_str(), source.name(), e))?;

        let adapter = match kind {
            WorkloadKind::Pod => Self::Pod(typed(kind, source, raw)?),
            WorkloadKind::Deployment => Self::Deployment(typed(kind, source, raw)?),
            WorkloadKind::StatefulSet => Self::StatefulSet(typed(kind, source, raw)?),
            WorkloadKind::Job => Self::Job(typed(kind, source, raw)?),
            WorkloadKind::CronJob => Self::CronJob(typed(kind, source, raw)?),
        };

        if adapter.pod_spec().is_none() {
            return Err(DupError::decode(
                kind.as_str(),
                source.name(),
                "object has no pod spec",
            ));
        }
        Ok(adapter)
    }

    pub fn kind(&self) -> WorkloadKind {
        match self {
            Self::Pod(_) => WorkloadKind::Pod,
            Self::Deployment(_) => WorkloadKind::Deployment,
            Self::StatefulSet(_) => WorkloadKind::StatefulSet,
            Self::Job(_) => WorkloadKind::Job,
            Self::CronJob(_) => WorkloadKind::CronJob,
        }
    }

    /// Pod-level metadata: the Pod's own, or the template's for controllers.
    pub fn metadata(&self) -> Option<&ObjectMeta> {
        match self {
            Self::Pod(pod) => Some(&pod.metadata),
            _ => self.template().and_then(|t| t.metadata.as_ref()),
        }
    }

    pub fn pod_spec(&self) -> Option<&PodSpec> {
        match self {
            Self::Pod(pod) => pod.spec.as_ref(),
            _ => self.template().and_then(|t| t.spec.as_ref()),
        }
    }

    fn template(&self) -> Option<&PodTemplateSpec> {
        match self {
            Self::Pod(_) => None,
            Self::Deployment(d) => d.spec.as_ref().map(|s| &s.template),
            Self::StatefulSet(s) => s.spec.as_ref().map(|s| &s.template),
            Self::Job(j) => j.spec.as_ref().map(|s| &s.template),
            Self::CronJob(c) => c
                .spec
                .as_ref()
                .and_then(|s| s.job_template.spec.as_ref())
                .map(|s| &s.template),
        }
    }
}

fn typed<K: DeserializeOwned>(
    kind: WorkloadKind,
    source: &SourceResource,
    raw: serde_json::Value,
) -> Result<K> {
    serde_json::from_value(raw).map_err(|e| DupError::decode(kind.as_str(), source.name(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::apps::v1::DeploymentSpec;
    use k8s_openapi::api::batch::v1::{CronJobSpec, JobSpec, JobTemplateSpec};
    use k8s_openapi::api::core::v1::Container;
    use kube::api::DynamicObject;
    use std::collections::BTreeMap;

    fn pod_template(image: &str) -> PodTemplateSpec {
        PodTemplateSpec {
            metadata: Some(ObjectMeta {
                labels: Some(BTreeMap::from([("app".to_string(), "web".to_string())])),
                ..Default::default()
            }),
            spec: Some(PodSpec {
                containers: vec![Container {
                    name: "main".to_string(),
                    image: Some(image.to_string()),
                    ..Default::default()
                }],
                ..Default::default()
            }),
        }
    }

    #[test]
    fn test_deployment_template() {
        let deployment = Deployment {
            metadata: ObjectMeta {
                name: Some("web".to_string()),
                ..Default::default()
            },
            spec: Some(DeploymentSpec {
                template: pod_template("nginx:1.27"),
                ..Default::default()
            }),
            ..Default::default()
        };
        let source = SourceResource::from_resource(&deployment).unwrap();

        let adapter = PodTemplateSource::decode(WorkloadKind::Deployment, &source).unwrap();
        assert_eq!(adapter.kind(), WorkloadKind::Deployment);
        assert_eq!(
            adapter.pod_spec().unwrap().containers[0].image.as_deref(),
            Some("nginx:1.27")
        );
        assert_eq!(
            adapter.metadata().unwrap().labels.as_ref().unwrap()["app"],
            "web"
        );
    }

    #[test]
    fn test_cronjob_nested_template() {
        let cronjob = CronJob {
            metadata: ObjectMeta {
                name: Some("nightly".to_string()),
                ..Default::default()
            },
            spec: Some(CronJobSpec {
                schedule: "0 3 * * *".to_string(),
                job_template: JobTemplateSpec {
                    metadata: None,
                    spec: Some(JobSpec {
                        template: pod_template("busybox"),
                        ..Default::default()
                    }),
                },
                ..Default::default()
            }),
            ..Default::default()
        };
        let source = SourceResource::from_resource(&cronjob).unwrap();

        let adapter = PodTemplateSource::decode(WorkloadKind::CronJob, &source).unwrap();
        assert_eq!(
            adapter.pod_spec().unwrap().containers[0].image.as_deref(),
            Some("busybox")
        );
    }

    #[test]
    fn test_pod_uses_own_metadata() {
        let pod = Pod {
            metadata: ObjectMeta {
                name: Some("web-abc".to_string()),
                uid: Some("1234".to_string()),
                ..Default::default()
            },
            spec: pod_template("nginx").spec,
            ..Default::default()
        };
        let source = SourceResource::from_resource(&pod).unwrap();

        let adapter = PodTemplateSource::decode(WorkloadKind::Pod, &source).unwrap();
        assert_eq!(adapter.metadata().unwrap().uid.as_deref(), Some("1234"));
    }

    #[test]
    fn test_missing_pod_spec_is_decode_error() {
        let job = Job {
            metadata: ObjectMeta {
                name: Some("empty".to_string()),
                ..Default::default()
            },
            spec: None,
            ..Default::default()
        };
        let source = SourceResource::from_resource(&job).unwrap();

        let err = PodTemplateSource::decode(WorkloadKind::Job, &source).unwrap_err();
        assert!(matches!(err, DupError::Decode { .. }));
    }

    #[test]
    fn test_malformed_content_is_decode_error() {
        let object: DynamicObject = serde_json::from_value(serde_json::json!({
            "apiVersion": "apps/v1",
            "kind": "Deployment",
            "metadata": { "name": "broken" },
            "spec": { "template": { "spec": { "containers": "not-a-list" } } }
        }))
        .unwrap();
        let source = SourceResource::new(object);

        let err = PodTemplateSource::decode(WorkloadKind::Deployment, &source).unwrap_err();
        match err {
            DupError::Decode { kind, name, .. } => {
                assert_eq!(kind, "Deployment");
                assert_eq!(name, "broken");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
