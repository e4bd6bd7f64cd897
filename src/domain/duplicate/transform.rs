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

//! Mutation policies applied to a duplicated pod

use super::classifier::WorkloadKind;
use crate::domain::config::DuplicationOptions;
use crate::infrastructure::constants::{
    IDLE_COMMAND, LABEL_CONTROLLER_REVISION_HASH, LABEL_POD_TEMPLATE_HASH, RESTART_POLICY_NEVER,
};
use k8s_openapi::api::core::v1::{Pod, PodSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

/// Applies probe, entrypoint and ownership policies to owned copies of a pod's spec and metadata.
pub fn apply_options(
    kind: WorkloadKind,
    mut spec: PodSpec,
    mut metadata: ObjectMeta,
    options: &DuplicationOptions,
) -> (PodSpec, ObjectMeta) {
    if options.disable_probes {
        disable_probes(&mut spec);
    }
    if options.loop_command {
        override_command(&mut spec);
    }
    if kind == WorkloadKind::Pod {
        strip_ownership(&mut metadata);
    }
    (spec, metadata)
}

/// Assembles a standalone Pod from a workload's pod template.
///
/// Spec and labels are value copies, so the returned Pod shares nothing with the inputs.
pub fn build_duplicate(
    kind: WorkloadKind,
    name: &str,
    namespace: Option<&str>,
    spec: &PodSpec,
    metadata: &ObjectMeta,
    options: &DuplicationOptions,
) -> Pod {
    let (mut spec, metadata) = apply_options(kind, spec.clone(), metadata.clone(), options);
    spec.restart_policy = Some(RESTART_POLICY_NEVER.to_string());

    Pod {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: namespace.map(str::to_string),
            labels: metadata.labels,
            ..Default::default()
        },
        spec: Some(spec),
        status: None,
    }
}

fn disable_probes(spec: &mut PodSpec) {
    for container in spec.containers.iter_mut() {
        container.readiness_probe = None;
        container.liveness_probe = None;
        container.startup_probe = None;
    }
}

fn override_command(spec: &mut PodSpec) {
    for container in spec.containers.iter_mut() {
        container.command = Some(IDLE_COMMAND.iter().map(|s| s.to_string()).collect());
        container.args = None;
    }
}

/// Detaches a controller-owned Pod so the copy is not adopted or reconciled away.
fn strip_ownership(metadata: &mut ObjectMeta) {
    if let Some(labels) = metadata.labels.as_mut() {
        labels.remove(LABEL_POD_TEMPLATE_HASH);
        labels.remove(LABEL_CONTROLLER_REVISION_HASH);
    }
    metadata.owner_references = None;
    metadata.uid = None;
    metadata.resource_version = None;
}
