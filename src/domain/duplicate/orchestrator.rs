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

use super::adapter::PodTemplateSource;
use super::classifier::{classify, ResourceClass};
use super::name;
use super::source::{DuplicateCandidate, SourceResource};
use super::transform::build_duplicate;
use crate::domain::config::DuplicationOptions;
use crate::shared::error::{DupError, Result};
use tracing::debug;

/// Duplicates every source, or none: the first classification or decode
/// failure aborts the whole batch.
pub fn clone_resources(
    options: &DuplicationOptions,
    sources: &[SourceResource],
) -> Result<Vec<DuplicateCandidate>> {
    sources
        .iter()
        .map(|source| clone_one(options, source))
        .collect()
}

fn clone_one(options: &DuplicationOptions, source: &SourceResource) -> Result<DuplicateCandidate> {
    let duplicate_name = name::generate(source.name());

    match classify(source.kind())? {
        ResourceClass::HasPodTemplate(kind) if options.duplicate_inner_pod => {
            let adapter = PodTemplateSource::decode(kind, source)?;
            let Some(spec) = adapter.pod_spec() else {
                return Err(DupError::decode(kind.as_str(), source.name(), "object has no pod spec"));
            };
            let metadata = adapter.metadata().cloned().unwrap_or_default();

            let pod = build_duplicate(
                kind,
                &duplicate_name,
                source.namespace(),
                spec,
                &metadata,
                options,
            );
            debug!(
                source = %source.name(),
                kind = %kind,
                duplicate = %duplicate_name,
                "synthesized pod from template"
            );
            DuplicateCandidate::from_resource(&pod)
        }
        _ => {
            let mut object = source.object().clone();
            object.metadata.name = Some(duplicate_name.clone());
            debug!(
                source = %source.name(),
                kind = %source.kind(),
                duplicate = %duplicate_name,
                "copied object"
            );
            Ok(DuplicateCandidate::new(object))
        }
    }
}
