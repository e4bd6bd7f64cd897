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

use crate::shared::error::{DupError, Result};
use std::fmt;

/// The closed set of kinds that carry a pod template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkloadKind {
    Pod,
    Deployment,
    StatefulSet,
    Job,
    CronJob,
}

impl WorkloadKind {
    pub fn from_kind(kind: &str) -> Option<Self> {
        match kind {
            "Pod" => Some(Self::Pod),
            "Deployment" => Some(Self::Deployment),
            "StatefulSet" => Some(Self::StatefulSet),
            "Job" => Some(Self::Job),
            "CronJob" => Some(Self::CronJob),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pod => "Pod",
            Self::Deployment => "Deployment",
            Self::StatefulSet => "StatefulSet",
            Self::Job => "Job",
            Self::CronJob => "CronJob",
        }
    }
}

impl fmt::Display for WorkloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceClass {
    HasPodTemplate(WorkloadKind),
    Generic,
}

/// Maps a kind to its duplication path.
///
/// Fails with `UnsupportedKind` for an empty kind or an unflattened `*List` wrapper,
/// neither of which names a single object that could be copied.
pub fn classify(kind: &str) -> Result<ResourceClass> {
    if kind.trim().is_empty() {
        return Err(DupError::UnsupportedKind(
            "object has no kind".to_string(),
        ));
    }
    if kind.ends_with("List") {
        return Err(DupError::UnsupportedKind(kind.to_string()));
    }

    Ok(match WorkloadKind::from_kind(kind) {
        Some(workload) => ResourceClass::HasPodTemplate(workload),
        None => ResourceClass::Generic,
    })
}
