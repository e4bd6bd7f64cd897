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

//! Duplication engine: classification, pod template extraction and transforms

pub mod adapter;
pub mod classifier;
pub mod name;
pub mod orchestrator;
pub mod source;
pub mod transform;

pub use self::adapter::PodTemplateSource;
pub use self::classifier::{classify, ResourceClass, WorkloadKind};
pub use self::orchestrator::clone_resources;
pub use self::source::{DuplicateCandidate, SourceResource};
pub use self::transform::{apply_options, build_duplicate};
