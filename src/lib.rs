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

// Core modules
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod shared;

// Re-export commonly used types
pub use domain::config::{DupConf, DuplicationOptions, EditConfig, OutputFormat, ValidationDirective};
pub use domain::duplicate::{clone_resources, DuplicateCandidate, SourceResource};
pub use domain::edit::{DocumentCodec, EditOutcome, EditRetryLoop};
pub use domain::workflow::{Duplicator, RunReport, Target};
pub use infrastructure::editor::{Editor, ExternalEditor};
pub use infrastructure::kubernetes::{DupKubeClient, DupKubeClientImpl};
pub use infrastructure::validator::{validator_for, Validator};
pub use shared::{DupError, Result};
