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

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Mutation and flow switches for one invocation. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuplicationOptions {
    /// Synthesize a standalone Pod from the workload's pod template
    pub duplicate_inner_pod: bool,
    pub disable_probes: bool,
    /// Replace every container entrypoint with an idle command
    pub loop_command: bool,
    pub skip_edit: bool,
    pub windows_line_endings: bool,
    /// Record the last-applied-configuration annotation after create
    pub apply_annotation: bool,
}

/// Serialization used for the edit document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!(
                "Invalid output format: {}. Valid values: yaml, json",
                s
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Yaml => write!(f, "yaml"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// How structural validation failures are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ValidationDirective {
    #[default]
    Strict,
    Warn,
    Ignore,
}

impl FromStr for ValidationDirective {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strict" | "true" => Ok(ValidationDirective::Strict),
            "warn" => Ok(ValidationDirective::Warn),
            "ignore" | "false" => Ok(ValidationDirective::Ignore),
            _ => Err(format!(
                "Invalid validation directive: {}. Valid values: strict, warn, ignore",
                s
            )),
        }
    }
}

/// Settings the edit loop needs besides its collaborators.
#[derive(Debug, Clone, Default)]
pub struct EditConfig {
    /// Namespace every committed object must live in
    pub namespace: String,
    pub windows_line_endings: bool,
    pub apply_annotation: bool,
    /// Directory for the session temp file, system default when unset
    pub temp_dir: Option<PathBuf>,
}

impl EditConfig {
    pub fn new(namespace: impl Into<String>, options: &DuplicationOptions) -> Self {
        Self {
            namespace: namespace.into(),
            windows_line_endings: options.windows_line_endings,
            apply_annotation: options.apply_annotation,
            temp_dir: None,
        }
    }

    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }
}
