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

//! File-based defaults for kube-dup

use super::options::{OutputFormat, ValidationDirective};
use crate::infrastructure::constants::CONF_FILE_ENV;
use serde::{Deserialize, Serialize};
use std::fs::read_to_string;

// ============================================================================
// Main configuration
// ============================================================================

/// Defaults loaded from a TOML file; command line flags take precedence.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DupConf {
    pub duplicate: DuplicateConf,
    pub edit: EditConf,
}

impl DupConf {
    /// Load configuration from TOML file
    pub fn from<T: AsRef<str>>(path: T) -> anyhow::Result<Self> {
        let content = read_to_string(path.as_ref())
            .map_err(|e| anyhow::anyhow!("Failed to read config file {}: {}", path.as_ref(), e))?;

        let conf: Self =
            toml::from_str(&content).map_err(|e| anyhow::anyhow!("Failed to parse TOML: {}", e))?;

        Ok(conf)
    }

    /// Explicit path > DUP_CONF_FILE > built-in defaults
    pub fn load(explicit: Option<&str>) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            return Self::from(path);
        }
        match std::env::var(CONF_FILE_ENV) {
            Ok(path) if !path.is_empty() => Self::from(path),
            _ => Ok(Self::default()),
        }
    }
}

// ============================================================================
// Sections
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DuplicateConf {
    pub duplicate_inner_pod: bool,
    pub disable_probes: bool,
    pub loop_command: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EditConf {
    pub skip_edit: bool,
    pub windows_line_endings: bool,
    pub apply_annotation: bool,
    pub output: OutputFormat,
    pub validate: ValidationDirective,
    /// Used when neither KUBE_EDITOR nor EDITOR is set
    pub editor: Option<String>,
}

impl Default for EditConf {
    fn default() -> Self {
        Self {
            skip_edit: false,
            windows_line_endings: cfg!(windows),
            apply_annotation: false,
            output: OutputFormat::Yaml,
            validate: ValidationDirective::Strict,
            editor: None,
        }
    }
}
