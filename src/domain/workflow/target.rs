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

/// One object to duplicate, addressed the way kubectl addresses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub resource_type: String,
    pub name: String,
}

impl Target {
    pub fn new(resource_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            name: name.into(),
        }
    }

    /// Accepts `TYPE NAME [NAME...]` or `TYPE/NAME [TYPE/NAME...]`.
    pub fn parse_args<S: AsRef<str>>(args: &[S]) -> Result<Vec<Self>> {
        let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
        let Some(first) = args.first() else {
            return Err(DupError::config_error(
                "you must specify the type of resource and a name to duplicate",
            ));
        };

        if first.contains('/') {
            return args.iter().map(|arg| Self::parse_slashed(arg)).collect();
        }

        let names = &args[1..];
        if names.is_empty() {
            return Err(DupError::config_error(format!(
                "a resource name is required for type {:?}",
                first
            )));
        }
        names
            .iter()
            .map(|name| {
                if name.contains('/') {
                    Err(DupError::config_error(format!(
                        "there is no need to specify a resource type as a separate argument when passing arguments in resource/name form (e.g. 'kube-dup {}' instead of 'kube-dup {} {}')",
                        name, first, name
                    )))
                } else {
                    Ok(Self::new(*first, *name))
                }
            })
            .collect()
    }

    fn parse_slashed(arg: &str) -> Result<Self> {
        match arg.split_once('/') {
            Some((resource_type, name)) if !resource_type.is_empty() && !name.is_empty() => {
                Ok(Self::new(resource_type, name))
            }
            _ => Err(DupError::config_error(format!(
                "arguments in resource/name form must have a single resource and name, got {:?}",
                arg
            ))),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.resource_type, self.name)
    }
}
