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
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::api::DynamicObject;
use serde::Serialize;

/// An object fetched from the cluster, untyped. Never mutated by duplication.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceResource {
    object: DynamicObject,
}

impl SourceResource {
    pub fn new(object: DynamicObject) -> Self {
        Self { object }
    }

    /// Builds a source from any typed resource (Deployment, Pod, ...).
    pub fn from_resource<K: Serialize>(resource: &K) -> Result<Self> {
        let value = serde_json::to_value(resource)?;
        let object: DynamicObject = serde_json::from_value(value)?;
        Ok(Self { object })
    }

    pub fn kind(&self) -> &str {
        self.object
            .types
            .as_ref()
            .map(|t| t.kind.as_str())
            .unwrap_or_default()
    }

    pub fn api_version(&self) -> &str {
        self.object
            .types
            .as_ref()
            .map(|t| t.api_version.as_str())
            .unwrap_or_default()
    }

    pub fn name(&self) -> &str {
        self.object.metadata.name.as_deref().unwrap_or_default()
    }

    pub fn namespace(&self) -> Option<&str> {
        self.object.metadata.namespace.as_deref()
    }

    pub fn metadata(&self) -> &ObjectMeta {
        &self.object.metadata
    }

    pub fn object(&self) -> &DynamicObject {
        &self.object
    }
}

/// A renamed, independent object ready to be edited and created.
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateCandidate {
    object: DynamicObject,
}

impl DuplicateCandidate {
    pub fn new(object: DynamicObject) -> Self {
        Self { object }
    }

    /// Converts a typed resource (the synthesized Pod) into a candidate.
    pub fn from_resource<K: Serialize>(resource: &K) -> Result<Self> {
        let value = serde_json::to_value(resource)?;
        let object: DynamicObject = serde_json::from_value(value)?;
        if object.types.is_none() {
            return Err(DupError::config_error(
                "duplicate is missing apiVersion/kind",
            ));
        }
        Ok(Self { object })
    }

    pub fn name(&self) -> &str {
        self.object.metadata.name.as_deref().unwrap_or_default()
    }

    pub fn kind(&self) -> &str {
        self.object
            .types
            .as_ref()
            .map(|t| t.kind.as_str())
            .unwrap_or_default()
    }

    pub fn object(&self) -> &DynamicObject {
        &self.object
    }

    pub fn into_object(self) -> DynamicObject {
        self.object
    }
}
