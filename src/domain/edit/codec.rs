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

use crate::domain::config::OutputFormat;
use crate::shared::error::{DupError, Result};
use kube::api::DynamicObject;
use serde::Deserialize;
use serde_json::{json, Value};

/// Serializes objects into the edit document and parses them back.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentCodec {
    format: OutputFormat,
}

impl DocumentCodec {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn extension(&self) -> &'static str {
        match self.format {
            OutputFormat::Yaml => ".yaml",
            OutputFormat::Json => ".json",
        }
    }

    /// JSON has no comment syntax, so only YAML documents carry the header.
    pub fn adds_header(&self) -> bool {
        self.format == OutputFormat::Yaml
    }

    /// One object is written bare; several become a multi-document YAML
    /// stream or a `v1/List`.
    pub fn encode(&self, objects: &[DynamicObject]) -> Result<Vec<u8>> {
        match self.format {
            OutputFormat::Yaml => {
                let mut out = String::new();
                for (i, object) in objects.iter().enumerate() {
                    if i > 0 {
                        out.push_str("---\n");
                    }
                    out.push_str(&serde_yaml::to_string(object)?);
                }
                Ok(out.into_bytes())
            }
            OutputFormat::Json => {
                let value = match objects {
                    [single] => serde_json::to_value(single)?,
                    many => json!({
                        "apiVersion": "v1",
                        "kind": "List",
                        "metadata": {},
                        "items": many,
                    }),
                };
                let mut out = serde_json::to_vec_pretty(&value)?;
                out.push(b'\n');
                Ok(out)
            }
        }
    }

    /// Parses YAML or JSON (a YAML subset) into objects, flattening `List` wrappers.
    /// Every failure is reported as a syntax error.
    pub fn decode(&self, data: &[u8]) -> Result<Vec<DynamicObject>> {
        let mut objects = Vec::new();

        for document in serde_yaml::Deserializer::from_slice(data) {
            let value = serde_yaml::Value::deserialize(document)
                .map_err(|e| DupError::Syntax(e.to_string()))?;
            if value.is_null() {
                continue;
            }
            let value: Value =
                serde_json::to_value(value).map_err(|e| DupError::Syntax(e.to_string()))?;
            flatten_into(value, &mut objects)?;
        }

        Ok(objects)
    }
}

fn flatten_into(value: Value, objects: &mut Vec<DynamicObject>) -> Result<()> {
    let is_list = value
        .get("kind")
        .and_then(Value::as_str)
        .is_some_and(|kind| kind.ends_with("List"));

    if is_list {
        if let Some(Value::Array(items)) = value.get("items") {
            for item in items.clone() {
                flatten_into(item, objects)?;
            }
            return Ok(());
        }
    }

    let object: DynamicObject =
        serde_json::from_value(value).map_err(|e| DupError::Syntax(e.to_string()))?;
    match &object.types {
        Some(types) if !types.kind.is_empty() && !types.api_version.is_empty() => {
            objects.push(object);
            Ok(())
        }
        _ => Err(DupError::Syntax(
            "Object 'Kind' is missing or 'apiVersion' is not set".to_string(),
        )),
    }
}
