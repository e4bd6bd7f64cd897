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

//! Client-side checks run on the edited document before it is parsed

use crate::domain::config::ValidationDirective;
use crate::shared::error::{DupError, Result};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::sync::OnceLock;
use tracing::warn;

const MAX_SUBDOMAIN_LENGTH: usize = 253;

/// Checks edited bytes (comments already stripped).
///
/// Bytes that do not parse are accepted; the decoder reports them as a
/// syntax error.
pub trait Validator: Send + Sync {
    fn validate_bytes(&self, data: &[u8]) -> Result<()>;
}

pub fn validator_for(directive: ValidationDirective) -> Box<dyn Validator> {
    match directive {
        ValidationDirective::Strict => Box::new(SchemaValidator),
        ValidationDirective::Warn => Box::new(WarningValidator::new(SchemaValidator)),
        ValidationDirective::Ignore => Box::new(NoopValidator),
    }
}

/// Structural checks on every document: type fields, object name, and
/// the container list of pods.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaValidator;

impl Validator for SchemaValidator {
    fn validate_bytes(&self, data: &[u8]) -> Result<()> {
        let mut errors = Vec::new();

        for document in serde_yaml::Deserializer::from_slice(data) {
            let Ok(value) = serde_yaml::Value::deserialize(document) else {
                return Ok(());
            };
            if value.is_null() {
                continue;
            }
            let Ok(value) = serde_json::to_value(value) else {
                return Ok(());
            };
            validate_object(&value, "", &mut errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(DupError::Validation { errors })
        }
    }
}

/// Logs what the wrapped validator finds but never rejects.
pub struct WarningValidator<V> {
    inner: V,
}

impl<V: Validator> WarningValidator<V> {
    pub fn new(inner: V) -> Self {
        Self { inner }
    }
}

impl<V: Validator> Validator for WarningValidator<V> {
    fn validate_bytes(&self, data: &[u8]) -> Result<()> {
        if let Err(DupError::Validation { errors }) = self.inner.validate_bytes(data) {
            for error in errors {
                warn!("validation: {}", error);
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopValidator;

impl Validator for NoopValidator {
    fn validate_bytes(&self, _data: &[u8]) -> Result<()> {
        Ok(())
    }
}

fn validate_object(value: &Value, path: &str, errors: &mut Vec<String>) {
    let Some(object) = value.as_object() else {
        errors.push(format!("{}object must be a mapping", path));
        return;
    };

    let kind = object.get("kind").and_then(Value::as_str).unwrap_or_default();
    if kind.is_empty() {
        errors.push(format!("{}kind: Required value", path));
    }
    if object
        .get("apiVersion")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .is_empty()
    {
        errors.push(format!("{}apiVersion: Required value", path));
    }

    if kind.ends_with("List") {
        if let Some(items) = object.get("items").and_then(Value::as_array) {
            for (i, item) in items.iter().enumerate() {
                validate_object(item, &format!("{}items[{}].", path, i), errors);
            }
            return;
        }
    }

    validate_metadata(object.get("metadata"), path, errors);
    if kind == "Pod" {
        validate_pod_spec(object.get("spec"), path, errors);
    }
}

fn validate_metadata(metadata: Option<&Value>, path: &str, errors: &mut Vec<String>) {
    let name = metadata
        .and_then(|m| m.get("name"))
        .and_then(Value::as_str)
        .unwrap_or_default();
    let generate_name = metadata
        .and_then(|m| m.get("generateName"))
        .and_then(Value::as_str)
        .unwrap_or_default();

    if name.is_empty() {
        if generate_name.is_empty() {
            errors.push(format!(
                "{}metadata.name: Required value: name or generateName is required",
                path
            ));
        }
        return;
    }
    if !is_valid_dns_subdomain(name) {
        errors.push(format!(
            "{}metadata.name: Invalid value: {:?}: a lowercase RFC 1123 subdomain must consist of lower case alphanumeric characters, '-' or '.', and must start and end with an alphanumeric character",
            path, name
        ));
    }
}

fn validate_pod_spec(spec: Option<&Value>, path: &str, errors: &mut Vec<String>) {
    let containers = spec
        .and_then(|s| s.get("containers"))
        .and_then(Value::as_array);
    let Some(containers) = containers.filter(|c| !c.is_empty()) else {
        errors.push(format!("{}spec.containers: Required value", path));
        return;
    };

    for (i, container) in containers.iter().enumerate() {
        for field in ["name", "image"] {
            let present = container
                .get(field)
                .and_then(Value::as_str)
                .is_some_and(|v| !v.is_empty());
            if !present {
                errors.push(format!(
                    "{}spec.containers[{}].{}: Required value",
                    path, i, field
                ));
            }
        }
    }
}

fn dns_subdomain_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?(\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*$")
            .expect("static DNS subdomain regex")
    })
}

fn is_valid_dns_subdomain(name: &str) -> bool {
    name.len() <= MAX_SUBDOMAIN_LENGTH && dns_subdomain_regex().is_match(name)
}
