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

//! Test doubles shared by the integration tests

#![allow(dead_code)]

use kube::api::DynamicObject;
use kube_dup::{DupError, DupKubeClient, Editor, Result, SourceResource};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;

/// In-memory cluster: serves fixed sources and records every write.
pub struct MockClient {
    namespace: String,
    sources: Vec<DynamicObject>,
    /// Consumed one per create call; `None` or an empty queue means success
    create_script: Mutex<VecDeque<Option<DupError>>>,
    pub create_attempts: Mutex<Vec<DynamicObject>>,
    pub created: Mutex<Vec<DynamicObject>>,
    pub patches: Mutex<Vec<(String, Value)>>,
    patch_error: Option<String>,
}

impl MockClient {
    pub fn new(namespace: &str, sources: Vec<DynamicObject>) -> Self {
        Self {
            namespace: namespace.to_string(),
            sources,
            create_script: Mutex::new(VecDeque::new()),
            create_attempts: Mutex::new(Vec::new()),
            created: Mutex::new(Vec::new()),
            patches: Mutex::new(Vec::new()),
            patch_error: None,
        }
    }

    pub fn with_create_results(self, results: Vec<Option<DupError>>) -> Self {
        *self.create_script.lock().unwrap() = results.into();
        self
    }

    /// Every patch call fails with a generic API error.
    pub fn with_failing_patches(mut self, message: &str) -> Self {
        self.patch_error = Some(message.to_string());
        self
    }

    pub fn created(&self) -> Vec<DynamicObject> {
        self.created.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        self.create_attempts.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl DupKubeClient for MockClient {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    async fn get_resource(&self, resource_type: &str, name: &str) -> Result<SourceResource> {
        self.sources
            .iter()
            .find(|o| {
                let kind = o.types.as_ref().map(|t| t.kind.as_str()).unwrap_or_default();
                kind.eq_ignore_ascii_case(resource_type)
                    && o.metadata.name.as_deref() == Some(name)
            })
            .cloned()
            .map(SourceResource::new)
            .ok_or_else(|| DupError::not_found(resource_type, name, &self.namespace))
    }

    async fn create_resource(&self, object: &DynamicObject) -> Result<DynamicObject> {
        self.create_attempts.lock().unwrap().push(object.clone());
        let scripted = self.create_script.lock().unwrap().pop_front().flatten();
        if let Some(err) = scripted {
            return Err(err);
        }
        self.created.lock().unwrap().push(object.clone());
        Ok(object.clone())
    }

    async fn patch_resource(&self, object: &DynamicObject, patch: &Value) -> Result<DynamicObject> {
        let name = object.metadata.name.clone().unwrap_or_default();
        self.patches.lock().unwrap().push((name, patch.clone()));
        if let Some(message) = &self.patch_error {
            return Err(DupError::KubeError(message.clone()));
        }
        Ok(object.clone())
    }
}

type Step = Box<dyn Fn(&str) -> String + Send + Sync>;

/// Applies one scripted rewrite per editor launch and records what it was shown.
pub struct ScriptedEditor {
    steps: Mutex<VecDeque<Step>>,
    pub seen: Mutex<Vec<String>>,
}

impl ScriptedEditor {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Editor for ScriptedEditor {
    async fn edit(&self, path: &Path) -> Result<()> {
        let content = std::fs::read_to_string(path)?;
        self.seen.lock().unwrap().push(content.clone());

        let step = self
            .steps
            .lock()
            .unwrap()
            .pop_front()
            .expect("editor launched more often than scripted");
        std::fs::write(path, step(&content))?;
        Ok(())
    }
}

pub fn keep() -> Step {
    Box::new(|content| content.to_string())
}

pub fn replace(from: &'static str, to: &'static str) -> Step {
    Box::new(move |content| content.replace(from, to))
}

pub fn write(text: &'static str) -> Step {
    Box::new(move |_| text.to_string())
}

pub fn object(value: Value) -> DynamicObject {
    serde_json::from_value(value).unwrap()
}

pub fn probe() -> Value {
    json!({ "httpGet": { "path": "/healthz", "port": 8080 } })
}

/// Deployment "web" with two probed containers.
pub fn web_deployment() -> DynamicObject {
    object(json!({
        "apiVersion": "apps/v1",
        "kind": "Deployment",
        "metadata": {
            "name": "web",
            "namespace": "default",
            "uid": "2f1c-deploy",
            "resourceVersion": "812",
            "labels": { "app": "web" }
        },
        "spec": {
            "replicas": 3,
            "selector": { "matchLabels": { "app": "web" } },
            "template": {
                "metadata": { "labels": { "app": "web" } },
                "spec": {
                    "containers": [
                        {
                            "name": "web",
                            "image": "nginx:1.27",
                            "readinessProbe": probe(),
                            "livenessProbe": probe()
                        },
                        {
                            "name": "sidecar",
                            "image": "busybox",
                            "command": ["sh", "-c", "tail -f /dev/null"],
                            "readinessProbe": probe()
                        }
                    ]
                }
            }
        }
    }))
}

pub fn pod(name: &str) -> DynamicObject {
    object(json!({
        "apiVersion": "v1",
        "kind": "Pod",
        "metadata": { "name": name, "namespace": "default", "labels": { "app": "web" } },
        "spec": { "containers": [{ "name": "web", "image": "nginx" }] }
    }))
}

pub fn files_in(dir: &Path) -> Vec<std::path::PathBuf> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect()
}
