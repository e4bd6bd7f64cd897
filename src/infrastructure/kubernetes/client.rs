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

use crate::domain::duplicate::SourceResource;
use crate::infrastructure::constants::FIELD_MANAGER;
use crate::shared::error::{DupError, Result};
use kube::api::{DynamicObject, Patch, PatchParams, PostParams};
use kube::core::{ApiResource, GroupVersionKind};
use kube::discovery::{self, Discovery, Scope};
use kube::{Api, Client};
use serde_json::Value;
use tracing::debug;

/// The cluster operations duplication needs.
#[async_trait::async_trait]
pub trait DupKubeClient: Send + Sync {
    /// Namespace sources are read from and duplicates are created in.
    fn namespace(&self) -> &str;

    /// Fetches one object by a type name (`deploy`, `pods`, `CronJob`, ...) and name.
    async fn get_resource(&self, resource_type: &str, name: &str) -> Result<SourceResource>;

    /// Creates an object; `resourceVersion` is never sent.
    async fn create_resource(&self, object: &DynamicObject) -> Result<DynamicObject>;

    /// Applies a JSON merge patch to an existing object.
    async fn patch_resource(&self, object: &DynamicObject, patch: &Value) -> Result<DynamicObject>;
}

pub struct DupKubeClientImpl {
    client: Client,
    namespace: String,
}

impl DupKubeClientImpl {
    pub async fn new(namespace: Option<String>) -> Result<Self> {
        let client = Client::try_default().await.map_err(|e| {
            DupError::KubeError(format!("Failed to create Kubernetes client: {}", e))
        })?;

        Ok(Self::with_client(client, namespace))
    }

    pub async fn new_with_config(
        namespace: Option<String>,
        kubeconfig_path: Option<String>,
        context: Option<String>,
    ) -> Result<Self> {
        use kube::config::{KubeConfigOptions, Kubeconfig};

        if kubeconfig_path.is_none() && context.is_none() {
            return Self::new(namespace).await;
        }

        let kubeconfig = if let Some(path) = kubeconfig_path {
            Kubeconfig::read_from(path)
                .map_err(|e| DupError::KubeError(format!("Failed to load kubeconfig: {}", e)))?
        } else {
            Kubeconfig::read()
                .map_err(|e| DupError::KubeError(format!("Failed to load kubeconfig: {}", e)))?
        };

        let config_options = KubeConfigOptions {
            context,
            cluster: None,
            user: None,
        };

        let config = kube::Config::from_custom_kubeconfig(kubeconfig, &config_options)
            .await
            .map_err(|e| {
                DupError::KubeError(format!("Failed to create Kubernetes config: {}", e))
            })?;

        let client = Client::try_from(config).map_err(|e| {
            DupError::KubeError(format!("Failed to create Kubernetes client: {}", e))
        })?;

        Ok(Self::with_client(client, namespace))
    }

    /// Falls back to the kubeconfig context's namespace when none is given.
    pub fn with_client(client: Client, namespace: Option<String>) -> Self {
        let namespace = namespace
            .filter(|ns| !ns.is_empty())
            .unwrap_or_else(|| client.default_namespace().to_string());
        Self { client, namespace }
    }

    fn api_for(&self, ar: &ApiResource, namespaced: bool, namespace: &str) -> Api<DynamicObject> {
        if namespaced {
            Api::namespaced_with(self.client.clone(), namespace, ar)
        } else {
            Api::all_with(self.client.clone(), ar)
        }
    }

    /// Built-in workload aliases resolve without a discovery round trip.
    async fn resolve_type(&self, resource_type: &str) -> Result<(ApiResource, bool)> {
        if let Some(gvk) = builtin_gvk(resource_type) {
            return self.resolve_gvk(&gvk).await;
        }

        let discovery = Discovery::new(self.client.clone())
            .run()
            .await
            .map_err(|e| DupError::KubeError(format!("API discovery failed: {}", e)))?;
        for group in discovery.groups() {
            for (ar, caps) in group.recommended_resources() {
                if matches_type(&ar, resource_type) {
                    debug!("resolved {} to {}/{}", resource_type, ar.api_version, ar.kind);
                    return Ok((ar, matches!(caps.scope, Scope::Namespaced)));
                }
            }
        }
        Err(DupError::UnsupportedKind(format!(
            "the server doesn't have a resource type \"{}\"",
            resource_type
        )))
    }

    async fn resolve_gvk(&self, gvk: &GroupVersionKind) -> Result<(ApiResource, bool)> {
        let (ar, caps) = discovery::pinned_kind(&self.client, gvk)
            .await
            .map_err(|e| {
                DupError::UnsupportedKind(format!(
                    "{} {}: {}",
                    api_version_of(gvk),
                    gvk.kind,
                    e
                ))
            })?;
        Ok((ar, matches!(caps.scope, Scope::Namespaced)))
    }

    async fn resolve_object(&self, object: &DynamicObject) -> Result<(ApiResource, bool)> {
        let types = object.types.as_ref().ok_or_else(|| {
            DupError::Syntax("Object 'Kind' is missing or 'apiVersion' is not set".to_string())
        })?;
        let gvk = parse_gvk(&types.api_version, &types.kind);
        self.resolve_gvk(&gvk).await
    }
}

#[async_trait::async_trait]
impl DupKubeClient for DupKubeClientImpl {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    async fn get_resource(&self, resource_type: &str, name: &str) -> Result<SourceResource> {
        let (ar, namespaced) = self.resolve_type(resource_type).await?;
        let api = self.api_for(&ar, namespaced, &self.namespace);

        let mut object = api
            .get(name)
            .await
            .map_err(|e| DupError::from_api(e, &ar.kind, name, &self.namespace))?;
        if object.types.is_none() {
            object.types = Some(kube::core::TypeMeta {
                api_version: ar.api_version.clone(),
                kind: ar.kind.clone(),
            });
        }
        Ok(SourceResource::new(object))
    }

    async fn create_resource(&self, object: &DynamicObject) -> Result<DynamicObject> {
        let (ar, namespaced) = self.resolve_object(object).await?;
        let namespace = object
            .metadata
            .namespace
            .clone()
            .unwrap_or_else(|| self.namespace.clone());
        let name = object.metadata.name.clone().unwrap_or_default();
        let api = self.api_for(&ar, namespaced, &namespace);

        let mut body = object.clone();
        body.metadata.resource_version = None;

        let pp = PostParams {
            field_manager: Some(FIELD_MANAGER.to_string()),
            ..Default::default()
        };
        debug!("creating {} {}/{}", ar.kind, namespace, name);
        api.create(&pp, &body)
            .await
            .map_err(|e| DupError::from_api(e, &ar.kind, &name, &namespace))
    }

    async fn patch_resource(&self, object: &DynamicObject, patch: &Value) -> Result<DynamicObject> {
        let (ar, namespaced) = self.resolve_object(object).await?;
        let namespace = object
            .metadata
            .namespace
            .clone()
            .unwrap_or_else(|| self.namespace.clone());
        let name = object
            .metadata
            .name
            .clone()
            .ok_or_else(|| DupError::config_error(format!("{} name is required", ar.kind)))?;
        let api = self.api_for(&ar, namespaced, &namespace);

        let pp = PatchParams {
            field_manager: Some(FIELD_MANAGER.to_string()),
            ..Default::default()
        };
        api.patch(&name, &pp, &Patch::Merge(patch))
            .await
            .map_err(|e| DupError::from_api(e, &ar.kind, &name, &namespace))
    }
}

/// Group/version/kind of the workload types, by any of their kubectl names.
fn builtin_gvk(resource_type: &str) -> Option<GroupVersionKind> {
    let gvk = match resource_type.to_ascii_lowercase().as_str() {
        "po" | "pod" | "pods" => GroupVersionKind::gvk("", "v1", "Pod"),
        "deploy" | "deployment" | "deployments" => {
            GroupVersionKind::gvk("apps", "v1", "Deployment")
        }
        "sts" | "statefulset" | "statefulsets" => {
            GroupVersionKind::gvk("apps", "v1", "StatefulSet")
        }
        "job" | "jobs" => GroupVersionKind::gvk("batch", "v1", "Job"),
        "cj" | "cronjob" | "cronjobs" => GroupVersionKind::gvk("batch", "v1", "CronJob"),
        _ => return None,
    };
    Some(gvk)
}

fn matches_type(ar: &ApiResource, resource_type: &str) -> bool {
    let wanted = resource_type.to_ascii_lowercase();
    // `kind.group` form, e.g. `certificates.cert-manager.io`
    let (name, group) = match wanted.split_once('.') {
        Some((name, group)) => (name.to_string(), Some(group.to_string())),
        None => (wanted.clone(), None),
    };
    if group.as_deref().is_some_and(|g| g != ar.group) {
        return false;
    }
    ar.plural == name || ar.kind.to_ascii_lowercase() == name
}

fn parse_gvk(api_version: &str, kind: &str) -> GroupVersionKind {
    match api_version.split_once('/') {
        Some((group, version)) => GroupVersionKind::gvk(group, version, kind),
        None => GroupVersionKind::gvk("", api_version, kind),
    }
}

fn api_version_of(gvk: &GroupVersionKind) -> String {
    if gvk.group.is_empty() {
        gvk.version.clone()
    } else {
        format!("{}/{}", gvk.group, gvk.version)
    }
}
