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

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ManagedFieldsEntry;
use kube::api::DynamicObject;
use std::collections::HashMap;

/// Field-manager entries removed before rendering, keyed by object UID.
///
/// Objects without a UID share the empty key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManagedFieldsSnapshot {
    entries: HashMap<String, Option<Vec<ManagedFieldsEntry>>>,
}

impl ManagedFieldsSnapshot {
    /// Takes `managedFields` off every object so the edited document stays readable.
    pub fn capture(objects: &mut [DynamicObject]) -> Self {
        let mut entries = HashMap::with_capacity(objects.len());
        for object in objects.iter_mut() {
            let uid = object.metadata.uid.clone().unwrap_or_default();
            entries.insert(uid, object.metadata.managed_fields.take());
        }
        Self { entries }
    }

    /// Reattaches captured entries by UID; unknown UIDs end up with none.
    pub fn restore(&self, objects: &mut [DynamicObject]) {
        for object in objects.iter_mut() {
            let uid = object.metadata.uid.as_deref().unwrap_or_default();
            object.metadata.managed_fields = self.entries.get(uid).cloned().flatten();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
