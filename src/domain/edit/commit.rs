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

use super::header::EditReason;
use crate::infrastructure::constants::LAST_APPLIED_CONFIG_ANNOTATION;
use crate::infrastructure::kubernetes::DupKubeClient;
use crate::shared::error::{DupError, Result};
use kube::api::DynamicObject;
use serde_json::json;
use tracing::{info, warn};

/// Identity of a committed object, for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRef {
    pub kind: String,
    pub name: String,
    pub namespace: String,
}

impl ObjectRef {
    pub fn of(object: &DynamicObject) -> Self {
        Self {
            kind: object
                .types
                .as_ref()
                .map(|t| t.kind.clone())
                .unwrap_or_default(),
            name: object.metadata.name.clone().unwrap_or_default(),
            namespace: object.metadata.namespace.clone().unwrap_or_default(),
        }
    }

    /// Lowercase kind as used in messages, e.g. `pod "web-dup-1a2b"`.
    pub fn describe(&self) -> String {
        format!("{} {:?}", self.kind.to_lowercase(), self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitStatus {
    Created,
    /// Created, but the last-applied annotation could not be added.
    Unannotated(String),
    Invalid(String),
    NotFound,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub object: ObjectRef,
    pub status: CommitStatus,
}

/// Per-object commit results, aggregated across passes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitSummary {
    pub records: Vec<CommitRecord>,
}

impl CommitSummary {
    pub fn push(&mut self, object: ObjectRef, status: CommitStatus) {
        self.records.push(CommitRecord { object, status });
    }

    pub fn extend(&mut self, other: CommitSummary) {
        self.records.extend(other.records);
    }

    pub fn created(&self) -> impl Iterator<Item = &ObjectRef> {
        self.records
            .iter()
            .filter(|r| {
                matches!(
                    r.status,
                    CommitStatus::Created | CommitStatus::Unannotated(_)
                )
            })
            .map(|r| &r.object)
    }

    pub fn created_count(&self) -> usize {
        self.created().count()
    }

    pub fn not_found_count(&self) -> usize {
        self.count(|s| matches!(s, CommitStatus::NotFound))
    }

    /// API failures other than invalid/not-found; reported, never retried here.
    pub fn retryable_count(&self) -> usize {
        self.count(|s| matches!(s, CommitStatus::Failed(_)))
    }

    pub fn invalid_count(&self) -> usize {
        self.count(|s| matches!(s, CommitStatus::Invalid(_)))
    }

    pub fn unannotated_count(&self) -> usize {
        self.count(|s| matches!(s, CommitStatus::Unannotated(_)))
    }

    /// True when nothing failed.
    pub fn is_clean(&self) -> bool {
        self.records.iter().all(|r| r.status == CommitStatus::Created)
    }

    fn count(&self, pred: impl Fn(&CommitStatus) -> bool) -> usize {
        self.records.iter().filter(|r| pred(&r.status)).count()
    }
}

/// Outcome of one commit pass.
#[derive(Debug, Default)]
pub struct CommitResults {
    pub summary: CommitSummary,
    /// Objects rejected as invalid, to be edited again
    pub invalid: Vec<DynamicObject>,
    pub reasons: Vec<EditReason>,
}

impl CommitResults {
    fn add_error(&mut self, err: DupError, object: DynamicObject) {
        let object_ref = ObjectRef::of(&object);
        match err {
            DupError::Invalid {
                message, causes, ..
            } => {
                warn!("error: {} is invalid", object_ref.describe());
                let details = if causes.is_empty() {
                    vec![message]
                } else {
                    causes
                };
                self.reasons.push(EditReason::with_details(
                    format!("{} was not valid", object_ref.describe()),
                    details,
                ));
                self.invalid.push(object);
            }
            DupError::NotFound { .. } => {
                warn!(
                    "error: {} could not be found on the server",
                    object_ref.describe()
                );
                self.summary.push(object_ref, CommitStatus::NotFound);
            }
            other => {
                warn!(
                    "error: {} could not be created: {}",
                    object_ref.describe(),
                    other
                );
                self.summary
                    .push(object_ref, CommitStatus::Failed(other.to_string()));
            }
        }
    }

    /// Invalid objects become terminal records when no further edit will happen.
    pub fn into_final_summary(mut self) -> CommitSummary {
        for (object, reason) in self.invalid.iter().zip(self.reasons.iter()) {
            self.summary.push(
                ObjectRef::of(object),
                CommitStatus::Invalid(reason.other.join("; ")),
            );
        }
        self.summary
    }
}

/// Creates objects in the target namespace, classifying each failure.
pub struct Committer<'a> {
    client: &'a dyn DupKubeClient,
    namespace: &'a str,
    apply_annotation: bool,
}

impl<'a> Committer<'a> {
    pub fn new(client: &'a dyn DupKubeClient, namespace: &'a str, apply_annotation: bool) -> Self {
        Self {
            client,
            namespace,
            apply_annotation,
        }
    }

    /// Attempts every object; failures never stop the pass.
    pub async fn commit(&self, objects: Vec<DynamicObject>) -> CommitResults {
        let mut results = CommitResults::default();

        for mut object in objects {
            let created = match self.create(&mut object).await {
                Ok(created) => created,
                Err(err) => {
                    results.add_error(err, object);
                    continue;
                }
            };

            let object_ref = ObjectRef::of(&object);
            info!("{} created", object_ref.describe());
            // the object exists now, so an annotation failure is reported but never retried
            let status = match self.annotate(&object, &created).await {
                Ok(()) => CommitStatus::Created,
                Err(err) => {
                    warn!(
                        "error: {} was created without its last-applied configuration: {}",
                        object_ref.describe(),
                        err
                    );
                    CommitStatus::Unannotated(err.to_string())
                }
            };
            results.summary.push(object_ref, status);
        }
        results
    }

    async fn create(&self, object: &mut DynamicObject) -> Result<DynamicObject> {
        self.require_namespace(object)?;
        self.client.create_resource(object).await
    }

    async fn annotate(&self, object: &DynamicObject, created: &DynamicObject) -> Result<()> {
        if !self.apply_annotation {
            return Ok(());
        }
        let patch = last_applied_patch(object)?;
        self.client.patch_resource(created, &patch).await?;
        Ok(())
    }

    /// Fills an empty namespace; a different one is reported as invalid.
    fn require_namespace(&self, object: &mut DynamicObject) -> Result<()> {
        match object.metadata.namespace.as_deref() {
            None | Some("") => {
                object.metadata.namespace = Some(self.namespace.to_string());
                Ok(())
            }
            Some(ns) if ns == self.namespace => Ok(()),
            Some(ns) => {
                let object_ref = ObjectRef::of(object);
                Err(DupError::invalid(
                    object_ref.kind,
                    object_ref.name,
                    format!(
                        "the namespace from the provided object {:?} does not match the namespace {:?}. You must pass '--namespace={}' to perform this operation.",
                        ns, self.namespace, ns
                    ),
                ))
            }
        }
    }
}

/// Merge patch recording the object's own JSON as its last-applied configuration.
pub fn last_applied_patch(object: &DynamicObject) -> Result<serde_json::Value> {
    let mut original = object.clone();
    if let Some(annotations) = original.metadata.annotations.as_mut() {
        annotations.remove(LAST_APPLIED_CONFIG_ANNOTATION);
    }
    let encoded = serde_json::to_string(&original)?;
    Ok(json!({
        "metadata": {
            "annotations": {
                LAST_APPLIED_CONFIG_ANNOTATION: encoded
            }
        }
    }))
}
