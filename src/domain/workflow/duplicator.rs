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

use super::target::Target;
use crate::domain::config::{DuplicationOptions, EditConfig};
use crate::domain::duplicate::clone_resources;
use crate::domain::edit::{CommitSummary, Committer, DocumentCodec, EditOutcome, EditRetryLoop};
use crate::infrastructure::editor::Editor;
use crate::infrastructure::kubernetes::{DupKubeClient, DupKubeClientImpl};
use crate::infrastructure::validator::Validator;
use crate::shared::error::{DupError, Result};
use futures::future::try_join_all;
use std::path::PathBuf;
use tracing::{info, warn};

/// What one invocation produced.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Every commit attempt, across all edit sessions
    pub summary: CommitSummary,
    /// One entry per interactive session; empty with skip-edit
    pub outcomes: Vec<EditOutcome>,
    /// Sessions that ended in an editor or I/O failure
    pub errors: Vec<DupError>,
}

impl RunReport {
    pub fn preserved_paths(&self) -> impl Iterator<Item = &std::path::Path> {
        self.outcomes.iter().filter_map(EditOutcome::preserved_path)
    }

    pub fn is_success(&self) -> bool {
        self.summary.is_clean()
            && self.errors.is_empty()
            && self
                .outcomes
                .iter()
                .all(|o| !matches!(o, EditOutcome::Preserved { .. }))
    }
}

pub struct Duplicator {
    client: Box<dyn DupKubeClient>,
    editor: Box<dyn Editor>,
    validator: Box<dyn Validator>,
    codec: DocumentCodec,
    options: DuplicationOptions,
    temp_dir: Option<PathBuf>,
}

impl Duplicator {
    pub fn new(
        client: Box<dyn DupKubeClient>,
        editor: Box<dyn Editor>,
        validator: Box<dyn Validator>,
        codec: DocumentCodec,
        options: DuplicationOptions,
    ) -> Self {
        Self {
            client,
            editor,
            validator,
            codec,
            options,
            temp_dir: None,
        }
    }

    pub async fn new_with_config(
        namespace: Option<String>,
        kubeconfig_path: Option<String>,
        context: Option<String>,
        editor: Box<dyn Editor>,
        validator: Box<dyn Validator>,
        codec: DocumentCodec,
        options: DuplicationOptions,
    ) -> Result<Self> {
        let client =
            DupKubeClientImpl::new_with_config(namespace, kubeconfig_path, context).await?;
        Ok(Self::new(
            Box::new(client),
            editor,
            validator,
            codec,
            options,
        ))
    }

    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    pub fn namespace(&self) -> &str {
        self.client.namespace()
    }

    /// Fetches every target, duplicates them all, then creates the
    /// duplicates directly or through one edit session each.
    ///
    /// Nothing is created when a fetch, classification or decode fails.
    pub async fn run(&self, targets: &[Target]) -> Result<RunReport> {
        let sources = try_join_all(
            targets
                .iter()
                .map(|t| self.client.get_resource(&t.resource_type, &t.name)),
        )
        .await?;

        let candidates = clone_resources(&self.options, &sources)?;
        let objects: Vec<_> = candidates.into_iter().map(|c| c.into_object()).collect();
        info!(
            "duplicating {} object(s) into namespace {}",
            objects.len(),
            self.namespace()
        );

        let mut report = RunReport::default();

        if self.options.skip_edit {
            let committer = Committer::new(
                self.client.as_ref(),
                self.client.namespace(),
                self.options.apply_annotation,
            );
            report.summary = committer.commit(objects).await.into_final_summary();
            return Ok(report);
        }

        let mut config = EditConfig::new(self.client.namespace(), &self.options);
        if let Some(dir) = &self.temp_dir {
            config = config.with_temp_dir(dir.clone());
        }
        let edit_loop = EditRetryLoop::new(
            self.client.as_ref(),
            self.editor.as_ref(),
            self.validator.as_ref(),
            &self.codec,
            config,
        );

        // sessions run one after another, never concurrently; a failed session
        // does not stop the rest
        for object in objects {
            match edit_loop.run(vec![object]).await {
                Ok(outcome) => {
                    report.summary.extend(outcome.summary().clone());
                    report.outcomes.push(outcome);
                }
                Err(err) => {
                    warn!("edit session failed: {}", err);
                    report.errors.push(err);
                }
            }
        }
        Ok(report)
    }
}
