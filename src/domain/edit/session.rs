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

use super::codec::DocumentCodec;
use super::commit::{CommitSummary, Committer};
use super::header::{EditHeader, EditReason};
use super::managed_fields::ManagedFieldsSnapshot;
use super::strip::{has_lines, strip_comments, strip_leading_comments, to_crlf};
use crate::domain::config::EditConfig;
use crate::infrastructure::constants::TEMP_FILE_PREFIX;
use crate::infrastructure::editor::Editor;
use crate::infrastructure::kubernetes::DupKubeClient;
use crate::infrastructure::validator::Validator;
use crate::shared::error::{DupError, Result};
use kube::api::DynamicObject;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditPhase {
    Rendering,
    AwaitingEditor,
    Validating,
    Parsing,
    Committing,
    Done,
    Preserved,
    Cancelled,
}

impl EditPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            EditPhase::Done | EditPhase::Preserved | EditPhase::Cancelled
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    EmptyFile,
    NoChanges,
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CancelReason::EmptyFile => write!(f, "saved file was empty"),
            CancelReason::NoChanges => write!(f, "no valid changes were saved"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    /// Every object was created; the temp file is gone.
    Done { summary: CommitSummary },
    /// Some objects could not be created; the edits are kept at `path`.
    Preserved {
        path: PathBuf,
        summary: CommitSummary,
    },
    /// Objects created by earlier passes are still listed in `summary`.
    Cancelled {
        reason: CancelReason,
        path: Option<PathBuf>,
        summary: CommitSummary,
    },
}

impl EditOutcome {
    pub fn summary(&self) -> &CommitSummary {
        match self {
            EditOutcome::Done { summary }
            | EditOutcome::Preserved { summary, .. }
            | EditOutcome::Cancelled { summary, .. } => summary,
        }
    }

    pub fn preserved_path(&self) -> Option<&Path> {
        match self {
            EditOutcome::Preserved { path, .. } => Some(path),
            EditOutcome::Cancelled { path, .. } => path.as_deref(),
            EditOutcome::Done { .. } => None,
        }
    }
}

/// State carried across iterations of one interactive edit.
#[derive(Debug)]
pub struct EditSession {
    objects: Vec<DynamicObject>,
    /// Raw bytes of the most recent save; re-rendered after a failure
    last_edited: Vec<u8>,
    temp_file: Option<PathBuf>,
    header: EditHeader,
    managed_fields: ManagedFieldsSnapshot,
    phase: EditPhase,
    contains_error: bool,
    summary: CommitSummary,
}

impl EditSession {
    pub fn new(objects: Vec<DynamicObject>) -> Self {
        Self {
            objects,
            last_edited: Vec::new(),
            temp_file: None,
            header: EditHeader::default(),
            managed_fields: ManagedFieldsSnapshot::default(),
            phase: EditPhase::Rendering,
            contains_error: false,
            summary: CommitSummary::default(),
        }
    }

    pub fn phase(&self) -> EditPhase {
        self.phase
    }

    pub fn last_edited(&self) -> &[u8] {
        &self.last_edited
    }

    pub fn temp_file(&self) -> Option<&Path> {
        self.temp_file.as_deref()
    }

    pub fn header(&self) -> &EditHeader {
        &self.header
    }

    pub fn contains_error(&self) -> bool {
        self.contains_error
    }

    pub fn summary(&self) -> &CommitSummary {
        &self.summary
    }

    fn record_failure(&mut self, reasons: Vec<EditReason>) {
        for reason in &reasons {
            warn!("{}", reason.head);
        }
        self.header.reasons = reasons;
        self.contains_error = true;
    }

    fn preserve(&self, err: DupError) -> DupError {
        err.preserved(self.temp_file.clone())
    }
}

/// Render, edit, validate, parse and commit until the objects are created
/// or the user gives up.
pub struct EditRetryLoop<'a> {
    client: &'a dyn DupKubeClient,
    editor: &'a dyn Editor,
    validator: &'a dyn Validator,
    codec: &'a DocumentCodec,
    config: EditConfig,
}

impl<'a> EditRetryLoop<'a> {
    pub fn new(
        client: &'a dyn DupKubeClient,
        editor: &'a dyn Editor,
        validator: &'a dyn Validator,
        codec: &'a DocumentCodec,
        config: EditConfig,
    ) -> Self {
        Self {
            client,
            editor,
            validator,
            codec,
            config,
        }
    }

    pub async fn run(&self, objects: Vec<DynamicObject>) -> Result<EditOutcome> {
        let mut session = EditSession::new(objects);
        self.drive(&mut session).await
    }

    /// Runs `session` to a terminal phase. Errors carry the temp file path
    /// whenever the file still exists.
    pub async fn drive(&self, session: &mut EditSession) -> Result<EditOutcome> {
        loop {
            session.phase = EditPhase::Rendering;
            let rendered = self.render(session).map_err(|e| session.preserve(e))?;

            session.phase = EditPhase::AwaitingEditor;
            let previous = std::mem::take(&mut session.last_edited);
            let path = self
                .write_temp_file(session, &rendered)
                .await
                .map_err(|e| session.preserve(e))?;
            self.editor
                .edit(&path)
                .await
                .map_err(|e| session.preserve(e))?;
            let edited = tokio::fs::read(&path)
                .await
                .map_err(|e| session.preserve(e.into()))?;
            debug!("user edited:\n{}", String::from_utf8_lossy(&edited));
            session.last_edited = edited;

            if session.contains_error
                && strip_comments(&previous) == strip_comments(&session.last_edited)
            {
                session.phase = EditPhase::Cancelled;
                return Ok(EditOutcome::Cancelled {
                    reason: CancelReason::NoChanges,
                    path: Some(path),
                    summary: session.summary.clone(),
                });
            }

            if !has_lines(&session.last_edited) {
                remove_temp_file(&path).await;
                session.temp_file = None;
                session.phase = EditPhase::Cancelled;
                return Ok(EditOutcome::Cancelled {
                    reason: CancelReason::EmptyFile,
                    path: None,
                    summary: session.summary.clone(),
                });
            }

            session.phase = EditPhase::Validating;
            let stripped = strip_comments(&session.last_edited);
            match self.validator.validate_bytes(&stripped) {
                Ok(()) => {}
                Err(err @ DupError::Validation { .. }) => {
                    session.record_failure(vec![EditReason::from_error(&err)]);
                    continue;
                }
                Err(err) => return Err(session.preserve(err)),
            }

            session.phase = EditPhase::Parsing;
            // the parser skips real comments; `#` lines inside block scalars are data
            let mut objects = match self.codec.decode(&session.last_edited) {
                Ok(objects) => objects,
                Err(err @ DupError::Syntax(_)) => {
                    session.record_failure(vec![EditReason::from_error(&err)]);
                    continue;
                }
                Err(err) => return Err(session.preserve(err)),
            };

            session.contains_error = false;
            session.header.clear();

            session.phase = EditPhase::Committing;
            session.managed_fields.restore(&mut objects);
            let committer = Committer::new(
                self.client,
                &self.config.namespace,
                self.config.apply_annotation,
            );
            let results = committer.commit(objects).await;
            session.summary.extend(results.summary);

            if results.invalid.is_empty() {
                return Ok(self.finish(session, path).await);
            }

            // only the rejected objects are offered again, without their managed fields
            let mut invalid = results.invalid;
            for object in invalid.iter_mut() {
                object.metadata.managed_fields = None;
            }
            session.last_edited = self
                .codec
                .encode(&invalid)
                .map_err(|e| session.preserve(e))?;
            session.record_failure(results.reasons);
        }
    }

    fn render(&self, session: &mut EditSession) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        if self.codec.adds_header() {
            buf.extend_from_slice(session.header.render().as_bytes());
        }

        if session.contains_error {
            buf.extend_from_slice(&strip_leading_comments(&session.last_edited));
        } else {
            session.managed_fields = ManagedFieldsSnapshot::capture(&mut session.objects);
            buf.extend_from_slice(&self.codec.encode(&session.objects)?);
        }

        if self.config.windows_line_endings {
            buf = to_crlf(&buf);
        }
        Ok(buf)
    }

    /// One temp file per session, rewritten on every pass.
    async fn write_temp_file(&self, session: &mut EditSession, contents: &[u8]) -> Result<PathBuf> {
        let path = match &session.temp_file {
            Some(path) => path.clone(),
            None => {
                let mut builder = tempfile::Builder::new();
                builder
                    .prefix(TEMP_FILE_PREFIX)
                    .suffix(self.codec.extension());
                let file = match &self.config.temp_dir {
                    Some(dir) => builder.tempfile_in(dir)?,
                    None => builder.tempfile()?,
                };
                let (_, path) = file.keep().map_err(|e| e.error)?;
                session.temp_file = Some(path.clone());
                path
            }
        };
        tokio::fs::write(&path, contents).await?;
        Ok(path)
    }

    async fn finish(&self, session: &mut EditSession, path: PathBuf) -> EditOutcome {
        let summary = session.summary.clone();
        if summary.not_found_count() == 0 && summary.retryable_count() == 0 {
            remove_temp_file(&path).await;
            session.temp_file = None;
            session.phase = EditPhase::Done;
            return EditOutcome::Done { summary };
        }

        info!(
            "The edits you made on resources that could not be created have been saved to {:?}",
            path
        );
        session.phase = EditPhase::Preserved;
        EditOutcome::Preserved { path, summary }
    }
}

async fn remove_temp_file(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        warn!("failed to remove {}: {}", path.display(), e);
    }
}
