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

mod common;

use common::*;
use kube_dup::domain::edit::{CancelReason, EditPhase, EditSession};
use kube_dup::infrastructure::constants::LAST_APPLIED_CONFIG_ANNOTATION;
use kube_dup::infrastructure::validator::SchemaValidator;
use kube_dup::*;
use serde_json::json;
use std::path::Path;

const DUP_NAME: &str = "web-dup-1a2b";

fn config(dir: &Path) -> EditConfig {
    EditConfig::new("default", &DuplicationOptions::default()).with_temp_dir(dir)
}

fn invalid_image() -> DupError {
    DupError::invalid(
        "Pod",
        DUP_NAME,
        r#"Pod "web-dup-1a2b" is invalid: [spec.containers[0].image: Invalid value: "nginx": must be pinned]"#,
    )
}

#[tokio::test]
async fn test_unchanged_resave_after_error_cancels_and_keeps_file() {
    let dir = tempfile::tempdir().unwrap();
    let client = MockClient::new("default", vec![]).with_create_results(vec![Some(invalid_image())]);
    let editor = ScriptedEditor::new(vec![keep(), keep()]);
    let codec = DocumentCodec::default();

    let edit_loop = EditRetryLoop::new(&client, &editor, &SchemaValidator, &codec, config(dir.path()));
    let outcome = edit_loop.run(vec![pod(DUP_NAME)]).await.unwrap();

    match outcome {
        EditOutcome::Cancelled {
            reason: CancelReason::NoChanges,
            path: Some(path),
            ..
        } => assert!(path.exists()),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(client.attempts(), 1);
    assert!(client.created().is_empty());

    let seen = editor.seen();
    assert!(seen[1].contains(r#"# pod "web-dup-1a2b" was not valid:"#));
    assert!(seen[1].contains(r#"# * spec.containers[0].image: Invalid value: "nginx": must be pinned"#));
}

#[tokio::test]
async fn test_empty_save_deletes_file_without_create() {
    let dir = tempfile::tempdir().unwrap();
    let client = MockClient::new("default", vec![]);
    let editor = ScriptedEditor::new(vec![write("# nothing left\n\n   \n")]);
    let codec = DocumentCodec::default();

    let edit_loop = EditRetryLoop::new(&client, &editor, &SchemaValidator, &codec, config(dir.path()));
    let outcome = edit_loop.run(vec![pod(DUP_NAME)]).await.unwrap();

    assert!(matches!(
        outcome,
        EditOutcome::Cancelled {
            reason: CancelReason::EmptyFile,
            path: None,
            ..
        }
    ));
    assert_eq!(client.attempts(), 0);
    assert!(files_in(dir.path()).is_empty());
}

#[tokio::test]
async fn test_not_found_on_commit_preserves_file() {
    let dir = tempfile::tempdir().unwrap();
    let client = MockClient::new("default", vec![])
        .with_create_results(vec![Some(DupError::not_found("Pod", DUP_NAME, "default"))]);
    let editor = ScriptedEditor::new(vec![keep()]);
    let codec = DocumentCodec::default();

    let edit_loop = EditRetryLoop::new(&client, &editor, &SchemaValidator, &codec, config(dir.path()));
    let outcome = edit_loop.run(vec![pod(DUP_NAME)]).await.unwrap();

    let EditOutcome::Preserved { path, summary } = outcome else {
        panic!("expected the file to be preserved");
    };
    assert!(path.exists());
    assert_eq!(summary.not_found_count(), 1);
    assert_eq!(files_in(dir.path()), vec![path]);
}

#[tokio::test]
async fn test_validation_failure_reopens_with_previous_edit() {
    let dir = tempfile::tempdir().unwrap();
    let client = MockClient::new("default", vec![]);
    let editor = ScriptedEditor::new(vec![
        replace("image: nginx", "imagex: nginx"),
        replace("imagex: nginx", "image: nginx"),
    ]);
    let codec = DocumentCodec::default();

    let edit_loop = EditRetryLoop::new(&client, &editor, &SchemaValidator, &codec, config(dir.path()));
    let outcome = edit_loop.run(vec![pod(DUP_NAME)]).await.unwrap();

    let seen = editor.seen();
    assert!(seen[1].contains("# The edited file failed validation:"));
    assert!(seen[1].contains("# * spec.containers[0].image: Required value"));
    assert!(seen[1].contains("imagex: nginx"));

    assert!(matches!(outcome, EditOutcome::Done { .. }));
    let created = client.created();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].data["spec"]["containers"][0]["image"], "nginx");
    assert!(files_in(dir.path()).is_empty());
}

#[tokio::test]
async fn test_syntax_error_is_reported_separately() {
    let dir = tempfile::tempdir().unwrap();
    let client = MockClient::new("default", vec![]);
    let editor = ScriptedEditor::new(vec![
        replace("kind: Pod", "kind: [Pod"),
        replace("kind: [Pod", "kind: Pod"),
    ]);
    let codec = DocumentCodec::default();

    let edit_loop = EditRetryLoop::new(&client, &editor, &SchemaValidator, &codec, config(dir.path()));
    let outcome = edit_loop.run(vec![pod(DUP_NAME)]).await.unwrap();

    let seen = editor.seen();
    assert!(seen[1].contains("# The edited file had a syntax error:"));
    assert!(!seen[1].contains("failed validation"));
    assert!(seen[1].contains("kind: [Pod"));
    assert!(matches!(outcome, EditOutcome::Done { .. }));
    assert_eq!(client.created().len(), 1);
}

#[tokio::test]
async fn test_invalid_on_commit_loops_back() {
    let dir = tempfile::tempdir().unwrap();
    let client =
        MockClient::new("default", vec![]).with_create_results(vec![Some(invalid_image()), None]);
    let editor = ScriptedEditor::new(vec![keep(), replace("image: nginx", "image: nginx:1.27")]);
    let codec = DocumentCodec::default();

    let edit_loop = EditRetryLoop::new(&client, &editor, &SchemaValidator, &codec, config(dir.path()));
    let outcome = edit_loop.run(vec![pod(DUP_NAME)]).await.unwrap();

    assert!(matches!(outcome, EditOutcome::Done { .. }));
    assert_eq!(client.attempts(), 2);
    let created = client.created();
    assert_eq!(created[0].data["spec"]["containers"][0]["image"], "nginx:1.27");
    assert!(editor.seen()[1].contains("was not valid"));
}

#[tokio::test]
async fn test_managed_fields_hidden_then_restored() {
    let dir = tempfile::tempdir().unwrap();
    let mut object = pod(DUP_NAME);
    object.metadata.uid = Some("0d3e-uid".to_string());
    object.metadata.managed_fields = Some(vec![serde_json::from_value(json!({
        "manager": "kubectl-client-side-apply",
        "operation": "Update",
        "apiVersion": "v1"
    }))
    .unwrap()]);

    let client = MockClient::new("default", vec![]).with_create_results(vec![Some(invalid_image()), None]);
    let editor = ScriptedEditor::new(vec![keep(), replace("image: nginx", "image: nginx:1.27")]);
    let codec = DocumentCodec::default();

    let edit_loop = EditRetryLoop::new(&client, &editor, &SchemaValidator, &codec, config(dir.path()));
    let outcome = edit_loop.run(vec![object]).await.unwrap();

    assert!(matches!(outcome, EditOutcome::Done { .. }));
    let seen = editor.seen();
    assert!(!seen[0].contains("managedFields"));
    assert!(!seen[1].contains("managedFields"));
    assert!(seen[1].contains("0d3e-uid"));

    let attempts = client.create_attempts.lock().unwrap();
    assert!(attempts.iter().all(|o| o.metadata.managed_fields.is_some()));
    drop(attempts);
    let created = client.created();
    let managed = created[0].metadata.managed_fields.as_ref().unwrap();
    assert_eq!(managed[0].manager.as_deref(), Some("kubectl-client-side-apply"));
}

#[tokio::test]
async fn test_namespace_mismatch_is_invalid() {
    let dir = tempfile::tempdir().unwrap();
    let mut object = pod(DUP_NAME);
    object.metadata.namespace = Some("other".to_string());

    let client = MockClient::new("default", vec![]);
    let editor = ScriptedEditor::new(vec![
        keep(),
        replace("namespace: other", "namespace: default"),
    ]);
    let codec = DocumentCodec::default();

    let edit_loop = EditRetryLoop::new(&client, &editor, &SchemaValidator, &codec, config(dir.path()));
    let outcome = edit_loop.run(vec![object]).await.unwrap();

    assert!(editor.seen()[1].contains("does not match the namespace"));
    assert!(matches!(outcome, EditOutcome::Done { .. }));
    assert_eq!(client.attempts(), 1);
}

#[tokio::test]
async fn test_windows_line_endings_and_annotation() {
    let dir = tempfile::tempdir().unwrap();
    let options = DuplicationOptions {
        windows_line_endings: true,
        apply_annotation: true,
        ..Default::default()
    };
    let config = EditConfig::new("default", &options).with_temp_dir(dir.path());
    let client = MockClient::new("default", vec![]);
    let editor = ScriptedEditor::new(vec![keep()]);
    let codec = DocumentCodec::default();

    let edit_loop = EditRetryLoop::new(&client, &editor, &SchemaValidator, &codec, config);
    let outcome = edit_loop.run(vec![pod(DUP_NAME)]).await.unwrap();

    let seen = &editor.seen()[0];
    assert!(seen.contains("\r\n"));
    assert_eq!(seen.matches('\n').count(), seen.matches("\r\n").count());
    assert!(matches!(outcome, EditOutcome::Done { .. }));

    let patches = client.patches.lock().unwrap();
    assert_eq!(patches.len(), 1);
    assert_eq!(patches[0].0, DUP_NAME);
    assert!(patches[0].1["metadata"]["annotations"][LAST_APPLIED_CONFIG_ANNOTATION].is_string());
}

#[tokio::test]
async fn test_annotation_failure_keeps_created_object() {
    let dir = tempfile::tempdir().unwrap();
    let options = DuplicationOptions {
        apply_annotation: true,
        ..Default::default()
    };
    let config = EditConfig::new("default", &options).with_temp_dir(dir.path());
    let client = MockClient::new("default", vec![]).with_failing_patches("etcd timeout");
    let editor = ScriptedEditor::new(vec![keep()]);
    let codec = DocumentCodec::default();

    let edit_loop = EditRetryLoop::new(&client, &editor, &SchemaValidator, &codec, config);
    let outcome = edit_loop.run(vec![pod(DUP_NAME)]).await.unwrap();

    assert!(matches!(outcome, EditOutcome::Done { .. }));
    assert_eq!(client.attempts(), 1);
    assert_eq!(editor.seen().len(), 1);

    let summary = outcome.summary();
    assert_eq!(summary.created_count(), 1);
    assert_eq!(summary.unannotated_count(), 1);
    assert_eq!(summary.retryable_count(), 0);
    assert!(!summary.is_clean());
    assert!(files_in(dir.path()).is_empty());
}

#[tokio::test]
async fn test_comment_lines_inside_block_scalars_survive() {
    let dir = tempfile::tempdir().unwrap();
    let script = "#!/bin/sh\n# bootstrap step\necho hi\n";
    let configmap = object(json!({
        "apiVersion": "v1",
        "kind": "ConfigMap",
        "metadata": { "name": "bootstrap-dup-1a2b", "namespace": "default" },
        "data": { "run.sh": script }
    }));

    let client = MockClient::new("default", vec![])
        .with_create_results(vec![Some(DupError::invalid("ConfigMap", "bootstrap-dup-1a2b", "denied")), None]);
    let editor = ScriptedEditor::new(vec![keep(), replace("bootstrap-dup-1a2b", "bootstrap-dup-9f9f")]);
    let codec = DocumentCodec::default();

    let edit_loop = EditRetryLoop::new(&client, &editor, &SchemaValidator, &codec, config(dir.path()));
    let outcome = edit_loop.run(vec![configmap]).await.unwrap();

    assert!(matches!(outcome, EditOutcome::Done { .. }));
    assert!(editor.seen()[0].contains("    # bootstrap step"));
    assert!(editor.seen()[1].contains("    # bootstrap step"));

    let attempts = client.create_attempts.lock().unwrap();
    assert_eq!(attempts.len(), 2);
    assert!(attempts.iter().all(|o| o.data["data"]["run.sh"] == script));
}

#[tokio::test]
async fn test_json_documents_have_no_header() {
    let dir = tempfile::tempdir().unwrap();
    let client = MockClient::new("default", vec![]);
    let editor = ScriptedEditor::new(vec![keep()]);
    let codec = DocumentCodec::new(OutputFormat::Json);

    let edit_loop = EditRetryLoop::new(&client, &editor, &SchemaValidator, &codec, config(dir.path()));
    let outcome = edit_loop.run(vec![pod(DUP_NAME)]).await.unwrap();

    assert!(editor.seen()[0].starts_with('{'));
    assert!(matches!(outcome, EditOutcome::Done { .. }));
}

struct BrokenEditor;

#[async_trait::async_trait]
impl Editor for BrokenEditor {
    async fn edit(&self, _path: &Path) -> Result<()> {
        Err(DupError::Editor("exit status: 1".to_string()))
    }
}

#[tokio::test]
async fn test_editor_failure_reports_preserved_file() {
    let dir = tempfile::tempdir().unwrap();
    let client = MockClient::new("default", vec![]);
    let codec = DocumentCodec::default();

    let edit_loop =
        EditRetryLoop::new(&client, &BrokenEditor, &SchemaValidator, &codec, config(dir.path()));
    let mut session = EditSession::new(vec![pod(DUP_NAME)]);
    let err = edit_loop.drive(&mut session).await.unwrap_err();

    let DupError::Preserved { path, source } = err else {
        panic!("expected the error to name the preserved file");
    };
    assert!(path.exists());
    assert!(matches!(*source, DupError::Editor(_)));
    assert_eq!(session.phase(), EditPhase::AwaitingEditor);
    assert_eq!(client.attempts(), 0);
}
