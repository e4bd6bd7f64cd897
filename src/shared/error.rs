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

use regex::Regex;
use std::path::PathBuf;
use std::sync::OnceLock;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DupError>;

#[derive(Error, Debug)]
pub enum DupError {
    #[error("Unsupported kind: {0}")]
    UnsupportedKind(String),

    #[error("Failed to decode {kind} '{name}': {reason}")]
    Decode {
        kind: String,
        name: String,
        reason: String,
    },

    #[error("The edited file failed validation: {}", .errors.join("; "))]
    Validation { errors: Vec<String> },

    #[error("The edited file had a syntax error: {0}")]
    Syntax(String),

    #[error("{kind} '{name}' is invalid: {message}")]
    Invalid {
        kind: String,
        name: String,
        message: String,
        causes: Vec<String>,
    },

    #[error("Resource not found: {resource_type} '{name}' in namespace '{namespace}'")]
    NotFound {
        resource_type: String,
        name: String,
        namespace: String,
    },

    #[error("Kubernetes API error: {0}")]
    KubeError(String),

    #[error("Editor error: {0}")]
    Editor(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("{source}\nA copy of your changes has been stored to {}", .path.display())]
    Preserved {
        path: PathBuf,
        #[source]
        source: Box<DupError>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl From<kube::Error> for DupError {
    fn from(err: kube::Error) -> Self {
        DupError::KubeError(err.to_string())
    }
}

impl DupError {
    pub fn config_error(context: impl Into<String>) -> Self {
        Self::ConfigError(context.into())
    }

    pub fn decode(
        kind: impl Into<String>,
        name: impl Into<String>,
        reason: impl std::fmt::Display,
    ) -> Self {
        Self::Decode {
            kind: kind.into(),
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    pub fn not_found(
        resource_type: impl Into<String>,
        name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    pub fn invalid(kind: impl Into<String>, name: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        Self::Invalid {
            kind: kind.into(),
            name: name.into(),
            causes: invalid_causes(&message),
            message,
        }
    }

    /// Classifies an API failure for a named object by HTTP status.
    pub fn from_api(
        err: kube::Error,
        kind: &str,
        name: &str,
        namespace: &str,
    ) -> Self {
        match err {
            kube::Error::Api(ae) if ae.code == 422 => Self::invalid(kind, name, ae.message),
            kube::Error::Api(ae) if ae.code == 404 => Self::not_found(kind, name, namespace),
            e => Self::KubeError(e.to_string()),
        }
    }

    /// Attaches the preserved temp file path, unless one is already attached.
    pub fn preserved(self, path: Option<PathBuf>) -> Self {
        match (self, path) {
            (err @ DupError::Preserved { .. }, _) => err,
            (err, Some(path)) if path.exists() => DupError::Preserved {
                path,
                source: Box::new(err),
            },
            (err, _) => err,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, DupError::Invalid { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DupError::NotFound { .. })
    }
}

/// Splits an apiserver "is invalid" message into its field causes.
///
/// `Pod "x" is invalid: [spec.a: Required value, spec.b: Invalid value]` yields two causes,
/// a single unbracketed cause yields one, anything else yields none. Only a `, ` that
/// starts a new field path separates causes, so values containing commas stay whole.
fn invalid_causes(message: &str) -> Vec<String> {
    let Some((_, details)) = message.split_once("is invalid: ") else {
        return Vec::new();
    };
    let details = details.trim();
    match details.strip_prefix('[').and_then(|d| d.strip_suffix(']')) {
        Some(list) => split_causes(list),
        None if details.is_empty() => Vec::new(),
        None => vec![details.to_string()],
    }
}

fn split_causes(list: &str) -> Vec<String> {
    let mut causes = Vec::new();
    let mut start = 0;
    for boundary in cause_boundary_regex().find_iter(list) {
        causes.push(&list[start..boundary.start()]);
        start = boundary.start() + 2;
    }
    causes.push(&list[start..]);

    causes
        .into_iter()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

fn cause_boundary_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r", [A-Za-z_][A-Za-z0-9_.\[\]/-]*: ").expect("static cause boundary regex")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_causes_bracketed() {
        let causes = invalid_causes(
            r#"Pod "web-dup-1a2b" is invalid: [spec.containers[0].image: Required value, metadata.name: Invalid value]"#,
        );
        assert_eq!(
            causes,
            vec![
                "spec.containers[0].image: Required value".to_string(),
                "metadata.name: Invalid value".to_string()
            ]
        );
    }

    #[test]
    fn test_invalid_causes_keep_commas_in_values() {
        let causes = invalid_causes(
            r#"ConfigMap "c" is invalid: [data.key: Invalid value: "a, b": must be a single word, metadata.labels: Invalid value: "x, y"]"#,
        );
        assert_eq!(
            causes,
            vec![
                r#"data.key: Invalid value: "a, b": must be a single word"#.to_string(),
                r#"metadata.labels: Invalid value: "x, y""#.to_string()
            ]
        );
    }

    #[test]
    fn test_invalid_causes_single_and_missing() {
        assert_eq!(
            invalid_causes(r#"Pod "a" is invalid: spec.nodeName: Forbidden"#),
            vec!["spec.nodeName: Forbidden".to_string()]
        );
        assert!(invalid_causes("admission webhook denied the request").is_empty());
    }

    #[test]
    fn test_preserved_requires_existing_file() {
        let err = DupError::Syntax("bad".to_string())
            .preserved(Some(PathBuf::from("/nonexistent/kube-dup-edit.yaml")));
        assert!(matches!(err, DupError::Syntax(_)));

        let file = tempfile::NamedTempFile::new().unwrap();
        let err = DupError::Syntax("bad".to_string()).preserved(Some(file.path().to_path_buf()));
        assert!(matches!(err, DupError::Preserved { .. }));
        assert!(err.to_string().contains("A copy of your changes has been stored to"));
    }
}
