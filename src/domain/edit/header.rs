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

use crate::shared::error::DupError;
use std::fmt::Write;

const HEADER_PREAMBLE: &str = "\
# Please edit the object below. Lines beginning with a '#' will be ignored,
# and an empty file will abort the edit. If an error occurs while saving this file will be
# reopened with the relevant failures.
#
";

/// Why the file has to be edited again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditReason {
    pub head: String,
    pub other: Vec<String>,
}

impl EditReason {
    pub fn new(head: impl Into<String>) -> Self {
        Self {
            head: head.into(),
            other: Vec::new(),
        }
    }

    pub fn with_details(head: impl Into<String>, other: Vec<String>) -> Self {
        Self {
            head: head.into(),
            other,
        }
    }

    /// Reason for a failure found before commit (validation or syntax).
    pub fn from_error(err: &DupError) -> Self {
        match err {
            DupError::Validation { errors } => {
                Self::with_details("The edited file failed validation", errors.clone())
            }
            DupError::Syntax(message) => {
                Self::new(format!("The edited file had a syntax error: {}", message))
            }
            other => Self::new(other.to_string()),
        }
    }
}

/// Comment block written at the top of the edit document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditHeader {
    pub reasons: Vec<EditReason>,
}

impl EditHeader {
    pub fn render(&self) -> String {
        let mut out = String::from(HEADER_PREAMBLE);
        for reason in &self.reasons {
            if reason.other.is_empty() {
                let _ = writeln!(out, "# {}", hash_on_line_break(&reason.head));
            } else {
                let _ = writeln!(out, "# {}:", hash_on_line_break(&reason.head));
            }
            for detail in &reason.other {
                let _ = writeln!(out, "# * {}", hash_on_line_break(detail));
            }
            out.push_str("#\n");
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.reasons.is_empty()
    }

    pub fn clear(&mut self) {
        self.reasons.clear();
    }
}

/// Re-comments continuation lines of a multi-line message.
fn hash_on_line_break(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\n' && chars.peek().is_some_and(|next| *next != '#') {
            out.push_str("\n# ");
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_header_is_preamble() {
        let header = EditHeader::default();
        assert_eq!(header.render(), HEADER_PREAMBLE);
        assert!(header.render().lines().all(|l| l.starts_with('#')));
    }

    #[test]
    fn test_reasons_rendered_as_comments() {
        let header = EditHeader {
            reasons: vec![
                EditReason::new("The edited file had a syntax error: line 3\nunexpected key"),
                EditReason::with_details(
                    r#"pod "web-dup-1a2b" was not valid"#,
                    vec!["spec.containers[0].image: Required value".to_string()],
                ),
            ],
        };

        let rendered = header.render();
        assert!(rendered.contains("# The edited file had a syntax error: line 3\n# unexpected key\n"));
        assert!(rendered.contains("# pod \"web-dup-1a2b\" was not valid:\n"));
        assert!(rendered.contains("# * spec.containers[0].image: Required value\n"));
        assert!(rendered.lines().all(|l| l.starts_with('#')));
    }

    #[test]
    fn test_reason_from_validation_error() {
        let reason = EditReason::from_error(&DupError::Validation {
            errors: vec!["kind is required".to_string()],
        });
        assert_eq!(reason.head, "The edited file failed validation");
        assert_eq!(reason.other, vec!["kind is required".to_string()]);
    }

    #[test]
    fn test_hash_on_line_break() {
        assert_eq!(hash_on_line_break("a\nb"), "a\n# b");
        assert_eq!(hash_on_line_break("a\n# b"), "a\n# b");
        assert_eq!(hash_on_line_break("trailing\n"), "trailing\n");
    }
}
