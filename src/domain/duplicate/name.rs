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

//! Duplicate name generation (RFC 1123 labels)

use crate::infrastructure::constants::{
    DUPLICATE_SUFFIX_PREFIX, FALLBACK_NAME_BASE, MAX_NAME_LENGTH, SUFFIX_TOKEN_LEN,
};
use regex::Regex;
use std::sync::OnceLock;

fn dns_label_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[a-z0-9]([-a-z0-9]{0,61}[a-z0-9])?$").expect("static DNS label regex")
    })
}

/// Ref: https://kubernetes.io/docs/concepts/overview/working-with-objects/names/#dns-label-names
pub fn is_valid_dns_label(input: &str) -> bool {
    dns_label_regex().is_match(input)
}

/// `<base>-dup-<4 hex>`, at most 63 characters.
pub fn generate(base: &str) -> String {
    let token = uuid::Uuid::new_v4().simple().to_string();
    generate_with_token(base, &token[..SUFFIX_TOKEN_LEN])
}

pub(crate) fn generate_with_token(base: &str, token: &str) -> String {
    let suffix = format!("{}{}", DUPLICATE_SUFFIX_PREFIX, token);
    let max_base = MAX_NAME_LENGTH - suffix.len();

    let mut base = sanitize(base);
    if base.is_empty() {
        base = FALLBACK_NAME_BASE.to_string();
    }
    // sanitized names are ASCII, byte truncation is safe
    base.truncate(max_base);

    format!("{}{}", base, suffix)
}

/// Lowercases and maps every non [a-z0-9-] character to '-', then drops
/// leading hyphens so the label starts alphanumeric.
fn sanitize(base: &str) -> String {
    let mapped: String = base
        .chars()
        .map(|c| {
            let c = c.to_ascii_lowercase();
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect();
    mapped.trim_start_matches('-').to_string()
}
