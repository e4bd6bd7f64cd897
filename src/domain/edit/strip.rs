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

//! Byte-level helpers for the edit document

/// Drops full-line `#` comments (shebangs excepted) and normalizes CRLF to LF.
pub fn strip_comments(file: &[u8]) -> Vec<u8> {
    manual_strip(&normalize_line_endings(file))
}

/// Drops full-line `#` comments, keeping every other byte as written.
pub fn manual_strip(file: &[u8]) -> Vec<u8> {
    let lines: Vec<&[u8]> = file.split(|b| *b == b'\n').collect();
    let mut stripped = Vec::with_capacity(file.len());

    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.trim_ascii();
        if trimmed.starts_with(b"#") && !trimmed.starts_with(b"#!") {
            continue;
        }
        stripped.extend_from_slice(line);
        if i < lines.len() - 1 {
            stripped.push(b'\n');
        }
    }
    stripped
}

/// Drops the comment block at the top of the file, up to the first content line.
///
/// Later `#` lines may belong to YAML block scalars and are kept.
pub fn strip_leading_comments(file: &[u8]) -> Vec<u8> {
    let mut rest = file;
    while !rest.is_empty() {
        let end = rest.iter().position(|b| *b == b'\n').map_or(rest.len(), |i| i + 1);
        let trimmed = rest[..end].trim_ascii();
        if !trimmed.is_empty() && !(trimmed.starts_with(b"#") && !trimmed.starts_with(b"#!")) {
            break;
        }
        rest = &rest[end..];
    }
    rest.to_vec()
}

/// True when any line has content other than whitespace or a comment.
pub fn has_lines(file: &[u8]) -> bool {
    file.split(|b| *b == b'\n').any(|line| {
        let trimmed = line.trim_ascii();
        !trimmed.is_empty() && !trimmed.starts_with(b"#")
    })
}

pub fn normalize_line_endings(file: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(file.len());
    let mut iter = file.iter().peekable();
    while let Some(&b) = iter.next() {
        if b == b'\r' && iter.peek() == Some(&&b'\n') {
            continue;
        }
        out.push(b);
    }
    out
}

/// Rewrites every line ending as CRLF without doubling existing ones.
pub fn to_crlf(file: &[u8]) -> Vec<u8> {
    let normalized = normalize_line_endings(file);
    let mut out = Vec::with_capacity(normalized.len() + normalized.len() / 16);
    for &b in &normalized {
        if b == b'\n' {
            out.push(b'\r');
        }
        out.push(b);
    }
    out
}
