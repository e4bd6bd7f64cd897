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

/// Field manager recorded on created objects
pub const FIELD_MANAGER: &str = "kube-dup";

/// Duplicate naming (RFC 1123 label)
pub const DUPLICATE_SUFFIX_PREFIX: &str = "-dup-";
pub const SUFFIX_TOKEN_LEN: usize = 4;
pub const MAX_NAME_LENGTH: usize = 63;
pub const FALLBACK_NAME_BASE: &str = "pod";

/// Idle entrypoint used by --loop-command
pub const IDLE_COMMAND: [&str; 3] = ["sh", "-c", "trap : TERM INT; sleep infinity & wait"];

/// Restart policy of synthesized pods
pub const RESTART_POLICY_NEVER: &str = "Never";

/// Controller identity labels
pub const LABEL_POD_TEMPLATE_HASH: &str = "pod-template-hash";
pub const LABEL_CONTROLLER_REVISION_HASH: &str = "controller-revision-hash";

/// Annotations
pub const LAST_APPLIED_CONFIG_ANNOTATION: &str = "kubectl.kubernetes.io/last-applied-configuration";

/// Editor selection, first non-empty wins
pub const EDITOR_ENVS: [&str; 2] = ["KUBE_EDITOR", "EDITOR"];
pub const DEFAULT_EDITOR: &str = "vi";
pub const DEFAULT_WINDOWS_EDITOR: &str = "notepad";
pub const DEFAULT_SHELL: &str = "sh";
pub const DEFAULT_WINDOWS_SHELL: &str = "cmd";

/// Edit session temp files
pub const TEMP_FILE_PREFIX: &str = "kube-dup-edit-";

/// Configuration
pub const CONF_FILE_ENV: &str = "DUP_CONF_FILE";
pub const LOG_FILTER_DEFAULT: &str = "warn";
