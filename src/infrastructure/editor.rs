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

use crate::infrastructure::constants::{
    DEFAULT_EDITOR, DEFAULT_SHELL, DEFAULT_WINDOWS_EDITOR, DEFAULT_WINDOWS_SHELL, EDITOR_ENVS,
};
use crate::shared::error::{DupError, Result};
use std::path::Path;
use tokio::process::Command;
use tracing::debug;

/// Opens a file for interactive editing and returns once the user is done.
#[async_trait::async_trait]
pub trait Editor: Send + Sync {
    async fn edit(&self, path: &Path) -> Result<()>;
}

/// Launches the user's editor as a child process attached to the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalEditor {
    args: Vec<String>,
    shell: bool,
}

impl ExternalEditor {
    /// First non-empty variable in `envs`, then `configured`, then the platform default.
    pub fn resolve(envs: &[&str], configured: Option<&str>) -> Self {
        let from_env = envs
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .find(|value| !value.trim().is_empty());

        let editor = from_env
            .or_else(|| configured.map(str::to_string).filter(|v| !v.trim().is_empty()))
            .unwrap_or_else(|| default_editor().to_string());
        Self::from_command(editor.trim())
    }

    pub fn from_env() -> Self {
        Self::resolve(&EDITOR_ENVS, None)
    }

    /// A command with arguments (`code --wait`) goes through the shell.
    pub fn from_command(command: &str) -> Self {
        if command.contains(char::is_whitespace) {
            let (shell, flag) = default_shell();
            Self {
                args: vec![shell, flag.to_string(), command.to_string()],
                shell: true,
            }
        } else {
            Self {
                args: vec![command.to_string()],
                shell: false,
            }
        }
    }

    fn command_for(&self, path: &Path) -> Result<Command> {
        let (program, rest) = self
            .args
            .split_first()
            .ok_or_else(|| DupError::Editor("no editor configured".to_string()))?;

        let mut cmd = Command::new(program);
        if self.shell {
            let mut args = rest.to_vec();
            if let Some(line) = args.last_mut() {
                line.push(' ');
                line.push_str(&shell_quote(&path.to_string_lossy()));
            }
            cmd.args(args);
        } else {
            cmd.args(rest).arg(path);
        }
        Ok(cmd)
    }
}

#[async_trait::async_trait]
impl Editor for ExternalEditor {
    async fn edit(&self, path: &Path) -> Result<()> {
        let mut cmd = self.command_for(path)?;
        debug!("launching editor {:?} on {}", self.args, path.display());

        let status = cmd.status().await.map_err(|e| {
            DupError::Editor(format!(
                "unable to launch the editor {:?}: {}",
                self.args.join(" "),
                e
            ))
        })?;

        if !status.success() {
            return Err(DupError::Editor(format!(
                "there was a problem with the editor {:?}: {}",
                self.args.join(" "),
                status
            )));
        }
        Ok(())
    }
}

fn default_editor() -> &'static str {
    if cfg!(windows) {
        DEFAULT_WINDOWS_EDITOR
    } else {
        DEFAULT_EDITOR
    }
}

fn default_shell() -> (String, &'static str) {
    if cfg!(windows) {
        (DEFAULT_WINDOWS_SHELL.to_string(), "/C")
    } else {
        let shell = std::env::var("SHELL")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SHELL.to_string());
        (shell, "-c")
    }
}

fn shell_quote(path: &str) -> String {
    if cfg!(windows) {
        format!("\"{}\"", path)
    } else {
        format!("'{}'", path.replace('\'', r"'\''"))
    }
}
