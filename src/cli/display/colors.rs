//! Color theme for CLI output

use crate::domain::edit::CommitStatus;
use comfy_table::Color as TableColor;

/// Color theme for terminal output
#[derive(Debug, Clone)]
pub struct ColorTheme {
    pub success: TableColor,
    pub warning: TableColor,
    pub error: TableColor,
    pub info: TableColor,
    pub muted: TableColor,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            success: TableColor::Green,
            warning: TableColor::Yellow,
            error: TableColor::Red,
            info: TableColor::Cyan,
            muted: TableColor::DarkGrey,
        }
    }
}

impl ColorTheme {
    /// Get color for a commit result
    pub fn get_status_color(&self, status: &CommitStatus) -> TableColor {
        match status {
            CommitStatus::Created => self.success,
            CommitStatus::NotFound | CommitStatus::Unannotated(_) => self.warning,
            CommitStatus::Invalid(_) | CommitStatus::Failed(_) => self.error,
        }
    }
}
