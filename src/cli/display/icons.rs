//! Status icons for CLI output

use crate::domain::edit::CommitStatus;

/// Status icons for different states
pub struct StatusIcon;

impl StatusIcon {
    /// Success icon (object created)
    pub const SUCCESS: &'static str = "✓";

    /// Warning icon (object gone from the server)
    pub const WARNING: &'static str = "⚠";

    /// Error icon (create rejected or failed)
    pub const ERROR: &'static str = "✗";

    pub fn get_status_icon(status: &CommitStatus) -> &'static str {
        match status {
            CommitStatus::Created => Self::SUCCESS,
            CommitStatus::NotFound | CommitStatus::Unannotated(_) => Self::WARNING,
            CommitStatus::Invalid(_) | CommitStatus::Failed(_) => Self::ERROR,
        }
    }

    pub fn get_status_text(status: &CommitStatus) -> &'static str {
        match status {
            CommitStatus::Created => "Created",
            CommitStatus::Unannotated(_) => "Unannotated",
            CommitStatus::NotFound => "NotFound",
            CommitStatus::Invalid(_) => "Invalid",
            CommitStatus::Failed(_) => "Failed",
        }
    }
}
