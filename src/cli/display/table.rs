//! Table rendering for CLI output

use super::{ColorTheme, StatusIcon};
use crate::domain::edit::{CommitStatus, CommitSummary};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};

/// Table renderer for formatted output
pub struct TableRenderer {
    theme: ColorTheme,
}

impl Default for TableRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TableRenderer {
    /// Create a new table renderer with default theme
    pub fn new() -> Self {
        Self {
            theme: ColorTheme::default(),
        }
    }

    /// Render one row per commit attempt
    pub fn render_commit_summary(&self, summary: &CommitSummary) -> String {
        if summary.records.is_empty() {
            return "No objects were created".to_string();
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("KIND").set_alignment(CellAlignment::Left),
                Cell::new("NAME").set_alignment(CellAlignment::Left),
                Cell::new("NAMESPACE").set_alignment(CellAlignment::Left),
                Cell::new("STATUS").set_alignment(CellAlignment::Center),
                Cell::new("MESSAGE").set_alignment(CellAlignment::Left),
            ]);

        for record in &summary.records {
            let message = match &record.status {
                CommitStatus::Invalid(message)
                | CommitStatus::Failed(message)
                | CommitStatus::Unannotated(message) => message.as_str(),
                CommitStatus::NotFound => "not found on the server",
                CommitStatus::Created => "",
            };

            table.add_row(vec![
                Cell::new(&record.object.kind),
                Cell::new(&record.object.name),
                Cell::new(&record.object.namespace),
                Cell::new(format!(
                    "{} {}",
                    StatusIcon::get_status_icon(&record.status),
                    StatusIcon::get_status_text(&record.status)
                ))
                .fg(self.theme.get_status_color(&record.status)),
                Cell::new(message).fg(self.theme.muted),
            ]);
        }

        let mut output = String::new();
        output.push_str(&format!(
            "╭─ Duplicates {} ─╮\n",
            format!(
                "[{} created / {} total]",
                summary.created_count(),
                summary.records.len()
            )
            .bright_black()
        ));
        output.push_str(&table.to_string());
        output.push('\n');
        output.push_str(&format!(
            "Legend: {} Created  {} Not found  {} Failed\n",
            StatusIcon::SUCCESS.green(),
            StatusIcon::WARNING.yellow(),
            StatusIcon::ERROR.red()
        ));

        output
    }
}
