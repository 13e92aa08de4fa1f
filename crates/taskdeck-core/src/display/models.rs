//! Display implementations for domain models.
//!
//! All output is markdown so the CLI renderer and MCP clients can show it
//! as-is. Todos render with a status icon (`✓ Done`, `○ Open`) and only the
//! sections that have content.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::models::{Difficulty, HistoryEntry, Priority, Project, ProjectSummary, TimeEstimate, Todo};

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Todo {
    pub fn status_with_icon(&self) -> &'static str {
        if self.completed {
            "✓ Done"
        } else {
            "○ Open"
        }
    }
}

impl fmt::Display for Todo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "### {} ({})", self.task, self.status_with_icon())?;
        writeln!(f)?;

        writeln!(f, "- ID: `{}`", self.id)?;
        if !self.category.is_empty() {
            writeln!(f, "- Category: {}", self.category)?;
        }
        writeln!(f, "- Priority: {}", self.priority.with_icon())?;
        writeln!(f, "- Difficulty: {}", self.difficulty)?;
        if let Some(time) = &self.time {
            writeln!(f, "- Estimate: {time}")?;
        }
        writeln!(f, "- Order: {}", self.order)?;
        if !self.dependencies.is_empty() {
            writeln!(f, "- Depends on: {}", self.dependencies.join(", "))?;
        }
        writeln!(f)?;

        if !self.explanation.is_empty() {
            writeln!(f, "{}", self.explanation)?;
            writeln!(f)?;
        }

        if let Some(notes) = self.notes.as_deref().filter(|n| !n.is_empty()) {
            writeln!(f, "#### Notes")?;
            writeln!(f)?;
            writeln!(f, "{notes}")?;
            writeln!(f)?;
        }

        Ok(())
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}", self.name)?;
        writeln!(f)?;

        writeln!(f, "- ID: `{}`", self.id)?;
        writeln!(
            f,
            "- Status: {}",
            if self.completed { "completed" } else { "open" }
        )?;
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;
        writeln!(
            f,
            "- Progress: {}/{} todos done",
            self.completed_count(),
            self.todos.len()
        )?;
        if let Some(prompt) = &self.prompt {
            writeln!(f, "- Prompt: {prompt}")?;
        }

        if !self.description.is_empty() {
            writeln!(f)?;
            writeln!(f, "{}", self.description)?;
        }

        if self.todos.is_empty() {
            writeln!(f, "\nNo todos in this project.")?;
        } else {
            writeln!(f, "\n## Todos")?;
            writeln!(f)?;
            for todo in &self.todos {
                write!(f, "{todo}")?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for ProjectSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let progress = if self.total_todos > 0 {
            format!(" ({}/{})", self.completed_todos, self.total_todos)
        } else {
            String::new()
        };
        let marker = if self.active { " ★" } else { "" };

        writeln!(f, "## {}{marker}{progress}", self.name)?;
        writeln!(f)?;
        writeln!(f, "- **ID**: `{}`", self.id)?;

        if !self.description.is_empty() {
            writeln!(f, "- **Description**: {}", self.description)?;
        }
        if self.completed {
            writeln!(f, "- **Status**: completed")?;
        }
        if self.estimated_minutes > 0 {
            writeln!(
                f,
                "- **Estimate**: {} remaining of {}",
                minutes_label(self.remaining_minutes),
                minutes_label(self.estimated_minutes)
            )?;
        }

        writeln!(f, "- **Created**: {}", LocalDateTime(&self.created_at))?;
        writeln!(f)?;

        Ok(())
    }
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {}. {}", self.id, self.name)?;
        writeln!(f)?;
        writeln!(f, "- **Prompt**: {}", self.prompt)?;
        writeln!(f, "- **Summary**: {}", self.description)?;
        if !self.tags.is_empty() {
            writeln!(f, "- **Tags**: {}", self.tags.join(", "))?;
        }
        writeln!(f, "- **Created**: {}", LocalDateTime(&self.created_at))?;
        writeln!(f)?;

        Ok(())
    }
}

/// Formats a minute total that may exceed `u32`.
fn minutes_label(minutes: u64) -> String {
    match u32::try_from(minutes) {
        Ok(m) => TimeEstimate::from_minutes(m).to_string(),
        Err(_) => format!("{minutes} min"),
    }
}
