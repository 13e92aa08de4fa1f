//! Collection wrapper types for displaying groups of domain objects.
//!
//! Each wrapper borrows its slice, takes an optional `# title` header and
//! prints a fixed message when the slice is empty.

use std::fmt;

use crate::models::{HistoryEntry, ProjectSummary, Todo};

/// Formats a list of project summaries.
///
/// ```rust
/// use taskdeck_core::{display::ProjectList, models::{Project, ProjectSummary}};
///
/// let project = Project::new("My Project", "A test project");
/// let summaries = vec![ProjectSummary::from(&project)];
/// let output = ProjectList::with_title(&summaries, "Projects").to_string();
/// assert!(output.starts_with("# Projects"));
/// assert!(output.contains("My Project"));
/// ```
pub struct ProjectList<'a> {
    projects: &'a [ProjectSummary],
    title: Option<&'a str>,
}

impl<'a> ProjectList<'a> {
    pub fn new(projects: &'a [ProjectSummary]) -> Self {
        Self {
            projects,
            title: None,
        }
    }

    pub fn with_title(projects: &'a [ProjectSummary], title: &'a str) -> Self {
        Self {
            projects,
            title: Some(title),
        }
    }
}

impl fmt::Display for ProjectList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(title) = self.title {
            writeln!(f, "# {title}")?;
            writeln!(f)?;
        }

        if self.projects.is_empty() {
            writeln!(f, "No projects found.")?;
            return Ok(());
        }

        for project in self.projects {
            write!(f, "{project}")?;
        }

        Ok(())
    }
}

/// Formats a list of borrowed todos, as returned by the store views.
pub struct TodoList<'a> {
    todos: &'a [&'a Todo],
    title: Option<&'a str>,
}

impl<'a> TodoList<'a> {
    pub fn new(todos: &'a [&'a Todo]) -> Self {
        Self { todos, title: None }
    }

    pub fn with_title(todos: &'a [&'a Todo], title: &'a str) -> Self {
        Self {
            todos,
            title: Some(title),
        }
    }
}

impl fmt::Display for TodoList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(title) = self.title {
            writeln!(f, "# {title}")?;
            writeln!(f)?;
        }

        if self.todos.is_empty() {
            writeln!(f, "No todos found.")?;
            return Ok(());
        }

        for todo in self.todos {
            write!(f, "{todo}")?;
        }

        Ok(())
    }
}

/// Formats generation history entries, newest first as supplied.
pub struct HistoryList<'a> {
    entries: &'a [HistoryEntry],
    title: Option<&'a str>,
}

impl<'a> HistoryList<'a> {
    pub fn new(entries: &'a [HistoryEntry]) -> Self {
        Self {
            entries,
            title: None,
        }
    }

    pub fn with_title(entries: &'a [HistoryEntry], title: &'a str) -> Self {
        Self {
            entries,
            title: Some(title),
        }
    }
}

impl fmt::Display for HistoryList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(title) = self.title {
            writeln!(f, "# {title}")?;
            writeln!(f)?;
        }

        if self.entries.is_empty() {
            writeln!(f, "No history entries found.")?;
            return Ok(());
        }

        for entry in self.entries {
            write!(f, "{entry}")?;
        }

        Ok(())
    }
}
