//! Filter and sort options for todo views.

use std::{cmp::Ordering, str::FromStr};

use super::{Difficulty, Priority, Todo};

/// Filter options for listing todos within a project.
#[derive(Debug, Clone, Default)]
pub struct TodoFilter {
    /// Filter by completion state
    pub completion: Option<CompletionFilter>,

    pub priority: Option<Priority>,

    pub difficulty: Option<Difficulty>,

    /// Filter by category (case-insensitive exact match)
    pub category: Option<String>,

    /// How to order the result
    pub sort: TodoSort,
}

impl TodoFilter {
    /// Whether `todo` passes every configured criterion.
    pub fn matches(&self, todo: &Todo) -> bool {
        let completion_ok = match self.completion {
            Some(CompletionFilter::Completed) => todo.completed,
            Some(CompletionFilter::Pending) => !todo.completed,
            None => true,
        };

        completion_ok
            && self.priority.is_none_or(|p| todo.priority == p)
            && self.difficulty.is_none_or(|d| todo.difficulty == d)
            && self
                .category
                .as_deref()
                .is_none_or(|c| todo.category.eq_ignore_ascii_case(c))
    }
}

/// Completion state filter options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionFilter {
    /// Only todos marked completed
    Completed,

    /// Only todos still open
    Pending,
}

/// Ordering applied to todo views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TodoSort {
    /// Insertion order, the display baseline
    #[default]
    Insertion,

    /// By the `order` hint, insertion order breaking ties
    Order,

    /// Most urgent first
    Priority,

    /// Shortest estimate first; todos without an estimate last
    Estimate,
}

impl TodoSort {
    /// Compares two todos; intended for a stable sort so ties keep
    /// insertion order.
    pub fn compare(&self, a: &Todo, b: &Todo) -> Ordering {
        match self {
            TodoSort::Insertion => Ordering::Equal,
            TodoSort::Order => a.order.cmp(&b.order),
            TodoSort::Priority => a.priority.cmp(&b.priority),
            TodoSort::Estimate => match (a.time, b.time) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
        }
    }
}

impl FromStr for TodoSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "insertion" | "default" => Ok(TodoSort::Insertion),
            "order" => Ok(TodoSort::Order),
            "priority" => Ok(TodoSort::Priority),
            "estimate" | "time" => Ok(TodoSort::Estimate),
            _ => Err(format!("Invalid sort: {s}")),
        }
    }
}
