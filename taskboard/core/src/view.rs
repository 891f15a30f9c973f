//! Pure projections of the task collection: filtering, sorting and counts.
//!
//! Nothing here mutates its input. Sorting is stable, so tasks that compare
//! equal under the chosen [`SortMethod`] keep their filtered order.

use crate::task::Task;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which tasks are visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown filter '{0}', expected one of all, active, completed")]
pub struct ParseFilterError(pub String);

impl Filter {
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Active, Filter::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Active => "active",
            Filter::Completed => "completed",
        }
    }

    /// Returns true if the task is visible under this filter.
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !task.completed,
            Filter::Completed => task.completed,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Filter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Filter::ALL
            .into_iter()
            .find(|filter| filter.as_str() == s)
            .ok_or_else(|| ParseFilterError(s.to_string()))
    }
}

/// Ordering applied after filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SortMethod {
    #[default]
    Default,
    PriorityDesc,
    TextAsc,
    TextDesc,
    CompletedDesc,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "Unknown sort method '{0}', expected one of default, priority_desc, text_asc, text_desc, completed_desc"
)]
pub struct ParseSortMethodError(pub String);

impl SortMethod {
    pub const ALL: [SortMethod; 5] = [
        SortMethod::Default,
        SortMethod::PriorityDesc,
        SortMethod::TextAsc,
        SortMethod::TextDesc,
        SortMethod::CompletedDesc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortMethod::Default => "default",
            SortMethod::PriorityDesc => "priority_desc",
            SortMethod::TextAsc => "text_asc",
            SortMethod::TextDesc => "text_desc",
            SortMethod::CompletedDesc => "completed_desc",
        }
    }

    /// Human readable label used by sort pickers.
    pub fn label(&self) -> &'static str {
        match self {
            SortMethod::Default => "Default",
            SortMethod::PriorityDesc => "Priority (High-Low)",
            SortMethod::TextAsc => "Name (A-Z)",
            SortMethod::TextDesc => "Name (Z-A)",
            SortMethod::CompletedDesc => "Completed",
        }
    }

    /// Compares two tasks. `Equal` means "keep the existing order".
    pub fn compare(&self, a: &Task, b: &Task) -> Ordering {
        match self {
            SortMethod::Default => Ordering::Equal,
            SortMethod::PriorityDesc => b.priority.rank().cmp(&a.priority.rank()),
            SortMethod::TextAsc => compare_text(&a.text, &b.text),
            SortMethod::TextDesc => compare_text(&b.text, &a.text),
            // false sorts before true, so incomplete tasks come first
            SortMethod::CompletedDesc => a.completed.cmp(&b.completed),
        }
    }
}

/// Case-insensitive order, falling back to byte order so `Buy` and `buy`
/// still compare deterministically.
fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

impl fmt::Display for SortMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMethod {
    type Err = ParseSortMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortMethod::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| ParseSortMethodError(s.to_string()))
    }
}

/// Task counts over the whole, unfiltered collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Counts {
    pub all: usize,
    pub active: usize,
    pub completed: usize,
}

impl Counts {
    pub fn of(tasks: &[Task]) -> Self {
        let completed = tasks.iter().filter(|task| task.completed).count();
        Counts {
            all: tasks.len(),
            active: tasks.len() - completed,
            completed,
        }
    }

    /// Count shown next to a filter button.
    pub fn for_filter(&self, filter: Filter) -> usize {
        match filter {
            Filter::All => self.all,
            Filter::Active => self.active,
            Filter::Completed => self.completed,
        }
    }
}

/// Result of [`derive`]: the visible tasks plus counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivedView {
    pub tasks: Vec<Task>,
    pub counts: Counts,
}

/// Filters, then stably sorts, a copy of `tasks`.
pub fn derive(tasks: &[Task], filter: Filter, sort_method: SortMethod) -> DerivedView {
    let mut visible: Vec<Task> = tasks
        .iter()
        .filter(|task| filter.matches(task))
        .cloned()
        .collect();
    if sort_method != SortMethod::Default {
        visible.sort_by(|a, b| sort_method.compare(a, b));
    }
    DerivedView {
        tasks: visible,
        counts: Counts::of(tasks),
    }
}
