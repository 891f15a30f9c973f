//! Plain-text rendering of a [`TaskManager`] and transient edit state.

use crate::api::TaskApi;
use crate::error::ClientError;
use crate::manager::TaskManager;
use taskboard_core::{Counts, Filter, Priority, SortMethod, Task, TaskId};

/// Filter button label, e.g. `Active (2)`.
pub fn filter_label(filter: Filter, counts: &Counts) -> String {
    let name = match filter {
        Filter::All => "All",
        Filter::Active => "Active",
        Filter::Completed => "Completed",
    };
    format!("{} ({})", name, counts.for_filter(filter))
}

/// All filter labels on one line, the current one in brackets.
pub fn filter_bar(current: Filter, counts: &Counts) -> String {
    Filter::ALL
        .iter()
        .map(|&filter| {
            let label = filter_label(filter, counts);
            if filter == current {
                format!("[{label}]")
            } else {
                label
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

pub fn sort_line(current: SortMethod) -> String {
    format!("Sort By: {}", current.label())
}

/// One task row: `> [x] #3 (High) text`. The leading `>` marks a selected task.
pub fn task_row(task: &Task, selected: bool) -> String {
    format!(
        "{} [{}] #{} ({}) {}",
        if selected { ">" } else { " " },
        if task.completed { "x" } else { " " },
        task.id,
        task.priority,
        task.text
    )
}

/// Bulk panel line, shown only while something is selected.
pub fn selection_panel(selected: usize) -> Option<String> {
    (selected > 0).then(|| format!("{selected} tasks selected"))
}

pub fn heading(shown: usize) -> String {
    format!("Tasks ({shown} shown)")
}

/// Renders the whole screen for the manager's current state.
pub fn render<A: TaskApi>(manager: &TaskManager<A>) -> String {
    let view = manager.view();
    let mut lines = vec![
        filter_bar(manager.filter(), &view.counts),
        sort_line(manager.sort_method()),
    ];
    if let Some(panel) = selection_panel(manager.selected_ids().len()) {
        lines.push(panel);
    }
    lines.push(heading(view.tasks.len()));
    lines.extend(
        view.tasks
            .iter()
            .map(|task| task_row(task, manager.is_selected(task.id))),
    );
    if let Some(err) = manager.last_error() {
        lines.push(format!("Error: {err}"));
    }
    lines.join("\n")
}

/// Fields of a task while it is being edited, before they are saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    id: TaskId,
    text: String,
    priority: Priority,
}

impl EditDraft {
    /// Starts editing from the task's current values.
    pub fn begin(task: &Task) -> Self {
        Self {
            id: task.id,
            text: task.text.clone(),
            priority: task.priority,
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
    }

    /// Saves the draft. On failure the draft is handed back so editing can continue.
    pub async fn commit<A: TaskApi>(
        self,
        manager: &mut TaskManager<A>,
    ) -> Result<(), (Self, ClientError)> {
        match manager.save_edit(self.id, &self.text, self.priority).await {
            Ok(()) => Ok(()),
            Err(err) => Err((self, err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockTaskApi;

    fn counts() -> Counts {
        Counts {
            all: 3,
            active: 2,
            completed: 1,
        }
    }

    #[test]
    fn can_label_filters_with_counts() {
        assert_eq!(filter_label(Filter::All, &counts()), "All (3)");
        assert_eq!(filter_label(Filter::Active, &counts()), "Active (2)");
        assert_eq!(filter_label(Filter::Completed, &counts()), "Completed (1)");
    }

    #[test]
    fn can_mark_current_filter() {
        assert_eq!(
            filter_bar(Filter::Active, &counts()),
            "All (3)  [Active (2)]  Completed (1)"
        );
    }

    #[test]
    fn can_render_task_rows() {
        let task = Task::new(3, "walk dog", true, Priority::High);
        assert_eq!(task_row(&task, false), "  [x] #3 (High) walk dog");
        assert_eq!(task_row(&task, true), "> [x] #3 (High) walk dog");
    }

    #[test]
    fn can_hide_selection_panel_when_nothing_selected() {
        assert_eq!(selection_panel(0), None);
        assert_eq!(selection_panel(2), Some("2 tasks selected".to_string()));
    }

    #[tokio::test]
    async fn can_render_manager() {
        let mut api = MockTaskApi::new();
        api.expect_list_tasks().returning(|| {
            Ok(vec![
                Task::new(2, "b", true, Priority::Low),
                Task::new(1, "a", false, Priority::Medium),
            ])
        });
        let mut manager = TaskManager::load(api).await;
        manager.set_filter(Filter::Active);
        manager.toggle_select(1);

        let screen = render(&manager);

        assert_eq!(
            screen,
            [
                "All (2)  [Active (1)]  Completed (1)",
                "Sort By: Default",
                "1 tasks selected",
                "Tasks (1 shown)",
                "> [ ] #1 (Medium) a",
            ]
            .join("\n")
        );
    }

    #[tokio::test]
    async fn can_return_draft_when_commit_fails() {
        let mut api = MockTaskApi::new();
        api.expect_list_tasks()
            .returning(|| Ok(vec![Task::new(1, "a", false, Priority::Medium)]));
        api.expect_update_task().never();
        let mut manager = TaskManager::load(api).await;
        let mut draft = EditDraft::begin(&manager.tasks()[0]);
        draft.set_text("");

        let result = draft.commit(&mut manager).await;

        let (draft, err) = result.unwrap_err();
        assert_eq!(draft.id(), 1);
        assert!(matches!(err, ClientError::Validation(_)));
    }

    #[tokio::test]
    async fn can_commit_draft() {
        let mut api = MockTaskApi::new();
        api.expect_list_tasks()
            .returning(|| Ok(vec![Task::new(1, "a", false, Priority::Medium)]));
        api.expect_update_task().times(1).returning(|_, _| Ok(()));
        let mut manager = TaskManager::load(api).await;
        let mut draft = EditDraft::begin(&manager.tasks()[0]);
        draft.set_text("renamed");
        draft.set_priority(Priority::Low);

        draft.commit(&mut manager).await.unwrap();

        assert_eq!(
            manager.tasks()[0],
            Task::new(1, "renamed", false, Priority::Low)
        );
    }
}
