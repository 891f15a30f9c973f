//! Local replica of the server's task collection.
//!
//! [`TaskManager`] owns the replica and every piece of client state derived
//! from it. Operations that talk to the server take `&mut self`, so at most one
//! is in flight per manager: the pending text is snapshotted and cannot change
//! underneath an `add_task`, and no response can land after a later operation
//! has started. On failure the replica is left exactly as it was and the error
//! becomes [`TaskManager::last_error`].

use crate::api::TaskApi;
use crate::error::{BulkFailure, ClientError};
use futures::future::join_all;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use taskboard_core::{
    DerivedView, Filter, NewTask, Priority, SortMethod, Task, TaskId, TaskPatch, derive,
};

const TEXT_REQUIRED: &str = "Task text is required";

/// Action applied to every selected task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkAction {
    Complete,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown bulk action '{0}', expected complete or delete")]
pub struct ParseBulkActionError(pub String);

impl fmt::Display for BulkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BulkAction::Complete => f.write_str("complete"),
            BulkAction::Delete => f.write_str("delete"),
        }
    }
}

impl FromStr for BulkAction {
    type Err = ParseBulkActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "complete" => Ok(BulkAction::Complete),
            "delete" => Ok(BulkAction::Delete),
            other => Err(ParseBulkActionError(other.to_string())),
        }
    }
}

pub struct TaskManager<A> {
    api: A,
    tasks: Vec<Task>,
    task_text: String,
    loading: bool,
    last_error: Option<ClientError>,
    filter: Filter,
    sort_method: SortMethod,
    selected_ids: BTreeSet<TaskId>,
}

impl<A: TaskApi> TaskManager<A> {
    /// Creates a manager and populates the replica from the server.
    ///
    /// A failed initial load is recorded in `last_error` and leaves the replica empty.
    pub async fn load(api: A) -> Self {
        let mut manager = TaskManager {
            api,
            tasks: Vec::new(),
            task_text: String::new(),
            loading: false,
            last_error: None,
            filter: Filter::default(),
            sort_method: SortMethod::default(),
            selected_ids: BTreeSet::new(),
        };
        // The failure is kept in last_error.
        let _ = manager.reload().await;
        manager
    }

    /// Replaces the replica with a fresh List from the server.
    #[tracing::instrument(skip(self))]
    pub async fn reload(&mut self) -> Result<(), ClientError> {
        self.begin();
        let result = self.api.list_tasks().await;
        let tasks = self.settle(result, "fetching tasks")?;
        self.tasks = tasks;
        self.selected_ids.retain(|id| self.tasks.iter().any(|task| task.id == *id));
        Ok(())
    }

    /// Creates a task from the trimmed pending text.
    ///
    /// Does nothing and returns `Ok(None)` when the text is blank. The pending
    /// text is cleared only once the server has accepted the task.
    #[tracing::instrument(skip(self))]
    pub async fn add_task(&mut self, priority: Priority) -> Result<Option<Task>, ClientError> {
        let text = self.task_text.trim().to_string();
        if text.is_empty() {
            return Ok(None);
        }

        self.begin();
        let result = self.api.create_task(NewTask::new(text, priority)).await;
        let task = self.settle(result, "adding task")?;
        self.tasks.insert(0, task.clone());
        self.task_text.clear();
        Ok(Some(task))
    }

    /// Flips `completed` for the task. Unknown ids are ignored.
    #[tracing::instrument(skip(self))]
    pub async fn toggle_complete(&mut self, id: TaskId) -> Result<(), ClientError> {
        let Some(current) = self.find(id).map(|task| task.completed) else {
            return Ok(());
        };
        let completed = !current;

        self.begin();
        let result = self
            .api
            .update_task(id, TaskPatch::completed(completed))
            .await;
        self.settle(result, "toggling completion")?;
        if let Some(task) = self.find_mut(id) {
            task.completed = completed;
        }
        Ok(())
    }

    /// Replaces the text and priority of a task. Blank text is rejected
    /// locally, without a request.
    #[tracing::instrument(skip(self))]
    pub async fn save_edit(
        &mut self,
        id: TaskId,
        text: &str,
        priority: Priority,
    ) -> Result<(), ClientError> {
        let text = text.trim();
        if text.is_empty() {
            let result = Err(ClientError::Validation(TEXT_REQUIRED.to_string()));
            return self.settle(result, "updating task");
        }

        let patch = TaskPatch::text(text).with_priority(priority);
        self.patch(id, patch, "updating task").await
    }

    /// Changes only the priority of a task.
    #[tracing::instrument(skip(self))]
    pub async fn update_priority(
        &mut self,
        id: TaskId,
        priority: Priority,
    ) -> Result<(), ClientError> {
        self.patch(id, TaskPatch::priority(priority), "updating priority")
            .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_task(&mut self, id: TaskId) -> Result<(), ClientError> {
        self.begin();
        let result = self.api.delete_task(id).await;
        self.settle(result, "deleting task")?;
        self.tasks.retain(|task| task.id != id);
        self.selected_ids.remove(&id);
        Ok(())
    }

    /// Adds the id to the selection, or removes it if already selected.
    pub fn toggle_select(&mut self, id: TaskId) {
        if !self.selected_ids.remove(&id) {
            self.selected_ids.insert(id);
        }
    }

    pub fn clear_selections(&mut self) {
        self.selected_ids.clear();
    }

    /// Runs `action` for every selected id concurrently, then reconciles.
    ///
    /// Only ids whose call succeeded are changed in the replica and leave the
    /// selection; failed ids stay selected and are reported together as
    /// [`ClientError::PartialBulkFailure`].
    #[tracing::instrument(skip(self))]
    pub async fn bulk_action(&mut self, action: BulkAction) -> Result<(), ClientError> {
        if self.selected_ids.is_empty() {
            return Ok(());
        }
        let ids: Vec<TaskId> = self.selected_ids.iter().copied().collect();

        self.begin();
        let api = &self.api;
        let results = join_all(ids.iter().map(|&id| async move {
            let result = match action {
                BulkAction::Complete => api.update_task(id, TaskPatch::completed(true)).await,
                BulkAction::Delete => api.delete_task(id).await,
            };
            (id, result)
        }))
        .await;

        let mut succeeded = BTreeSet::new();
        let mut failed = Vec::new();
        for (id, result) in results {
            match result {
                Ok(()) => {
                    succeeded.insert(id);
                }
                Err(err) => {
                    tracing::warn!("Bulk {} failed for task {}: {}", action, id, err);
                    failed.push(id);
                }
            }
        }

        match action {
            BulkAction::Complete => {
                for task in self.tasks.iter_mut().filter(|task| succeeded.contains(&task.id)) {
                    task.completed = true;
                }
            }
            BulkAction::Delete => self.tasks.retain(|task| !succeeded.contains(&task.id)),
        }
        self.selected_ids.retain(|id| !succeeded.contains(id));

        let result = if failed.is_empty() {
            Ok(())
        } else {
            Err(ClientError::PartialBulkFailure(BulkFailure {
                failed,
                total: ids.len(),
            }))
        };
        self.settle(result, "performing bulk action")
    }

    /// Filtered and sorted projection of the replica under the current settings.
    pub fn view(&self) -> DerivedView {
        derive(&self.tasks, self.filter, self.sort_method)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task_text(&self) -> &str {
        &self.task_text
    }

    pub fn set_task_text(&mut self, text: impl Into<String>) {
        self.task_text = text.into();
    }

    /// True while a request is outstanding. Because operations borrow the
    /// manager mutably, callers only observe `true` after an operation future
    /// was dropped before its response arrived; the next operation resets it.
    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&ClientError> {
        self.last_error.as_ref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    pub fn sort_method(&self) -> SortMethod {
        self.sort_method
    }

    pub fn set_sort_method(&mut self, sort_method: SortMethod) {
        self.sort_method = sort_method;
    }

    pub fn selected_ids(&self) -> &BTreeSet<TaskId> {
        &self.selected_ids
    }

    pub fn is_selected(&self, id: TaskId) -> bool {
        self.selected_ids.contains(&id)
    }

    async fn patch(
        &mut self,
        id: TaskId,
        patch: TaskPatch,
        context: &str,
    ) -> Result<(), ClientError> {
        self.begin();
        let result = self.api.update_task(id, patch.clone()).await;
        self.settle(result, context)?;
        if let Some(task) = self.find_mut(id) {
            task.apply(&patch);
        }
        Ok(())
    }

    fn find(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    fn find_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id == id)
    }

    fn begin(&mut self) {
        self.loading = true;
        self.last_error = None;
    }

    /// Clears the loading flag and records a failure as the latest error.
    fn settle<T>(
        &mut self,
        result: Result<T, ClientError>,
        context: &str,
    ) -> Result<T, ClientError> {
        self.loading = false;
        if let Err(err) = &result {
            tracing::error!("Error {}: {}", context, err);
            self.last_error = Some(err.clone());
        }
        result
    }
}
