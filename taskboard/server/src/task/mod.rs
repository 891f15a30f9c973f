use crate::entities::*;
use sea_orm::sea_query::Expr;
use sea_orm::*;
use std::sync::Arc;
use taskboard_core::{NewTask, Priority, Task, TaskId, TaskPatch};

pub mod api;

#[derive(Clone, Debug)]
pub struct TaskState {
    pub db: Arc<sea_orm::DatabaseConnection>,
}

/// Error type for TaskService operations.
#[derive(Debug, thiserror::Error)]
pub enum TaskServiceError {
    /// The task text is missing or blank.
    #[error("Task text is required")]
    Validation,
    /// An update carried no fields.
    #[error("No fields to update")]
    EmptyPatch,
    /// No row matched the given ID.
    #[error("Task with ID {0} not found")]
    TaskNotFound(TaskId),
    /// A stored row holds a value outside the task model.
    #[error("Task with ID {id} is corrupt: {reason}")]
    CorruptRow { id: TaskId, reason: String },
    /// Represents a database error.
    #[error("{0}")]
    Database(#[from] sea_orm::DbErr),
}

impl TryFrom<task::Model> for Task {
    type Error = TaskServiceError;

    fn try_from(model: task::Model) -> Result<Self, Self::Error> {
        let priority = model
            .priority
            .parse::<Priority>()
            .map_err(|err| TaskServiceError::CorruptRow {
                id: model.id,
                reason: err.to_string(),
            })?;
        Ok(Task::new(model.id, model.text, model.completed, priority))
    }
}

fn ensure_text(text: &str) -> Result<(), TaskServiceError> {
    if text.trim().is_empty() {
        return Err(TaskServiceError::Validation);
    }
    Ok(())
}

pub struct TaskService<'a> {
    db: &'a sea_orm::DatabaseConnection,
}

impl TaskService<'_> {
    pub fn new(db: &sea_orm::DatabaseConnection) -> TaskService<'_> {
        TaskService { db }
    }

    /// Inserts a new task. The store assigns the ID; `completed` starts out false.
    ///
    /// # Returns
    ///
    /// The created `Task`, or `TaskServiceError::Validation` if the text is blank.
    #[tracing::instrument(skip(self))]
    pub async fn create_task(&self, new_task: NewTask) -> Result<Task, TaskServiceError> {
        ensure_text(&new_task.text)?;

        let active_model = task::ActiveModel {
            text: ActiveValue::Set(new_task.text),
            completed: ActiveValue::Set(false),
            priority: ActiveValue::Set(new_task.priority.as_str().to_string()),
            ..Default::default()
        };
        let created_model = active_model.insert(self.db).await?;
        Task::try_from(created_model)
    }

    /// Retrieves all tasks, newest ID first.
    #[tracing::instrument(skip(self))]
    pub async fn get_all_tasks(&self) -> Result<Vec<Task>, TaskServiceError> {
        task::Entity::find()
            .order_by_desc(task::Column::Id)
            .all(self.db)
            .await?
            .into_iter()
            .map(Task::try_from)
            .collect()
    }

    /// Retrieves a task by its ID.
    #[tracing::instrument(skip(self))]
    pub async fn get_task_by_id(&self, id: TaskId) -> Result<Task, TaskServiceError> {
        let model = task::Entity::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or(TaskServiceError::TaskNotFound(id))?;
        Task::try_from(model)
    }

    /// Updates only the columns present in `patch`.
    ///
    /// # Returns
    ///
    /// `TaskServiceError::EmptyPatch` if nothing would change, and
    /// `TaskServiceError::TaskNotFound` if no row has the given ID.
    #[tracing::instrument(skip(self))]
    pub async fn update_task(&self, id: TaskId, patch: TaskPatch) -> Result<(), TaskServiceError> {
        if patch.is_empty() {
            return Err(TaskServiceError::EmptyPatch);
        }
        if let Some(text) = &patch.text {
            ensure_text(text)?;
        }

        let mut update = task::Entity::update_many().filter(task::Column::Id.eq(id));
        if let Some(text) = patch.text {
            update = update.col_expr(task::Column::Text, Expr::value(text));
        }
        if let Some(completed) = patch.completed {
            update = update.col_expr(task::Column::Completed, Expr::value(completed));
        }
        if let Some(priority) = patch.priority {
            update = update.col_expr(task::Column::Priority, Expr::value(priority.as_str()));
        }

        let result = update.exec(self.db).await?;
        if result.rows_affected == 0 {
            return Err(TaskServiceError::TaskNotFound(id));
        }
        Ok(())
    }

    /// Hard-deletes a task by its ID.
    #[tracing::instrument(skip(self))]
    pub async fn delete_task(&self, id: TaskId) -> Result<(), TaskServiceError> {
        let result = task::Entity::delete_by_id(id).exec(self.db).await?;
        if result.rows_affected == 0 {
            return Err(TaskServiceError::TaskNotFound(id));
        }
        Ok(())
    }
}
