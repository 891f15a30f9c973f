use crate::task::{TaskService, TaskServiceError, TaskState};
use axum::{
    Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, put},
};
use serde::{Deserialize, Serialize};
use taskboard_core::{NewTask, Priority, Task, TaskId, TaskPatch};
use utoipa::ToSchema;

/// JSON representation of a Task for API responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TaskJson {
    /// Unique identifier assigned by the store
    id: TaskId,
    /// Description of the task
    text: String,
    /// Whether the task is done
    completed: bool,
    /// One of High, Medium, Low
    #[schema(value_type = String, example = "Medium")]
    priority: Priority,
}

impl From<Task> for TaskJson {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            text: task.text,
            completed: task.completed,
            priority: task.priority,
        }
    }
}

/// Request body for POST /api/tasks.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTaskRequest {
    /// Description of the task, must not be blank
    #[serde(default)]
    text: Option<String>,
    /// Defaults to Medium
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    priority: Option<Priority>,
}

/// Request body for PUT /api/tasks/{id}. Absent fields are left untouched.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTaskRequest {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    completed: Option<bool>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    priority: Option<Priority>,
}

impl From<UpdateTaskRequest> for TaskPatch {
    fn from(request: UpdateTaskRequest) -> Self {
        TaskPatch {
            text: request.text,
            completed: request.completed,
            priority: request.priority,
        }
    }
}

/// Confirmation body for update and delete.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// JSON response for API errors.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Custom error type for task API handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request body or path could not be understood.
    #[error("{0}")]
    BadRequest(String),
    /// Represents a failure reported by the task service.
    #[error(transparent)]
    Service(#[from] TaskServiceError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status_code, error) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Service(err) => match err {
                TaskServiceError::Validation | TaskServiceError::EmptyPatch => {
                    (StatusCode::BAD_REQUEST, err.to_string())
                }
                TaskServiceError::TaskNotFound(id) => {
                    tracing::warn!("Task with ID {} not found", id);
                    (StatusCode::NOT_FOUND, "Task not found".to_string())
                }
                TaskServiceError::CorruptRow { .. } | TaskServiceError::Database(_) => {
                    tracing::error!("Task storage failure: {}", err);
                    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
                }
            },
        };
        (status_code, Json(ErrorResponse::new(error))).into_response()
    }
}

/// Handler for GET /api/tasks - Returns all tasks, newest first.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/tasks",
    responses(
        (status = 200, description = "All tasks, newest ID first", body = Vec<TaskJson>),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn list_tasks_handler(
    State(state): State<TaskState>,
) -> Result<Json<Vec<TaskJson>>, ApiError> {
    let service = TaskService::new(&state.db);
    let tasks = service.get_all_tasks().await?;
    Ok(Json(tasks.into_iter().map(TaskJson::from).collect()))
}

/// Handler for POST /api/tasks - Creates a task.
#[tracing::instrument(skip(state, payload))]
#[utoipa::path(
    post,
    path = "/api/tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 200, description = "The created task", body = TaskJson),
        (status = 400, description = "Missing or blank text", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn create_task_handler(
    State(state): State<TaskState>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<Json<TaskJson>, ApiError> {
    let Json(request) = payload?;
    let text = request.text.ok_or(TaskServiceError::Validation)?;
    let new_task = NewTask::new(text, request.priority.unwrap_or_default());

    let service = TaskService::new(&state.db);
    let task = service.create_task(new_task).await?;
    tracing::info!("Created task {}", task.id);
    Ok(Json(TaskJson::from(task)))
}

/// Handler for PUT /api/tasks/{id} - Applies a partial update.
#[tracing::instrument(skip(state, payload))]
#[utoipa::path(
    put,
    path = "/api/tasks/{id}",
    params(("id" = i32, Path, description = "Task ID")),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "Task updated", body = MessageResponse),
        (status = 400, description = "Empty patch or blank text", body = ErrorResponse),
        (status = 404, description = "Unknown task", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn update_task_handler(
    State(state): State<TaskState>,
    id: Result<Path<TaskId>, PathRejection>,
    payload: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(id) = id?;
    let Json(request) = payload?;

    let service = TaskService::new(&state.db);
    service.update_task(id, TaskPatch::from(request)).await?;
    Ok(Json(MessageResponse::new("Task updated successfully")))
}

/// Handler for DELETE /api/tasks/{id} - Deletes a task.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    delete,
    path = "/api/tasks/{id}",
    params(("id" = i32, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task deleted", body = MessageResponse),
        (status = 404, description = "Unknown task", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn delete_task_handler(
    State(state): State<TaskState>,
    id: Result<Path<TaskId>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(id) = id?;

    let service = TaskService::new(&state.db);
    service.delete_task(id).await?;
    Ok(Json(MessageResponse::new("Task deleted successfully")))
}

/// Creates and returns the tasks API router.
pub fn create_api_router(state: TaskState) -> Router {
    Router::new()
        .route("/tasks", get(list_tasks_handler).post(create_task_handler))
        .route(
            "/tasks/{id}",
            put(update_task_handler).delete(delete_task_handler),
        )
        .with_state(state)
}
