use crate::task::TaskState;
use crate::task::api::v1;
use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        v1::list_tasks_handler,
        v1::create_task_handler,
        v1::update_task_handler,
        v1::delete_task_handler,
    ),
    components(schemas(
        v1::TaskJson,
        v1::CreateTaskRequest,
        v1::UpdateTaskRequest,
        v1::MessageResponse,
        v1::ErrorResponse,
    )),
    tags((name = "Tasks", description = "Task tracking endpoints"))
)]
pub struct ApiDoc;

/// Creates the API routes for JSON API endpoints, nested under `/api`.
pub fn create_api_router(task_state: TaskState) -> Router {
    let tasks_router = v1::create_api_router(task_state);
    Router::new()
        .nest("/api", tasks_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
