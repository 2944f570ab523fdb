use std::sync::Arc;

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::task::TaskState;
use crate::task::api::v1;

#[derive(OpenApi)]
#[openapi(
    info(title = "Task Manager API Documentation", version = "1.0"),
    paths(
        v1::add_new_task_handler,
        v1::complete_task_handler,
        v1::get_recent_tasks_handler
    ),
    components(schemas(
        v1::TaskJson,
        v1::NewTaskRequest,
        v1::NewTaskResponse,
        v1::CompleteTaskResponse,
        v1::RecentTasksResponse,
        v1::ErrorResponse
    )),
    tags((name = "task", description = "Task lifecycle endpoints"))
)]
pub struct ApiDoc;

/// Creates the API routes for JSON API endpoints, mounted under `/api`, plus the API documentation.
pub fn create_api_router(task_state: Arc<TaskState>) -> Router {
    let task_routes = v1::create_api_router(task_state);
    Router::new()
        .nest("/api", task_routes)
        .merge(SwaggerUi::new("/api-documentation").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
