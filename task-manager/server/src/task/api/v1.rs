use crate::task::{RECENT_TASKS_LIMIT, TaskService, TaskServiceError, TaskState};
use axum::{
    Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, patch, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use task_manager_core::{NewTask, Task, TaskId};
use utoipa::ToSchema;

/// Message returned to callers for any failure that is not their fault.
const GENERIC_ERROR_MESSAGE: &str = "Something went wrong";

/// JSON representation of a Task for API responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskJson {
    /// Unique identifier assigned by the store
    id: TaskId,
    /// Title of the task
    title: String,
    /// Lifecycle state, `NOT_DONE` or `DONE`
    #[schema(example = "NOT_DONE")]
    status: String,
    /// Free-form description of the task
    description: String,
    /// Creation time, the ordering key for recent tasks
    created_at: DateTime<Utc>,
    /// Time of the last change
    updated_at: DateTime<Utc>,
}

impl From<Task> for TaskJson {
    fn from(task: Task) -> Self {
        Self {
            id: task.id(),
            title: task.title().to_string(),
            status: task.status().as_str().to_string(),
            description: task.description().to_string(),
            created_at: task.created_at(),
            updated_at: task.updated_at(),
        }
    }
}

/// Request body for creating a task.
#[derive(Debug, Deserialize, ToSchema)]
pub struct NewTaskRequest {
    /// Title of the task, must not be empty
    #[schema(example = "Buy milk")]
    title: String,
    /// Description of the task, must not be empty
    #[schema(example = "2%")]
    description: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewTaskBody {
    new_task: TaskJson,
}

/// API response for a newly created task.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewTaskResponse {
    #[schema(example = 201)]
    status_code: u16,
    message: String,
    body: NewTaskBody,
}

#[derive(Debug, Default, Serialize, ToSchema)]
pub struct EmptyBody {}

/// API response for a completed task.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompleteTaskResponse {
    #[schema(example = 200)]
    status_code: u16,
    message: String,
    body: EmptyBody,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecentTasksBody {
    tasks: Vec<TaskJson>,
}

/// API response for listing recent pending tasks.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecentTasksResponse {
    #[schema(example = 200)]
    status_code: u16,
    body: RecentTasksBody,
}

/// JSON response for API errors.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    message: String,
    /// Reason phrase of the status code
    #[schema(example = "Not Found")]
    error: String,
    #[schema(example = 404)]
    status_code: u16,
}

impl ErrorResponse {
    pub fn new(status_code: StatusCode, message: String) -> Self {
        Self {
            message,
            error: status_code
                .canonical_reason()
                .unwrap_or_default()
                .to_string(),
            status_code: status_code.as_u16(),
        }
    }
}

/// Error type for the task JSON API.
#[derive(Debug, thiserror::Error)]
pub enum TaskApiError {
    /// The request was malformed or failed validation.
    #[error("{0}")]
    Validation(String),
    /// The task service failed.
    #[error(transparent)]
    Service(#[from] TaskServiceError),
}

impl From<JsonRejection> for TaskApiError {
    fn from(rejection: JsonRejection) -> Self {
        TaskApiError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for TaskApiError {
    fn from(rejection: PathRejection) -> Self {
        TaskApiError::Validation(rejection.body_text())
    }
}

impl From<task_manager_core::ValidationError> for TaskApiError {
    fn from(err: task_manager_core::ValidationError) -> Self {
        TaskApiError::Validation(err.to_string())
    }
}

impl IntoResponse for TaskApiError {
    fn into_response(self) -> Response {
        let (status_code, message) = match self {
            TaskApiError::Validation(message) => (StatusCode::BAD_REQUEST, message),
            TaskApiError::Service(err @ TaskServiceError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, err.to_string())
            }
            TaskApiError::Service(err @ TaskServiceError::Conflict(_)) => {
                (StatusCode::CONFLICT, err.to_string())
            }
            TaskApiError::Service(TaskServiceError::Database(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                GENERIC_ERROR_MESSAGE.to_string(),
            ),
        };

        (status_code, Json(ErrorResponse::new(status_code, message))).into_response()
    }
}

/// Handler for POST /task/new - Creates a new pending task.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    post,
    path = "/api/task/new",
    request_body = NewTaskRequest,
    responses(
        (status = 200, description = "Successfully added a new task", body = NewTaskResponse),
        (status = 400, description = "Invalid input for creating a new task", body = ErrorResponse),
        (status = 500, description = "Something went wrong while adding a new task", body = ErrorResponse)
    ),
    tag = "task"
)]
pub async fn add_new_task_handler(
    State(state): State<Arc<TaskState>>,
    payload: Result<Json<NewTaskRequest>, JsonRejection>,
) -> Result<Json<NewTaskResponse>, TaskApiError> {
    let Json(request) = payload?;
    let new_task = NewTask::new(request.title, request.description)?;

    let service = TaskService::new(&state.db);
    let task = service.create_task(new_task).await.inspect_err(|err| {
        tracing::error!("Error at /task/new: {}", err);
    })?;

    Ok(Json(NewTaskResponse {
        status_code: StatusCode::CREATED.as_u16(),
        message: "Successfully new task added".to_string(),
        body: NewTaskBody {
            new_task: TaskJson::from(task),
        },
    }))
}

/// Handler for PATCH /task/complete-task/{id} - Marks a pending task as done.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    patch,
    path = "/api/task/complete-task/{id}",
    params(
        ("id" = i32, Path, description = "ID of the task to update status")
    ),
    responses(
        (status = 200, description = "Successfully updated task status", body = CompleteTaskResponse),
        (status = 400, description = "The ID is not an integer", body = ErrorResponse),
        (status = 404, description = "Task not found", body = ErrorResponse),
        (status = 409, description = "Conflict during status update", body = ErrorResponse),
        (status = 500, description = "Something went wrong while updating the task status", body = ErrorResponse)
    ),
    tag = "task"
)]
pub async fn complete_task_handler(
    State(state): State<Arc<TaskState>>,
    id: Result<Path<TaskId>, PathRejection>,
) -> Result<Json<CompleteTaskResponse>, TaskApiError> {
    let Path(id) = id?;

    let service = TaskService::new(&state.db);
    service.complete_task(id).await.inspect_err(|err| {
        tracing::error!("Error at /task/complete-task/{}: {}", id, err);
    })?;

    Ok(Json(CompleteTaskResponse {
        status_code: StatusCode::OK.as_u16(),
        message: format!("Successfully updated task status {} as complete", id),
        body: EmptyBody::default(),
    }))
}

/// Handler for GET /task/recent-tasks - Returns the most recent pending tasks.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/task/recent-tasks",
    responses(
        (status = 200, description = "Successfully retrieved recent pending tasks", body = RecentTasksResponse),
        (status = 500, description = "Something went wrong while fetching recent tasks", body = ErrorResponse)
    ),
    tag = "task"
)]
pub async fn get_recent_tasks_handler(
    State(state): State<Arc<TaskState>>,
) -> Result<Json<RecentTasksResponse>, TaskApiError> {
    let service = TaskService::new(&state.db);
    let tasks = service
        .get_recent_pending_tasks(RECENT_TASKS_LIMIT)
        .await
        .inspect_err(|err| {
            tracing::error!("Error at /task/recent-tasks: {}", err);
        })?;

    Ok(Json(RecentTasksResponse {
        status_code: StatusCode::OK.as_u16(),
        body: RecentTasksBody {
            tasks: tasks.into_iter().map(TaskJson::from).collect(),
        },
    }))
}

/// Creates and returns the task API router.
pub fn create_api_router(state: Arc<TaskState>) -> Router {
    Router::new()
        .route("/task/new", post(add_new_task_handler))
        .route("/task/complete-task/{id}", patch(complete_task_handler))
        .route("/task/recent-tasks", get(get_recent_tasks_handler))
        .with_state(state)
}
