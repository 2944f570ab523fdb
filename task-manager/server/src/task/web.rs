use askama::Template;
use axum::{
    Form, Router,
    extract::{Path, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::Html,
    routing::{delete, get, patch},
};
use serde::Deserialize;
use std::sync::Arc;
use task_manager_core::{AlertKind, NewTask, Task, TaskId};

use crate::task::{RECENT_TASKS_LIMIT, TaskService, TaskServiceError, TaskState};

#[derive(Debug, Deserialize)]
pub struct NewTaskForm {
    title: String,
    description: String,
}

/// A notification rendered into the alert area of the page.
#[derive(Debug, Clone)]
pub struct AlertView {
    kind: AlertKind,
    message: String,
}

impl AlertView {
    pub fn new(kind: AlertKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Background colour class for the alert box.
    pub fn color_class(&self) -> &'static str {
        match self.kind {
            AlertKind::Error => "bg-red-500",
            AlertKind::Warning => "bg-yellow-500",
            AlertKind::Success => "bg-green-500",
            AlertKind::Info => "bg-blue-500",
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Custom error type for task page handler operations.
#[derive(Debug, thiserror::Error)]
enum TaskWebError {
    /// Represents an error during template rendering.
    #[error("Template rendering failed")]
    Template(#[from] askama::Error),
    /// Represents a task service error.
    #[error("Task service error")]
    Service(#[from] TaskServiceError),
    /// The submitted form failed validation.
    #[error("{0}")]
    Validation(#[from] task_manager_core::ValidationError),
}

impl axum::response::IntoResponse for TaskWebError {
    fn into_response(self) -> axum::response::Response {
        let (status_code, user_facing_error_message) = match &self {
            TaskWebError::Validation(err) => (StatusCode::UNPROCESSABLE_ENTITY, form_error_message(err)),
            _ => {
                tracing::error!("Task page request failed: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong. Please try again later.".to_string(),
                )
            }
        };

        let alert_template = AlertTemplate::new(AlertView::new(AlertKind::Error, user_facing_error_message));
        let Ok(rendered) = alert_template.render() else {
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        };

        let mut response = (status_code, Html(rendered)).into_response();
        // Send the alert to the alert area instead of the task list
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("hx-retarget"),
            HeaderValue::from_static("#alerts"),
        );
        headers.insert(
            HeaderName::from_static("hx-reswap"),
            HeaderValue::from_static("beforeend"),
        );
        response.headers_mut().extend(headers);
        response
    }
}

fn form_error_message(err: &task_manager_core::ValidationError) -> String {
    match err {
        task_manager_core::ValidationError::EmptyTitle => "Title is required".to_string(),
        task_manager_core::ValidationError::EmptyDescription => {
            "Description is required".to_string()
        }
    }
}

#[derive(Template)]
#[template(path = "tasks.html")]
struct TasksTemplate;

#[derive(Template)]
#[template(path = "tasks/task_list.html")]
struct TaskListTemplate {
    tasks: Vec<Task>,
    alert: Option<AlertView>,
}

impl TaskListTemplate {
    pub fn new(tasks: Vec<Task>, alert: Option<AlertView>) -> Self {
        Self { tasks, alert }
    }
}

#[derive(Template)]
#[template(path = "tasks/alert.html")]
struct AlertTemplate {
    notice: AlertView,
}

impl AlertTemplate {
    pub fn new(notice: AlertView) -> Self {
        Self { notice }
    }
}

/// Fetches the current pending tasks and renders them as the task list,
/// optionally with an alert swapped into the alert area.
#[tracing::instrument(skip(task_service))]
async fn render_task_list(
    task_service: &TaskService<'_>,
    alert: Option<AlertView>,
) -> Result<Html<String>, TaskWebError> {
    let tasks = task_service
        .get_recent_pending_tasks(RECENT_TASKS_LIMIT)
        .await?;
    let template = TaskListTemplate::new(tasks, alert);
    template.render().map(Html).map_err(TaskWebError::from)
}

/// Handler for the task manager page.
#[tracing::instrument]
async fn tasks_page_handler() -> Result<Html<String>, TaskWebError> {
    TasksTemplate.render().map(Html).map_err(TaskWebError::from)
}

/// Handler for the task list fragment.
#[tracing::instrument(skip(state))]
async fn task_list_handler(State(state): State<Arc<TaskState>>) -> Result<Html<String>, TaskWebError> {
    let task_service = TaskService::new(&state.db);
    render_task_list(&task_service, None).await
}

/// Handler for creating a new task from the form.
#[tracing::instrument(skip(state))]
async fn create_task_handler(
    State(state): State<Arc<TaskState>>,
    Form(form): Form<NewTaskForm>,
) -> Result<Html<String>, TaskWebError> {
    let new_task = NewTask::new(form.title, form.description)?;
    let task_service = TaskService::new(&state.db);
    task_service.create_task(new_task).await?;

    let alert = AlertView::new(AlertKind::Success, "Task created successfully!");
    render_task_list(&task_service, Some(alert)).await
}

/// Handler for completing a task. The list is refetched whether or not the
/// completion succeeded.
#[tracing::instrument(skip(state))]
async fn complete_task_handler(
    State(state): State<Arc<TaskState>>,
    Path(id): Path<TaskId>,
) -> Result<Html<String>, TaskWebError> {
    let task_service = TaskService::new(&state.db);

    let alert = match task_service.complete_task(id).await {
        Ok(()) => AlertView::new(AlertKind::Success, "Successfully updated the status of task"),
        Err(err @ (TaskServiceError::NotFound(_) | TaskServiceError::Conflict(_))) => {
            tracing::warn!("Failed to complete task {}: {}", id, err);
            AlertView::new(AlertKind::Error, err.to_string())
        }
        Err(err) => return Err(TaskWebError::Service(err)),
    };

    render_task_list(&task_service, Some(alert)).await
}

/// Handler for dismissing an alert. The empty body replaces the alert element.
#[tracing::instrument]
async fn dismiss_alert_handler() -> Html<&'static str> {
    Html("")
}

/// Creates and returns the task page router with all task UI routes.
pub fn create_task_web_router(state: Arc<TaskState>) -> Router {
    Router::new()
        .route("/", get(tasks_page_handler))
        .route("/tasks", get(task_list_handler).post(create_task_handler))
        .route("/tasks/{id}/complete", patch(complete_task_handler))
        .route("/alerts", delete(dismiss_alert_handler))
        .with_state(state)
}
