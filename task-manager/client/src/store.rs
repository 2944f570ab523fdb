use task_manager_core::{AlertKind, NewTask, Task, TaskId, ValidationError};

use crate::alert::AlertStore;
use crate::api::{ClientError, TasksApi};

const FETCH_FAILED_MESSAGE: &str = "Failed to fetch tasks";
const CREATE_FAILED_MESSAGE: &str = "Failed to create task";
const COMPLETE_FAILED_MESSAGE: &str = "Failed to update task status";

/// Snapshot of the task list as last fetched from the server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskListState {
    tasks: Vec<Task>,
    is_loading: bool,
    error: Option<String>,
}

impl TaskListState {
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Client-side mirror of the pending task list.
///
/// The list is never patched locally: every mutation is followed by a full
/// refetch, so the state always reflects what the server last returned.
pub struct TaskStore<A: TasksApi> {
    api: A,
    alerts: AlertStore,
    state: TaskListState,
}

impl<A: TasksApi> TaskStore<A> {
    pub fn new(api: A, alerts: AlertStore) -> Self {
        Self {
            api,
            alerts,
            state: TaskListState::default(),
        }
    }

    pub fn state(&self) -> &TaskListState {
        &self.state
    }

    pub fn alerts(&self) -> &AlertStore {
        &self.alerts
    }

    /// Replaces the task list with the server's recent pending tasks.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_tasks(&mut self) {
        self.state.is_loading = true;
        self.state.error = None;

        match self.api.get_recent_tasks().await {
            Ok(tasks) => self.state.tasks = tasks,
            Err(err) => {
                tracing::warn!("Failed to fetch tasks: {}", err);
                self.state.error = Some(error_message(&err, FETCH_FAILED_MESSAGE));
            }
        }

        self.state.is_loading = false;
    }

    /// Validates and submits a new task, then refetches the list.
    ///
    /// Failures are reported through an error alert as well as the return value.
    #[tracing::instrument(skip(self))]
    pub async fn create_task(
        &mut self,
        title: &str,
        description: &str,
    ) -> Result<Task, ClientError> {
        let result = match NewTask::new(title, description) {
            Ok(new_task) => self.api.create_task(new_task).await,
            Err(err) => Err(ClientError::Validation(err)),
        };

        match result {
            Ok(task) => {
                self.fetch_tasks().await;
                self.alerts
                    .show_alert(AlertKind::Success, "Task created successfully!");
                Ok(task)
            }
            Err(err) => {
                tracing::warn!("Failed to create task: {}", err);
                self.alerts
                    .show_alert(AlertKind::Error, error_message(&err, CREATE_FAILED_MESSAGE));
                Err(err)
            }
        }
    }

    /// Completes a task and refetches the list whether or not it succeeded.
    #[tracing::instrument(skip(self))]
    pub async fn complete_task(&mut self, id: TaskId) -> Result<(), ClientError> {
        let result = self.api.complete_task(id).await;

        match &result {
            Ok(()) => {
                self.alerts.show_alert(
                    AlertKind::Success,
                    "Successfully updated the status of task",
                );
            }
            Err(err) => {
                tracing::warn!("Failed to complete task {}: {}", id, err);
                self.alerts
                    .show_alert(AlertKind::Error, error_message(err, COMPLETE_FAILED_MESSAGE));
            }
        }

        self.fetch_tasks().await;
        result
    }
}

/// Picks the message shown to the user, falling back when the server gave none.
fn error_message(err: &ClientError, fallback: &str) -> String {
    match err {
        ClientError::Api { message, .. } if !message.is_empty() => message.clone(),
        ClientError::Validation(ValidationError::EmptyTitle) => "Title is required".to_string(),
        ClientError::Validation(ValidationError::EmptyDescription) => {
            "Description is required".to_string()
        }
        _ => fallback.to_string(),
    }
}
