use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use task_manager_core::{NewTask, Task, TaskId, ValidationError};

/// Errors raised while talking to the task API.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request could not be sent or the response could not be read.
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The server answered with a non-success status.
    #[error("{message}")]
    Api { status: u16, message: String },
    /// The input was rejected before any request was made.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Operations the task store needs from the backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TasksApi: Send + Sync {
    /// Fetches the most recent pending tasks, newest first.
    async fn get_recent_tasks(&self) -> Result<Vec<Task>, ClientError>;

    /// Creates a task and returns the persisted record.
    async fn create_task(&self, new_task: NewTask) -> Result<Task, ClientError>;

    /// Marks a pending task as done.
    async fn complete_task(&self, id: TaskId) -> Result<(), ClientError>;
}

#[derive(Debug, Deserialize)]
struct Envelope<B> {
    body: B,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewTaskBody {
    new_task: Task,
}

#[derive(Debug, Deserialize)]
struct TasksBody {
    tasks: Vec<Task>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug, Serialize)]
struct NewTaskPayload<'a> {
    title: &'a str,
    description: &'a str,
}

/// [`TasksApi`] over the JSON HTTP endpoints.
#[derive(Debug, Clone)]
pub struct HttpTasksApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTasksApi {
    /// Creates a client for the API rooted at `base_url`, e.g. `http://localhost:8080/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Decodes a success body, or turns an error body into [`ClientError::Api`].
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.message,
        Err(_) => status.canonical_reason().unwrap_or_default().to_string(),
    };
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl TasksApi for HttpTasksApi {
    #[tracing::instrument(skip(self))]
    async fn get_recent_tasks(&self) -> Result<Vec<Task>, ClientError> {
        let response = self.client.get(self.url("/task/recent-tasks")).send().await?;
        let envelope: Envelope<TasksBody> = decode(response).await?;
        Ok(envelope.body.tasks)
    }

    #[tracing::instrument(skip(self))]
    async fn create_task(&self, new_task: NewTask) -> Result<Task, ClientError> {
        let payload = NewTaskPayload {
            title: new_task.title(),
            description: new_task.description(),
        };
        let response = self
            .client
            .post(self.url("/task/new"))
            .json(&payload)
            .send()
            .await?;
        let envelope: Envelope<NewTaskBody> = decode(response).await?;
        Ok(envelope.body.new_task)
    }

    #[tracing::instrument(skip(self))]
    async fn complete_task(&self, id: TaskId) -> Result<(), ClientError> {
        let response = self
            .client
            .patch(self.url(&format!("/task/complete-task/{}", id)))
            .send()
            .await?;
        let _: serde::de::IgnoredAny = decode(response).await?;
        Ok(())
    }
}
