use chrono::{DateTime, Utc};
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifier assigned to a task by the store.
pub type TaskId = i32;

/// The two states a task moves through. `Done` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum TaskStatus {
    NotDone,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::NotDone => "NOT_DONE",
            TaskStatus::Done => "DONE",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reasons a task creation request is rejected before reaching storage.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("title should not be empty")]
    EmptyTitle,
    #[error("description should not be empty")]
    EmptyDescription,
}

/// A validated request to create a task.
///
/// Holding a `NewTask` means both title and description are non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    title: String,
    description: String,
}

impl NewTask {
    /// Validates the title and description of a new task.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyTitle`] or [`ValidationError::EmptyDescription`]
    /// when the corresponding field is empty. The title is checked first.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let title = title.into();
        let description = description.into();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if description.is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        Ok(Self { title, description })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Splits the request into its title and description.
    pub fn into_parts(self) -> (String, String) {
        (self.title, self.description)
    }
}

/// A persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Task {
    id: TaskId,
    title: String,
    description: String,
    status: TaskStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Task {
    pub fn new(
        id: TaskId,
        title: String,
        description: String,
        status: TaskStatus,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            description,
            status,
            created_at,
            updated_at,
        }
    }

    /// Returns the ID of the task.
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title of the task.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description of the task.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the current lifecycle state.
    pub fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns when the task was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the task was last changed.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
