use crate::entities::*;
use chrono::Utc;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::Expr;
use sea_orm::*;
use std::sync::Arc;
use task_manager_core::{NewTask, Task, TaskId};

pub mod api;
pub mod web;

pub use web::create_task_web_router;

/// Number of tasks shown in the pending-task view.
pub const RECENT_TASKS_LIMIT: u64 = 5;

/// Error type for TaskService operations.
#[derive(Debug, thiserror::Error)]
pub enum TaskServiceError {
    /// No pending task with this ID exists. Covers both missing and already completed tasks.
    #[error("Task with id {0} not found")]
    NotFound(TaskId),
    /// The task exists but its state does not allow the requested transition.
    #[error("Task with id {0} is already completed")]
    Conflict(TaskId),
    /// Represents a database error.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

#[derive(Clone, Debug)]
pub struct TaskState {
    pub db: Arc<sea_orm::DatabaseConnection>,
}

impl From<sea_orm_active_enums::TaskStatus> for task_manager_core::TaskStatus {
    fn from(status: sea_orm_active_enums::TaskStatus) -> Self {
        match status {
            sea_orm_active_enums::TaskStatus::NotDone => task_manager_core::TaskStatus::NotDone,
            sea_orm_active_enums::TaskStatus::Done => task_manager_core::TaskStatus::Done,
        }
    }
}

impl From<task_manager_core::TaskStatus> for sea_orm_active_enums::TaskStatus {
    fn from(status: task_manager_core::TaskStatus) -> Self {
        match status {
            task_manager_core::TaskStatus::NotDone => sea_orm_active_enums::TaskStatus::NotDone,
            task_manager_core::TaskStatus::Done => sea_orm_active_enums::TaskStatus::Done,
        }
    }
}

fn task_from_model(model: task::Model) -> Task {
    Task::new(
        model.id,
        model.title,
        model.description,
        model.status.into(),
        model.created_at.with_timezone(&Utc),
        model.updated_at.with_timezone(&Utc),
    )
}

pub struct TaskService<'a> {
    db: &'a sea_orm::DatabaseConnection,
}

impl TaskService<'_> {
    pub fn new(db: &sea_orm::DatabaseConnection) -> TaskService<'_> {
        TaskService { db }
    }

    /// Creates a new pending task in the database.
    ///
    /// # Arguments
    ///
    /// * `new_task` - The validated title and description.
    ///
    /// # Returns
    ///
    /// A `Result` containing the persisted `Task` with its generated ID and timestamps.
    #[tracing::instrument(skip(self))]
    pub async fn create_task(&self, new_task: NewTask) -> Result<Task, TaskServiceError> {
        let (title, description) = new_task.into_parts();
        let now: DateTimeWithTimeZone = Utc::now().into();
        let active_model = task::ActiveModel {
            title: ActiveValue::Set(title),
            description: ActiveValue::Set(description),
            status: ActiveValue::Set(sea_orm_active_enums::TaskStatus::NotDone),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };
        let created_model = active_model.insert(self.db).await?;
        Ok(task_from_model(created_model))
    }

    /// Marks a pending task as done.
    ///
    /// The status check and the write happen in a single conditional `UPDATE`,
    /// so two concurrent completions of the same task cannot both succeed.
    ///
    /// # Arguments
    ///
    /// * `id` - The ID of the task to complete.
    ///
    /// # Returns
    ///
    /// `Ok(())` if exactly one pending task was updated, or `TaskServiceError::NotFound`
    /// if the task does not exist or is already done.
    #[tracing::instrument(skip(self))]
    pub async fn complete_task(&self, id: TaskId) -> Result<(), TaskServiceError> {
        let now: DateTimeWithTimeZone = Utc::now().into();
        let result = task::Entity::update_many()
            .col_expr(
                task::Column::Status,
                Expr::value(sea_orm_active_enums::TaskStatus::Done),
            )
            .col_expr(task::Column::UpdatedAt, Expr::value(now))
            .filter(task::Column::Id.eq(id))
            .filter(task::Column::Status.eq(sea_orm_active_enums::TaskStatus::NotDone))
            .exec(self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(TaskServiceError::NotFound(id));
        }
        Ok(())
    }

    /// Retrieves the most recently created pending tasks, newest first.
    ///
    /// # Arguments
    ///
    /// * `limit` - The maximum number of tasks to return.
    ///
    /// # Returns
    ///
    /// A `Result` containing at most `limit` tasks with status `NOT_DONE`.
    #[tracing::instrument(skip(self))]
    pub async fn get_recent_pending_tasks(&self, limit: u64) -> Result<Vec<Task>, TaskServiceError> {
        let tasks = task::Entity::find()
            .filter(task::Column::Status.eq(sea_orm_active_enums::TaskStatus::NotDone))
            .order_by_desc(task::Column::CreatedAt)
            .order_by_desc(task::Column::Id)
            .limit(limit)
            .all(self.db)
            .await?
            .into_iter()
            .map(task_from_model)
            .collect();
        Ok(tasks)
    }

    /// Retrieves a task by its ID regardless of its status.
    #[tracing::instrument(skip(self))]
    pub async fn get_task_by_id(&self, id: TaskId) -> Result<Task, TaskServiceError> {
        let task_model = task::Entity::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or(TaskServiceError::NotFound(id))?;
        Ok(task_from_model(task_model))
    }
}
