//! Core domain models and lifecycle rules for the task manager.
pub mod alert;
pub mod task;

pub use alert::AlertKind;
pub use task::{NewTask, Task, TaskId, TaskStatus, ValidationError};
