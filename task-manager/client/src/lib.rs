//! Client-side state for the task manager.
//!
//! [`TaskStore`] mirrors the server's list of recent pending tasks and refetches
//! it after every mutation. [`AlertStore`] holds transient notifications that
//! expire on their own unless dismissed first. The [`ui`] module renders both
//! for the `task-manager` terminal front end.

pub mod alert;
pub mod api;
pub mod store;
pub mod ui;

pub use alert::{Alert, AlertStore};
pub use api::{ClientError, HttpTasksApi, TasksApi};
pub use store::{TaskListState, TaskStore};
