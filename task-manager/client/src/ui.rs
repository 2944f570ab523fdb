//! Plain-text rendering of the client state for the terminal front end.

use std::fmt::Write;

use task_manager_core::AlertKind;

use crate::alert::Alert;
use crate::store::TaskListState;

fn alert_label(kind: AlertKind) -> &'static str {
    match kind {
        AlertKind::Error => "error",
        AlertKind::Success => "success",
        AlertKind::Warning => "warning",
        AlertKind::Info => "info",
    }
}

/// Renders the visible alerts, one per line, oldest first.
pub fn render_alerts(alerts: &[Alert]) -> String {
    alerts
        .iter()
        .map(|alert| format!("[{}] {}\n", alert_label(alert.kind()), alert.message()))
        .collect()
}

/// Renders the task list the way the last fetch left it.
pub fn render_task_list(state: &TaskListState) -> String {
    if state.is_loading() {
        return "Loading tasks...\n".to_string();
    }
    if let Some(error) = state.error() {
        return format!("Error: {}\n", error);
    }
    if state.tasks().is_empty() {
        return "No pending tasks\n".to_string();
    }

    let mut output = String::new();
    for task in state.tasks() {
        // Writing to a String cannot fail.
        let _ = writeln!(output, "#{} [{}] {}", task.id(), task.status(), task.title());
        let _ = writeln!(output, "    {}", task.description());
    }
    output
}
