use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use task_manager_core::AlertKind;
use tokio::task::AbortHandle;
use uuid::Uuid;

/// How long an alert stays visible unless dismissed.
pub const DEFAULT_ALERT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    id: Uuid,
    kind: AlertKind,
    message: String,
}

impl Alert {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn kind(&self) -> AlertKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Default)]
struct AlertEntries {
    alerts: Vec<Alert>,
    removals: HashMap<Uuid, AbortHandle>,
}

/// Transient notifications with scheduled removal.
///
/// Every alert gets a removal task on the tokio runtime that fires after its
/// timeout. Dismissing an alert by hand aborts that task. Cloning the store
/// yields another handle to the same alerts.
#[derive(Debug, Clone, Default)]
pub struct AlertStore {
    inner: Arc<Mutex<AlertEntries>>,
}

impl AlertStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows an alert for [`DEFAULT_ALERT_TIMEOUT`].
    ///
    /// Must be called from within a tokio runtime.
    pub fn show_alert(&self, kind: AlertKind, message: impl Into<String>) -> Uuid {
        self.show_alert_with_timeout(kind, message, DEFAULT_ALERT_TIMEOUT)
    }

    /// Shows an alert and schedules its removal after `timeout`.
    pub fn show_alert_with_timeout(
        &self,
        kind: AlertKind,
        message: impl Into<String>,
        timeout: Duration,
    ) -> Uuid {
        let alert = Alert {
            id: Uuid::new_v4(),
            kind,
            message: message.into(),
        };
        let id = alert.id;
        tracing::debug!("Showing {:?} alert {}: {}", kind, id, alert.message);

        // The lock is held until the removal handle is stored, so the expiry task
        // cannot run ahead of the bookkeeping.
        let mut entries = self.lock();
        entries.alerts.push(alert);
        let store = self.clone();
        let removal = tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            store.expire(id);
        });
        entries.removals.insert(id, removal.abort_handle());
        id
    }

    /// Dismisses an alert and cancels its scheduled removal.
    pub fn remove_alert(&self, id: Uuid) {
        let mut entries = self.lock();
        entries.alerts.retain(|alert| alert.id != id);
        if let Some(removal) = entries.removals.remove(&id) {
            removal.abort();
        }
    }

    /// Returns a snapshot of the visible alerts, oldest first.
    pub fn alerts(&self) -> Vec<Alert> {
        self.lock().alerts.clone()
    }

    fn expire(&self, id: Uuid) {
        let mut entries = self.lock();
        entries.alerts.retain(|alert| alert.id != id);
        entries.removals.remove(&id);
    }

    fn lock(&self) -> MutexGuard<'_, AlertEntries> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[cfg(test)]
    fn scheduled_removals(&self) -> usize {
        self.lock().removals.len()
    }
}
