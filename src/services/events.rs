//! Admin lifecycle notifications
//!
//! Mutations emit an [`AdminEvent`] before and after touching storage. The
//! notifier is fire-and-forget: the service never waits on or inspects what
//! subscribers do with an event.

use tokio::sync::broadcast;

use crate::db::AdminRecord;

#[derive(Debug, Clone, PartialEq)]
pub enum AdminEvent {
    CreateBefore,
    CreateAfter(AdminRecord),
    UpdateBefore(i64),
    UpdatePassword(AdminRecord),
    UpdateAfter(AdminRecord),
    /// Sent while the row still exists
    DeleteBefore(i64),
    DeleteAfter(i64),
}

impl AdminEvent {
    /// Dotted event name, stable for external subscribers
    pub fn name(&self) -> &'static str {
        match self {
            AdminEvent::CreateBefore => "user.admin.create.before",
            AdminEvent::CreateAfter(_) => "user.admin.create.after",
            AdminEvent::UpdateBefore(_) => "user.admin.update.before",
            AdminEvent::UpdatePassword(_) => "user.admin.update-password",
            AdminEvent::UpdateAfter(_) => "user.admin.update.after",
            AdminEvent::DeleteBefore(_) => "user.admin.delete.before",
            AdminEvent::DeleteAfter(_) => "user.admin.delete.after",
        }
    }

    pub fn admin_id(&self) -> Option<i64> {
        match self {
            AdminEvent::CreateBefore => None,
            AdminEvent::CreateAfter(admin)
            | AdminEvent::UpdatePassword(admin)
            | AdminEvent::UpdateAfter(admin) => Some(admin.id),
            AdminEvent::UpdateBefore(id)
            | AdminEvent::DeleteBefore(id)
            | AdminEvent::DeleteAfter(id) => Some(*id),
        }
    }
}

pub trait LifecycleNotifier: Send + Sync {
    fn notify(&self, event: AdminEvent);
}

/// Publishes events on a broadcast channel.
pub struct BroadcastNotifier {
    sender: broadcast::Sender<AdminEvent>,
}

impl BroadcastNotifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AdminEvent> {
        self.sender.subscribe()
    }
}

impl Default for BroadcastNotifier {
    fn default() -> Self {
        Self::new(256)
    }
}

impl LifecycleNotifier for BroadcastNotifier {
    fn notify(&self, event: AdminEvent) {
        tracing::debug!(event = event.name(), admin_id = ?event.admin_id(), "Admin lifecycle event");
        // No receivers is fine
        let _ = self.sender.send(event);
    }
}
