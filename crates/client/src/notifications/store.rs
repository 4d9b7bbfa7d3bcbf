//! Owning container for notification state and toast timers.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use bloodbank_core::NotificationId;

use super::reducer::{reduce, NotificationAction, NotificationState};
use super::types::{Notification, NotificationKind};

struct Inner {
    state: watch::Sender<NotificationState>,
    timers: Mutex<HashMap<NotificationId, JoinHandle<()>>>,
    toast_duration: Duration,
}

impl Inner {
    fn take_timer(&self, id: &NotificationId) -> Option<JoinHandle<()>> {
        match self.timers.lock() {
            Ok(mut timers) => timers.remove(id),
            Err(poisoned) => poisoned.into_inner().remove(id),
        }
    }

    fn abort_all(&self) {
        let drained: Vec<JoinHandle<()>> = match self.timers.lock() {
            Ok(mut timers) => timers.drain().map(|(_, h)| h).collect(),
            Err(poisoned) => poisoned.into_inner().drain().map(|(_, h)| h).collect(),
        };
        for handle in drained {
            handle.abort();
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.abort_all();
    }
}

/// Cheap to clone; clones share state and timers.
#[derive(Clone)]
pub struct NotificationStore {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for NotificationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationStore")
            .field("state", &*self.inner.state.borrow())
            .field("toast_duration", &self.inner.toast_duration)
            .finish()
    }
}

impl NotificationStore {
    pub fn new(toast_duration: Duration) -> Self {
        let (state, _) = watch::channel(NotificationState::default());
        Self {
            inner: Arc::new(Inner {
                state,
                timers: Mutex::new(HashMap::new()),
                toast_duration,
            }),
        }
    }

    pub fn dispatch(&self, action: NotificationAction) {
        if let NotificationAction::RemoveNotification(id) = &action {
            if let Some(handle) = self.inner.take_timer(id) {
                handle.abort();
            }
        }
        self.inner.state.send_modify(|s| reduce(s, action));
    }

    pub fn state(&self) -> NotificationState {
        self.inner.state.borrow().clone()
    }

    pub fn unread_count(&self) -> u64 {
        self.inner.state.borrow().unread_count()
    }

    pub fn subscribe(&self) -> watch::Receiver<NotificationState> {
        self.inner.state.subscribe()
    }

    /// Show a toast and schedule its removal.
    ///
    /// Outside a Tokio runtime the toast is added but stays until dismissed.
    pub fn show_toast(&self, kind: NotificationKind, message: impl Into<String>) -> NotificationId {
        let toast = Notification::toast(kind, message);
        let id = toast.id.clone();
        self.inner
            .state
            .send_modify(|s| reduce(s, NotificationAction::AddNotification(toast)));

        let Ok(runtime) = Handle::try_current() else {
            tracing::debug!(%id, "no runtime; toast will not auto-dismiss");
            return id;
        };

        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let delay = self.inner.toast_duration;
        let timer_id = id.clone();

        // Held across the spawn: the timer's own `take_timer` waits until the
        // handle is registered, however short the delay.
        let mut timers = match self.inner.timers.lock() {
            Ok(timers) => timers,
            Err(poisoned) => poisoned.into_inner(),
        };
        let handle = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(inner) = weak.upgrade() {
                inner.take_timer(&timer_id);
                inner
                    .state
                    .send_modify(|s| reduce(s, NotificationAction::RemoveNotification(timer_id)));
            }
        });
        timers.insert(id.clone(), handle);
        id
    }

    pub fn show_success(&self, message: impl Into<String>) -> NotificationId {
        self.show_toast(NotificationKind::Success, message)
    }

    pub fn show_error(&self, message: impl Into<String>) -> NotificationId {
        self.show_toast(NotificationKind::Error, message)
    }

    pub fn show_warning(&self, message: impl Into<String>) -> NotificationId {
        self.show_toast(NotificationKind::Warning, message)
    }

    pub fn show_info(&self, message: impl Into<String>) -> NotificationId {
        self.show_toast(NotificationKind::Info, message)
    }

    /// Remove a notification now, cancelling its timer if it has one.
    pub fn dismiss(&self, id: &NotificationId) {
        self.dispatch(NotificationAction::RemoveNotification(id.clone()));
    }

    pub fn pending_timers(&self) -> usize {
        match self.inner.timers.lock() {
            Ok(timers) => timers.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    /// Abort all toast timers and reset state (used on logout).
    pub fn shutdown(&self) {
        self.inner.abort_all();
        self.inner.state.send_replace(NotificationState::default());
    }
}
