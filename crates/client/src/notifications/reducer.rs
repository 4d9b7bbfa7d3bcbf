//! Pure state transitions for the notification list.

use bloodbank_core::{NotificationId, PaginationMeta};

use super::types::{Notification, NotificationFilters};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationState {
    /// Newest first.
    pub notifications: Vec<Notification>,
    /// Unread count reported by the server; toasts are never part of it.
    pub server_unread: u64,
    pub pagination: Option<PaginationMeta>,
    pub filters: NotificationFilters,
    pub loading: bool,
    pub error: Option<String>,
}

impl NotificationState {
    pub fn get(&self, id: &NotificationId) -> Option<&Notification> {
        self.notifications.iter().find(|n| &n.id == id)
    }

    pub fn toasts(&self) -> impl Iterator<Item = &Notification> {
        self.notifications.iter().filter(|n| n.is_ephemeral())
    }

    /// Badge number: the server's count plus toasts still unread on screen.
    pub fn unread_count(&self) -> u64 {
        let toasts = self.toasts().filter(|n| !n.is_read()).count() as u64;
        self.server_unread + toasts
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationAction {
    SetNotifications {
        items: Vec<Notification>,
        pagination: Option<PaginationMeta>,
    },
    SetUnreadCount(u64),
    SetLoading(bool),
    AddNotification(Notification),
    MarkAsRead(NotificationId),
    MarkAllAsRead,
    RemoveNotification(NotificationId),
    SetFilters(NotificationFilters),
    SetError(String),
    ClearError,
}

/// Apply `action` to `state`.
///
/// `server_unread` tracks the server's number, which may exceed the loaded
/// page; local transitions on server entries only adjust it and never take it
/// below zero. Toasts are counted by [`NotificationState::unread_count`] while
/// they are on screen and leave `server_unread` alone.
pub fn reduce(state: &mut NotificationState, action: NotificationAction) {
    match action {
        NotificationAction::SetNotifications { items, pagination } => {
            // Toasts live only in memory; keep the ones still on screen.
            let mut merged: Vec<Notification> =
                state.notifications.drain(..).filter(|n| n.is_ephemeral()).collect();
            merged.extend(items);
            state.notifications = merged;
            state.pagination = pagination;
            state.loading = false;
        }
        NotificationAction::SetUnreadCount(count) => state.server_unread = count,
        NotificationAction::SetLoading(loading) => state.loading = loading,
        NotificationAction::AddNotification(notification) => {
            if !notification.is_ephemeral() && !notification.is_read() {
                state.server_unread += 1;
            }
            state.notifications.insert(0, notification);
        }
        NotificationAction::MarkAsRead(id) => {
            let counted = match state.notifications.iter_mut().find(|n| n.id == id) {
                Some(n) => n.mark_read() && !n.is_ephemeral(),
                // Not loaded locally: the server still counted it.
                None => true,
            };
            if counted {
                state.server_unread = state.server_unread.saturating_sub(1);
            }
        }
        NotificationAction::MarkAllAsRead => {
            for n in &mut state.notifications {
                n.mark_read();
            }
            state.server_unread = 0;
        }
        NotificationAction::RemoveNotification(id) => {
            if let Some(pos) = state.notifications.iter().position(|n| n.id == id) {
                let removed = state.notifications.remove(pos);
                if !removed.is_ephemeral() && !removed.is_read() {
                    state.server_unread = state.server_unread.saturating_sub(1);
                }
            }
        }
        NotificationAction::SetFilters(patch) => state.filters.merge(patch),
        NotificationAction::SetError(message) => {
            state.error = Some(message);
            state.loading = false;
        }
        NotificationAction::ClearError => state.error = None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::types::NotificationKind;
    use proptest::prelude::*;

    fn server(id: &str, read: bool) -> Notification {
        let json = format!(
            r#"{{"_id":"{id}","type":"system","message":"m","isRead":{read}}}"#
        );
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn add_prepends_and_counts() {
        let mut state = NotificationState::default();
        reduce(&mut state, NotificationAction::AddNotification(server("a", false)));
        reduce(&mut state, NotificationAction::AddNotification(server("b", false)));

        assert_eq!(state.unread_count(), 2);
        assert_eq!(state.notifications[0].id.as_str(), "b");
    }

    #[test]
    fn mark_as_read_is_idempotent_per_item() {
        let mut state = NotificationState::default();
        reduce(&mut state, NotificationAction::AddNotification(server("a", false)));
        reduce(&mut state, NotificationAction::SetUnreadCount(5));

        let id = NotificationId::new("a");
        reduce(&mut state, NotificationAction::MarkAsRead(id.clone()));
        reduce(&mut state, NotificationAction::MarkAsRead(id.clone()));

        assert_eq!(state.unread_count(), 4);
        assert!(state.get(&id).unwrap().is_read());
    }

    #[test]
    fn mark_as_read_unknown_id_decrements_server_count() {
        let mut state = NotificationState::default();
        reduce(&mut state, NotificationAction::SetUnreadCount(3));
        reduce(&mut state, NotificationAction::MarkAsRead(NotificationId::new("elsewhere")));
        assert_eq!(state.unread_count(), 2);
    }

    #[test]
    fn mark_as_read_floors_at_zero() {
        let mut state = NotificationState::default();
        reduce(&mut state, NotificationAction::MarkAsRead(NotificationId::new("x")));
        assert_eq!(state.unread_count(), 0);
    }

    #[test]
    fn mark_all_as_read_zeroes_count() {
        let mut state = NotificationState::default();
        reduce(
            &mut state,
            NotificationAction::SetNotifications {
                items: vec![server("a", false), server("b", true)],
                pagination: None,
            },
        );
        reduce(&mut state, NotificationAction::SetUnreadCount(12));
        reduce(&mut state, NotificationAction::MarkAllAsRead);

        assert_eq!(state.unread_count(), 0);
        assert!(state.notifications.iter().all(Notification::is_read));
    }

    #[test]
    fn remove_unread_decrements() {
        let mut state = NotificationState::default();
        reduce(&mut state, NotificationAction::AddNotification(server("a", false)));
        reduce(&mut state, NotificationAction::RemoveNotification(NotificationId::new("a")));
        assert!(state.notifications.is_empty());
        assert_eq!(state.unread_count(), 0);

        reduce(&mut state, NotificationAction::RemoveNotification(NotificationId::new("gone")));
        assert_eq!(state.unread_count(), 0);
    }

    #[test]
    fn toast_leaves_server_count_alone() {
        let mut state = NotificationState::default();
        reduce(&mut state, NotificationAction::SetUnreadCount(3));

        let toast = Notification::toast(NotificationKind::Success, "Donor saved");
        let id = toast.id.clone();
        reduce(&mut state, NotificationAction::AddNotification(toast));
        assert_eq!(state.unread_count(), 4);

        // A refresh landing while the toast is up replaces only the server part.
        reduce(&mut state, NotificationAction::SetUnreadCount(3));
        assert_eq!(state.unread_count(), 4);

        reduce(&mut state, NotificationAction::RemoveNotification(id));
        assert_eq!(state.server_unread, 3);
        assert_eq!(state.unread_count(), 3);
    }

    #[test]
    fn reading_a_toast_keeps_server_count() {
        let mut state = NotificationState::default();
        reduce(&mut state, NotificationAction::SetUnreadCount(2));
        let toast = Notification::toast(NotificationKind::Info, "Shift started");
        let id = toast.id.clone();
        reduce(&mut state, NotificationAction::AddNotification(toast));

        reduce(&mut state, NotificationAction::MarkAsRead(id));
        assert_eq!(state.server_unread, 2);
        assert_eq!(state.unread_count(), 2);
    }

    #[test]
    fn set_notifications_keeps_toasts_on_top() {
        let mut state = NotificationState::default();
        let toast = Notification::toast(NotificationKind::Success, "Saved");
        reduce(&mut state, NotificationAction::AddNotification(toast.clone()));
        reduce(&mut state, NotificationAction::SetLoading(true));

        let meta = PaginationMeta {
            current: 2,
            pages: 4,
            total: 31,
            limit: 10,
        };
        reduce(
            &mut state,
            NotificationAction::SetNotifications {
                items: vec![server("a", false)],
                pagination: Some(meta),
            },
        );

        assert_eq!(state.notifications.len(), 2);
        assert_eq!(state.notifications[0].id, toast.id);
        assert_eq!(state.pagination, Some(meta));
        assert!(!state.loading);
        assert_eq!(state.toasts().count(), 1);
    }

    #[test]
    fn error_lifecycle() {
        let mut state = NotificationState {
            loading: true,
            ..Default::default()
        };
        reduce(&mut state, NotificationAction::SetError("boom".into()));
        assert_eq!(state.error.as_deref(), Some("boom"));
        assert!(!state.loading);
        reduce(&mut state, NotificationAction::ClearError);
        assert_eq!(state.error, None);
    }

    fn action() -> impl Strategy<Value = NotificationAction> {
        let id = (0u8..6).prop_map(|i| NotificationId::new(i.to_string()));
        prop_oneof![
            (0u8..6, any::<bool>()).prop_map(|(i, read)| {
                NotificationAction::AddNotification(server(&i.to_string(), read))
            }),
            id.clone().prop_map(NotificationAction::MarkAsRead),
            id.prop_map(NotificationAction::RemoveNotification),
            Just(NotificationAction::AddNotification(Notification::toast(
                NotificationKind::Info,
                "toast",
            ))),
            Just(NotificationAction::MarkAllAsRead),
            (0u64..20).prop_map(NotificationAction::SetUnreadCount),
        ]
    }

    proptest! {
        #[test]
        fn mark_all_then_count_is_zero(actions in proptest::collection::vec(action(), 0..40)) {
            let mut state = NotificationState::default();
            for a in actions {
                reduce(&mut state, a);
            }
            reduce(&mut state, NotificationAction::MarkAllAsRead);
            prop_assert_eq!(state.unread_count(), 0);
            prop_assert!(state.notifications.iter().all(Notification::is_read));
        }

        #[test]
        fn mark_as_read_never_increases_count(
            actions in proptest::collection::vec(action(), 0..40),
            target in 0u8..6,
        ) {
            let mut state = NotificationState::default();
            for a in actions {
                reduce(&mut state, a);
            }
            let before = state.unread_count();
            let target = NotificationId::new(target.to_string());
            reduce(&mut state, NotificationAction::MarkAsRead(target));
            prop_assert!(state.unread_count() <= before);
            prop_assert!(state.unread_count() + 1 >= before);
        }
    }
}
