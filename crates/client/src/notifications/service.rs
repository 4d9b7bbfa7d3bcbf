//! Server round-trips that keep the [`NotificationStore`] in sync.

use serde::Deserialize;

use bloodbank_core::{ApiResult, NotificationId};

use super::reducer::NotificationAction;
use super::store::NotificationStore;
use super::types::{Notification, NotificationFilters};
use crate::http::ApiClient;
use crate::operation::{AsyncOperation, ExecuteOptions, Outcome};

const BASE: &str = "notifications";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UnreadCount {
    #[serde(alias = "count")]
    unread_count: u64,
}

#[derive(Debug, Clone)]
pub struct NotificationService {
    api: ApiClient,
    store: NotificationStore,
    operation: AsyncOperation,
}

impl NotificationService {
    pub fn new(api: ApiClient, store: NotificationStore, operation: AsyncOperation) -> Self {
        Self {
            api,
            store,
            operation,
        }
    }

    pub fn store(&self) -> &NotificationStore {
        &self.store
    }

    pub fn operation(&self) -> &AsyncOperation {
        &self.operation
    }

    /// Load one page using the store's current filters.
    pub async fn fetch(&self, page: u64, limit: u64) -> ApiResult<Outcome<usize>> {
        let mut query = vec![
            ("page".to_string(), page.to_string()),
            ("limit".to_string(), limit.to_string()),
        ];
        query.extend(self.store.state().filters.to_query());

        self.store.dispatch(NotificationAction::SetLoading(true));
        let api = self.api.clone();
        let result = self
            .operation
            .execute(
                || async move { api.get::<Vec<Notification>>(BASE, &query).await },
                ExecuteOptions::new(),
            )
            .await;

        match result {
            Ok(Outcome::Completed(envelope)) => {
                let items = envelope.data.unwrap_or_default();
                let count = items.len();
                self.store.dispatch(NotificationAction::SetNotifications {
                    items,
                    pagination: envelope.pagination,
                });
                Ok(Outcome::Completed(count))
            }
            Ok(outcome) => {
                self.store.dispatch(NotificationAction::SetLoading(false));
                Ok(outcome.map(|_| 0))
            }
            Err(err) => {
                self.store
                    .dispatch(NotificationAction::SetError(err.message().to_string()));
                Err(err)
            }
        }
    }

    /// Background refresh of the badge count; failures are not surfaced.
    pub async fn refresh_unread_count(&self) -> ApiResult<Outcome<u64>> {
        let api = self.api.clone();
        let result = self
            .operation
            .execute(
                || async move {
                    api.get::<UnreadCount>(&format!("{BASE}/unread-count"), &[])
                        .await?
                        .into_data()
                },
                ExecuteOptions::silent(),
            )
            .await?;

        Ok(result.map(|UnreadCount { unread_count }| {
            self.store.dispatch(NotificationAction::SetUnreadCount(unread_count));
            unread_count
        }))
    }

    pub async fn mark_as_read(&self, id: &NotificationId) -> ApiResult<Outcome<()>> {
        let api = self.api.clone();
        let path = format!("{BASE}/{id}/read");
        let outcome = self
            .operation
            .execute(
                || async move { api.patch::<(), serde_json::Value>(&path, None).await },
                ExecuteOptions::new().show_loading(false),
            )
            .await?;

        Ok(outcome.map(|_| self.store.dispatch(NotificationAction::MarkAsRead(id.clone()))))
    }

    pub async fn mark_all_as_read(&self) -> ApiResult<Outcome<()>> {
        let api = self.api.clone();
        let outcome = self
            .operation
            .execute(
                || async move {
                    api.patch::<(), serde_json::Value>(&format!("{BASE}/read-all"), None)
                        .await
                },
                ExecuteOptions::new(),
            )
            .await?;

        Ok(outcome.map(|_| self.store.dispatch(NotificationAction::MarkAllAsRead)))
    }

    pub async fn delete(&self, id: &NotificationId) -> ApiResult<Outcome<()>> {
        let api = self.api.clone();
        let path = format!("{BASE}/{id}");
        let outcome = self
            .operation
            .execute(
                || async move { api.delete::<serde_json::Value>(&path).await },
                ExecuteOptions::new(),
            )
            .await?;

        Ok(outcome.map(|_| {
            self.store
                .dispatch(NotificationAction::RemoveNotification(id.clone()))
        }))
    }

    /// Merge `patch` into the filters; callers re-`fetch` afterwards.
    pub fn set_filters(&self, patch: NotificationFilters) {
        self.store.dispatch(NotificationAction::SetFilters(patch));
    }
}
