//! One page of a resource collection as shown by a list screen.

use std::fmt::Display;

use serde::de::DeserializeOwned;

use bloodbank_core::{ApiEnvelope, ApiResult, Entity, Pagination};

use crate::operation::{AsyncOperation, ExecuteOptions, Outcome};
use crate::resources::{ListQuery, ResourceService};

/// State captured before an optimistic change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot<T> {
    items: Vec<T>,
    total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagedList<T> {
    items: Vec<T>,
    pagination: Pagination,
    search: String,
}

impl<T> Default for PagedList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            pagination: Pagination::default(),
            search: String::new(),
        }
    }
}

impl<T> PagedList<T>
where
    T: Entity + Clone,
{
    pub fn new(limit: u64, max_limit: u64) -> Self {
        Self {
            pagination: Pagination::with_limits(limit, max_limit),
            ..Self::default()
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn pagination_mut(&mut self) -> &mut Pagination {
        &mut self.pagination
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Returns true when the term changed; a new term restarts at page 1.
    pub fn set_search(&mut self, term: impl Into<String>) -> bool {
        let term = term.into();
        if term == self.search {
            return false;
        }
        self.search = term;
        self.pagination.go_to_page(1);
        true
    }

    pub fn query(&self) -> ListQuery {
        ListQuery::from_pagination(&self.pagination).search(self.search.clone())
    }

    /// Replace the page with a server response.
    pub fn apply(&mut self, envelope: ApiEnvelope<Vec<T>>) {
        self.items = envelope.data.unwrap_or_default();
        match envelope.pagination {
            Some(meta) => self.pagination.apply_meta(&meta),
            None => self.pagination.set_total(self.items.len() as u64),
        }
    }

    /// Drop `id` from the page now. `None` if it isn't on this page.
    pub fn optimistic_remove(&mut self, id: &T::Id) -> Option<Snapshot<T>> {
        let pos = self.items.iter().position(|item| item.has_id(id))?;
        let snapshot = Snapshot {
            items: self.items.clone(),
            total: self.pagination.total(),
        };
        self.items.remove(pos);
        self.pagination
            .set_total(self.pagination.total().saturating_sub(1));
        Some(snapshot)
    }

    pub fn rollback(&mut self, snapshot: Snapshot<T>) {
        self.items = snapshot.items;
        self.pagination.set_total(snapshot.total);
    }
}

impl<T> PagedList<T>
where
    T: Entity + Clone + DeserializeOwned,
{
    /// Reload the current page through `operation`.
    pub async fn refresh(
        &mut self,
        service: &ResourceService<T>,
        operation: &AsyncOperation,
    ) -> ApiResult<Outcome<()>> {
        let query = self.query();
        let outcome = operation
            .execute(|| service.list(&query), ExecuteOptions::new())
            .await?;
        Ok(outcome.map(|envelope| self.apply(envelope)))
    }

    /// Delete optimistically; the row comes back unless the server confirms.
    pub async fn remove(
        &mut self,
        service: &ResourceService<T>,
        operation: &AsyncOperation,
        id: &T::Id,
    ) -> ApiResult<Outcome<()>>
    where
        T::Id: Display,
    {
        let snapshot = self.optimistic_remove(id);
        let key = id.to_string();
        let result = operation
            .execute(|| service.remove(&key), ExecuteOptions::new())
            .await;

        match result {
            Ok(Outcome::Completed(())) => {
                tracing::debug!(resource = ?service.resource(), id = %key, "record removed");
                Ok(Outcome::Completed(()))
            }
            other => {
                if let Some(snapshot) = snapshot {
                    self.rollback(snapshot);
                }
                other
            }
        }
    }
}
