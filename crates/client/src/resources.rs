//! Typed access to the REST collections behind each dashboard screen.

use std::collections::BTreeMap;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use bloodbank_auth::Permission;
use bloodbank_core::{ApiEnvelope, ApiResult, Pagination};

use crate::http::ApiClient;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Resource {
    Donors,
    Inventory,
    Campaigns,
    Hospitals,
    Recipients,
    BloodRequests,
    Users,
}

impl Resource {
    pub fn path(&self) -> &'static str {
        match self {
            Resource::Donors => "donors",
            Resource::Inventory => "inventory",
            Resource::Campaigns => "campaigns",
            Resource::Hospitals => "hospitals",
            Resource::Recipients => "recipients",
            Resource::BloodRequests => "requests",
            Resource::Users => "users",
        }
    }

    /// Permission needed to create, update or delete records.
    pub fn manage_permission(&self) -> Permission {
        match self {
            Resource::Donors => Permission::ManageDonors,
            Resource::Inventory => Permission::ManageInventory,
            Resource::Campaigns => Permission::ManageCampaigns,
            Resource::Hospitals => Permission::ManageHospitals,
            Resource::Recipients => Permission::ManageRecipients,
            Resource::BloodRequests => Permission::ManageRequests,
            Resource::Users => Permission::ManageUsers,
        }
    }
}

/// Query for one page of a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u64,
    pub limit: u64,
    pub search: Option<String>,
    /// Extra server-side filters, e.g. `bloodType=O-`.
    pub filters: BTreeMap<String, String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: bloodbank_core::DEFAULT_LIMIT,
            search: None,
            filters: BTreeMap::new(),
        }
    }
}

impl ListQuery {
    pub fn from_pagination(pagination: &Pagination) -> Self {
        Self {
            page: pagination.page(),
            limit: pagination.limit(),
            ..Self::default()
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        self.search = (!term.trim().is_empty()).then_some(term);
        self
    }

    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("page".to_string(), self.page.to_string()),
            ("limit".to_string(), self.limit.to_string()),
        ];
        if let Some(search) = &self.search {
            params.push(("search".to_string(), search.trim().to_string()));
        }
        params.extend(self.filters.iter().map(|(k, v)| (k.clone(), v.clone())));
        params
    }
}

/// CRUD over one collection, decoding records as `T`.
pub struct ResourceService<T> {
    api: ApiClient,
    resource: Resource,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for ResourceService<T> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            resource: self.resource,
            _record: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for ResourceService<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceService")
            .field("resource", &self.resource)
            .finish()
    }
}

impl<T: DeserializeOwned> ResourceService<T> {
    pub fn new(api: ApiClient, resource: Resource) -> Self {
        Self {
            api,
            resource,
            _record: PhantomData,
        }
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    pub async fn list(&self, query: &ListQuery) -> ApiResult<ApiEnvelope<Vec<T>>> {
        self.api.get(self.resource.path(), &query.to_params()).await
    }

    pub async fn get(&self, id: &str) -> ApiResult<T> {
        self.api
            .get::<T>(&self.item_path(id), &[])
            .await?
            .into_data()
    }

    pub async fn create<B: Serialize + ?Sized>(&self, body: &B) -> ApiResult<T> {
        self.api.post::<B, T>(self.resource.path(), body).await?.into_data()
    }

    pub async fn update<B: Serialize + ?Sized>(&self, id: &str, body: &B) -> ApiResult<T> {
        self.api.put::<B, T>(&self.item_path(id), body).await?.into_data()
    }

    pub async fn remove(&self, id: &str) -> ApiResult<()> {
        self.api
            .delete::<serde_json::Value>(&self.item_path(id))
            .await
            .map(|_| ())
    }

    fn item_path(&self, id: &str) -> String {
        format!("{}/{}", self.resource.path(), id)
    }
}
