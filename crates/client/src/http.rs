//! JSON-over-HTTP client for the blood-bank REST API.
//!
//! Every call returns the decoded [`ApiEnvelope`]; failures are folded into
//! [`ApiError`] so the operation runner can classify them.

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use bloodbank_core::{ApiEnvelope, ApiError, ApiResult};

use crate::session::Session;

/// Error body shape used by the API on non-2xx answers.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<Session>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, session: Arc<Session>) -> Self {
        Self::with_http(reqwest::Client::new(), base_url, session)
    }

    pub fn with_http(
        http: reqwest::Client,
        base_url: impl Into<String>,
        session: Arc<Session>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> ApiResult<ApiEnvelope<T>> {
        let req = self.request(Method::GET, path).query(query);
        self.send(req).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<ApiEnvelope<T>> {
        let req = self.request(Method::POST, path).json(body);
        self.send(req).await
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<ApiEnvelope<T>> {
        let req = self.request(Method::PUT, path).json(body);
        self.send(req).await
    }

    /// PATCH with an optional body (`/notifications/:id/read` takes none).
    pub async fn patch<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> ApiResult<ApiEnvelope<T>> {
        let mut req = self.request(Method::PATCH, path);
        if let Some(body) = body {
            req = req.json(body);
        }
        self.send(req).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ApiResult<ApiEnvelope<T>> {
        let req = self.request(Method::DELETE, path);
        self.send(req).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut req = self.http.request(method, self.url(path));
        if let Some(token) = self.session.token() {
            req = req.bearer_auth(token);
        }
        req
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> ApiResult<ApiEnvelope<T>> {
        let resp = req.send().await.map_err(|e| {
            tracing::warn!("request failed before a response: {e}");
            ApiError::network(e.to_string())
        })?;

        let status = resp.status();
        let url = resp.url().path().to_string();
        let body = resp
            .text()
            .await
            .map_err(|e| ApiError::network(e.to_string()))?;

        tracing::debug!(%url, status = status.as_u16(), bytes = body.len(), "api response");
        decode_response(status, &body)
    }
}

/// Turn a raw HTTP answer into an envelope or a normalised error.
pub fn decode_response<T: DeserializeOwned>(
    status: StatusCode,
    body: &str,
) -> ApiResult<ApiEnvelope<T>> {
    if !status.is_success() {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
        let message = parsed.message.or(parsed.error);
        return Err(ApiError::from_status(status.as_u16(), message));
    }

    if body.trim().is_empty() {
        return Ok(ApiEnvelope {
            success: true,
            data: None,
            message: None,
            pagination: None,
        });
    }

    let envelope: ApiEnvelope<T> =
        serde_json::from_str(body).map_err(|e| ApiError::decode(e.to_string()))?;
    envelope.ensure_success(status.as_u16())
}
