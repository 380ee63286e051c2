//! The typed request dispatcher.
//!
//! # Design
//! `ApiClient` holds an immutable `ClientConfig` and a reqwest connection
//! pool, and carries no mutable state between calls, so clones and
//! concurrent dispatches never interfere. Each call is split into
//! `build_request` (plain data, no I/O), `transport::execute`, and
//! `parse_response` (plain data, no I/O). Only the middle step touches the
//! network.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::{ClientConfig, ClientOptions};
use crate::endpoint::Endpoint;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport;
use crate::types::ErrorResponse;

const DEFAULT_CONTENT_TYPE: (&str, &str) = ("Content-Type", "application/json");

/// Asynchronous, stateless client for the backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: Arc<ClientConfig>,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            config: Arc::new(config),
            http,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Describe the request for `endpoint` without sending it.
    ///
    /// `body` is serialized only when `method` carries a payload; for GET and
    /// DELETE it is ignored.
    pub fn build_request<B>(
        &self,
        endpoint: Endpoint,
        method: HttpMethod,
        body: Option<&B>,
    ) -> Result<HttpRequest, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let body = match body {
            Some(body) if method.carries_body() => {
                Some(serde_json::to_string(body).map_err(ApiError::Serialization)?)
            }
            _ => None,
        };

        Ok(HttpRequest {
            method,
            url: format!("{}{}", self.config.base_url, endpoint.path()),
            headers: self.headers(),
            body,
        })
    }

    /// Default `Content-Type` merged with the configured headers. A configured
    /// key replaces an existing one when they match case-insensitively.
    fn headers(&self) -> Vec<(String, String)> {
        let mut headers = vec![(
            DEFAULT_CONTENT_TYPE.0.to_string(),
            DEFAULT_CONTENT_TYPE.1.to_string(),
        )];
        for (name, value) in &self.config.headers {
            match headers
                .iter_mut()
                .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            {
                Some(slot) => *slot = (name.clone(), value.clone()),
                None => headers.push((name.clone(), value.clone())),
            }
        }
        headers
    }

    /// Turn a raw response into the caller's expected shape or an error.
    pub fn parse_response<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T, ApiError> {
        if !response.is_success() {
            return Err(error_from_response(response));
        }
        serde_json::from_str(&response.body).map_err(ApiError::Deserialization)
    }

    /// Send one request and decode the result as `T`.
    pub async fn dispatch<T, B>(
        &self,
        endpoint: Endpoint,
        method: HttpMethod,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.build_request(endpoint, method, body)?;
        tracing::debug!(method = %request.method, url = %request.url, "dispatching request");

        let response = transport::execute(&self.http, request, self.config.timeout).await?;
        if response.is_success() {
            tracing::debug!(%endpoint, status = response.status, "request succeeded");
        } else {
            tracing::warn!(%endpoint, status = response.status, "server returned an error status");
        }

        self.parse_response(response)
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<T, ApiError> {
        self.dispatch::<T, ()>(endpoint, HttpMethod::Get, None).await
    }

    pub async fn post<T, B>(&self, endpoint: Endpoint, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.dispatch(endpoint, HttpMethod::Post, Some(body)).await
    }

    pub async fn put<T, B>(&self, endpoint: Endpoint, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.dispatch(endpoint, HttpMethod::Put, Some(body)).await
    }

    pub async fn patch<T, B>(&self, endpoint: Endpoint, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.dispatch(endpoint, HttpMethod::Patch, Some(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<T, ApiError> {
        self.dispatch::<T, ()>(endpoint, HttpMethod::Delete, None).await
    }
}

/// Build a client from a base URL and optional partial configuration,
/// defaulting the timeout to `DEFAULT_TIMEOUT`.
pub fn create_client(
    base_url: impl Into<String>,
    options: Option<ClientOptions>,
) -> Result<ApiClient, ApiError> {
    ApiClient::new(options.unwrap_or_default().into_config(base_url))
}

/// Build a client from `API_BASE_URL` / `API_TIMEOUT_MS`.
pub fn create_client_from_env() -> Result<ApiClient, ApiError> {
    ApiClient::new(ClientConfig::from_env()?)
}

/// Map a non-2xx response to `ApiError::Api` when the body carries a usable
/// `detail`, and to `ApiError::Http` otherwise.
fn error_from_response(response: HttpResponse) -> ApiError {
    let status = response.status;

    if let Ok(body) = serde_json::from_str::<ErrorResponse>(&response.body) {
        if body.detail.is_empty() {
            return ApiError::Http {
                status,
                body: response.body,
            };
        }
        return ApiError::Api {
            status,
            detail: body.detail,
            error_code: body.error_code,
        };
    }

    // Anything that is not the documented error body, e.g. a validation list
    // under `detail`, or a body that is not JSON at all.
    let parsed = serde_json::from_str::<serde_json::Value>(&response.body).ok();
    let detail = parsed.as_ref().and_then(|value| match value.get("detail") {
        Some(serde_json::Value::String(text)) if !text.is_empty() => Some(text.clone()),
        Some(serde_json::Value::String(_)) | Some(serde_json::Value::Null) | None => None,
        Some(other) => Some(other.to_string()),
    });

    match detail {
        Some(detail) => ApiError::Api {
            status,
            detail,
            error_code: parsed
                .as_ref()
                .and_then(|value| value.get("error_code"))
                .and_then(|code| code.as_str())
                .map(str::to_string),
        },
        None => ApiError::Http {
            status,
            body: response.body,
        },
    }
}
