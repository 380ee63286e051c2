//! Typed HTTP client for the text-generation and external-data backend.
//!
//! # Overview
//! `ApiClient` turns an (endpoint, method, payload) triple into one HTTP
//! call and a typed, error-normalized result. Convenience methods such as
//! `ApiClient::health_check` fix the endpoint and method for each backend
//! operation.
//!
//! # Design
//! - `ApiClient` is stateless beyond its frozen `ClientConfig`; clones and
//!   concurrent calls never interfere.
//! - Each call is split into `build_request` and `parse_response`, both pure,
//!   around a single reqwest round-trip in `transport`.
//! - Failures are tagged (`ApiError`), while `Display` keeps the backend's
//!   `detail` text or a status-derived message.
//! - DTOs in `types` restate the backend schema; the mock-server crate
//!   defines its own copies, and the integration tests catch schema drift.
//!
//! ```no_run
//! # async fn example() -> Result<(), textapi_core::ApiError> {
//! let client = textapi_core::create_client("http://localhost:8000", None)?;
//! let health = client.health_check().await?;
//! println!("{}", health.status);
//! # Ok(())
//! # }
//! ```

mod api;
pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod http;
mod transport;
pub mod types;

pub use client::{create_client, create_client_from_env, ApiClient};
pub use config::{ClientConfig, ClientOptions, DEFAULT_TIMEOUT};
pub use endpoint::Endpoint;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use types::{
    DetailedHealthResponse, EchoTextRequest, EchoTextResponse, ErrorDetail, ErrorResponse,
    FactResponse, GenerateTextRequest, GenerateTextResponse, HealthResponse, JokeResponse,
    LegacyGenerateRequest, LegacyGenerateResponse, QuoteResponse, WeatherRequest, WeatherResponse,
};
