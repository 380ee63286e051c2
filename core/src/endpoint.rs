//! The closed set of backend paths.
//!
//! Paths are static data copied from the backend schema. `Display` renders
//! the path itself, which is what gets appended to the base URL.

use std::fmt;
use std::str::FromStr;

use crate::http::HttpMethod;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Health,
    HealthDetailed,
    TextGenerate,
    TextEcho,
    ExternalWeather,
    ExternalQuote,
    ExternalFact,
    ExternalJoke,
    /// Pre-v1 text generation route kept for older callers.
    LegacyGenerate,
}

impl Endpoint {
    pub const ALL: [Endpoint; 9] = [
        Endpoint::Health,
        Endpoint::HealthDetailed,
        Endpoint::TextGenerate,
        Endpoint::TextEcho,
        Endpoint::ExternalWeather,
        Endpoint::ExternalQuote,
        Endpoint::ExternalFact,
        Endpoint::ExternalJoke,
        Endpoint::LegacyGenerate,
    ];

    pub const fn path(self) -> &'static str {
        match self {
            Endpoint::Health => "/api/v1/health/",
            Endpoint::HealthDetailed => "/api/v1/health/detailed",
            Endpoint::TextGenerate => "/api/v1/text/generate",
            Endpoint::TextEcho => "/api/v1/text/echo",
            Endpoint::ExternalWeather => "/api/v1/external/weather",
            Endpoint::ExternalQuote => "/api/v1/external/quote",
            Endpoint::ExternalFact => "/api/v1/external/fact",
            Endpoint::ExternalJoke => "/api/v1/external/joke",
            Endpoint::LegacyGenerate => "/generate",
        }
    }

    /// The method the backend documents for this path.
    pub const fn method(self) -> HttpMethod {
        match self {
            Endpoint::TextGenerate
            | Endpoint::TextEcho
            | Endpoint::ExternalWeather
            | Endpoint::LegacyGenerate => HttpMethod::Post,
            Endpoint::Health
            | Endpoint::HealthDetailed
            | Endpoint::ExternalQuote
            | Endpoint::ExternalFact
            | Endpoint::ExternalJoke => HttpMethod::Get,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown endpoint path: {0}")]
pub struct UnknownEndpoint(pub String);

impl FromStr for Endpoint {
    type Err = UnknownEndpoint;

    /// Exact match against the known paths; no slash normalization.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Endpoint::ALL
            .into_iter()
            .find(|endpoint| endpoint.path() == s)
            .ok_or_else(|| UnknownEndpoint(s.to_string()))
    }
}
