//! One method per backend operation, each a fixed endpoint and method
//! forwarded to the dispatcher.

use crate::client::ApiClient;
use crate::endpoint::Endpoint;
use crate::error::ApiError;
use crate::types::{
    DetailedHealthResponse, EchoTextRequest, EchoTextResponse, FactResponse, GenerateTextRequest,
    GenerateTextResponse, HealthResponse, JokeResponse, LegacyGenerateRequest,
    LegacyGenerateResponse, QuoteResponse, WeatherRequest, WeatherResponse,
};

impl ApiClient {
    pub async fn health_check(&self) -> Result<HealthResponse, ApiError> {
        self.get(Endpoint::Health).await
    }

    pub async fn detailed_health_check(&self) -> Result<DetailedHealthResponse, ApiError> {
        self.get(Endpoint::HealthDetailed).await
    }

    pub async fn generate_text(
        &self,
        request: &GenerateTextRequest,
    ) -> Result<GenerateTextResponse, ApiError> {
        self.post(Endpoint::TextGenerate, request).await
    }

    pub async fn echo_text(&self, request: &EchoTextRequest) -> Result<EchoTextResponse, ApiError> {
        self.post(Endpoint::TextEcho, request).await
    }

    pub async fn get_weather(&self, request: &WeatherRequest) -> Result<WeatherResponse, ApiError> {
        self.post(Endpoint::ExternalWeather, request).await
    }

    pub async fn random_quote(&self) -> Result<QuoteResponse, ApiError> {
        self.get(Endpoint::ExternalQuote).await
    }

    pub async fn random_fact(&self) -> Result<FactResponse, ApiError> {
        self.get(Endpoint::ExternalFact).await
    }

    pub async fn programming_joke(&self) -> Result<JokeResponse, ApiError> {
        self.get(Endpoint::ExternalJoke).await
    }

    /// Calls the pre-v1 `/generate` route.
    pub async fn legacy_generate(
        &self,
        request: &LegacyGenerateRequest,
    ) -> Result<LegacyGenerateResponse, ApiError> {
        self.post(Endpoint::LegacyGenerate, request).await
    }
}
