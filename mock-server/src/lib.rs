//! In-process stand-in for the text/external backend.
//!
//! Serves every route the client knows about with canned or randomly picked
//! data, and answers failures with the backend's `{"detail": ...}` error
//! body. Request and response types are defined here independently of the
//! client crate so integration tests notice schema drift.

use std::{sync::Arc, time::Instant};

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_MAX_LENGTH: u32 = 50;
const DEFAULT_TEMPERATURE: f64 = 1.0;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub version: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DetailedHealthResponse {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub system_info: Map<String, Value>,
    pub services: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateTextRequest {
    pub prompt: String,
    pub max_length: Option<u32>,
    pub temperature: Option<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerateTextResponse {
    pub generated_text: String,
    pub input_prompt: String,
    pub metadata: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct EchoTextRequest {
    pub text: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EchoTextResponse {
    pub echo: String,
    pub analysis: Map<String, Value>,
    pub timestamp: String,
}

#[derive(Debug, Deserialize)]
pub struct WeatherRequest {
    pub city: String,
    pub country_code: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WeatherResponse {
    pub city: String,
    pub country: String,
    pub temperature: f64,
    pub description: String,
    pub humidity: f64,
    pub wind_speed: f64,
    pub is_mock: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuoteResponse {
    pub quote: String,
    pub author: String,
    pub category: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FactResponse {
    pub fact: String,
    pub source: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JokeResponse {
    pub joke: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub category: String,
}

#[derive(Debug, Deserialize)]
pub struct LegacyGenerateRequest {
    pub prompt: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LegacyGenerateResponse {
    pub generated_text: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
    pub error_code: Option<String>,
    pub timestamp: Option<String>,
}

// ---------------------------------------------------------------------------
// Canned data
// ---------------------------------------------------------------------------

pub const QUOTES: &[(&str, &str, &str)] = &[
    ("The only way to do great work is to love what you do.", "Steve Jobs", "motivation"),
    ("Innovation distinguishes between a leader and a follower.", "Steve Jobs", "innovation"),
    ("Code is like humor. When you have to explain it, it's bad.", "Cory House", "programming"),
    ("First, solve the problem. Then, write the code.", "John Johnson", "programming"),
    ("Experience is the name everyone gives to their mistakes.", "Oscar Wilde", "wisdom"),
    ("In order to be irreplaceable, one must always be different.", "Coco Chanel", "uniqueness"),
    (
        "The best time to plant a tree was 20 years ago. The second best time is now.",
        "Chinese Proverb",
        "action",
    ),
];

pub const FACTS: &[(&str, &str)] = &[
    (
        "Honey never spoils. Archaeologists have found pots of honey in ancient Egyptian tombs that are over 3,000 years old and still edible.",
        "archaeology",
    ),
    ("Octopuses have three hearts and blue blood.", "marine biology"),
    ("A single cloud can weigh more than a million pounds.", "meteorology"),
    (
        "There are more possible games of chess than atoms in the observable universe.",
        "mathematics",
    ),
    ("Bananas are berries, but strawberries aren't.", "botany"),
    ("A group of flamingos is called a 'flamboyance'.", "zoology"),
    ("The Great Wall of China isn't visible from space with the naked eye.", "geography"),
];

pub const JOKES: &[&str] = &[
    "Why do programmers prefer dark mode? Because light attracts bugs!",
    "How many programmers does it take to change a light bulb? None, that's a hardware problem.",
    "Why did the programmer quit his job? He didn't get arrays.",
    "What's a programmer's favorite hangout place? Foo Bar.",
    "Why do Python programmers prefer snakes? Because they're easy to wrap around your finger!",
];

const TEMPLATES: &[&str] = &[
    "Based on your prompt '{prompt}', here are some thoughts: ",
    "Continuing from '{prompt}', we could explore: ",
    "Your idea about '{prompt}' reminds me of: ",
    "Building on '{prompt}', consider this: ",
    "In response to '{prompt}', I would suggest: ",
];

const CONTINUATIONS: &[&str] = &[
    "the importance of creativity in problem-solving.",
    "how technology shapes our daily experiences.",
    "the value of continuous learning and adaptation.",
    "the interconnectedness of all things in nature.",
    "the power of collaboration and teamwork.",
    "the beauty found in simplicity and minimalism.",
    "the significance of sustainable practices.",
    "the impact of positive thinking on outcomes.",
    "the role of innovation in progress.",
    "the wisdom gained through diverse perspectives.",
];

const WEATHER_DESCRIPTIONS: &[&str] = &[
    "Sunny",
    "Cloudy",
    "Rainy",
    "Partly cloudy",
    "Clear sky",
    "Light rain",
    "Overcast",
];

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("{0}")]
    Validation(String),

    #[error("Not Found")]
    NotFound,

    #[error("Method Not Allowed")]
    MethodNotAllowed,
}

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            ServerError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServerError::NotFound => StatusCode::NOT_FOUND,
            ServerError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ServerError::Validation(_) => "validation_error",
            ServerError::NotFound => "not_found",
            ServerError::MethodNotAllowed => "method_not_allowed",
        }
    }
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        ServerError::Validation(rejection.body_text())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::warn!(status = %status, code = self.code(), error = %self, "client error");

        let body = ErrorResponse {
            detail: self.to_string(),
            error_code: Some(self.code().to_string()),
            timestamp: Some(now()),
        };
        (status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub struct AppState {
    started: Instant,
}

pub fn app() -> Router {
    let state = Arc::new(AppState {
        started: Instant::now(),
    });
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/health/", get(health))
        .route("/api/v1/health/detailed", get(health_detailed))
        .route("/api/v1/text/generate", post(generate_text))
        .route("/api/v1/text/echo", post(echo_text))
        .route("/api/v1/external/weather", post(weather))
        .route("/api/v1/external/quote", get(quote))
        .route("/api/v1/external/fact", get(fact))
        .route("/api/v1/external/joke", get(joke))
        .route("/generate", post(legacy_generate))
        .fallback(|| async { ServerError::NotFound })
        .method_not_allowed_fallback(|| async { ServerError::MethodNotAllowed })
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: now(),
        version: VERSION.to_string(),
    })
}

async fn health_detailed(State(state): State<Arc<AppState>>) -> Json<DetailedHealthResponse> {
    let mut system_info = Map::new();
    system_info.insert("platform".into(), json!(std::env::consts::OS));
    system_info.insert("arch".into(), json!(std::env::consts::ARCH));
    system_info.insert("uptime_seconds".into(), json!(state.started.elapsed().as_secs_f64()));

    let mut services = Map::new();
    services.insert("database".into(), json!("not_configured"));
    services.insert("cache".into(), json!("not_configured"));
    services.insert("external_apis".into(), json!("mock_mode"));

    Json(DetailedHealthResponse {
        status: "healthy".to_string(),
        timestamp: now(),
        version: VERSION.to_string(),
        system_info,
        services,
    })
}

async fn generate_text(
    payload: Result<Json<GenerateTextRequest>, JsonRejection>,
) -> Result<Json<GenerateTextResponse>, ServerError> {
    let Json(input) = payload?;
    let max_length = input.max_length.unwrap_or(DEFAULT_MAX_LENGTH);
    let temperature = input.temperature.unwrap_or(DEFAULT_TEMPERATURE);

    if input.prompt.trim().is_empty() {
        return Err(ServerError::Validation("prompt must not be empty".to_string()));
    }
    if !(1..=1000).contains(&max_length) {
        return Err(ServerError::Validation(
            "max_length must be between 1 and 1000".to_string(),
        ));
    }
    if !(0.0..=2.0).contains(&temperature) {
        return Err(ServerError::Validation(
            "temperature must be between 0.0 and 2.0".to_string(),
        ));
    }

    Ok(Json(compose_text(&input.prompt, max_length, temperature)))
}

/// Rule-based stand-in for a language model: a random template around the
/// prompt plus a random continuation, cut to `max_length` characters.
pub fn compose_text(prompt: &str, max_length: u32, temperature: f64) -> GenerateTextResponse {
    let mut rng = rand::thread_rng();
    let template = TEMPLATES.choose(&mut rng).copied().unwrap_or(TEMPLATES[0]);
    let continuation = CONTINUATIONS.choose(&mut rng).copied().unwrap_or(CONTINUATIONS[0]);

    let full = template.replace("{prompt}", prompt) + continuation;
    let generated_text = truncate(&full, max_length as usize);

    let mut metadata = Map::new();
    metadata.insert("generation_method".into(), json!("rule_based"));
    metadata.insert("temperature_used".into(), json!(temperature));
    metadata.insert("max_length_requested".into(), json!(max_length));
    metadata.insert("actual_length".into(), json!(generated_text.chars().count()));
    metadata.insert("prompt_length".into(), json!(prompt.chars().count()));

    GenerateTextResponse {
        generated_text,
        input_prompt: prompt.to_string(),
        metadata,
    }
}

/// Cut `text` to at most `max_chars` characters, marking the cut with `...`
/// when there is room for it.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars < 3 {
        return text.chars().take(max_chars).collect();
    }
    let kept: String = text.chars().take(max_chars - 3).collect();
    kept + "..."
}

async fn echo_text(
    payload: Result<Json<EchoTextRequest>, JsonRejection>,
) -> Result<Json<EchoTextResponse>, ServerError> {
    let Json(input) = payload?;

    let mut analysis = Map::new();
    analysis.insert("character_count".into(), json!(input.text.chars().count()));
    analysis.insert("word_count".into(), json!(input.text.split_whitespace().count()));
    analysis.insert("line_count".into(), json!(input.text.lines().count()));

    Ok(Json(EchoTextResponse {
        echo: input.text,
        analysis,
        timestamp: now(),
    }))
}

async fn weather(
    payload: Result<Json<WeatherRequest>, JsonRejection>,
) -> Result<Json<WeatherResponse>, ServerError> {
    let Json(input) = payload?;
    if input.city.trim().is_empty() {
        return Err(ServerError::Validation("city must not be empty".to_string()));
    }
    let country = match input.country_code {
        Some(code) if code.chars().count() == 2 => code.to_uppercase(),
        Some(_) => {
            return Err(ServerError::Validation(
                "country_code must be a 2-letter ISO 3166 code".to_string(),
            ))
        }
        None => "Unknown".to_string(),
    };
    Ok(Json(mock_weather(&input.city, country)))
}

fn mock_weather(city: &str, country: String) -> WeatherResponse {
    let mut rng = rand::thread_rng();
    WeatherResponse {
        city: title_case(city),
        country,
        temperature: round_tenth(rng.gen_range(-10.0..35.0)),
        description: WEATHER_DESCRIPTIONS
            .choose(&mut rng)
            .copied()
            .unwrap_or(WEATHER_DESCRIPTIONS[0])
            .to_string(),
        humidity: f64::from(rng.gen_range(30u8..=90)),
        wind_speed: round_tenth(rng.gen_range(0.0..15.0)),
        is_mock: true,
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Upper-case the first letter of every word and lower-case the rest.
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

async fn quote() -> Json<QuoteResponse> {
    let (quote, author, category) = QUOTES.choose(&mut rand::thread_rng()).copied().unwrap_or(QUOTES[0]);
    Json(QuoteResponse {
        quote: quote.to_string(),
        author: author.to_string(),
        category: Some(category.to_string()),
    })
}

async fn fact() -> Json<FactResponse> {
    let (fact, source) = FACTS.choose(&mut rand::thread_rng()).copied().unwrap_or(FACTS[0]);
    Json(FactResponse {
        fact: fact.to_string(),
        source: Some(source.to_string()),
    })
}

async fn joke() -> Json<JokeResponse> {
    let joke = JOKES.choose(&mut rand::thread_rng()).copied().unwrap_or(JOKES[0]);
    Json(JokeResponse {
        joke: joke.to_string(),
        kind: "programming_humor".to_string(),
        category: "programming".to_string(),
    })
}

async fn legacy_generate(
    payload: Result<Json<LegacyGenerateRequest>, JsonRejection>,
) -> Result<Json<LegacyGenerateResponse>, ServerError> {
    let Json(input) = payload?;
    if input.prompt.trim().is_empty() {
        return Err(ServerError::Validation("prompt must not be empty".to_string()));
    }
    let continuation = CONTINUATIONS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(CONTINUATIONS[0]);
    Ok(Json(LegacyGenerateResponse {
        generated_text: truncate(
            &format!("{} {}", input.prompt, continuation),
            DEFAULT_MAX_LENGTH as usize,
        ),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello", 5), "hello");
    }

    #[test]
    fn truncate_marks_cut() {
        assert_eq!(truncate("hello world", 8), "hello...");
        assert_eq!(truncate("hello world", 8).chars().count(), 8);
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        let text = "こんにちは世界、元気ですか";
        let cut = truncate(text, 6);
        assert_eq!(cut, "こんに...");
    }

    #[test]
    fn truncate_below_ellipsis_width_drops_marker() {
        assert_eq!(truncate("hello", 2), "he");
        assert_eq!(truncate("hello", 1), "h");
        assert_eq!(truncate("hello", 0), "");
        assert_eq!(truncate("hello", 3), "...");
    }

    #[test]
    fn compose_text_tiny_max_length() {
        for max_length in [1, 2] {
            let response = compose_text("Rust", max_length, 1.0);
            assert_eq!(response.generated_text.chars().count(), max_length as usize);
            assert_eq!(response.metadata["actual_length"], max_length);
        }
    }

    #[test]
    fn compose_text_respects_max_length() {
        let response = compose_text("Rust", 20, 0.5);
        assert!(response.generated_text.chars().count() <= 20);
        assert_eq!(response.input_prompt, "Rust");
        assert_eq!(response.metadata["generation_method"], "rule_based");
        assert_eq!(response.metadata["temperature_used"], 0.5);
        assert_eq!(response.metadata["prompt_length"], 4);
    }

    #[test]
    fn compose_text_includes_prompt_when_room() {
        let response = compose_text("ferris", 1000, 1.0);
        assert!(response.generated_text.contains("'ferris'"));
    }

    #[test]
    fn title_case_words() {
        assert_eq!(title_case("new york"), "New York");
        assert_eq!(title_case("tOKYO"), "Tokyo");
    }

    #[test]
    fn mock_weather_ranges() {
        let weather = mock_weather("osaka", "JP".to_string());
        assert_eq!(weather.city, "Osaka");
        assert!((-10.0..=35.0).contains(&weather.temperature));
        assert!((30.0..=90.0).contains(&weather.humidity));
        assert!((0.0..=15.0).contains(&weather.wind_speed));
        assert!(weather.is_mock);
    }

    #[test]
    fn error_response_serializes_detail() {
        let err = ErrorResponse {
            detail: "Not Found".to_string(),
            error_code: Some("not_found".to_string()),
            timestamp: None,
        };
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["detail"], "Not Found");
        assert_eq!(json["error_code"], "not_found");
    }
}
