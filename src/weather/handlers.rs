use axum::{extract::State, response::Html, Json};
use chrono::Local;
use serde::Serialize;
use utoipa::ToSchema;

use super::models::WeatherRecord;
use super::service::WeatherError;
use crate::error::ErrorResponse;
use crate::extractors::{CityParam, CityQuery};
use crate::AppState;

const INDEX_HTML: &str = include_str!("../../static/index.html");

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    /// Local time, ISO-8601
    pub timestamp: String,
}

/// Search page
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Local::now()
            .naive_local()
            .format("%Y-%m-%dT%H:%M:%S%.6f")
            .to_string(),
    })
}

/// Current weather for a city (`?city=` on GET, form field `city` on POST)
#[utoipa::path(
    get,
    path = "/weather",
    tag = "weather",
    params(CityQuery),
    responses(
        (status = 200, description = "Normalized current weather", body = WeatherRecord),
        (status = 400, description = "City parameter missing or empty", body = ErrorResponse),
        (status = 404, description = "City not found or upstream request failed", body = ErrorResponse)
    )
)]
pub async fn get_weather(
    State(state): State<AppState>,
    CityParam(city): CityParam,
) -> Result<Json<WeatherRecord>, WeatherError> {
    state.weather_service.get_weather(&city).await.map(Json)
}
