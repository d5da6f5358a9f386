use axum::http::StatusCode;
use chrono::Local;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

use super::models::{OpenWeatherMapResponse, WeatherRecord};
use crate::config::UpstreamConfig;
use crate::error::HttpError;
use crate::impl_into_response;

const UNITS: &str = "metric";

/// Message sent to clients for every transform failure
pub const LOOKUP_FAILED_MESSAGE: &str = "City not found or API request failed";

#[derive(Error, Debug)]
pub enum WeatherError {
    /// Transport failure, timeout, or non-2xx status (including upstream 404)
    #[error("Weather API request failed: {0}")]
    UpstreamUnavailable(String),

    /// 2xx status with a body we could not interpret
    #[error("Error parsing weather data: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL carries the API key
        Self::UpstreamUnavailable(err.without_url().to_string())
    }
}

impl HttpError for WeatherError {
    fn status_code(&self) -> StatusCode {
        StatusCode::NOT_FOUND
    }

    fn client_message(&self) -> String {
        LOOKUP_FAILED_MESSAGE.to_string()
    }
}

impl_into_response!(WeatherError);

pub struct WeatherService {
    client: Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl WeatherService {
    pub fn new(client: Client, upstream: &UpstreamConfig) -> Self {
        Self {
            client,
            base_url: upstream.base_url.clone(),
            api_key: upstream.api_key.clone(),
            timeout: Duration::from_secs(upstream.timeout_secs),
        }
    }

    /// Fetch current weather for `city` and normalize it.
    ///
    /// One upstream call, no retries. The caller is expected to have
    /// rejected an empty city already.
    pub async fn get_weather(&self, city: &str) -> Result<WeatherRecord, WeatherError> {
        let data = self.fetch_current(city).await?;
        let record = WeatherRecord::from_upstream(data, Local::now())?;

        tracing::info!(
            city = %record.city,
            temp = record.temperature,
            "Weather data fetched successfully"
        );

        Ok(record)
    }

    async fn fetch_current(&self, city: &str) -> Result<OpenWeatherMapResponse, WeatherError> {
        tracing::debug!(city = %city, "Fetching weather data");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("q", city), ("appid", self.api_key.as_str()), ("units", UNITS)])
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(status = %status, "Received API response");

        if !status.is_success() {
            return Err(WeatherError::UpstreamUnavailable(format!("HTTP {}", status)));
        }

        let body = response.bytes().await?;

        serde_json::from_slice(&body).map_err(|e| WeatherError::MalformedResponse(e.to_string()))
    }
}
