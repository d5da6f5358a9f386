use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::service::WeatherError;

/// Placeholder for sunrise/sunset when upstream has no usable epoch
pub const NOT_AVAILABLE: &str = "N/A";

const CLOCK_FORMAT: &str = "%H:%M";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ============================================================================
// Current Weather API 2.5 Response (Internal)
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct OpenWeatherMapResponse {
    pub name: String,
    pub sys: Option<SysInfo>,
    pub main: MainInfo,
    pub weather: Vec<WeatherCondition>,
    pub wind: WindInfo,
    pub visibility: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SysInfo {
    pub country: Option<String>,
    pub sunrise: Option<i64>,
    pub sunset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct MainInfo {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: u32,
    pub pressure: u32,
}

#[derive(Debug, Deserialize)]
pub struct WeatherCondition {
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Deserialize)]
pub struct WindInfo {
    pub speed: f64,
    pub deg: Option<u32>,
}

// ============================================================================
// API Response (Public)
// ============================================================================

/// Normalized current weather for a city
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct WeatherRecord {
    pub city: String,
    /// ISO country code, empty when upstream omits it
    pub country: String,
    /// Degrees Celsius, rounded
    pub temperature: i64,
    /// Degrees Celsius, rounded
    pub feels_like: i64,
    /// Title-cased condition, e.g. "Light Rain"
    pub description: String,
    /// Percent
    pub humidity: u32,
    /// hPa
    pub pressure: u32,
    /// m/s, one decimal
    pub wind_speed: f64,
    /// Degrees, 0 when unknown
    pub wind_deg: u32,
    /// Meters, 0 when unknown
    pub visibility: u32,
    /// OpenWeatherMap icon id, e.g. "10d"
    pub icon: String,
    /// Local HH:MM or "N/A"
    pub sunrise: String,
    /// Local HH:MM or "N/A"
    pub sunset: String,
    /// When the record was built, "YYYY-MM-DD HH:MM:SS"
    pub timestamp: String,
}

impl WeatherRecord {
    /// Normalize a parsed upstream payload.
    ///
    /// Sunrise and sunset are rendered in the time zone of `now`, which also
    /// supplies the record timestamp. The only failure is a payload without
    /// any weather condition.
    pub fn from_upstream<Tz>(
        data: OpenWeatherMapResponse,
        now: DateTime<Tz>,
    ) -> Result<Self, WeatherError>
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let condition = data.weather.into_iter().next().ok_or_else(|| {
            WeatherError::MalformedResponse("No weather information available".to_string())
        })?;
        let sys = data.sys.unwrap_or_default();
        let tz = now.timezone();

        Ok(Self {
            city: data.name,
            country: sys.country.unwrap_or_default(),
            temperature: round_half_even(data.main.temp),
            feels_like: round_half_even(data.main.feels_like),
            description: title_case(&condition.description),
            humidity: data.main.humidity,
            pressure: data.main.pressure,
            wind_speed: round_one_decimal(data.wind.speed),
            wind_deg: data.wind.deg.unwrap_or(0),
            visibility: data.visibility.unwrap_or(0),
            icon: condition.icon,
            sunrise: format_clock(sys.sunrise, &tz),
            sunset: format_clock(sys.sunset, &tz),
            timestamp: now.format(TIMESTAMP_FORMAT).to_string(),
        })
    }
}

/// Round to the nearest integer, ties to even (2.5 -> 2, 3.5 -> 4)
fn round_half_even(value: f64) -> i64 {
    value.round_ties_even() as i64
}

/// Round to one decimal from the exact stored value, so 0.15 -> 0.1
/// (0.15 is stored as 0.1499...) and 2.45 -> 2.5
fn round_one_decimal(value: f64) -> f64 {
    format!("{:.1}", value).parse().unwrap_or(value)
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;

    for c in text.chars() {
        if in_word {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        in_word = c.is_alphabetic();
    }

    out
}

/// Epoch seconds to "HH:MM" in `tz`; zero, missing or unrepresentable -> "N/A"
fn format_clock<Tz>(epoch: Option<i64>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    epoch
        .filter(|&secs| secs != 0)
        .and_then(|secs| tz.timestamp_opt(secs, 0).single())
        .map(|dt| dt.format(CLOCK_FORMAT).to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}
