use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::error::ErrorResponse;
use crate::weather::handlers::{self as weather_handlers, HealthResponse};
use crate::weather::WeatherRecord;

/// OpenAPI documentation for the weather page API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Weatherpage API",
        version = "1.0.0",
        description = "Current weather for a city, normalized from OpenWeatherMap.",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    paths(
        weather_handlers::get_weather,
        weather_handlers::health,
    ),
    tags(
        (name = "weather", description = "Current weather data"),
        (name = "health", description = "Liveness")
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            WeatherRecord,
        )
    )
)]
pub struct ApiDoc;

/// Create the Swagger UI router
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/weather"));
        assert!(doc.paths.paths.contains_key("/health"));
    }
}
