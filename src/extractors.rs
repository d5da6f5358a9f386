use axum::{
    extract::{Form, FromRequest, Query, Request},
    http::{Method, StatusCode},
};
use thiserror::Error;
use utoipa::IntoParams;

use crate::error::HttpError;
use crate::impl_into_response;

/// City supplied as `?city=` on GET or as a form field on POST
/// (OpenAPI parameter docs only; extraction goes through `CityParam`)
#[allow(dead_code)]
#[derive(Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CityQuery {
    /// City name, e.g. "London" or "Paris,FR"
    pub city: Option<String>,
}

/// Extracts a non-empty city name from the request
///
/// GET reads the query string, POST reads an urlencoded form body. The first
/// `city` pair wins and its value is passed on untouched; upstream decides
/// whether it names a real place. Missing or empty input is rejected with 400.
#[derive(Debug)]
pub struct CityParam(pub String);

impl<S> FromRequest<S> for CityParam
where
    S: Send + Sync,
{
    type Rejection = MissingCity;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let pairs = if req.method() == Method::POST {
            Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map(|Form(pairs)| pairs)
                .unwrap_or_default()
        } else {
            Query::<Vec<(String, String)>>::try_from_uri(req.uri())
                .map(|Query(pairs)| pairs)
                .unwrap_or_default()
        };

        pairs
            .into_iter()
            .find(|(key, _)| key == "city")
            .map(|(_, city)| city)
            .filter(|city| !city.is_empty())
            .map(CityParam)
            .ok_or(MissingCity)
    }
}

/// Rejection for requests without a usable city
#[derive(Debug, Error)]
#[error("City parameter is required")]
pub struct MissingCity;

impl HttpError for MissingCity {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }
}

impl_into_response!(MissingCity);

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::header::CONTENT_TYPE};

    async fn extract(req: Request) -> Result<String, MissingCity> {
        CityParam::from_request(req, &()).await.map(|CityParam(city)| city)
    }

    fn get(uri: &str) -> Request {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_form(body: &'static str) -> Request {
        Request::builder()
            .method(Method::POST)
            .uri("/weather")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_query_city() {
        assert_eq!(extract(get("/weather?city=London")).await.unwrap(), "London");
    }

    #[tokio::test]
    async fn test_query_city_is_decoded_and_kept_verbatim() {
        assert_eq!(
            extract(get("/weather?city=%20New%20York%20")).await.unwrap(),
            " New York "
        );
    }

    #[tokio::test]
    async fn test_repeated_city_takes_first() {
        assert_eq!(
            extract(get("/weather?city=Oslo&city=Bergen")).await.unwrap(),
            "Oslo"
        );
    }

    #[tokio::test]
    async fn test_other_params_ignored() {
        assert_eq!(
            extract(get("/weather?units=imperial&city=Rome")).await.unwrap(),
            "Rome"
        );
    }

    #[tokio::test]
    async fn test_missing_query_rejected() {
        assert!(extract(get("/weather")).await.is_err());
    }

    #[tokio::test]
    async fn test_empty_query_rejected() {
        assert!(extract(get("/weather?city=")).await.is_err());
    }

    #[tokio::test]
    async fn test_blank_query_passed_through() {
        assert_eq!(extract(get("/weather?city=%20")).await.unwrap(), " ");
    }

    #[tokio::test]
    async fn test_form_city() {
        assert_eq!(extract(post_form("city=Paris")).await.unwrap(), "Paris");
    }

    #[tokio::test]
    async fn test_form_repeated_city_takes_first() {
        assert_eq!(
            extract(post_form("city=Lyon&city=Nice")).await.unwrap(),
            "Lyon"
        );
    }

    #[tokio::test]
    async fn test_empty_form_city_rejected() {
        assert!(extract(post_form("city=")).await.is_err());
    }

    #[tokio::test]
    async fn test_post_ignores_query_string() {
        let req = Request::builder()
            .method(Method::POST)
            .uri("/weather?city=London")
            .body(Body::empty())
            .unwrap();
        assert!(extract(req).await.is_err());
    }

    #[test]
    fn test_rejection_is_bad_request() {
        assert_eq!(MissingCity.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(MissingCity.client_message(), "City parameter is required");
    }
}
