//! Google Maps backend
//!
//! Geocoding API for names, Distance Matrix API for driving distances.
//! Every query is suffixed with the country hint ("Springfield, United States")
//! to keep ambiguous names in the right country.

use crate::constants::api::{DISTANCE_MATRIX_PATH, GEOCODE_PATH, GOOGLE_MAPS_URL};
use crate::constants::geo::MILES_PER_METER;
use crate::error::{Error, Result};
use crate::gateway::{Geocoder, Router};
use crate::geo::Coordinates;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("closest-city/", env!("CARGO_PKG_VERSION"));

/// Google Maps geocoding + distance matrix backend
#[derive(Clone)]
pub struct GoogleMapsBackend {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for GoogleMapsBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleMapsBackend")
            .field("base_url", &self.base_url)
            .field("api_key", &"***")
            .finish()
    }
}

/// Geocoding API response
#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

/// Distance Matrix API response
#[derive(Debug, Deserialize)]
struct DistanceMatrixResponse {
    status: String,
    #[serde(default)]
    rows: Vec<MatrixRow>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MatrixRow {
    #[serde(default)]
    elements: Vec<MatrixElement>,
}

#[derive(Debug, Deserialize)]
struct MatrixElement {
    status: String,
    #[serde(default)]
    distance: Option<MatrixValue>,
}

#[derive(Debug, Deserialize)]
struct MatrixValue {
    /// Meters
    value: f64,
}

impl GoogleMapsBackend {
    /// Create a backend talking to the public Google Maps endpoints
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        Self::with_base_url(api_key, GOOGLE_MAPS_URL, timeout)
    }

    /// Create a backend against a different host (used by tests)
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(Error::Config("Google Maps API key is empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// GET `path` with query params, returning the body of a 2xx response
    async fn get_json_text(&self, path: &str, params: &[(&str, &str)]) -> Result<String> {
        let mut url = format!("{}{}?key={}", self.base_url, path, urlencoding::encode(&self.api_key));
        for (name, value) in params {
            url.push('&');
            url.push_str(name);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }

        debug!(path, ?params, "Calling Google Maps");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Gateway(format!("Google Maps request failed: {}", e.without_url())))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Gateway(format!("Google Maps returned status: {}", status)));
        }

        response
            .text()
            .await
            .map_err(|e| Error::Gateway(format!("Failed to read Google Maps response: {}", e.without_url())))
    }
}

/// Turn a geocoding response body into coordinates
fn interpret_geocode(name: &str, body: &str) -> Result<Coordinates> {
    let response: GeocodeResponse = serde_json::from_str(body).map_err(|e| {
        Error::Format(format!("Invalid geocoding response for city {}: {}", name, e))
    })?;

    match response.status.as_str() {
        "OK" => {}
        "ZERO_RESULTS" => {
            return Err(Error::NotFound(format!("No results found for city: {}", name)));
        }
        status => {
            let detail = response.error_message.unwrap_or_default();
            return Err(Error::Gateway(format!(
                "Google Maps API error for {}: {} {}",
                name, status, detail
            )
            .trim_end()
            .to_string()));
        }
    }

    let location = response
        .results
        .into_iter()
        .next()
        .ok_or_else(|| Error::NotFound(format!("No results found for city: {}", name)))?
        .geometry
        .location;

    let coordinates = Coordinates::new(location.lat, location.lng);
    coordinates.validate().map_err(|e| {
        Error::Format(format!("Invalid geocoding response for city {}: {}", name, e))
    })?;

    Ok(coordinates)
}

/// Turn a distance matrix response body into driving miles
fn interpret_distance_matrix(origin: &str, destination: &str, body: &str) -> Result<f64> {
    let response: DistanceMatrixResponse = serde_json::from_str(body).map_err(|e| {
        Error::Format(format!("Invalid response format from Distance Matrix API: {}", e))
    })?;

    if response.status != "OK" {
        let detail = response.error_message.unwrap_or_default();
        return Err(Error::Gateway(
            format!("API Error: {} - Could not calculate distance {}", response.status, detail)
                .trim_end()
                .to_string(),
        ));
    }

    let element = response
        .rows
        .into_iter()
        .next()
        .and_then(|row| row.elements.into_iter().next())
        .ok_or_else(|| {
            Error::Format("Invalid response format from Distance Matrix API".to_string())
        })?;

    if element.status != "OK" {
        return Err(Error::NoRoute(format!(
            "Route Error: {} - No route found between {} and {}",
            element.status, origin, destination
        )));
    }

    let meters = element
        .distance
        .ok_or_else(|| Error::Format("Distance Matrix element has no distance".to_string()))?
        .value;

    Ok(meters * MILES_PER_METER)
}

fn with_hint(name: &str, country_hint: &str) -> String {
    if country_hint.is_empty() {
        name.to_string()
    } else {
        format!("{}, {}", name, country_hint)
    }
}

impl Geocoder for GoogleMapsBackend {
    async fn geocode(&self, name: &str, country_hint: &str) -> Result<Coordinates> {
        let address = with_hint(name, country_hint);
        let body = self
            .get_json_text(GEOCODE_PATH, &[("address", address.as_str())])
            .await?;
        interpret_geocode(name, &body)
    }
}

impl Router for GoogleMapsBackend {
    async fn route_distance(
        &self,
        origin: &str,
        destination: &str,
        country_hint: &str,
    ) -> Result<f64> {
        let origins = with_hint(origin, country_hint);
        let destinations = with_hint(destination, country_hint);
        let body = self
            .get_json_text(
                DISTANCE_MATRIX_PATH,
                &[
                    ("origins", origins.as_str()),
                    ("destinations", destinations.as_str()),
                    ("mode", "driving"),
                    ("units", "imperial"),
                ],
            )
            .await?;
        interpret_distance_matrix(origin, destination, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use axum::{extract::Query, routing::get, Router as AxumRouter};
    use std::collections::HashMap;

    #[test]
    fn test_interpret_geocode_ok() {
        let body = r#"{
            "status": "OK",
            "results": [
                {"geometry": {"location": {"lat": 41.8781136, "lng": -87.6297982}},
                 "formatted_address": "Chicago, IL, USA"}
            ]
        }"#;
        let coords = interpret_geocode("Chicago", body).unwrap();
        assert_relative_eq!(coords.lat, 41.8781136);
        assert_relative_eq!(coords.lng, -87.6297982);
    }

    #[test]
    fn test_interpret_geocode_zero_results() {
        let body = r#"{"status": "ZERO_RESULTS", "results": []}"#;
        assert!(matches!(interpret_geocode("Atlantis", body), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_interpret_geocode_ok_but_empty() {
        let body = r#"{"status": "OK", "results": []}"#;
        assert!(matches!(interpret_geocode("Atlantis", body), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_interpret_geocode_denied() {
        let body = r#"{"status": "REQUEST_DENIED", "results": [],
                       "error_message": "The provided API key is invalid."}"#;
        match interpret_geocode("Chicago", body) {
            Err(Error::Gateway(msg)) => {
                assert!(msg.contains("REQUEST_DENIED"));
                assert!(msg.contains("invalid"));
            }
            other => panic!("expected gateway error, got {:?}", other),
        }
    }

    #[test]
    fn test_interpret_geocode_malformed() {
        let body = r#"{"status": "OK", "results": [{"geometry": {}}]}"#;
        assert!(matches!(interpret_geocode("Chicago", body), Err(Error::Format(_))));
        assert!(matches!(interpret_geocode("Chicago", "<html>"), Err(Error::Format(_))));
    }

    #[test]
    fn test_interpret_geocode_out_of_range() {
        let body = r#"{
            "status": "OK",
            "results": [{"geometry": {"location": {"lat": 141.9, "lng": -87.6}}}]
        }"#;
        match interpret_geocode("Chicago", body) {
            Err(Error::Format(msg)) => assert!(msg.contains("Latitude")),
            other => panic!("expected format error, got {:?}", other),
        }
    }

    #[test]
    fn test_interpret_distance_ok() {
        let body = r#"{
            "status": "OK",
            "rows": [{"elements": [{
                "status": "OK",
                "distance": {"text": "92.0 mi", "value": 148060},
                "duration": {"text": "1 hour 34 mins", "value": 5640}
            }]}]
        }"#;
        let miles = interpret_distance_matrix("Chicago", "Milwaukee", body).unwrap();
        assert_relative_eq!(miles, 148060.0 * MILES_PER_METER);
        assert!((miles - 92.0).abs() < 0.1);
    }

    #[test]
    fn test_interpret_distance_no_route() {
        let body = r#"{"status": "OK", "rows": [{"elements": [{"status": "ZERO_RESULTS"}]}]}"#;
        match interpret_distance_matrix("Honolulu", "Chicago", body) {
            Err(Error::NoRoute(msg)) => assert!(msg.contains("Honolulu")),
            other => panic!("expected no-route error, got {:?}", other),
        }
    }

    #[test]
    fn test_interpret_distance_bad_status() {
        let body = r#"{"status": "OVER_QUERY_LIMIT", "rows": []}"#;
        assert!(matches!(
            interpret_distance_matrix("A", "B", body),
            Err(Error::Gateway(_))
        ));
    }

    #[test]
    fn test_interpret_distance_missing_rows() {
        let body = r#"{"status": "OK", "rows": []}"#;
        assert!(matches!(
            interpret_distance_matrix("A", "B", body),
            Err(Error::Format(_))
        ));

        let body = r#"{"status": "OK", "rows": [{"elements": [{"status": "OK"}]}]}"#;
        assert!(matches!(
            interpret_distance_matrix("A", "B", body),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn test_with_hint() {
        assert_eq!(with_hint("Austin", "United States"), "Austin, United States");
        assert_eq!(with_hint("Austin", ""), "Austin");
    }

    #[test]
    fn test_empty_key_rejected() {
        let result = GoogleMapsBackend::new("", Duration::from_secs(5));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_debug_redacts_key() {
        let backend = GoogleMapsBackend::new("secret-key", Duration::from_secs(5)).unwrap();
        let debug = format!("{:?}", backend);
        assert!(debug.contains("GoogleMapsBackend"));
        assert!(!debug.contains("secret-key"));
    }

    async fn spawn_fake_google() -> String {
        async fn geocode(Query(params): Query<HashMap<String, String>>) -> String {
            assert_eq!(params.get("key").map(String::as_str), Some("test-key"));
            match params.get("address").map(String::as_str) {
                Some("Chicago, United States") => r#"{"status": "OK", "results": [
                    {"geometry": {"location": {"lat": 41.8781, "lng": -87.6298}}}]}"#
                    .to_string(),
                _ => r#"{"status": "ZERO_RESULTS", "results": []}"#.to_string(),
            }
        }

        async fn matrix(Query(params): Query<HashMap<String, String>>) -> String {
            assert_eq!(params.get("mode").map(String::as_str), Some("driving"));
            assert_eq!(params.get("units").map(String::as_str), Some("imperial"));
            r#"{"status": "OK", "rows": [{"elements": [
                {"status": "OK", "distance": {"value": 160934.4}}]}]}"#
                .to_string()
        }

        let app = AxumRouter::new()
            .route(GEOCODE_PATH, get(geocode))
            .route(DISTANCE_MATRIX_PATH, get(matrix))
            .route("/broken/maps/api/geocode/json", get(|| async {
                (axum::http::StatusCode::INTERNAL_SERVER_ERROR, "oops")
            }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_geocode_against_fake_server() {
        let base = spawn_fake_google().await;
        let backend =
            GoogleMapsBackend::with_base_url("test-key", &base, Duration::from_secs(5)).unwrap();

        let coords = backend.geocode("Chicago", "United States").await.unwrap();
        assert_relative_eq!(coords.lat, 41.8781);

        let missing = backend.geocode("Atlantis", "United States").await;
        assert!(matches!(missing, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_route_distance_against_fake_server() {
        let base = spawn_fake_google().await;
        let backend =
            GoogleMapsBackend::with_base_url("test-key", &base, Duration::from_secs(5)).unwrap();

        let miles = backend
            .route_distance("Chicago", "Milwaukee", "United States")
            .await
            .unwrap();
        assert!((miles - 100.0).abs() < 0.01);
    }

    #[tokio::test]
    async fn test_http_error_status_is_gateway_error() {
        let base = spawn_fake_google().await;
        let backend = GoogleMapsBackend::with_base_url(
            "test-key",
            format!("{}/broken", base),
            Duration::from_secs(5),
        )
        .unwrap();

        let result = backend.geocode("Chicago", "United States").await;
        assert!(matches!(result, Err(Error::Gateway(_))));
    }
}
