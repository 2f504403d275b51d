//! Geocoding and routing gateways
//!
//! The selector only talks to these two traits. Two implementations exist:
//! the live Google Maps backend and an in-memory fixture used for tests and
//! offline runs. [`Gateway`] picks one of them at runtime.

pub mod fixture;
pub mod google;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::geo::Coordinates;
use std::future::Future;

/// Maps a city name to coordinates
pub trait Geocoder: Send + Sync {
    /// Geocode `name`, narrowing the search with `country_hint`
    ///
    /// Fails with `NotFound` on zero results, `Format` on a malformed
    /// response and `Gateway` on transport or quota errors.
    fn geocode(
        &self,
        name: &str,
        country_hint: &str,
    ) -> impl Future<Output = Result<Coordinates>> + Send;
}

/// Maps an ordered origin/destination pair to a driving distance
pub trait Router: Send + Sync {
    /// Driving distance in miles from `origin` to `destination`
    ///
    /// Fails with `NoRoute` when the pair cannot be routed, `Format` on a
    /// malformed response and `Gateway` on transport or quota errors.
    fn route_distance(
        &self,
        origin: &str,
        destination: &str,
        country_hint: &str,
    ) -> impl Future<Output = Result<f64>> + Send;
}

/// Gateway selected from configuration
#[derive(Debug, Clone)]
pub enum Gateway {
    Google(google::GoogleMapsBackend),
    Fixture(fixture::FixtureBackend),
}

impl Gateway {
    /// Build the gateway named by `defaults.backend`
    ///
    /// `fixture_override` takes precedence over the configured backend.
    pub fn from_config(config: &Config, fixture_override: Option<&str>) -> Result<Self> {
        if let Some(path) = fixture_override {
            return Ok(Gateway::Fixture(fixture::FixtureBackend::load(path)?));
        }

        match config.defaults.backend.as_str() {
            "google" => {
                let key = config.google_api_key().ok_or_else(|| {
                    Error::Config(
                        "Google Maps API key not found in environment variables or config"
                            .to_string(),
                    )
                })?;
                let timeout = config.request_timeout()?;
                Ok(Gateway::Google(google::GoogleMapsBackend::new(key, timeout)?))
            }
            "fixture" => {
                if config.defaults.fixture.is_empty() {
                    return Err(Error::Config(
                        "Backend 'fixture' requires defaults.fixture to point at a fixture file"
                            .to_string(),
                    ));
                }
                Ok(Gateway::Fixture(fixture::FixtureBackend::load(
                    &config.defaults.fixture,
                )?))
            }
            other => Err(Error::Config(format!("Unknown backend: {}", other))),
        }
    }

    /// Backend name as used in config and status output
    pub fn name(&self) -> &'static str {
        match self {
            Gateway::Google(_) => "google",
            Gateway::Fixture(_) => "fixture",
        }
    }
}

impl Geocoder for Gateway {
    async fn geocode(&self, name: &str, country_hint: &str) -> Result<Coordinates> {
        match self {
            Gateway::Google(backend) => backend.geocode(name, country_hint).await,
            Gateway::Fixture(backend) => backend.geocode(name, country_hint).await,
        }
    }
}

impl Router for Gateway {
    async fn route_distance(
        &self,
        origin: &str,
        destination: &str,
        country_hint: &str,
    ) -> Result<f64> {
        match self {
            Gateway::Google(backend) => {
                backend.route_distance(origin, destination, country_hint).await
            }
            Gateway::Fixture(backend) => {
                backend.route_distance(origin, destination, country_hint).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_unknown_backend() {
        let mut config = Config::default();
        config.defaults.backend = "carrier-pigeon".to_string();
        let result = Gateway::from_config(&config, None);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_fixture_backend_requires_path() {
        let mut config = Config::default();
        config.defaults.backend = "fixture".to_string();
        let result = Gateway::from_config(&config, None);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_fixture_override() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("fixture.toml");
        std::fs::write(
            &path,
            r#"
[cities.Chicago]
lat = 41.8781
lng = -87.6298
"#,
        )
        .unwrap();

        let config = Config::default();
        let gateway = Gateway::from_config(&config, path.to_str()).unwrap();
        assert_eq!(gateway.name(), "fixture");
    }

    #[test]
    fn test_google_with_configured_key() {
        let mut config = Config::default();
        config.api_keys.google = "test-key".to_string();
        let gateway = Gateway::from_config(&config, None).unwrap();
        assert_eq!(gateway.name(), "google");
    }

    #[tokio::test]
    async fn test_dispatch_to_fixture() {
        let backend = fixture::FixtureBackend::new()
            .with_city("Chicago", Coordinates::new(41.8781, -87.6298))
            .with_route("Chicago", "Milwaukee", 92.0);
        let gateway = Gateway::Fixture(backend);

        let coords = gateway.geocode("Chicago", "United States").await.unwrap();
        assert_eq!(coords.lat, 41.8781);

        let miles = gateway
            .route_distance("Chicago", "Milwaukee", "United States")
            .await
            .unwrap();
        assert_eq!(miles, 92.0);
    }
}
