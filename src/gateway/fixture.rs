//! Deterministic in-memory gateway
//!
//! Answers geocoding and routing requests from fixed tables, so searches can
//! run without network access. Name lookups ignore case and surrounding
//! whitespace. The table can be built in code or loaded from a TOML file:
//!
//! ```toml
//! [cities]
//! Chicago = { lat = 41.8781, lng = -87.6298 }
//! Milwaukee = { lat = 43.0389, lng = -87.9065 }
//!
//! [[routes]]
//! origin = "Chicago"
//! destination = "Milwaukee"
//! miles = 92.0
//! ```

use crate::error::{Error, Result};
use crate::gateway::{Geocoder, Router};
use crate::geo::Coordinates;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Fixture gateway backed by lookup tables
#[derive(Debug, Clone, Default)]
pub struct FixtureBackend {
    cities: HashMap<String, Coordinates>,
    routes: HashMap<(String, String), f64>,
    geocode_calls: Arc<AtomicUsize>,
    route_calls: Arc<AtomicUsize>,
}

/// On-disk fixture layout
#[derive(Debug, Deserialize)]
struct FixtureFile {
    #[serde(default)]
    cities: HashMap<String, Coordinates>,
    #[serde(default)]
    routes: Vec<FixtureRoute>,
}

#[derive(Debug, Deserialize)]
struct FixtureRoute {
    origin: String,
    destination: String,
    miles: f64,
}

fn key(name: &str) -> String {
    name.trim().to_lowercase()
}

impl FixtureBackend {
    /// Create an empty fixture
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a city with known coordinates
    pub fn with_city(mut self, name: &str, coords: Coordinates) -> Self {
        self.cities.insert(key(name), coords);
        self
    }

    /// Add a directed driving route
    pub fn with_route(mut self, origin: &str, destination: &str, miles: f64) -> Self {
        self.routes.insert((key(origin), key(destination)), miles);
        self
    }

    /// Parse a fixture from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let file: FixtureFile = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse fixture file: {}", e)))?;

        let mut backend = Self::new();
        for (name, coords) in file.cities {
            coords.validate().map_err(|e| {
                Error::Config(format!("Invalid fixture coordinates for {}: {}", name, e))
            })?;
            backend = backend.with_city(&name, coords);
        }
        for route in file.routes {
            backend = backend.with_route(&route.origin, &route.destination, route.miles);
        }
        Ok(backend)
    }

    /// Load a fixture from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read fixture file {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Number of geocode requests answered (including failures)
    pub fn geocode_calls(&self) -> usize {
        self.geocode_calls.load(Ordering::SeqCst)
    }

    /// Number of routing requests answered (including failures)
    pub fn route_calls(&self) -> usize {
        self.route_calls.load(Ordering::SeqCst)
    }
}

impl Geocoder for FixtureBackend {
    async fn geocode(&self, name: &str, _country_hint: &str) -> Result<Coordinates> {
        self.geocode_calls.fetch_add(1, Ordering::SeqCst);
        self.cities
            .get(&key(name))
            .copied()
            .ok_or_else(|| Error::NotFound(format!("No results found for city: {}", name)))
    }
}

impl Router for FixtureBackend {
    async fn route_distance(
        &self,
        origin: &str,
        destination: &str,
        _country_hint: &str,
    ) -> Result<f64> {
        self.route_calls.fetch_add(1, Ordering::SeqCst);
        self.routes
            .get(&(key(origin), key(destination)))
            .copied()
            .ok_or_else(|| {
                Error::NoRoute(format!(
                    "No route found between {} and {}",
                    origin, destination
                ))
            })
    }
}
