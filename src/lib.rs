//! closest-city: Closest City by Driving Distance
//!
//! A library and CLI tool that, given a list of cities and an anchor city,
//! finds the city with the shortest driving distance among those inside a
//! straight-line search radius.
//!
//! ## Features
//!
//! - Haversine pre-filter so only nearby cities are routed
//! - Pluggable geocoding and routing gateways (Google Maps, fixture file)
//! - Per-city failures are skipped and reported, not fatal
//! - HTTP form + JSON API + CLI interface
//! - Local search history
//!
//! ## Quick Start
//!
//! ```rust
//! use closest_city::gateway::fixture::FixtureBackend;
//! use closest_city::{Coordinates, Selector, SelectorConfig};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let backend = FixtureBackend::new()
//!     .with_city("Chicago", Coordinates::new(41.8781, -87.6298))
//!     .with_city("Milwaukee", Coordinates::new(43.0389, -87.9065))
//!     .with_route("Chicago", "Milwaukee", 92.0);
//!
//! let cities = vec!["Chicago".to_string(), "Milwaukee".to_string()];
//! let selector = Selector::new(SelectorConfig::default());
//! let outcome = selector
//!     .find_closest(&cities, "Chicago", 200.0, &backend, &backend)
//!     .await
//!     .unwrap();
//!
//! assert_eq!(outcome.closest_city, "Milwaukee");
//! # });
//! ```

pub mod cities;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod format;
pub mod gateway;
pub mod geo;
pub mod history;
pub mod selector;
pub mod server;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use geo::Coordinates;
pub use selector::{SearchOutcome, Selector, SelectorConfig};
