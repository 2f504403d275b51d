//! Coordinates and great-circle distance
//!
//! The haversine distance is only used as a cheap pre-filter before asking
//! the routing gateway for real driving distances.

use crate::constants::geo::EARTH_RADIUS_MILES;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A geographic coordinate (latitude, longitude) in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Create new coordinates
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validate that coordinates are within valid ranges
    ///
    /// Latitude: -90 to 90
    /// Longitude: -180 to 180
    pub fn validate(&self) -> Result<()> {
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(Error::Format(format!(
                "Latitude {} is out of range [-90, 90]",
                self.lat
            )));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(Error::Format(format!(
                "Longitude {} is out of range [-180, 180]",
                self.lng
            )));
        }
        Ok(())
    }

    /// Great-circle distance to `other` in miles, using the mean Earth radius
    pub fn distance_miles(&self, other: &Coordinates) -> f64 {
        haversine_miles(*self, *other, EARTH_RADIUS_MILES)
    }
}

/// Calculate the great-circle distance between two points (haversine formula)
///
/// # Arguments
/// * `p1` - First point
/// * `p2` - Second point
/// * `earth_radius_miles` - Sphere radius to scale the central angle by
///
/// # Returns
/// Distance in miles
pub fn haversine_miles(p1: Coordinates, p2: Coordinates, earth_radius_miles: f64) -> f64 {
    let lat1 = p1.lat.to_radians();
    let lat2 = p2.lat.to_radians();
    let delta_lat = lat2 - lat1;
    let delta_lng = (p2.lng - p1.lng).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);

    // Clamp guards asin against h drifting just above 1.0 for antipodal points
    let c = 2.0 * h.sqrt().min(1.0).asin();

    earth_radius_miles * c
}
