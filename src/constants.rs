//! Centralized constants for the closest-city crate
//!
//! Values shared by the gateways, the selector and the configuration layer.

/// Geographic constants
pub mod geo {
    /// Mean Earth radius in miles
    pub const EARTH_RADIUS_MILES: f64 = 3959.0;

    /// Miles per meter (routing APIs report distances in meters)
    pub const MILES_PER_METER: f64 = 0.000621371;
}

/// External API endpoints
pub mod api {
    /// Google Maps web services host
    pub const GOOGLE_MAPS_URL: &str = "https://maps.googleapis.com";

    /// Geocoding endpoint path
    pub const GEOCODE_PATH: &str = "/maps/api/geocode/json";

    /// Distance matrix endpoint path
    pub const DISTANCE_MATRIX_PATH: &str = "/maps/api/distancematrix/json";

    /// Environment variable that overrides the configured Google key
    pub const GOOGLE_API_KEY_ENV: &str = "GOOGLE_MAPS_API_KEY";
}
