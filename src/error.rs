//! Error types for closest-city

use thiserror::Error;

/// Main error type for closest-city operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid radius: {0}")]
    InvalidRadius(String),

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("No route: {0}")]
    NoRoute(String),

    #[error("Invalid response format: {0}")]
    Format(String),

    #[error("Gateway error: {0}")]
    Gateway(String),

    #[error("No cities found within {radius} miles radius")]
    NoCandidatesInRadius { radius: f64 },

    #[error("Could not find any reachable cities by driving")]
    NoReachableCity,

    #[error("History error: {0}")]
    History(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Short machine-readable code used in API error bodies
    pub fn code(&self) -> &'static str {
        match self {
            Error::Config(_) => "CONFIG_ERROR",
            Error::InvalidRadius(_) => "INVALID_RADIUS",
            Error::EmptyInput(_) => "EMPTY_INPUT",
            Error::NotFound(_) => "NOT_FOUND",
            Error::NoRoute(_) => "NO_ROUTE",
            Error::Format(_) => "FORMAT_ERROR",
            Error::Gateway(_) | Error::Http(_) => "GATEWAY_ERROR",
            Error::NoCandidatesInRadius { .. } => "NO_CANDIDATES_IN_RADIUS",
            Error::NoReachableCity => "NO_REACHABLE_CITY",
            Error::History(_) => "HISTORY_ERROR",
            _ => "INTERNAL_ERROR",
        }
    }
}

/// Result type alias for closest-city operations
pub type Result<T> = std::result::Result<T, Error>;
