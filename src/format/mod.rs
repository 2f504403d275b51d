//! Output formatters
//!
//! Provides trait-based output formatting for search results.

pub mod json;
pub mod text;

use crate::error::Result;
use crate::selector::SearchOutcome;
use serde::{Deserialize, Serialize};

/// Information about an output format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatInfo {
    /// Format name
    pub name: String,
    /// Format description
    pub description: String,
}

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Get the format name
    fn name(&self) -> &str;

    /// Get the format description
    fn description(&self) -> &str;

    /// Format a finished search
    fn format(&self, outcome: &SearchOutcome) -> Result<String>;
}

/// Get a formatter by name
pub fn get_formatter(name: &str) -> Option<Box<dyn OutputFormatter>> {
    match name.to_lowercase().as_str() {
        "json" => Some(Box::new(json::JsonFormatter)),
        "text" => Some(Box::new(text::TextFormatter)),
        _ => None,
    }
}

/// List all available formatters
pub fn available_formats() -> Vec<FormatInfo> {
    [
        Box::new(text::TextFormatter) as Box<dyn OutputFormatter>,
        Box::new(json::JsonFormatter),
    ]
    .iter()
    .map(|f| FormatInfo {
        name: f.name().to_string(),
        description: f.description().to_string(),
    })
    .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::geo::Coordinates;
    use crate::selector::{Candidate, DrivingDistance, SkipStage, SkippedCity};

    pub(crate) fn create_test_outcome() -> SearchOutcome {
        SearchOutcome {
            anchor_city: "Chicago".to_string(),
            anchor_coordinates: Coordinates::new(41.8781, -87.6298),
            radius: 200.0,
            closest_city: "Milwaukee".to_string(),
            driving_distance: 92.0,
            candidates: vec![Candidate {
                city: "Milwaukee".to_string(),
                coordinates: Coordinates::new(43.0389, -87.9065),
                linear_distance: 81.4,
            }],
            driving_distances: vec![DrivingDistance {
                city: "Milwaukee".to_string(),
                miles: 92.0,
            }],
            skipped: vec![SkippedCity {
                city: "Atlantis".to_string(),
                stage: SkipStage::Geocode,
                reason: "Not found: No results found for city: Atlantis".to_string(),
            }],
        }
    }

    #[test]
    fn test_get_formatter() {
        assert!(get_formatter("json").is_some());
        assert!(get_formatter("text").is_some());
        assert!(get_formatter("unknown").is_none());
    }

    #[test]
    fn test_get_formatter_case_insensitive() {
        assert!(get_formatter("JSON").is_some());
        assert!(get_formatter("Text").is_some());
    }

    #[test]
    fn test_available_formats() {
        let formats = available_formats();
        assert_eq!(formats.len(), 2);
        assert!(formats.iter().any(|f| f.name == "json"));
        assert!(formats.iter().any(|f| f.name == "text"));
    }
}
