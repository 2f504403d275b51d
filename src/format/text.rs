//! Human-readable text output formatter

use crate::error::Result;
use crate::format::OutputFormatter;
use crate::selector::SearchOutcome;

/// Text formatter - outputs human-readable summary
pub struct TextFormatter;

impl OutputFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable text"
    }

    fn format(&self, outcome: &SearchOutcome) -> Result<String> {
        let mut output = String::new();

        output.push_str(&format!(
            "Anchor: {} ({:.4}, {:.4})\n",
            outcome.anchor_city, outcome.anchor_coordinates.lat, outcome.anchor_coordinates.lng
        ));
        output.push_str(&format!("Radius: {} miles\n", outcome.radius));
        output.push_str(&format!(
            "Cities within radius: {}\n",
            outcome.candidates.len()
        ));

        if !outcome.skipped.is_empty() {
            output.push_str(&format!("Skipped: {}\n", outcome.skipped.len()));
        }

        output.push_str("\nResult:\n");
        output.push_str(&format!("Closest city: {}\n", outcome.closest_city));
        output.push_str(&format!(
            "Driving distance: {:.2} miles",
            outcome.driving_distance
        ));

        Ok(output)
    }
}
