//! JSON output formatter

use crate::error::Result;
use crate::format::OutputFormatter;
use crate::selector::SearchOutcome;

/// JSON formatter - outputs full outcome as pretty-printed JSON
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Full JSON result"
    }

    fn format(&self, outcome: &SearchOutcome) -> Result<String> {
        Ok(serde_json::to_string_pretty(outcome)?)
    }
}
