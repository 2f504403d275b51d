//! City list loading
//!
//! Input is plain UTF-8 text with one city name per line. Blank lines are
//! ignored and surrounding whitespace is trimmed.

use crate::error::{Error, Result};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Parse raw text into unique, trimmed, non-empty city names
///
/// Duplicates are detected on exact string equality. The result is sorted.
pub fn parse_cities(text: &str) -> Result<Vec<String>> {
    parse_city_names(text.lines())
}

/// Apply the same trimming and dedup rules to names that are already split
///
/// Each item is one name; line breaks inside an item are not split on.
pub fn parse_city_names<'a, I>(names: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = &'a str>,
{
    let cities: BTreeSet<&str> = names
        .into_iter()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if cities.is_empty() {
        return Err(Error::EmptyInput("No valid cities found in the input".to_string()));
    }

    Ok(cities.into_iter().map(String::from).collect())
}

/// Read and parse a cities file
pub fn read_cities_file(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        std::io::Error::new(
            e.kind(),
            format!("Cities file '{}' could not be read: {}", path.display(), e),
        )
    })?;

    parse_cities(&content)
}
