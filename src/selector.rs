//! Closest-city selection
//!
//! Two passes over the candidate list:
//! 1. geocode every candidate and keep those within `radius` miles of the
//!    anchor by great-circle distance;
//! 2. ask the router for the driving distance to each kept city and pick the
//!    smallest.
//!
//! Gateway failures for individual cities are logged and skipped. Only an
//! empty candidate set or a set with no routable city fails the search.
//! Candidates are visited in name order and compared with strict less-than,
//! so equal driving distances resolve to the alphabetically first city.

use crate::constants::geo::EARTH_RADIUS_MILES;
use crate::config::defaults::DEFAULT_COUNTRY_HINT;
use crate::error::{Error, Result};
use crate::gateway::{Geocoder, Router};
use crate::geo::{haversine_miles, Coordinates};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;
use tracing::{info, warn};

/// How candidate names are compared against the anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorMatch {
    /// Byte-for-byte equality
    Exact,
    /// Equality after trimming and lowercasing both sides
    #[default]
    CaseInsensitive,
}

impl AnchorMatch {
    /// Whether `candidate` names the anchor under this policy
    pub fn matches(&self, candidate: &str, anchor: &str) -> bool {
        match self {
            Self::Exact => candidate == anchor,
            Self::CaseInsensitive => {
                candidate.trim().to_lowercase() == anchor.trim().to_lowercase()
            }
        }
    }
}

impl fmt::Display for AnchorMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::CaseInsensitive => write!(f, "case_insensitive"),
        }
    }
}

impl FromStr for AnchorMatch {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exact" => Ok(Self::Exact),
            "case_insensitive" | "case-insensitive" | "caseinsensitive" => {
                Ok(Self::CaseInsensitive)
            }
            _ => Err(format!("Unknown anchor match policy: {}", s)),
        }
    }
}

/// Settings that shape a search
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorConfig {
    /// Sphere radius for great-circle distances
    pub earth_radius_miles: f64,
    /// Country appended to every gateway query
    pub country_hint: String,
    /// Anchor exclusion policy
    pub anchor_match: AnchorMatch,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            earth_radius_miles: EARTH_RADIUS_MILES,
            country_hint: DEFAULT_COUNTRY_HINT.to_string(),
            anchor_match: AnchorMatch::default(),
        }
    }
}

/// A city inside the radius
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub city: String,
    pub coordinates: Coordinates,
    /// Great-circle miles from the anchor
    pub linear_distance: f64,
}

/// Driving distance obtained for a candidate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrivingDistance {
    pub city: String,
    pub miles: f64,
}

/// Which pass dropped a city
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipStage {
    Geocode,
    Route,
}

/// A city dropped because its gateway call failed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedCity {
    pub city: String,
    pub stage: SkipStage,
    pub reason: String,
}

/// Everything a delivery shell needs to render a finished search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub anchor_city: String,
    pub anchor_coordinates: Coordinates,
    pub radius: f64,
    pub closest_city: String,
    /// Driving miles from the anchor to `closest_city`
    pub driving_distance: f64,
    /// Candidate set, ordered by city name
    pub candidates: Vec<Candidate>,
    pub driving_distances: Vec<DrivingDistance>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedCity>,
}

/// Result of the straight-line pass
#[derive(Debug, Clone)]
pub struct RadiusScan {
    pub anchor_coordinates: Coordinates,
    /// Keyed by city name; every entry is within the radius
    pub candidates: BTreeMap<String, Candidate>,
    pub skipped: Vec<SkippedCity>,
}

/// Reject radii that are not strictly positive finite numbers
pub fn validate_radius(radius: f64) -> Result<()> {
    if radius.is_finite() && radius > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidRadius(format!(
            "Radius must be greater than 0, got {}",
            radius
        )))
    }
}

/// Finds the closest city by driving distance
#[derive(Debug, Clone, Default)]
pub struct Selector {
    config: SelectorConfig,
}

impl Selector {
    pub fn new(config: SelectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// Geocode the anchor and every other city, keeping those within `radius`
    ///
    /// Fails if the radius is invalid, the anchor is blank or cannot be
    /// geocoded, or no city ends up inside the radius. Nothing is sent to a
    /// gateway before the radius and anchor are validated.
    pub async fn scan_radius<G: Geocoder>(
        &self,
        cities: &[String],
        anchor: &str,
        radius: f64,
        geocoder: &G,
    ) -> Result<RadiusScan> {
        validate_radius(radius)?;

        let anchor = anchor.trim();
        if anchor.is_empty() {
            return Err(Error::EmptyInput("Anchor city is empty".to_string()));
        }

        let hint = self.config.country_hint.as_str();
        let anchor_coordinates = geocoder.geocode(anchor, hint).await?;

        info!("Calculating linear distances from {}...", anchor);

        let mut candidates = BTreeMap::new();
        let mut skipped = Vec::new();
        let mut seen = HashSet::new();

        for city in cities {
            if self.config.anchor_match.matches(city, anchor) || !seen.insert(city.as_str()) {
                continue;
            }

            let coordinates = match geocoder.geocode(city, hint).await {
                Ok(coordinates) => coordinates,
                Err(e) => {
                    warn!("Could not process {}: {}", city, e);
                    skipped.push(SkippedCity {
                        city: city.clone(),
                        stage: SkipStage::Geocode,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let linear_distance =
                haversine_miles(anchor_coordinates, coordinates, self.config.earth_radius_miles);

            if linear_distance <= radius {
                info!("{}: {:.2} miles (linear) - within radius", city, linear_distance);
                candidates.insert(
                    city.clone(),
                    Candidate {
                        city: city.clone(),
                        coordinates,
                        linear_distance,
                    },
                );
            } else {
                info!(
                    "{}: {:.2} miles (linear) - excluded (outside radius)",
                    city, linear_distance
                );
            }
        }

        if candidates.is_empty() {
            return Err(Error::NoCandidatesInRadius { radius });
        }

        Ok(RadiusScan {
            anchor_coordinates,
            candidates,
            skipped,
        })
    }

    /// Find the candidate closest to `anchor` by driving distance
    ///
    /// Only cities within `radius` great-circle miles are routed.
    pub async fn find_closest<G: Geocoder, R: Router>(
        &self,
        cities: &[String],
        anchor: &str,
        radius: f64,
        geocoder: &G,
        router: &R,
    ) -> Result<SearchOutcome> {
        let scan = self.scan_radius(cities, anchor, radius, geocoder).await?;
        let anchor = anchor.trim();
        let hint = self.config.country_hint.as_str();

        info!(
            "Calculating driving distances for {} cities within radius...",
            scan.candidates.len()
        );

        let mut skipped = scan.skipped;
        let mut driving_distances = Vec::with_capacity(scan.candidates.len());
        let mut closest: Option<(&str, f64)> = None;

        for city in scan.candidates.keys() {
            let miles = match router.route_distance(anchor, city, hint).await {
                Ok(miles) => miles,
                Err(e) => {
                    warn!("Could not calculate driving distance to {}: {}", city, e);
                    skipped.push(SkippedCity {
                        city: city.clone(),
                        stage: SkipStage::Route,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            info!("{}: {:.2} miles (driving)", city, miles);
            driving_distances.push(DrivingDistance {
                city: city.clone(),
                miles,
            });

            if closest.map_or(true, |(_, best)| miles < best) {
                closest = Some((city.as_str(), miles));
            }
        }

        let (closest_city, driving_distance) = closest.ok_or(Error::NoReachableCity)?;
        let closest_city = closest_city.to_string();

        Ok(SearchOutcome {
            anchor_city: anchor.to_string(),
            anchor_coordinates: scan.anchor_coordinates,
            radius,
            closest_city,
            driving_distance,
            candidates: scan.candidates.into_values().collect(),
            driving_distances,
            skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::fixture::FixtureBackend;

    fn names(cities: &[&str]) -> Vec<String> {
        cities.iter().map(|c| c.to_string()).collect()
    }

    /// Chicago with three Midwest neighbours; Detroit sits beyond 200 miles
    fn midwest() -> FixtureBackend {
        FixtureBackend::new()
            .with_city("Chicago", Coordinates::new(41.8781, -87.6298))
            .with_city("Milwaukee", Coordinates::new(43.0389, -87.9065))
            .with_city("Indianapolis", Coordinates::new(39.7684, -86.1581))
            .with_city("Detroit", Coordinates::new(42.3314, -83.0458))
            .with_route("Chicago", "Milwaukee", 92.0)
            .with_route("Chicago", "Indianapolis", 184.0)
            .with_route("Chicago", "Detroit", 281.0)
    }

    #[tokio::test]
    async fn test_chicago_scenario() {
        let gateway = midwest();
        let selector = Selector::default();

        let outcome = selector
            .find_closest(
                &names(&["Milwaukee", "Indianapolis", "Detroit"]),
                "Chicago",
                200.0,
                &gateway,
                &gateway,
            )
            .await
            .unwrap();

        assert_eq!(outcome.closest_city, "Milwaukee");
        assert_eq!(outcome.driving_distance, 92.0);
        assert_eq!(outcome.anchor_city, "Chicago");

        // Detroit is dropped by the straight-line pass, so it is never routed
        let candidate_names: Vec<&str> =
            outcome.candidates.iter().map(|c| c.city.as_str()).collect();
        assert_eq!(candidate_names, vec!["Indianapolis", "Milwaukee"]);
        assert_eq!(gateway.route_calls(), 2);
    }

    #[tokio::test]
    async fn test_candidates_within_radius() {
        let gateway = midwest();
        let selector = Selector::default();

        for radius in [50.0, 100.0, 170.0, 200.0, 300.0] {
            let result = selector
                .scan_radius(
                    &names(&["Milwaukee", "Indianapolis", "Detroit"]),
                    "Chicago",
                    radius,
                    &gateway,
                )
                .await;

            if let Ok(scan) = result {
                for candidate in scan.candidates.values() {
                    assert!(candidate.linear_distance <= radius);
                    let recomputed = scan.anchor_coordinates.distance_miles(&candidate.coordinates);
                    assert!(recomputed <= radius);
                }
            }
        }
    }

    #[tokio::test]
    async fn test_no_candidates_in_radius_skips_routing() {
        let gateway = midwest();
        let selector = Selector::default();

        let result = selector
            .find_closest(
                &names(&["Milwaukee", "Indianapolis", "Detroit"]),
                "Chicago",
                10.0,
                &gateway,
                &gateway,
            )
            .await;

        assert!(matches!(result, Err(Error::NoCandidatesInRadius { radius }) if radius == 10.0));
        assert_eq!(gateway.route_calls(), 0);
    }

    #[tokio::test]
    async fn test_geocode_failure_is_skipped() {
        let gateway = midwest();
        let selector = Selector::default();

        let outcome = selector
            .find_closest(
                &names(&["Milwaukee", "Atlantis", "Indianapolis"]),
                "Chicago",
                200.0,
                &gateway,
                &gateway,
            )
            .await
            .unwrap();

        assert_eq!(outcome.candidates.len(), 2);
        assert_eq!(outcome.closest_city, "Milwaukee");
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].city, "Atlantis");
        assert_eq!(outcome.skipped[0].stage, SkipStage::Geocode);
    }

    #[tokio::test]
    async fn test_anchor_geocode_failure_is_fatal() {
        let gateway = midwest();
        let selector = Selector::default();

        let result = selector
            .find_closest(&names(&["Milwaukee"]), "Atlantis", 200.0, &gateway, &gateway)
            .await;

        assert!(matches!(result, Err(Error::NotFound(_))));
        assert_eq!(gateway.geocode_calls(), 1);
    }

    #[tokio::test]
    async fn test_never_returns_anchor() {
        // The anchor routes to itself at zero miles, which would win if it were not excluded
        let gateway = midwest().with_route("Chicago", "chicago", 0.0);
        let selector = Selector::default();

        let outcome = selector
            .find_closest(
                &names(&["Chicago", " chicago ", "CHICAGO", "Milwaukee"]),
                "Chicago",
                200.0,
                &gateway,
                &gateway,
            )
            .await
            .unwrap();

        assert_eq!(outcome.closest_city, "Milwaukee");
        assert!(outcome
            .candidates
            .iter()
            .all(|c| !AnchorMatch::CaseInsensitive.matches(&c.city, "Chicago")));
    }

    #[tokio::test]
    async fn test_exact_policy_only_excludes_identical_name() {
        let gateway = midwest().with_route("Chicago", "chicago", 0.0);
        let selector = Selector::new(SelectorConfig {
            anchor_match: AnchorMatch::Exact,
            ..SelectorConfig::default()
        });

        let outcome = selector
            .find_closest(
                &names(&["Chicago", "chicago", "Milwaukee"]),
                "Chicago",
                200.0,
                &gateway,
                &gateway,
            )
            .await
            .unwrap();

        assert_eq!(outcome.closest_city, "chicago");
        assert_eq!(outcome.driving_distance, 0.0);
    }

    #[tokio::test]
    async fn test_invalid_radius_rejected_before_any_call() {
        let gateway = midwest();
        let selector = Selector::default();

        for radius in [0.0, -1.0, -200.0, f64::NAN, f64::INFINITY] {
            let result = selector
                .find_closest(&names(&["Milwaukee"]), "Chicago", radius, &gateway, &gateway)
                .await;
            assert!(matches!(result, Err(Error::InvalidRadius(_))));
        }

        assert_eq!(gateway.geocode_calls(), 0);
        assert_eq!(gateway.route_calls(), 0);
    }

    #[tokio::test]
    async fn test_blank_anchor_rejected() {
        let gateway = midwest();
        let result = Selector::default()
            .find_closest(&names(&["Milwaukee"]), "   ", 200.0, &gateway, &gateway)
            .await;

        assert!(matches!(result, Err(Error::EmptyInput(_))));
        assert_eq!(gateway.geocode_calls(), 0);
    }

    #[tokio::test]
    async fn test_routing_failure_is_skipped() {
        let gateway = FixtureBackend::new()
            .with_city("Chicago", Coordinates::new(41.8781, -87.6298))
            .with_city("Milwaukee", Coordinates::new(43.0389, -87.9065))
            .with_city("Indianapolis", Coordinates::new(39.7684, -86.1581))
            .with_route("Chicago", "Indianapolis", 184.0);

        let outcome = Selector::default()
            .find_closest(
                &names(&["Milwaukee", "Indianapolis"]),
                "Chicago",
                200.0,
                &gateway,
                &gateway,
            )
            .await
            .unwrap();

        assert_eq!(outcome.closest_city, "Indianapolis");
        assert_eq!(outcome.driving_distance, 184.0);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].stage, SkipStage::Route);
    }

    #[tokio::test]
    async fn test_no_reachable_city() {
        let gateway = FixtureBackend::new()
            .with_city("Honolulu", Coordinates::new(21.3069, -157.8583))
            .with_city("Hilo", Coordinates::new(19.7241, -155.0868));

        let result = Selector::default()
            .find_closest(&names(&["Hilo"]), "Honolulu", 500.0, &gateway, &gateway)
            .await;

        assert!(matches!(result, Err(Error::NoReachableCity)));
        assert_eq!(gateway.route_calls(), 1);
    }

    #[tokio::test]
    async fn test_ties_resolve_alphabetically() {
        let gateway = FixtureBackend::new()
            .with_city("Chicago", Coordinates::new(41.8781, -87.6298))
            .with_city("Zion", Coordinates::new(42.4461, -87.8329))
            .with_city("Aurora", Coordinates::new(41.7606, -88.3201))
            .with_route("Chicago", "Zion", 50.0)
            .with_route("Chicago", "Aurora", 50.0);

        let outcome = Selector::default()
            .find_closest(&names(&["Zion", "Aurora"]), "Chicago", 100.0, &gateway, &gateway)
            .await
            .unwrap();

        assert_eq!(outcome.closest_city, "Aurora");
    }

    #[tokio::test]
    async fn test_duplicate_candidates_geocoded_once() {
        let gateway = midwest();
        let outcome = Selector::default()
            .find_closest(
                &names(&["Milwaukee", "Milwaukee"]),
                "Chicago",
                200.0,
                &gateway,
                &gateway,
            )
            .await
            .unwrap();

        assert_eq!(outcome.candidates.len(), 1);
        // Anchor plus one lookup for Milwaukee
        assert_eq!(gateway.geocode_calls(), 2);
        assert_eq!(gateway.route_calls(), 1);
    }

    #[test]
    fn test_anchor_match_parse() {
        assert_eq!("exact".parse::<AnchorMatch>().unwrap(), AnchorMatch::Exact);
        assert_eq!(
            "Case-Insensitive".parse::<AnchorMatch>().unwrap(),
            AnchorMatch::CaseInsensitive
        );
        assert!("fuzzy".parse::<AnchorMatch>().is_err());
        assert_eq!(AnchorMatch::CaseInsensitive.to_string(), "case_insensitive");
    }

    #[test]
    fn test_validate_radius() {
        assert!(validate_radius(0.1).is_ok());
        assert!(validate_radius(0.0).is_err());
        assert!(validate_radius(-3.0).is_err());
    }
}
