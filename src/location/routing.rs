//! Redirect decisions
//!
//! Every navigation after a city is resolved goes through [`CityWhitelist::route`],
//! so a city-scoped path is only produced for serviced cities.

use crate::constants::location::{LANDING_PATH, UNAVAILABLE_PATH};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Where the browser should go next
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "city", rename_all = "snake_case")]
pub enum Navigation {
    /// A serviced city, as its lowercase identifier
    City(String),
    /// A city without service, as the name that was attempted
    Unavailable(String),
}

impl Navigation {
    /// The route path, e.g. `/mumbai` or `/services-unavailable?city=Goa`
    pub fn path(&self) -> String {
        match self {
            Navigation::City(slug) => format!("/{}", slug),
            Navigation::Unavailable(city) => {
                format!("{}?city={}", UNAVAILABLE_PATH, urlencoding::encode(city))
            }
        }
    }

    pub fn is_serviced(&self) -> bool {
        matches!(self, Navigation::City(_))
    }
}

impl fmt::Display for Navigation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// The fixed set of serviced cities
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityWhitelist {
    cities: HashSet<String>,
}

impl CityWhitelist {
    pub fn new<I, S>(cities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            cities: cities
                .into_iter()
                .map(|c| normalize_city(c.as_ref()))
                .filter(|c| !c.is_empty())
                .collect(),
        }
    }

    pub fn contains(&self, city: &str) -> bool {
        self.cities.contains(&normalize_city(city))
    }

    /// Serviced cities, sorted
    pub fn cities(&self) -> Vec<String> {
        let mut cities: Vec<String> = self.cities.iter().cloned().collect();
        cities.sort();
        cities
    }

    /// The redirect target for `city`
    pub fn route(&self, city: &str) -> Navigation {
        let slug = normalize_city(city);
        if self.cities.contains(&slug) {
            Navigation::City(slug)
        } else {
            Navigation::Unavailable(city.trim().to_string())
        }
    }
}

/// Lowercase identifier for a city name
pub fn normalize_city(city: &str) -> String {
    city.trim().to_lowercase()
}

/// Whether `path` is the landing route
pub fn is_landing(path: &str) -> bool {
    let path = path.split('?').next().unwrap_or_default();
    path.is_empty() || path == LANDING_PATH
}

/// City segment of a city-scoped route such as `/pune/plumbing`
pub fn city_from_path(path: &str) -> Option<String> {
    let path = path.split('?').next().unwrap_or_default();
    let first = path.trim_start_matches('/').split('/').next()?;
    if first.is_empty() || format!("/{}", first) == UNAVAILABLE_PATH || first == "api" {
        return None;
    }
    let decoded = urlencoding::decode(first).ok()?;
    Some(decoded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::location::SERVICED_CITIES;

    fn whitelist() -> CityWhitelist {
        CityWhitelist::new(SERVICED_CITIES)
    }

    #[test]
    fn test_serviced_city_is_lowercased() {
        let nav = whitelist().route("Mumbai");
        assert_eq!(nav, Navigation::City("mumbai".to_string()));
        assert_eq!(nav.path(), "/mumbai");
        assert!(nav.is_serviced());
    }

    #[test]
    fn test_unserviced_city_goes_to_unavailable() {
        for city in ["Goa", "Surat", "Nagpur"] {
            let nav = whitelist().route(city);
            assert!(!nav.is_serviced());
            assert_eq!(nav.path(), format!("/services-unavailable?city={}", city));
        }
    }

    #[test]
    fn test_unavailable_city_is_encoded() {
        let nav = whitelist().route("Navi Mumbai");
        assert_eq!(nav.path(), "/services-unavailable?city=Navi%20Mumbai");
    }

    #[test]
    fn test_whitelist_ignores_case_and_whitespace() {
        let list = CityWhitelist::new(["  Pune ", "DELHI", ""]);
        assert!(list.contains("pune"));
        assert!(list.contains("Delhi"));
        assert_eq!(list.cities(), vec!["delhi", "pune"]);
    }

    #[test]
    fn test_landing_detection() {
        assert!(is_landing("/"));
        assert!(is_landing("/?utm=x"));
        assert!(is_landing(""));
        assert!(!is_landing("/indore"));
    }

    #[test]
    fn test_city_from_path() {
        assert_eq!(city_from_path("/pune/plumbing"), Some("pune".to_string()));
        assert_eq!(city_from_path("/navi%20mumbai"), Some("navi mumbai".to_string()));
        assert_eq!(city_from_path("/services-unavailable?city=Goa"), None);
        assert_eq!(city_from_path("/api/geocode/ip"), None);
        assert_eq!(city_from_path("/"), None);
    }
}
