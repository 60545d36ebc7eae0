//! Payloads synthesized when the vendor cannot answer
//!
//! Shapes mirror the vendor schema so that clients parse live and fallback
//! data the same way. Output order follows the directory order, so repeated
//! calls with the same input return the same list.

use crate::constants::location::{DEFAULT_COUNTRY, DEFAULT_STATE_CODE};
use crate::constants::status;
use crate::directory::{match_cities, match_localities};
use crate::gateway::types::{
    AddressComponent, AutocompleteResponse, Feature, FeatureProperties, GeocodeResponse,
    GeocodeResult, LatLngLiteral, PlaceGeometry, Prediction, SearchResponse,
    StructuredFormatting,
};

/// The place reported when a geocode lookup cannot be answered
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultPlace {
    pub city: String,
    pub state: String,
    pub lat: f64,
    pub lng: f64,
}

/// City matches shaped like vendor text-search features
pub fn search_response(query: &str, limit: usize, reason: &str) -> SearchResponse {
    let features = match_cities(query)
        .into_iter()
        .take(limit)
        .map(|city| Feature {
            id: Some(city.id.to_string()),
            properties: FeatureProperties {
                name: Some(city.name.to_string()),
                formatted: Some(format!("{}, {}", city.name, DEFAULT_COUNTRY)),
                place_id: None,
            },
            geometry: None,
        })
        .collect();

    SearchResponse {
        features,
        status: status::FALLBACK.to_string(),
        error_details: Some(reason.to_string()),
    }
}

/// Locality then city matches shaped like vendor predictions
///
/// City predictions carry an empty secondary text so clients take the city
/// from the main text.
pub fn autocomplete_response(input: &str, limit: usize, reason: &str) -> AutocompleteResponse {
    let localities = match_localities(input).into_iter().map(|l| Prediction {
        place_id: l.id.to_string(),
        description: l.full_address.to_string(),
        structured_formatting: StructuredFormatting {
            main_text: l.name.to_string(),
            secondary_text: format!("{}, {}", l.city, l.state),
        },
        geometry: None,
    });

    let cities = match_cities(input).into_iter().map(|c| Prediction {
        place_id: c.id.to_string(),
        description: format!("{}, {}", c.name, DEFAULT_COUNTRY),
        structured_formatting: StructuredFormatting {
            main_text: c.name.to_string(),
            secondary_text: String::new(),
        },
        geometry: None,
    });

    AutocompleteResponse {
        predictions: localities.chain(cities).take(limit).collect(),
        status: status::FALLBACK.to_string(),
        error_details: Some(reason.to_string()),
    }
}

/// Single-result geocode payload centred on the default place
pub fn geocode_response(place: &DefaultPlace, reason: &str) -> GeocodeResponse {
    let state_code = if place.state == crate::constants::location::DEFAULT_STATE {
        DEFAULT_STATE_CODE.to_string()
    } else {
        place.state.clone()
    };

    let result = GeocodeResult {
        formatted_address: Some(format!("{}, {}, {}", place.city, place.state, DEFAULT_COUNTRY)),
        address_components: vec![
            AddressComponent {
                long_name: place.city.clone(),
                short_name: place.city.clone(),
                types: vec!["locality".to_string(), "political".to_string()],
            },
            AddressComponent {
                long_name: place.state.clone(),
                short_name: state_code,
                types: vec![
                    "administrative_area_level_1".to_string(),
                    "political".to_string(),
                ],
            },
            AddressComponent {
                long_name: DEFAULT_COUNTRY.to_string(),
                short_name: "IN".to_string(),
                types: vec!["country".to_string(), "political".to_string()],
            },
        ],
        geometry: Some(PlaceGeometry {
            location: LatLngLiteral {
                lat: place.lat,
                lng: place.lng,
            },
        }),
    };

    GeocodeResponse {
        results: vec![result],
        status: status::FALLBACK.to_string(),
        error_details: Some(reason.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::location::{DEFAULT_CITY, DEFAULT_LAT, DEFAULT_LNG, DEFAULT_STATE};

    fn indore() -> DefaultPlace {
        DefaultPlace {
            city: DEFAULT_CITY.to_string(),
            state: DEFAULT_STATE.to_string(),
            lat: DEFAULT_LAT,
            lng: DEFAULT_LNG,
        }
    }

    #[test]
    fn test_search_fallback_shape() {
        let response = search_response("pun", 5, "vendor down");
        assert!(response.is_fallback());
        assert_eq!(response.error_details.as_deref(), Some("vendor down"));
        assert_eq!(response.features.len(), 1);
        assert_eq!(response.features[0].id.as_deref(), Some("city-pune"));
        assert_eq!(response.features[0].properties.name.as_deref(), Some("Pune"));
        assert_eq!(response.features[0].properties.formatted.as_deref(), Some("Pune, India"));
    }

    #[test]
    fn test_search_fallback_respects_limit() {
        let response = search_response("a", 2, "x");
        assert_eq!(response.features.len(), 2);
    }

    #[test]
    fn test_search_fallback_is_stable() {
        let first = search_response("ba", 5, "x");
        let second = search_response("ba", 5, "x");
        assert_eq!(first, second);
    }

    #[test]
    fn test_autocomplete_fallback_lists_localities_first() {
        let response = autocomplete_response("indore", 10, "timeout");
        assert_eq!(response.status, "FALLBACK_RESPONSE");
        let last = response.predictions.last().unwrap();
        assert_eq!(last.place_id, "city-indore");
        assert!(last.structured_formatting.secondary_text.is_empty());
        assert_eq!(
            response.predictions[0].structured_formatting.secondary_text,
            "Indore, Madhya Pradesh"
        );
    }

    #[test]
    fn test_geocode_fallback_is_indore() {
        let response = geocode_response(&indore(), "ip lookup failed");
        assert!(response.is_fallback());
        let result = &response.results[0];
        assert_eq!(result.component("locality").unwrap().long_name, "Indore");
        assert_eq!(result.component("administrative_area_level_1").unwrap().short_name, "MP");
        let location = result.geometry.as_ref().unwrap().location;
        assert_eq!(location.lat, 22.7196);
        assert_eq!(location.lng, 75.8577);
    }
}
