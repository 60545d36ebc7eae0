//! Gateway payload → suggestion conversion
//!
//! Field defaults:
//! - search: city is the text before the first comma of `formatted`, state the
//!   second segment when there are at least three, country the last segment
//!   when there are at least two; `name` defaults to the city
//! - autocomplete: city is the first segment of `secondary_text`, or
//!   `main_text` when that is empty; state is the second segment, country the
//!   last when there are at least three
//! - geocode: `locality` and `administrative_area_level_1` components, with
//!   the default city and state code when absent

use crate::constants::location::{DEFAULT_CITY, DEFAULT_STATE_CODE};
use crate::gateway::types::{
    AutocompleteResponse, Feature, GeocodeResponse, Prediction, SearchResponse,
};
use crate::geo::{LatLng, LocatedPlace, PlaceSuggestion};

fn segments(text: &str) -> Vec<&str> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    text.split(',').map(str::trim).collect()
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

/// Suggestions from a text search response
pub fn suggestions_from_search(response: &SearchResponse) -> Vec<PlaceSuggestion> {
    response
        .features
        .iter()
        .enumerate()
        .filter_map(|(index, feature)| suggestion_from_feature(index, feature))
        .collect()
}

fn suggestion_from_feature(index: usize, feature: &Feature) -> Option<PlaceSuggestion> {
    let props = &feature.properties;
    let formatted = props.formatted.as_deref().unwrap_or_default();
    let parts = segments(formatted);

    let first = parts.first().copied().unwrap_or_default();
    let name = non_empty(props.name.as_deref()).or_else(|| non_empty(Some(first)))?;
    let city = non_empty(Some(first)).unwrap_or_else(|| name.clone());

    let state = if parts.len() >= 3 { non_empty(parts.get(1).copied()) } else { None };
    let country = if parts.len() >= 2 { non_empty(parts.last().copied()) } else { None };

    let location = feature.geometry.as_ref().and_then(|g| {
        if g.kind == "Point" && g.coordinates.len() >= 2 {
            Some(LatLng::new(g.coordinates[1], g.coordinates[0]))
        } else {
            None
        }
    });

    let id = feature
        .id
        .clone()
        .or_else(|| props.place_id.clone())
        .unwrap_or_else(|| format!("search-{}", index));

    Some(PlaceSuggestion {
        id,
        name,
        city,
        state,
        country,
        full_address: non_empty(Some(formatted)),
        location,
    })
}

/// Suggestions from an autocomplete response
pub fn suggestions_from_autocomplete(response: &AutocompleteResponse) -> Vec<PlaceSuggestion> {
    response
        .predictions
        .iter()
        .filter_map(suggestion_from_prediction)
        .collect()
}

fn suggestion_from_prediction(prediction: &Prediction) -> Option<PlaceSuggestion> {
    let formatting = &prediction.structured_formatting;
    let name = non_empty(Some(formatting.main_text.trim()))
        .or_else(|| non_empty(segments(&prediction.description).first().copied()))?;

    let parts = segments(&formatting.secondary_text);
    let city = non_empty(parts.first().copied()).unwrap_or_else(|| name.clone());
    let state = non_empty(parts.get(1).copied());
    let country = if parts.len() >= 3 { non_empty(parts.last().copied()) } else { None };

    Some(PlaceSuggestion {
        id: prediction.place_id.clone(),
        name,
        city,
        state,
        country,
        full_address: non_empty(Some(prediction.description.as_str())),
        location: prediction
            .geometry
            .as_ref()
            .map(|g| LatLng::new(g.location.lat, g.location.lng)),
    })
}

/// The first result of a geocode response, unless it was synthesized
pub fn place_from_geocode(response: &GeocodeResponse) -> Option<LocatedPlace> {
    if response.is_fallback() {
        return None;
    }
    let result = response.results.first()?;

    let city = result
        .component("locality")
        .map(|c| c.long_name.clone())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| DEFAULT_CITY.to_string());
    let state = result
        .component("administrative_area_level_1")
        .map(|c| c.short_name.clone())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_STATE_CODE.to_string());

    Some(LocatedPlace {
        city,
        state,
        location: result
            .geometry
            .as_ref()
            .map(|g| LatLng::new(g.location.lat, g.location.lng)),
        formatted_address: result.formatted_address.clone(),
    })
}
