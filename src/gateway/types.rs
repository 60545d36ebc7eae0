//! Typed request/response schemas shared by the gateway and its clients
//!
//! Vendor payloads are deserialized into these shapes. Every field the vendor
//! may omit is optional or defaulted, so a missing field never fails a parse;
//! a payload that is not shaped like this at all does, and takes the fallback
//! path.

use crate::constants::status;
use serde::{Deserialize, Serialize};

/// Text search response (`/api/geocode/search`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub features: Vec<Feature>,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_details: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub properties: FeatureProperties,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
}

/// GeoJSON-style geometry; only `Point` carries a usable location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub coordinates: Vec<f64>,
}

/// Autocomplete response (`/api/places/autocomplete`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutocompleteResponse {
    #[serde(default)]
    pub predictions: Vec<Prediction>,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_details: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub place_id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub structured_formatting: StructuredFormatting,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<PlaceGeometry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredFormatting {
    #[serde(default)]
    pub main_text: String,
    #[serde(default)]
    pub secondary_text: String,
}

/// Geocode response for IP and reverse lookups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResponse {
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_details: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub address_components: Vec<AddressComponent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<PlaceGeometry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressComponent {
    pub long_name: String,
    #[serde(default)]
    pub short_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceGeometry {
    pub location: LatLngLiteral,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLngLiteral {
    pub lat: f64,
    pub lng: f64,
}

fn default_status() -> String {
    status::OK.to_string()
}

impl SearchResponse {
    pub fn is_fallback(&self) -> bool {
        self.status == status::FALLBACK
    }
}

impl AutocompleteResponse {
    pub fn is_fallback(&self) -> bool {
        self.status == status::FALLBACK
    }

    /// Whether a vendor status means the call worked
    pub fn is_success(&self) -> bool {
        self.status == status::OK || self.status == status::ZERO_RESULTS
    }
}

impl GeocodeResponse {
    pub fn is_fallback(&self) -> bool {
        self.status == status::FALLBACK
    }

    pub fn is_success(&self) -> bool {
        self.status == status::OK || self.status == status::ZERO_RESULTS
    }
}

impl GeocodeResult {
    /// First component tagged with `kind`
    pub fn component(&self, kind: &str) -> Option<&AddressComponent> {
        self.address_components
            .iter()
            .find(|c| c.types.iter().any(|t| t == kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_optional_fields_parse() {
        let parsed: SearchResponse =
            serde_json::from_str(r#"{"features":[{"properties":{}}]}"#).unwrap();
        assert_eq!(parsed.status, "OK");
        assert_eq!(parsed.features.len(), 1);
        assert!(parsed.features[0].properties.formatted.is_none());
    }

    #[test]
    fn test_wrong_shape_fails() {
        let parsed = serde_json::from_str::<AutocompleteResponse>(r#"{"predictions":"nope"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_component_lookup() {
        let result: GeocodeResult = serde_json::from_value(serde_json::json!({
            "address_components": [
                {"long_name": "Pune", "short_name": "Pune", "types": ["locality", "political"]},
                {"long_name": "Maharashtra", "short_name": "MH", "types": ["administrative_area_level_1"]}
            ]
        }))
        .unwrap();

        assert_eq!(result.component("locality").unwrap().long_name, "Pune");
        assert_eq!(result.component("administrative_area_level_1").unwrap().short_name, "MH");
        assert!(result.component("country").is_none());
    }

    #[test]
    fn test_error_details_omitted_when_absent() {
        let response = GeocodeResponse {
            results: Vec::new(),
            status: "OK".to_string(),
            error_details: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("error_details").is_none());
    }
}
