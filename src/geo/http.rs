//! Facade over a running gateway's HTTP API

use crate::error::{Error, Result};
use crate::gateway::types::{AutocompleteResponse, GeocodeResponse, SearchResponse};
use crate::geo::normalize::{place_from_geocode, suggestions_from_autocomplete, suggestions_from_search};
use crate::geo::{GeocodingFacade, LocatedPlace, PlaceSuggestion};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Calls the gateway routes (never the vendor directly)
#[derive(Debug, Clone)]
pub struct HttpFacade {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFacade {
    /// Create a facade for the gateway at `base_url`
    ///
    /// Every call is bounded by `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(Error::from_request)?;

        if !response.status().is_success() {
            return Err(Error::Vendor {
                status: response.status().as_u16(),
            });
        }

        response.json().await.map_err(Error::from_request)
    }
}

impl GeocodingFacade for HttpFacade {
    async fn search_text(&self, query: &str, limit: usize) -> Vec<PlaceSuggestion> {
        let params = [("query", query.to_string()), ("limit", limit.to_string())];
        match self.fetch::<SearchResponse>("/api/geocode/search", &params).await {
            Ok(response) => suggestions_from_search(&response),
            Err(e) => {
                debug!(query, error = %e, "Gateway search failed");
                Vec::new()
            }
        }
    }

    async fn autocomplete(&self, input: &str, limit: usize) -> Vec<PlaceSuggestion> {
        let params = [("input", input.to_string()), ("limit", limit.to_string())];
        match self.fetch::<AutocompleteResponse>("/api/places/autocomplete", &params).await {
            Ok(response) => suggestions_from_autocomplete(&response),
            Err(e) => {
                debug!(input, error = %e, "Gateway autocomplete failed");
                Vec::new()
            }
        }
    }

    async fn ip_locate(&self) -> Option<LocatedPlace> {
        match self.fetch::<GeocodeResponse>("/api/geocode/ip", &[]).await {
            Ok(response) => place_from_geocode(&response),
            Err(e) => {
                debug!(error = %e, "Gateway IP location failed");
                None
            }
        }
    }

    async fn reverse_geocode(&self, lat: f64, lng: f64) -> Option<LocatedPlace> {
        let params = [("lat", lat.to_string()), ("lon", lng.to_string())];
        match self.fetch::<GeocodeResponse>("/api/geocode/reverse", &params).await {
            Ok(response) => place_from_geocode(&response),
            Err(e) => {
                debug!(lat, lng, error = %e, "Gateway reverse geocode failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn facade(server: &MockServer) -> HttpFacade {
        HttpFacade::new(&server.uri(), Duration::from_secs(2)).unwrap()
    }

    #[tokio::test]
    async fn test_autocomplete_parses_gateway_reply() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/places/autocomplete"))
            .and(query_param("input", "kor"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "predictions": [{
                    "place_id": "p1",
                    "description": "Koramangala, Bangalore, Karnataka",
                    "structured_formatting": {"main_text": "Koramangala", "secondary_text": "Bangalore, Karnataka"}
                }],
                "status": "OK"
            })))
            .mount(&server)
            .await;

        let suggestions = facade(&server).autocomplete("kor", 5).await;
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].city, "Bangalore");
    }

    #[tokio::test]
    async fn test_search_failure_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        assert!(facade(&server).search_text("pune", 5).await.is_empty());
    }

    #[tokio::test]
    async fn test_ip_locate_malformed_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/geocode/ip"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        assert!(facade(&server).ip_locate().await.is_none());
    }

    #[tokio::test]
    async fn test_reverse_geocode_timeout_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/geocode/reverse"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"results": [], "status": "OK"}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let facade = HttpFacade::new(&server.uri(), Duration::from_millis(100)).unwrap();
        assert!(facade.reverse_geocode(19.07, 72.87).await.is_none());
    }
}
