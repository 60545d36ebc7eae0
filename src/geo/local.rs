//! In-process facade used by the server's own landing route

use crate::gateway::Gateway;
use crate::geo::normalize::{place_from_geocode, suggestions_from_autocomplete, suggestions_from_search};
use crate::geo::{GeocodingFacade, LocatedPlace, PlaceSuggestion};
use std::net::IpAddr;
use std::sync::Arc;

/// Calls a [`Gateway`] directly, on behalf of one client address
#[derive(Debug, Clone)]
pub struct LocalFacade {
    gateway: Arc<Gateway>,
    client_ip: Option<IpAddr>,
}

impl LocalFacade {
    pub fn new(gateway: Arc<Gateway>, client_ip: Option<IpAddr>) -> Self {
        Self { gateway, client_ip }
    }
}

impl GeocodingFacade for LocalFacade {
    async fn search_text(&self, query: &str, limit: usize) -> Vec<PlaceSuggestion> {
        suggestions_from_search(&self.gateway.search_text(query, limit).await)
    }

    async fn autocomplete(&self, input: &str, limit: usize) -> Vec<PlaceSuggestion> {
        suggestions_from_autocomplete(&self.gateway.autocomplete(input, limit).await)
    }

    async fn ip_locate(&self) -> Option<LocatedPlace> {
        place_from_geocode(&self.gateway.ip_locate(self.client_ip).await)
    }

    async fn reverse_geocode(&self, lat: f64, lng: f64) -> Option<LocatedPlace> {
        place_from_geocode(&self.gateway.reverse_geocode(lat, lng).await)
    }
}
