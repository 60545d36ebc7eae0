//! city-locator: location resolution for a city-scoped marketplace
//!
//! A library and CLI tool that decides which city a visitor belongs to and
//! where to send them, backed by an external places/geocoding API.
//!
//! ## Features
//!
//! - Geocoding gateway with static fallbacks when the vendor is down
//! - IP-based city detection persisted in a `user_city` cookie
//! - Whitelist redirects to city routes or a "services unavailable" page
//! - Debounced location search that never shows stale answers
//! - HTTP API + CLI interface
//!
//! ## Quick Start
//!
//! ```rust
//! use city_locator::directory::match_localities;
//! use city_locator::location::routing::CityWhitelist;
//! use city_locator::constants::location::SERVICED_CITIES;
//!
//! let whitelist = CityWhitelist::new(SERVICED_CITIES);
//! assert_eq!(whitelist.route("Mumbai").path(), "/mumbai");
//! assert_eq!(whitelist.route("Goa").path(), "/services-unavailable?city=Goa");
//!
//! // Localities are matched on name or full address
//! assert_eq!(match_localities("vij").len(), 3);
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod directory;
pub mod error;
pub mod gateway;
pub mod geo;
pub mod location;
pub mod search;
pub mod server;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use gateway::Gateway;
pub use geo::{GeocodingFacade, LatLng, LocatedPlace, PlaceSuggestion};
pub use location::routing::Navigation;
pub use location::LocationStore;
pub use search::SearchSession;
