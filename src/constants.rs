//! Centralized constants for the city-locator crate
//!
//! This module consolidates constants that are used across multiple modules
//! to avoid duplication and ensure consistency.

/// Location defaults used whenever detection cannot produce a genuine city
pub mod location {
    /// City used when IP detection fails
    pub const DEFAULT_CITY: &str = "Indore";

    /// State of the default city
    pub const DEFAULT_STATE: &str = "Madhya Pradesh";

    /// Short state code reported when a geocode result has no state component
    pub const DEFAULT_STATE_CODE: &str = "MP";

    /// Country of the default city
    pub const DEFAULT_COUNTRY: &str = "India";

    /// Latitude of the default city
    pub const DEFAULT_LAT: f64 = 22.7196;

    /// Longitude of the default city
    pub const DEFAULT_LNG: f64 = 75.8577;

    /// Cities the marketplace currently serves (lowercase identifiers)
    pub const SERVICED_CITIES: &[&str] = &[
        "indore",
        "mumbai",
        "delhi",
        "bangalore",
        "pune",
        "jaipur",
        "hyderabad",
        "chennai",
        "kolkata",
        "ahmedabad",
    ];

    /// Route shown for cities outside the whitelist
    pub const UNAVAILABLE_PATH: &str = "/services-unavailable";

    /// Landing route that drives the automatic redirect
    pub const LANDING_PATH: &str = "/";
}

/// Cookie settings
pub mod cookie {
    /// Name of the cookie holding the last IP-resolved city
    pub const USER_CITY: &str = "user_city";

    /// Cookie lifetime in days
    pub const MAX_AGE_DAYS: i64 = 30;
}

/// External API endpoints
pub mod api {
    /// Places/geocoding vendor base URL
    pub const VENDOR_BASE_URL: &str = "https://api.olamaps.io";

    /// Header carrying the vendor API key
    pub const API_KEY_HEADER: &str = "x-api-key";

    /// Environment variable overriding the configured vendor key
    pub const API_KEY_ENV: &str = "CITY_LOCATOR_API_KEY";

    pub const TEXT_SEARCH_PATH: &str = "/places/v1/textsearch";
    pub const AUTOCOMPLETE_PATH: &str = "/places/v1/autocomplete";
    pub const IP_LOCATE_PATH: &str = "/places/v1/geolocation/ip";
    pub const REVERSE_GEOCODE_PATH: &str = "/places/v1/reverse-geocode";
    pub const DETAILS_PATH: &str = "/places/v1/details";
    pub const DETAILS_ADVANCED_PATH: &str = "/places/v1/details/advanced";
    pub const NEARBY_PATH: &str = "/places/v1/nearbysearch";
    pub const PHOTO_PATH: &str = "/places/v1/photo";
}

/// Status markers attached to gateway payloads
pub mod status {
    /// Live vendor data
    pub const OK: &str = "OK";

    /// Vendor answered successfully with nothing
    pub const ZERO_RESULTS: &str = "ZERO_RESULTS";

    /// Payload synthesized from the fallback directory or a canned default
    pub const FALLBACK: &str = "FALLBACK_RESPONSE";
}
