//! Default configuration values
//!
//! Named constants for all tunable parameters

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 7878;

/// Default timeout for search, reverse geocode and photo vendor calls
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 5;

/// Default timeout for autocomplete and place detail vendor calls
pub const DEFAULT_AUTOCOMPLETE_TIMEOUT_SECS: u64 = 8;

/// Default timeout for IP geolocation vendor calls
pub const DEFAULT_IP_TIMEOUT_SECS: u64 = 5;

/// Default result limit for search and autocomplete
pub const DEFAULT_LIMIT: usize = 5;

/// Default nearby search radius in meters
pub const DEFAULT_NEARBY_RADIUS: u32 = 1000;

/// Default photo width in pixels
pub const DEFAULT_PHOTO_MAX_WIDTH: u32 = 400;

/// Static image served when a photo cannot be fetched
pub const DEFAULT_PHOTO_PLACEHOLDER: &str = "/images/placeholder-location.svg";

/// Minimum query length before the search modal goes to the network
pub const DEFAULT_MIN_QUERY_LEN: usize = 2;

/// Debounce applied to search keystrokes
pub const DEFAULT_DEBOUNCE_MS: u64 = 200;

/// Client-side timeout for facade calls
pub const DEFAULT_CLIENT_TIMEOUT_SECS: u64 = 5;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "city-locator";
