//! Location state store
//!
//! Holds the resolved city for one browser session and drives the landing
//! redirect. The store is an explicit object: create it at bootstrap with a
//! facade, a cookie jar and a [`LocationPolicy`], call [`LocationStore::init`]
//! once with the current route, and [`LocationStore::reset`] to start over.
//!
//! Only IP-based resolution writes the `user_city` cookie. Manual selections
//! change in-memory state only, and a failed detection resolves to the
//! default city without persisting it.

pub mod cookie;
pub mod routing;

use crate::config::Config;
use crate::geo::{GeocodingFacade, LatLng};
use cookie::{CityCookie, CookieJar};
use routing::{city_from_path, is_landing, CityWhitelist, Navigation};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Notice recorded when detection falls back to the default city
pub const DEFAULT_CITY_NOTICE: &str = "Could not detect your location; showing the default city";

/// Lifecycle of the store within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StorePhase {
    Uninitialized,
    Detecting,
    Resolved,
}

/// What the store currently believes about the user's location
///
/// `user_city` drives routing; `user_location` is for display only.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedLocation {
    pub user_city: Option<String>,
    pub user_location: Option<LatLng>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Fixed inputs to resolution decisions
#[derive(Debug, Clone)]
pub struct LocationPolicy {
    pub whitelist: CityWhitelist,
    pub default_city: String,
    pub default_location: LatLng,
    pub cookie: CityCookie,
}

impl LocationPolicy {
    pub fn from_config(config: &Config) -> Self {
        let location = &config.location;
        let secret = Some(location.cookie_secret.clone());
        Self {
            whitelist: CityWhitelist::new(&location.serviced_cities),
            default_city: location.default_city.clone(),
            default_location: LatLng::new(location.default_lat, location.default_lng),
            cookie: CityCookie::new(secret, location.cookie_days),
        }
    }
}

impl Default for LocationPolicy {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Session-scoped location state
#[derive(Debug)]
pub struct LocationStore<F, J> {
    facade: F,
    cookies: J,
    policy: LocationPolicy,
    state: ResolvedLocation,
    phase: StorePhase,
    redirect: Option<Navigation>,
}

impl<F: GeocodingFacade, J: CookieJar> LocationStore<F, J> {
    pub fn new(facade: F, cookies: J, policy: LocationPolicy) -> Self {
        Self {
            facade,
            cookies,
            policy,
            state: ResolvedLocation::default(),
            phase: StorePhase::Uninitialized,
            redirect: None,
        }
    }

    pub fn resolved(&self) -> &ResolvedLocation {
        &self.state
    }

    pub fn phase(&self) -> StorePhase {
        self.phase
    }

    pub fn policy(&self) -> &LocationPolicy {
        &self.policy
    }

    pub fn facade(&self) -> &F {
        &self.facade
    }

    pub fn cookies(&self) -> &J {
        &self.cookies
    }

    /// Give back the jar, e.g. to emit `Set-Cookie` headers
    pub fn into_cookies(self) -> J {
        self.cookies
    }

    /// City currently persisted in the cookie
    pub fn cookie_city(&self) -> Option<String> {
        self.policy.cookie.read(&self.cookies)
    }

    /// Bootstrap the store for `route`
    ///
    /// Only the landing route resolves and redirects. On a city-scoped route
    /// the city in the path becomes the advisory `user_city`; nothing is
    /// looked up, persisted or redirected, and `None` is returned.
    pub async fn init(&mut self, route: &str) -> Option<Navigation> {
        if !is_landing(route) {
            if let Some(city) = city_from_path(route) {
                self.state.user_city = Some(city);
            }
            debug!(route, "Skipping automatic location redirect");
            return None;
        }

        if let Some(city) = self.cookie_city() {
            debug!(%city, "Using city from cookie");
            self.state.user_city = Some(city.clone());
            self.phase = StorePhase::Resolved;
            return Some(self.navigate_to(&city));
        }

        self.resolve_by_ip().await;
        let city = self
            .state
            .user_city
            .clone()
            .unwrap_or_else(|| self.policy.default_city.clone());
        Some(self.navigate_to(&city))
    }

    /// User-requested detection
    ///
    /// On success the city is persisted and a redirect is recorded. On
    /// failure the default city is applied in memory, nothing is redirected,
    /// and `false` tells the caller to show a notice.
    pub async fn detect_location(&mut self) -> bool {
        if !self.resolve_by_ip().await {
            return false;
        }
        match self.state.user_city.clone() {
            Some(city) => {
                self.navigate_to(&city);
                true
            }
            None => false,
        }
    }

    /// Set the city in memory, persisting it only for IP-based results
    ///
    /// A manual selection clears the coordinates, which belonged to the
    /// previous city.
    pub fn set_city(&mut self, city: &str, is_ip_based: bool) {
        let city = city.trim();
        if city.is_empty() {
            warn!("Ignoring empty city");
            return;
        }

        self.state.user_city = Some(city.to_string());
        self.state.error = None;
        self.phase = StorePhase::Resolved;

        if is_ip_based {
            self.cookies.set(self.policy.cookie.encode(city));
        } else {
            self.state.user_location = None;
        }
    }

    /// Record and return the redirect for `city`
    pub fn navigate_to(&mut self, city: &str) -> Navigation {
        let navigation = self.policy.whitelist.route(city);
        info!(city, target = %navigation, "Redirecting");
        self.redirect = Some(navigation.clone());
        navigation
    }

    /// The most recent redirect, if any
    pub fn pending_redirect(&self) -> Option<&Navigation> {
        self.redirect.as_ref()
    }

    /// The most recent redirect, consuming it
    pub fn take_redirect(&mut self) -> Option<Navigation> {
        self.redirect.take()
    }

    /// Forget everything resolved in this session
    pub fn reset(&mut self) {
        self.state = ResolvedLocation::default();
        self.phase = StorePhase::Uninitialized;
        self.redirect = None;
    }

    async fn resolve_by_ip(&mut self) -> bool {
        self.phase = StorePhase::Detecting;
        self.state.is_loading = true;
        self.state.error = None;

        let located = self.facade.ip_locate().await;
        self.state.is_loading = false;

        match located {
            Some(place) => {
                info!(city = %place.city, "Resolved city from IP");
                self.set_city(&place.city, true);
                self.state.user_location = place.location;
                true
            }
            None => {
                warn!(city = %self.policy.default_city, "IP detection failed, using default city");
                self.state.user_city = Some(self.policy.default_city.clone());
                self.state.user_location = Some(self.policy.default_location);
                self.state.error = Some(DEFAULT_CITY_NOTICE.to_string());
                self.phase = StorePhase::Resolved;
                false
            }
        }
    }
}
