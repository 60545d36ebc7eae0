//! Location search session
//!
//! Headless state behind the location search modal. Each keystroke goes
//! through [`SearchSession::input`], which shows matching directory
//! localities straight away and hands back a [`SearchTicket`]. Resolving the
//! ticket waits out the debounce, asks the facade for predictions and applies
//! them, unless a newer keystroke has been issued in the meantime: only the
//! latest ticket ever changes the visible list.

use crate::config::Config;
use crate::directory::{match_cities, match_localities};
use crate::geo::{GeocodingFacade, LocatedPlace, PlaceSuggestion};
use crate::location::cookie::CookieJar;
use crate::location::routing::Navigation;
use crate::location::{LocationStore, DEFAULT_CITY_NOTICE};
use serde::Serialize;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, warn};

/// Tunables for a search session
#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub min_query_len: usize,
    pub debounce: Duration,
    pub timeout: Duration,
    pub limit: usize,
}

impl SearchSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            min_query_len: config.search.min_query_len,
            debounce: Duration::from_millis(config.search.debounce_ms),
            timeout: Duration::from_secs(config.search.client_timeout_secs),
            limit: crate::config::defaults::DEFAULT_LIMIT,
        }
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Where the modal is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPhase {
    Idle,
    Searching,
    Results,
    NoResults,
    /// The remote call failed; whatever was already shown stays
    ErrorAbsorbed,
}

/// What the modal displays
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchView {
    pub open: bool,
    pub query: String,
    pub phase: SearchPhase,
    pub suggestions: Vec<PlaceSuggestion>,
}

impl SearchView {
    fn idle(open: bool) -> Self {
        Self {
            open,
            query: String::new(),
            phase: SearchPhase::Idle,
            suggestions: Vec::new(),
        }
    }
}

/// A keystroke waiting for its remote answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    seq: u64,
    query: String,
}

impl SearchTicket {
    pub fn query(&self) -> &str {
        &self.query
    }
}

/// Result of the "use current location" button
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocateOutcome {
    /// Detection worked; the modal closed and the store recorded this redirect
    Redirected(Navigation),
    /// Detection failed; the default city is in use and the modal stays open
    DefaultInUse { notice: String },
}

#[derive(Debug)]
struct Inner {
    view: SearchView,
    issued: u64,
}

/// One search modal
#[derive(Debug)]
pub struct SearchSession<F> {
    facade: F,
    settings: SearchSettings,
    inner: Mutex<Inner>,
}

impl<F: GeocodingFacade> SearchSession<F> {
    /// A closed, idle session
    pub fn new(facade: F, settings: SearchSettings) -> Self {
        Self {
            facade,
            settings,
            inner: Mutex::new(Inner {
                view: SearchView::idle(false),
                issued: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the current view
    pub fn view(&self) -> SearchView {
        self.lock().view.clone()
    }

    /// Open the modal with an empty query
    pub fn open(&self) {
        let mut inner = self.lock();
        inner.issued += 1;
        inner.view = SearchView::idle(true);
    }

    /// Close the modal, dropping any pending answers
    pub fn close(&self) {
        let mut inner = self.lock();
        inner.issued += 1;
        inner.view = SearchView::idle(false);
    }

    /// Record a keystroke
    ///
    /// Short queries reset the list. Longer ones show matching directory
    /// localities immediately and move to `Searching`.
    pub fn input(&self, query: &str) -> SearchTicket {
        let trimmed = query.trim();
        let mut inner = self.lock();
        inner.issued += 1;
        inner.view.query = query.to_string();

        if trimmed.chars().count() < self.settings.min_query_len {
            inner.view.phase = SearchPhase::Idle;
            inner.view.suggestions.clear();
        } else {
            inner.view.phase = SearchPhase::Searching;
            inner.view.suggestions = match_localities(trimmed)
                .into_iter()
                .map(PlaceSuggestion::from)
                .collect();
        }

        SearchTicket {
            seq: inner.issued,
            query: trimmed.to_string(),
        }
    }

    /// Fetch and apply remote predictions for `ticket`
    ///
    /// Returns `false` when nothing was applied: the query was too short or a
    /// newer ticket superseded this one.
    pub async fn resolve(&self, ticket: SearchTicket) -> bool {
        if ticket.query.chars().count() < self.settings.min_query_len {
            return false;
        }

        if !self.settings.debounce.is_zero() {
            tokio::time::sleep(self.settings.debounce).await;
        }
        if !self.is_current(&ticket) {
            debug!(query = %ticket.query, "Superseded before request");
            return false;
        }

        let answer = tokio::time::timeout(
            self.settings.timeout,
            self.facade.autocomplete(&ticket.query, self.settings.limit),
        )
        .await;

        let mut inner = self.lock();
        if inner.issued != ticket.seq {
            debug!(query = %ticket.query, "Discarding stale predictions");
            return false;
        }

        let view = &mut inner.view;
        match answer {
            Ok(remote) if !remote.is_empty() => {
                view.suggestions = remote;
                view.phase = SearchPhase::Results;
            }
            Ok(_) => {
                if view.suggestions.is_empty() {
                    view.suggestions = popular_city_matches(&ticket.query);
                }
                view.phase = if view.suggestions.is_empty() {
                    SearchPhase::NoResults
                } else {
                    SearchPhase::Results
                };
            }
            Err(_) => {
                warn!(query = %ticket.query, "Autocomplete timed out");
                if view.suggestions.is_empty() {
                    view.suggestions = popular_city_matches(&ticket.query);
                }
                view.phase = SearchPhase::ErrorAbsorbed;
            }
        }
        true
    }

    /// Type `query` and wait for its answer
    pub async fn search(&self, query: &str) -> SearchView {
        let ticket = self.input(query);
        self.resolve(ticket).await;
        self.view()
    }

    /// Clear the input
    pub fn clear(&self) {
        self.input("");
    }

    /// Commit `suggestion` as the session's city and close the modal
    ///
    /// Manual selections are never written to the cookie.
    pub fn select<G, J>(
        &self,
        suggestion: &PlaceSuggestion,
        store: &mut LocationStore<G, J>,
    ) -> Navigation
    where
        G: GeocodingFacade,
        J: CookieJar,
    {
        let city = if suggestion.city.trim().is_empty() {
            suggestion.name.as_str()
        } else {
            suggestion.city.as_str()
        };

        store.set_city(city, false);
        let navigation = store.navigate_to(city);
        self.close();
        navigation
    }

    /// Handle the "use current location" button
    pub async fn use_current_location<G, J>(&self, store: &mut LocationStore<G, J>) -> LocateOutcome
    where
        G: GeocodingFacade,
        J: CookieJar,
    {
        if store.detect_location().await {
            if let Some(navigation) = store.pending_redirect().cloned() {
                self.close();
                return LocateOutcome::Redirected(navigation);
            }
        }

        let notice = store
            .resolved()
            .error
            .clone()
            .unwrap_or_else(|| DEFAULT_CITY_NOTICE.to_string());
        LocateOutcome::DefaultInUse { notice }
    }

    /// Name the place at a coordinate, e.g. a map pin
    pub async fn reverse_lookup(&self, lat: f64, lng: f64) -> Option<LocatedPlace> {
        self.facade.reverse_geocode(lat, lng).await
    }

    fn is_current(&self, ticket: &SearchTicket) -> bool {
        self.lock().issued == ticket.seq
    }
}

fn popular_city_matches(query: &str) -> Vec<PlaceSuggestion> {
    match_cities(query)
        .into_iter()
        .map(PlaceSuggestion::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::LatLng;
    use crate::location::cookie::MemoryJar;
    use crate::location::LocationPolicy;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Facade with canned predictions per query
    #[derive(Debug, Clone, Default)]
    struct ScriptedFacade {
        answers: HashMap<String, (Duration, Vec<PlaceSuggestion>)>,
        ip: Option<LocatedPlace>,
        calls: Arc<AtomicUsize>,
    }

    impl ScriptedFacade {
        fn answer(mut self, query: &str, delay_ms: u64, cities: &[&str]) -> Self {
            let suggestions = cities
                .iter()
                .enumerate()
                .map(|(i, city)| PlaceSuggestion {
                    id: format!("{}-{}", query, i),
                    name: city.to_string(),
                    city: city.to_string(),
                    state: None,
                    country: None,
                    full_address: None,
                    location: None,
                })
                .collect();
            self.answers
                .insert(query.to_string(), (Duration::from_millis(delay_ms), suggestions));
            self
        }

        fn located(mut self, city: &str) -> Self {
            self.ip = Some(LocatedPlace {
                city: city.to_string(),
                state: "XX".to_string(),
                location: Some(LatLng::new(10.0, 20.0)),
                formatted_address: None,
            });
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl GeocodingFacade for ScriptedFacade {
        async fn search_text(&self, _query: &str, _limit: usize) -> Vec<PlaceSuggestion> {
            Vec::new()
        }

        async fn autocomplete(&self, input: &str, _limit: usize) -> Vec<PlaceSuggestion> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.answers.get(input) {
                Some((delay, suggestions)) => {
                    tokio::time::sleep(*delay).await;
                    suggestions.clone()
                }
                None => Vec::new(),
            }
        }

        async fn ip_locate(&self) -> Option<LocatedPlace> {
            self.ip.clone()
        }

        async fn reverse_geocode(&self, _lat: f64, _lng: f64) -> Option<LocatedPlace> {
            None
        }
    }

    fn settings() -> SearchSettings {
        SearchSettings {
            min_query_len: 2,
            debounce: Duration::ZERO,
            timeout: Duration::from_millis(200),
            limit: 5,
        }
    }

    fn session(facade: ScriptedFacade) -> SearchSession<ScriptedFacade> {
        let session = SearchSession::new(facade, settings());
        session.open();
        session
    }

    fn names(view: &SearchView) -> Vec<&str> {
        view.suggestions.iter().map(|s| s.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_short_query_never_hits_network() {
        let facade = ScriptedFacade::default();
        let session = session(facade.clone());

        for query in ["", "v", " v "] {
            let view = session.search(query).await;
            assert_eq!(view.phase, SearchPhase::Idle);
            assert!(view.suggestions.is_empty());
        }
        assert_eq!(facade.calls(), 0);
    }

    #[tokio::test]
    async fn test_local_matches_show_before_network() {
        let session = session(ScriptedFacade::default());

        session.input("vij");
        let view = session.view();

        assert_eq!(view.phase, SearchPhase::Searching);
        assert_eq!(view.suggestions.len(), 3);
    }

    #[tokio::test]
    async fn test_empty_predictions_keep_vijay_nagar_fixtures() {
        let facade = ScriptedFacade::default();
        let session = session(facade.clone());

        let view = session.search("vij").await;

        assert_eq!(facade.calls(), 1);
        assert_eq!(view.phase, SearchPhase::Results);
        assert_eq!(
            names(&view),
            vec!["Vijay Nagar", "Vijay Nagar Square", "Vijay Nagar Scheme No. 54"]
        );
        assert!(view.suggestions.iter().all(|s| s.city == "Indore"));
    }

    #[tokio::test]
    async fn test_remote_predictions_replace_local() {
        let facade = ScriptedFacade::default().answer("vij", 0, &["Vijayawada"]);
        let view = session(facade).search("vij").await;

        assert_eq!(view.phase, SearchPhase::Results);
        assert_eq!(names(&view), vec!["Vijayawada"]);
    }

    #[tokio::test]
    async fn test_popular_cities_when_nothing_else() {
        let view = session(ScriptedFacade::default()).search("kol").await;

        assert_eq!(view.phase, SearchPhase::Results);
        assert_eq!(names(&view), vec!["Kolkata"]);
    }

    #[tokio::test]
    async fn test_no_results() {
        let view = session(ScriptedFacade::default()).search("zzz").await;

        assert_eq!(view.phase, SearchPhase::NoResults);
        assert!(view.suggestions.is_empty());
    }

    #[tokio::test]
    async fn test_timeout_keeps_local_results() {
        let facade = ScriptedFacade::default().answer("vij", 1_000, &["Vijayawada"]);
        let view = session(facade).search("vij").await;

        assert_eq!(view.phase, SearchPhase::ErrorAbsorbed);
        assert_eq!(view.suggestions.len(), 3);
    }

    #[tokio::test]
    async fn test_stale_answer_is_discarded() {
        let facade = ScriptedFacade::default()
            .answer("pal", 150, &["Slow"])
            .answer("raj", 0, &["Fast"]);
        let session = session(facade.clone());

        let first = async {
            let ticket = session.input("pal");
            session.resolve(ticket).await
        };
        let second = async {
            tokio::time::sleep(Duration::from_millis(30)).await;
            let ticket = session.input("raj");
            session.resolve(ticket).await
        };
        let (first_applied, second_applied) = tokio::join!(first, second);

        assert!(!first_applied);
        assert!(second_applied);
        assert_eq!(facade.calls(), 2);
        let view = session.view();
        assert_eq!(view.query, "raj");
        assert_eq!(names(&view), vec!["Fast"]);
    }

    #[tokio::test]
    async fn test_superseded_ticket_skips_request() {
        let facade = ScriptedFacade::default();
        let session = session(facade.clone());

        let old = session.input("pal");
        let _new = session.input("raj");

        assert!(!session.resolve(old).await);
        assert_eq!(facade.calls(), 0);
    }

    #[tokio::test]
    async fn test_close_drops_pending_answer() {
        let facade = ScriptedFacade::default().answer("pal", 50, &["Late"]);
        let session = session(facade);

        let ticket = session.input("pal");
        let pending = session.resolve(ticket);
        let close = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            session.close();
        };
        let (applied, ()) = tokio::join!(pending, close);

        assert!(!applied);
        let view = session.view();
        assert!(!view.open);
        assert_eq!(view.phase, SearchPhase::Idle);
        assert!(view.suggestions.is_empty());
    }

    #[tokio::test]
    async fn test_select_routes_and_keeps_cookie() {
        let facade = ScriptedFacade::default().answer("mum", 0, &["Mumbai"]);
        let session = session(facade.clone());
        let mut store = LocationStore::new(facade, MemoryJar::new(), LocationPolicy::default());

        let view = session.search("mum").await;
        let navigation = session.select(&view.suggestions[0], &mut store);

        assert_eq!(navigation.path(), "/mumbai");
        assert_eq!(store.resolved().user_city.as_deref(), Some("Mumbai"));
        assert_eq!(store.cookies().writes(), 0);
        assert!(!session.view().open);
    }

    #[tokio::test]
    async fn test_select_unserviced_city() {
        let facade = ScriptedFacade::default().answer("sur", 0, &["Surat"]);
        let session = session(facade.clone());
        let mut store = LocationStore::new(facade, MemoryJar::new(), LocationPolicy::default());

        let view = session.search("sur").await;
        let navigation = session.select(&view.suggestions[0], &mut store);

        assert_eq!(navigation.path(), "/services-unavailable?city=Surat");
    }

    #[tokio::test]
    async fn test_use_current_location_success_closes() {
        let facade = ScriptedFacade::default().located("Hyderabad");
        let session = session(facade.clone());
        let mut store = LocationStore::new(facade, MemoryJar::new(), LocationPolicy::default());

        let outcome = session.use_current_location(&mut store).await;

        assert_eq!(outcome, LocateOutcome::Redirected(Navigation::City("hyderabad".to_string())));
        assert!(!session.view().open);
        assert_eq!(store.cookies().writes(), 1);
    }

    #[tokio::test]
    async fn test_use_current_location_failure_shows_notice() {
        let facade = ScriptedFacade::default();
        let session = session(facade.clone());
        let mut store = LocationStore::new(facade, MemoryJar::new(), LocationPolicy::default());

        let outcome = session.use_current_location(&mut store).await;

        assert_eq!(
            outcome,
            LocateOutcome::DefaultInUse {
                notice: DEFAULT_CITY_NOTICE.to_string()
            }
        );
        assert!(session.view().open);
        assert_eq!(store.resolved().user_city.as_deref(), Some("Indore"));
    }
}
