//! HTTP API routes
//!
//! The gateway routes proxy the places vendor. Search, autocomplete, IP and
//! reverse geocoding always answer 200, with fallback data when the vendor
//! fails. Details and nearby answer 500, while advanced details and photos
//! degrade through redirects.

use crate::config::defaults::{DEFAULT_LIMIT, DEFAULT_NEARBY_RADIUS, DEFAULT_PHOTO_MAX_WIDTH};
use crate::constants::location::LANDING_PATH;
use crate::directory::{popular_cities, popular_localities, PopularCity, PopularLocality};
use crate::error::Error;
use crate::gateway::types::{AutocompleteResponse, GeocodeResponse, SearchResponse};
use crate::gateway::{NearbyQuery, PhotoQuery};
use crate::geo::local::LocalFacade;
use crate::location::cookie::RequestJar;
use crate::location::LocationStore;
use crate::server::middleware::request_id;
use crate::server::state::AppState;

use axum::{
    extract::{ConnectInfo, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(landing_handler))
        .route("/api/status", get(status_handler))
        .route("/api/locations/popular", get(popular_handler))
        .route("/api/locations/resolve", get(resolve_handler))
        .route("/api/geocode/search", get(search_handler))
        .route("/api/geocode/ip", get(ip_handler))
        .route("/api/geocode/reverse", get(reverse_handler))
        .route("/api/places/autocomplete", get(autocomplete_handler))
        .route("/api/places/details", get(details_handler))
        .route("/api/places/details/advanced", get(details_advanced_handler))
        .route("/api/places/nearby", get(nearby_handler))
        .route("/api/places/photo", get(photo_handler))
        .fallback_service(ServeDir::new(static_dir()))
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id))
        .with_state(state)
}

/// Static files directory: `./static`, else `static/` next to the executable
fn static_dir() -> PathBuf {
    let local = PathBuf::from("static");
    if local.exists() {
        return local;
    }

    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("static")))
        .filter(|path| path.exists())
        .unwrap_or(local)
}

/// API error response
///
/// `message` is a short summary; vendor bodies only ever reach the log.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
    pub message: String,
}

impl ApiError {
    fn upstream(what: &str, err: &Error) -> Self {
        ApiError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: format!("Failed to fetch {}", what),
            message: err.summary(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::MissingParameter(_) | Error::InvalidParameter { .. } => ApiError {
                status: StatusCode::BAD_REQUEST,
                error: "Invalid request".to_string(),
                message: err.to_string(),
            },
            other => ApiError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: "Internal error".to_string(),
                message: other.to_string(),
            },
        }
    }
}

fn required<'a>(name: &'static str, value: &'a Option<String>) -> Result<&'a str, Error> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(Error::MissingParameter(name))
}

fn parse_number<T: FromStr>(name: &'static str, value: &str) -> Result<T, Error> {
    value.trim().parse().map_err(|_| Error::InvalidParameter {
        name,
        value: value.to_string(),
    })
}

/// A latitude or longitude, finite and within `-bound..=bound`
fn parse_coordinate(name: &'static str, value: &str, bound: f64) -> Result<f64, Error> {
    let parsed: f64 = parse_number(name, value)?;
    if parsed.is_finite() && parsed.abs() <= bound {
        Ok(parsed)
    } else {
        Err(Error::InvalidParameter {
            name,
            value: value.to_string(),
        })
    }
}

fn optional_number<T: FromStr>(name: &'static str, value: &Option<String>) -> Result<Option<T>, Error> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .map(|v| parse_number(name, v))
        .transpose()
}

/// Caller address from the first `X-Forwarded-For` entry, else `X-Real-IP`,
/// else the socket peer
fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> Option<IpAddr> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|ip| ip.trim().parse().ok());

    forwarded.or_else(|| {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .and_then(|ip| ip.trim().parse().ok())
    })
    .or_else(|| peer.map(|addr| addr.ip()))
}

/// Landing redirect loop
///
/// GET /
async fn landing_handler(
    State(state): State<Arc<AppState>>,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
) -> Response {
    let ip = client_ip(&headers, peer.map(|ConnectInfo(addr)| addr));
    let facade = LocalFacade::new(state.gateway.clone(), ip);
    let jar = RequestJar::from_headers(&headers);
    let mut store = LocationStore::new(facade, jar, state.policy.clone());

    let target = match store.init(LANDING_PATH).await {
        Some(navigation) => navigation.path(),
        None => format!("/{}", state.policy.default_city.to_lowercase()),
    };

    let mut response = Redirect::temporary(&target).into_response();
    store.cookies().apply(response.headers_mut());
    response
}

/// Status response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Server is running
    pub running: bool,
    /// Server version
    pub version: String,
    /// Whether a vendor API key is configured
    pub api_key_configured: bool,
    /// Uptime in seconds
    pub uptime_secs: u64,
}

/// Server status endpoint
///
/// GET /api/status
async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        running: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        api_key_configured: state.gateway.has_api_key(),
        uptime_secs: state.uptime_secs(),
    })
}

/// Popular locations response
#[derive(Debug, Serialize)]
pub struct PopularResponse {
    pub cities: &'static [PopularCity],
    pub localities: &'static [PopularLocality],
    pub serviced: Vec<String>,
}

/// Fallback directory and whitelist
///
/// GET /api/locations/popular
async fn popular_handler(State(state): State<Arc<AppState>>) -> Json<PopularResponse> {
    Json(PopularResponse {
        cities: popular_cities(),
        localities: popular_localities(),
        serviced: state.policy.whitelist.cities(),
    })
}

#[derive(Debug, Deserialize)]
pub struct ResolveParams {
    pub city: Option<String>,
}

/// Redirect decision for a city
#[derive(Debug, Serialize, Deserialize)]
pub struct ResolveResponse {
    pub city: String,
    pub serviced: bool,
    pub path: String,
}

/// GET /api/locations/resolve?city=
async fn resolve_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ResolveParams>,
) -> Result<Json<ResolveResponse>, ApiError> {
    let city = required("city", &params.city)?;
    let navigation = state.policy.whitelist.route(city);

    Ok(Json(ResolveResponse {
        city: city.to_string(),
        serviced: navigation.is_serviced(),
        path: navigation.path(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
    pub limit: Option<String>,
}

/// GET /api/geocode/search?query=&limit=
async fn search_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let query = required("query", &params.query)?;
    let limit = optional_number("limit", &params.limit)?.unwrap_or(DEFAULT_LIMIT);

    Ok(Json(state.gateway.search_text(query, limit).await))
}

#[derive(Debug, Deserialize)]
pub struct AutocompleteParams {
    pub input: Option<String>,
    pub limit: Option<String>,
}

/// GET /api/places/autocomplete?input=&limit=
async fn autocomplete_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AutocompleteParams>,
) -> Result<Json<AutocompleteResponse>, ApiError> {
    let input = required("input", &params.input)?;
    let limit = optional_number("limit", &params.limit)?.unwrap_or(DEFAULT_LIMIT);

    Ok(Json(state.gateway.autocomplete(input, limit).await))
}

/// GET /api/geocode/ip
async fn ip_handler(
    State(state): State<Arc<AppState>>,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
) -> Json<GeocodeResponse> {
    let ip = client_ip(&headers, peer.map(|ConnectInfo(addr)| addr));
    Json(state.gateway.ip_locate(ip).await)
}

#[derive(Debug, Deserialize)]
pub struct ReverseParams {
    pub lat: Option<String>,
    pub lon: Option<String>,
}

/// GET /api/geocode/reverse?lat=&lon=
async fn reverse_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReverseParams>,
) -> Result<Json<GeocodeResponse>, ApiError> {
    let lat = parse_coordinate("lat", required("lat", &params.lat)?, 90.0)?;
    let lon = parse_coordinate("lon", required("lon", &params.lon)?, 180.0)?;

    Ok(Json(state.gateway.reverse_geocode(lat, lon).await))
}

#[derive(Debug, Deserialize)]
pub struct DetailsParams {
    pub place_id: Option<String>,
}

/// GET /api/places/details?place_id=
async fn details_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DetailsParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let place_id = required("place_id", &params.place_id)?;

    state
        .gateway
        .place_details(place_id)
        .await
        .map(Json)
        .map_err(|e| {
            warn!(place_id, error = %e, "Place details failed");
            ApiError::upstream("place details", &e)
        })
}

/// GET /api/places/details/advanced?place_id=
///
/// Redirects to the standard details route when the enhanced lookup fails.
async fn details_advanced_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DetailsParams>,
) -> Result<Response, ApiError> {
    let place_id = required("place_id", &params.place_id)?;

    match state.gateway.place_details_advanced(place_id).await {
        Ok(details) => Ok(Json(details).into_response()),
        Err(e) => {
            debug!(place_id, error = %e, "Advanced details failed, redirecting to standard details");
            let target = format!("/api/places/details?place_id={}", urlencoding::encode(place_id));
            Ok(Redirect::temporary(&target).into_response())
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NearbyParams {
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub radius: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// GET /api/places/nearby?lat=&lng=&radius=&type=
async fn nearby_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NearbyParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let query = NearbyQuery {
        lat: parse_coordinate("lat", required("lat", &params.lat)?, 90.0)?,
        lng: parse_coordinate("lng", required("lng", &params.lng)?, 180.0)?,
        radius: optional_number("radius", &params.radius)?.unwrap_or(DEFAULT_NEARBY_RADIUS),
        kind: params.kind.filter(|k| !k.trim().is_empty()),
    };

    state
        .gateway
        .nearby_search(&query)
        .await
        .map(Json)
        .map_err(|e| {
            warn!(lat = query.lat, lng = query.lng, error = %e, "Nearby search failed");
            ApiError::upstream("nearby places", &e)
        })
}

#[derive(Debug, Deserialize)]
pub struct PhotoParams {
    pub photo_reference: Option<String>,
    pub maxwidth: Option<String>,
    pub maxheight: Option<String>,
}

/// GET /api/places/photo?photo_reference=&maxwidth=&maxheight=
///
/// Redirects to the placeholder image when the vendor cannot supply one.
async fn photo_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PhotoParams>,
) -> Result<Response, ApiError> {
    let query = PhotoQuery {
        reference: required("photo_reference", &params.photo_reference)?.to_string(),
        max_width: optional_number("maxwidth", &params.maxwidth)?.unwrap_or(DEFAULT_PHOTO_MAX_WIDTH),
        max_height: optional_number("maxheight", &params.maxheight)?,
    };

    match state.gateway.photo(&query).await {
        Ok(photo) => {
            let content_type = photo
                .content_type
                .unwrap_or_else(|| "application/octet-stream".to_string());
            Ok(([(header::CONTENT_TYPE, content_type)], photo.body).into_response())
        }
        Err(e) => {
            warn!(reference = %query.reference, error = %e, "Photo fetch failed, serving placeholder");
            Ok(Redirect::temporary(&state.config.gateway.photo_placeholder).into_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    /// State whose vendor refuses connections
    fn create_test_state() -> Arc<AppState> {
        let mut config = Config::default();
        config.vendor.base_url = "http://127.0.0.1:9".to_string();
        config.vendor.api_key = String::new();
        Arc::new(AppState::new(config).unwrap())
    }

    async fn get(uri: &str) -> Response {
        create_router(create_test_state())
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_status_endpoint() {
        let response = get("/api/status").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let status: StatusResponse = serde_json::from_slice(&body).unwrap();

        assert!(status.running);
        assert_eq!(status.version, env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_popular_endpoint() {
        let response = get("/api/locations/popular").await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["cities"].as_array().unwrap().len(), popular_cities().len());
        assert_eq!(json["localities"][0]["fullAddress"], "Vijay Nagar, Indore, Madhya Pradesh, India");
        assert_eq!(json["serviced"].as_array().unwrap().len(), 10);
    }

    #[tokio::test]
    async fn test_resolve_endpoint() {
        let response = get("/api/locations/resolve?city=Mumbai").await;
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let resolved: ResolveResponse = serde_json::from_slice(&body).unwrap();
        assert!(resolved.serviced);
        assert_eq!(resolved.path, "/mumbai");

        let response = get("/api/locations/resolve?city=Goa").await;
        let json = body_json(response).await;
        assert_eq!(json["serviced"], false);
        assert_eq!(json["path"], "/services-unavailable?city=Goa");

        let response = get("/api/locations/resolve").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_search_requires_query() {
        let response = get("/api/geocode/search").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert!(json["error"].is_string());
        assert!(json["message"].as_str().unwrap().contains("query"));
    }

    #[tokio::test]
    async fn test_search_falls_back_when_vendor_down() {
        let response = get("/api/geocode/search?query=pun").await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["status"], "FALLBACK_RESPONSE");
        assert_eq!(json["features"][0]["properties"]["name"], "Pune");
    }

    #[tokio::test]
    async fn test_invalid_limit_is_rejected() {
        let response = get("/api/geocode/search?query=pun&limit=many").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_reverse_requires_both_coordinates() {
        for uri in [
            "/api/geocode/reverse",
            "/api/geocode/reverse?lat=22.7",
            "/api/geocode/reverse?lon=75.8",
        ] {
            assert_eq!(get(uri).await.status(), StatusCode::BAD_REQUEST, "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_reverse_falls_back_to_default_place() {
        let response = get("/api/geocode/reverse?lat=12.97&lon=77.59").await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["status"], "FALLBACK_RESPONSE");
        assert_eq!(json["results"][0]["geometry"]["location"]["lat"], 22.7196);
    }

    #[tokio::test]
    async fn test_details_requires_place_id() {
        assert_eq!(get("/api/places/details").await.status(), StatusCode::BAD_REQUEST);
        assert_eq!(get("/api/places/details?place_id=").await.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_details_vendor_down_is_500() {
        let response = get("/api/places/details?place_id=abc123").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert!(json["error"].is_string());
        assert!(json["message"].is_string());
    }

    #[tokio::test]
    async fn test_nearby_requires_coordinates() {
        assert_eq!(get("/api/places/nearby?lat=1").await.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            get("/api/places/nearby?lat=1&lng=2&radius=-5").await.status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn test_photo_vendor_down_redirects_to_placeholder() {
        let response = get("/api/places/photo?photo_reference=ref1").await;
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/images/placeholder-location.svg"
        );
    }

    #[tokio::test]
    async fn test_landing_uses_cookie() {
        let response = create_router(create_test_state())
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::COOKIE, "user_city=Pune")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/pune");
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }

    #[tokio::test]
    async fn test_landing_defaults_without_cookie() {
        let response = get("/").await;

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/indore");
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }

    #[test]
    fn test_client_ip_prefers_forwarded_for() {
        let peer: SocketAddr = "192.0.2.10:51000".parse().unwrap();
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "203.0.113.7, 10.0.0.1".parse().unwrap());
        headers.insert("x-real-ip", "198.51.100.2".parse().unwrap());
        assert_eq!(client_ip(&headers, Some(peer)), Some("203.0.113.7".parse().unwrap()));

        headers.remove("x-forwarded-for");
        assert_eq!(client_ip(&headers, Some(peer)), Some("198.51.100.2".parse().unwrap()));

        assert_eq!(client_ip(&HeaderMap::new(), Some(peer)), Some(peer.ip()));
        assert_eq!(client_ip(&HeaderMap::new(), None), None);
    }

    #[tokio::test]
    async fn test_coordinates_must_be_finite_and_in_range() {
        for uri in [
            "/api/geocode/reverse?lat=NaN&lon=75.8",
            "/api/geocode/reverse?lat=999&lon=75.8",
            "/api/geocode/reverse?lat=22.7&lon=-180.5",
            "/api/geocode/reverse?lat=inf&lon=75.8",
            "/api/places/nearby?lat=22.7&lng=NaN",
            "/api/places/nearby?lat=-91&lng=75.8",
        ] {
            let response = get(uri).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
            let json = body_json(response).await;
            assert!(json["message"].as_str().unwrap().starts_with("Invalid parameter"), "{}", uri);
        }
    }

    #[test]
    fn test_parse_coordinate_bounds() {
        assert_eq!(parse_coordinate("lat", "90", 90.0).unwrap(), 90.0);
        assert_eq!(parse_coordinate("lng", " -180 ", 180.0).unwrap(), -180.0);
        assert!(parse_coordinate("lat", "90.0001", 90.0).is_err());
        assert!(parse_coordinate("lng", "-inf", 180.0).is_err());
    }
}
