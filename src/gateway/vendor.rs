//! Vendor HTTP client
//!
//! Thin wrapper over `reqwest` that attaches the API key header, applies a
//! per-call timeout and turns non-success statuses into errors. Error bodies
//! are logged here and never travel further.

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("city-locator/", env!("CARGO_PKG_VERSION"));

/// Longest error body excerpt written to the log
const MAX_LOGGED_BODY: usize = 512;

/// Raw bytes returned by the vendor with their content type
#[derive(Debug, Clone)]
pub struct VendorBytes {
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// Client for the external places/geocoding API
#[derive(Debug, Clone)]
pub struct VendorClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    api_key_header: String,
}

impl VendorClient {
    /// Create a vendor client
    ///
    /// `base_url` may carry a trailing slash; paths are appended as given.
    pub fn new(base_url: &str, api_key: &str, api_key_header: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(5))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            api_key_header: api_key_header.to_string(),
        })
    }

    /// Whether an API key is configured
    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// GET `path` and decode the JSON body as `T`
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        timeout: Duration,
    ) -> Result<T> {
        let response = self.send(path, query, timeout).await?;
        let body = response.bytes().await.map_err(Error::from_request)?;

        serde_json::from_slice(&body).map_err(|e| {
            warn!(path, error = %e, "Vendor payload did not match expected schema");
            Error::MalformedPayload(e.to_string())
        })
    }

    /// GET `path` and return the raw body
    pub async fn get_bytes(
        &self,
        path: &str,
        query: &[(&str, String)],
        timeout: Duration,
    ) -> Result<VendorBytes> {
        let response = self.send(path, query, timeout).await?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await.map_err(Error::from_request)?;

        Ok(VendorBytes {
            content_type,
            body: body.to_vec(),
        })
    }

    async fn send(
        &self,
        path: &str,
        query: &[(&str, String)],
        timeout: Duration,
    ) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "Calling vendor");

        let mut request = self.client.get(&url).query(query).timeout(timeout);
        if self.has_api_key() {
            request = request.header(self.api_key_header.as_str(), self.api_key.as_str());
        }

        let response = request.send().await.map_err(|e| {
            warn!(%url, error = %e, "Vendor request failed");
            Error::from_request(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let excerpt: String = body.chars().take(MAX_LOGGED_BODY).collect();
            warn!(%url, status = status.as_u16(), body = %excerpt, "Vendor returned error status");
            return Err(Error::Vendor {
                status: status.as_u16(),
            });
        }

        Ok(response)
    }
}
