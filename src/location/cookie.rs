//! The `user_city` cookie
//!
//! Values are percent-encoded. With a secret configured they also carry an
//! HMAC-SHA256 tag (`<city>.<hex tag>`), and values whose tag does not verify
//! are treated as absent.

use crate::constants::cookie::{MAX_AGE_DAYS, USER_CITY};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::collections::HashMap;

type HmacSha256 = Hmac<Sha256>;

/// A cookie to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCookie {
    pub name: String,
    pub value: String,
    pub expires: DateTime<Utc>,
    pub max_age_secs: i64,
    pub path: String,
}

impl SetCookie {
    /// A root-scoped, strict same-site cookie expiring `days` from now
    pub fn new(name: &str, value: String, days: i64) -> Self {
        let lifetime = Duration::days(days);
        Self {
            name: name.to_string(),
            value,
            expires: Utc::now() + lifetime,
            max_age_secs: lifetime.num_seconds(),
            path: "/".to_string(),
        }
    }

    /// `Set-Cookie` header value
    pub fn header_value(&self) -> String {
        format!(
            "{}={}; Expires={}; Max-Age={}; Path={}; SameSite=Strict",
            self.name,
            self.value,
            self.expires.format("%a, %d %b %Y %H:%M:%S GMT"),
            self.max_age_secs,
            self.path
        )
    }
}

/// Cookie storage seen by the location store
pub trait CookieJar {
    /// Raw value of the named cookie
    fn get(&self, name: &str) -> Option<String>;

    /// Write a cookie
    fn set(&mut self, cookie: SetCookie);
}

/// Jar kept in memory, for CLI sessions and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryJar {
    cookies: HashMap<String, SetCookie>,
    writes: usize,
}

impl MemoryJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored cookie with its attributes
    pub fn cookie(&self, name: &str) -> Option<&SetCookie> {
        self.cookies.get(name)
    }

    /// Number of writes since creation
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl CookieJar for MemoryJar {
    fn get(&self, name: &str) -> Option<String> {
        self.cookies.get(name).map(|c| c.value.clone())
    }

    fn set(&mut self, cookie: SetCookie) {
        self.writes += 1;
        self.cookies.insert(cookie.name.clone(), cookie);
    }
}

/// Jar backed by one HTTP request's `Cookie` headers
///
/// Writes are collected and emitted as `Set-Cookie` headers on the response.
#[derive(Debug, Clone, Default)]
pub struct RequestJar {
    incoming: HashMap<String, String>,
    outgoing: Vec<SetCookie>,
}

impl RequestJar {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let incoming = headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
            .filter_map(|pair| {
                let (name, value) = pair.trim().split_once('=')?;
                Some((name.trim().to_string(), value.trim().to_string()))
            })
            .collect();

        Self {
            incoming,
            outgoing: Vec::new(),
        }
    }

    /// Cookies written during the request
    pub fn outgoing(&self) -> &[SetCookie] {
        &self.outgoing
    }

    /// Append the collected writes to `headers`
    pub fn apply(&self, headers: &mut HeaderMap) {
        for cookie in &self.outgoing {
            if let Ok(value) = HeaderValue::from_str(&cookie.header_value()) {
                headers.append(SET_COOKIE, value);
            }
        }
    }
}

impl CookieJar for RequestJar {
    fn get(&self, name: &str) -> Option<String> {
        self.outgoing
            .iter()
            .rev()
            .find(|c| c.name == name)
            .map(|c| c.value.clone())
            .or_else(|| self.incoming.get(name).cloned())
    }

    fn set(&mut self, cookie: SetCookie) {
        self.outgoing.push(cookie);
    }
}

/// Encodes and verifies `user_city` values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityCookie {
    secret: Option<String>,
    days: i64,
}

impl Default for CityCookie {
    fn default() -> Self {
        Self::new(None, MAX_AGE_DAYS)
    }
}

impl CityCookie {
    /// `secret` of `None` (or empty) leaves values unsigned
    pub fn new(secret: Option<String>, days: i64) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()),
            days,
        }
    }

    pub fn is_signed(&self) -> bool {
        self.secret.is_some()
    }

    /// The cookie that records `city`
    pub fn encode(&self, city: &str) -> SetCookie {
        let encoded = urlencoding::encode(city).into_owned();
        let signature = self.secret.as_deref().and_then(|secret| sign(secret, &encoded));
        let value = match signature {
            Some(tag) => format!("{}.{}", encoded, tag),
            None => encoded,
        };
        SetCookie::new(USER_CITY, value, self.days)
    }

    /// The city stored in a raw cookie value, if it is intact
    pub fn decode(&self, raw: &str) -> Option<String> {
        let encoded = match &self.secret {
            Some(secret) => {
                let (encoded, tag) = raw.rsplit_once('.')?;
                let tag = hex::decode(tag).ok()?;
                let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
                mac.update(encoded.as_bytes());
                mac.verify_slice(&tag).ok()?;
                encoded
            }
            None => raw,
        };

        let city = urlencoding::decode(encoded).ok()?.trim().to_string();
        (!city.is_empty()).then_some(city)
    }

    /// Read the city from a jar
    pub fn read(&self, jar: &impl CookieJar) -> Option<String> {
        jar.get(USER_CITY).and_then(|raw| self.decode(&raw))
    }
}

fn sign(secret: &str, value: &str) -> Option<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(value.as_bytes());
    Some(hex::encode(mac.finalize().into_bytes()))
}
