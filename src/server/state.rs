//! Server shared state
//!
//! Holds configuration and the shared gateway for the HTTP server.

use crate::config::Config;
use crate::error::Result;
use crate::gateway::Gateway;
use crate::location::LocationPolicy;
use std::sync::Arc;
use std::time::Instant;

/// Shared state for the HTTP server
#[derive(Debug)]
pub struct AppState {
    /// Configuration the server started with
    pub config: Config,

    /// Vendor gateway
    pub gateway: Arc<Gateway>,

    /// Redirect and cookie rules for the landing route
    pub policy: LocationPolicy,

    started_at: Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(config: Config) -> Result<Self> {
        let gateway = Gateway::from_config(&config)?;
        Ok(Self::with_gateway(config, gateway))
    }

    /// Create state around an existing gateway
    pub fn with_gateway(config: Config, gateway: Gateway) -> Self {
        let policy = LocationPolicy::from_config(&config);
        Self {
            config,
            gateway: Arc::new(gateway),
            policy,
            started_at: Instant::now(),
        }
    }

    /// Seconds since the state was created
    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
