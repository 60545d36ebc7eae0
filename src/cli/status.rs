//! Status command handler
//!
//! Shows whether a gateway is reachable and how it is configured.

use crate::config::Config;
use crate::error::Result;
use clap::Args;

/// Status command arguments
#[derive(Args)]
pub struct StatusArgs {
    /// Gateway base URL (defaults to client.gateway_url)
    #[arg(long)]
    pub url: Option<String>,
}

/// Run the status command
pub async fn run(args: StatusArgs) -> Result<()> {
    let config = Config::load()?;
    let base_url = args.url.unwrap_or_else(|| config.client.gateway_url.clone());

    println!("city-locator v{}", env!("CARGO_PKG_VERSION"));
    println!();

    check_server_status(&base_url).await;

    println!("Serviced cities: {}", config.location.serviced_cities.join(", "));
    println!(
        "Default city: {} ({}, {})",
        config.location.default_city, config.location.default_lat, config.location.default_lng
    );

    Ok(())
}

/// Check if the gateway is running
async fn check_server_status(base_url: &str) {
    let url = format!("{}/api/status", base_url.trim_end_matches('/'));

    match reqwest::get(&url).await {
        Ok(response) => {
            if response.status().is_success() {
                println!("Gateway: RUNNING at {}", base_url);
                if let Ok(status) = response.json::<serde_json::Value>().await {
                    if let Some(version) = status.get("version").and_then(|v| v.as_str()) {
                        println!("  Version: {}", version);
                    }
                    if let Some(configured) = status.get("api_key_configured").and_then(|v| v.as_bool()) {
                        println!(
                            "  Vendor key: {}",
                            if configured { "configured" } else { "missing (fallback only)" }
                        );
                    }
                    if let Some(uptime) = status.get("uptime_secs").and_then(|v| v.as_u64()) {
                        println!("  Uptime: {}s", uptime);
                    }
                }
            } else {
                println!("Gateway: ERROR (status {})", response.status());
            }
        }
        Err(_) => {
            println!("Gateway: NOT RUNNING at {}", base_url);
        }
    }
    println!();
}
