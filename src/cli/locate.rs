//! Locate command handler
//!
//! Resolves a city the way a first-time visitor's landing page would, or
//! names the place at a coordinate.

use crate::config::Config;
use crate::constants::location::LANDING_PATH;
use crate::error::Result;
use crate::geo::http::HttpFacade;
use crate::location::cookie::MemoryJar;
use crate::location::{LocationPolicy, LocationStore};
use crate::search::{SearchSession, SearchSettings};
use clap::Args;

/// Locate command arguments
#[derive(Args)]
pub struct LocateArgs {
    /// Latitude for a reverse lookup
    #[arg(long, requires = "lng", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude for a reverse lookup
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lng: Option<f64>,

    /// Gateway base URL (defaults to client.gateway_url)
    #[arg(long)]
    pub url: Option<String>,
}

/// Run the locate command
pub async fn run(args: LocateArgs) -> Result<()> {
    let config = Config::load()?;
    let base_url = args.url.unwrap_or_else(|| config.client.gateway_url.clone());
    let settings = SearchSettings::from_config(&config);
    let facade = HttpFacade::new(&base_url, settings.timeout)?;

    if let (Some(lat), Some(lng)) = (args.lat, args.lng) {
        let session = SearchSession::new(facade, settings);
        match session.reverse_lookup(lat, lng).await {
            Some(place) => {
                println!("City: {}", place.city);
                println!("State: {}", place.state);
                if let Some(address) = place.formatted_address {
                    println!("Address: {}", address);
                }
            }
            None => println!("No place found at {}, {}", lat, lng),
        }
        return Ok(());
    }

    let mut store = LocationStore::new(facade, MemoryJar::new(), LocationPolicy::from_config(&config));
    let navigation = store.init(LANDING_PATH).await;
    let resolved = store.resolved();

    if let Some(city) = &resolved.user_city {
        println!("City: {}", city);
    }
    if let Some(location) = resolved.user_location {
        println!("Location: {:.4}, {:.4}", location.lat, location.lng);
    }
    if let Some(notice) = &resolved.error {
        println!("Note: {}", notice);
    }
    if let Some(navigation) = navigation {
        println!("Route: {}", navigation);
    }
    println!(
        "Cookie: {}",
        if store.cookies().writes() > 0 { "written" } else { "not written" }
    );

    Ok(())
}
