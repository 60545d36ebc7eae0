//! Search command handler
//!
//! Runs one query through a search session against a running gateway.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::geo::http::HttpFacade;
use crate::location::cookie::MemoryJar;
use crate::location::{LocationPolicy, LocationStore};
use crate::search::{SearchPhase, SearchSession, SearchSettings};
use clap::Args;
use std::time::Duration;

/// Search command arguments
#[derive(Args)]
pub struct SearchArgs {
    /// Place to search for
    pub query: String,

    /// Maximum number of suggestions
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Select the Nth suggestion (1-based) and show where it routes
    #[arg(long, short = 's')]
    pub select: Option<usize>,

    /// Gateway base URL (defaults to client.gateway_url)
    #[arg(long)]
    pub url: Option<String>,

    /// Print the session view as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the search command
pub async fn run(args: SearchArgs) -> Result<()> {
    let config = Config::load()?;
    let base_url = args.url.unwrap_or_else(|| config.client.gateway_url.clone());

    let mut settings = SearchSettings::from_config(&config);
    settings.debounce = Duration::ZERO;
    if let Some(limit) = args.limit {
        settings.limit = limit;
    }

    let facade = HttpFacade::new(&base_url, settings.timeout)?;
    let session = SearchSession::new(facade.clone(), settings);
    session.open();
    let view = session.search(&args.query).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        match view.phase {
            SearchPhase::Idle => println!(
                "Type at least {} characters to search",
                config.search.min_query_len
            ),
            SearchPhase::NoResults => println!("No places match \"{}\"", args.query),
            SearchPhase::ErrorAbsorbed => println!("Gateway did not answer in time; showing local matches"),
            SearchPhase::Searching | SearchPhase::Results => {}
        }
        for (i, suggestion) in view.suggestions.iter().enumerate() {
            let detail = suggestion
                .full_address
                .as_deref()
                .or(suggestion.state.as_deref())
                .unwrap_or_default();
            println!("{:>2}. {} [{}] {}", i + 1, suggestion.name, suggestion.city, detail);
        }
    }

    if let Some(index) = args.select {
        let suggestion = index
            .checked_sub(1)
            .and_then(|i| view.suggestions.get(i))
            .ok_or(Error::InvalidParameter {
                name: "select",
                value: index.to_string(),
            })?;

        let mut store = LocationStore::new(facade, MemoryJar::new(), LocationPolicy::from_config(&config));
        let navigation = session.select(suggestion, &mut store);
        println!();
        println!("Selected {} -> {}", suggestion.city, navigation);
    }

    Ok(())
}
