//! Config command handler
//!
//! View and modify configuration settings.

use crate::config::Config;
use crate::error::{Error, Result};
use clap::Args;

/// Config command arguments
#[derive(Args)]
pub struct ConfigArgs {
    /// Configuration key (e.g., "location.default_city")
    pub key: Option<String>,

    /// Value to set (if not provided, shows current value)
    pub value: Option<String>,

    /// Show config file path
    #[arg(long)]
    pub path: bool,

    /// Reset config to defaults
    #[arg(long)]
    pub reset: bool,
}

/// Run the config command
pub fn run(args: ConfigArgs) -> Result<()> {
    // Show path
    if args.path {
        let path = Config::config_path()?;
        println!("{}", path.display());
        return Ok(());
    }

    // Reset config
    if args.reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        return Ok(());
    }

    let mut config = Config::load()?;

    match (&args.key, &args.value) {
        // No arguments: show all config
        (None, None) => {
            show_all_config(&config);
        }

        // Key only: show that value
        (Some(key), None) => match config.get(key) {
            Some(value) => println!("{}", value),
            None => {
                eprintln!("Available keys:");
                for k in Config::available_keys() {
                    eprintln!("  {}", k);
                }
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        },

        // Key and value: set the value
        (Some(key), Some(value)) => {
            config.set(key, value)?;
            config.save()?;
            println!("{} = {}", key, value);
        }

        // Value without key: not valid
        (None, Some(_)) => {
            return Err(Error::Config("Must specify a key to set a value".to_string()));
        }
    }

    Ok(())
}

/// Display all configuration values
fn show_all_config(config: &Config) {
    println!("[server]");
    println!("host = \"{}\"", config.server.host);
    println!("port = {}", config.server.port);
    println!();

    println!("[vendor]");
    println!("base_url = \"{}\"", config.vendor.base_url);
    println!("api_key_header = \"{}\"", config.vendor.api_key_header);
    if config.vendor_api_key().is_empty() {
        println!("api_key = \"\" # not configured");
    } else {
        println!("api_key = \"***\" # configured");
    }
    println!();

    println!("[gateway]");
    println!("request_timeout_secs = {}", config.gateway.request_timeout_secs);
    println!("autocomplete_timeout_secs = {}", config.gateway.autocomplete_timeout_secs);
    println!("ip_timeout_secs = {}", config.gateway.ip_timeout_secs);
    println!("photo_placeholder = \"{}\"", config.gateway.photo_placeholder);
    println!();

    println!("[location]");
    println!("default_city = \"{}\"", config.location.default_city);
    println!("default_state = \"{}\"", config.location.default_state);
    println!("default_lat = {}", config.location.default_lat);
    println!("default_lng = {}", config.location.default_lng);
    println!("serviced_cities = {:?}", config.location.serviced_cities);
    if config.location.cookie_secret.is_empty() {
        println!("cookie_secret = \"\" # cookie unsigned");
    } else {
        println!("cookie_secret = \"***\" # cookie signed");
    }
    println!("cookie_days = {}", config.location.cookie_days);
    println!();

    println!("[search]");
    println!("min_query_len = {}", config.search.min_query_len);
    println!("debounce_ms = {}", config.search.debounce_ms);
    println!("client_timeout_secs = {}", config.search.client_timeout_secs);
    println!();

    println!("[client]");
    println!("gateway_url = \"{}\"", config.client.gateway_url);
}
