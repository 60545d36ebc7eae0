//! city-locator CLI entry point
//!
//! Location gateway server + search and locate commands

use city_locator::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
