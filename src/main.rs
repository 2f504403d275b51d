//! closest-city CLI entry point
//!
//! Closest city by driving distance - CLI + web app

use closest_city::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
