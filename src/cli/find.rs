//! Find command handler
//!
//! Reads a cities file and prints the closest city to the anchor.

use crate::cities::read_cities_file;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::format::{available_formats, get_formatter, OutputFormatter};
use crate::gateway::Gateway;
use crate::history::{History, SearchRecord};
use crate::selector::{validate_radius, SearchOutcome, Selector};
use clap::Args;
use tracing::{info, warn};

/// Find command arguments
#[derive(Args)]
pub struct FindArgs {
    /// Path to text file containing list of cities
    #[arg(short = 'f', long)]
    pub file: String,

    /// Anchor city to measure distances from
    #[arg(short = 'c', long)]
    pub city: String,

    /// Maximum radius in miles to consider cities
    #[arg(short = 'r', long, allow_negative_numbers = true)]
    pub radius: Option<f64>,

    /// Output format (text or json)
    #[arg(long)]
    pub format: Option<String>,

    /// Answer from a fixture file instead of Google Maps
    #[arg(long)]
    pub fixture: Option<String>,

    /// Don't save to history
    #[arg(long)]
    pub no_history: bool,

    /// Write output to file
    #[arg(long, short = 'o')]
    pub output: Option<String>,
}

/// Everything a search needs, resolved before the first gateway request
struct FindPlan {
    radius: f64,
    formatter: Box<dyn OutputFormatter>,
    selector: Selector,
    gateway: Gateway,
    cities: Vec<String>,
}

/// Resolve and check the inputs in order: radius, format, search settings,
/// gateway, then the cities file
fn prepare(args: &FindArgs, config: &Config) -> Result<FindPlan> {
    let radius = args.radius.unwrap_or(config.defaults.radius);
    validate_radius(radius)?;

    let format = args.format.as_deref().unwrap_or(&config.defaults.format);
    let formatter = get_formatter(format).ok_or_else(|| {
        let names: Vec<String> = available_formats().into_iter().map(|f| f.name).collect();
        Error::Config(format!(
            "Unknown format: {} (available: {})",
            format,
            names.join(", ")
        ))
    })?;

    let selector = Selector::new(config.selector_config()?);
    let gateway = Gateway::from_config(config, args.fixture.as_deref())?;
    let cities = read_cities_file(&args.file)?;

    Ok(FindPlan {
        radius,
        formatter,
        selector,
        gateway,
        cities,
    })
}

/// Run the find command
pub async fn run(args: FindArgs) -> Result<()> {
    super::init_logging();

    let config = Config::load()?;
    let FindPlan {
        radius,
        formatter,
        selector,
        gateway,
        cities,
    } = prepare(&args, &config)?;

    info!("Processing {} unique cities...", cities.len());
    info!(
        "Searching for closest city to {} within {} miles radius...",
        args.city, radius
    );

    let outcome = selector
        .find_closest(&cities, &args.city, radius, &gateway, &gateway)
        .await?;

    if config.history.enabled && !args.no_history {
        save_history(&config, &outcome, &cities);
    }

    let output = formatter.format(&outcome)?;

    if let Some(path) = args.output {
        std::fs::write(&path, &output)?;
        eprintln!("Output written to {}", path);
    } else {
        println!("{}", output);
    }

    Ok(())
}

fn save_history(config: &Config, outcome: &SearchOutcome, cities: &[String]) {
    let result = History::load().and_then(|history| {
        let mut history = history.with_max_entries(config.history.max_entries);
        history.add(SearchRecord::new(outcome, cities));
        history.save()
    });

    if let Err(e) = result {
        warn!("Failed to save search history: {}", e);
    }
}
