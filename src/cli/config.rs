//! Config command handler
//!
//! View and modify configuration settings.

use crate::config::Config;
use crate::error::{Error, Result};
use clap::Args;

/// Config command arguments
#[derive(Args)]
pub struct ConfigArgs {
    /// Configuration key (e.g., "defaults.radius")
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
    if args.path {
        let path = Config::config_path()?;
        println!("{}", path.display());
        return Ok(());
    }

    if args.reset {
        Config::default().save()?;
        println!("Configuration reset to defaults");
        return Ok(());
    }

    let mut config = Config::load()?;

    match (&args.key, &args.value) {
        (None, None) => {
            print!("{}", render_config(&config));
        }

        (Some(key), None) => match config.get(key) {
            Some(value) => println!("{}", value),
            None => {
                return Err(Error::Config(format!(
                    "Unknown config key: {}\n\nAvailable keys:\n  {}",
                    key,
                    Config::available_keys().join("\n  ")
                )));
            }
        },

        (Some(key), Some(value)) => {
            config.set(key, value)?;
            config.save()?;
            println!("{} = {}", key, value);
        }

        (None, Some(_)) => {
            return Err(Error::Config("Must specify a key to set a value".to_string()));
        }
    }

    Ok(())
}

/// Render all configuration values, masking the API key
fn render_config(config: &Config) -> String {
    let mut out = String::new();

    out.push_str("[defaults]\n");
    out.push_str(&format!("radius = {}\n", config.defaults.radius));
    out.push_str(&format!("format = \"{}\"\n", config.defaults.format));
    out.push_str(&format!("backend = \"{}\"\n", config.defaults.backend));
    out.push_str(&format!("fixture = \"{}\"\n\n", config.defaults.fixture));

    out.push_str("[search]\n");
    out.push_str(&format!("country_hint = \"{}\"\n", config.search.country_hint));
    out.push_str(&format!("anchor_match = \"{}\"\n", config.search.anchor_match));
    out.push_str(&format!("earth_radius_miles = {}\n", config.search.earth_radius_miles));
    out.push_str(&format!("timeout_secs = {}\n\n", config.search.timeout_secs));

    out.push_str("[server]\n");
    out.push_str(&format!("host = \"{}\"\n", config.server.host));
    out.push_str(&format!("port = {}\n\n", config.server.port));

    out.push_str("[history]\n");
    out.push_str(&format!("enabled = {}\n", config.history.enabled));
    out.push_str(&format!("max_entries = {}\n\n", config.history.max_entries));

    out.push_str("[api_keys]\n");
    if config.google_api_key().is_some() {
        out.push_str("google = \"***\" # configured\n");
    } else {
        out.push_str("google = \"\" # not configured\n");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_masks_key() {
        let mut config = Config::default();
        config.api_keys.google = "super-secret".to_string();

        let rendered = render_config(&config);
        assert!(rendered.contains("[search]"));
        assert!(rendered.contains("google = \"***\" # configured"));
        assert!(!rendered.contains("super-secret"));
    }
}
