//! Default configuration values
//!
//! Named constants for all tunable parameters

/// Default search radius in miles
pub const DEFAULT_RADIUS: f64 = 100.0;

/// Default output format
pub const DEFAULT_FORMAT: &str = "text";

/// Default gateway backend
pub const DEFAULT_BACKEND: &str = "google";

/// Country appended to every geocoding/routing query
pub const DEFAULT_COUNTRY_HINT: &str = "United States";

/// Default anchor matching policy
pub const DEFAULT_ANCHOR_MATCH: &str = "case_insensitive";

/// Per-request gateway timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 5000;

/// Default cap on stored history entries
pub const DEFAULT_MAX_HISTORY_ENTRIES: usize = 100;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "closest-city";
