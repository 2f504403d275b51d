//! Server shared state
//!
//! Holds configuration, the gateway and the history location for the HTTP
//! server.

use crate::config::Config;
use crate::error::Result;
use crate::gateway::Gateway;
use crate::history::{History, SearchRecord};
use crate::selector::{SearchOutcome, Selector};
use std::path::PathBuf;
use tokio::sync::Mutex;
use tracing::warn;

/// Shared state for the HTTP server
pub struct AppState {
    /// Configuration
    pub config: Config,

    gateway: Gateway,
    selector: Selector,
    history_path: PathBuf,

    /// Serialises load-modify-save cycles on the history file
    history_lock: Mutex<()>,
}

impl AppState {
    /// Create state with the gateway named in `config`
    pub fn new(config: Config, fixture_override: Option<&str>) -> Result<Self> {
        let gateway = Gateway::from_config(&config, fixture_override)?;
        Self::with_gateway(config, gateway, History::history_path()?)
    }

    /// Create state around an existing gateway and history file
    pub fn with_gateway(config: Config, gateway: Gateway, history_path: PathBuf) -> Result<Self> {
        let selector = Selector::new(config.selector_config()?);
        Ok(Self {
            config,
            gateway,
            selector,
            history_path,
            history_lock: Mutex::new(()),
        })
    }

    /// Current gateway name
    pub fn gateway_name(&self) -> &'static str {
        self.gateway.name()
    }

    /// Run a search and record it in history when enabled
    pub async fn search(
        &self,
        anchor: &str,
        radius: f64,
        cities: &[String],
    ) -> Result<SearchOutcome> {
        let outcome = self
            .selector
            .find_closest(cities, anchor, radius, &self.gateway, &self.gateway)
            .await?;

        if self.config.history.enabled {
            // A failed history write must not fail a finished search
            if let Err(e) = self.record(SearchRecord::new(&outcome, cities)).await {
                warn!("Failed to save search history: {}", e);
            }
        }

        Ok(outcome)
    }

    async fn record(&self, record: SearchRecord) -> Result<()> {
        let _guard = self.history_lock.lock().await;
        let mut history = self.load_history()?;
        history.add(record);
        history.save()
    }

    /// Load the history file
    pub fn load_history(&self) -> Result<History> {
        Ok(History::load_from(self.history_path.clone())?
            .with_max_entries(self.config.history.max_entries))
    }

    /// Remove one history entry, returning whether it existed
    pub async fn delete_history_entry(&self, id: &str) -> Result<bool> {
        let _guard = self.history_lock.lock().await;
        let mut history = self.load_history()?;
        if history.remove(id).is_some() {
            history.save()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
