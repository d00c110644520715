use crate::config::ServerConfig;
use pokedex::{Pokedex, PokemonStore, StoreError};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Pokemon collection (shared across requests)
    pub pokedex: Pokedex,
}

impl ServerState {
    /// Create server state around an already opened store
    pub fn new(config: ServerConfig, store: Arc<dyn PokemonStore>) -> Self {
        Self {
            config: Arc::new(config),
            pokedex: Pokedex::new(store),
        }
    }

    /// Open the configured store and build state around it
    pub async fn connect(config: ServerConfig) -> Result<Self, StoreError> {
        let store = config.store.open().await?;
        Ok(Self::new(config, store))
    }
}

/// Server metadata for health checks
#[derive(Debug, serde::Serialize)]
pub struct ServerMetadata {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub store: &'static str,
    pub timestamp: String,
    pub uptime_seconds: u64,
}
