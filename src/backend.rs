use crate::{NewPokemon, Pokemon, PokemonId, PokemonPatch, StoreError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

mod memory;
#[cfg(feature = "backend-mongo")]
mod mongo;

pub use memory::InMemoryStore;
#[cfg(feature = "backend-mongo")]
pub use mongo::MongoStore;

/// Persistence seam for pokemon records.
///
/// Implementations own query execution: ordering, substring matching and id
/// allocation all happen inside the store.
#[async_trait]
pub trait PokemonStore: Send + Sync {
    /// Records in the store's natural order.
    async fn list(&self, skip: u64, limit: u64) -> Result<Vec<Pokemon>, StoreError>;

    async fn count(&self) -> Result<u64, StoreError>;

    async fn get(&self, id: PokemonId) -> Result<Option<Pokemon>, StoreError>;

    /// Records whose english or french name contains `fragment`,
    /// ignoring case.
    async fn search_by_name(&self, fragment: &str) -> Result<Vec<Pokemon>, StoreError>;

    /// Assign `max(id) + 1` (or 1 on an empty store) and persist the record.
    /// Two concurrent calls never receive the same id.
    async fn insert_next(&self, draft: NewPokemon) -> Result<Pokemon, StoreError>;

    /// Returns the post-update record, or `None` when `id` is unknown.
    async fn update(
        &self,
        id: PokemonId,
        patch: &PokemonPatch,
    ) -> Result<Option<Pokemon>, StoreError>;

    /// Returns the removed record, or `None` when `id` is unknown.
    async fn delete(&self, id: PokemonId) -> Result<Option<Pokemon>, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;

    async fn close(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StoreConfig {
    Mongo {
        #[serde(default = "default_uri")]
        uri: String,
        #[serde(default = "default_database")]
        database: String,
        #[serde(default = "default_collection")]
        collection: String,
    },
    InMemory,
}

impl StoreConfig {
    pub fn mongo<U: Into<String>>(uri: U) -> Self {
        StoreConfig::Mongo {
            uri: uri.into(),
            database: default_database(),
            collection: default_collection(),
        }
    }

    pub fn in_memory() -> Self {
        StoreConfig::InMemory
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            StoreConfig::Mongo { .. } => "mongo",
            StoreConfig::InMemory => "in_memory",
        }
    }

    /// Connect to the configured backend.
    pub async fn open(&self) -> Result<Arc<dyn PokemonStore>, StoreError> {
        match self {
            StoreConfig::InMemory => Ok(Arc::new(InMemoryStore::new())),
            StoreConfig::Mongo {
                uri,
                database,
                collection,
            } => {
                #[cfg(feature = "backend-mongo")]
                {
                    Ok(Arc::new(MongoStore::connect(uri, database, collection).await?))
                }
                #[cfg(not(feature = "backend-mongo"))]
                {
                    let _ = (uri, database, collection);
                    Err(StoreError::Unavailable("mongo"))
                }
            }
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::Mongo {
            uri: default_uri(),
            database: default_database(),
            collection: default_collection(),
        }
    }
}

fn default_uri() -> String {
    "mongodb://localhost:27017".to_string()
}

fn default_database() -> String {
    "pokedex".to_string()
}

fn default_collection() -> String {
    "pokemons".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn config_is_tagged_by_backend() {
        let cfg: StoreConfig = serde_json::from_value(json!({ "backend": "in_memory" })).unwrap();
        assert_eq!(cfg, StoreConfig::InMemory);

        let cfg: StoreConfig = serde_json::from_value(json!({
            "backend": "mongo",
            "uri": "mongodb://db:27017"
        }))
        .unwrap();
        assert_eq!(cfg, StoreConfig::mongo("mongodb://db:27017"));
        assert_eq!(cfg.backend_name(), "mongo");
    }

    #[test]
    fn default_targets_local_mongo() {
        let StoreConfig::Mongo {
            uri,
            database,
            collection,
        } = StoreConfig::default()
        else {
            panic!("default backend should be mongo");
        };
        assert_eq!(uri, "mongodb://localhost:27017");
        assert_eq!(database, "pokedex");
        assert_eq!(collection, "pokemons");
    }

    #[tokio::test]
    async fn in_memory_opens_empty() {
        let store = StoreConfig::in_memory().open().await.unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
        store.ping().await.unwrap();
    }
}
