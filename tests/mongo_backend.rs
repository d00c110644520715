//! MongoDB backend tests. They need a reachable server:
//!
//! ```text
//! POKEDEX_TEST_MONGO_URI=mongodb://localhost:27017 cargo test -- --ignored
//! ```

#![cfg(feature = "backend-mongo")]

use pokedex::{NewPokemon, PokemonId, PokemonName, PokemonPatch, PokemonStore, StoreConfig};
use serde_json::json;
use std::sync::Arc;

async fn fresh_store(collection: &str) -> Arc<dyn PokemonStore> {
    let uri = std::env::var("POKEDEX_TEST_MONGO_URI")
        .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
    let config = StoreConfig::Mongo {
        uri,
        database: "pokedex_test".to_string(),
        collection: collection.to_string(),
    };
    let store = config.open().await.expect("mongo reachable");

    // Start from an empty collection.
    while store.count().await.unwrap() > 0 {
        for pokemon in store.list(0, 100).await.unwrap() {
            store.delete(pokemon.id).await.unwrap();
        }
    }
    store
}

fn draft(english: &str, french: &str) -> NewPokemon {
    NewPokemon::new(PokemonName::new(english, french))
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn crud_round_trip() {
    let store = fresh_store("crud_round_trip").await;

    let created = store.insert_next(draft("Bulbasaur", "Bulbizarre")).await.unwrap();
    assert_eq!(created.id, PokemonId::FIRST);
    assert_eq!(store.get(created.id).await.unwrap(), Some(created.clone()));

    let patch = PokemonPatch::new().set("hp", json!(45));
    let updated = store.update(created.id, &patch).await.unwrap().unwrap();
    assert_eq!(updated.attributes["hp"], json!(45));

    let hits = store.search_by_name("BULBI").await.unwrap();
    assert_eq!(hits.len(), 1);

    assert_eq!(store.delete(created.id).await.unwrap(), Some(updated));
    assert_eq!(store.get(created.id).await.unwrap(), None);
    store.close().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "requires a running MongoDB"]
async fn concurrent_inserts_do_not_collide() {
    let store = fresh_store("concurrent_inserts").await;

    let mut handles = Vec::new();
    for i in 0..4 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            let name = format!("Mon{i}");
            store.insert_next(draft(&name, &name)).await.unwrap().id.get()
        }));
    }
    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap());
    }
    ids.sort_unstable();
    assert_eq!(ids, (1..=4).collect::<Vec<i64>>());
    store.close().await.unwrap();
}
