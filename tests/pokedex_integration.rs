//! End-to-end tests of the `Pokedex` facade over the in-memory store.

use std::sync::Arc;

use pokedex::{
    InMemoryStore, NewPokemon, PageRequest, Pokedex, PokemonId, PokemonName, PokemonPatch,
    PAGE_SIZE,
};
use serde_json::json;

fn pokedex() -> Pokedex {
    Pokedex::new(Arc::new(InMemoryStore::new()))
}

fn bulbasaur() -> NewPokemon {
    NewPokemon::new(PokemonName::new("Bulbasaur", "Bulbizarre"))
        .with_attribute("type", json!(["Grass", "Poison"]))
}

#[tokio::test]
async fn create_get_delete_lifecycle() {
    let pokedex = pokedex();

    let created = pokedex.create(bulbasaur()).await.unwrap();
    assert_eq!(created.id, PokemonId::new(1));

    let fetched = pokedex.get(created.id).await.unwrap();
    assert_eq!(fetched.as_ref(), Some(&created));

    let deleted = pokedex.delete(created.id).await.unwrap();
    assert_eq!(deleted, Some(created.clone()));
    assert_eq!(pokedex.get(created.id).await.unwrap(), None);
}

#[tokio::test]
async fn create_assigns_previous_max_plus_one() {
    let seeded = vec![
        bulbasaur().into_pokemon(PokemonId::new(3)),
        bulbasaur().into_pokemon(PokemonId::new(10)),
        bulbasaur().into_pokemon(PokemonId::new(7)),
    ];
    let pokedex = Pokedex::new(Arc::new(InMemoryStore::with_records(seeded)));

    let created = pokedex.create(bulbasaur()).await.unwrap();
    assert_eq!(created.id, PokemonId::new(11));
}

#[tokio::test]
async fn update_merges_and_keeps_id() {
    let pokedex = pokedex();
    let created = pokedex.create(bulbasaur()).await.unwrap();

    let patch: PokemonPatch =
        serde_json::from_value(json!({ "id": 77, "base": { "HP": 45 } })).unwrap();
    let updated = pokedex.update(created.id, &patch).await.unwrap().unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, created.name);
    assert_eq!(updated.attributes["type"], json!(["Grass", "Poison"]));
    assert_eq!(updated.attributes["base"], json!({ "HP": 45 }));
    assert!(pokedex.get(PokemonId::new(77)).await.unwrap().is_none());
}

#[tokio::test]
async fn update_and_delete_unknown_ids() {
    let pokedex = pokedex();
    let patch = PokemonPatch::new().set("hp", json!(1));
    assert!(pokedex.update(PokemonId::new(5), &patch).await.unwrap().is_none());
    assert!(pokedex.delete(PokemonId::new(5)).await.unwrap().is_none());
}

#[tokio::test]
async fn search_is_case_insensitive_substring() {
    let pokedex = pokedex();
    pokedex
        .create(NewPokemon::new(PokemonName::new("Pikachu", "Pikachu")))
        .await
        .unwrap();
    pokedex
        .create(NewPokemon::new(PokemonName::new("Raichu", "Raichu")))
        .await
        .unwrap();
    pokedex.create(bulbasaur()).await.unwrap();

    for fragment in ["pika", "PIKA", "ika"] {
        let hits = pokedex.search(fragment).await.unwrap();
        assert_eq!(hits.len(), 1, "{fragment}");
        assert_eq!(hits[0].name.english, "Pikachu");
    }

    let hits = pokedex.search("chu").await.unwrap();
    assert_eq!(hits.len(), 2);

    let hits = pokedex.search("bulbiz").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name.english, "Bulbasaur");
}

#[tokio::test]
async fn pages_never_exceed_page_size() {
    let pokedex = pokedex();
    for i in 0..61 {
        let name = PokemonName::new(format!("Mon{i}"), format!("Mon{i}"));
        pokedex.create(NewPokemon::new(name)).await.unwrap();
    }

    for page in 1..=5 {
        let listing = pokedex.list_page(PageRequest::new(page)).await.unwrap();
        assert!(listing.pokemons.len() as u64 <= PAGE_SIZE);
        assert_eq!(listing.total_pages, listing.total_pokemons.div_ceil(PAGE_SIZE));
    }

    let by_garbage = pokedex.list_page(PageRequest::parse(Some("abc"))).await.unwrap();
    let by_default = pokedex.list_page(PageRequest::parse(None)).await.unwrap();
    assert_eq!(by_garbage, by_default);
}
