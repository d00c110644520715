use crate::page::{total_pages, PageRequest, PokemonPage};
use crate::{NewPokemon, Pokemon, PokemonId, PokemonPatch, PokemonStore, StoreError};
use std::sync::Arc;

/// Domain operations over a shared [`PokemonStore`] handle.
///
/// Cloning is cheap; every clone talks to the same store.
#[derive(Clone)]
pub struct Pokedex {
    store: Arc<dyn PokemonStore>,
}

impl Pokedex {
    pub fn new(store: Arc<dyn PokemonStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn PokemonStore> {
        &self.store
    }

    pub async fn list_page(&self, request: PageRequest) -> Result<PokemonPage, StoreError> {
        let pokemons = self.store.list(request.skip(), request.limit()).await?;
        let total = self.store.count().await?;
        tracing::debug!(
            page = request.page(),
            returned = pokemons.len(),
            total,
            "listed pokemons"
        );

        Ok(PokemonPage {
            pokemons,
            current_page: request.page(),
            total_pages: total_pages(total),
            total_pokemons: total,
        })
    }

    pub async fn get(&self, id: PokemonId) -> Result<Option<Pokemon>, StoreError> {
        self.store.get(id).await
    }

    pub async fn search(&self, fragment: &str) -> Result<Vec<Pokemon>, StoreError> {
        let hits = self.store.search_by_name(fragment).await?;
        tracing::debug!(fragment, hits = hits.len(), "searched pokemons by name");
        Ok(hits)
    }

    pub async fn create(&self, draft: NewPokemon) -> Result<Pokemon, StoreError> {
        let pokemon = self.store.insert_next(draft).await?;
        tracing::debug!(id = %pokemon.id, "created pokemon");
        Ok(pokemon)
    }

    pub async fn update(
        &self,
        id: PokemonId,
        patch: &PokemonPatch,
    ) -> Result<Option<Pokemon>, StoreError> {
        let updated = self.store.update(id, patch).await?;
        tracing::debug!(%id, found = updated.is_some(), "updated pokemon");
        Ok(updated)
    }

    pub async fn delete(&self, id: PokemonId) -> Result<Option<Pokemon>, StoreError> {
        let deleted = self.store.delete(id).await?;
        tracing::debug!(%id, found = deleted.is_some(), "deleted pokemon");
        Ok(deleted)
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        self.store.ping().await
    }

    pub async fn close(&self) -> Result<(), StoreError> {
        self.store.close().await
    }
}
