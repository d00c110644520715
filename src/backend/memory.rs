use super::PokemonStore;
use crate::model::name_pattern;
use crate::{NewPokemon, Pokemon, PokemonId, PokemonPatch, StoreError};
use async_trait::async_trait;
use std::sync::RwLock;

/// Insertion-ordered in-process store. Mirrors the document store's
/// observable behavior; used by tests and local runs.
pub struct InMemoryStore {
    records: RwLock<Vec<Pokemon>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    /// Seed the store with existing records, kept in the given order.
    pub fn with_records(records: Vec<Pokemon>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Vec<Pokemon>>, StoreError> {
        self.records
            .read()
            .map_err(|_| StoreError::backend("poisoned lock"))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Vec<Pokemon>>, StoreError> {
        self.records
            .write()
            .map_err(|_| StoreError::backend("poisoned lock"))
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PokemonStore for InMemoryStore {
    async fn list(&self, skip: u64, limit: u64) -> Result<Vec<Pokemon>, StoreError> {
        let guard = self.read()?;
        let skip = usize::try_from(skip).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(guard.iter().skip(skip).take(limit).cloned().collect())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.read()?.len() as u64)
    }

    async fn get(&self, id: PokemonId) -> Result<Option<Pokemon>, StoreError> {
        Ok(self.read()?.iter().find(|p| p.id == id).cloned())
    }

    async fn search_by_name(&self, fragment: &str) -> Result<Vec<Pokemon>, StoreError> {
        let pattern = name_pattern(fragment)?;
        let guard = self.read()?;
        Ok(guard
            .iter()
            .filter(|p| p.name.matches(&pattern))
            .cloned()
            .collect())
    }

    async fn insert_next(&self, draft: NewPokemon) -> Result<Pokemon, StoreError> {
        let mut guard = self.write()?;
        let id = PokemonId::allocate(guard.iter().map(|p| p.id).max())?;

        let pokemon = draft.into_pokemon(id);
        pokemon.validate()?;
        guard.push(pokemon.clone());
        Ok(pokemon)
    }

    async fn update(
        &self,
        id: PokemonId,
        patch: &PokemonPatch,
    ) -> Result<Option<Pokemon>, StoreError> {
        patch.validate()?;
        let mut guard = self.write()?;
        let Some(slot) = guard.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        let updated = slot.apply(patch)?;
        *slot = updated.clone();
        Ok(Some(updated))
    }

    async fn delete(&self, id: PokemonId) -> Result<Option<Pokemon>, StoreError> {
        let mut guard = self.write()?;
        Ok(guard
            .iter()
            .position(|p| p.id == id)
            .map(|index| guard.remove(index)))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.read().map(|_| ())
    }
}
