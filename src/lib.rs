//! # Pokedex
//!
//! Domain library behind the Pokedex HTTP API: the pokemon record model, the
//! listing pagination window, and the document stores that persist records.
//!
//! ## Core Features
//!
//! - **Semi-structured records**: [`Pokemon`] types the service-owned `id`
//!   and the searchable `name`; every other attribute is an open JSON map
//!   that is stored and returned untouched.
//! - **Pluggable stores**: all persistence goes through the [`PokemonStore`]
//!   trait. Out of the box:
//!   - [`InMemoryStore`], an insertion-ordered store for tests and local runs.
//!   - `MongoStore`, backed by MongoDB (enabled via the `backend-mongo`
//!     feature, on by default).
//! - **Safe id allocation**: [`PokemonStore::insert_next`] hands out
//!   `max(id) + 1` without duplicates under concurrent creates.
//!
//! ## Example Usage
//!
//! ```
//! use pokedex::{NewPokemon, PageRequest, Pokedex, PokemonName, StoreConfig};
//!
//! # tokio_test_block(async {
//! let store = StoreConfig::in_memory().open().await.unwrap();
//! let pokedex = Pokedex::new(store);
//!
//! let created = pokedex
//!     .create(NewPokemon::new(PokemonName::new("Bulbasaur", "Bulbizarre")))
//!     .await
//!     .unwrap();
//! assert_eq!(created.id.get(), 1);
//!
//! let page = pokedex.list_page(PageRequest::default()).await.unwrap();
//! assert_eq!(page.total_pokemons, 1);
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

mod backend;
mod error;
mod model;
mod page;
mod pokedex;

#[cfg(feature = "backend-mongo")]
pub use backend::MongoStore;
pub use backend::{InMemoryStore, PokemonStore, StoreConfig};
pub use error::StoreError;
pub use model::{NewPokemon, ParseIdError, Pokemon, PokemonId, PokemonName, PokemonPatch};
pub use page::{total_pages, PageRequest, PokemonPage, PAGE_SIZE};
pub use pokedex::Pokedex;
