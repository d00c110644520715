//! Pokedex Server - HTTP REST API over the pokemon collection
//!
//! This crate exposes CRUD and search operations over a single document
//! store collection. Handlers validate and shape input, delegate to the
//! [`pokedex::Pokedex`] facade, and shape JSON responses.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # API Endpoints
//!
//! - `GET /` - Liveness text
//! - `GET /health` - Store readiness
//! - `GET /pokemons?page=N` - Paginated listing, 20 per page
//! - `GET /pokemons/{id}` - Fetch one pokemon
//! - `POST /pokemons` - Create a pokemon (id assigned by the store)
//! - `PUT /pokemons/{id}` - Replace supplied fields of a pokemon
//! - `DELETE /pokemons/{id}` - Delete a pokemon
//! - `GET /search?name=S` - Case-insensitive name search
//! - `GET /assets/*` - Static files
//!
//! Every error is returned as `{ "error": "<message>" }`.

pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::ServerState;
