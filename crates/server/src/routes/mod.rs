//! API route handlers
//!
//! Routes are organized by functionality:
//!
//! - `health`: store readiness probe
//! - `pokemons`: paginated listing and single-record CRUD
//! - `search`: case-insensitive name search

pub mod health;
pub mod pokemons;
pub mod search;

use crate::error::ServerError;

/// Liveness text (GET /)
pub async fn hello() -> &'static str {
    "Hello, World!"
}

/// 404 Not Found handler
///
/// Returns a standardized error response for undefined routes.
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
