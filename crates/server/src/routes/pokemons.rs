use crate::error::{ServerError, ServerResult};
use crate::extract::{ApiJson, ApiQuery};
use crate::state::ServerState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use pokedex::{NewPokemon, PageRequest, Pokemon, PokemonId, PokemonPatch};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Response from a delete
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
    pub pokemon: Pokemon,
}

/// List pokemons, 20 per page. The first `page` parameter wins; anything but
/// a positive integer means page 1.
pub async fn list_pokemons(
    State(state): State<Arc<ServerState>>,
    ApiQuery(params): ApiQuery<Vec<(String, String)>>,
) -> ServerResult<impl IntoResponse> {
    let page = params
        .iter()
        .find(|(key, _)| key == "page")
        .map(|(_, value)| value.as_str());
    let request = PageRequest::parse(page);
    let page = state.pokedex.list_page(request).await?;
    Ok(Json(page))
}

/// Fetch one pokemon by its domain id
pub async fn get_pokemon(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> ServerResult<impl IntoResponse> {
    let id: PokemonId = id.parse()?;
    match state.pokedex.get(id).await? {
        Some(pokemon) => Ok(Json(pokemon)),
        None => Err(ServerError::PokemonNotFound),
    }
}

/// Create a pokemon; the id is assigned by the store
pub async fn create_pokemon(
    State(state): State<Arc<ServerState>>,
    ApiJson(draft): ApiJson<NewPokemon>,
) -> ServerResult<impl IntoResponse> {
    let pokemon = state
        .pokedex
        .create(draft)
        .await
        .map_err(ServerError::rejected_write)?;

    tracing::info!(id = %pokemon.id, name = %pokemon.name.english, "pokemon created");
    Ok((StatusCode::CREATED, Json(pokemon)))
}

/// Replace the supplied top-level fields of a pokemon
pub async fn update_pokemon(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<PokemonPatch>,
) -> ServerResult<impl IntoResponse> {
    let id: PokemonId = id.parse()?;
    let updated = state
        .pokedex
        .update(id, &patch)
        .await
        .map_err(ServerError::rejected_write)?;

    match updated {
        Some(pokemon) => Ok(Json(pokemon)),
        None => Err(ServerError::PokemonNotFound),
    }
}

/// Delete a pokemon and echo it back
pub async fn delete_pokemon(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> ServerResult<impl IntoResponse> {
    let id: PokemonId = id.parse()?;
    match state.pokedex.delete(id).await? {
        Some(pokemon) => {
            tracing::info!(%id, "pokemon deleted");
            Ok(Json(DeleteResponse {
                message: "Pokemon deleted successfully".to_string(),
                pokemon,
            }))
        }
        None => Err(ServerError::PokemonNotFound),
    }
}
