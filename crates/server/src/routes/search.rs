use crate::error::{ServerError, ServerResult};
use crate::extract::ApiQuery;
use crate::state::ServerState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;

/// Query parameters for name search
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    /// Name fragment, matched against english and french names
    #[serde(default)]
    pub name: Option<String>,
}

/// Search pokemons by partial, case-insensitive name
pub async fn search_pokemons(
    State(state): State<Arc<ServerState>>,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> ServerResult<impl IntoResponse> {
    let name = query
        .name
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ServerError::BadRequest("Name parameter is required".to_string()))?;

    let pokemons = state.pokedex.search(&name).await?;
    Ok(Json(pokemons))
}
