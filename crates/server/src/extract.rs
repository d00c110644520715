//! Extractors whose rejections use the API error body.

use crate::error::ServerError;
use axum::extract::{FromRequest, FromRequestParts, Query};
use axum::Json;

/// JSON request body; malformed input is a `400` with `{ "error": ... }`.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ServerError))]
pub struct ApiJson<T>(pub T);

/// Query string; malformed input is a `400` with `{ "error": ... }`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(Query), rejection(ServerError))]
pub struct ApiQuery<T>(pub T);
