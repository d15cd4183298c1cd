//! Handlers for `/users/:user_id/favorites`.

use axum::{
  Json,
  extract::{Path, State},
};
use roost_core::accommodation::Accommodation;
use serde::Serialize;

use crate::{ApiState, Backend, error::ApiError};

/// Membership of one accommodation in a user's favorites.
#[derive(Debug, Serialize)]
pub struct Membership {
  pub favorite: bool,
}

/// `GET /users/:user_id/favorites`: resolved accommodations.
pub async fn list<S: Backend>(
  State(state): State<ApiState<S>>,
  Path(user_id): Path<String>,
) -> Result<Json<Vec<Accommodation>>, ApiError> {
  Ok(Json(state.favorites.list_accommodations(&user_id).await?))
}

/// `GET /users/:user_id/favorites/ids`
pub async fn list_ids<S: Backend>(
  State(state): State<ApiState<S>>,
  Path(user_id): Path<String>,
) -> Result<Json<Vec<String>>, ApiError> {
  Ok(Json(state.favorites.list_ids(&user_id).await?))
}

/// `GET /users/:user_id/favorites/:accommodation_id`
pub async fn check<S: Backend>(
  State(state): State<ApiState<S>>,
  Path((user_id, accommodation_id)): Path<(String, String)>,
) -> Result<Json<Membership>, ApiError> {
  let favorite = state.favorites.contains(&user_id, &accommodation_id).await?;
  Ok(Json(Membership { favorite }))
}

/// `PUT /users/:user_id/favorites/:accommodation_id`, idempotent.
pub async fn add<S: Backend>(
  State(state): State<ApiState<S>>,
  Path((user_id, accommodation_id)): Path<(String, String)>,
) -> Result<Json<Membership>, ApiError> {
  state.favorites.add(&user_id, &accommodation_id).await?;
  Ok(Json(Membership { favorite: true }))
}

/// `DELETE /users/:user_id/favorites/:accommodation_id`, idempotent.
pub async fn remove<S: Backend>(
  State(state): State<ApiState<S>>,
  Path((user_id, accommodation_id)): Path<(String, String)>,
) -> Result<Json<Membership>, ApiError> {
  state.favorites.remove(&user_id, &accommodation_id).await?;
  Ok(Json(Membership { favorite: false }))
}

/// `POST /users/:user_id/favorites/:accommodation_id/toggle`
pub async fn toggle<S: Backend>(
  State(state): State<ApiState<S>>,
  Path((user_id, accommodation_id)): Path<(String, String)>,
) -> Result<Json<Membership>, ApiError> {
  let favorite = state.favorites.toggle(&user_id, &accommodation_id).await?;
  Ok(Json(Membership { favorite }))
}
