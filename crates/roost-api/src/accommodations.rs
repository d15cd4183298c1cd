//! Handlers for the catalog.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/accommodations` | Whole catalog |
//! | `GET`    | `/accommodations/available` | `?check_in&check_out[&guests]` |
//! | `GET`    | `/accommodations/:id` | 404 if not found |
//! | `POST`   | `/admin/accommodations` | Body: [`NewAccommodation`]; 201 |
//! | `PATCH`  | `/admin/accommodations/:id` | Body: [`AccommodationPatch`] |
//! | `DELETE` | `/admin/accommodations/:id` | 204 |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use roost_core::{
  accommodation::{Accommodation, AccommodationPatch, NewAccommodation},
  booking::AvailabilityQuery,
};

use crate::{ApiState, Backend, error::ApiError};

/// `GET /accommodations`
pub async fn list<S: Backend>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<Accommodation>>, ApiError> {
  Ok(Json(state.catalog.list().await?))
}

/// `GET /accommodations/:id`
pub async fn get_one<S: Backend>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
) -> Result<Json<Accommodation>, ApiError> {
  Ok(Json(state.catalog.get(&id).await?))
}

/// `GET /accommodations/available?check_in=YYYY-MM-DD&check_out=YYYY-MM-DD[&guests=N]`
pub async fn available<S: Backend>(
  State(state): State<ApiState<S>>,
  Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Vec<Accommodation>>, ApiError> {
  Ok(Json(state.bookings.search_available(query).await?))
}

/// `POST /admin/accommodations` returns 201 + the stored accommodation.
pub async fn create<S: Backend>(
  State(state): State<ApiState<S>>,
  Json(body): Json<NewAccommodation>,
) -> Result<impl IntoResponse, ApiError> {
  if body.name.trim().is_empty() {
    return Err(ApiError::BadRequest("name must not be empty".into()));
  }
  let created = state.catalog.create(body).await?;
  Ok((StatusCode::CREATED, Json(created)))
}

/// `PATCH /admin/accommodations/:id`
pub async fn update<S: Backend>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
  Json(patch): Json<AccommodationPatch>,
) -> Result<Json<Accommodation>, ApiError> {
  Ok(Json(state.catalog.update(&id, patch).await?))
}

/// `DELETE /admin/accommodations/:id`
pub async fn remove<S: Backend>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
  state.catalog.remove(&id).await?;
  Ok(StatusCode::NO_CONTENT)
}
