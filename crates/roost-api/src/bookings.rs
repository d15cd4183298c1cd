//! Handlers for bookings.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/bookings` | Body: [`NewBooking`]; returns 201 + the pending booking |
//! | `GET`  | `/bookings/:id` | 404 if not found |
//! | `GET`  | `/users/:user_id/bookings` | Newest first |
//! | `GET`  | `/admin/bookings` | Every booking, newest first |
//! | `PUT`  | `/admin/bookings/:id/status` | Body: `{"status":"confirmed"}` |
//! | `POST` | `/admin/bookings/:id/approve` | Shorthand for `confirmed` |
//! | `POST` | `/admin/bookings/:id/cancel` | Shorthand for `cancelled` |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use roost_core::booking::{Booking, BookingStatus, NewBooking, Viewer};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiState, Backend, error::ApiError};

/// `POST /bookings`
pub async fn create<S: Backend>(
  State(state): State<ApiState<S>>,
  Json(body): Json<NewBooking>,
) -> Result<impl IntoResponse, ApiError> {
  if body.user_id.trim().is_empty() {
    return Err(ApiError::BadRequest("user_id must not be empty".into()));
  }
  let booking = state.bookings.create_booking(body).await?;
  Ok((StatusCode::CREATED, Json(booking)))
}

/// `GET /bookings/:id`
pub async fn get_one<S: Backend>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Booking>, ApiError> {
  Ok(Json(state.bookings.get_booking(id).await?))
}

/// `GET /users/:user_id/bookings`
pub async fn list_for_user<S: Backend>(
  State(state): State<ApiState<S>>,
  Path(user_id): Path<String>,
) -> Result<Json<Vec<Booking>>, ApiError> {
  let viewer = Viewer::User(user_id);
  Ok(Json(state.bookings.list_bookings(&viewer).await?))
}

/// `GET /admin/bookings`
pub async fn list_all<S: Backend>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<Booking>>, ApiError> {
  Ok(Json(state.bookings.list_bookings(&Viewer::Admin).await?))
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
  pub status: BookingStatus,
}

/// `PUT /admin/bookings/:id/status`, body: `{"status":"confirmed"}`
pub async fn set_status<S: Backend>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<StatusBody>,
) -> Result<Json<Booking>, ApiError> {
  Ok(Json(state.bookings.update_booking_status(id, body.status).await?))
}

/// `POST /admin/bookings/:id/approve`
pub async fn approve<S: Backend>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Booking>, ApiError> {
  Ok(Json(state.bookings.approve(id).await?))
}

/// `POST /admin/bookings/:id/cancel`
pub async fn cancel<S: Backend>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Booking>, ApiError> {
  Ok(Json(state.bookings.cancel(id).await?))
}
