//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use roost_core::Error as CoreError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Domain(#[from] CoreError),

  #[error("bad request: {0}")]
  BadRequest(String),
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Domain(e) => match e {
        CoreError::AccommodationNotFound(_) | CoreError::BookingNotFound(_) => {
          StatusCode::NOT_FOUND
        }
        CoreError::InvalidDateRange { .. }
        | CoreError::InvalidGuestCount(_)
        | CoreError::InvalidPrice(_)
        | CoreError::PriceOverflow { .. } => StatusCode::BAD_REQUEST,
        CoreError::IllegalTransition { .. }
        | CoreError::Unavailable { .. }
        | CoreError::StatusConflict(_)
        | CoreError::DuplicateAccommodation(_) => StatusCode::CONFLICT,
        CoreError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
      },
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    }
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}
