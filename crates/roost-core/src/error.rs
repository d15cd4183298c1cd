//! Error types for `roost-core`.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::booking::BookingStatus;

#[derive(Debug, Error)]
pub enum Error {
  #[error("accommodation not found: {0}")]
  AccommodationNotFound(String),

  #[error("booking not found: {0}")]
  BookingNotFound(Uuid),

  #[error(
    "check-out date {check_out} must be after check-in date {check_in}"
  )]
  InvalidDateRange {
    check_in:  NaiveDate,
    check_out: NaiveDate,
  },

  #[error("number of guests must be at least 1, got {0}")]
  InvalidGuestCount(u32),

  #[error("price per night must be positive, got {0}")]
  InvalidPrice(Decimal),

  #[error("total for {nights} nights at {price_per_night} per night is too large")]
  PriceOverflow {
    price_per_night: Decimal,
    nights:          u32,
  },

  #[error("cannot move a booking from {from} to {to}")]
  IllegalTransition {
    from: BookingStatus,
    to:   BookingStatus,
  },

  #[error(
    "accommodation {accommodation_id} is already booked for these dates \
     (booking {conflicting})"
  )]
  Unavailable {
    accommodation_id: String,
    conflicting:      Uuid,
  },

  /// The booking's status changed between read and write.
  #[error("booking {0} was modified concurrently")]
  StatusConflict(Uuid),

  #[error("accommodation id already taken: {0}")]
  DuplicateAccommodation(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Box a backend error into [`Error::Store`].
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
