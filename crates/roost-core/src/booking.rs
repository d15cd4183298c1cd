//! Booking records, pricing, and the booking status machine.
//!
//! A booking is written once. After creation the only field that ever changes
//! is [`Booking::status`], and only along the edges allowed by
//! [`BookingStatus::transition`].

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, accommodation::Accommodation};

// ─── Status ──────────────────────────────────────────────────────────────────

/// Lifecycle status of a booking.
///
/// ```text
/// pending ──approve──▶ confirmed
///    │                    │
///    └──cancel──▶ cancelled ◀──cancel──┘
/// ```
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BookingStatus {
  /// Every booking starts here and waits for administrative approval.
  Pending,
  Confirmed,
  /// Terminal.
  Cancelled,
}

/// Outcome of a valid status request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
  /// The booking is already in the requested state; nothing to write.
  Unchanged,
  Changed {
    from: BookingStatus,
    to:   BookingStatus,
  },
}

impl BookingStatus {
  /// The status assigned by [`crate::service::BookingEngine::create_booking`].
  pub const INITIAL: Self = Self::Pending;

  pub fn is_terminal(self) -> bool { matches!(self, Self::Cancelled) }

  /// Validate a request to move from `self` to `to`.
  ///
  /// Requesting the current state is an idempotent no-op. Nothing moves into
  /// `pending`, and nothing leaves `cancelled`.
  pub fn transition(self, to: Self) -> Result<StatusChange> {
    use BookingStatus::*;

    match (self, to) {
      (from, to) if from == to => Ok(StatusChange::Unchanged),
      (from, to) if from.is_terminal() => Err(Error::IllegalTransition { from, to }),
      (Pending, Confirmed) | (Pending, Cancelled) | (Confirmed, Cancelled) => {
        Ok(StatusChange::Changed { from: self, to })
      }
      (from, to) => Err(Error::IllegalTransition { from, to }),
    }
  }
}

// ─── Pricing ─────────────────────────────────────────────────────────────────

/// Billable nights between two dates: the whole-day distance, never less
/// than one.
pub fn nights(check_in: NaiveDate, check_out: NaiveDate) -> u32 {
  let days = (check_out - check_in).num_days().unsigned_abs();
  u32::try_from(days).unwrap_or(u32::MAX).max(1)
}

/// `price_per_night × nights`, or [`Error::PriceOverflow`] if the product
/// does not fit in a [`Decimal`].
pub fn total_price(price_per_night: Decimal, nights: u32) -> Result<Decimal> {
  price_per_night
    .checked_mul(Decimal::from(nights))
    .ok_or(Error::PriceOverflow { price_per_night, nights })
}

/// Reject empty or inverted stays and empty parties.
pub fn validate_stay(
  check_in: NaiveDate,
  check_out: NaiveDate,
  guests: u32,
) -> Result<()> {
  if check_out <= check_in {
    return Err(Error::InvalidDateRange { check_in, check_out });
  }
  if guests < 1 {
    return Err(Error::InvalidGuestCount(guests));
  }
  Ok(())
}

// ─── Booking ─────────────────────────────────────────────────────────────────

/// A reservation of one accommodation for a date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
  pub booking_id:          Uuid,
  /// A plain value; the accommodation may since have been removed.
  pub accommodation_id:    String,
  /// Snapshot of the accommodation's name when the booking was made. Not a
  /// live reference: later catalog edits do not reach existing bookings.
  pub accommodation_name:  String,
  /// Snapshot of the accommodation's primary image, same rules as the name.
  pub accommodation_image: Option<String>,
  pub user_id:             String,
  pub check_in:            NaiveDate,
  /// Strictly after `check_in`.
  pub check_out:           NaiveDate,
  /// At least 1.
  pub number_of_guests:    u32,
  /// `price_per_night × nights` at booking time.
  pub total_price:         Decimal,
  pub status:              BookingStatus,
  /// Server-assigned; never changes.
  pub booked_at:           DateTime<Utc>,
}

impl Booking {
  pub fn nights(&self) -> u32 { nights(self.check_in, self.check_out) }
}

// ─── NewBooking ──────────────────────────────────────────────────────────────

/// Input to [`crate::service::BookingEngine::create_booking`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBooking {
  pub accommodation_id: String,
  pub user_id:          String,
  pub check_in:         NaiveDate,
  pub check_out:        NaiveDate,
  pub number_of_guests: u32,
}

impl NewBooking {
  pub fn validate(&self) -> Result<()> {
    validate_stay(self.check_in, self.check_out, self.number_of_guests)
  }

  /// Price the stay against `accommodation` and snapshot its display fields.
  ///
  /// Callers must have run [`NewBooking::validate`] first.
  pub fn into_booking(
    self,
    accommodation: &Accommodation,
    booked_at: DateTime<Utc>,
  ) -> Result<Booking> {
    let nights = nights(self.check_in, self.check_out);
    let total_price = total_price(accommodation.price_per_night, nights)?;
    Ok(Booking {
      booking_id: Uuid::new_v4(),
      accommodation_id: self.accommodation_id,
      accommodation_name: accommodation.name.clone(),
      accommodation_image: accommodation.primary_image().map(str::to_owned),
      user_id: self.user_id,
      check_in: self.check_in,
      check_out: self.check_out,
      number_of_guests: self.number_of_guests,
      total_price,
      status: BookingStatus::INITIAL,
      booked_at,
    })
  }
}

// ─── Queries ─────────────────────────────────────────────────────────────────

/// Who is asking for a list of bookings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Viewer {
  /// Sees only bookings made under this user id.
  User(String),
  /// Sees every booking in the ledger.
  Admin,
}

impl Viewer {
  /// The owner filter to apply, if any.
  pub fn owner(&self) -> Option<&str> {
    match self {
      Self::User(id) => Some(id),
      Self::Admin => None,
    }
  }
}

/// Parameters for [`crate::service::BookingEngine::search_available`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AvailabilityQuery {
  pub check_in:  NaiveDate,
  pub check_out: NaiveDate,
  #[serde(default = "one_guest")]
  pub guests:    u32,
}

fn one_guest() -> u32 { 1 }

#[cfg(test)]
mod tests {
  use super::*;

  fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  #[test]
  fn nights_counts_whole_days() {
    assert_eq!(nights(date(2024, 6, 1), date(2024, 6, 3)), 2);
    assert_eq!(nights(date(2024, 6, 1), date(2024, 6, 2)), 1);
    assert_eq!(nights(date(2024, 2, 28), date(2024, 3, 1)), 2);
  }

  #[test]
  fn nights_is_at_least_one() {
    assert_eq!(nights(date(2024, 6, 1), date(2024, 6, 1)), 1);
  }

  #[test]
  fn nights_uses_absolute_distance() {
    assert_eq!(nights(date(2024, 6, 3), date(2024, 6, 1)), 2);
  }

  #[test]
  fn total_is_price_times_nights() {
    assert_eq!(total_price(Decimal::new(150, 0), 2).unwrap(), Decimal::new(300, 0));
    assert_eq!(
      total_price(Decimal::new(9999, 2), 3).unwrap(),
      Decimal::new(29997, 2)
    );
  }

  #[test]
  fn total_that_overflows_is_an_error() {
    let huge = Decimal::from_i128_with_scale(10_i128.pow(28), 0);
    assert!(matches!(
      total_price(huge, 61),
      Err(Error::PriceOverflow { nights: 61, .. })
    ));
    assert!(total_price(huge, 1).is_ok());
  }

  #[test]
  fn equal_dates_are_an_invalid_range() {
    let err = validate_stay(date(2024, 6, 1), date(2024, 6, 1), 1).unwrap_err();
    assert!(matches!(err, Error::InvalidDateRange { .. }));
  }

  #[test]
  fn inverted_dates_are_an_invalid_range() {
    let err = validate_stay(date(2024, 6, 3), date(2024, 6, 1), 2).unwrap_err();
    assert!(matches!(err, Error::InvalidDateRange { .. }));
  }

  #[test]
  fn zero_guests_is_invalid() {
    let err = validate_stay(date(2024, 6, 1), date(2024, 6, 2), 0).unwrap_err();
    assert!(matches!(err, Error::InvalidGuestCount(0)));
  }

  #[test]
  fn forward_transitions_are_allowed() {
    use BookingStatus::*;
    assert_eq!(
      Pending.transition(Confirmed).unwrap(),
      StatusChange::Changed { from: Pending, to: Confirmed }
    );
    assert!(Pending.transition(Cancelled).is_ok());
    assert!(Confirmed.transition(Cancelled).is_ok());
  }

  #[test]
  fn cancelled_is_terminal() {
    use BookingStatus::*;
    assert!(matches!(
      Cancelled.transition(Confirmed),
      Err(Error::IllegalTransition { from: Cancelled, to: Confirmed })
    ));
    assert!(Cancelled.transition(Pending).is_err());
  }

  #[test]
  fn nothing_moves_back_to_pending() {
    assert!(BookingStatus::Confirmed.transition(BookingStatus::Pending).is_err());
  }

  #[test]
  fn same_state_is_a_no_op() {
    for s in [
      BookingStatus::Pending,
      BookingStatus::Confirmed,
      BookingStatus::Cancelled,
    ] {
      assert_eq!(s.transition(s).unwrap(), StatusChange::Unchanged);
    }
  }

  #[test]
  fn status_text_form_is_lowercase() {
    assert_eq!(BookingStatus::Confirmed.to_string(), "confirmed");
    assert_eq!(
      "cancelled".parse::<BookingStatus>().unwrap(),
      BookingStatus::Cancelled
    );
    assert!("CONFIRMED".parse::<BookingStatus>().is_err());
  }
}
