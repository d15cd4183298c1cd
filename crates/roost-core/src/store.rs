//! Storage traits for the catalog, the booking ledger, and the favorites
//! index.
//!
//! The traits are implemented by storage backends (e.g.
//! `roost-store-sqlite`). The services in [`crate::service`] and the HTTP
//! layer depend on these abstractions, not on any concrete backend.
//!
//! All methods return `Send` futures so the traits can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
  accommodation::{Accommodation, AccommodationPatch, NewAccommodation},
  booking::{Booking, BookingStatus},
  favorite::FavoriteEdge,
};

// ─── Base ────────────────────────────────────────────────────────────────────

/// The error type shared by every storage trait of a backend.
pub trait Store: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;
}

// ─── Catalog ─────────────────────────────────────────────────────────────────

pub trait Catalog: Store {
  /// Retrieve an accommodation by id. Returns `None` if not found.
  fn get_accommodation<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<Accommodation>, Self::Error>> + Send + 'a;

  /// List every accommodation in insertion order.
  fn list_accommodations(
    &self,
  ) -> impl Future<Output = Result<Vec<Accommodation>, Self::Error>> + Send + '_;

  /// Persist a new accommodation under a store-generated id.
  fn add_accommodation(
    &self,
    input: NewAccommodation,
  ) -> impl Future<Output = Result<Accommodation, Self::Error>> + Send + '_;

  /// Persist a fully-formed record under its own id, rating and review count
  /// included.
  ///
  /// Used to load reference data with stable ids. Returns `None` without
  /// writing if the id is already taken; the check and the write are one
  /// atomic step.
  fn import_accommodation(
    &self,
    accommodation: Accommodation,
  ) -> impl Future<Output = Result<Option<Accommodation>, Self::Error>> + Send + '_;

  /// Apply `patch` and return the updated record, or `None` if `id` is
  /// unknown.
  fn update_accommodation(
    &self,
    id: String,
    patch: AccommodationPatch,
  ) -> impl Future<Output = Result<Option<Accommodation>, Self::Error>> + Send + '_;

  /// Delete an accommodation. Returns `false` if `id` was unknown.
  ///
  /// Bookings and favorites that reference the id are left alone.
  fn remove_accommodation(
    &self,
    id: String,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}

// ─── Ledger ──────────────────────────────────────────────────────────────────

/// Result of [`BookingLedger::insert_booking`].
#[derive(Debug, Clone)]
pub enum Reservation {
  Inserted(Booking),
  /// An existing booking that still occupies its dates overlaps the new one;
  /// nothing was written.
  Conflict { existing: Uuid },
}

/// The append-only booking ledger.
///
/// Bookings are never deleted. The only mutation is a status change, and
/// that is a compare-and-set on the previous status.
pub trait BookingLedger: Store {
  /// Append `booking` unless it overlaps another booking for the same
  /// accommodation whose status still occupies its dates.
  ///
  /// The overlap check and the append must be atomic with respect to every
  /// other ledger write.
  fn insert_booking(
    &self,
    booking: Booking,
  ) -> impl Future<Output = Result<Reservation, Self::Error>> + Send + '_;

  /// Retrieve a booking by id. Returns `None` if not found.
  fn get_booking(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Booking>, Self::Error>> + Send + '_;

  /// Set the status of booking `id` to `to` if it is currently `from`.
  ///
  /// Returns the updated booking, or `None` if no booking matched both the id
  /// and the expected status.
  fn compare_and_set_status(
    &self,
    id: Uuid,
    from: BookingStatus,
    to: BookingStatus,
  ) -> impl Future<Output = Result<Option<Booking>, Self::Error>> + Send + '_;

  /// List bookings, most recently booked first. `owner` restricts the list to
  /// a single user.
  fn list_bookings<'a>(
    &'a self,
    owner: Option<&'a str>,
  ) -> impl Future<Output = Result<Vec<Booking>, Self::Error>> + Send + 'a;

  /// Ids of accommodations with at least one date-occupying booking that
  /// overlaps `[check_in, check_out)`.
  fn booked_accommodations(
    &self,
    check_in: NaiveDate,
    check_out: NaiveDate,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;
}

// ─── Favorites ───────────────────────────────────────────────────────────────

pub trait FavoritesIndex: Store {
  /// Record the edge. Returns `false` if it already existed.
  fn add_favorite(
    &self,
    user_id: String,
    accommodation_id: String,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Drop the edge. Returns `false` if there was nothing to drop.
  fn remove_favorite(
    &self,
    user_id: String,
    accommodation_id: String,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Flip the edge and return whether it exists afterwards. The read and
  /// the write are one atomic step.
  fn toggle_favorite(
    &self,
    user_id: String,
    accommodation_id: String,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn is_favorite<'a>(
    &'a self,
    user_id: &'a str,
    accommodation_id: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// A user's edges in the order they were added.
  fn list_favorites<'a>(
    &'a self,
    user_id: &'a str,
  ) -> impl Future<Output = Result<Vec<FavoriteEdge>, Self::Error>> + Send + 'a;
}
