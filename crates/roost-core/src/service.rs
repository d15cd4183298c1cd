//! Services that enforce the domain rules on top of the storage traits.
//!
//! - [`CatalogService`]: accommodation CRUD with the positive-price rule.
//! - [`BookingEngine`]: booking creation, pricing, status transitions,
//!   availability search.
//! - [`Favorites`]: per-user favorites, resolved against the catalog.
//!
//! Each service holds an `Arc` to a single backend that implements the
//! traits it needs; cloning a service is cheap.

use std::{collections::HashSet, sync::Arc};

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
  Error, Result,
  accommodation::{Accommodation, AccommodationPatch, NewAccommodation},
  booking::{
    AvailabilityQuery, Booking, BookingStatus, NewBooking, StatusChange, Viewer,
    validate_stay,
  },
  store::{BookingLedger, Catalog, FavoritesIndex, Reservation},
};

// ─── Catalog ─────────────────────────────────────────────────────────────────

pub struct CatalogService<S> {
  store: Arc<S>,
}

impl<S> Clone for CatalogService<S> {
  fn clone(&self) -> Self { Self { store: Arc::clone(&self.store) } }
}

impl<S: Catalog> CatalogService<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  pub async fn get(&self, id: &str) -> Result<Accommodation> {
    self
      .store
      .get_accommodation(id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::AccommodationNotFound(id.to_owned()))
  }

  pub async fn list(&self) -> Result<Vec<Accommodation>> {
    self.store.list_accommodations().await.map_err(Error::store)
  }

  pub async fn create(&self, input: NewAccommodation) -> Result<Accommodation> {
    input.validate()?;
    let created = self
      .store
      .add_accommodation(input)
      .await
      .map_err(Error::store)?;
    info!(id = %created.id, name = %created.name, "accommodation created");
    Ok(created)
  }

  /// Load a fully-formed record under its own id; fails with
  /// [`Error::DuplicateAccommodation`] if the id is taken.
  pub async fn import(&self, accommodation: Accommodation) -> Result<Accommodation> {
    accommodation.validate()?;
    let id = accommodation.id.clone();
    self
      .store
      .import_accommodation(accommodation)
      .await
      .map_err(Error::store)?
      .ok_or(Error::DuplicateAccommodation(id))
  }

  pub async fn update(
    &self,
    id: &str,
    patch: AccommodationPatch,
  ) -> Result<Accommodation> {
    patch.validate()?;
    let updated = self
      .store
      .update_accommodation(id.to_owned(), patch)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::AccommodationNotFound(id.to_owned()))?;
    info!(id, "accommodation updated");
    Ok(updated)
  }

  pub async fn remove(&self, id: &str) -> Result<()> {
    let removed = self
      .store
      .remove_accommodation(id.to_owned())
      .await
      .map_err(Error::store)?;
    if !removed {
      return Err(Error::AccommodationNotFound(id.to_owned()));
    }
    info!(id, "accommodation removed");
    Ok(())
  }
}

// ─── Bookings ────────────────────────────────────────────────────────────────

/// Creates bookings and drives them through their status machine.
pub struct BookingEngine<S> {
  store: Arc<S>,
}

impl<S> Clone for BookingEngine<S> {
  fn clone(&self) -> Self { Self { store: Arc::clone(&self.store) } }
}

impl<S: Catalog + BookingLedger> BookingEngine<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// Validate, price, and append a booking in the
  /// [`BookingStatus::INITIAL`] state.
  ///
  /// Either the booking is appended in full or nothing is written.
  pub async fn create_booking(&self, input: NewBooking) -> Result<Booking> {
    debug!(?input, "creating booking");

    let accommodation = self
      .store
      .get_accommodation(&input.accommodation_id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::AccommodationNotFound(input.accommodation_id.clone()))
      .inspect_err(|e| warn!(error = %e, "booking rejected"))?;

    input
      .validate()
      .inspect_err(|e| warn!(error = %e, "booking rejected"))?;

    let booking = input
      .into_booking(&accommodation, Utc::now())
      .inspect_err(|e| warn!(error = %e, "booking rejected"))?;
    let accommodation_id = booking.accommodation_id.clone();

    match self
      .store
      .insert_booking(booking)
      .await
      .map_err(Error::store)?
    {
      Reservation::Inserted(booking) => {
        info!(
          booking_id = %booking.booking_id,
          accommodation_id = %booking.accommodation_id,
          nights = booking.nights(),
          total = %booking.total_price,
          "booking created",
        );
        Ok(booking)
      }
      Reservation::Conflict { existing } => {
        warn!(%accommodation_id, %existing, "booking rejected: dates taken");
        Err(Error::Unavailable { accommodation_id, conflicting: existing })
      }
    }
  }

  pub async fn get_booking(&self, id: Uuid) -> Result<Booking> {
    self
      .store
      .get_booking(id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::BookingNotFound(id))
  }

  /// Move booking `id` to `to`. Only the status field changes.
  pub async fn update_booking_status(
    &self,
    id: Uuid,
    to: BookingStatus,
  ) -> Result<Booking> {
    let current = self.get_booking(id).await?;

    match current.status.transition(to)? {
      StatusChange::Unchanged => Ok(current),
      StatusChange::Changed { from, to } => {
        let updated = self
          .store
          .compare_and_set_status(id, from, to)
          .await
          .map_err(Error::store)?
          .ok_or(Error::StatusConflict(id))?;
        info!(booking_id = %id, %from, %to, "booking status changed");
        Ok(updated)
      }
    }
  }

  pub async fn approve(&self, id: Uuid) -> Result<Booking> {
    self.update_booking_status(id, BookingStatus::Confirmed).await
  }

  pub async fn cancel(&self, id: Uuid) -> Result<Booking> {
    self.update_booking_status(id, BookingStatus::Cancelled).await
  }

  /// Bookings visible to `viewer`, most recently booked first.
  pub async fn list_bookings(&self, viewer: &Viewer) -> Result<Vec<Booking>> {
    self
      .store
      .list_bookings(viewer.owner())
      .await
      .map_err(Error::store)
  }

  /// Accommodations that could take a booking for `query`'s dates.
  pub async fn search_available(
    &self,
    query: AvailabilityQuery,
  ) -> Result<Vec<Accommodation>> {
    validate_stay(query.check_in, query.check_out, query.guests)?;

    let taken: HashSet<String> = self
      .store
      .booked_accommodations(query.check_in, query.check_out)
      .await
      .map_err(Error::store)?
      .into_iter()
      .collect();

    let mut all = self
      .store
      .list_accommodations()
      .await
      .map_err(Error::store)?;
    all.retain(|acc| !taken.contains(&acc.id));

    debug!(?query, available = all.len(), "availability search");
    Ok(all)
  }
}

// ─── Favorites ───────────────────────────────────────────────────────────────

pub struct Favorites<S> {
  store: Arc<S>,
}

impl<S> Clone for Favorites<S> {
  fn clone(&self) -> Self { Self { store: Arc::clone(&self.store) } }
}

impl<S: Catalog + FavoritesIndex> Favorites<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// Idempotent. Returns `true` if the edge is new.
  pub async fn add(&self, user_id: &str, accommodation_id: &str) -> Result<bool> {
    let added = self
      .store
      .add_favorite(user_id.to_owned(), accommodation_id.to_owned())
      .await
      .map_err(Error::store)?;
    debug!(user_id, accommodation_id, added, "favorite added");
    Ok(added)
  }

  /// Idempotent. Returns `true` if an edge was removed.
  pub async fn remove(
    &self,
    user_id: &str,
    accommodation_id: &str,
  ) -> Result<bool> {
    let removed = self
      .store
      .remove_favorite(user_id.to_owned(), accommodation_id.to_owned())
      .await
      .map_err(Error::store)?;
    debug!(user_id, accommodation_id, removed, "favorite removed");
    Ok(removed)
  }

  pub async fn contains(
    &self,
    user_id: &str,
    accommodation_id: &str,
  ) -> Result<bool> {
    self
      .store
      .is_favorite(user_id, accommodation_id)
      .await
      .map_err(Error::store)
  }

  /// Flip membership and return the new state.
  pub async fn toggle(
    &self,
    user_id: &str,
    accommodation_id: &str,
  ) -> Result<bool> {
    let now_favorite = self
      .store
      .toggle_favorite(user_id.to_owned(), accommodation_id.to_owned())
      .await
      .map_err(Error::store)?;
    debug!(user_id, accommodation_id, now_favorite, "favorite toggled");
    Ok(now_favorite)
  }

  /// Favorite accommodation ids in the order they were added.
  pub async fn list_ids(&self, user_id: &str) -> Result<Vec<String>> {
    let edges = self
      .store
      .list_favorites(user_id)
      .await
      .map_err(Error::store)?;
    Ok(edges.into_iter().map(|e| e.accommodation_id).collect())
  }

  /// Resolve favorites against the catalog. Ids that no longer resolve are
  /// skipped.
  pub async fn list_accommodations(
    &self,
    user_id: &str,
  ) -> Result<Vec<Accommodation>> {
    let ids = self.list_ids(user_id).await?;
    let mut resolved = Vec::with_capacity(ids.len());
    for id in &ids {
      match self.store.get_accommodation(id).await.map_err(Error::store)? {
        Some(acc) => resolved.push(acc),
        None => debug!(user_id, accommodation_id = %id, "dangling favorite"),
      }
    }
    Ok(resolved)
  }
}
