//! Integration tests for `SqliteStore` and the `roost-core` services against
//! an in-memory database.

use std::sync::Arc;

use chrono::NaiveDate;
use roost_core::{
  Error as CoreError,
  accommodation::{AccommodationPatch, Location, NewAccommodation},
  booking::{AvailabilityQuery, BookingStatus, NewBooking, Viewer},
  service::{BookingEngine, CatalogService, Favorites},
  store::{BookingLedger, Catalog, FavoritesIndex, Reservation},
};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn apartment() -> NewAccommodation {
  NewAccommodation {
    name:            "Cozy Downtown Apartment".into(),
    description:     "Central and charming.".into(),
    location:        Location { lat: 34.0522, lng: -118.2437 },
    price_per_night: Decimal::new(150, 0),
    image_urls:      vec!["/assets/lounge.png".into(), "/assets/kitchen.png".into()],
    kind:            "Apartment".into(),
    amenities:       vec!["WiFi".into(), "Kitchen".into()],
  }
}

fn stay(accommodation_id: &str, user_id: &str, from: NaiveDate, to: NaiveDate) -> NewBooking {
  NewBooking {
    accommodation_id: accommodation_id.into(),
    user_id:          user_id.into(),
    check_in:         from,
    check_out:        to,
    number_of_guests: 2,
  }
}

/// A store with accommodation `A1` at 150/night, plus an engine over it.
async fn engine() -> (Arc<SqliteStore>, BookingEngine<SqliteStore>) {
  let s = Arc::new(store().await);
  s.import_accommodation(apartment().into_accommodation("A1".into())).await.unwrap();
  (s.clone(), BookingEngine::new(s))
}

// ─── Catalog ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_accommodation() {
  let s = store().await;

  let acc = s.add_accommodation(apartment()).await.unwrap();
  assert!(!acc.id.is_empty());
  assert_eq!(acc.rating, 0.0);
  assert_eq!(acc.reviews_count, 0);

  let fetched = s.get_accommodation(&acc.id).await.unwrap().unwrap();
  assert_eq!(fetched, acc);
  assert_eq!(fetched.primary_image(), Some("/assets/lounge.png"));
}

#[tokio::test]
async fn get_accommodation_missing_returns_none() {
  let s = store().await;
  assert!(s.get_accommodation("nope").await.unwrap().is_none());
}

#[tokio::test]
async fn list_accommodations_in_insertion_order() {
  let s = store().await;
  for id in ["3", "1", "2"] {
    s.import_accommodation(apartment().into_accommodation(id.into())).await.unwrap();
  }

  let ids: Vec<_> = s
    .list_accommodations()
    .await
    .unwrap()
    .into_iter()
    .map(|a| a.id)
    .collect();
  assert_eq!(ids, ["3", "1", "2"]);
}

#[tokio::test]
async fn import_with_taken_id_writes_nothing() {
  let s = store().await;
  let first = s
    .import_accommodation(apartment().into_accommodation("1".into()))
    .await
    .unwrap();
  assert!(first.is_some());

  let mut second = apartment().into_accommodation("1".into());
  second.name = "Impostor".into();
  assert!(s.import_accommodation(second).await.unwrap().is_none());
  assert_eq!(s.get_accommodation("1").await.unwrap().unwrap().name, "Cozy Downtown Apartment");
}

#[tokio::test]
async fn import_keeps_rating_and_reviews() {
  let s = store().await;
  let mut acc = apartment().into_accommodation("1".into());
  acc.rating = 4.8;
  acc.reviews_count = 124;
  s.import_accommodation(acc).await.unwrap();

  let got = s.get_accommodation("1").await.unwrap().unwrap();
  assert_eq!(got.reviews_count, 124);
  assert!((got.rating - 4.8).abs() < 1e-6);
}

#[tokio::test]
async fn update_accommodation_patches_only_given_fields() {
  let s = store().await;
  let acc = s.add_accommodation(apartment()).await.unwrap();

  let updated = s
    .update_accommodation(acc.id.clone(), AccommodationPatch {
      price_per_night: Some(Decimal::new(17550, 2)),
      amenities: Some(vec!["Pool".into()]),
      ..Default::default()
    })
    .await
    .unwrap()
    .unwrap();

  assert_eq!(updated.price_per_night, Decimal::new(17550, 2));
  assert_eq!(updated.amenities, ["Pool"]);
  assert_eq!(updated.name, acc.name);
  assert_eq!(updated.location, acc.location);
  assert_eq!(updated.image_urls, acc.image_urls);
}

#[tokio::test]
async fn update_missing_accommodation_returns_none() {
  let s = store().await;
  let result = s
    .update_accommodation("ghost".into(), AccommodationPatch::default())
    .await
    .unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn remove_accommodation_reports_whether_it_existed() {
  let s = store().await;
  let acc = s.add_accommodation(apartment()).await.unwrap();

  assert!(s.remove_accommodation(acc.id.clone()).await.unwrap());
  assert!(!s.remove_accommodation(acc.id.clone()).await.unwrap());
  assert!(s.get_accommodation(&acc.id).await.unwrap().is_none());
}

#[tokio::test]
async fn catalog_service_enforces_positive_price() {
  let catalog = CatalogService::new(Arc::new(store().await));

  let err = catalog
    .create(NewAccommodation::new("Free Tent", Decimal::ZERO))
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::InvalidPrice(_)));
  assert!(catalog.list().await.unwrap().is_empty());

  let acc = catalog.create(apartment()).await.unwrap();
  let err = catalog
    .update(&acc.id, AccommodationPatch {
      price_per_night: Some(Decimal::new(-1, 0)),
      ..Default::default()
    })
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::InvalidPrice(_)));
  assert_eq!(
    catalog.get(&acc.id).await.unwrap().price_per_night,
    Decimal::new(150, 0)
  );
}

#[tokio::test]
async fn catalog_service_maps_missing_ids_to_not_found() {
  let catalog = CatalogService::new(Arc::new(store().await));

  assert!(matches!(
    catalog.get("x").await.unwrap_err(),
    CoreError::AccommodationNotFound(id) if id == "x"
  ));
  assert!(matches!(
    catalog.remove("x").await.unwrap_err(),
    CoreError::AccommodationNotFound(_)
  ));
  assert!(matches!(
    catalog.update("x", AccommodationPatch::default()).await.unwrap_err(),
    CoreError::AccommodationNotFound(_)
  ));
}

#[tokio::test]
async fn catalog_service_rejects_duplicate_ids() {
  let catalog = CatalogService::new(Arc::new(store().await));
  catalog.import(apartment().into_accommodation("7".into())).await.unwrap();

  let err = catalog
    .import(apartment().into_accommodation("7".into()))
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::DuplicateAccommodation(id) if id == "7"));
}

#[tokio::test]
async fn catalog_service_rejects_imported_non_positive_price() {
  let catalog = CatalogService::new(Arc::new(store().await));
  let mut acc = apartment().into_accommodation("7".into());
  acc.price_per_night = Decimal::ZERO;

  assert!(matches!(
    catalog.import(acc).await.unwrap_err(),
    CoreError::InvalidPrice(_)
  ));
  assert!(catalog.list().await.unwrap().is_empty());
}

// ─── Booking creation ────────────────────────────────────────────────────────

#[tokio::test]
async fn create_booking_prices_and_snapshots() {
  let (_, engine) = engine().await;

  let booking = engine
    .create_booking(stay("A1", "u1", date(2024, 6, 1), date(2024, 6, 3)))
    .await
    .unwrap();

  assert_eq!(booking.nights(), 2);
  assert_eq!(booking.total_price, Decimal::new(300, 0));
  assert_eq!(booking.status, BookingStatus::Pending);
  assert_eq!(booking.accommodation_name, "Cozy Downtown Apartment");
  assert_eq!(booking.accommodation_image.as_deref(), Some("/assets/lounge.png"));
  assert_eq!(booking.number_of_guests, 2);

  let stored = engine.get_booking(booking.booking_id).await.unwrap();
  assert_eq!(stored, booking);
}

#[tokio::test]
async fn one_night_stay_bills_one_night() {
  let (_, engine) = engine().await;

  let booking = engine
    .create_booking(stay("A1", "u1", date(2024, 6, 1), date(2024, 6, 2)))
    .await
    .unwrap();
  assert_eq!(booking.total_price, Decimal::new(150, 0));
}

#[tokio::test]
async fn create_booking_unknown_accommodation_errors() {
  let (s, engine) = engine().await;

  let err = engine
    .create_booking(stay("nope", "u1", date(2024, 6, 1), date(2024, 6, 3)))
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::AccommodationNotFound(id) if id == "nope"));
  assert!(s.list_bookings(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn create_booking_equal_dates_errors() {
  let (s, engine) = engine().await;

  let err = engine
    .create_booking(stay("A1", "u1", date(2024, 6, 1), date(2024, 6, 1)))
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::InvalidDateRange { .. }));
  assert!(s.list_bookings(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn create_booking_zero_guests_errors() {
  let (s, engine) = engine().await;

  let mut input = stay("A1", "u1", date(2024, 6, 1), date(2024, 6, 3));
  input.number_of_guests = 0;

  let err = engine.create_booking(input).await.unwrap_err();
  assert!(matches!(err, CoreError::InvalidGuestCount(0)));
  assert!(s.list_bookings(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn snapshot_survives_catalog_edits() {
  let (s, engine) = engine().await;

  let booking = engine
    .create_booking(stay("A1", "u1", date(2024, 6, 1), date(2024, 6, 3)))
    .await
    .unwrap();

  s.update_accommodation("A1".into(), AccommodationPatch {
    name: Some("Renamed".into()),
    price_per_night: Some(Decimal::new(999, 0)),
    ..Default::default()
  })
  .await
  .unwrap();
  s.remove_accommodation("A1".into()).await.unwrap();

  let stored = engine.get_booking(booking.booking_id).await.unwrap();
  assert_eq!(stored.accommodation_name, "Cozy Downtown Apartment");
  assert_eq!(stored.total_price, Decimal::new(300, 0));
}

// ─── Availability ────────────────────────────────────────────────────────────

#[tokio::test]
async fn overlapping_booking_is_unavailable() {
  let (s, engine) = engine().await;

  let first = engine
    .create_booking(stay("A1", "u1", date(2024, 6, 1), date(2024, 6, 5)))
    .await
    .unwrap();

  let err = engine
    .create_booking(stay("A1", "u2", date(2024, 6, 4), date(2024, 6, 6)))
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    CoreError::Unavailable { conflicting, .. } if conflicting == first.booking_id
  ));
  assert_eq!(s.list_bookings(None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn back_to_back_bookings_are_allowed() {
  let (_, engine) = engine().await;

  engine
    .create_booking(stay("A1", "u1", date(2024, 6, 1), date(2024, 6, 3)))
    .await
    .unwrap();
  engine
    .create_booking(stay("A1", "u2", date(2024, 6, 3), date(2024, 6, 5)))
    .await
    .unwrap();
}

#[tokio::test]
async fn cancelled_booking_frees_its_dates() {
  let (_, engine) = engine().await;

  let first = engine
    .create_booking(stay("A1", "u1", date(2024, 6, 1), date(2024, 6, 3)))
    .await
    .unwrap();
  engine.cancel(first.booking_id).await.unwrap();

  engine
    .create_booking(stay("A1", "u2", date(2024, 6, 1), date(2024, 6, 3)))
    .await
    .unwrap();
}

#[tokio::test]
async fn search_available_excludes_booked_accommodations() {
  let (s, engine) = engine().await;
  s.import_accommodation(apartment().into_accommodation("A2".into())).await.unwrap();

  engine
    .create_booking(stay("A1", "u1", date(2024, 6, 1), date(2024, 6, 5)))
    .await
    .unwrap();

  let query = |from, to| AvailabilityQuery { check_in: from, check_out: to, guests: 2 };

  let during: Vec<_> = engine
    .search_available(query(date(2024, 6, 2), date(2024, 6, 3)))
    .await
    .unwrap()
    .into_iter()
    .map(|a| a.id)
    .collect();
  assert_eq!(during, ["A2"]);

  let after = engine
    .search_available(query(date(2024, 6, 5), date(2024, 6, 7)))
    .await
    .unwrap();
  assert_eq!(after.len(), 2);
}

#[tokio::test]
async fn search_available_validates_the_stay() {
  let (_, engine) = engine().await;

  let err = engine
    .search_available(AvailabilityQuery {
      check_in:  date(2024, 6, 5),
      check_out: date(2024, 6, 5),
      guests:    1,
    })
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::InvalidDateRange { .. }));
}

// ─── Status transitions ──────────────────────────────────────────────────────

#[tokio::test]
async fn approve_then_cancel() {
  let (_, engine) = engine().await;
  let booking = engine
    .create_booking(stay("A1", "u1", date(2024, 6, 1), date(2024, 6, 3)))
    .await
    .unwrap();

  let approved = engine.approve(booking.booking_id).await.unwrap();
  assert_eq!(approved.status, BookingStatus::Confirmed);
  assert_eq!(approved.total_price, booking.total_price);
  assert_eq!(approved.booked_at, booking.booked_at);

  let cancelled = engine.cancel(booking.booking_id).await.unwrap();
  assert_eq!(cancelled.status, BookingStatus::Cancelled);
}

#[tokio::test]
async fn cancelled_booking_cannot_be_confirmed() {
  let (_, engine) = engine().await;
  let booking = engine
    .create_booking(stay("A1", "u1", date(2024, 6, 1), date(2024, 6, 3)))
    .await
    .unwrap();
  engine.cancel(booking.booking_id).await.unwrap();

  let err = engine.approve(booking.booking_id).await.unwrap_err();
  assert!(matches!(
    err,
    CoreError::IllegalTransition {
      from: BookingStatus::Cancelled,
      to:   BookingStatus::Confirmed,
    }
  ));
  assert_eq!(
    engine.get_booking(booking.booking_id).await.unwrap().status,
    BookingStatus::Cancelled
  );
}

#[tokio::test]
async fn repeating_the_current_status_is_a_no_op() {
  let (_, engine) = engine().await;
  let booking = engine
    .create_booking(stay("A1", "u1", date(2024, 6, 1), date(2024, 6, 3)))
    .await
    .unwrap();

  let same = engine
    .update_booking_status(booking.booking_id, BookingStatus::Pending)
    .await
    .unwrap();
  assert_eq!(same, booking);
}

#[tokio::test]
async fn update_status_unknown_booking_errors() {
  let (s, engine) = engine().await;
  engine
    .create_booking(stay("A1", "u1", date(2024, 6, 1), date(2024, 6, 3)))
    .await
    .unwrap();
  let before = s.list_bookings(None).await.unwrap();

  let missing = Uuid::new_v4();
  let err = engine
    .update_booking_status(missing, BookingStatus::Confirmed)
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::BookingNotFound(id) if id == missing));
  assert_eq!(s.list_bookings(None).await.unwrap(), before);
}

#[tokio::test]
async fn compare_and_set_requires_the_expected_status() {
  let (s, engine) = engine().await;
  let booking = engine
    .create_booking(stay("A1", "u1", date(2024, 6, 1), date(2024, 6, 3)))
    .await
    .unwrap();

  let stale = s
    .compare_and_set_status(
      booking.booking_id,
      BookingStatus::Confirmed,
      BookingStatus::Cancelled,
    )
    .await
    .unwrap();
  assert!(stale.is_none());

  let fresh = s
    .compare_and_set_status(
      booking.booking_id,
      BookingStatus::Pending,
      BookingStatus::Confirmed,
    )
    .await
    .unwrap()
    .unwrap();
  assert_eq!(fresh.status, BookingStatus::Confirmed);
}

// ─── Pricing limits ──────────────────────────────────────────────────────────

#[tokio::test]
async fn total_too_large_to_represent_is_rejected() {
  let (s, engine) = engine().await;
  let mut big = apartment();
  big.price_per_night = Decimal::from_i128_with_scale(10_i128.pow(28), 0);
  CatalogService::new(s.clone())
    .import(big.into_accommodation("BIG".into()))
    .await
    .unwrap();

  let err = engine
    .create_booking(stay("BIG", "u1", date(2024, 6, 1), date(2024, 8, 1)))
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::PriceOverflow { nights: 61, .. }));
  assert!(s.list_bookings(None).await.unwrap().is_empty());
}

// ─── Listing ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_bookings_newest_first_and_scoped_to_viewer() {
  let (s, engine) = engine().await;
  s.import_accommodation(apartment().into_accommodation("A2".into())).await.unwrap();

  let a = engine
    .create_booking(stay("A1", "u1", date(2024, 6, 1), date(2024, 6, 3)))
    .await
    .unwrap();
  let b = engine
    .create_booking(stay("A2", "u2", date(2024, 6, 1), date(2024, 6, 3)))
    .await
    .unwrap();
  let c = engine
    .create_booking(stay("A1", "u1", date(2024, 7, 1), date(2024, 7, 3)))
    .await
    .unwrap();

  let mine = engine.list_bookings(&Viewer::User("u1".into())).await.unwrap();
  let ids: Vec<_> = mine.iter().map(|b| b.booking_id).collect();
  assert_eq!(ids, [c.booking_id, a.booking_id]);

  let all = engine.list_bookings(&Viewer::Admin).await.unwrap();
  let ids: Vec<_> = all.iter().map(|b| b.booking_id).collect();
  assert_eq!(ids, [c.booking_id, b.booking_id, a.booking_id]);
  assert!(all.windows(2).all(|w| w[0].booked_at >= w[1].booked_at));

  assert!(engine.list_bookings(&Viewer::User("nobody".into())).await.unwrap().is_empty());
}

#[tokio::test]
async fn list_bookings_orders_by_booked_at_not_insertion() {
  let s = store().await;
  let acc = apartment().into_accommodation("A1".into());
  let at = |h: u32| chrono::DateTime::parse_from_rfc3339(&format!("2024-05-01T{h:02}:00:00Z"))
    .unwrap()
    .with_timezone(&chrono::Utc);

  let noon = stay("A1", "u1", date(2024, 6, 1), date(2024, 6, 3))
    .into_booking(&acc, at(12))
    .unwrap();
  let morning = stay("A1", "u1", date(2024, 7, 1), date(2024, 7, 3))
    .into_booking(&acc, at(8))
    .unwrap();
  let evening = stay("A1", "u1", date(2024, 8, 1), date(2024, 8, 3))
    .into_booking(&acc, at(20))
    .unwrap();

  for b in [noon.clone(), morning.clone(), evening.clone()] {
    assert!(matches!(s.insert_booking(b).await.unwrap(), Reservation::Inserted(_)));
  }

  let ids: Vec<_> = s
    .list_bookings(Some("u1"))
    .await
    .unwrap()
    .into_iter()
    .map(|b| b.booking_id)
    .collect();
  assert_eq!(ids, [evening.booking_id, noon.booking_id, morning.booking_id]);
}

// ─── Favorites ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn favorite_add_contains_remove() {
  let s = Arc::new(store().await);
  let favorites = Favorites::new(s);

  assert!(!favorites.contains("u1", "1").await.unwrap());
  assert!(favorites.add("u1", "1").await.unwrap());
  assert!(favorites.contains("u1", "1").await.unwrap());
  assert!(favorites.remove("u1", "1").await.unwrap());
  assert!(!favorites.contains("u1", "1").await.unwrap());
}

#[tokio::test]
async fn favorite_add_and_remove_are_idempotent() {
  let s = Arc::new(store().await);
  let favorites = Favorites::new(s);

  assert!(favorites.add("u1", "1").await.unwrap());
  assert!(!favorites.add("u1", "1").await.unwrap());
  assert_eq!(favorites.list_ids("u1").await.unwrap(), ["1"]);

  assert!(favorites.remove("u1", "1").await.unwrap());
  assert!(!favorites.remove("u1", "1").await.unwrap());
  assert!(!favorites.remove("u1", "never-added").await.unwrap());
}

#[tokio::test]
async fn toggle_twice_restores_membership() {
  let s = Arc::new(store().await);
  let favorites = Favorites::new(s);
  favorites.add("u1", "2").await.unwrap();

  assert!(favorites.toggle("u1", "1").await.unwrap());
  assert!(favorites.contains("u1", "1").await.unwrap());
  assert!(!favorites.toggle("u1", "1").await.unwrap());
  assert!(!favorites.contains("u1", "1").await.unwrap());
  assert_eq!(favorites.list_ids("u1").await.unwrap(), ["2"]);
}

#[tokio::test]
async fn concurrent_toggles_alternate_state() {
  let s = Arc::new(store().await);
  let favorites = Favorites::new(s);

  let handles: Vec<_> = (0..10)
    .map(|_| {
      let favorites = favorites.clone();
      tokio::spawn(async move { favorites.toggle("u1", "1").await.unwrap() })
    })
    .collect();

  let mut now_on = 0;
  for h in handles {
    if h.await.unwrap() {
      now_on += 1;
    }
  }

  // Each flip sees the previous one, so exactly half of them add the edge.
  assert_eq!(now_on, 5);
  assert!(!favorites.contains("u1", "1").await.unwrap());
}

#[tokio::test]
async fn favorites_are_per_user() {
  let s = Arc::new(store().await);
  let favorites = Favorites::new(s);

  favorites.add("u1", "1").await.unwrap();
  favorites.add("u2", "2").await.unwrap();

  assert_eq!(favorites.list_ids("u1").await.unwrap(), ["1"]);
  assert!(!favorites.contains("u2", "1").await.unwrap());
}

#[tokio::test]
async fn list_favorite_accommodations_drops_dangling_ids() {
  let s = Arc::new(store().await);
  s.import_accommodation(apartment().into_accommodation("1".into())).await.unwrap();
  s.import_accommodation(apartment().into_accommodation("2".into())).await.unwrap();
  let favorites = Favorites::new(s.clone());

  favorites.add("u1", "2").await.unwrap();
  favorites.add("u1", "1").await.unwrap();
  favorites.add("u1", "gone").await.unwrap();

  let resolved: Vec<_> = favorites
    .list_accommodations("u1")
    .await
    .unwrap()
    .into_iter()
    .map(|a| a.id)
    .collect();
  assert_eq!(resolved, ["2", "1"]);

  s.remove_accommodation("2".into()).await.unwrap();
  let resolved = favorites.list_accommodations("u1").await.unwrap();
  assert_eq!(resolved.len(), 1);
  assert_eq!(favorites.list_ids("u1").await.unwrap().len(), 3);
}

#[tokio::test]
async fn favorite_edges_record_when_they_were_added() {
  let s = store().await;
  s.add_favorite("u1".into(), "1".into()).await.unwrap();

  let edges = s.list_favorites("u1").await.unwrap();
  assert_eq!(edges.len(), 1);
  assert_eq!(edges[0].user_id, "u1");
  assert!(s.is_favorite("u1", "1").await.unwrap());
}
