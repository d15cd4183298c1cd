//! [`SqliteStore`]: the SQLite implementation of the Roost storage traits.

use std::path::Path;

use chrono::{NaiveDate, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use roost_core::{
  accommodation::{Accommodation, AccommodationPatch, NewAccommodation},
  booking::{Booking, BookingStatus},
  favorite::FavoriteEdge,
  store::{BookingLedger, Catalog, FavoritesIndex, Reservation, Store},
};

use crate::{
  Error, Result,
  encode::{
    ACCOMMODATION_COLUMNS, BOOKING_COLUMNS, RawAccommodation, RawBooking,
    RawFavorite, decode_uuid, encode_date, encode_decimal, encode_dt,
    encode_list, encode_status, encode_uuid,
  },
  schema::{OCCUPYING_STATUSES, SCHEMA},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// Catalog, ledger, and favorites backed by a single SQLite database.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open a process-local store whose contents vanish with the process.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    tracing::debug!("schema initialised");
    Ok(())
  }

  /// `INSERT OR IGNORE`; `false` means the id was taken.
  async fn insert_accommodation(&self, acc: &Accommodation) -> Result<bool> {
    let id              = acc.id.clone();
    let name            = acc.name.clone();
    let description     = acc.description.clone();
    let lat             = acc.location.lat;
    let lng             = acc.location.lng;
    let price_per_night = encode_decimal(acc.price_per_night);
    let image_urls      = encode_list(&acc.image_urls)?;
    let kind            = acc.kind.clone();
    let rating          = f64::from(acc.rating);
    let reviews_count   = i64::from(acc.reviews_count);
    let amenities       = encode_list(&acc.amenities)?;

    let inserted = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "INSERT OR IGNORE INTO accommodations (
             id, name, description, lat, lng, price_per_night,
             image_urls, kind, rating, reviews_count, amenities
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
          rusqlite::params![
            id,
            name,
            description,
            lat,
            lng,
            price_per_night,
            image_urls,
            kind,
            rating,
            reviews_count,
            amenities,
          ],
        )?;
        Ok(n == 1)
      })
      .await?;
    Ok(inserted)
  }
}

impl Store for SqliteStore {
  type Error = Error;
}

// ─── Catalog impl ────────────────────────────────────────────────────────────

impl Catalog for SqliteStore {
  async fn get_accommodation(&self, id: &str) -> Result<Option<Accommodation>> {
    let id = id.to_owned();

    let raw: Option<RawAccommodation> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {ACCOMMODATION_COLUMNS} FROM accommodations WHERE id = ?1"),
            rusqlite::params![id],
            RawAccommodation::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawAccommodation::into_accommodation).transpose()
  }

  async fn list_accommodations(&self) -> Result<Vec<Accommodation>> {
    let raws: Vec<RawAccommodation> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ACCOMMODATION_COLUMNS} FROM accommodations ORDER BY rowid"
        ))?;
        let rows = stmt
          .query_map([], RawAccommodation::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAccommodation::into_accommodation).collect()
  }

  async fn add_accommodation(&self, input: NewAccommodation) -> Result<Accommodation> {
    let acc = input.into_accommodation(Uuid::new_v4().simple().to_string());
    if !self.insert_accommodation(&acc).await? {
      return Err(Error::DuplicateAccommodation(acc.id));
    }
    Ok(acc)
  }

  async fn import_accommodation(
    &self,
    acc: Accommodation,
  ) -> Result<Option<Accommodation>> {
    Ok(self.insert_accommodation(&acc).await?.then_some(acc))
  }

  async fn update_accommodation(
    &self,
    id:    String,
    patch: AccommodationPatch,
  ) -> Result<Option<Accommodation>> {
    let name            = patch.name;
    let description     = patch.description;
    let lat             = patch.location.map(|l| l.lat);
    let lng             = patch.location.map(|l| l.lng);
    let price_per_night = patch.price_per_night.map(encode_decimal);
    let image_urls      = patch.image_urls.as_deref().map(encode_list).transpose()?;
    let kind            = patch.kind;
    let amenities       = patch.amenities.as_deref().map(encode_list).transpose()?;

    // COALESCE keeps the current value wherever the patch is silent, so the
    // read-modify-write happens inside SQLite.
    let raw: Option<RawAccommodation> = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "UPDATE accommodations SET
             name            = COALESCE(?2, name),
             description     = COALESCE(?3, description),
             lat             = COALESCE(?4, lat),
             lng             = COALESCE(?5, lng),
             price_per_night = COALESCE(?6, price_per_night),
             image_urls      = COALESCE(?7, image_urls),
             kind            = COALESCE(?8, kind),
             amenities       = COALESCE(?9, amenities)
           WHERE id = ?1",
          rusqlite::params![
            id,
            name,
            description,
            lat,
            lng,
            price_per_night,
            image_urls,
            kind,
            amenities,
          ],
        )?;
        if n == 0 {
          return Ok(None);
        }
        Ok(conn
          .query_row(
            &format!("SELECT {ACCOMMODATION_COLUMNS} FROM accommodations WHERE id = ?1"),
            rusqlite::params![id],
            RawAccommodation::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawAccommodation::into_accommodation).transpose()
  }

  async fn remove_accommodation(&self, id: String) -> Result<bool> {
    let removed = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "DELETE FROM accommodations WHERE id = ?1",
          rusqlite::params![id],
        )?;
        Ok(n > 0)
      })
      .await?;
    Ok(removed)
  }
}

// ─── BookingLedger impl ──────────────────────────────────────────────────────

impl BookingLedger for SqliteStore {
  async fn insert_booking(&self, booking: Booking) -> Result<Reservation> {
    let booking_id          = encode_uuid(booking.booking_id);
    let accommodation_id    = booking.accommodation_id.clone();
    let accommodation_name  = booking.accommodation_name.clone();
    let accommodation_image = booking.accommodation_image.clone();
    let user_id             = booking.user_id.clone();
    let check_in            = encode_date(booking.check_in);
    let check_out           = encode_date(booking.check_out);
    let number_of_guests    = i64::from(booking.number_of_guests);
    let total_price         = encode_decimal(booking.total_price);
    let status              = encode_status(booking.status);
    let booked_at           = encode_dt(booking.booked_at);

    let conflict: Option<String> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        // [check_in, check_out) intervals: back-to-back stays do not clash.
        let existing: Option<String> = tx
          .query_row(
            &format!(
              "SELECT booking_id FROM bookings
               WHERE accommodation_id = ?1
                 AND status IN {OCCUPYING_STATUSES}
                 AND check_in  < ?3
                 AND check_out > ?2
               ORDER BY check_in
               LIMIT 1"
            ),
            rusqlite::params![accommodation_id, check_in, check_out],
            |r| r.get(0),
          )
          .optional()?;

        if existing.is_some() {
          return Ok(existing);
        }

        tx.execute(
          "INSERT INTO bookings (
             booking_id, accommodation_id, accommodation_name,
             accommodation_image, user_id, check_in, check_out,
             number_of_guests, total_price, status, booked_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
          rusqlite::params![
            booking_id,
            accommodation_id,
            accommodation_name,
            accommodation_image,
            user_id,
            check_in,
            check_out,
            number_of_guests,
            total_price,
            status,
            booked_at,
          ],
        )?;
        tx.commit()?;
        Ok(None)
      })
      .await?;

    match conflict {
      Some(existing) => Ok(Reservation::Conflict { existing: decode_uuid(&existing)? }),
      None => Ok(Reservation::Inserted(booking)),
    }
  }

  async fn get_booking(&self, id: Uuid) -> Result<Option<Booking>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawBooking> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE booking_id = ?1"),
            rusqlite::params![id_str],
            RawBooking::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawBooking::into_booking).transpose()
  }

  async fn compare_and_set_status(
    &self,
    id:   Uuid,
    from: BookingStatus,
    to:   BookingStatus,
  ) -> Result<Option<Booking>> {
    let id_str   = encode_uuid(id);
    let from_str = encode_status(from);
    let to_str   = encode_status(to);

    let raw: Option<RawBooking> = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "UPDATE bookings SET status = ?3 WHERE booking_id = ?1 AND status = ?2",
          rusqlite::params![id_str, from_str, to_str],
        )?;
        if n == 0 {
          return Ok(None);
        }
        Ok(conn
          .query_row(
            &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE booking_id = ?1"),
            rusqlite::params![id_str],
            RawBooking::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawBooking::into_booking).transpose()
  }

  async fn list_bookings(&self, owner: Option<&str>) -> Result<Vec<Booking>> {
    let owner = owner.map(str::to_owned);

    // rowid breaks ties between bookings stamped in the same instant.
    let raws: Vec<RawBooking> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {BOOKING_COLUMNS} FROM bookings
           WHERE ?1 IS NULL OR user_id = ?1
           ORDER BY booked_at DESC, rowid DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![owner], RawBooking::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawBooking::into_booking).collect()
  }

  async fn booked_accommodations(
    &self,
    check_in:  NaiveDate,
    check_out: NaiveDate,
  ) -> Result<Vec<String>> {
    let check_in  = encode_date(check_in);
    let check_out = encode_date(check_out);

    let ids = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT DISTINCT accommodation_id FROM bookings
           WHERE status IN {OCCUPYING_STATUSES}
             AND check_in  < ?2
             AND check_out > ?1"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![check_in, check_out], |r| r.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(ids)
  }
}

// ─── FavoritesIndex impl ─────────────────────────────────────────────────────

impl FavoritesIndex for SqliteStore {
  async fn add_favorite(&self, user_id: String, accommodation_id: String) -> Result<bool> {
    let added_at = encode_dt(Utc::now());

    let added = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "INSERT OR IGNORE INTO favorites (user_id, accommodation_id, added_at)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![user_id, accommodation_id, added_at],
        )?;
        Ok(n == 1)
      })
      .await?;
    Ok(added)
  }

  async fn remove_favorite(&self, user_id: String, accommodation_id: String) -> Result<bool> {
    let removed = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "DELETE FROM favorites WHERE user_id = ?1 AND accommodation_id = ?2",
          rusqlite::params![user_id, accommodation_id],
        )?;
        Ok(n > 0)
      })
      .await?;
    Ok(removed)
  }

  async fn toggle_favorite(&self, user_id: String, accommodation_id: String) -> Result<bool> {
    let added_at = encode_dt(Utc::now());

    let now_favorite = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let removed = tx.execute(
          "DELETE FROM favorites WHERE user_id = ?1 AND accommodation_id = ?2",
          rusqlite::params![user_id, accommodation_id],
        )?;
        if removed == 0 {
          tx.execute(
            "INSERT INTO favorites (user_id, accommodation_id, added_at)
             VALUES (?1, ?2, ?3)",
            rusqlite::params![user_id, accommodation_id, added_at],
          )?;
        }
        tx.commit()?;
        Ok(removed == 0)
      })
      .await?;
    Ok(now_favorite)
  }

  async fn is_favorite(&self, user_id: &str, accommodation_id: &str) -> Result<bool> {
    let user_id          = user_id.to_owned();
    let accommodation_id = accommodation_id.to_owned();

    let found = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT 1 FROM favorites WHERE user_id = ?1 AND accommodation_id = ?2",
            rusqlite::params![user_id, accommodation_id],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false))
      })
      .await?;
    Ok(found)
  }

  async fn list_favorites(&self, user_id: &str) -> Result<Vec<FavoriteEdge>> {
    let user_id = user_id.to_owned();

    let raws: Vec<RawFavorite> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT user_id, accommodation_id, added_at FROM favorites
           WHERE user_id = ?1
           ORDER BY rowid",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user_id], |row| {
            Ok(RawFavorite {
              user_id:          row.get(0)?,
              accommodation_id: row.get(1)?,
              added_at:         row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawFavorite::into_edge).collect()
  }
}
