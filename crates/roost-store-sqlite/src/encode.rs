//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (nanosecond
//! precision, `Z` suffix) so that they sort lexicographically. Calendar dates
//! are `YYYY-MM-DD`, which sorts the same way. Money is a decimal string.
//! String lists are compact JSON arrays.

use std::str::FromStr as _;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use roost_core::{
  accommodation::{Accommodation, Location},
  booking::{Booking, BookingStatus},
  favorite::FavoriteEdge,
};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ────────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Decimal ──────────────────────────────────────────────────────────────────

pub fn encode_decimal(d: Decimal) -> String { d.to_string() }

pub fn decode_decimal(s: &str) -> Result<Decimal> { Ok(Decimal::from_str(s)?) }

// ─── BookingStatus ────────────────────────────────────────────────────────────

pub fn encode_status(s: BookingStatus) -> &'static str { s.into() }

pub fn decode_status(s: &str) -> Result<BookingStatus> {
  BookingStatus::from_str(s)
    .map_err(|_| Error::InvalidColumn(format!("unknown booking status: {s:?}")))
}

// ─── String lists ─────────────────────────────────────────────────────────────

pub fn encode_list(items: &[String]) -> Result<String> {
  Ok(serde_json::to_string(items)?)
}

pub fn decode_list(s: &str) -> Result<Vec<String>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawAccommodation::from_row`].
pub const ACCOMMODATION_COLUMNS: &str = "id, name, description, lat, lng, \
  price_per_night, image_urls, kind, rating, reviews_count, amenities";

/// Raw values read directly from an `accommodations` row.
pub struct RawAccommodation {
  pub id:              String,
  pub name:            String,
  pub description:     String,
  pub lat:             f64,
  pub lng:             f64,
  pub price_per_night: String,
  pub image_urls:      String,
  pub kind:            String,
  pub rating:          f64,
  pub reviews_count:   i64,
  pub amenities:       String,
}

impl RawAccommodation {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:              row.get(0)?,
      name:            row.get(1)?,
      description:     row.get(2)?,
      lat:             row.get(3)?,
      lng:             row.get(4)?,
      price_per_night: row.get(5)?,
      image_urls:      row.get(6)?,
      kind:            row.get(7)?,
      rating:          row.get(8)?,
      reviews_count:   row.get(9)?,
      amenities:       row.get(10)?,
    })
  }

  pub fn into_accommodation(self) -> Result<Accommodation> {
    let reviews_count = u32::try_from(self.reviews_count).map_err(|_| {
      Error::InvalidColumn(format!("reviews_count {}", self.reviews_count))
    })?;

    Ok(Accommodation {
      id: self.id,
      name: self.name,
      description: self.description,
      location: Location { lat: self.lat, lng: self.lng },
      price_per_night: decode_decimal(&self.price_per_night)?,
      image_urls: decode_list(&self.image_urls)?,
      kind: self.kind,
      rating: self.rating as f32,
      reviews_count,
      amenities: decode_list(&self.amenities)?,
    })
  }
}

/// Column list matching [`RawBooking::from_row`].
pub const BOOKING_COLUMNS: &str = "booking_id, accommodation_id, \
  accommodation_name, accommodation_image, user_id, check_in, check_out, \
  number_of_guests, total_price, status, booked_at";

/// Raw values read directly from a `bookings` row.
pub struct RawBooking {
  pub booking_id:          String,
  pub accommodation_id:    String,
  pub accommodation_name:  String,
  pub accommodation_image: Option<String>,
  pub user_id:             String,
  pub check_in:            String,
  pub check_out:           String,
  pub number_of_guests:    i64,
  pub total_price:         String,
  pub status:              String,
  pub booked_at:           String,
}

impl RawBooking {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      booking_id:          row.get(0)?,
      accommodation_id:    row.get(1)?,
      accommodation_name:  row.get(2)?,
      accommodation_image: row.get(3)?,
      user_id:             row.get(4)?,
      check_in:            row.get(5)?,
      check_out:           row.get(6)?,
      number_of_guests:    row.get(7)?,
      total_price:         row.get(8)?,
      status:              row.get(9)?,
      booked_at:           row.get(10)?,
    })
  }

  pub fn into_booking(self) -> Result<Booking> {
    let number_of_guests = u32::try_from(self.number_of_guests).map_err(|_| {
      Error::InvalidColumn(format!("number_of_guests {}", self.number_of_guests))
    })?;

    Ok(Booking {
      booking_id: decode_uuid(&self.booking_id)?,
      accommodation_id: self.accommodation_id,
      accommodation_name: self.accommodation_name,
      accommodation_image: self.accommodation_image,
      user_id: self.user_id,
      check_in: decode_date(&self.check_in)?,
      check_out: decode_date(&self.check_out)?,
      number_of_guests,
      total_price: decode_decimal(&self.total_price)?,
      status: decode_status(&self.status)?,
      booked_at: decode_dt(&self.booked_at)?,
    })
  }
}

/// Raw values read directly from a `favorites` row.
pub struct RawFavorite {
  pub user_id:          String,
  pub accommodation_id: String,
  pub added_at:         String,
}

impl RawFavorite {
  pub fn into_edge(self) -> Result<FavoriteEdge> {
    Ok(FavoriteEdge {
      user_id:          self.user_id,
      accommodation_id: self.accommodation_id,
      added_at:         decode_dt(&self.added_at)?,
    })
  }
}
