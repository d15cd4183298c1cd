//! Accommodation records: the catalog's reference data.
//!
//! Bookings never hold a live reference to an accommodation; they copy the
//! fields they display at creation time (see [`crate::booking::Booking`]).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A point on the map, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
  pub lat: f64,
  pub lng: f64,
}

// ─── Accommodation ───────────────────────────────────────────────────────────

/// A bookable listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Accommodation {
  /// Opaque, stable identifier.
  pub id:              String,
  pub name:            String,
  pub description:     String,
  pub location:        Location,
  /// Always strictly positive.
  pub price_per_night: Decimal,
  /// Ordered; the first entry is the primary image.
  pub image_urls:      Vec<String>,
  /// Free-text listing type, e.g. "Apartment" or "Villa".
  pub kind:            String,
  pub rating:          f32,
  pub reviews_count:   u32,
  pub amenities:       Vec<String>,
}

impl Accommodation {
  /// The image shown on booking receipts and list cards.
  pub fn primary_image(&self) -> Option<&str> {
    self.image_urls.first().map(String::as_str)
  }

  pub fn validate(&self) -> Result<()> { ensure_positive(self.price_per_night) }
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Input to [`crate::store::Catalog::add_accommodation`].
///
/// The id is assigned by the store; rating and review count start at zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAccommodation {
  pub name:            String,
  #[serde(default)]
  pub description:     String,
  #[serde(default)]
  pub location:        Location,
  pub price_per_night: Decimal,
  #[serde(default)]
  pub image_urls:      Vec<String>,
  #[serde(default)]
  pub kind:            String,
  #[serde(default)]
  pub amenities:       Vec<String>,
}

impl NewAccommodation {
  /// Convenience constructor with every optional field left empty.
  pub fn new(name: impl Into<String>, price_per_night: Decimal) -> Self {
    Self {
      name: name.into(),
      description: String::new(),
      location: Location::default(),
      price_per_night,
      image_urls: Vec::new(),
      kind: String::new(),
      amenities: Vec::new(),
    }
  }

  pub fn validate(&self) -> Result<()> { ensure_positive(self.price_per_night) }

  /// Build the stored record under `id`.
  pub fn into_accommodation(self, id: String) -> Accommodation {
    Accommodation {
      id,
      name: self.name,
      description: self.description,
      location: self.location,
      price_per_night: self.price_per_night,
      image_urls: self.image_urls,
      kind: self.kind,
      rating: 0.0,
      reviews_count: 0,
      amenities: self.amenities,
    }
  }
}

/// A partial update. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccommodationPatch {
  pub name:            Option<String>,
  pub description:     Option<String>,
  pub location:        Option<Location>,
  pub price_per_night: Option<Decimal>,
  pub image_urls:      Option<Vec<String>>,
  pub kind:            Option<String>,
  pub amenities:       Option<Vec<String>>,
}

impl AccommodationPatch {
  pub fn validate(&self) -> Result<()> {
    self.price_per_night.map_or(Ok(()), ensure_positive)
  }
}

fn ensure_positive(price: Decimal) -> Result<()> {
  if price > Decimal::ZERO {
    Ok(())
  } else {
    Err(Error::InvalidPrice(price))
  }
}
