//! Sample listings loaded into an empty catalog on first start.

use roost_core::{
  Result,
  accommodation::{Accommodation, Location},
  service::CatalogService,
  store::Catalog,
};
use rust_decimal::Decimal;

struct Sample {
  id:          &'static str,
  name:        &'static str,
  description: &'static str,
  lat:         f64,
  lng:         f64,
  price:       i64,
  image:       &'static str,
  kind:        &'static str,
  rating:      f32,
  reviews:     u32,
  amenities:   &'static [&'static str],
}

const LOUNGE: &str = "/assets/Rustic_Elegance_Lounge.png";
const LOFT: &str = "/assets/Rustic_Loft.png";

const SAMPLES: &[Sample] = &[
  Sample {
    id:          "1",
    name:        "Cozy Downtown Apartment",
    description: "A charming and centrally located apartment, perfect for city \
                  explorers. Features a fully equipped kitchen and a comfortable \
                  living space.",
    lat:         34.0522,
    lng:         -118.2437,
    price:       150,
    image:       LOUNGE,
    kind:        "Apartment",
    rating:      4.5,
    reviews:     120,
    amenities:   &["WiFi", "Kitchen", "Air Conditioning", "TV", "Free Parking", "Washer"],
  },
  Sample {
    id:          "2",
    name:        "Luxury Beachfront Villa",
    description: "Experience luxury with stunning ocean views. This villa offers \
                  a private pool, direct beach access, and spacious rooms.",
    lat:         33.9934,
    lng:         -118.4792,
    price:       450,
    image:       LOFT,
    kind:        "Villa",
    rating:      4.9,
    reviews:     250,
    amenities:   &["WiFi", "Pool", "Beach Access", "Parking", "Gym", "Hot Tub", "Daily Cleaning"],
  },
  Sample {
    id:          "3",
    name:        "Rustic Mountain Cabin",
    description: "Escape to this peaceful cabin in the mountains. Ideal for \
                  hiking, relaxing, and enjoying nature. Features a cozy fireplace.",
    lat:         34.2014,
    lng:         -117.0718,
    price:       200,
    image:       LOUNGE,
    kind:        "Cabin",
    rating:      4.7,
    reviews:     90,
    amenities:   &["WiFi", "Fireplace", "Hiking Trails", "Pet-friendly", "BBQ Grill", "Board Games"],
  },
  Sample {
    id:          "4",
    name:        "Modern City Loft",
    description: "A stylish loft in the heart of the business district, offering \
                  panoramic city views and modern amenities.",
    lat:         40.7128,
    lng:         -74.0060,
    price:       280,
    image:       LOFT,
    kind:        "Loft",
    rating:      4.6,
    reviews:     150,
    amenities:   &["WiFi", "Full Kitchen", "Smart TV", "Gym Access", "Rooftop Terrace"],
  },
  Sample {
    id:          "5",
    name:        "Charming Countryside Inn",
    description: "A quaint inn nestled in rolling hills, perfect for a relaxing \
                  getaway. Includes breakfast and garden access.",
    lat:         36.5800,
    lng:         -1.7829,
    price:       120,
    image:       LOUNGE,
    kind:        "Inn",
    rating:      4.8,
    reviews:     75,
    amenities:   &["WiFi", "Breakfast Included", "Garden", "Free Parking", "Restaurant"],
  },
  Sample {
    id:          "6",
    name:        "Secluded Forest Retreat",
    description: "A unique treehouse-style retreat deep in the forest. Disconnect \
                  and recharge in nature. Minimalist and eco-friendly.",
    lat:         45.5231,
    lng:         -122.6765,
    price:       220,
    image:       LOFT,
    kind:        "Retreat",
    rating:      4.9,
    reviews:     60,
    amenities:   &["Composting Toilet", "Solar Power", "Hiking Trails", "Stargazing Deck", "Outdoor Shower"],
  },
  Sample {
    id:          "7",
    name:        "Urban Studio with Balcony",
    description: "Compact and modern studio apartment with a private balcony \
                  overlooking the city park. Great for solo travelers or couples.",
    lat:         51.5074,
    lng:         -0.1278,
    price:       180,
    image:       LOUNGE,
    kind:        "Studio",
    rating:      4.3,
    reviews:     88,
    amenities:   &["WiFi", "Kitchenette", "Balcony", "Smart TV", "Laundry Facilities"],
  },
];

impl Sample {
  fn to_accommodation(&self) -> Accommodation {
    Accommodation {
      id:              self.id.to_string(),
      name:            self.name.to_string(),
      description:     self.description.to_string(),
      location:        Location { lat: self.lat, lng: self.lng },
      price_per_night: Decimal::new(self.price, 0),
      image_urls:      vec![self.image.to_string()],
      kind:            self.kind.to_string(),
      rating:          self.rating,
      reviews_count:   self.reviews,
      amenities:       self.amenities.iter().map(|a| a.to_string()).collect(),
    }
  }
}

/// Insert the sample listings if the catalog is empty. Returns how many
/// were written.
pub async fn seed_if_empty<S: Catalog>(catalog: &CatalogService<S>) -> Result<usize> {
  if !catalog.list().await?.is_empty() {
    return Ok(0);
  }

  for sample in SAMPLES {
    catalog.import(sample.to_accommodation()).await?;
  }
  Ok(SAMPLES.len())
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use roost_core::accommodation::NewAccommodation;
  use roost_store_sqlite::SqliteStore;

  use super::*;

  async fn catalog() -> CatalogService<SqliteStore> {
    CatalogService::new(Arc::new(SqliteStore::open_in_memory().await.unwrap()))
  }

  #[tokio::test]
  async fn seeds_an_empty_catalog_once() {
    let catalog = catalog().await;

    assert_eq!(seed_if_empty(&catalog).await.unwrap(), 7);
    assert_eq!(seed_if_empty(&catalog).await.unwrap(), 0);

    let villa = catalog.get("2").await.unwrap();
    assert_eq!(villa.price_per_night, Decimal::new(450, 0));
    assert_eq!(villa.reviews_count, 250);
    assert_eq!(villa.primary_image(), Some(LOFT));
  }

  #[tokio::test]
  async fn leaves_a_populated_catalog_alone() {
    let catalog = catalog().await;
    catalog
      .create(NewAccommodation::new("Mine", Decimal::new(99, 0)))
      .await
      .unwrap();

    assert_eq!(seed_if_empty(&catalog).await.unwrap(), 0);
    assert_eq!(catalog.list().await.unwrap().len(), 1);
  }
}
