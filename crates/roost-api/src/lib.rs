//! JSON REST API for Roost.
//!
//! Exposes an axum [`Router`] backed by any store that implements the three
//! `roost-core` storage traits. Auth, TLS, and transport concerns are the
//! caller's responsibility; the `/admin` prefix marks administrative routes
//! for whatever sits in front of this router.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", roost_api::api_router(store.clone()))
//! ```

pub mod accommodations;
pub mod bookings;
pub mod error;
pub mod favorites;

use std::sync::Arc;

use axum::{
  Json, Router,
  routing::{get, patch, post, put},
};
use roost_core::{
  service::{BookingEngine, CatalogService, Favorites},
  store::{BookingLedger, Catalog, FavoritesIndex},
};
use serde_json::{Value, json};

pub use error::ApiError;

/// Everything a store must implement to back the API.
pub trait Backend: Catalog + BookingLedger + FavoritesIndex + 'static {}

impl<S> Backend for S where S: Catalog + BookingLedger + FavoritesIndex + 'static {}

/// Services shared by every handler.
pub struct ApiState<S> {
  pub catalog:   CatalogService<S>,
  pub bookings:  BookingEngine<S>,
  pub favorites: Favorites<S>,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      catalog:   self.catalog.clone(),
      bookings:  self.bookings.clone(),
      favorites: self.favorites.clone(),
    }
  }
}

impl<S: Backend> ApiState<S> {
  pub fn new(store: Arc<S>) -> Self {
    Self {
      catalog:   CatalogService::new(Arc::clone(&store)),
      bookings:  BookingEngine::new(Arc::clone(&store)),
      favorites: Favorites::new(store),
    }
  }
}

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S: Backend>(store: Arc<S>) -> Router<()> {
  Router::new()
    .route("/health", get(health))
    // Catalog
    .route("/accommodations", get(accommodations::list::<S>))
    .route("/accommodations/available", get(accommodations::available::<S>))
    .route("/accommodations/{id}", get(accommodations::get_one::<S>))
    .route("/admin/accommodations", post(accommodations::create::<S>))
    .route(
      "/admin/accommodations/{id}",
      patch(accommodations::update::<S>)
        .delete(accommodations::remove::<S>),
    )
    // Bookings
    .route("/bookings", post(bookings::create::<S>))
    .route("/bookings/{id}", get(bookings::get_one::<S>))
    .route("/users/{user_id}/bookings", get(bookings::list_for_user::<S>))
    .route("/admin/bookings", get(bookings::list_all::<S>))
    .route("/admin/bookings/{id}/status", put(bookings::set_status::<S>))
    .route("/admin/bookings/{id}/approve", post(bookings::approve::<S>))
    .route("/admin/bookings/{id}/cancel", post(bookings::cancel::<S>))
    // Favorites
    .route("/users/{user_id}/favorites", get(favorites::list::<S>))
    .route("/users/{user_id}/favorites/ids", get(favorites::list_ids::<S>))
    .route(
      "/users/{user_id}/favorites/{accommodation_id}",
      get(favorites::check::<S>)
        .put(favorites::add::<S>)
        .delete(favorites::remove::<S>),
    )
    .route(
      "/users/{user_id}/favorites/{accommodation_id}/toggle",
      post(favorites::toggle::<S>),
    )
    .with_state(ApiState::new(store))
}

/// `GET /health`
async fn health() -> Json<Value> { Json(json!({ "status": "ok" })) }
