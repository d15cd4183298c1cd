//! Core types, storage traits, and services for the Roost booking back end.
//!
//! This crate has no HTTP or database dependencies.
//! All other crates depend on it.

pub mod accommodation;
pub mod booking;
pub mod error;
pub mod favorite;
pub mod service;
pub mod store;

pub use error::{Error, Result};
