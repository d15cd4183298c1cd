//! SQLite backend for the Roost catalog, booking ledger, and favorites.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime. Every closure passed to that
//! thread runs to completion before the next one starts, which is what makes
//! the ledger's check-then-write operations atomic.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
