//! Restolist: a personal restaurant list with SQLite persistence.
//!
//! The list lives in memory while the application is active and is flushed to
//! a single-table SQLite database when it goes to the background.
//!
//! # Architecture
//!
//! - **Load on activate**: the in-memory list is replaced wholesale by the rows on disk
//! - **Rewrite on deactivate**: the table is cleared and every item re-inserted
//! - **Atomic by default**: the rewrite runs in one transaction unless configured otherwise
//! - **Observable**: structured `tracing` events for every load and save
//!
//! # Modules
//!
//! - [`config`]: CLI and environment configuration
//! - [`lifecycle`]: Foreground/background hooks driving the store
//! - [`model`]: Items and the ordered in-memory list
//! - [`observability`]: Tracing setup
//! - [`search`]: Random map search for a listed restaurant
//! - [`session`]: Interactive line-oriented front end
//! - [`storage`]: SQLite persistence layer

// Lint configuration
#![warn(clippy::all)]
#![allow(
    clippy::module_name_repetitions,    // storage::store::StoreError is fine
    clippy::must_use_candidate,         // Not all functions need #[must_use]
    clippy::missing_errors_doc,         // Error docs can be verbose
    clippy::missing_panics_doc,         // Panic docs can be verbose
    clippy::needless_raw_string_hashes  // r#""# is fine for SQL
)]

pub mod config;
pub mod lifecycle;
pub mod model;
pub mod observability;
pub mod search;
pub mod session;
pub mod storage;

use uuid::Uuid;

/// Generate a new UUIDv7 (time-sortable) item ID.
///
/// IDs only live for the current process; they are never written to disk.
///
/// # Example
///
/// ```
/// let a = restolist::generate_item_id();
/// let b = restolist::generate_item_id();
/// assert_ne!(a, b);
/// ```
#[must_use]
pub fn generate_item_id() -> Uuid {
    Uuid::now_v7()
}
