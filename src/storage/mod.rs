//! SQLite storage layer for Restolist.
//!
//! Provides:
//! - Schema creation and per-connection settings
//! - Load-all and rewrite-all of the item list
//! - Atomic or statement-wise save policies

pub mod schema;
pub mod store;

pub use schema::DB_FILE_NAME;
pub use store::{SavePolicy, Store, StoreError};
