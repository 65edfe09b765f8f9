//! Shared fixtures for Restolist integration tests.
//!
//! Provides:
//! - Temporary database directories
//! - Seeding and reading the store by label
//! - Insert failure injection through a SQLite trigger

#![allow(dead_code)]

use restolist::model::Item;
use restolist::storage::{SavePolicy, Store, DB_FILE_NAME};
use rusqlite::Connection;
use std::path::PathBuf;
use tempfile::TempDir;

/// A throwaway restolist data directory holding one `Inventory.sqlite`.
///
/// Removed together with everything in it when the fixture drops.
pub struct TestFixture {
    /// Stands in for the per-user data dir (`--data-dir`)
    pub temp_dir: TempDir,
    /// `Inventory.sqlite` inside `temp_dir`; not created until first use
    pub db_path: PathBuf,
}

impl TestFixture {
    /// Fresh empty data dir with test tracing installed.
    pub fn new() -> Self {
        restolist::observability::tracing::init_test_tracing();
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let db_path = temp_dir.path().join(DB_FILE_NAME);
        Self { temp_dir, db_path }
    }

    /// Store with the default (atomic) save policy.
    pub fn store(&self) -> Store {
        Store::new(&self.db_path)
    }

    /// Store with an explicit save policy.
    pub fn store_with(&self, policy: SavePolicy) -> Store {
        Store::new(&self.db_path).with_policy(policy)
    }

    /// Replace the persisted list with `labels`.
    pub fn seed(&self, labels: &[&str]) {
        self.store()
            .save(&items(labels))
            .expect("failed to seed store");
    }

    /// Labels currently on disk.
    pub fn stored_labels(&self) -> Vec<String> {
        labels_of(&self.store().load().expect("failed to load store"))
    }

    /// Make every insert of `label` fail until the trigger is dropped.
    pub fn fail_inserts_of(&self, label: &str) {
        self.store().ensure_schema().expect("failed to create schema");
        let conn = Connection::open(&self.db_path).expect("failed to open db");
        conn.execute_batch(&format!(
            "CREATE TRIGGER fail_insert BEFORE INSERT ON Items \
             WHEN NEW.shortDisc = '{}' \
             BEGIN SELECT RAISE(ABORT, 'injected insert failure'); END;",
            label.replace('\'', "''")
        ))
        .expect("failed to create trigger");
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Fresh items for `labels`.
pub fn items(labels: &[&str]) -> Vec<Item> {
    labels.iter().map(|l| Item::new(*l)).collect()
}

/// Labels of `items`, in order.
pub fn labels_of(items: &[Item]) -> Vec<String> {
    items.iter().map(|i| i.short_disc.clone()).collect()
}
