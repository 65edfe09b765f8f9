//! Full-rewrite persistence of the restaurant list.
//!
//! Every call opens its own connection and drops it before returning, on the
//! error paths too. Nothing is held between a load and the next save.

use clap::ValueEnum;
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::schema::{apply_pragmas, ensure_schema};
use crate::model::Item;

const SELECT_ITEMS: &str = "SELECT shortDisc FROM Items ORDER BY id ASC";
const DELETE_ITEMS: &str = "DELETE FROM Items";
const INSERT_ITEM: &str = "INSERT INTO Items (shortDisc) VALUES (?1)";

/// Error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to open database at {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("failed to create schema: {0}")]
    Schema(#[source] rusqlite::Error),

    #[error("failed to prepare {statement} statement: {source}")]
    Prepare {
        statement: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("failed to execute {statement} statement: {source}")]
    Execute {
        statement: &'static str,
        #[source]
        source: rusqlite::Error,
    },
}

/// How `save` applies its delete-then-insert sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SavePolicy {
    /// One transaction around the delete and all inserts. A failure rolls
    /// back to the previously persisted rows.
    #[default]
    Atomic,
    /// Each statement commits on its own. A failing insert leaves the delete
    /// applied and only the rows inserted before it.
    StatementWise,
}

/// SQLite-backed store for the item list.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
    policy: SavePolicy,
}

impl Store {
    /// Create a store for the database file at `path`.
    ///
    /// Nothing is opened until the first call.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            policy: SavePolicy::default(),
        }
    }

    /// Use the given save policy.
    #[must_use]
    pub fn with_policy(mut self, policy: SavePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn policy(&self) -> SavePolicy {
        self.policy
    }

    /// Open the database and create the table if needed.
    pub fn ensure_schema(&self) -> Result<(), StoreError> {
        self.open().map(drop)
    }

    /// Read every persisted item.
    ///
    /// Each row becomes an [`Item`] with a fresh identity. Rows are collected
    /// completely before returning, so a failure never yields a partial list.
    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> Result<Vec<Item>, StoreError> {
        let conn = self.open()?;
        let mut stmt = conn
            .prepare(SELECT_ITEMS)
            .map_err(|source| StoreError::Prepare {
                statement: "select",
                source,
            })?;

        let items = stmt
            .query_map([], |row| row.get::<_, Option<String>>(0))
            .and_then(|rows| {
                rows.map(|label| label.map(|l| Item::new(l.unwrap_or_default())))
                    .collect::<Result<Vec<_>, _>>()
            })
            .map_err(|source| StoreError::Execute {
                statement: "select",
                source,
            })?;

        tracing::debug!(count = items.len(), "Loaded items");
        Ok(items)
    }

    /// Replace the persisted list with `items`.
    ///
    /// Deletes every row, then inserts one row per item in order. Returns the
    /// number of rows written. Partial-failure behavior depends on the
    /// configured [`SavePolicy`].
    #[tracing::instrument(skip(self, items), fields(path = %self.path.display(), count = items.len()))]
    pub fn save(&self, items: &[Item]) -> Result<usize, StoreError> {
        let mut conn = self.open()?;

        let written = match self.policy {
            SavePolicy::Atomic => {
                let tx = conn.transaction().map_err(|source| StoreError::Execute {
                    statement: "begin",
                    source,
                })?;
                let written = rewrite(&tx, items)?;
                tx.commit().map_err(|source| StoreError::Execute {
                    statement: "commit",
                    source,
                })?;
                written
            }
            SavePolicy::StatementWise => rewrite(&conn, items)?,
        };

        tracing::debug!(written, policy = ?self.policy, "Saved items");
        Ok(written)
    }

    fn open(&self) -> Result<Connection, StoreError> {
        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .and_then(|conn| apply_pragmas(&conn).map(|()| conn))
        .map_err(|source| StoreError::Open {
            path: self.path.clone(),
            source,
        })?;

        ensure_schema(&conn).map_err(StoreError::Schema)?;
        Ok(conn)
    }
}

/// Delete all rows, then insert `items` in order.
fn rewrite(conn: &Connection, items: &[Item]) -> Result<usize, StoreError> {
    conn.prepare(DELETE_ITEMS)
        .map_err(|source| StoreError::Prepare {
            statement: "delete",
            source,
        })?
        .execute([])
        .map_err(|source| StoreError::Execute {
            statement: "delete",
            source,
        })?;

    let mut insert = conn
        .prepare(INSERT_ITEM)
        .map_err(|source| StoreError::Prepare {
            statement: "insert",
            source,
        })?;

    for (index, item) in items.iter().enumerate() {
        if let Err(source) = insert.execute([item.short_disc.as_str()]) {
            tracing::warn!(index, "Insert failed, stopping save");
            return Err(StoreError::Execute {
                statement: "insert",
                source,
            });
        }
    }

    Ok(items.len())
}
