//! Database schema and connection setup.
//!
//! A single table holds the list: an auto-incrementing row id and the label.
//! There is no version field; any change here is a breaking change.

use rusqlite::Connection;
use std::time::Duration;

/// File name of the database inside the data directory.
pub const DB_FILE_NAME: &str = "Inventory.sqlite";

const CREATE_ITEMS: &str =
    "CREATE TABLE IF NOT EXISTS Items (id INTEGER PRIMARY KEY AUTOINCREMENT, shortDisc VARCHAR)";

/// How long a connection waits on a locked database before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Apply per-connection settings.
pub fn apply_pragmas(conn: &Connection) -> rusqlite::Result<()> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    conn.pragma_update(None, "synchronous", "FULL")?;
    Ok(())
}

/// Create the items table if it does not exist yet.
///
/// Safe to call any number of times; existing rows are never touched.
pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(CREATE_ITEMS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_rows(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM Items", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_ensure_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        conn.execute("INSERT INTO Items (shortDisc) VALUES (?1)", ["Noodle Bar"])
            .unwrap();

        ensure_schema(&conn).unwrap();
        ensure_schema(&conn).unwrap();

        assert_eq!(count_rows(&conn), 1);
        let label: String = conn
            .query_row("SELECT shortDisc FROM Items", [], |row| row.get(0))
            .unwrap();
        assert_eq!(label, "Noodle Bar");
    }

    #[test]
    fn test_table_has_two_columns() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();

        let mut stmt = conn.prepare("PRAGMA table_info(Items)").unwrap();
        let columns: Vec<String> = stmt
            .query_map([], |row| row.get::<_, String>(1))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(columns, vec!["id", "shortDisc"]);
    }

    #[test]
    fn test_apply_pragmas() {
        let conn = Connection::open_in_memory().unwrap();
        apply_pragmas(&conn).unwrap();
        let sync: i64 = conn
            .query_row("PRAGMA synchronous", [], |row| row.get(0))
            .unwrap();
        assert_eq!(sync, 2); // FULL
    }
}
