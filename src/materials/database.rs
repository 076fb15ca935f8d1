//! SQLite-backed key-value store

use super::MaterialResult;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tracing::debug;

/// Key-value store persisting string values by key
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the store at `db_path`
    pub fn open<P: AsRef<Path>>(db_path: P) -> MaterialResult<Self> {
        debug!("Opening key-value store at {}", db_path.as_ref().display());
        let conn = Connection::open(db_path)?;
        let db = Self { conn };
        db.create_tables()?;
        Ok(db)
    }

    /// Store that lives only as long as the process
    pub fn in_memory() -> MaterialResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.create_tables()?;
        Ok(db)
    }

    fn create_tables(&self) -> MaterialResult<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> MaterialResult<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    pub fn set(&self, key: &str, value: &str) -> MaterialResult<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    /// Remove a key; returns whether it existed
    pub fn remove(&self, key: &str) -> MaterialResult<bool> {
        let removed = self.conn.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_overwrite_remove() {
        let db = Database::in_memory().unwrap();
        assert_eq!(db.get("missing").unwrap(), None);

        db.set("k", "one").unwrap();
        db.set("k", "two").unwrap();
        assert_eq!(db.get("k").unwrap().as_deref(), Some("two"));

        assert!(db.remove("k").unwrap());
        assert!(!db.remove("k").unwrap());
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.db");
        {
            let db = Database::open(&path).unwrap();
            db.set("k", "kept").unwrap();
        }
        let db = Database::open(&path).unwrap();
        assert_eq!(db.get("k").unwrap().as_deref(), Some("kept"));
    }
}
