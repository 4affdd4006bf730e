//! `SQLite`-backed key-value store.
//!
//! Uses `r2d2` connection pooling with `r2d2_sqlite`; a connection
//! customizer applies WAL mode and durability pragmas on each new
//! connection. Values live in a single `kv` table.

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, OptionalExtension, params};

use super::KeyValueStore;
use crate::errors::Result;

/// Alias for the connection pool type.
pub type ConnectionPool = Pool<SqliteConnectionManager>;

/// Pragma customizer run on each new connection.
///
/// `synchronous = FULL`: queue writes must be on disk before the enqueue
/// call returns.
#[derive(Debug)]
struct PragmaCustomizer;

impl r2d2::CustomizeConnection<Connection, rusqlite::Error> for PragmaCustomizer {
    fn on_acquire(&self, conn: &mut Connection) -> std::result::Result<(), rusqlite::Error> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;\
             PRAGMA busy_timeout = 5000;\
             PRAGMA synchronous = FULL;",
        )
    }
}

/// Durable key-value store over a pooled `SQLite` database.
#[derive(Clone)]
pub struct SqliteStore {
    pool: ConnectionPool,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore").finish_non_exhaustive()
    }
}

impl SqliteStore {
    /// Open (and if needed create) a file-backed store.
    pub fn open(path: &str) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::builder()
            .max_size(4)
            .connection_timeout(std::time::Duration::from_secs(5))
            .connection_customizer(Box::new(PragmaCustomizer))
            .build(manager)?;
        let store = Self { pool };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory store.
    ///
    /// `SQLite` in-memory databases are per-connection, so the pool is
    /// capped at one connection.
    pub fn in_memory() -> Result<Self> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .connection_timeout(std::time::Duration::from_secs(5))
            .connection_customizer(Box::new(PragmaCustomizer))
            .build(manager)?;
        let store = Self { pool };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<()> {
        let conn = self.pool.get()?;
        let _ = conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (key TEXT PRIMARY KEY, value TEXT NOT NULL)",
            [],
        )?;
        Ok(())
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.pool.get()?;
        let value = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.pool.get()?;
        let _ = conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)\
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let conn = self.pool.get()?;
        let _ = conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_roundtrip() {
        let store = SqliteStore::in_memory().unwrap();
        assert_eq!(store.get("offlineQueue").unwrap(), None);

        store.put("offlineQueue", "[]").unwrap();
        assert_eq!(store.get("offlineQueue").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn put_replaces_existing_value() {
        let store = SqliteStore::in_memory().unwrap();
        store.put("k", "first").unwrap();
        store.put("k", "second").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn delete_removes_and_is_idempotent() {
        let store = SqliteStore::in_memory().unwrap();
        store.put("k", "v").unwrap();
        store.delete("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
        store.delete("k").unwrap();
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gather.db");
        let path = path.to_str().unwrap();

        {
            let store = SqliteStore::open(path).unwrap();
            store.put("offlineQueue", "[1,2,3]").unwrap();
        }

        let store = SqliteStore::open(path).unwrap();
        assert_eq!(
            store.get("offlineQueue").unwrap().as_deref(),
            Some("[1,2,3]")
        );
    }

    #[test]
    fn wal_mode_applied_on_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gather.db");
        let store = SqliteStore::open(path.to_str().unwrap()).unwrap();

        let conn = store.pool.get().unwrap();
        let mode: String = conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(mode, "wal");
    }
}
