//! SQLite-backed snapshot slot.

use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;
use rusqlite::{params, Connection};

use super::{SnapshotError, SnapshotStore};

/// Key/value table in a SQLite file, one row per snapshot key.
pub struct SqliteSnapshotStore {
    conn: Mutex<Connection>,
}

impl SqliteSnapshotStore {
    /// Open (or create) the database file and its table.
    pub fn new(path: &Path) -> Result<Self, SnapshotError> {
        let conn = Connection::open(path).map_err(|e| SnapshotError::Storage(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self, SnapshotError> {
        let conn =
            Connection::open_in_memory().map_err(|e| SnapshotError::Storage(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), SnapshotError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS snapshots (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .map_err(|e| SnapshotError::Storage(e.to_string()))
    }

    fn conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>, SnapshotError> {
        self.conn
            .lock()
            .map_err(|_| SnapshotError::Storage("connection lock poisoned".to_string()))
    }
}

impl SnapshotStore for SqliteSnapshotStore {
    fn load(&self, key: &str) -> Result<Option<String>, SnapshotError> {
        let conn = self.conn()?;
        let result = conn.query_row(
            "SELECT value FROM snapshots WHERE key = ?",
            params![key],
            |row| row.get(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(SnapshotError::Storage(e.to_string())),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<(), SnapshotError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO snapshots (key, value, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().to_rfc3339()],
        )
        .map_err(|e| SnapshotError::Storage(e.to_string()))?;
        Ok(())
    }
}
