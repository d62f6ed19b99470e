//! SQLite-based snapshot storage.
//!
//! The engine state is kept as a single JSON row so that each save replaces
//! the previous snapshot in one transaction.

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};

use super::{data_dir, migrations, SnapshotStore};
use crate::error::StoreError;
use crate::progression::{EngineSnapshot, SNAPSHOT_VERSION};

/// SQLite database holding the progression snapshot.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `~/.config/steppet/steppet.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StoreError> {
        let dir = data_dir().map_err(|e| StoreError::QueryFailed(e.to_string()))?;
        Self::open_at(&dir.join("steppet.db"))
    }

    /// Open (or create) the database at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::with_connection(conn)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        migrations::migrate(&conn)?;
        Ok(Self { conn })
    }
}

impl SnapshotStore for Database {
    fn load(&self) -> Result<Option<EngineSnapshot>, StoreError> {
        let row = self
            .conn
            .query_row(
                "SELECT version, body FROM progression_snapshot WHERE id = 1",
                [],
                |row| Ok((row.get::<_, u32>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;

        let Some((version, body)) = row else {
            return Ok(None);
        };
        if version > SNAPSHOT_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: version,
                supported: SNAPSHOT_VERSION,
            });
        }

        let snapshot: EngineSnapshot =
            serde_json::from_str(&body).map_err(|e| StoreError::Corrupt(e.to_string()))?;
        Ok(Some(snapshot))
    }

    fn save(&mut self, snapshot: &EngineSnapshot) -> Result<(), StoreError> {
        let body =
            serde_json::to_string(snapshot).map_err(|e| StoreError::Corrupt(e.to_string()))?;

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT OR REPLACE INTO progression_snapshot (id, version, body, saved_at, last_known_day)
             VALUES (1, ?1, ?2, ?3, ?4)",
            params![
                snapshot.version,
                body,
                snapshot.saved_at.to_rfc3339(),
                snapshot.last_known_day.to_string(),
            ],
        )?;
        tx.commit()?;
        tracing::debug!(day = %snapshot.last_known_day, "snapshot saved");
        Ok(())
    }
}
