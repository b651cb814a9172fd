use std::fs;
use std::path::Path;
use std::time::Instant;

use log::{error, info};
use rusqlite::Connection;

use super::store::Store;
use crate::error::{CatalogError, CatalogResult};

impl Store {
    /// Open (or create) the catalog file at `path`, creating missing parent
    /// directories, and make sure the schema exists.
    pub fn open(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let started_at = Instant::now();
        let path = path.as_ref();
        info!(
            "event=store_open module=db status=start mode=file path={}",
            path.display()
        );

        if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| {
                error!("event=store_open module=db status=error mode=file error={source}");
                CatalogError::StorageDirectory {
                    path: parent.to_path_buf(),
                    source,
                }
            })?;
        }

        let conn = Connection::open(path).map_err(|err| {
            error!("event=store_open module=db status=error mode=file error={err}");
            CatalogError::StorageUnavailable(err)
        })?;
        let store = Self::from_connection(conn)?;

        info!(
            "event=store_open module=db status=ok mode=file duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(store)
    }

    /// Throwaway catalog used by tests and dry runs.
    pub fn open_in_memory() -> CatalogResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> CatalogResult<Self> {
        ensure_schema(&conn)?;
        Ok(Self { conn })
    }
}

/// Enable foreign keys and create both tables if they are missing. Safe to
/// run against an existing catalog: nothing is dropped or altered.
pub fn ensure_schema(conn: &Connection) -> CatalogResult<()> {
    conn.execute_batch(
        "PRAGMA foreign_keys = ON;

        CREATE TABLE IF NOT EXISTS artists (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            genre TEXT
        );

        CREATE TABLE IF NOT EXISTS songs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            release_date TEXT,
            bpm INTEGER,
            artist_id INTEGER NOT NULL,
            UNIQUE (title, artist_id),
            FOREIGN KEY(artist_id) REFERENCES artists(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS songs_artist_id ON songs(artist_id);",
    )
    .map_err(|err| {
        error!("event=schema_init module=db status=error error={err}");
        CatalogError::StorageUnavailable(err)
    })
}
