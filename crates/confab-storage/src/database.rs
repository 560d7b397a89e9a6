// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Async SQLite connection handle.
//!
//! Wraps `tokio_rusqlite::Connection` and owns database setup: journal
//! mode, per-connection pragmas, and running embedded migrations.

use tokio_rusqlite::Connection;
use tracing::debug;

use confab_core::ConfabError;

/// Handle to an open SQLite database.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `path`, applying pragmas and pending migrations.
    ///
    /// Journal mode and migrations run on a blocking connection first; WAL
    /// mode persists in the database file, so the async connection inherits it.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, ConfabError> {
        let setup_path = path.to_string();
        tokio::task::spawn_blocking(move || -> Result<(), ConfabError> {
            let mut conn = rusqlite::Connection::open(&setup_path).map_err(map_sq_err)?;
            if wal_mode {
                conn.execute_batch("PRAGMA journal_mode=WAL;")
                    .map_err(map_sq_err)?;
            }
            crate::migrations::run_migrations(&mut conn)
        })
        .await
        .map_err(|e| ConfabError::Internal(format!("storage setup task failed: {e}")))??;

        let conn = Connection::open(path).await.map_err(map_sq_err)?;
        conn.call(|conn| -> Result<(), rusqlite::Error> {
            conn.execute_batch(
                "PRAGMA synchronous=NORMAL;
                 PRAGMA foreign_keys=ON;
                 PRAGMA busy_timeout=5000;",
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        debug!(path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    /// Returns the underlying async connection for query modules.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Checkpoint the WAL into the main database file.
    ///
    /// Safe to call on databases without WAL; the pragma is a no-op there.
    pub async fn close(&self) -> Result<(), ConfabError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

/// Convert a `tokio_rusqlite` error into the storage error variant.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error) -> ConfabError {
    ConfabError::Storage {
        source: Box::new(e),
    }
}

/// Convert a bare `rusqlite` error into the storage error variant.
pub(crate) fn map_sq_err(e: rusqlite::Error) -> ConfabError {
    ConfabError::Storage {
        source: Box::new(e),
    }
}
