// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed store facade over the chat history database.

use tracing::debug;

use confab_config::model::StorageConfig;
use confab_core::ConfabError;
use confab_core::types::{ChatTurn, TurnRole};

use crate::database::Database;
use crate::queries;

/// Persistent, per-user chat history backed by SQLite.
///
/// All operations are scoped to a `user_id`; no operation can read or write
/// another user's turns.
pub struct ChatStore {
    db: Database,
}

impl ChatStore {
    /// Open the store at the configured path, creating parent directories
    /// and applying pending migrations.
    pub async fn open(config: &StorageConfig) -> Result<Self, ConfabError> {
        if let Some(parent) = std::path::Path::new(&config.database_path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfabError::Storage {
                source: Box::new(e),
            })?;
        }

        let db = Database::open(&config.database_path, config.wal_mode).await?;
        debug!(path = %config.database_path, "chat store opened");
        Ok(Self { db })
    }

    /// Append one turn to a user's history and return the stored row.
    pub async fn append_turn(
        &self,
        user_id: &str,
        role: TurnRole,
        content: &str,
    ) -> Result<ChatTurn, ConfabError> {
        queries::turns::insert_turn(&self.db, user_id, role, content).await
    }

    /// All turns for a user, oldest first.
    pub async fn history(&self, user_id: &str) -> Result<Vec<ChatTurn>, ConfabError> {
        queries::turns::history_for_user(&self.db, user_id).await
    }

    /// Verify the database answers queries.
    pub async fn health_check(&self) -> Result<(), ConfabError> {
        self.db
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)
    }

    /// Checkpoint the WAL before shutdown.
    pub async fn close(&self) -> Result<(), ConfabError> {
        self.db.close().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn make_config(path: &str) -> StorageConfig {
        StorageConfig {
            database_path: path.to_string(),
            wal_mode: true,
        }
    }

    #[tokio::test]
    async fn open_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("nested/dirs/store.db");
        let store = ChatStore::open(&make_config(db_path.to_str().unwrap()))
            .await
            .unwrap();
        assert!(db_path.exists());
        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn append_and_read_back() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("store.db");
        let store = ChatStore::open(&make_config(db_path.to_str().unwrap()))
            .await
            .unwrap();

        let user = store
            .append_turn("user-1", TurnRole::User, "hello")
            .await
            .unwrap();
        let model = store
            .append_turn("user-1", TurnRole::Model, "hi there")
            .await
            .unwrap();

        let history = store.history("user-1").await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0], user);
        assert_eq!(history[1], model);

        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn health_check_answers() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("health.db");
        let store = ChatStore::open(&make_config(db_path.to_str().unwrap()))
            .await
            .unwrap();
        store.health_check().await.unwrap();
        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn open_fails_for_unwritable_path() {
        let result = ChatStore::open(&make_config("/proc/confab/nope.db")).await;
        assert!(result.is_err());
    }
}
