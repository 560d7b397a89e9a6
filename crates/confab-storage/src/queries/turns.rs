// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat turn operations.
//!
//! Turns are append-only. The row id is a fresh UUID and `created_at` comes
//! from the table default, so both are reported back via `RETURNING`.

use rusqlite::params;

use confab_core::ConfabError;
use confab_core::types::{ChatTurn, TurnRole};

use crate::database::Database;

/// Insert a new turn and return the stored row.
pub async fn insert_turn(
    db: &Database,
    user_id: &str,
    role: TurnRole,
    content: &str,
) -> Result<ChatTurn, ConfabError> {
    let id = uuid::Uuid::new_v4().to_string();
    let user_id = user_id.to_string();
    let content = content.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "INSERT INTO chat_history (id, user_id, role, content)
                 VALUES (?1, ?2, ?3, ?4)
                 RETURNING id, user_id, role, content, created_at",
                params![id, user_id, role.to_string(), content],
                turn_from_row,
            )
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get all turns for a user in chronological order.
///
/// `rowid` breaks ties between turns sharing a `created_at` millisecond, so
/// the order always matches insertion order.
pub async fn history_for_user(db: &Database, user_id: &str) -> Result<Vec<ChatTurn>, ConfabError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut turns = Vec::new();
            let mut stmt = conn.prepare(
                "SELECT id, user_id, role, content, created_at
                 FROM chat_history WHERE user_id = ?1
                 ORDER BY created_at ASC, rowid ASC",
            )?;
            let rows = stmt.query_map(params![user_id], turn_from_row)?;
            for row in rows {
                turns.push(row?);
            }
            Ok(turns)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

fn turn_from_row(row: &rusqlite::Row<'_>) -> Result<ChatTurn, rusqlite::Error> {
    let role: String = row.get(2)?;
    let role = role.parse::<TurnRole>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(ChatTurn {
        id: row.get(0)?,
        user_id: row.get(1)?,
        role,
        content: row.get(3)?,
        created_at: row.get(4)?,
    })
}
