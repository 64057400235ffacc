//! Bounded dialogue history.
//!
//! Each append is an INSERT followed by a trim of the same identity, inside
//! one transaction. Nothing is read back first, so concurrent appends never
//! overwrite each other.

use super::conversations::{now_stamp, parse_stamp};
use super::Store;
use convoy_core::{
    conversation::{HistoryEntry, Role},
    error::ConvoyError,
};

impl Store {
    /// Append one entry and evict the oldest past `history_limit`.
    pub async fn push_history(
        &self,
        identity: &str,
        entry: &HistoryEntry,
    ) -> Result<(), ConvoyError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| ConvoyError::Store(format!("begin failed: {e}")))?;

        sqlx::query(
            "INSERT INTO history (identity, role, text, intent, timestamp) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(identity)
        .bind(entry.role.as_str())
        .bind(&entry.text)
        .bind(entry.intent.map(|i| i.as_str()))
        .bind(entry.timestamp.to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(|e| ConvoyError::Store(format!("history insert failed: {e}")))?;

        sqlx::query(
            "DELETE FROM history WHERE identity = ? AND id NOT IN \
             (SELECT id FROM history WHERE identity = ? ORDER BY id DESC LIMIT ?)",
        )
        .bind(identity)
        .bind(identity)
        .bind(self.history_limit as i64)
        .execute(&mut *tx)
        .await
        .map_err(|e| ConvoyError::Store(format!("history trim failed: {e}")))?;

        sqlx::query("UPDATE conversations SET updated_at = MAX(updated_at, ?) WHERE identity = ?")
            .bind(now_stamp())
            .bind(identity)
            .execute(&mut *tx)
            .await
            .map_err(|e| ConvoyError::Store(format!("touch failed: {e}")))?;

        tx.commit()
            .await
            .map_err(|e| ConvoyError::Store(format!("commit failed: {e}")))?;
        Ok(())
    }

    /// History for an identity, oldest first.
    pub async fn load_history(&self, identity: &str) -> Result<Vec<HistoryEntry>, ConvoyError> {
        let rows: Vec<(String, String, Option<String>, String)> = sqlx::query_as(
            "SELECT role, text, intent, timestamp FROM history \
             WHERE identity = ? ORDER BY id ASC",
        )
        .bind(identity)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ConvoyError::Store(format!("history query failed: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|(role, text, intent, timestamp)| HistoryEntry {
                role: if role == "assistant" {
                    Role::Assistant
                } else {
                    Role::User
                },
                text,
                timestamp: parse_stamp(&timestamp),
                intent: intent.and_then(|i| i.parse().ok()),
            })
            .collect())
    }
}
