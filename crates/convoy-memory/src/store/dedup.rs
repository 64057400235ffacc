//! Inbound de-duplication by provider message id.

use super::Store;
use convoy_core::error::ConvoyError;
use tracing::debug;

impl Store {
    /// Record a delivery. Returns `false` if this id was already processed.
    pub async fn mark_processed(
        &self,
        identity: &str,
        message_id: &str,
    ) -> Result<bool, ConvoyError> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO processed_messages (identity, message_id) VALUES (?, ?)",
        )
        .bind(identity)
        .bind(message_id)
        .execute(&self.pool)
        .await
        .map_err(|e| ConvoyError::Store(format!("dedup insert failed: {e}")))?;

        let first = result.rows_affected() == 1;
        if !first {
            debug!("[{identity}] duplicate delivery of {message_id}");
        }
        Ok(first)
    }

    /// Drop dedup records older than `days`. Returns rows removed.
    pub async fn prune_processed(&self, days: u32) -> Result<u64, ConvoyError> {
        let result = sqlx::query(
            "DELETE FROM processed_messages WHERE received_at < datetime('now', ?)",
        )
        .bind(format!("-{days} days"))
        .execute(&self.pool)
        .await
        .map_err(|e| ConvoyError::Store(format!("dedup prune failed: {e}")))?;
        Ok(result.rows_affected())
    }
}
