//! Per-identity conversation rows.

use super::Store;
use chrono::{DateTime, SecondsFormat, Utc};
use convoy_core::{
    conversation::{AwaitingInput, ConversationSeed, ConversationState, StatePatch},
    error::ConvoyError,
    intent::{Entities, Intent},
};
use sqlx::{QueryBuilder, Sqlite};
use tracing::{debug, warn};

type ConversationRow = (
    String,         // identity
    String,         // tenant_id
    String,         // user_id
    Option<String>, // current_intent
    Option<String>, // last_intent
    i64,            // awaiting_confirmation
    Option<String>, // awaiting_input
    String,         // pending_artifact_data
    Option<String>, // last_error
    i64,            // retry_count
    Option<String>, // last_artifact_id
    Option<String>, // last_counterparty_name
    String,         // language
    String,         // updated_at
);

/// Timestamps are stored as fixed-width RFC 3339 so string order is time order.
pub(super) fn now_stamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(super) fn parse_stamp(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|d| d.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn parse_intent(s: Option<String>) -> Option<Intent> {
    s.and_then(|v| v.parse().ok())
}

fn row_to_state(row: ConversationRow) -> ConversationState {
    let (
        identity,
        tenant_id,
        user_id,
        current_intent,
        last_intent,
        awaiting_confirmation,
        awaiting_input,
        pending_json,
        last_error,
        retry_count,
        last_artifact_id,
        last_counterparty_name,
        language,
        updated_at,
    ) = row;

    let pending_artifact_data: Entities = serde_json::from_str(&pending_json).unwrap_or_else(|e| {
        warn!("[{identity}] unreadable pending_artifact_data, treating as empty: {e}");
        Entities::new()
    });

    ConversationState {
        identity,
        tenant_id,
        user_id,
        current_intent: parse_intent(current_intent),
        last_intent: parse_intent(last_intent),
        awaiting_confirmation: awaiting_confirmation != 0,
        awaiting_input: awaiting_input.as_deref().and_then(AwaitingInput::parse),
        pending_artifact_data,
        last_error,
        retry_count: retry_count.max(0) as u32,
        last_artifact_id,
        last_counterparty_name,
        history: Vec::new(),
        language,
        updated_at: parse_stamp(&updated_at),
    }
}

impl Store {
    /// Load a conversation with its history, if the identity is known.
    pub async fn get_conversation(
        &self,
        identity: &str,
    ) -> Result<Option<ConversationState>, ConvoyError> {
        let row: Option<ConversationRow> = sqlx::query_as(
            "SELECT identity, tenant_id, user_id, current_intent, last_intent, \
             awaiting_confirmation, awaiting_input, pending_artifact_data, last_error, \
             retry_count, last_artifact_id, last_counterparty_name, language, updated_at \
             FROM conversations WHERE identity = ?",
        )
        .bind(identity)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ConvoyError::Store(format!("query failed: {e}")))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut state = row_to_state(row);
        state.history = self.load_history(identity).await?;
        Ok(Some(state))
    }

    /// Insert a fresh row unless one exists, then return the stored state.
    pub async fn create_conversation(
        &self,
        identity: &str,
        seed: &ConversationSeed,
    ) -> Result<ConversationState, ConvoyError> {
        let now = now_stamp();
        let result = sqlx::query(
            "INSERT OR IGNORE INTO conversations \
             (identity, tenant_id, user_id, language, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(identity)
        .bind(&seed.tenant_id)
        .bind(&seed.user_id)
        .bind(&seed.language)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| ConvoyError::Store(format!("insert failed: {e}")))?;

        if result.rows_affected() > 0 {
            debug!("[{identity}] conversation created (tenant {})", seed.tenant_id);
        }

        self.get_conversation(identity)
            .await?
            .ok_or_else(|| ConvoyError::Store(format!("conversation for {identity} vanished")))
    }

    /// Field-level update. Only the fields present in the patch are written,
    /// so concurrent patches touching different fields do not clobber each
    /// other. Returns the number of rows touched (0 = unknown identity).
    pub async fn update_conversation(
        &self,
        identity: &str,
        patch: &StatePatch,
    ) -> Result<u64, ConvoyError> {
        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new("UPDATE conversations SET updated_at = MAX(updated_at, ");
        qb.push_bind(now_stamp());
        qb.push(")");

        if let Some(v) = patch.current_intent {
            qb.push(", current_intent = ")
                .push_bind(v.map(|i| i.as_str()));
        }
        if let Some(v) = patch.last_intent {
            qb.push(", last_intent = ").push_bind(v.map(|i| i.as_str()));
        }
        if let Some(v) = patch.awaiting_confirmation {
            qb.push(", awaiting_confirmation = ").push_bind(v as i64);
        }
        if let Some(v) = patch.awaiting_input {
            qb.push(", awaiting_input = ")
                .push_bind(v.map(|a| a.as_str()));
        }
        if let Some(ref v) = patch.pending_artifact_data {
            let json = serde_json::to_string(v)
                .map_err(|e| ConvoyError::Store(format!("serialize failed: {e}")))?;
            qb.push(", pending_artifact_data = ").push_bind(json);
        }
        if let Some(ref v) = patch.last_error {
            qb.push(", last_error = ").push_bind(v.clone());
        }
        if let Some(v) = patch.retry_count {
            qb.push(", retry_count = ").push_bind(v as i64);
        }
        if let Some(ref v) = patch.last_artifact_id {
            qb.push(", last_artifact_id = ").push_bind(v.clone());
        }
        if let Some(ref v) = patch.last_counterparty_name {
            qb.push(", last_counterparty_name = ").push_bind(v.clone());
        }
        if let Some(ref v) = patch.language {
            qb.push(", language = ").push_bind(v.clone());
        }

        qb.push(" WHERE identity = ").push_bind(identity.to_string());

        let result = qb
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| ConvoyError::Store(format!("update failed: {e}")))?;

        Ok(result.rows_affected())
    }

    /// Number of known identities.
    pub async fn count_conversations(&self) -> Result<i64, ConvoyError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM conversations")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| ConvoyError::Store(format!("count failed: {e}")))?;
        Ok(count)
    }
}
