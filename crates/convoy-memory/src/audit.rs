//! Audit log: one row per processed inbound message.

use convoy_core::error::ConvoyError;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

/// An entry to write to the audit log.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub channel: String,
    pub identity: String,
    pub sender_name: Option<String>,
    pub message_id: Option<String>,
    pub input_text: String,
    pub output_text: Option<String>,
    /// Resolved intent wire name, when one was reached.
    pub intent: Option<String>,
    /// Terminal pipeline branch (e.g. `dispatched`, `help`, `out_of_scope`).
    pub branch: Option<String>,
    pub processing_ms: Option<i64>,
    pub status: AuditStatus,
    pub denial_reason: Option<String>,
}

/// Status of an audited interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditStatus {
    Ok,
    Error,
    Denied,
    Duplicate,
}

impl AuditStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Error => "error",
            Self::Denied => "denied",
            Self::Duplicate => "duplicate",
        }
    }
}

/// Audit logger backed by SQLite.
#[derive(Clone)]
pub struct AuditLogger {
    pool: SqlitePool,
}

impl AuditLogger {
    /// Create a new audit logger sharing the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Write an entry to the audit log.
    pub async fn log(&self, entry: &AuditEntry) -> Result<(), ConvoyError> {
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            "INSERT INTO audit_log \
             (id, channel, identity, sender_name, message_id, input_text, output_text, \
              intent, branch, processing_ms, status, denial_reason) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&entry.channel)
        .bind(&entry.identity)
        .bind(&entry.sender_name)
        .bind(&entry.message_id)
        .bind(&entry.input_text)
        .bind(&entry.output_text)
        .bind(&entry.intent)
        .bind(&entry.branch)
        .bind(entry.processing_ms)
        .bind(entry.status.as_str())
        .bind(&entry.denial_reason)
        .execute(&self.pool)
        .await
        .map_err(|e| ConvoyError::Store(format!("audit log write failed: {e}")))?;

        debug!(
            "audit: {} {} [{}] {}",
            entry.channel,
            entry.identity,
            entry.status.as_str(),
            truncate(&entry.input_text, 80)
        );

        Ok(())
    }

    /// Count rows per status, for `convoy status`.
    pub async fn status_counts(&self) -> Result<Vec<(String, i64)>, ConvoyError> {
        sqlx::query_as("SELECT status, COUNT(*) FROM audit_log GROUP BY status ORDER BY status")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ConvoyError::Store(format!("audit query failed: {e}")))
    }
}

fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        s
    } else {
        let mut end = max;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        &s[..end]
    }
}
