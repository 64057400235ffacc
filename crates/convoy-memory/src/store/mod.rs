//! SQLite-backed conversation store.
//!
//! Split into focused submodules:
//! - `conversations`: per-identity state (get, create, patch, reset)
//! - `history`: bounded, append-only dialogue history
//! - `dedup`: provider message ids already processed

mod conversations;
mod dedup;
mod history;

use async_trait::async_trait;
use convoy_core::{
    config::MemoryConfig,
    conversation::{ConversationSeed, ConversationState, HistoryEntry, StatePatch, HISTORY_LIMIT},
    error::ConvoyError,
    shellexpand,
    traits::ConversationStore,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::info;

/// Persistent conversation store backed by SQLite.
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
    history_limit: usize,
}

impl Store {
    /// Create a new store, running migrations on first use.
    ///
    /// `:memory:` opens a private in-memory database on a single connection.
    pub async fn new(config: &MemoryConfig) -> Result<Self, ConvoyError> {
        let in_memory = config.db_path == ":memory:";

        let (url, max_connections) = if in_memory {
            ("sqlite::memory:".to_string(), 1)
        } else {
            let db_path = shellexpand(&config.db_path);
            if let Some(parent) = std::path::Path::new(&db_path).parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| ConvoyError::Store(format!("failed to create data dir: {e}")))?;
            }
            (format!("sqlite:{db_path}"), 4)
        };

        let mut opts = SqliteConnectOptions::from_str(&url)
            .map_err(|e| ConvoyError::Store(format!("invalid db path: {e}")))?
            .create_if_missing(true);
        if !in_memory {
            opts = opts.journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(opts)
            .await
            .map_err(|e| ConvoyError::Store(format!("failed to connect to sqlite: {e}")))?;

        Self::run_migrations(&pool).await?;

        info!("Conversation store initialized at {}", config.db_path);

        Ok(Self {
            pool,
            history_limit: config.history_limit.clamp(1, HISTORY_LIMIT),
        })
    }

    /// Get a reference to the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Get the database file size in bytes.
    pub async fn db_size(&self) -> Result<u64, ConvoyError> {
        let (page_count,): (i64,) = sqlx::query_as("PRAGMA page_count")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| ConvoyError::Store(format!("pragma failed: {e}")))?;

        let (page_size,): (i64,) = sqlx::query_as("PRAGMA page_size")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| ConvoyError::Store(format!("pragma failed: {e}")))?;

        Ok((page_count * page_size) as u64)
    }

    /// Run SQL migrations, tracking which have already been applied.
    async fn run_migrations(pool: &SqlitePool) -> Result<(), ConvoyError> {
        sqlx::raw_sql(
            "CREATE TABLE IF NOT EXISTS _migrations (
                name TEXT PRIMARY KEY,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            );",
        )
        .execute(pool)
        .await
        .map_err(|e| ConvoyError::Store(format!("failed to create migrations table: {e}")))?;

        let migrations: &[(&str, &str)] = &[
            (
                "001_conversations",
                include_str!("../../migrations/001_conversations.sql"),
            ),
            (
                "002_history",
                include_str!("../../migrations/002_history.sql"),
            ),
            (
                "003_audit_log",
                include_str!("../../migrations/003_audit_log.sql"),
            ),
            (
                "004_processed_messages",
                include_str!("../../migrations/004_processed_messages.sql"),
            ),
        ];

        for (name, sql) in migrations {
            let applied: Option<(String,)> =
                sqlx::query_as("SELECT name FROM _migrations WHERE name = ?")
                    .bind(name)
                    .fetch_optional(pool)
                    .await
                    .map_err(|e| {
                        ConvoyError::Store(format!("failed to check migration {name}: {e}"))
                    })?;

            if applied.is_some() {
                continue;
            }

            sqlx::raw_sql(sql)
                .execute(pool)
                .await
                .map_err(|e| ConvoyError::Store(format!("migration {name} failed: {e}")))?;

            sqlx::query("INSERT INTO _migrations (name) VALUES (?)")
                .bind(name)
                .execute(pool)
                .await
                .map_err(|e| {
                    ConvoyError::Store(format!("failed to record migration {name}: {e}"))
                })?;
        }
        Ok(())
    }
}

#[async_trait]
impl ConversationStore for Store {
    async fn get(&self, identity: &str) -> Result<Option<ConversationState>, ConvoyError> {
        self.get_conversation(identity).await
    }

    async fn create_if_absent(
        &self,
        identity: &str,
        seed: &ConversationSeed,
    ) -> Result<ConversationState, ConvoyError> {
        self.create_conversation(identity, seed).await
    }

    async fn apply_patch(&self, identity: &str, patch: &StatePatch) -> Result<(), ConvoyError> {
        if self.update_conversation(identity, patch).await? == 0 {
            return Err(ConvoyError::Store(format!(
                "no conversation for identity {identity}"
            )));
        }
        Ok(())
    }

    async fn append_history(
        &self,
        identity: &str,
        entry: &HistoryEntry,
    ) -> Result<(), ConvoyError> {
        self.push_history(identity, entry).await
    }

    async fn history(&self, identity: &str) -> Result<Vec<HistoryEntry>, ConvoyError> {
        self.load_history(identity).await
    }

    async fn claim_message(&self, identity: &str, message_id: &str) -> Result<bool, ConvoyError> {
        self.mark_processed(identity, message_id).await
    }

    async fn reset(&self, identity: &str) -> Result<bool, ConvoyError> {
        let affected = self
            .update_conversation(identity, &StatePatch::reset_transient())
            .await?;
        if affected > 0 {
            info!("[{identity}] conversation reset");
        }
        Ok(affected > 0)
    }
}
