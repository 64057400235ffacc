//! Per-identity dialogue state and the partial updates applied to it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::intent::{Entities, Intent};

/// Hard cap on stored history entries per identity.
pub const HISTORY_LIMIT: usize = 20;

/// Keys used inside `pending_artifact_data`.
pub mod pending {
    /// Artifact being confirmed (always present while awaiting confirmation).
    pub const ARTIFACT_ID: &str = "artifact_id";
    /// Intent to re-dispatch when a plain yes/no confirmation is accepted.
    pub const INTENT: &str = "intent";
    /// Entities captured alongside `INTENT`.
    pub const ENTITIES: &str = "entities";
    /// A call that failed while a confirmation was open, nested so the
    /// staged confirmation keys stay untouched.
    pub const FAILED_CALL: &str = "failed_call";
}

/// A handler call staged for a later retry.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedCall {
    pub intent: Intent,
    pub entities: Entities,
    pub artifact_id: Option<String>,
}

impl StagedCall {
    /// Read `INTENT`, `ENTITIES` and `ARTIFACT_ID` from one object.
    fn from_map(map: &Entities) -> Option<Self> {
        let intent = map
            .get(pending::INTENT)
            .and_then(|v| v.as_str())
            .and_then(|s| s.parse().ok())?;
        Some(Self {
            intent,
            entities: map
                .get(pending::ENTITIES)
                .and_then(|v| v.as_object())
                .cloned()
                .unwrap_or_default(),
            artifact_id: map
                .get(pending::ARTIFACT_ID)
                .and_then(|v| v.as_str())
                .map(String::from),
        })
    }
}

/// What kind of input the conversation is waiting for, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AwaitingInput {
    None,
    PendingArtifactDetails,
    AwaitingConfirmation,
    Retry,
    MediaUpload,
}

impl AwaitingInput {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::PendingArtifactDetails => "pending_artifact_details",
            Self::AwaitingConfirmation => "awaiting_confirmation",
            Self::Retry => "retry",
            Self::MediaUpload => "media_upload",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Self::None),
            "pending_artifact_details" => Some(Self::PendingArtifactDetails),
            "awaiting_confirmation" => Some(Self::AwaitingConfirmation),
            "retry" => Some(Self::Retry),
            "media_upload" => Some(Self::MediaUpload),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One line of conversation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub intent: Option<Intent>,
}

impl HistoryEntry {
    pub fn user(text: &str) -> Self {
        Self {
            role: Role::User,
            text: text.to_string(),
            timestamp: Utc::now(),
            intent: None,
        }
    }

    pub fn assistant(text: &str, intent: Option<Intent>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.to_string(),
            timestamp: Utc::now(),
            intent,
        }
    }
}

/// Durable dialogue state for one end-user identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    pub identity: String,
    pub tenant_id: String,
    pub user_id: String,
    pub current_intent: Option<Intent>,
    pub last_intent: Option<Intent>,
    pub awaiting_confirmation: bool,
    pub awaiting_input: Option<AwaitingInput>,
    pub pending_artifact_data: Entities,
    pub last_error: Option<String>,
    pub retry_count: u32,
    pub last_artifact_id: Option<String>,
    pub last_counterparty_name: Option<String>,
    /// Oldest first, at most [`HISTORY_LIMIT`] entries.
    pub history: Vec<HistoryEntry>,
    pub language: String,
    pub updated_at: DateTime<Utc>,
}

impl ConversationState {
    /// Fresh state for an identity seen for the first time.
    pub fn new(identity: &str, seed: &ConversationSeed) -> Self {
        Self {
            identity: identity.to_string(),
            tenant_id: seed.tenant_id.clone(),
            user_id: seed.user_id.clone(),
            current_intent: None,
            last_intent: None,
            awaiting_confirmation: false,
            awaiting_input: None,
            pending_artifact_data: Entities::new(),
            last_error: None,
            retry_count: 0,
            last_artifact_id: None,
            last_counterparty_name: None,
            history: Vec::new(),
            language: seed.language.clone(),
            updated_at: Utc::now(),
        }
    }

    /// True while a previewed artifact waits for confirm/edit/send/cancel.
    pub fn in_preview_confirmation(&self) -> bool {
        self.awaiting_input == Some(AwaitingInput::AwaitingConfirmation)
    }

    /// Artifact reference staged in `pending_artifact_data`.
    pub fn pending_artifact_id(&self) -> Option<&str> {
        self.pending_artifact_data
            .get(pending::ARTIFACT_ID)
            .and_then(|v| v.as_str())
    }

    /// Intent staged by a plain yes/no confirmation request.
    pub fn pending_intent(&self) -> Option<Intent> {
        self.pending_artifact_data
            .get(pending::INTENT)
            .and_then(|v| v.as_str())
            .and_then(|s| s.parse().ok())
    }

    /// The call a retry should re-run: the one nested under
    /// `FAILED_CALL` if present, otherwise the top-level staged call.
    pub fn retry_call(&self) -> Option<StagedCall> {
        self.pending_artifact_data
            .get(pending::FAILED_CALL)
            .and_then(|v| v.as_object())
            .and_then(StagedCall::from_map)
            .or_else(|| StagedCall::from_map(&self.pending_artifact_data))
    }

    /// Entities staged alongside [`Self::pending_intent`].
    pub fn pending_entities(&self) -> Entities {
        self.pending_artifact_data
            .get(pending::ENTITIES)
            .and_then(|v| v.as_object())
            .cloned()
            .unwrap_or_default()
    }
}

/// Values used when a conversation is created lazily.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversationSeed {
    pub tenant_id: String,
    pub user_id: String,
    pub language: String,
}

/// Partial update. `None` leaves a field untouched; for nullable fields
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatePatch {
    pub current_intent: Option<Option<Intent>>,
    pub last_intent: Option<Option<Intent>>,
    pub awaiting_confirmation: Option<bool>,
    pub awaiting_input: Option<Option<AwaitingInput>>,
    pub pending_artifact_data: Option<Entities>,
    pub last_error: Option<Option<String>>,
    pub retry_count: Option<u32>,
    pub last_artifact_id: Option<Option<String>>,
    pub last_counterparty_name: Option<Option<String>>,
    pub language: Option<String>,
}

impl StatePatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Leave the confirmation flow and drop staged data.
    pub fn clear_confirmation() -> Self {
        Self {
            awaiting_confirmation: Some(false),
            awaiting_input: Some(None),
            pending_artifact_data: Some(Entities::new()),
            ..Self::default()
        }
    }

    /// Everything `reset` wipes. History and identity fields survive.
    pub fn reset_transient() -> Self {
        Self {
            current_intent: Some(None),
            last_intent: Some(None),
            awaiting_confirmation: Some(false),
            awaiting_input: Some(None),
            pending_artifact_data: Some(Entities::new()),
            last_error: Some(None),
            retry_count: Some(0),
            last_artifact_id: Some(None),
            last_counterparty_name: Some(None),
            language: None,
        }
    }

    /// Apply to an in-memory copy, mirroring what the store does.
    pub fn apply_to(&self, state: &mut ConversationState) {
        if let Some(v) = self.current_intent {
            state.current_intent = v;
        }
        if let Some(v) = self.last_intent {
            state.last_intent = v;
        }
        if let Some(v) = self.awaiting_confirmation {
            state.awaiting_confirmation = v;
        }
        if let Some(v) = self.awaiting_input {
            state.awaiting_input = v;
        }
        if let Some(ref v) = self.pending_artifact_data {
            state.pending_artifact_data = v.clone();
        }
        if let Some(ref v) = self.last_error {
            state.last_error = v.clone();
        }
        if let Some(v) = self.retry_count {
            state.retry_count = v;
        }
        if let Some(ref v) = self.last_artifact_id {
            state.last_artifact_id = v.clone();
        }
        if let Some(ref v) = self.last_counterparty_name {
            state.last_counterparty_name = v.clone();
        }
        if let Some(ref v) = self.language {
            state.language = v.clone();
        }
        state.updated_at = Utc::now();
    }
}
