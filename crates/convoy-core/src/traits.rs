use crate::{
    conversation::{ConversationSeed, ConversationState, HistoryEntry, StatePatch},
    error::{ConvoyError, MediaError},
    intent::{Classification, Entities, Intent},
    message::OutboundPayload,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Messaging channel: the only way replies leave the engine.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Human-readable channel name.
    fn name(&self) -> &str;

    /// Deliver one payload to an identity.
    async fn send(&self, identity: &str, payload: &OutboundPayload) -> Result<(), ConvoyError>;
}

/// Intent classifier: text in, `(intent, confidence, entities)` out.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    async fn classify(&self, text: &str, language: &str) -> Result<Classification, ConvoyError>;
}

/// What an action handler knows about the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionContext {
    pub identity: String,
    pub tenant_id: String,
    pub user_id: String,
    pub language: String,
    /// Artifact the intent targets, when resolved from conversation state.
    #[serde(default)]
    pub artifact_id: Option<String>,
    /// Set when re-dispatching after the user accepted a yes/no confirmation.
    #[serde(default)]
    pub confirmed: bool,
}

/// Which confirmation sub-dialogue a handler wants to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationKind {
    /// Previewed artifact: confirm / edit / send / cancel.
    Preview,
    /// Plain yes/no before a destructive or costly action.
    YesNo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmationRequest {
    pub kind: ConfirmationKind,
    pub artifact_id: String,
}

/// Successful handler reply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionReply {
    #[serde(default)]
    pub payloads: Vec<OutboundPayload>,
    /// Artifact produced or touched; becomes `last_artifact_id`.
    #[serde(default)]
    pub artifact_id: Option<String>,
    /// Counterparty involved; becomes `last_counterparty_name`.
    #[serde(default)]
    pub counterparty: Option<String>,
    #[serde(default)]
    pub confirmation: Option<ConfirmationRequest>,
}

impl ActionReply {
    pub fn text(body: impl Into<String>) -> Self {
        Self {
            payloads: vec![OutboundPayload::text(body)],
            ..Self::default()
        }
    }
}

/// Result of a business action.
///
/// `Rejected` is a business-rule failure the user can act on. Infrastructure
/// failures come back as `Err` instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ActionOutcome {
    Completed(ActionReply),
    Rejected {
        reason: String,
        #[serde(default)]
        hint: Option<String>,
    },
}

/// Business operations behind the chat.
#[async_trait]
pub trait ActionHandler: Send + Sync {
    async fn handle(
        &self,
        intent: Intent,
        entities: &Entities,
        ctx: &ActionContext,
    ) -> Result<ActionOutcome, ConvoyError>;
}

/// Linked business account for a channel identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub tenant_id: String,
    pub user_id: String,
    #[serde(default)]
    pub language: Option<String>,
}

#[async_trait]
pub trait AccountDirectory: Send + Sync {
    /// `Ok(None)` means the identity is not linked to any account.
    async fn lookup(&self, identity: &str) -> Result<Option<Account>, ConvoyError>;
}

/// Short-lived download location returned by the media resolve step.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaLocation {
    pub url: String,
    pub mime_type: Option<String>,
    pub file_size: Option<u64>,
}

/// Two-step media retrieval: resolve an id, then fetch the bytes.
#[async_trait]
pub trait MediaSource: Send + Sync {
    async fn resolve(&self, media_id: &str) -> Result<MediaLocation, MediaError>;
    async fn fetch(&self, location: &MediaLocation) -> Result<Vec<u8>, MediaError>;
}

/// Speech-to-text.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio: Vec<u8>, mime_type: &str) -> Result<String, MediaError>;
}

/// Durable per-identity conversation state.
///
/// Every call is keyed by identity. Implementations must make
/// `append_history` safe under concurrent callers.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    async fn get(&self, identity: &str) -> Result<Option<ConversationState>, ConvoyError>;

    async fn create_if_absent(
        &self,
        identity: &str,
        seed: &ConversationSeed,
    ) -> Result<ConversationState, ConvoyError>;

    async fn apply_patch(&self, identity: &str, patch: &StatePatch) -> Result<(), ConvoyError>;

    /// Append and evict from the front past the history limit.
    async fn append_history(&self, identity: &str, entry: &HistoryEntry)
        -> Result<(), ConvoyError>;

    /// Oldest first.
    async fn history(&self, identity: &str) -> Result<Vec<HistoryEntry>, ConvoyError>;

    /// Record a provider message id. `true` only for the first delivery.
    async fn claim_message(&self, identity: &str, message_id: &str) -> Result<bool, ConvoyError>;

    /// Clear transient fields. Returns false when the identity is unknown.
    async fn reset(&self, identity: &str) -> Result<bool, ConvoyError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_outcome_wire_format() {
        let done: ActionOutcome = serde_json::from_value(serde_json::json!({
            "status": "completed",
            "payloads": [{"type": "text", "body": "Draft INV-7 ready"}],
            "artifact_id": "INV-7",
            "confirmation": {"kind": "preview", "artifact_id": "INV-7"}
        }))
        .unwrap();
        match done {
            ActionOutcome::Completed(reply) => {
                assert_eq!(reply.artifact_id.as_deref(), Some("INV-7"));
                assert_eq!(reply.payloads.len(), 1);
                assert_eq!(
                    reply.confirmation.unwrap().kind,
                    ConfirmationKind::Preview
                );
            }
            other => panic!("expected completed, got {other:?}"),
        }

        let rejected: ActionOutcome = serde_json::from_value(serde_json::json!({
            "status": "rejected",
            "reason": "client 'Acme' not found"
        }))
        .unwrap();
        assert_eq!(
            rejected,
            ActionOutcome::Rejected {
                reason: "client 'Acme' not found".into(),
                hint: None
            }
        );
    }
}
