//! Gateway: turns one inbound message into at most one business action.
//!
//! Includes: de-duplication, account linking, voice transcription,
//! input sanitization, the resolver cascade, dispatch to action handlers
//! and audit logging. The gateway holds no per-identity state of its own;
//! everything durable lives behind [`ConversationStore`].

mod confirmation;
mod contextual;
mod dispatch;
mod follow_up;
mod handlers;
mod keywords;
mod keywords_data;
mod pipeline;
mod replies;

#[cfg(test)]
mod tests;

pub use confirmation::ConfirmationEvent;
pub use replies::ReplyChooser;

use crate::commands::Command;
use convoy_channels::voice::VoicePipeline;
use convoy_core::{
    config::{AuthConfig, DialogueConfig},
    conversation::HistoryEntry,
    error::{ConvoyError, MediaError},
    intent::Intent,
    message::OutboundPayload,
    traits::{AccountDirectory, ActionHandler, Channel, ConversationStore, IntentClassifier},
};
use convoy_memory::audit::{AuditEntry, AuditLogger, AuditStatus};
use std::sync::Arc;
use tracing::warn;

/// The central gateway between the channel, the store and the collaborators.
pub struct Gateway {
    pub(super) store: Arc<dyn ConversationStore>,
    pub(super) channel: Arc<dyn Channel>,
    pub(super) classifier: Arc<dyn IntentClassifier>,
    pub(super) actions: Arc<dyn ActionHandler>,
    pub(super) accounts: Arc<dyn AccountDirectory>,
    pub(super) voice: Option<Arc<VoicePipeline>>,
    pub(super) audit: Option<AuditLogger>,
    pub(super) auth_config: AuthConfig,
    pub(super) dialogue: DialogueConfig,
    /// Classifications below this are handled as out of scope.
    pub(super) min_confidence: f32,
    pub(super) replies: ReplyChooser,
}

impl Gateway {
    /// Create a new gateway.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: Arc<dyn ConversationStore>,
        channel: Arc<dyn Channel>,
        classifier: Arc<dyn IntentClassifier>,
        actions: Arc<dyn ActionHandler>,
        accounts: Arc<dyn AccountDirectory>,
        auth_config: AuthConfig,
        dialogue: DialogueConfig,
        min_confidence: f32,
    ) -> Self {
        let replies = ReplyChooser::new(dialogue.reply_seed);
        Self {
            store,
            channel,
            classifier,
            actions,
            accounts,
            voice: None,
            audit: None,
            auth_config,
            dialogue,
            min_confidence,
            replies,
        }
    }

    /// Enable voice notes.
    pub fn with_voice(mut self, voice: Arc<VoicePipeline>) -> Self {
        self.voice = Some(voice);
        self
    }

    /// Write one audit row per processed message.
    pub fn with_audit(mut self, audit: AuditLogger) -> Self {
        self.audit = Some(audit);
        self
    }

    pub fn channel_name(&self) -> &str {
        self.channel.name()
    }
}

/// Which resolver produced the intent that was dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolver {
    Classifier,
    Contextual,
    FollowUp,
    Retry,
    Confirmation,
}

/// How an action handler call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchResult {
    Completed,
    /// Completed, and the handler asked the user to confirm something.
    AwaitingConfirmation,
    /// Business-rule failure; stored as `last_error` for a later retry.
    Rejected,
    /// The handler could not be reached or answered garbage.
    Failed,
    /// No handler exists for the intent.
    NotSupported,
}

/// The three out-of-scope reply families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutOfScope {
    Greeting,
    ChitChat,
    Unclear,
}

/// Terminal branch reached by one inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Provider redelivery of a message already processed.
    Duplicate,
    /// Identity is not linked to an account.
    Denied,
    VoiceFailed(MediaError),
    Unsupported(String),
    Command(Command),
    Compliment,
    Confirmation(ConfirmationEvent),
    /// "no" to a pending yes/no question.
    Declined,
    RetryExhausted,
    OutOfScope(OutOfScope),
    Dispatched {
        intent: Intent,
        via: Resolver,
        result: DispatchResult,
    },
    /// Infrastructure failure before a reply could be produced.
    Failed,
}

impl Outcome {
    /// Label stored in the audit log.
    pub fn branch(&self) -> &'static str {
        match self {
            Self::Duplicate => "duplicate",
            Self::Denied => "denied",
            Self::VoiceFailed(_) => "voice_failed",
            Self::Unsupported(_) => "unsupported",
            Self::Command(Command::Help) => "help",
            Self::Command(Command::Menu) => "menu",
            Self::Compliment => "compliment",
            Self::Confirmation(_) => "confirmation",
            Self::Declined => "declined",
            Self::RetryExhausted => "retry_exhausted",
            Self::OutOfScope(_) => "out_of_scope",
            Self::Dispatched {
                result: DispatchResult::NotSupported,
                ..
            } => "not_supported",
            Self::Dispatched { .. } => "dispatched",
            Self::Failed => "failed",
        }
    }

    fn audit_status(&self) -> AuditStatus {
        match self {
            Self::Duplicate => AuditStatus::Duplicate,
            Self::Denied => AuditStatus::Denied,
            Self::Failed
            | Self::Dispatched {
                result: DispatchResult::Failed,
                ..
            } => AuditStatus::Error,
            _ => AuditStatus::Ok,
        }
    }
}

/// Per-message scratch data: who we are talking to and what was said.
pub(super) struct Turn {
    pub identity: String,
    pub sender_name: Option<String>,
    pub message_id: Option<String>,
    pub language: String,
    pub input: String,
    pub output: Vec<String>,
    pub intent: Option<Intent>,
    pub denial: Option<String>,
    /// A terminal reply went out. Acks do not count.
    pub replied: bool,
}

impl Gateway {
    /// Send payloads without touching history (acks, denials, failures).
    pub(super) async fn send_only(&self, turn: &mut Turn, payloads: &[OutboundPayload]) {
        for payload in payloads {
            if let Err(e) = self.channel.send(&turn.identity, payload).await {
                warn!("[{}] failed to send reply: {e}", turn.identity);
            }
            turn.output.push(payload.summary());
        }
    }

    /// Send the terminal reply and record it as the one assistant entry
    /// for this message.
    pub(super) async fn reply(
        &self,
        turn: &mut Turn,
        payloads: Vec<OutboundPayload>,
        intent: Option<Intent>,
    ) -> Result<(), ConvoyError> {
        self.send_only(turn, &payloads).await;
        turn.replied = true;
        let text = payloads
            .iter()
            .map(OutboundPayload::summary)
            .collect::<Vec<_>>()
            .join("\n");
        self.store
            .append_history(&turn.identity, &HistoryEntry::assistant(&text, intent))
            .await
    }

    pub(super) async fn reply_text(
        &self,
        turn: &mut Turn,
        text: impl Into<String>,
        intent: Option<Intent>,
    ) -> Result<(), ConvoyError> {
        self.reply(turn, vec![OutboundPayload::text(text)], intent)
            .await
    }

    /// Best-effort audit row. Failures are logged and otherwise ignored.
    pub(super) async fn audit(&self, turn: &Turn, outcome: &Outcome, channel: &str, ms: i64) {
        let Some(ref audit) = self.audit else {
            return;
        };
        let entry = AuditEntry {
            channel: channel.to_string(),
            identity: turn.identity.clone(),
            sender_name: turn.sender_name.clone(),
            message_id: turn.message_id.clone(),
            input_text: turn.input.clone(),
            output_text: if turn.output.is_empty() {
                None
            } else {
                Some(turn.output.join("\n"))
            },
            intent: turn.intent.map(|i| i.as_str().to_string()),
            branch: Some(outcome.branch().to_string()),
            processing_ms: Some(ms),
            status: outcome.audit_status(),
            denial_reason: turn.denial.clone(),
        };
        if let Err(e) = audit.log(&entry).await {
            warn!("audit log failed: {e}");
        }
    }
}
