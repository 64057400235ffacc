//! Message processing pipeline: the main `handle` flow.

use super::confirmation;
use super::contextual;
use super::follow_up;
use super::keywords::{detect_compliment, is_chit_chat, is_greeting};
use super::{Gateway, OutOfScope, Outcome, Resolver, Turn};
use crate::commands::Command;
use crate::i18n::{self, t, Family};
use convoy_core::{
    conversation::{ConversationSeed, ConversationState, HistoryEntry},
    error::{ConvoyError, MediaError},
    intent::{Classification, Entities, Intent},
    message::{InboundKind, InboundMessage, OutboundPayload},
    sanitize,
};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Characters of inbound text shown in logs.
const LOG_PREVIEW_CHARS: usize = 60;

/// A resolved intent ready for dispatch.
pub(super) struct Request {
    pub intent: Intent,
    pub entities: Entities,
    pub artifact_id: Option<String>,
    pub confirmed: bool,
}

impl Request {
    pub fn new(intent: Intent, entities: Entities) -> Self {
        Self {
            intent,
            entities,
            artifact_id: None,
            confirmed: false,
        }
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() > LOG_PREVIEW_CHARS {
        let truncated: String = text.chars().take(LOG_PREVIEW_CHARS).collect();
        format!("{truncated}...")
    } else {
        text.to_string()
    }
}

fn media_failure_key(err: &MediaError) -> &'static str {
    match err {
        MediaError::Unclear => "voice_unclear",
        MediaError::Corrupted(_) => "voice_corrupted",
        MediaError::Timeout(_) | MediaError::Transient(_) => "voice_timeout",
        MediaError::Unavailable(_) => "voice_unavailable",
    }
}

impl Gateway {
    /// Process a single inbound message through the full pipeline.
    ///
    /// Never fails: infrastructure errors become a "try later" reply so the
    /// webhook can always be acknowledged.
    pub async fn handle(&self, incoming: InboundMessage) -> Outcome {
        let started = Instant::now();
        let shown = incoming
            .kind
            .canonical_text()
            .unwrap_or_else(|| format!("[{}]", incoming.kind.label()));
        info!(
            "[{}] {} says: {}",
            incoming.identity,
            incoming.sender_name.as_deref().unwrap_or("unknown"),
            preview(&shown)
        );

        let mut turn = Turn {
            identity: incoming.identity.clone(),
            sender_name: incoming.sender_name.clone(),
            message_id: incoming.id.clone(),
            language: self.dialogue.default_language.clone(),
            input: shown,
            output: Vec::new(),
            intent: None,
            denial: None,
            replied: false,
        };

        let outcome = match self.process(&incoming, &mut turn).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("[{}] processing failed: {e}", incoming.identity);
                if !turn.replied {
                    let msg = OutboundPayload::text(t("try_later", &turn.language));
                    self.send_only(&mut turn, &[msg]).await;
                }
                Outcome::Failed
            }
        };

        let ms = started.elapsed().as_millis() as i64;
        debug!(
            "[{}] finished as {} in {ms}ms",
            incoming.identity,
            outcome.branch()
        );
        self.audit(&turn, &outcome, self.channel.name(), ms).await;
        outcome
    }

    async fn process(
        &self,
        incoming: &InboundMessage,
        turn: &mut Turn,
    ) -> Result<Outcome, ConvoyError> {
        let identity = incoming.identity.as_str();

        // --- 1. DE-DUPLICATE ---
        if let Some(ref id) = incoming.id {
            if !self.store.claim_message(identity, id).await? {
                debug!("[{identity}] duplicate delivery of {id}, ignoring");
                return Ok(Outcome::Duplicate);
            }
        }

        // --- 2. CONVERSATION (lazy create + account check) ---
        let (state, existed) = match self.store.get(identity).await? {
            Some(state) => (state, true),
            None => match self.open_conversation(incoming, turn).await? {
                Some(state) => (state, false),
                None => return Ok(Outcome::Denied),
            },
        };
        turn.language = state.language.clone();

        // --- 3. NORMALIZE ---
        let raw = match &incoming.kind {
            InboundKind::Voice {
                media_id,
                mime_type,
            } => match self.transcribe(media_id, mime_type.as_deref()).await {
                Ok(text) => {
                    info!("[{identity}] voice note transcribed: {}", preview(&text));
                    text
                }
                Err(e) => {
                    warn!("[{identity}] voice note failed: {e}");
                    self.store
                        .append_history(identity, &HistoryEntry::user("[voice note]"))
                        .await?;
                    let msg = t(media_failure_key(&e), &turn.language);
                    self.reply_text(turn, msg, None).await?;
                    return Ok(Outcome::VoiceFailed(e));
                }
            },
            InboundKind::Unsupported { type_name } => {
                self.store
                    .append_history(identity, &HistoryEntry::user(&format!("[{type_name}]")))
                    .await?;
                let msg = i18n::unsupported_type(&turn.language, type_name);
                self.reply_text(turn, msg, None).await?;
                return Ok(Outcome::Unsupported(type_name.clone()));
            }
            other => other.canonical_text().unwrap_or_default(),
        };

        // --- 4. SANITIZE ---
        let sanitized = sanitize::sanitize(&raw);
        if sanitized.was_modified {
            warn!("[{identity}] sanitized input: {:?}", sanitized.warnings);
        }
        let text = sanitized.text;
        turn.input = text.clone();

        // --- 5. HISTORY ---
        self.store
            .append_history(identity, &HistoryEntry::user(&text))
            .await?;

        // --- 6. HELP / MENU ---
        if let Some(cmd) = Command::parse(&text) {
            let payload = cmd.reply(&turn.language);
            self.reply(turn, vec![payload], None).await?;
            return Ok(Outcome::Command(cmd));
        }

        // --- 7. COMPLIMENT ---
        if detect_compliment(&text) {
            let msg = t("compliment_reply", &turn.language);
            self.reply_text(turn, msg, None).await?;
            return Ok(Outcome::Compliment);
        }

        // --- 8. CONFIRMATION ---
        if state.in_preview_confirmation() {
            if let Some(action) = confirmation::classify(&text, self.dialogue.bare_no) {
                info!("[{identity}] confirmation reply: {action:?}");
                return self.apply_confirmation(turn, &state, action, &text).await;
            }
        }

        // --- 9. CONTEXTUAL ---
        if let Some(m) = contextual::resolve(&text, &state) {
            info!("[{identity}] contextual reference resolved to {}", m.intent);
            let request = Request {
                intent: m.intent,
                entities: m.entities,
                artifact_id: m.artifact_id,
                confirmed: false,
            };
            return self
                .dispatch_as(turn, &state, request, Resolver::Contextual)
                .await;
        }

        // --- 10. FOLLOW-UP ---
        if existed {
            if let Some(follow) = follow_up::resolve(&text, &state) {
                return self.apply_follow_up(turn, &state, follow).await;
            }
        }

        // --- 11. CLASSIFY ---
        let classification = if text.is_empty() {
            Classification::unknown()
        } else {
            match self.classifier.classify(&text, &state.language).await {
                Ok(c) => c,
                Err(e) => {
                    warn!("[{identity}] classifier unavailable: {e}");
                    Classification::unknown()
                }
            }
        };

        if classification.intent == Intent::Unknown
            || classification.confidence < self.min_confidence
        {
            debug!(
                "[{identity}] out of scope ({} at {:.2})",
                classification.intent, classification.confidence
            );
            return self.out_of_scope(turn, &text).await;
        }

        // --- 12. DISPATCH ---
        info!(
            "[{identity}] classified as {} ({:.2})",
            classification.intent, classification.confidence
        );
        let request = Request::new(classification.intent, classification.entities);
        self.dispatch_as(turn, &state, request, Resolver::Classifier)
            .await
    }

    /// Create the conversation for a first-time identity.
    ///
    /// Returns `None` (after replying) when the identity is refused.
    async fn open_conversation(
        &self,
        incoming: &InboundMessage,
        turn: &mut Turn,
    ) -> Result<Option<ConversationState>, ConvoyError> {
        let identity = incoming.identity.as_str();
        let account = self.accounts.lookup(identity).await?;

        if account.is_none() && self.auth_config.enabled {
            warn!("[{identity}] no linked account, denying");
            turn.denial = Some("identity not linked to an account".into());
            let deny = OutboundPayload::text(self.auth_config.deny_message.clone());
            self.send_only(turn, &[deny]).await;
            return Ok(None);
        }

        let detected = incoming
            .kind
            .canonical_text()
            .and_then(|text| i18n::detect_language(&text));
        let seed = match account {
            Some(acct) => ConversationSeed {
                language: acct
                    .language
                    .as_deref()
                    .and_then(i18n::resolve_language)
                    .or(detected)
                    .unwrap_or(self.dialogue.default_language.as_str())
                    .to_string(),
                tenant_id: acct.tenant_id,
                user_id: acct.user_id,
            },
            None => ConversationSeed {
                tenant_id: String::new(),
                user_id: identity.to_string(),
                language: detected
                    .unwrap_or(self.dialogue.default_language.as_str())
                    .to_string(),
            },
        };

        let state = self.store.create_if_absent(identity, &seed).await?;
        info!("[{identity}] new conversation ({})", state.language);
        Ok(Some(state))
    }

    async fn transcribe(
        &self,
        media_id: &str,
        mime_type: Option<&str>,
    ) -> Result<String, MediaError> {
        let Some(ref voice) = self.voice else {
            return Err(MediaError::Unavailable("voice pipeline not configured".into()));
        };
        voice.transcribe_voice(media_id, mime_type).await
    }

    /// Greeting, chit-chat or "didn't get that", in that order.
    async fn out_of_scope(&self, turn: &mut Turn, text: &str) -> Result<Outcome, ConvoyError> {
        let kind = if is_greeting(text) {
            OutOfScope::Greeting
        } else if is_chit_chat(text) {
            OutOfScope::ChitChat
        } else {
            OutOfScope::Unclear
        };
        let family = match kind {
            OutOfScope::Greeting => Family::Greeting,
            OutOfScope::ChitChat => Family::ChitChat,
            OutOfScope::Unclear => Family::Unclear,
        };
        let msg = self.replies.from_family(family, &turn.language);
        self.reply_text(turn, msg, None).await?;
        Ok(Outcome::OutOfScope(kind))
    }
}
