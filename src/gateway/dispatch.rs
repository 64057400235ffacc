//! Dispatch: run a resolved intent and fold the result into state.

use super::confirmation::{ConfirmationAction, ConfirmationEvent};
use super::follow_up::FollowUp;
use super::handlers::{self, LocalAction, Target};
use super::pipeline::Request;
use super::{DispatchResult, Gateway, Outcome, Resolver, Turn};
use crate::commands::Command;
use crate::i18n::{self, t};
use convoy_core::{
    conversation::{pending, AwaitingInput, ConversationState, StatePatch},
    error::ConvoyError,
    intent::{Entities, Intent},
    message::{OutboundPayload, ReplyButton},
    traits::{ActionContext, ActionOutcome, ActionReply, ConfirmationKind},
};
use serde_json::Value;
use tracing::{error, info, warn};

/// Entity the classifier uses for "switch to Spanish".
const LANGUAGE_ENTITY: &str = "language";

/// Entity carrying a free-text edit instruction to the invoice handler.
const INSTRUCTION_ENTITY: &str = "instruction";

/// Snapshot of what an intent was called with, kept in
/// `pending_artifact_data` for a later accept or retry.
fn pending_data(intent: Intent, entities: &Entities, artifact_id: Option<&str>) -> Entities {
    let mut data = Entities::new();
    data.insert(pending::INTENT.into(), Value::String(intent.as_str().into()));
    data.insert(pending::ENTITIES.into(), Value::Object(entities.clone()));
    if let Some(id) = artifact_id {
        data.insert(pending::ARTIFACT_ID.into(), Value::String(id.into()));
    }
    data
}

/// Pending data with the staged retry dropped, or `None` when there is
/// nothing to drop.
fn without_failed_call(state: &ConversationState) -> Option<Entities> {
    if state.awaiting_input == Some(AwaitingInput::Retry) {
        return Some(Entities::new());
    }
    if state.pending_artifact_data.contains_key(pending::FAILED_CALL) {
        let mut data = state.pending_artifact_data.clone();
        data.remove(pending::FAILED_CALL);
        return Some(data);
    }
    None
}

/// Buttons under a preview. Ids are the utterances the confirmation
/// resolver understands.
fn confirm_buttons(lang: &str) -> OutboundPayload {
    let button = |id: &str, key: &str| ReplyButton {
        id: id.to_string(),
        title: t(key, lang).to_string(),
    };
    OutboundPayload::Buttons {
        body: t("confirm_prompt", lang).to_string(),
        buttons: vec![
            button("yes", "btn_confirm"),
            button("edit", "btn_edit"),
            button("send", "btn_send"),
        ],
    }
}

impl Gateway {
    pub(super) async fn dispatch_as(
        &self,
        turn: &mut Turn,
        state: &ConversationState,
        request: Request,
        via: Resolver,
    ) -> Result<Outcome, ConvoyError> {
        let intent = request.intent;
        let result = self.dispatch(turn, state, request, via).await?;
        Ok(Outcome::Dispatched {
            intent,
            via,
            result,
        })
    }

    /// Route one intent to its handler and send exactly one terminal reply.
    pub(super) async fn dispatch(
        &self,
        turn: &mut Turn,
        state: &ConversationState,
        request: Request,
        via: Resolver,
    ) -> Result<DispatchResult, ConvoyError> {
        let intent = request.intent;
        turn.intent = Some(intent);
        self.store
            .apply_patch(
                &turn.identity,
                &StatePatch {
                    current_intent: Some(Some(intent)),
                    last_intent: Some(Some(intent)),
                    ..Default::default()
                },
            )
            .await?;

        let domain = match handlers::route(intent) {
            Target::Local(LocalAction::Help) => {
                let payload = Command::Help.reply(&turn.language);
                self.reply(turn, vec![payload], Some(intent)).await?;
                return Ok(DispatchResult::Completed);
            }
            Target::Local(LocalAction::SetLanguage) => {
                return self.set_language(turn, &request.entities).await;
            }
            Target::Unsupported => {
                info!("[{}] {intent} has no handler", turn.identity);
                let msg = t("not_supported", &turn.language);
                self.reply_text(turn, msg, Some(intent)).await?;
                return Ok(DispatchResult::NotSupported);
            }
            Target::Remote(domain) => domain,
        };

        let ack = OutboundPayload::text(self.replies.ack(intent, &turn.language));
        self.send_only(turn, &[ack]).await;

        let ctx = ActionContext {
            identity: turn.identity.clone(),
            tenant_id: state.tenant_id.clone(),
            user_id: state.user_id.clone(),
            language: turn.language.clone(),
            artifact_id: request.artifact_id.clone(),
            confirmed: request.confirmed,
        };
        info!(
            "[{}] dispatching {intent} to {} handler via {via:?}",
            turn.identity,
            domain.as_str()
        );

        match self.actions.handle(intent, &request.entities, &ctx).await {
            Err(e) => {
                error!("[{}] {intent} handler failed: {e}", turn.identity);
                self.record_failure(turn, state, &request, e.to_string())
                    .await?;
                let msg = t("action_failed", &turn.language);
                self.reply_text(turn, msg, Some(intent)).await?;
                Ok(DispatchResult::Failed)
            }
            Ok(ActionOutcome::Rejected { reason, hint }) => {
                warn!("[{}] {intent} rejected: {reason}", turn.identity);
                self.record_failure(turn, state, &request, reason.clone())
                    .await?;
                let msg = i18n::rejection(&turn.language, &reason, hint.as_deref());
                self.reply_text(turn, msg, Some(intent)).await?;
                Ok(DispatchResult::Rejected)
            }
            Ok(ActionOutcome::Completed(reply)) => {
                self.commit(turn, state, &request, via, reply).await
            }
        }
    }

    /// Keep the error so "try again" can re-run the same call.
    async fn record_failure(
        &self,
        turn: &Turn,
        state: &ConversationState,
        request: &Request,
        reason: String,
    ) -> Result<(), ConvoyError> {
        let mut patch = StatePatch {
            last_error: Some(Some(reason)),
            ..Default::default()
        };
        let call = pending_data(
            request.intent,
            &request.entities,
            request.artifact_id.as_deref(),
        );
        if state.awaiting_confirmation {
            // The staged confirmation stays; the failed call rides alongside it.
            let mut data = state.pending_artifact_data.clone();
            data.insert(pending::FAILED_CALL.into(), Value::Object(call));
            patch.pending_artifact_data = Some(data);
        } else {
            patch.awaiting_input = Some(Some(AwaitingInput::Retry));
            patch.pending_artifact_data = Some(call);
        }
        self.store.apply_patch(&turn.identity, &patch).await
    }

    async fn commit(
        &self,
        turn: &mut Turn,
        state: &ConversationState,
        request: &Request,
        via: Resolver,
        reply: ActionReply,
    ) -> Result<DispatchResult, ConvoyError> {
        let ActionReply {
            mut payloads,
            artifact_id,
            counterparty,
            confirmation,
        } = reply;

        let mut patch = StatePatch {
            last_error: Some(None),
            ..Default::default()
        };
        if via != Resolver::Retry {
            patch.retry_count = Some(0);
        }
        if let Some(data) = without_failed_call(state) {
            if state.awaiting_input == Some(AwaitingInput::Retry) {
                patch.awaiting_input = Some(None);
            }
            patch.pending_artifact_data = Some(data);
        }
        if let Some(ref id) = artifact_id {
            patch.last_artifact_id = Some(Some(id.clone()));
        }
        if let Some(name) = counterparty {
            patch.last_counterparty_name = Some(Some(name));
        }
        if payloads.is_empty() {
            payloads.push(OutboundPayload::text(t("done", &turn.language)));
        }

        let result = match confirmation {
            Some(req) => {
                info!(
                    "[{}] {} awaiting {:?} confirmation for {}",
                    turn.identity, request.intent, req.kind, req.artifact_id
                );
                patch.awaiting_confirmation = Some(true);
                patch.pending_artifact_data = Some(pending_data(
                    request.intent,
                    &request.entities,
                    Some(&req.artifact_id),
                ));
                match req.kind {
                    ConfirmationKind::Preview => {
                        patch.awaiting_input = Some(Some(AwaitingInput::AwaitingConfirmation));
                        patch.last_artifact_id = Some(Some(req.artifact_id.clone()));
                        payloads.push(confirm_buttons(&turn.language));
                    }
                    ConfirmationKind::YesNo => {
                        patch.awaiting_input = Some(None);
                    }
                }
                DispatchResult::AwaitingConfirmation
            }
            None => DispatchResult::Completed,
        };

        self.store.apply_patch(&turn.identity, &patch).await?;
        self.reply(turn, payloads, Some(request.intent)).await?;
        Ok(result)
    }

    async fn set_language(
        &self,
        turn: &mut Turn,
        entities: &Entities,
    ) -> Result<DispatchResult, ConvoyError> {
        let requested = entities
            .get(LANGUAGE_ENTITY)
            .and_then(Value::as_str)
            .and_then(i18n::resolve_language);
        let Some(lang) = requested else {
            let msg = t("language_unknown", &turn.language);
            self.reply_text(turn, msg, Some(Intent::SetLanguage))
                .await?;
            return Ok(DispatchResult::Rejected);
        };

        self.store
            .apply_patch(
                &turn.identity,
                &StatePatch {
                    language: Some(lang.to_string()),
                    ..Default::default()
                },
            )
            .await?;
        turn.language = lang.to_string();
        let msg = i18n::language_set(lang, lang);
        self.reply_text(turn, msg, Some(Intent::SetLanguage))
            .await?;
        Ok(DispatchResult::Completed)
    }

    /// Close the confirmation flow and return the state as it now is.
    async fn clear_confirmation(
        &self,
        identity: &str,
        state: &ConversationState,
    ) -> Result<ConversationState, ConvoyError> {
        let patch = StatePatch::clear_confirmation();
        self.store.apply_patch(identity, &patch).await?;
        let mut cleared = state.clone();
        patch.apply_to(&mut cleared);
        Ok(cleared)
    }

    /// Apply a confirm / send / cancel / edit reply to an open preview.
    pub(super) async fn apply_confirmation(
        &self,
        turn: &mut Turn,
        state: &ConversationState,
        action: ConfirmationAction,
        text: &str,
    ) -> Result<Outcome, ConvoyError> {
        let artifact = state
            .pending_artifact_id()
            .map(String::from)
            .or_else(|| state.last_artifact_id.clone());
        let identity = turn.identity.clone();

        match action {
            ConfirmationAction::Confirm => {
                self.store
                    .apply_patch(&identity, &StatePatch::clear_confirmation())
                    .await?;
                let msg = t("confirmed", &turn.language);
                self.reply_text(turn, msg, state.pending_intent()).await?;
            }
            ConfirmationAction::Send => {
                let cleared = self.clear_confirmation(&identity, state).await?;
                let request = Request {
                    intent: Intent::SendInvoice,
                    entities: Entities::new(),
                    artifact_id: artifact,
                    confirmed: true,
                };
                self.dispatch(turn, &cleared, request, Resolver::Confirmation)
                    .await?;
            }
            ConfirmationAction::Cancel => {
                let mut patch = StatePatch::clear_confirmation();
                if artifact.is_some() && state.last_artifact_id == artifact {
                    patch.last_artifact_id = Some(None);
                }
                self.store.apply_patch(&identity, &patch).await?;
                let msg = t("cancelled", &turn.language);
                self.reply_text(turn, msg, state.pending_intent()).await?;
            }
            ConfirmationAction::Edit => {
                // The preview stays open; the handler answers with a new one.
                let mut entities = Entities::new();
                entities.insert(INSTRUCTION_ENTITY.into(), Value::String(text.to_string()));
                let request = Request {
                    intent: Intent::EditInvoice,
                    entities,
                    artifact_id: artifact,
                    confirmed: false,
                };
                self.dispatch(turn, state, request, Resolver::Confirmation)
                    .await?;
            }
        }

        Ok(Outcome::Confirmation(ConfirmationEvent::from(action)))
    }

    pub(super) async fn apply_follow_up(
        &self,
        turn: &mut Turn,
        state: &ConversationState,
        follow: FollowUp,
    ) -> Result<Outcome, ConvoyError> {
        let identity = turn.identity.clone();
        match follow {
            FollowUp::Accept {
                intent,
                entities,
                artifact_id,
            } => {
                info!("[{identity}] accepted pending {intent}");
                let cleared = self.clear_confirmation(&identity, state).await?;
                let request = Request {
                    intent,
                    entities,
                    artifact_id,
                    confirmed: true,
                };
                self.dispatch_as(turn, &cleared, request, Resolver::FollowUp)
                    .await
            }
            FollowUp::Decline => {
                info!("[{identity}] declined pending confirmation");
                self.store
                    .apply_patch(&identity, &StatePatch::clear_confirmation())
                    .await?;
                let msg = t("declined", &turn.language);
                self.reply_text(turn, msg, None).await?;
                Ok(Outcome::Declined)
            }
            FollowUp::Option {
                intent,
                artifact_id,
            } => {
                info!("[{identity}] numbered option resolved to {intent}");
                let request = Request {
                    artifact_id,
                    ..Request::new(intent, Entities::new())
                };
                self.dispatch_as(turn, state, request, Resolver::FollowUp)
                    .await
            }
            FollowUp::Retry {
                intent,
                entities,
                artifact_id,
            } => {
                if state.retry_count >= self.dialogue.max_retries {
                    warn!(
                        "[{identity}] retry budget of {} spent on {intent}",
                        self.dialogue.max_retries
                    );
                    let mut patch = StatePatch {
                        last_error: Some(None),
                        retry_count: Some(0),
                        ..Default::default()
                    };
                    if let Some(data) = without_failed_call(state) {
                        if state.awaiting_input == Some(AwaitingInput::Retry) {
                            patch.awaiting_input = Some(None);
                        }
                        patch.pending_artifact_data = Some(data);
                    }
                    self.store.apply_patch(&identity, &patch).await?;
                    let msg = t("retry_exhausted", &turn.language);
                    self.reply_text(turn, msg, Some(intent)).await?;
                    return Ok(Outcome::RetryExhausted);
                }

                info!(
                    "[{identity}] retrying {intent} (attempt {})",
                    state.retry_count + 1
                );
                self.store
                    .apply_patch(
                        &identity,
                        &StatePatch {
                            retry_count: Some(state.retry_count + 1),
                            ..Default::default()
                        },
                    )
                    .await?;
                let request = Request {
                    artifact_id,
                    ..Request::new(intent, entities)
                };
                self.dispatch_as(turn, state, request, Resolver::Retry)
                    .await
            }
        }
    }
}
