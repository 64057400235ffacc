use super::*;
use async_trait::async_trait;
use convoy_channels::media::RetryPolicy;
use convoy_core::{
    config::{BareNoPolicy, MediaConfig, MemoryConfig},
    conversation::{ConversationSeed, ConversationState, Role, StatePatch},
    intent::{Classification, Entities},
    message::{InboundKind, InboundMessage},
    traits::{
        Account, ActionContext, ActionOutcome, ActionReply, ConfirmationKind,
        ConfirmationRequest, MediaLocation, MediaSource, Transcriber,
    },
};
use convoy_memory::Store;
use serde_json::json;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

const USER: &str = "15550001";

// --- Mock collaborators ---

#[derive(Default)]
struct RecordingChannel {
    sent: Mutex<Vec<(String, OutboundPayload)>>,
}

impl RecordingChannel {
    fn payloads(&self) -> Vec<OutboundPayload> {
        self.sent.lock().unwrap().iter().map(|(_, p)| p.clone()).collect()
    }

    fn last(&self) -> OutboundPayload {
        self.payloads().pop().expect("nothing was sent")
    }

    fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Channel for RecordingChannel {
    fn name(&self) -> &str {
        "test"
    }

    async fn send(&self, identity: &str, payload: &OutboundPayload) -> Result<(), ConvoyError> {
        self.sent
            .lock()
            .unwrap()
            .push((identity.to_string(), payload.clone()));
        Ok(())
    }
}

/// Answers from a text → classification table; unknown otherwise.
#[derive(Default)]
struct ScriptedClassifier {
    table: Mutex<HashMap<String, Classification>>,
    down: bool,
    calls: AtomicU32,
}

impl ScriptedClassifier {
    fn down() -> Self {
        Self {
            down: true,
            ..Default::default()
        }
    }

    fn script(&self, text: &str, intent: Intent, confidence: f32, entities: serde_json::Value) {
        let entities = entities.as_object().cloned().unwrap_or_default();
        self.table.lock().unwrap().insert(
            text.to_string(),
            Classification {
                intent,
                confidence,
                entities,
            },
        );
    }
}

#[async_trait]
impl IntentClassifier for ScriptedClassifier {
    async fn classify(&self, text: &str, _language: &str) -> Result<Classification, ConvoyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.down {
            return Err(ConvoyError::Classifier("connection refused".into()));
        }
        Ok(self
            .table
            .lock()
            .unwrap()
            .get(text)
            .cloned()
            .unwrap_or_else(Classification::unknown))
    }
}

type Scripted = Result<ActionOutcome, String>;

/// Pops scripted outcomes per intent; plain "ok" when nothing is scripted.
#[derive(Default)]
struct RecordingActions {
    script: Mutex<HashMap<Intent, VecDeque<Scripted>>>,
    calls: Mutex<Vec<(Intent, Entities, ActionContext)>>,
}

impl RecordingActions {
    fn push(&self, intent: Intent, outcome: Scripted) {
        self.script
            .lock()
            .unwrap()
            .entry(intent)
            .or_default()
            .push_back(outcome);
    }

    fn calls(&self) -> Vec<(Intent, Entities, ActionContext)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ActionHandler for RecordingActions {
    async fn handle(
        &self,
        intent: Intent,
        entities: &Entities,
        ctx: &ActionContext,
    ) -> Result<ActionOutcome, ConvoyError> {
        self.calls
            .lock()
            .unwrap()
            .push((intent, entities.clone(), ctx.clone()));
        let next = self
            .script
            .lock()
            .unwrap()
            .get_mut(&intent)
            .and_then(VecDeque::pop_front);
        match next {
            Some(Ok(outcome)) => Ok(outcome),
            Some(Err(e)) => Err(ConvoyError::Handler(e)),
            None => Ok(ActionOutcome::Completed(ActionReply::text("ok"))),
        }
    }
}

/// Delegates to a real store but fails every `apply_patch` after the
/// first `allowed` calls.
struct FlakyStore {
    inner: Arc<Store>,
    allowed: u32,
    patches: AtomicU32,
}

#[async_trait]
impl ConversationStore for FlakyStore {
    async fn get(&self, identity: &str) -> Result<Option<ConversationState>, ConvoyError> {
        self.inner.get(identity).await
    }

    async fn create_if_absent(
        &self,
        identity: &str,
        seed: &ConversationSeed,
    ) -> Result<ConversationState, ConvoyError> {
        self.inner.create_if_absent(identity, seed).await
    }

    async fn apply_patch(&self, identity: &str, patch: &StatePatch) -> Result<(), ConvoyError> {
        if self.patches.fetch_add(1, Ordering::SeqCst) >= self.allowed {
            return Err(ConvoyError::Store("database is locked".into()));
        }
        self.inner.apply_patch(identity, patch).await
    }

    async fn append_history(
        &self,
        identity: &str,
        entry: &HistoryEntry,
    ) -> Result<(), ConvoyError> {
        self.inner.append_history(identity, entry).await
    }

    async fn history(&self, identity: &str) -> Result<Vec<HistoryEntry>, ConvoyError> {
        self.inner.history(identity).await
    }

    async fn claim_message(&self, identity: &str, message_id: &str) -> Result<bool, ConvoyError> {
        self.inner.claim_message(identity, message_id).await
    }

    async fn reset(&self, identity: &str) -> Result<bool, ConvoyError> {
        self.inner.reset(identity).await
    }
}

struct StaticAccounts(Option<Account>);

#[async_trait]
impl AccountDirectory for StaticAccounts {
    async fn lookup(&self, _identity: &str) -> Result<Option<Account>, ConvoyError> {
        Ok(self.0.clone())
    }
}

fn account() -> Option<Account> {
    Some(Account {
        tenant_id: "t1".into(),
        user_id: "u1".into(),
        language: Some("en".into()),
    })
}

fn completed_with(artifact: &str, counterparty: Option<&str>) -> Scripted {
    Ok(ActionOutcome::Completed(ActionReply {
        payloads: vec![OutboundPayload::text(format!("Draft {artifact} ready"))],
        artifact_id: Some(artifact.into()),
        counterparty: counterparty.map(String::from),
        confirmation: None,
    }))
}

fn preview_of(artifact: &str) -> Scripted {
    Ok(ActionOutcome::Completed(ActionReply {
        payloads: vec![OutboundPayload::text(format!("Invoice {artifact}: 5000"))],
        artifact_id: Some(artifact.into()),
        counterparty: Some("Acme".into()),
        confirmation: Some(ConfirmationRequest {
            kind: ConfirmationKind::Preview,
            artifact_id: artifact.into(),
        }),
    }))
}

fn rejected(reason: &str) -> Scripted {
    Ok(ActionOutcome::Rejected {
        reason: reason.into(),
        hint: None,
    })
}

// --- Harness ---

struct Harness {
    gateway: Gateway,
    store: Arc<Store>,
    channel: Arc<RecordingChannel>,
    classifier: Arc<ScriptedClassifier>,
    actions: Arc<RecordingActions>,
}

impl Harness {
    async fn say(&self, text: &str) -> Outcome {
        self.gateway.handle(InboundMessage::text(USER, text)).await
    }

    async fn state(&self) -> ConversationState {
        self.store.get(USER).await.unwrap().expect("conversation exists")
    }

    async fn history(&self) -> Vec<HistoryEntry> {
        self.store.history(USER).await.unwrap()
    }

    async fn seed(&self, patch: StatePatch) {
        let seed = ConversationSeed {
            tenant_id: "t1".into(),
            user_id: "u1".into(),
            language: "English".into(),
        };
        self.store.create_if_absent(USER, &seed).await.unwrap();
        self.store.apply_patch(USER, &patch).await.unwrap();
    }
}

async fn memory_store() -> Arc<Store> {
    let cfg = MemoryConfig {
        db_path: ":memory:".into(),
        history_limit: 20,
    };
    Arc::new(Store::new(&cfg).await.unwrap())
}

async fn build(
    classifier: ScriptedClassifier,
    accounts: Option<Account>,
    dialogue: DialogueConfig,
) -> Harness {
    let store = memory_store().await;
    let channel = Arc::new(RecordingChannel::default());
    let classifier = Arc::new(classifier);
    let actions = Arc::new(RecordingActions::default());
    let gateway = Gateway::new(
        store.clone(),
        channel.clone(),
        classifier.clone(),
        actions.clone(),
        Arc::new(StaticAccounts(accounts)),
        AuthConfig::default(),
        dialogue,
        0.4,
    );
    Harness {
        gateway,
        store,
        channel,
        classifier,
        actions,
    }
}

fn dialogue() -> DialogueConfig {
    DialogueConfig {
        reply_seed: Some(42),
        ..Default::default()
    }
}

async fn harness() -> Harness {
    build(ScriptedClassifier::default(), account(), dialogue()).await
}

/// Classifier knows "create invoice for Acme"; the handler answers with a
/// preview of INV-7.
async fn in_preview(h: &Harness) {
    h.classifier.script(
        "create invoice for Acme",
        Intent::CreateInvoice,
        0.93,
        json!({"client": "Acme", "amount": 5000}),
    );
    h.actions.push(Intent::CreateInvoice, preview_of("INV-7"));
    let outcome = h.say("create invoice for Acme").await;
    assert_eq!(
        outcome,
        Outcome::Dispatched {
            intent: Intent::CreateInvoice,
            via: Resolver::Classifier,
            result: DispatchResult::AwaitingConfirmation,
        }
    );
}

// --- Out of scope and small talk ---

#[tokio::test]
async fn test_greeting_on_first_contact() {
    let h = harness().await;
    let outcome = h.say("hi").await;
    assert_eq!(outcome, Outcome::OutOfScope(OutOfScope::Greeting));

    let history = h.history().await;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].role, Role::User);
    assert_eq!(history[0].text, "hi");
    assert_eq!(history[1].role, Role::Assistant);
    assert!(history[1].intent.is_none());

    let greetings = crate::i18n::family(crate::i18n::Family::Greeting, "English");
    assert!(greetings.contains(&h.channel.last().text_body().as_str()));
    assert!(h.actions.calls().is_empty());
}

#[tokio::test]
async fn test_low_confidence_is_unclear() {
    let h = harness().await;
    h.classifier
        .script("do the thing", Intent::CreateInvoice, 0.2, json!({}));
    assert_eq!(
        h.say("do the thing").await,
        Outcome::OutOfScope(OutOfScope::Unclear)
    );
    assert!(h.actions.calls().is_empty());
}

#[tokio::test]
async fn test_compliment() {
    let h = harness().await;
    assert_eq!(h.say("thanks!").await, Outcome::Compliment);
    assert_eq!(h.classifier.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_help_is_idempotent() {
    let h = harness().await;
    assert_eq!(h.say("help").await, Outcome::Command(Command::Help));
    let before = h.state().await;
    assert_eq!(h.say("help").await, Outcome::Command(Command::Help));
    let after = h.state().await;

    assert_eq!(before.last_intent, after.last_intent);
    assert_eq!(before.awaiting_input, after.awaiting_input);
    assert_eq!(h.history().await.len(), 4);
    assert_eq!(h.classifier.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_menu_is_a_list() {
    let h = harness().await;
    assert_eq!(h.say("menu").await, Outcome::Command(Command::Menu));
    assert!(matches!(h.channel.last(), OutboundPayload::List { .. }));
}

#[tokio::test]
async fn test_history_is_capped() {
    let h = harness().await;
    for _ in 0..15 {
        h.say("hi").await;
    }
    let history = h.history().await;
    assert_eq!(history.len(), HISTORY_CAP);
    assert_eq!(history.last().unwrap().role, Role::Assistant);
}

const HISTORY_CAP: usize = convoy_core::conversation::HISTORY_LIMIT;

// --- Follow-ups ---

#[tokio::test]
async fn test_numeric_follow_up_without_classifier() {
    let h = build(ScriptedClassifier::down(), account(), dialogue()).await;
    h.seed(StatePatch {
        last_intent: Some(Some(Intent::CreateInvoice)),
        last_artifact_id: Some(Some("INV-1".into())),
        ..Default::default()
    })
    .await;

    let outcome = h.say("1").await;
    assert_eq!(
        outcome,
        Outcome::Dispatched {
            intent: Intent::PreviewInvoice,
            via: Resolver::FollowUp,
            result: DispatchResult::Completed,
        }
    );

    let calls = h.actions.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, Intent::PreviewInvoice);
    assert_eq!(calls[0].2.artifact_id.as_deref(), Some("INV-1"));
    assert_eq!(calls[0].2.tenant_id, "t1");
    assert_eq!(h.classifier.calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.state().await.last_intent, Some(Intent::PreviewInvoice));
}

#[tokio::test]
async fn test_numeric_reply_on_first_contact_goes_to_classifier() {
    let h = harness().await;
    assert_eq!(h.say("1").await, Outcome::OutOfScope(OutOfScope::Unclear));
    assert_eq!(h.classifier.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_rejection_then_retry() {
    let h = harness().await;
    h.classifier
        .script("add client Zed", Intent::AddClient, 0.9, json!({"name": "Zed"}));
    h.actions
        .push(Intent::AddClient, rejected("client 'Zed' needs a tax id"));

    let outcome = h.say("add client Zed").await;
    assert!(matches!(
        outcome,
        Outcome::Dispatched {
            result: DispatchResult::Rejected,
            ..
        }
    ));
    let state = h.state().await;
    assert_eq!(state.last_error.as_deref(), Some("client 'Zed' needs a tax id"));
    assert_eq!(state.last_intent, Some(Intent::AddClient));
    assert!(h.channel.last().text_body().starts_with("client 'Zed' needs a tax id"));

    let outcome = h.say("try again").await;
    assert_eq!(
        outcome,
        Outcome::Dispatched {
            intent: Intent::AddClient,
            via: Resolver::Retry,
            result: DispatchResult::Completed,
        }
    );
    let calls = h.actions.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].1, calls[0].1);

    let state = h.state().await;
    assert!(state.last_error.is_none());
    assert_eq!(state.retry_count, 1);
    assert!(state.awaiting_input.is_none());
}

#[tokio::test]
async fn test_retry_without_error_falls_through() {
    let h = harness().await;
    h.seed(StatePatch {
        last_intent: Some(Some(Intent::AddClient)),
        ..Default::default()
    })
    .await;
    assert_eq!(
        h.say("try again").await,
        Outcome::OutOfScope(OutOfScope::Unclear)
    );
    assert!(h.actions.calls().is_empty());
}

#[tokio::test]
async fn test_retry_budget() {
    let h = build(
        ScriptedClassifier::default(),
        account(),
        DialogueConfig {
            max_retries: 1,
            ..dialogue()
        },
    )
    .await;
    h.classifier
        .script("add client Zed", Intent::AddClient, 0.9, json!({}));
    for _ in 0..2 {
        h.actions.push(Intent::AddClient, rejected("tax id missing"));
    }

    h.say("add client Zed").await;
    assert!(matches!(
        h.say("retry").await,
        Outcome::Dispatched {
            via: Resolver::Retry,
            result: DispatchResult::Rejected,
            ..
        }
    ));
    assert_eq!(h.state().await.retry_count, 1);

    assert_eq!(h.say("retry").await, Outcome::RetryExhausted);
    let state = h.state().await;
    assert_eq!(state.retry_count, 0);
    assert!(state.last_error.is_none());
    assert_eq!(h.actions.calls().len(), 2);
}

#[tokio::test]
async fn test_handler_failure_is_reported_not_raised() {
    let h = harness().await;
    h.classifier
        .script("wallet balance", Intent::WalletBalance, 0.95, json!({}));
    h.actions
        .push(Intent::WalletBalance, Err("502 bad gateway".into()));

    let outcome = h.say("wallet balance").await;
    assert_eq!(
        outcome,
        Outcome::Dispatched {
            intent: Intent::WalletBalance,
            via: Resolver::Classifier,
            result: DispatchResult::Failed,
        }
    );
    assert_eq!(
        h.channel.last().text_body(),
        crate::i18n::t("action_failed", "English")
    );
    assert!(h.state().await.last_error.is_some());
}

#[tokio::test]
async fn test_store_failure_after_ack_still_answers() {
    let store = memory_store().await;
    let channel = Arc::new(RecordingChannel::default());
    let classifier = Arc::new(ScriptedClassifier::default());
    classifier.script("list routes", Intent::ListRoutes, 0.9, json!({}));
    let actions = Arc::new(RecordingActions::default());
    let flaky = Arc::new(FlakyStore {
        inner: store,
        allowed: 1,
        patches: AtomicU32::new(0),
    });
    let gateway = Gateway::new(
        flaky,
        channel.clone(),
        classifier,
        actions.clone(),
        Arc::new(StaticAccounts(account())),
        AuthConfig::default(),
        dialogue(),
        0.4,
    );

    let outcome = gateway
        .handle(InboundMessage::text(USER, "list routes"))
        .await;
    assert_eq!(outcome, Outcome::Failed);
    assert_eq!(actions.calls().len(), 1);
    // Ack first, then the failure notice.
    assert_eq!(channel.count(), 2);
    assert_eq!(
        channel.last().text_body(),
        crate::i18n::t("try_later", "English")
    );
}

#[tokio::test]
async fn test_yes_no_confirmation_outside_preview() {
    let h = harness().await;
    h.classifier.script(
        "cancel invoice INV-3",
        Intent::CancelInvoice,
        0.9,
        json!({"invoice_id": "INV-3"}),
    );
    h.actions.push(
        Intent::CancelInvoice,
        Ok(ActionOutcome::Completed(ActionReply {
            payloads: vec![OutboundPayload::text("Cancel INV-3? (yes/no)")],
            artifact_id: None,
            counterparty: None,
            confirmation: Some(ConfirmationRequest {
                kind: ConfirmationKind::YesNo,
                artifact_id: "INV-3".into(),
            }),
        })),
    );

    h.say("cancel invoice INV-3").await;
    let state = h.state().await;
    assert!(state.awaiting_confirmation);
    assert!(!state.in_preview_confirmation());

    let outcome = h.say("yes").await;
    assert_eq!(
        outcome,
        Outcome::Dispatched {
            intent: Intent::CancelInvoice,
            via: Resolver::FollowUp,
            result: DispatchResult::Completed,
        }
    );
    let calls = h.actions.calls();
    assert!(calls[1].2.confirmed);
    assert_eq!(calls[1].2.artifact_id.as_deref(), Some("INV-3"));
    assert_eq!(calls[1].1["invoice_id"], "INV-3");
    assert!(!h.state().await.awaiting_confirmation);
}

#[tokio::test]
async fn test_no_declines_pending_question() {
    let h = harness().await;
    let mut data = Entities::new();
    data.insert("intent".into(), json!("CANCEL_INVOICE"));
    h.seed(StatePatch {
        awaiting_confirmation: Some(true),
        pending_artifact_data: Some(data),
        ..Default::default()
    })
    .await;

    assert_eq!(h.say("no").await, Outcome::Declined);
    assert!(!h.state().await.awaiting_confirmation);
    assert!(h.actions.calls().is_empty());
}

// --- Preview confirmation ---

#[tokio::test]
async fn test_preview_sets_confirmation_state_and_buttons() {
    let h = harness().await;
    in_preview(&h).await;

    let state = h.state().await;
    assert!(state.awaiting_confirmation);
    assert!(state.in_preview_confirmation());
    assert_eq!(state.pending_artifact_id(), Some("INV-7"));
    assert_eq!(state.last_artifact_id.as_deref(), Some("INV-7"));
    assert_eq!(state.last_counterparty_name.as_deref(), Some("Acme"));

    let OutboundPayload::Buttons { buttons, .. } = h.channel.last() else {
        panic!("expected buttons");
    };
    let ids: Vec<_> = buttons.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, ["yes", "edit", "send"]);

    // ack + preview + buttons, one assistant history entry
    assert_eq!(h.channel.count(), 3);
    let history = h.history().await;
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].intent, Some(Intent::CreateInvoice));
}

#[tokio::test]
async fn test_confirm_clears_preview() {
    let h = harness().await;
    in_preview(&h).await;

    let outcome = h.say("yes").await;
    assert_eq!(
        outcome,
        Outcome::Confirmation(ConfirmationEvent::Confirmed)
    );
    let state = h.state().await;
    assert!(!state.awaiting_confirmation);
    assert!(state.awaiting_input.is_none());
    assert!(state.pending_artifact_data.is_empty());
    assert_eq!(state.last_artifact_id.as_deref(), Some("INV-7"));
    assert_eq!(h.actions.calls().len(), 1);
}

#[tokio::test]
async fn test_cancel_discards_draft() {
    let h = harness().await;
    in_preview(&h).await;

    assert_eq!(
        h.say("cancel").await,
        Outcome::Confirmation(ConfirmationEvent::Cancelled)
    );
    let state = h.state().await;
    assert!(!state.awaiting_confirmation);
    assert!(state.last_artifact_id.is_none());
}

#[tokio::test]
async fn test_send_from_preview() {
    let h = harness().await;
    in_preview(&h).await;

    assert_eq!(
        h.say("send").await,
        Outcome::Confirmation(ConfirmationEvent::SendNow)
    );
    let calls = h.actions.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].0, Intent::SendInvoice);
    assert_eq!(calls[1].2.artifact_id.as_deref(), Some("INV-7"));
    assert!(calls[1].2.confirmed);
    assert!(!h.state().await.awaiting_confirmation);
}

#[tokio::test]
async fn test_edit_keeps_preview_open() {
    let h = harness().await;
    in_preview(&h).await;

    assert_eq!(
        h.say("change the amount to 6000").await,
        Outcome::Confirmation(ConfirmationEvent::EditRequested)
    );
    let calls = h.actions.calls();
    assert_eq!(calls[1].0, Intent::EditInvoice);
    assert_eq!(calls[1].1["instruction"], "change the amount to 6000");
    assert_eq!(calls[1].2.artifact_id.as_deref(), Some("INV-7"));
    assert!(h.state().await.in_preview_confirmation());
}

#[tokio::test]
async fn test_retry_after_failed_edit_reruns_the_edit() {
    let h = harness().await;
    in_preview(&h).await;
    h.actions
        .push(Intent::EditInvoice, rejected("total is locked after approval"));

    assert_eq!(
        h.say("edit total to 5000").await,
        Outcome::Confirmation(ConfirmationEvent::EditRequested)
    );
    let state = h.state().await;
    assert!(state.in_preview_confirmation());
    assert_eq!(state.pending_intent(), Some(Intent::CreateInvoice));
    assert_eq!(state.last_intent, Some(Intent::EditInvoice));

    h.actions.push(Intent::EditInvoice, preview_of("INV-7"));
    let outcome = h.say("try again").await;
    assert_eq!(
        outcome,
        Outcome::Dispatched {
            intent: Intent::EditInvoice,
            via: Resolver::Retry,
            result: DispatchResult::AwaitingConfirmation,
        }
    );
    let calls = h.actions.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[2].0, Intent::EditInvoice);
    assert_eq!(calls[2].1["instruction"], "edit total to 5000");
    assert_eq!(calls[2].2.artifact_id.as_deref(), Some("INV-7"));

    let state = h.state().await;
    assert!(state.last_error.is_none());
    assert!(state.in_preview_confirmation());
    assert!(!state
        .pending_artifact_data
        .contains_key(convoy_core::conversation::pending::FAILED_CALL));
}

#[tokio::test]
async fn test_bare_no_policy() {
    let h = harness().await;
    in_preview(&h).await;
    assert_eq!(
        h.say("no").await,
        Outcome::Confirmation(ConfirmationEvent::EditRequested)
    );

    let h = build(
        ScriptedClassifier::default(),
        account(),
        DialogueConfig {
            bare_no: BareNoPolicy::Cancel,
            ..dialogue()
        },
    )
    .await;
    in_preview(&h).await;
    assert_eq!(
        h.say("no").await,
        Outcome::Confirmation(ConfirmationEvent::Cancelled)
    );
}

#[tokio::test]
async fn test_button_press_confirms() {
    let h = harness().await;
    in_preview(&h).await;
    let press = InboundMessage {
        id: Some("wamid.btn".into()),
        identity: USER.into(),
        sender_name: None,
        kind: InboundKind::Button {
            id: "yes".into(),
            title: "Confirm".into(),
        },
        timestamp: chrono::Utc::now(),
    };
    assert_eq!(
        h.gateway.handle(press).await,
        Outcome::Confirmation(ConfirmationEvent::Confirmed)
    );
}

// --- Contextual references ---

#[tokio::test]
async fn test_send_it_after_creation() {
    let h = harness().await;
    h.classifier
        .script("invoice Beta 300", Intent::CreateInvoice, 0.9, json!({}));
    h.actions
        .push(Intent::CreateInvoice, completed_with("INV-2", Some("Beta")));
    h.say("invoice Beta 300").await;

    let outcome = h.say("send it").await;
    assert_eq!(
        outcome,
        Outcome::Dispatched {
            intent: Intent::SendInvoice,
            via: Resolver::Contextual,
            result: DispatchResult::Completed,
        }
    );
    let calls = h.actions.calls();
    assert_eq!(calls[1].2.artifact_id.as_deref(), Some("INV-2"));

    let outcome = h.say("another one").await;
    assert!(matches!(
        outcome,
        Outcome::Dispatched {
            intent: Intent::CreateInvoice,
            via: Resolver::Contextual,
            ..
        }
    ));
    assert_eq!(h.actions.calls()[2].1["client"], "Beta");
}

#[tokio::test]
async fn test_send_it_without_artifact_is_classified() {
    let h = harness().await;
    h.seed(StatePatch::default()).await;
    h.say("send it").await;
    assert_eq!(h.classifier.calls.load(Ordering::SeqCst), 1);
}

// --- Routing edges ---

#[tokio::test]
async fn test_unsupported_intent() {
    let h = harness().await;
    h.classifier
        .script("withdraw 500", Intent::WithdrawFunds, 0.9, json!({}));
    let outcome = h.say("withdraw 500").await;
    assert_eq!(
        outcome,
        Outcome::Dispatched {
            intent: Intent::WithdrawFunds,
            via: Resolver::Classifier,
            result: DispatchResult::NotSupported,
        }
    );
    assert_eq!(outcome.branch(), "not_supported");
    assert!(h.actions.calls().is_empty());
}

#[tokio::test]
async fn test_set_language() {
    let h = harness().await;
    h.classifier.script(
        "reply in spanish",
        Intent::SetLanguage,
        0.9,
        json!({"language": "es"}),
    );
    h.say("reply in spanish").await;
    assert_eq!(h.state().await.language, "Spanish");
    assert_eq!(
        h.channel.last().text_body(),
        "Idioma configurado a: Spanish"
    );

    h.say("help").await;
    assert_eq!(h.channel.last().text_body(), crate::i18n::t("help", "Spanish"));
}

// --- Intake ---

#[tokio::test]
async fn test_duplicate_delivery_is_ignored() {
    let h = harness().await;
    let mut msg = InboundMessage::text(USER, "hi");
    msg.id = Some("wamid.1".into());

    assert_eq!(
        h.gateway.handle(msg.clone()).await,
        Outcome::OutOfScope(OutOfScope::Greeting)
    );
    let sent = h.channel.count();
    assert_eq!(h.gateway.handle(msg).await, Outcome::Duplicate);
    assert_eq!(h.channel.count(), sent);
    assert_eq!(h.history().await.len(), 2);
}

#[tokio::test]
async fn test_unlinked_identity_is_denied() {
    let h = build(ScriptedClassifier::default(), None, dialogue()).await;
    assert_eq!(h.say("hi").await, Outcome::Denied);
    assert_eq!(
        h.channel.last().text_body(),
        AuthConfig::default().deny_message
    );
    assert!(h.store.get(USER).await.unwrap().is_none());
}

#[tokio::test]
async fn test_unlinked_identity_allowed_when_auth_disabled() {
    let store = memory_store().await;
    let channel = Arc::new(RecordingChannel::default());
    let gateway = Gateway::new(
        store.clone(),
        channel.clone(),
        Arc::new(ScriptedClassifier::default()),
        Arc::new(RecordingActions::default()),
        Arc::new(StaticAccounts(None)),
        AuthConfig {
            enabled: false,
            ..Default::default()
        },
        dialogue(),
        0.4,
    );
    let outcome = gateway
        .handle(InboundMessage::text(USER, "hola, buenos días"))
        .await;
    assert_eq!(outcome, Outcome::OutOfScope(OutOfScope::Greeting));
    let state = store.get(USER).await.unwrap().unwrap();
    assert_eq!(state.user_id, USER);
    assert_eq!(state.language, "Spanish");
}

#[tokio::test]
async fn test_unsupported_message_type() {
    let h = harness().await;
    let sticker = InboundMessage {
        id: None,
        identity: USER.into(),
        sender_name: Some("Ana".into()),
        kind: InboundKind::Unsupported {
            type_name: "sticker".into(),
        },
        timestamp: chrono::Utc::now(),
    };
    assert_eq!(
        h.gateway.handle(sticker).await,
        Outcome::Unsupported("sticker".into())
    );
    assert!(h.channel.last().text_body().contains("sticker"));
    assert_eq!(h.classifier.calls.load(Ordering::SeqCst), 0);
}

// --- Voice ---

struct FixedSource;

#[async_trait]
impl MediaSource for FixedSource {
    async fn resolve(&self, _media_id: &str) -> Result<MediaLocation, MediaError> {
        Ok(MediaLocation {
            url: "https://media.example/voice".into(),
            mime_type: Some("audio/ogg".into()),
            file_size: Some(4096),
        })
    }

    async fn fetch(&self, _location: &MediaLocation) -> Result<Vec<u8>, MediaError> {
        Ok(vec![1u8; 4096])
    }
}

struct FixedTranscriber(&'static str);

#[async_trait]
impl Transcriber for FixedTranscriber {
    async fn transcribe(&self, _audio: Vec<u8>, _mime_type: &str) -> Result<String, MediaError> {
        Ok(self.0.to_string())
    }
}

fn voice_gateway(h: Harness, transcript: &'static str) -> Harness {
    let pipeline = VoicePipeline::new(
        Arc::new(FixedSource),
        Some(Arc::new(FixedTranscriber(transcript)) as Arc<dyn Transcriber>),
        &MediaConfig::default(),
    )
    .with_retry(RetryPolicy {
        max_attempts: 2,
        base_delay: Duration::from_millis(1),
    });
    Harness {
        gateway: h.gateway.with_voice(Arc::new(pipeline)),
        ..h
    }
}

fn voice_note() -> InboundMessage {
    InboundMessage {
        id: Some("wamid.voice".into()),
        identity: USER.into(),
        sender_name: None,
        kind: InboundKind::Voice {
            media_id: "media-1".into(),
            mime_type: Some("audio/ogg; codecs=opus".into()),
        },
        timestamp: chrono::Utc::now(),
    }
}

#[tokio::test]
async fn test_silent_voice_note() {
    let h = voice_gateway(harness().await, "  ...  ");
    let outcome = h.gateway.handle(voice_note()).await;
    assert_eq!(outcome, Outcome::VoiceFailed(MediaError::Unclear));
    assert_eq!(
        h.channel.last().text_body(),
        crate::i18n::t("voice_unclear", "English")
    );
    assert_eq!(h.classifier.calls.load(Ordering::SeqCst), 0);
    assert!(h.actions.calls().is_empty());
    assert!(h.state().await.last_error.is_none());

    let history = h.history().await;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].text, "[voice note]");
}

#[tokio::test]
async fn test_voice_note_enters_pipeline_as_text() {
    let h = voice_gateway(harness().await, "wallet balance");
    h.classifier
        .script("wallet balance", Intent::WalletBalance, 0.9, json!({}));
    let outcome = h.gateway.handle(voice_note()).await;
    assert!(matches!(
        outcome,
        Outcome::Dispatched {
            intent: Intent::WalletBalance,
            ..
        }
    ));
    assert_eq!(h.history().await[0].text, "wallet balance");
}

#[tokio::test]
async fn test_voice_without_pipeline() {
    let h = harness().await;
    assert!(matches!(
        h.gateway.handle(voice_note()).await,
        Outcome::VoiceFailed(MediaError::Unavailable(_))
    ));
}

// --- Outcome labels ---

#[test]
fn test_outcome_audit_status() {
    assert_eq!(Outcome::Duplicate.audit_status(), AuditStatus::Duplicate);
    assert_eq!(Outcome::Denied.audit_status(), AuditStatus::Denied);
    assert_eq!(Outcome::Failed.audit_status(), AuditStatus::Error);
    assert_eq!(
        Outcome::Dispatched {
            intent: Intent::WalletBalance,
            via: Resolver::Classifier,
            result: DispatchResult::Rejected,
        }
        .audit_status(),
        AuditStatus::Ok
    );
    assert_eq!(Outcome::Command(Command::Menu).branch(), "menu");
}

trait TextBody {
    fn text_body(&self) -> String;
}

impl TextBody for OutboundPayload {
    fn text_body(&self) -> String {
        self.summary()
    }
}
