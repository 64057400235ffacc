//! WhatsApp Cloud API webhook deserialization types.
//!
//! Every collection defaults to empty: status callbacks, template events and
//! other non-message notifications arrive on the same endpoint.

use serde::Deserialize;

/// Query string of the subscription handshake (`GET /webhook`).
#[derive(Debug, Deserialize)]
pub struct WebhookVerifyQuery {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WebhookPayload {
    #[serde(default)]
    pub object: Option<String>,
    #[serde(default)]
    pub entry: Vec<WebhookEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WebhookEntry {
    #[serde(default)]
    pub changes: Vec<WebhookChange>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WebhookChange {
    #[serde(default)]
    pub value: WebhookValue,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct WebhookValue {
    #[serde(default)]
    pub contacts: Vec<WaContact>,
    #[serde(default)]
    pub messages: Vec<WaMessage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WaContact {
    #[serde(default)]
    pub profile: Option<WaProfile>,
    #[serde(default)]
    pub wa_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WaProfile {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WaMessage {
    pub from: String,
    #[serde(default)]
    pub id: Option<String>,
    /// Unix seconds, as a string.
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(rename = "type", default)]
    pub msg_type: String,
    #[serde(default)]
    pub text: Option<WaText>,
    #[serde(default)]
    pub audio: Option<WaMedia>,
    #[serde(default)]
    pub voice: Option<WaMedia>,
    #[serde(default)]
    pub button: Option<WaButton>,
    #[serde(default)]
    pub interactive: Option<WaInteractive>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WaText {
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WaMedia {
    pub id: String,
    #[serde(default)]
    pub mime_type: Option<String>,
}

/// Template quick-reply button.
#[derive(Debug, Deserialize)]
pub(crate) struct WaButton {
    #[serde(default)]
    pub payload: Option<String>,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WaInteractive {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub button_reply: Option<WaReply>,
    #[serde(default)]
    pub list_reply: Option<WaReply>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WaReply {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
}
