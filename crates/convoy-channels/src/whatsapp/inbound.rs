//! Webhook body → canonical `InboundMessage`s.

use chrono::{DateTime, Utc};
use convoy_core::{
    error::ConvoyError,
    message::{InboundKind, InboundMessage},
};
use tracing::debug;

use super::types::{WaContact, WaMessage, WebhookPayload};

/// Parse a webhook delivery into zero or more inbound messages.
///
/// Non-message notifications (delivery statuses, etc.) yield an empty list.
/// Only malformed JSON is an error.
pub fn parse_webhook(body: &[u8]) -> Result<Vec<InboundMessage>, ConvoyError> {
    let payload: WebhookPayload = serde_json::from_slice(body)
        .map_err(|e| ConvoyError::Channel(format!("malformed webhook payload: {e}")))?;

    if let Some(ref object) = payload.object {
        if object != "whatsapp_business_account" {
            debug!("ignoring webhook for object '{object}'");
            return Ok(Vec::new());
        }
    }

    let mut out = Vec::new();
    for entry in payload.entry {
        for change in entry.changes {
            let contacts = change.value.contacts;
            for msg in change.value.messages {
                out.push(normalize(msg, &contacts));
            }
        }
    }
    Ok(out)
}

fn sender_name(from: &str, contacts: &[WaContact]) -> Option<String> {
    contacts
        .iter()
        .find(|c| c.wa_id.as_deref() == Some(from))
        .or_else(|| contacts.first())
        .and_then(|c| c.profile.as_ref())
        .and_then(|p| p.name.clone())
}

fn parse_timestamp(ts: Option<&str>) -> DateTime<Utc> {
    ts.and_then(|s| s.parse::<i64>().ok())
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .unwrap_or_else(Utc::now)
}

fn normalize(msg: WaMessage, contacts: &[WaContact]) -> InboundMessage {
    let kind = match msg.msg_type.as_str() {
        "text" => match msg.text {
            Some(t) => InboundKind::Text { body: t.body },
            None => unsupported("text"),
        },
        "audio" | "voice" => match msg.audio.or(msg.voice) {
            Some(media) => InboundKind::Voice {
                media_id: media.id,
                mime_type: media.mime_type,
            },
            None => unsupported("audio"),
        },
        "button" => match msg.button {
            Some(b) => InboundKind::Button {
                id: b.payload.unwrap_or_default(),
                title: b.text,
            },
            None => unsupported("button"),
        },
        "interactive" => match msg.interactive {
            Some(i) => match (i.kind.as_str(), i.button_reply, i.list_reply) {
                ("button_reply", Some(r), _) => InboundKind::Button {
                    id: r.id,
                    title: r.title,
                },
                ("list_reply", _, Some(r)) => InboundKind::ListReply {
                    id: r.id,
                    title: r.title,
                },
                (other, _, _) => unsupported(&format!("interactive:{other}")),
            },
            None => unsupported("interactive"),
        },
        other if other.is_empty() => unsupported("unknown"),
        other => unsupported(other),
    };

    InboundMessage {
        sender_name: sender_name(&msg.from, contacts),
        timestamp: parse_timestamp(msg.timestamp.as_deref()),
        id: msg.id,
        identity: msg.from,
        kind,
    }
}

fn unsupported(type_name: &str) -> InboundKind {
    InboundKind::Unsupported {
        type_name: type_name.to_string(),
    }
}
