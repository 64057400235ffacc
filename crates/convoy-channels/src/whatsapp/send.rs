//! Outbound payload → Graph API `/messages` request bodies.
//!
//! Provider limits are applied here so callers never have to care: long text
//! is split, buttons and list rows are capped and their titles clipped.

use convoy_core::message::{ListSection, OutboundPayload, ReplyButton};
use serde_json::{json, Value};

use crate::utils::{clip, split_message};

pub const MAX_TEXT_BYTES: usize = 4096;
pub const MAX_INTERACTIVE_BODY_CHARS: usize = 1024;
pub const MAX_BUTTONS: usize = 3;
pub const MAX_BUTTON_TITLE_CHARS: usize = 20;
pub const MAX_LIST_ROWS: usize = 10;
pub const MAX_ROW_TITLE_CHARS: usize = 24;
pub const MAX_ROW_DESCRIPTION_CHARS: usize = 72;
pub const MAX_CAPTION_CHARS: usize = 1024;

fn envelope(to: &str, kind: &str, content: Value) -> Value {
    let mut body = json!({
        "messaging_product": "whatsapp",
        "recipient_type": "individual",
        "to": to.trim_start_matches('+'),
        "type": kind,
    });
    body[kind] = content;
    body
}

fn buttons_body(to: &str, text: &str, buttons: &[ReplyButton]) -> Value {
    let buttons: Vec<Value> = buttons
        .iter()
        .take(MAX_BUTTONS)
        .map(|b| {
            json!({
                "type": "reply",
                "reply": {"id": b.id, "title": clip(&b.title, MAX_BUTTON_TITLE_CHARS)}
            })
        })
        .collect();
    envelope(
        to,
        "interactive",
        json!({
            "type": "button",
            "body": {"text": clip(text, MAX_INTERACTIVE_BODY_CHARS)},
            "action": {"buttons": buttons}
        }),
    )
}

fn list_body(to: &str, text: &str, button: &str, sections: &[ListSection]) -> Value {
    let mut remaining = MAX_LIST_ROWS;
    let mut out = Vec::new();
    for section in sections {
        if remaining == 0 {
            break;
        }
        let rows: Vec<Value> = section
            .rows
            .iter()
            .take(remaining)
            .map(|r| {
                let mut row = json!({
                    "id": r.id,
                    "title": clip(&r.title, MAX_ROW_TITLE_CHARS),
                });
                if let Some(ref d) = r.description {
                    row["description"] = json!(clip(d, MAX_ROW_DESCRIPTION_CHARS));
                }
                row
            })
            .collect();
        remaining -= rows.len();
        out.push(json!({
            "title": clip(&section.title, MAX_ROW_TITLE_CHARS),
            "rows": rows
        }));
    }
    envelope(
        to,
        "interactive",
        json!({
            "type": "list",
            "body": {"text": clip(text, MAX_INTERACTIVE_BODY_CHARS)},
            "action": {
                "button": clip(button, MAX_BUTTON_TITLE_CHARS),
                "sections": out
            }
        }),
    )
}

/// Build the request bodies for one payload. Text may need several.
pub fn build_requests(to: &str, payload: &OutboundPayload) -> Vec<Value> {
    match payload {
        OutboundPayload::Text { body } => split_message(body, MAX_TEXT_BYTES)
            .into_iter()
            .map(|chunk| envelope(to, "text", json!({"body": chunk, "preview_url": false})))
            .collect(),
        OutboundPayload::Buttons { body, buttons } => vec![buttons_body(to, body, buttons)],
        OutboundPayload::List {
            body,
            button,
            sections,
        } => vec![list_body(to, body, button, sections)],
        OutboundPayload::Document {
            url,
            filename,
            caption,
        } => {
            let mut doc = json!({"link": url});
            if let Some(f) = filename {
                doc["filename"] = json!(f);
            }
            if let Some(c) = caption {
                doc["caption"] = json!(clip(c, MAX_CAPTION_CHARS));
            }
            vec![envelope(to, "document", doc)]
        }
        OutboundPayload::Image { url, caption } => {
            let mut image = json!({"link": url});
            if let Some(c) = caption {
                image["caption"] = json!(clip(c, MAX_CAPTION_CHARS));
            }
            vec![envelope(to, "image", image)]
        }
    }
}
