//! Tests for the WhatsApp channel module.

use super::send::*;
use super::*;
use convoy_core::message::{InboundKind, ListRow, ListSection, ReplyButton};

fn envelope(messages: &str) -> String {
    format!(
        r#"{{
            "object": "whatsapp_business_account",
            "entry": [{{
                "id": "WABA_ID",
                "changes": [{{
                    "field": "messages",
                    "value": {{
                        "messaging_product": "whatsapp",
                        "metadata": {{"display_phone_number": "15550000", "phone_number_id": "123"}},
                        "contacts": [{{"profile": {{"name": "Dana"}}, "wa_id": "15551234"}}],
                        "messages": [{messages}]
                    }}
                }}]
            }}]
        }}"#
    )
}

#[test]
fn test_parse_text_message() {
    let body = envelope(
        r#"{"from": "15551234", "id": "wamid.1", "timestamp": "1700000000", "type": "text", "text": {"body": "list routes"}}"#,
    );
    let msgs = parse_webhook(body.as_bytes()).unwrap();
    assert_eq!(msgs.len(), 1);
    let m = &msgs[0];
    assert_eq!(m.identity, "15551234");
    assert_eq!(m.id.as_deref(), Some("wamid.1"));
    assert_eq!(m.sender_name.as_deref(), Some("Dana"));
    assert_eq!(m.timestamp.timestamp(), 1_700_000_000);
    assert_eq!(
        m.kind,
        InboundKind::Text {
            body: "list routes".into()
        }
    );
}

#[test]
fn test_parse_audio_message() {
    let body = envelope(
        r#"{"from": "15551234", "id": "wamid.2", "type": "audio", "audio": {"id": "MEDIA1", "mime_type": "audio/ogg; codecs=opus", "voice": true}}"#,
    );
    let msgs = parse_webhook(body.as_bytes()).unwrap();
    assert_eq!(
        msgs[0].kind,
        InboundKind::Voice {
            media_id: "MEDIA1".into(),
            mime_type: Some("audio/ogg; codecs=opus".into())
        }
    );
}

#[test]
fn test_parse_interactive_replies() {
    let body = envelope(
        r#"{"from": "15551234", "id": "wamid.3", "type": "interactive", "interactive": {"type": "button_reply", "button_reply": {"id": "yes", "title": "Confirm"}}},
           {"from": "15551234", "id": "wamid.4", "type": "interactive", "interactive": {"type": "list_reply", "list_reply": {"id": "list routes", "title": "Routes"}}}"#,
    );
    let msgs = parse_webhook(body.as_bytes()).unwrap();
    assert_eq!(msgs.len(), 2);
    assert_eq!(
        msgs[0].kind,
        InboundKind::Button {
            id: "yes".into(),
            title: "Confirm".into()
        }
    );
    assert_eq!(
        msgs[1].kind,
        InboundKind::ListReply {
            id: "list routes".into(),
            title: "Routes".into()
        }
    );
}

#[test]
fn test_parse_template_button() {
    let body = envelope(
        r#"{"from": "15551234", "id": "wamid.5", "type": "button", "button": {"payload": "send", "text": "Send now"}}"#,
    );
    let msgs = parse_webhook(body.as_bytes()).unwrap();
    assert_eq!(msgs[0].kind.canonical_text().as_deref(), Some("send"));
}

#[test]
fn test_parse_unsupported_types() {
    for t in ["image", "video", "document", "location", "sticker", "contacts"] {
        let body = envelope(&format!(
            r#"{{"from": "15551234", "id": "wamid.x", "type": "{t}", "{t}": {{}}}}"#
        ));
        let msgs = parse_webhook(body.as_bytes()).unwrap();
        assert_eq!(
            msgs[0].kind,
            InboundKind::Unsupported {
                type_name: t.to_string()
            }
        );
    }
}

#[test]
fn test_parse_status_only_notification() {
    let body = r#"{
        "object": "whatsapp_business_account",
        "entry": [{"id": "W", "changes": [{"field": "messages", "value": {
            "messaging_product": "whatsapp",
            "statuses": [{"id": "wamid.1", "status": "delivered"}]
        }}]}]
    }"#;
    assert!(parse_webhook(body.as_bytes()).unwrap().is_empty());
}

#[test]
fn test_parse_malformed_json_errors() {
    let err = parse_webhook(b"{not json").unwrap_err();
    assert!(format!("{err}").contains("malformed webhook payload"));
}

#[test]
fn test_text_request_body() {
    let reqs = build_requests("+15551234", &OutboundPayload::text("hello"));
    assert_eq!(reqs.len(), 1);
    assert_eq!(reqs[0]["to"], "15551234");
    assert_eq!(reqs[0]["type"], "text");
    assert_eq!(reqs[0]["text"]["body"], "hello");
}

#[test]
fn test_long_text_split() {
    let long = "line of text\n".repeat(800);
    let reqs = build_requests("1", &OutboundPayload::text(long));
    assert!(reqs.len() >= 3);
    for r in &reqs {
        assert!(r["text"]["body"].as_str().unwrap().len() <= MAX_TEXT_BYTES);
    }
}

#[test]
fn test_buttons_capped_and_clipped() {
    let buttons: Vec<ReplyButton> = (0..5)
        .map(|i| ReplyButton {
            id: format!("b{i}"),
            title: format!("A really quite long title {i}"),
        })
        .collect();
    let reqs = build_requests(
        "1",
        &OutboundPayload::Buttons {
            body: "Pick one".into(),
            buttons,
        },
    );
    let action = &reqs[0]["interactive"]["action"]["buttons"];
    let arr = action.as_array().unwrap();
    assert_eq!(arr.len(), MAX_BUTTONS);
    for b in arr {
        let title = b["reply"]["title"].as_str().unwrap();
        assert!(title.chars().count() <= MAX_BUTTON_TITLE_CHARS);
    }
    assert_eq!(arr[0]["reply"]["id"], "b0");
}

#[test]
fn test_list_rows_capped_across_sections() {
    let section = |name: &str| ListSection {
        title: name.into(),
        rows: (0..7)
            .map(|i| ListRow {
                id: format!("{name}-{i}"),
                title: format!("Row {i}"),
                description: Some("desc".into()),
            })
            .collect(),
    };
    let reqs = build_requests(
        "1",
        &OutboundPayload::List {
            body: "Menu".into(),
            button: "Open menu".into(),
            sections: vec![section("a"), section("b")],
        },
    );
    let sections = reqs[0]["interactive"]["action"]["sections"]
        .as_array()
        .unwrap();
    let total: usize = sections
        .iter()
        .map(|s| s["rows"].as_array().unwrap().len())
        .sum();
    assert_eq!(total, MAX_LIST_ROWS);
}

#[test]
fn test_document_and_image_bodies() {
    let reqs = build_requests(
        "1",
        &OutboundPayload::Document {
            url: "https://x/inv.pdf".into(),
            filename: Some("INV-1.pdf".into()),
            caption: None,
        },
    );
    assert_eq!(reqs[0]["type"], "document");
    assert_eq!(reqs[0]["document"]["link"], "https://x/inv.pdf");
    assert_eq!(reqs[0]["document"]["filename"], "INV-1.pdf");

    let reqs = build_requests(
        "1",
        &OutboundPayload::Image {
            url: "https://x/p.png".into(),
            caption: Some("Preview".into()),
        },
    );
    assert_eq!(reqs[0]["image"]["caption"], "Preview");
}

#[test]
fn test_signature_roundtrip() {
    let body = br#"{"object":"whatsapp_business_account"}"#;
    let header = sign("s3cret", body);
    assert!(header.starts_with("sha256="));
    assert!(verify_signature("s3cret", body, Some(&header)));
    assert!(!verify_signature("other", body, Some(&header)));
    assert!(!verify_signature("s3cret", b"tampered", Some(&header)));
    assert!(!verify_signature("s3cret", body, None));
    assert!(!verify_signature("s3cret", body, Some("sha256=zz")));
}

#[test]
fn test_verify_query_deserialize() {
    let q: WebhookVerifyQuery = serde_json::from_str(
        r#"{"hub.mode":"subscribe","hub.verify_token":"tok","hub.challenge":"42"}"#,
    )
    .unwrap();
    assert_eq!(q.mode.as_deref(), Some("subscribe"));
    assert_eq!(q.challenge.as_deref(), Some("42"));
}

#[test]
fn test_channel_name() {
    let ch = WhatsAppChannel::new(convoy_core::config::WhatsAppConfig::default());
    assert_eq!(ch.name(), "whatsapp");
}
