use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An inbound message, normalized from whatever shape the provider delivered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Provider message id. `None` for locally injected messages (CLI).
    pub id: Option<String>,
    /// Channel address of the end user (e.g. the WhatsApp phone number).
    pub identity: String,
    /// Profile name, when the provider sends one.
    #[serde(default)]
    pub sender_name: Option<String>,
    pub kind: InboundKind,
    pub timestamp: DateTime<Utc>,
}

impl InboundMessage {
    /// Build a plain text message without a provider id.
    pub fn text(identity: &str, body: &str) -> Self {
        Self {
            id: None,
            identity: identity.to_string(),
            sender_name: None,
            kind: InboundKind::Text {
                body: body.to_string(),
            },
            timestamp: Utc::now(),
        }
    }
}

/// The five inbound shapes the engine understands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InboundKind {
    Text {
        body: String,
    },
    /// Voice note or audio file; needs transcription before it has text.
    Voice {
        media_id: String,
        mime_type: Option<String>,
    },
    /// Quick-reply button press.
    Button { id: String, title: String },
    /// Row picked from an interactive list.
    ListReply { id: String, title: String },
    /// Anything else (image, location, sticker, ...).
    Unsupported { type_name: String },
}

impl InboundKind {
    /// Text the resolvers should see, when the shape carries text directly.
    ///
    /// Button and list replies prefer their id: outbound buttons and list
    /// rows use canonical utterances ("yes", "list routes") as ids.
    pub fn canonical_text(&self) -> Option<String> {
        match self {
            Self::Text { body } => Some(body.clone()),
            Self::Button { id, title } | Self::ListReply { id, title } => {
                if id.trim().is_empty() {
                    Some(title.clone())
                } else {
                    Some(id.clone())
                }
            }
            Self::Voice { .. } | Self::Unsupported { .. } => None,
        }
    }

    /// Short label for logs and audit rows.
    pub fn label(&self) -> &str {
        match self {
            Self::Text { .. } => "text",
            Self::Voice { .. } => "voice",
            Self::Button { .. } => "button",
            Self::ListReply { .. } => "list_reply",
            Self::Unsupported { type_name } => type_name,
        }
    }
}

/// Everything the engine can send back. The dispatcher only ever hands
/// these to `Channel::send`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundPayload {
    Text {
        body: String,
    },
    Buttons {
        body: String,
        buttons: Vec<ReplyButton>,
    },
    List {
        body: String,
        /// Label of the button that opens the list.
        button: String,
        sections: Vec<ListSection>,
    },
    Document {
        url: String,
        #[serde(default)]
        filename: Option<String>,
        #[serde(default)]
        caption: Option<String>,
    },
    Image {
        url: String,
        #[serde(default)]
        caption: Option<String>,
    },
}

impl OutboundPayload {
    pub fn text(body: impl Into<String>) -> Self {
        Self::Text { body: body.into() }
    }

    /// Plain-text rendering used for conversation history and audit.
    pub fn summary(&self) -> String {
        match self {
            Self::Text { body } | Self::Buttons { body, .. } | Self::List { body, .. } => {
                body.clone()
            }
            Self::Document {
                url,
                filename,
                caption,
            } => {
                let name = filename.as_deref().unwrap_or(url);
                match caption {
                    Some(c) => format!("[document: {name}] {c}"),
                    None => format!("[document: {name}]"),
                }
            }
            Self::Image { url, caption } => match caption {
                Some(c) => format!("[image: {url}] {c}"),
                None => format!("[image: {url}]"),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplyButton {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListSection {
    pub title: String,
    pub rows: Vec<ListRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListRow {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}
