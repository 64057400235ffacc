//! WhatsApp Cloud API channel.
//!
//! Inbound messages arrive through the webhook (see [`parse_webhook`]);
//! replies go out through `POST /{phone-number-id}/messages`.
//! Docs: <https://developers.facebook.com/docs/whatsapp/cloud-api>

mod inbound;
pub mod send;
mod signature;
pub mod types;

#[cfg(test)]
mod tests;

pub use inbound::parse_webhook;
pub use signature::{sign, verify_signature};
pub use types::WebhookVerifyQuery;

use async_trait::async_trait;
use convoy_core::{
    config::WhatsAppConfig, error::ConvoyError, message::OutboundPayload, traits::Channel,
};
use std::time::Duration;
use tracing::{debug, warn};

/// WhatsApp channel sending through the Graph API.
pub struct WhatsAppChannel {
    config: WhatsAppConfig,
    client: reqwest::Client,
    messages_url: String,
}

impl WhatsAppChannel {
    /// Create a new WhatsApp channel from config.
    pub fn new(config: WhatsAppConfig) -> Self {
        let messages_url = format!(
            "{}/{}/messages",
            config.graph_base_url.trim_end_matches('/'),
            config.phone_number_id
        );
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.media.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            config,
            client,
            messages_url,
        }
    }
}

#[async_trait]
impl Channel for WhatsAppChannel {
    fn name(&self) -> &str {
        "whatsapp"
    }

    async fn send(&self, identity: &str, payload: &OutboundPayload) -> Result<(), ConvoyError> {
        for body in send::build_requests(identity, payload) {
            let resp = self
                .client
                .post(&self.messages_url)
                .bearer_auth(&self.config.access_token)
                .json(&body)
                .send()
                .await
                .map_err(|e| ConvoyError::Channel(format!("whatsapp send failed: {e}")))?;

            if !resp.status().is_success() {
                let status = resp.status();
                let text = resp.text().await.unwrap_or_default();
                warn!("whatsapp send to {identity} rejected: {status}");
                return Err(ConvoyError::Channel(format!(
                    "whatsapp API error {status}: {text}"
                )));
            }
        }
        debug!("whatsapp: sent {} to {identity}", payload_kind(payload));
        Ok(())
    }
}

fn payload_kind(payload: &OutboundPayload) -> &'static str {
    match payload {
        OutboundPayload::Text { .. } => "text",
        OutboundPayload::Buttons { .. } => "buttons",
        OutboundPayload::List { .. } => "list",
        OutboundPayload::Document { .. } => "document",
        OutboundPayload::Image { .. } => "image",
    }
}
