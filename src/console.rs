//! Stdout channel used by `convoy ask`.

use async_trait::async_trait;
use convoy_core::{error::ConvoyError, message::OutboundPayload, traits::Channel};

pub struct ConsoleChannel;

/// Render a payload the way a chat client would show it, roughly.
pub fn render(payload: &OutboundPayload) -> String {
    match payload {
        OutboundPayload::Buttons { body, buttons } => {
            let labels: Vec<String> = buttons
                .iter()
                .map(|b| format!("[{}]", b.title))
                .collect();
            format!("{body}\n{}", labels.join(" "))
        }
        OutboundPayload::List {
            body,
            button,
            sections,
        } => {
            let mut out = format!("{body}\n({button})");
            for section in sections {
                out.push_str(&format!("\n  {}", section.title));
                for row in &section.rows {
                    out.push_str(&format!("\n   - {}", row.title));
                }
            }
            out
        }
        other => other.summary(),
    }
}

#[async_trait]
impl Channel for ConsoleChannel {
    fn name(&self) -> &str {
        "console"
    }

    async fn send(&self, _identity: &str, payload: &OutboundPayload) -> Result<(), ConvoyError> {
        println!("{}\n", render(payload));
        Ok(())
    }
}
