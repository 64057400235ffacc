//! Business action handlers served by the back office over HTTP.
//!
//! Each intent maps to `POST {base_url}/{domain}/{intent}` (lower-case), e.g.
//! `CREATE_INVOICE` → `/invoice/create_invoice`. The body carries the
//! entities and the caller context; the response is an [`ActionOutcome`].

use async_trait::async_trait;
use convoy_core::{
    config::ActionsConfig,
    error::ConvoyError,
    intent::{Entities, Intent},
    traits::{ActionContext, ActionHandler, ActionOutcome},
};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use crate::http_client;

pub struct HttpActionHandler {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpActionHandler {
    pub fn from_config(config: &ActionsConfig) -> Self {
        Self {
            client: http_client(config.timeout_secs),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }
}

/// Path segment for an intent, relative to the back-office base URL.
pub fn route_path(intent: Intent) -> String {
    format!(
        "{}/{}",
        intent.domain().as_str(),
        intent.as_str().to_ascii_lowercase()
    )
}

#[derive(Serialize)]
struct ActionRequest<'a> {
    intent: Intent,
    entities: &'a Entities,
    context: &'a ActionContext,
}

/// Shape of a 4xx business rejection without a full outcome body.
#[derive(Deserialize)]
struct RejectionBody {
    #[serde(alias = "error", alias = "message")]
    reason: String,
    #[serde(default)]
    hint: Option<String>,
}

/// Interpret a 422 body: a full outcome, a bare `{reason}` or plain text.
fn parse_rejection(body: &str) -> ActionOutcome {
    if let Ok(outcome) = serde_json::from_str::<ActionOutcome>(body) {
        return outcome;
    }
    if let Ok(r) = serde_json::from_str::<RejectionBody>(body) {
        return ActionOutcome::Rejected {
            reason: r.reason,
            hint: r.hint,
        };
    }
    ActionOutcome::Rejected {
        reason: body.trim().to_string(),
        hint: None,
    }
}

#[async_trait]
impl ActionHandler for HttpActionHandler {
    async fn handle(
        &self,
        intent: Intent,
        entities: &Entities,
        ctx: &ActionContext,
    ) -> Result<ActionOutcome, ConvoyError> {
        if self.base_url.is_empty() {
            return Err(ConvoyError::Handler("actions base_url not configured".into()));
        }

        let url = format!("{}/{}", self.base_url, route_path(intent));
        debug!("actions: POST {url}");
        let start = Instant::now();

        let mut req = self.client.post(&url).json(&ActionRequest {
            intent,
            entities,
            context: ctx,
        });
        if !self.api_key.is_empty() {
            req = req.bearer_auth(&self.api_key);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| ConvoyError::Handler(format!("{intent} request failed: {e}")))?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNPROCESSABLE_ENTITY {
            let body = resp.text().await.unwrap_or_default();
            return Ok(parse_rejection(&body));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!("actions: {intent} returned {status}");
            return Err(ConvoyError::Handler(format!(
                "{intent} returned {status}: {body}"
            )));
        }

        let outcome: ActionOutcome = resp
            .json()
            .await
            .map_err(|e| ConvoyError::Handler(format!("{intent}: failed to parse response: {e}")))?;

        debug!(
            "actions: {intent} finished in {}ms",
            start.elapsed().as_millis()
        );
        Ok(outcome)
    }
}
