//! Remote intent classifier.
//!
//! `POST {endpoint}` with `{"text", "language"}`; the response carries an
//! intent wire name, a confidence in `[0, 1]` and free-form entities.

use async_trait::async_trait;
use convoy_core::{
    config::ClassifierConfig,
    error::ConvoyError,
    intent::{Classification, Entities, Intent},
    traits::IntentClassifier,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use crate::http_client;

pub struct HttpIntentClassifier {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpIntentClassifier {
    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self {
            client: http_client(config.timeout_secs),
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
        }
    }
}

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    text: &'a str,
    language: &'a str,
}

#[derive(Deserialize)]
struct ClassifyResponse {
    intent: String,
    #[serde(default)]
    confidence: f32,
    #[serde(default)]
    entities: Entities,
}

/// Unknown wire names become `UNKNOWN`; confidence is clamped to `[0, 1]`.
fn into_classification(resp: ClassifyResponse) -> Classification {
    let intent = resp.intent.parse().unwrap_or_else(|_| {
        warn!("classifier returned unmapped intent '{}'", resp.intent);
        Intent::Unknown
    });
    let confidence = if resp.confidence.is_finite() {
        resp.confidence.clamp(0.0, 1.0)
    } else {
        0.0
    };
    Classification {
        intent,
        confidence,
        entities: resp.entities,
    }
}

#[async_trait]
impl IntentClassifier for HttpIntentClassifier {
    async fn classify(&self, text: &str, language: &str) -> Result<Classification, ConvoyError> {
        if self.endpoint.is_empty() {
            return Err(ConvoyError::Classifier("classifier endpoint not configured".into()));
        }

        let start = Instant::now();
        let mut req = self
            .client
            .post(&self.endpoint)
            .json(&ClassifyRequest { text, language });
        if !self.api_key.is_empty() {
            req = req.bearer_auth(&self.api_key);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| ConvoyError::Classifier(format!("classifier request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(ConvoyError::Classifier(format!(
                "classifier returned {status}: {body}"
            )));
        }

        let parsed: ClassifyResponse = resp
            .json()
            .await
            .map_err(|e| ConvoyError::Classifier(format!("failed to parse response: {e}")))?;

        let classification = into_classification(parsed);
        debug!(
            "classifier: {} ({:.2}) in {}ms",
            classification.intent,
            classification.confidence,
            start.elapsed().as_millis()
        );
        Ok(classification)
    }
}
