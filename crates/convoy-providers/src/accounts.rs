//! Identity → account lookup against the back office.

use async_trait::async_trait;
use convoy_core::{
    config::ActionsConfig,
    error::ConvoyError,
    traits::{Account, AccountDirectory},
};
use tracing::debug;

use crate::http_client;

/// `GET {base_url}/accounts/{identity}`; 404 means "not linked".
pub struct HttpAccountDirectory {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpAccountDirectory {
    pub fn from_config(config: &ActionsConfig) -> Self {
        Self {
            client: http_client(config.timeout_secs),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }
}

#[async_trait]
impl AccountDirectory for HttpAccountDirectory {
    async fn lookup(&self, identity: &str) -> Result<Option<Account>, ConvoyError> {
        if self.base_url.is_empty() {
            return Ok(None);
        }

        let url = format!("{}/accounts/{}", self.base_url, identity.trim_start_matches('+'));
        let mut req = self.client.get(&url);
        if !self.api_key.is_empty() {
            req = req.bearer_auth(&self.api_key);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| ConvoyError::Handler(format!("account lookup failed: {e}")))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            debug!("accounts: {identity} not linked");
            return Ok(None);
        }
        if !resp.status().is_success() {
            let status = resp.status();
            return Err(ConvoyError::Handler(format!(
                "account lookup returned {status}"
            )));
        }

        let account: Account = resp
            .json()
            .await
            .map_err(|e| ConvoyError::Handler(format!("account lookup parse failed: {e}")))?;
        Ok(Some(account))
    }
}
