mod channels;
mod defaults;


pub use channels::*;

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::ConvoyError;
use defaults::*;

/// Top-level convoy configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub convoy: ConvoyConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub channel: ChannelConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub actions: ActionsConfig,
    #[serde(default)]
    pub dialogue: DialogueConfig,
}

/// General service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvoyConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ConvoyConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Account-linking enforcement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// When true, identities without a linked account are refused.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Message sent to unlinked identities.
    #[serde(default = "default_deny_message")]
    pub deny_message: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            deny_message: default_deny_message(),
        }
    }
}

/// Webhook HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_host")]
    pub host: String,
    #[serde(default = "default_api_port")]
    pub port: u16,
    /// Token echoed back during the webhook subscription handshake.
    #[serde(default)]
    pub verify_token: String,
    /// App secret used to check `X-Hub-Signature-256`. Empty = unchecked.
    #[serde(default)]
    pub app_secret: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_api_host(),
            port: default_api_port(),
            verify_token: String::new(),
            app_secret: String::new(),
        }
    }
}

/// Conversation store config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// SQLite file path, or `:memory:` for an ephemeral store.
    #[serde(default = "default_db_path")]
    pub db_path: String,
    /// Maximum history entries kept per identity.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            history_limit: default_history_limit(),
        }
    }
}

/// External intent classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    /// Classifications below this confidence are handled as out of scope.
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f32,
    #[serde(default = "default_http_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            min_confidence: default_min_confidence(),
            timeout_secs: default_http_timeout_secs(),
        }
    }
}

/// Business back office that implements the action handlers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionsConfig {
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_http_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ActionsConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: String::new(),
            timeout_secs: default_http_timeout_secs(),
        }
    }
}

/// What a bare "no" means while a preview is awaiting confirmation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BareNoPolicy {
    /// Treat it as a request to edit the draft.
    #[default]
    Edit,
    /// Treat it as a cancellation.
    Cancel,
}

/// Dialogue behavior knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogueConfig {
    #[serde(default)]
    pub bare_no: BareNoPolicy,
    /// Reply language when neither the account nor the text gives one.
    #[serde(default = "default_language")]
    pub default_language: String,
    /// User-initiated retries allowed before asking the user to rephrase.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Fixed seed for reply phrasing. Unset = seeded from entropy.
    #[serde(default)]
    pub reply_seed: Option<u64>,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            bare_no: BareNoPolicy::default(),
            default_language: default_language(),
            max_retries: default_max_retries(),
            reply_seed: None,
        }
    }
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

/// Fill empty secrets from the environment.
fn apply_env_overrides(config: &mut Config) {
    fn fill(slot: &mut String, var: &str) {
        if slot.is_empty() {
            if let Ok(value) = std::env::var(var) {
                *slot = value;
            }
        }
    }

    if let Some(ref mut wa) = config.channel.whatsapp {
        fill(&mut wa.access_token, "CONVOY_WHATSAPP_TOKEN");
        fill(&mut wa.whisper_api_key, "OPENAI_API_KEY");
    }
    fill(&mut config.api.app_secret, "CONVOY_APP_SECRET");
    fill(&mut config.classifier.api_key, "CONVOY_CLASSIFIER_KEY");
    fill(&mut config.actions.api_key, "CONVOY_ACTIONS_KEY");
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist.
pub fn load(path: &str) -> Result<Config, ConvoyError> {
    let path = Path::new(path);
    let mut config = if !path.exists() {
        info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        Config::default()
    } else {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConvoyError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content)
            .map_err(|e| ConvoyError::Config(format!("failed to parse config: {}", e)))?
    };

    apply_env_overrides(&mut config);
    Ok(config)
}
