use serde::{Deserialize, Serialize};

use super::defaults::*;

/// Channel configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ChannelConfig {
    pub whatsapp: Option<WhatsAppConfig>,
}

/// WhatsApp Cloud API channel config.
///
/// Inbound traffic arrives on the webhook served by `[api]`; outbound
/// messages and media downloads go through the Graph API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhatsAppConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Permanent or system-user access token.
    #[serde(default)]
    pub access_token: String,
    /// Sender phone number id (not the phone number itself).
    #[serde(default)]
    pub phone_number_id: String,
    #[serde(default = "default_graph_base_url")]
    pub graph_base_url: String,
    /// OpenAI API key for voice transcription. Empty = voice notes are rejected.
    #[serde(default)]
    pub whisper_api_key: String,
    #[serde(default = "default_whisper_base_url")]
    pub whisper_base_url: String,
    #[serde(default)]
    pub media: MediaConfig,
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            access_token: String::new(),
            phone_number_id: String::new(),
            graph_base_url: default_graph_base_url(),
            whisper_api_key: String::new(),
            whisper_base_url: default_whisper_base_url(),
            media: MediaConfig::default(),
        }
    }
}

/// Retry and validation settings for voice-note media.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Total download attempts, including the first one.
    #[serde(default = "default_media_max_attempts")]
    pub max_attempts: u32,
    /// Delay before the second attempt; doubled for each further attempt.
    #[serde(default = "default_media_base_delay_ms")]
    pub base_delay_ms: u64,
    /// Per-request timeout for URL resolution, download and transcription.
    #[serde(default = "default_media_timeout_secs")]
    pub timeout_secs: u64,
    /// Audio payloads smaller than this are treated as corrupted.
    #[serde(default = "default_min_audio_bytes")]
    pub min_audio_bytes: usize,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_media_max_attempts(),
            base_delay_ms: default_media_base_delay_ms(),
            timeout_secs: default_media_timeout_secs(),
            min_audio_bytes: default_min_audio_bytes(),
        }
    }
}
