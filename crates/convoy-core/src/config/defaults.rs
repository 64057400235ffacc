//! Default value functions used by serde for config deserialization.

pub fn default_name() -> String {
    "convoy".to_string()
}

pub fn default_data_dir() -> String {
    "~/.convoy".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_true() -> bool {
    true
}

pub fn default_deny_message() -> String {
    "This number is not linked to a convoy account. Ask your administrator to add it.".to_string()
}

pub fn default_api_host() -> String {
    "127.0.0.1".to_string()
}

pub fn default_api_port() -> u16 {
    8080
}

pub fn default_graph_base_url() -> String {
    "https://graph.facebook.com/v19.0".to_string()
}

pub fn default_whisper_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

pub fn default_media_max_attempts() -> u32 {
    3
}

pub fn default_media_base_delay_ms() -> u64 {
    500
}

pub fn default_media_timeout_secs() -> u64 {
    20
}

pub fn default_min_audio_bytes() -> usize {
    1024
}

pub fn default_db_path() -> String {
    "~/.convoy/data/convoy.db".to_string()
}

pub fn default_history_limit() -> usize {
    20
}

pub fn default_min_confidence() -> f32 {
    0.4
}

pub fn default_http_timeout_secs() -> u64 {
    15
}

pub fn default_language() -> String {
    "English".to_string()
}

pub fn default_max_retries() -> u32 {
    3
}
