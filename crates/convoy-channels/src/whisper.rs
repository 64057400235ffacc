//! Whisper transcription for voice notes.

use async_trait::async_trait;
use convoy_core::{error::MediaError, traits::Transcriber};
use serde::Deserialize;
use std::time::Duration;

use crate::media::{classify_request_error, classify_status};

/// Whisper API response.
#[derive(Deserialize)]
struct WhisperResponse {
    text: String,
}

/// File name Whisper should see for a MIME type; it sniffs the format from
/// the extension.
fn file_name_for(mime_type: &str) -> &'static str {
    let base = mime_type.split(';').next().unwrap_or("").trim();
    match base {
        "audio/mpeg" | "audio/mp3" => "voice.mp3",
        "audio/mp4" | "audio/m4a" | "audio/x-m4a" | "audio/aac" => "voice.m4a",
        "audio/wav" | "audio/x-wav" => "voice.wav",
        "audio/webm" => "voice.webm",
        _ => "voice.ogg",
    }
}

/// Transcriber backed by an OpenAI-compatible `/audio/transcriptions` endpoint.
pub struct WhisperTranscriber {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl WhisperTranscriber {
    pub fn new(api_key: &str, base_url: &str, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    async fn transcribe(&self, audio: Vec<u8>, mime_type: &str) -> Result<String, MediaError> {
        let mime = mime_type.split(';').next().unwrap_or("audio/ogg").trim();
        let part = reqwest::multipart::Part::bytes(audio)
            .file_name(file_name_for(mime_type))
            .mime_str(mime)
            .map_err(|e| MediaError::Corrupted(format!("whisper mime error: {e}")))?;

        let form = reqwest::multipart::Form::new()
            .text("model", "whisper-1")
            .part("file", part);

        let resp = self
            .client
            .post(format!("{}/audio/transcriptions", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| classify_request_error("whisper request", e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            // Whisper answers 400 for audio it cannot decode.
            if status == reqwest::StatusCode::BAD_REQUEST {
                return Err(MediaError::Corrupted(format!("whisper rejected audio: {body}")));
            }
            return Err(classify_status("whisper", status));
        }

        let result: WhisperResponse = resp
            .json()
            .await
            .map_err(|e| MediaError::Transient(format!("whisper response parse failed: {e}")))?;

        Ok(result.text)
    }
}
