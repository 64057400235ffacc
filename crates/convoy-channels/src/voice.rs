//! Voice note → text, degrading to a specific failure cause.
//!
//! resolve (retried) → size check → fetch (retried) → size check →
//! transcribe → usable-speech check. Any failure aborts with a
//! [`MediaError`] the caller turns into a cause-specific reply.

use convoy_core::{
    config::MediaConfig,
    error::MediaError,
    traits::{MediaSource, Transcriber},
};
use std::sync::Arc;
use tracing::{info, warn};

use crate::media::RetryPolicy;

const DEFAULT_AUDIO_MIME: &str = "audio/ogg";

pub struct VoicePipeline {
    source: Arc<dyn MediaSource>,
    transcriber: Option<Arc<dyn Transcriber>>,
    retry: RetryPolicy,
    min_audio_bytes: usize,
}

impl VoicePipeline {
    pub fn new(
        source: Arc<dyn MediaSource>,
        transcriber: Option<Arc<dyn Transcriber>>,
        config: &MediaConfig,
    ) -> Self {
        Self {
            source,
            transcriber,
            retry: RetryPolicy::from_config(config),
            min_audio_bytes: config.min_audio_bytes,
        }
    }

    /// Override the retry policy (tests use millisecond delays).
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Download and transcribe a voice note.
    pub async fn transcribe_voice(
        &self,
        media_id: &str,
        mime_type: Option<&str>,
    ) -> Result<String, MediaError> {
        let Some(ref transcriber) = self.transcriber else {
            return Err(MediaError::Unavailable(
                "voice transcription is not configured".into(),
            ));
        };

        let location = self
            .retry
            .run("media resolve", || self.source.resolve(media_id))
            .await?;

        if let Some(size) = location.file_size {
            if (size as usize) < self.min_audio_bytes {
                return Err(MediaError::Corrupted(format!(
                    "declared size {size} bytes is below {}",
                    self.min_audio_bytes
                )));
            }
        }

        let bytes = self
            .retry
            .run("media download", || self.source.fetch(&location))
            .await?;

        if bytes.len() < self.min_audio_bytes {
            return Err(MediaError::Corrupted(format!(
                "downloaded {} bytes, below {}",
                bytes.len(),
                self.min_audio_bytes
            )));
        }

        let mime = location
            .mime_type
            .as_deref()
            .or(mime_type)
            .unwrap_or(DEFAULT_AUDIO_MIME)
            .to_string();
        let size = bytes.len();

        let transcript = transcriber.transcribe(bytes, &mime).await.map_err(|e| {
            warn!("transcription of {media_id} failed: {e}");
            e
        })?;

        let transcript = transcript.trim();
        if !transcript.chars().any(char::is_alphanumeric) {
            return Err(MediaError::Unclear);
        }

        info!("transcribed voice note {media_id} ({size} bytes)");
        Ok(transcript.to_string())
    }
}
