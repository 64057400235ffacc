use thiserror::Error;

/// Top-level error type for convoy.
#[derive(Debug, Error)]
pub enum ConvoyError {
    /// The external intent classifier failed or was unreachable.
    #[error("classifier error: {0}")]
    Classifier(String),

    /// Error from a messaging channel (outbound send, webhook parsing).
    #[error("channel error: {0}")]
    Channel(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Conversation store error (unavailable, query failure).
    #[error("store error: {0}")]
    Store(String),

    /// Transport failure while calling an action handler.
    #[error("action handler error: {0}")]
    Handler(String),

    /// Media download or transcription failure.
    #[error("media error: {0}")]
    Media(#[from] MediaError),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ConvoyError {
    /// Infrastructure failures worth surfacing as "try again later"
    /// rather than as a business answer.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Store(_) | Self::Handler(_) | Self::Classifier(_) | Self::Io(_) => true,
            Self::Media(m) => m.is_transient(),
            _ => false,
        }
    }
}

/// Why a voice note could not be turned into text.
///
/// Each variant maps to its own user-facing explanation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaError {
    /// Audio decoded fine but produced no usable speech.
    #[error("audio was empty or too quiet")]
    Unclear,

    /// File is truncated, undecodable, or below the minimum size.
    #[error("media corrupted: {0}")]
    Corrupted(String),

    /// The download or transcription did not finish in time.
    #[error("media timed out: {0}")]
    Timeout(String),

    /// Network failure or a 5xx/429 from the provider.
    #[error("transient media failure: {0}")]
    Transient(String),

    /// Permanent failure (4xx, expired media id, transcription not configured).
    #[error("media unavailable: {0}")]
    Unavailable(String),
}

impl MediaError {
    /// Whether a retry has a chance of succeeding.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Transient(_))
    }
}
