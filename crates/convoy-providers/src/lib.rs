//! # convoy-providers
//!
//! HTTP adapters for the external collaborators behind the conversation
//! engine: the intent classifier, the business action handlers, and the
//! account directory.

pub mod accounts;
pub mod actions;
pub mod classifier;

pub use accounts::HttpAccountDirectory;
pub use actions::HttpActionHandler;
pub use classifier::HttpIntentClassifier;

/// Build a client with a request timeout, falling back to defaults.
pub(crate) fn http_client(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
