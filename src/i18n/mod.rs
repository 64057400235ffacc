//! Internationalization: localized canned replies.
//!
//! Uses a simple `t(key, lang)` function for static strings,
//! `format_*`-style helpers for strings with interpolation and
//! phrase families for replies picked at random.
//! Supported languages: English (fallback), Spanish, Portuguese, French.

mod detect;
mod format;
mod labels;
mod phrases;
mod replies;


pub use detect::{detect_language, resolve_language};
pub use format::*;
pub use phrases::{family, topic, Family};

/// Languages with a full set of replies.
pub const SUPPORTED_LANGUAGES: &[&str] = &["English", "Spanish", "Portuguese", "French"];

/// Return a localized static string for `key` in the given `lang`.
/// Falls back to English for unsupported languages.
pub fn t(key: &str, lang: &str) -> &'static str {
    if let Some(v) = replies::lookup(key, lang) {
        return v;
    }
    if let Some(v) = labels::lookup(key, lang) {
        return v;
    }
    "???"
}
