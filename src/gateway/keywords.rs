//! Phrase matching helpers and the small-talk detectors.
//!
//! Static phrase arrays live in `keywords_data.rs`. Re-exported here so the
//! resolvers see a single flat namespace.

pub(super) use super::keywords_data::*;

/// Utterances longer than this are never treated as small talk.
const SMALL_TALK_MAX_WORDS: usize = 6;

/// Lower-case, drop punctuation (apostrophes vanish, other marks become
/// spaces) and collapse whitespace.
pub(super) fn normalize(text: &str) -> String {
    let mapped: String = text
        .chars()
        .filter(|c| *c != '\'' && *c != '\u{2019}')
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();
    mapped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

pub(super) fn word_count(normalized: &str) -> usize {
    normalized.split_whitespace().count()
}

/// Whole-word phrase containment on normalized text.
pub(super) fn kw_match(normalized: &str, phrase: &str) -> bool {
    normalized == phrase
        || normalized.starts_with(&format!("{phrase} "))
        || normalized.ends_with(&format!(" {phrase}"))
        || normalized.contains(&format!(" {phrase} "))
}

pub(super) fn contains_any(normalized: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| kw_match(normalized, p))
}

pub(super) fn equals_any(normalized: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| normalized == *p)
}

/// Text starts with one of `phrases` as whole words.
pub(super) fn starts_with_any(normalized: &str, phrases: &[&str]) -> bool {
    phrases
        .iter()
        .any(|p| normalized == *p || normalized.starts_with(&format!("{p} ")))
}

/// Short thank-you or praise.
pub(crate) fn detect_compliment(text: &str) -> bool {
    let n = normalize(text);
    word_count(&n) <= SMALL_TALK_MAX_WORDS && contains_any(&n, COMPLIMENT_KW)
}

/// Short hello with nothing actionable after it.
pub(crate) fn is_greeting(text: &str) -> bool {
    let n = normalize(text);
    word_count(&n) <= 4 && starts_with_any(&n, GREETING_KW)
}

/// "How are you", "who are you" and friends.
pub(crate) fn is_chit_chat(text: &str) -> bool {
    let n = normalize(text);
    word_count(&n) <= SMALL_TALK_MAX_WORDS && contains_any(&n, CHIT_CHAT_KW)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Send IT!! "), "send it");
        assert_eq!(normalize("that's right."), "thats right");
        assert_eq!(normalize("¿Qué tal?"), "qué tal");
        assert_eq!(normalize("edit total, to 5000"), "edit total to 5000");
    }

    #[test]
    fn test_kw_match_whole_words_only() {
        assert!(kw_match("please send it now", "send it"));
        assert!(kw_match("send", "send"));
        assert!(!kw_match("resend", "send"));
        assert!(!kw_match("sender list", "send"));
        assert!(kw_match("ok then cancel", "cancel"));
    }

    #[test]
    fn test_detect_compliment() {
        assert!(detect_compliment("Thanks!"));
        assert!(detect_compliment("great job, you're the best"));
        assert!(detect_compliment("muchas gracias"));
        assert!(detect_compliment("merci beaucoup"));
        assert!(!detect_compliment("perfect"));
        assert!(!detect_compliment("looks good"));
        assert!(!detect_compliment(
            "thanks, now create an invoice for Acme for 5000 due next week"
        ));
    }

    #[test]
    fn test_is_greeting() {
        assert!(is_greeting("hi"));
        assert!(is_greeting("Hello there"));
        assert!(is_greeting("Buenos días!"));
        assert!(is_greeting("bonjour"));
        assert!(!is_greeting("history of invoices"));
        assert!(!is_greeting("hi can you create an invoice for Acme"));
    }

    #[test]
    fn test_is_chit_chat() {
        assert!(is_chit_chat("how are you?"));
        assert!(is_chit_chat("¿Cómo estás?"));
        assert!(is_chit_chat("ça va ?"));
        assert!(!is_chit_chat("list routes"));
    }
}
