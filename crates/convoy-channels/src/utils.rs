//! Shared utilities for outbound formatting.

/// Largest char boundary in `text` that is `<= index`.
fn floor_boundary(text: &str, index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    let mut i = index;
    while !text.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Split a long message into chunks that respect a platform's byte limit.
///
/// All slice boundaries are aligned to UTF-8 char boundaries to avoid panics
/// on multi-byte content. Prefers splitting at newline boundaries when possible.
pub fn split_message(text: &str, max_len: usize) -> Vec<&str> {
    if text.len() <= max_len {
        return vec![text];
    }

    let mut chunks = Vec::new();
    let mut start = 0;

    while start < text.len() {
        let mut end = floor_boundary(text, (start + max_len).min(text.len()));
        if end == start {
            // max_len smaller than one char; take the whole char.
            end = start + text[start..].chars().next().map_or(1, char::len_utf8);
        }
        let break_at = if end < text.len() {
            text[start..end]
                .rfind('\n')
                .filter(|&i| i > 0)
                .map(|i| start + i + 1)
                .unwrap_or(end)
        } else {
            end
        };
        chunks.push(&text[start..break_at]);
        start = break_at;
    }

    chunks
}

/// Cut to at most `max_chars` characters, marking the cut with an ellipsis.
pub fn clip(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{kept}…")
}
