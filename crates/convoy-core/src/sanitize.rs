//! Inbound text cleanup.
//!
//! Strips control and zero-width characters, collapses whitespace runs and
//! caps the length, so the pattern tables and the classifier see a stable
//! shape regardless of the client that produced the text.

/// Longest text passed on to resolution, in characters.
pub const MAX_INPUT_CHARS: usize = 2000;

/// Result of sanitizing a user message.
#[derive(Debug)]
pub struct SanitizeResult {
    /// The cleaned text.
    pub text: String,
    /// Whether anything was changed.
    pub was_modified: bool,
    /// Descriptions of what was changed.
    pub warnings: Vec<String>,
}

fn is_invisible(c: char) -> bool {
    matches!(
        c,
        '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{2060}' | '\u{FEFF}' | '\u{00AD}'
    )
}

/// Sanitize user input before it reaches the resolvers.
pub fn sanitize(input: &str) -> SanitizeResult {
    let mut warnings = Vec::new();

    let mut stripped = 0usize;
    let visible: String = input
        .chars()
        .filter(|c| {
            let drop = is_invisible(*c) || (c.is_control() && !c.is_whitespace());
            if drop {
                stripped += 1;
            }
            !drop
        })
        .collect();
    if stripped > 0 {
        warnings.push(format!("stripped {stripped} invisible/control chars"));
    }

    let collapsed = visible.split_whitespace().collect::<Vec<_>>().join(" ");

    let text = if collapsed.chars().count() > MAX_INPUT_CHARS {
        warnings.push(format!("truncated to {MAX_INPUT_CHARS} chars"));
        collapsed.chars().take(MAX_INPUT_CHARS).collect()
    } else {
        collapsed
    };

    let was_modified = text != input;

    SanitizeResult {
        text,
        was_modified,
        warnings,
    }
}
