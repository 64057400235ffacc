//! Stop-word language detection and language-name resolution.

/// Guess the language of a message from common stop words.
///
/// Returns `None` when no supported language scores above the threshold,
/// so the caller can fall back to its configured default.
pub fn detect_language(text: &str) -> Option<&'static str> {
    let lower = format!(" {} ", text.to_lowercase());

    let languages: &[(&str, &[&str])] = &[
        (
            "Spanish",
            &[
                " que ", " por ", " para ", " con ", " una ", " los ", " las ", " del ", " hola",
                "gracias", "necesito", "quiero", "factura", " ruta", "conductor", "buenos",
            ],
        ),
        (
            "Portuguese",
            &[
                " com ", " uma ", " dos ", " das ", " não ", " mais ", " isso ", "olá", " oi ",
                "obrigad", "preciso", "você", "fatura", "motorista",
            ],
        ),
        (
            "French",
            &[
                " les ", " des ", " une ", " est ", " pas ", " pour ", " dans ", " avec ",
                "bonjour", "merci", " je ", " nous ", "facture", "chauffeur",
            ],
        ),
        (
            "English",
            &[
                " the ", " and ", " for ", " to ", " my ", " is ", " hi ", "hello", " please",
                "thanks", "invoice", " list ", " show ", " create ",
            ],
        ),
    ];

    let mut best = None;
    let mut best_score = 0usize;

    for (lang, words) in languages {
        let score = words.iter().filter(|w| lower.contains(**w)).count();
        if score > best_score {
            best_score = score;
            best = Some(*lang);
        }
    }

    // Short messages (≤3 words): 1 match suffices ("hola", "bonjour").
    // Longer messages need 2+ to avoid false positives.
    let word_count = lower.split_whitespace().count();
    let threshold = if word_count <= 3 { 1 } else { 2 };
    if best_score >= threshold {
        best
    } else {
        None
    }
}

/// Map a user-supplied language name or code to a supported language.
pub fn resolve_language(name: &str) -> Option<&'static str> {
    match name.trim().to_lowercase().as_str() {
        "en" | "english" | "inglés" | "ingles" | "inglês" | "anglais" => Some("English"),
        "es" | "spanish" | "español" | "espanol" | "espanhol" | "espagnol" => Some("Spanish"),
        "pt" | "portuguese" | "português" | "portugues" | "portugués" | "portugais" => {
            Some("Portuguese")
        }
        "fr" | "french" | "français" | "francais" | "francés" | "francês" => Some("French"),
        _ => None,
    }
}
