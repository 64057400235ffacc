//! Contextual references: "preview", "send it", "another one".
//!
//! Resolves short utterances against the last artifact or counterparty
//! without a classifier round-trip. Never writes state.

use super::keywords::*;
use convoy_core::{
    conversation::ConversationState,
    intent::{Entities, Intent},
};
use serde_json::Value;

/// Longer messages carry their own details and go to the classifier.
const MAX_WORDS: usize = 5;

/// Words that may surround a reference without changing it
/// ("send *the invoice now*").
const FILLER: &[&str] = &[
    "it", "me", "that", "this", "the", "invoice", "please", "now", "lo", "la", "el", "factura",
    "por", "favor", "ahora", "isso", "agora", "fatura", "le", "facture", "moi", "stp",
];

/// Entity key under which a pre-seeded counterparty is passed.
pub(super) const COUNTERPARTY_ENTITY: &str = "client";

#[derive(Debug, Clone, PartialEq)]
pub(super) struct ContextualMatch {
    pub intent: Intent,
    pub artifact_id: Option<String>,
    pub entities: Entities,
}

#[derive(Debug, Clone, Copy)]
enum Reference {
    Preview,
    Send,
    Another,
}

const RULES: &[(&[&str], Reference)] = &[
    (PREVIEW_KW, Reference::Preview),
    (SEND_KW, Reference::Send),
    (ANOTHER_KW, Reference::Another),
];

/// First matching rule whose context is present wins.
pub(super) fn resolve(text: &str, state: &ConversationState) -> Option<ContextualMatch> {
    let n = normalize(text);
    if n.is_empty() || word_count(&n) > MAX_WORDS {
        return None;
    }

    let core = n
        .split_whitespace()
        .filter(|w| !FILLER.contains(w))
        .collect::<Vec<_>>()
        .join(" ");

    for (phrases, reference) in RULES {
        if !equals_any(&n, phrases) && !equals_any(&core, phrases) {
            continue;
        }
        if let Some(m) = apply(*reference, state) {
            return Some(m);
        }
    }
    None
}

fn apply(reference: Reference, state: &ConversationState) -> Option<ContextualMatch> {
    match reference {
        Reference::Preview | Reference::Send => {
            let artifact = state.last_artifact_id.clone()?;
            let intent = match reference {
                Reference::Preview => Intent::PreviewInvoice,
                _ => Intent::SendInvoice,
            };
            Some(ContextualMatch {
                intent,
                artifact_id: Some(artifact),
                entities: Entities::new(),
            })
        }
        Reference::Another => {
            let counterparty = state.last_counterparty_name.clone()?;
            let mut entities = Entities::new();
            entities.insert(COUNTERPARTY_ENTITY.into(), Value::String(counterparty));
            Some(ContextualMatch {
                intent: Intent::CreateInvoice,
                artifact_id: None,
                entities,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use convoy_core::conversation::ConversationSeed;

    fn state(artifact: Option<&str>, counterparty: Option<&str>) -> ConversationState {
        let mut s = ConversationState::new("15550001", &ConversationSeed::default());
        s.last_artifact_id = artifact.map(String::from);
        s.last_counterparty_name = counterparty.map(String::from);
        s
    }

    #[test]
    fn test_send_it_resolves_to_last_artifact() {
        let m = resolve("send it", &state(Some("INV-1"), None)).unwrap();
        assert_eq!(m.intent, Intent::SendInvoice);
        assert_eq!(m.artifact_id.as_deref(), Some("INV-1"));
    }

    #[test]
    fn test_send_it_without_artifact_falls_through() {
        assert!(resolve("send it", &state(None, Some("Acme"))).is_none());
    }

    #[test]
    fn test_preview_variants() {
        let s = state(Some("INV-9"), None);
        for text in ["preview", "Show me", "let me see it", "vista previa", "aperçu"] {
            let m = resolve(text, &s).unwrap_or_else(|| panic!("{text} should resolve"));
            assert_eq!(m.intent, Intent::PreviewInvoice);
            assert_eq!(m.artifact_id.as_deref(), Some("INV-9"));
        }
    }

    #[test]
    fn test_another_seeds_counterparty() {
        let m = resolve("another one", &state(None, Some("Acme"))).unwrap();
        assert_eq!(m.intent, Intent::CreateInvoice);
        assert_eq!(m.entities[COUNTERPARTY_ENTITY], "Acme");
        assert!(m.artifact_id.is_none());
        assert!(resolve("another one", &state(Some("INV-1"), None)).is_none());
    }

    #[test]
    fn test_filler_words_ignored() {
        let s = state(Some("INV-4"), None);
        let m = resolve("send the invoice now", &s).unwrap();
        assert_eq!(m.intent, Intent::SendInvoice);
        let m = resolve("show it please", &s).unwrap();
        assert_eq!(m.intent, Intent::PreviewInvoice);
    }

    #[test]
    fn test_references_must_be_the_whole_request() {
        let s = state(Some("INV-1"), Some("Acme"));
        assert!(resolve("show invoices", &s).is_none());
        assert!(resolve("send payslips", &s).is_none());
        assert!(resolve("another route for Beta", &s).is_none());
    }

    #[test]
    fn test_long_messages_ignored() {
        let s = state(Some("INV-1"), Some("Acme"));
        assert!(resolve("send an invoice to Beta for 300 today", &s).is_none());
        assert!(resolve("list routes", &s).is_none());
    }
}
