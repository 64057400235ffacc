//! Static phrase tables for the pattern-based resolvers.
//!
//! Phrases are matched against normalized text (see `keywords::normalize`),
//! so entries are lower-case with no punctuation. Accented and unaccented
//! spellings are both listed where users commonly type either.

// --- Small talk ---

pub(super) const COMPLIMENT_KW: &[&str] = &[
    "thank you",
    "thanks",
    "thx",
    "great job",
    "good job",
    "well done",
    "you are the best",
    "youre the best",
    "good bot",
    "awesome",
    "love it",
    "gracias",
    "muchas gracias",
    "buen trabajo",
    "eres el mejor",
    "genial",
    "obrigado",
    "obrigada",
    "bom trabalho",
    "muito bom",
    "merci",
    "bravo",
    "bon travail",
    "super boulot",
];

pub(super) const GREETING_KW: &[&str] = &[
    "hi",
    "hello",
    "hey",
    "good morning",
    "good afternoon",
    "good evening",
    "hola",
    "buenos dias",
    "buenos días",
    "buenas tardes",
    "buenas noches",
    "buenas",
    "ola",
    "olá",
    "oi",
    "bom dia",
    "boa tarde",
    "boa noite",
    "bonjour",
    "bonsoir",
    "salut",
];

pub(super) const CHIT_CHAT_KW: &[&str] = &[
    "how are you",
    "whats up",
    "what is up",
    "who are you",
    "are you a bot",
    "are you human",
    "how is it going",
    "como estas",
    "cómo estás",
    "que tal",
    "qué tal",
    "quien eres",
    "quién eres",
    "como vai",
    "tudo bem",
    "quem é você",
    "quem e voce",
    "ça va",
    "ca va",
    "comment ça va",
    "qui es tu",
];

// --- Confirmation flow ---

/// Whole-utterance confirmations. Matched only on short replies.
pub(super) const CONFIRM_KW: &[&str] = &[
    "yes",
    "y",
    "yeah",
    "yep",
    "ok",
    "okay",
    "confirm",
    "confirmed",
    "looks good",
    "correct",
    "perfect",
    "thats right",
    "all good",
    "si",
    "sí",
    "correcto",
    "perfecto",
    "confirmar",
    "esta bien",
    "está bien",
    "sim",
    "certo",
    "perfeito",
    "oui",
    "parfait",
    "confirmer",
    "cest bon",
];

pub(super) const SEND_KW: &[&str] = &[
    "send",
    "send it",
    "email",
    "email it",
    "deliver",
    "deliver it",
    "enviar",
    "envíala",
    "enviala",
    "mandar",
    "mándala",
    "mandala",
    "envoyer",
    "envoie",
    "envia",
];

pub(super) const CANCEL_KW: &[&str] = &[
    "cancel",
    "discard",
    "nevermind",
    "never mind",
    "forget it",
    "cancelar",
    "descartar",
    "olvídalo",
    "olvidalo",
    "deixa pra la",
    "annuler",
    "abandonner",
    "laisse tomber",
];

pub(super) const EDIT_KW: &[&str] = &[
    "edit",
    "change",
    "update",
    "modify",
    "fix",
    "correct",
    "editar",
    "cambiar",
    "cambia",
    "modificar",
    "corregir",
    "corrige",
    "alterar",
    "mudar",
    "corrigir",
    "modifier",
    "changer",
    "corriger",
];

/// A bare refusal. Its meaning during a preview is a configured policy.
pub(super) const BARE_NO_KW: &[&str] = &["no", "nope", "nah", "não", "nao", "non"];

// --- Follow-ups ---

pub(super) const YES_KW: &[&str] = &[
    "yes", "y", "yeah", "yep", "ok", "okay", "sure", "go ahead", "si", "sí", "dale", "sim",
    "claro", "oui", "daccord",
];

pub(super) const NO_KW: &[&str] = &[
    "no", "nope", "nah", "cancel", "não", "nao", "non", "cancelar", "annuler",
];

pub(super) const RETRY_KW: &[&str] = &[
    "try again",
    "retry",
    "redo",
    "repeat",
    "again please",
    "reintentar",
    "intenta de nuevo",
    "tentar de novo",
    "tente de novo",
    "de novo",
    "réessayer",
    "reessayer",
    "recommence",
];

// --- Contextual references ---

pub(super) const PREVIEW_KW: &[&str] = &[
    "preview",
    "show",
    "show it",
    "show me",
    "let me see",
    "let me see it",
    "see it",
    "view it",
    "vista previa",
    "muéstrame",
    "muestrame",
    "mostrar",
    "a ver",
    "ver",
    "mostra",
    "me mostra",
    "aperçu",
    "apercu",
    "montre",
    "montre moi",
];

pub(super) const ANOTHER_KW: &[&str] = &[
    "another",
    "another one",
    "one more",
    "same again",
    "same client",
    "otra",
    "otra más",
    "otra mas",
    "otro",
    "outra",
    "mais uma",
    "une autre",
    "encore une",
];
