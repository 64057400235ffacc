//! Format helpers for strings with interpolation.

use super::t;

/// Format the language set confirmation.
pub fn language_set(lang: &str, new_lang: &str) -> String {
    match lang {
        "Spanish" => format!("Idioma configurado a: {new_lang}"),
        "Portuguese" => format!("Idioma definido para: {new_lang}"),
        "French" => format!("Langue d\u{00e9}finie sur: {new_lang}"),
        _ => format!("Language set to: {new_lang}"),
    }
}

/// Rejection of an inbound message type the engine cannot read.
pub fn unsupported_type(lang: &str, type_name: &str) -> String {
    match lang {
        "Spanish" => format!(
            "Todav\u{00ed}a no puedo leer mensajes de tipo _{type_name}_. Env\u{00ed}ame texto o una nota de voz."
        ),
        "Portuguese" => format!(
            "Ainda n\u{00e3}o consigo ler mensagens do tipo _{type_name}_. Envie texto ou um \u{00e1}udio."
        ),
        "French" => format!(
            "Je ne sais pas encore lire les messages de type _{type_name}_. Envoyez du texte ou une note vocale."
        ),
        _ => format!(
            "I can't read _{type_name}_ messages yet. Please send text or a voice note."
        ),
    }
}

/// A business-rule rejection with its next step.
pub fn rejection(lang: &str, reason: &str, hint: Option<&str>) -> String {
    let next = hint.unwrap_or_else(|| t("retry_hint", lang));
    format!("{reason}\n{next}")
}

/// Fill the `{topic}` slot of an acknowledgement template.
pub fn ack(template: &str, topic: &str) -> String {
    template.replace("{topic}", topic)
}
