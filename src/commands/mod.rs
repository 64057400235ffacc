//! Literal chat commands: answered locally, no classifier call.


use crate::i18n::t;
use convoy_core::message::{ListRow, ListSection, OutboundPayload};

/// Known chat commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    Menu,
}

impl Command {
    /// Parse a command from the whole message. Anything with extra words
    /// is not a command ("help me create an invoice" goes to the classifier).
    pub fn parse(text: &str) -> Option<Self> {
        let normalized = text.trim().to_lowercase();
        match normalized.as_str() {
            "help" | "/help" | "?" | "ayuda" | "ajuda" | "aide" => Some(Self::Help),
            "menu" | "/menu" | "menú" => Some(Self::Menu),
            _ => None,
        }
    }

    /// The reply for this command in the given language.
    pub fn reply(self, lang: &str) -> OutboundPayload {
        match self {
            Self::Help => OutboundPayload::text(t("help", lang)),
            Self::Menu => menu(lang),
        }
    }
}

/// Menu rows: (row id, label key). Ids are plain utterances so that a
/// list reply re-enters the pipeline like typed text.
const BILLING_ROWS: &[(&str, &str)] = &[
    ("create invoice", "row_create_invoice"),
    ("list invoices", "row_list_invoices"),
    ("list clients", "row_list_clients"),
    ("wallet balance", "row_wallet_balance"),
    ("revenue report", "row_revenue_report"),
];

const OPERATIONS_ROWS: &[(&str, &str)] = &[
    ("list routes", "row_list_routes"),
    ("list drivers", "row_list_drivers"),
    ("list vehicles", "row_list_vehicles"),
    ("payroll summary", "row_payroll_summary"),
];

fn rows(entries: &[(&str, &str)], lang: &str) -> Vec<ListRow> {
    entries
        .iter()
        .map(|(id, key)| ListRow {
            id: (*id).to_string(),
            title: t(key, lang).to_string(),
            description: None,
        })
        .collect()
}

/// Interactive list with the most common operations.
pub fn menu(lang: &str) -> OutboundPayload {
    OutboundPayload::List {
        body: t("menu_body", lang).to_string(),
        button: t("menu_button", lang).to_string(),
        sections: vec![
            ListSection {
                title: t("menu_billing", lang).to_string(),
                rows: rows(BILLING_ROWS, lang),
            },
            ListSection {
                title: t("menu_operations", lang).to_string(),
                rows: rows(OPERATIONS_ROWS, lang),
            },
        ],
    }
}
