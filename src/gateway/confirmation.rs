//! Post-preview confirmation flow: confirm / send / cancel / edit.
//!
//! Rules are evaluated top to bottom and the first match wins. Send and
//! cancel come first; a confirmation only counts when nothing after the
//! confirming word asks for another action.

use super::keywords::*;
use convoy_core::config::BareNoPolicy;

/// Confirmations only count on short replies; longer text mentioning
/// "correct" is an edit instruction.
const CONFIRM_MAX_WORDS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationAction {
    Confirm,
    Send,
    Cancel,
    Edit,
}

/// Event emitted once an action has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationEvent {
    Confirmed,
    SendNow,
    Cancelled,
    EditRequested,
}

impl From<ConfirmationAction> for ConfirmationEvent {
    fn from(action: ConfirmationAction) -> Self {
        match action {
            ConfirmationAction::Confirm => Self::Confirmed,
            ConfirmationAction::Send => Self::SendNow,
            ConfirmationAction::Cancel => Self::Cancelled,
            ConfirmationAction::Edit => Self::EditRequested,
        }
    }
}

type Rule = (fn(&str) -> bool, ConfirmationAction);

fn is_confirm(n: &str) -> bool {
    if equals_any(n, CONFIRM_KW) {
        return true;
    }
    if word_count(n) > CONFIRM_MAX_WORDS {
        return false;
    }
    // Longest confirming prefix, so "looks good" is not read as "looks".
    let Some(lead) = CONFIRM_KW
        .iter()
        .filter(|p| n.starts_with(&format!("{p} ")))
        .max_by_key(|p| p.len())
    else {
        return false;
    };
    // "correct the total" is an instruction, not an approval.
    if equals_any(lead, EDIT_KW) {
        return false;
    }
    let rest = &n[lead.len() + 1..];
    !(is_send(rest) || is_cancel(rest) || is_edit(rest))
}

fn is_send(n: &str) -> bool {
    contains_any(n, SEND_KW)
}

fn is_cancel(n: &str) -> bool {
    contains_any(n, CANCEL_KW)
}

fn is_edit(n: &str) -> bool {
    contains_any(n, EDIT_KW)
}

const RULES: &[Rule] = &[
    (is_send, ConfirmationAction::Send),
    (is_cancel, ConfirmationAction::Cancel),
    (is_confirm, ConfirmationAction::Confirm),
    (is_edit, ConfirmationAction::Edit),
];

/// Classify a reply to a preview. `None` leaves the confirmation open.
pub(super) fn classify(text: &str, bare_no: BareNoPolicy) -> Option<ConfirmationAction> {
    let n = normalize(text);
    if n.is_empty() {
        return None;
    }
    if let Some((_, action)) = RULES.iter().find(|(pred, _)| pred(&n)) {
        return Some(*action);
    }
    if equals_any(&n, BARE_NO_KW) {
        return Some(match bare_no {
            BareNoPolicy::Edit => ConfirmationAction::Edit,
            BareNoPolicy::Cancel => ConfirmationAction::Cancel,
        });
    }
    None
}
