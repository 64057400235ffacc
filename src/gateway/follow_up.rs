//! Short context-free replies: yes/no, numbered options, retry.

use super::keywords::*;
use convoy_core::{
    conversation::ConversationState,
    intent::{Entities, Intent},
};

/// Numbered follow-up options offered after an intent, indexed from "1".
const OPTION_MAP: &[(Intent, [Intent; 4])] = &[
    (
        Intent::CreateInvoice,
        [
            Intent::PreviewInvoice,
            Intent::SendInvoice,
            Intent::EditInvoice,
            Intent::CreateInvoice,
        ],
    ),
    (
        Intent::PreviewInvoice,
        [
            Intent::SendInvoice,
            Intent::EditInvoice,
            Intent::CancelInvoice,
            Intent::CreateInvoice,
        ],
    ),
    (
        Intent::ListInvoices,
        [
            Intent::CreateInvoice,
            Intent::InvoiceStatus,
            Intent::MarkInvoicePaid,
            Intent::RevenueReport,
        ],
    ),
    (
        Intent::AddClient,
        [
            Intent::CreateInvoice,
            Intent::ListClients,
            Intent::UpdateClient,
            Intent::ClientBalance,
        ],
    ),
    (
        Intent::WalletBalance,
        [
            Intent::FundWallet,
            Intent::TransferFunds,
            Intent::WalletTransactions,
            Intent::RevenueReport,
        ],
    ),
    (
        Intent::ListRoutes,
        [
            Intent::AddRoute,
            Intent::AssignRoute,
            Intent::RouteStatus,
            Intent::TripReport,
        ],
    ),
    (
        Intent::ListDrivers,
        [
            Intent::AddDriver,
            Intent::AssignVehicle,
            Intent::DriverPerformance,
            Intent::PaySlip,
        ],
    ),
    (
        Intent::ListVehicles,
        [
            Intent::AddVehicle,
            Intent::VehicleStatus,
            Intent::AssignVehicle,
            Intent::UpdateVehicle,
        ],
    ),
    (
        Intent::PayrollSummary,
        [
            Intent::RunPayroll,
            Intent::PaySlip,
            Intent::AddDeduction,
            Intent::ExpenseReport,
        ],
    ),
];

/// Option `n` (1-based) offered after `intent`.
pub(super) fn option_for(intent: Intent, n: usize) -> Option<Intent> {
    let (_, options) = OPTION_MAP.iter().find(|(i, _)| *i == intent)?;
    options.get(n.checked_sub(1)?).copied()
}

#[derive(Debug, Clone, PartialEq)]
pub(super) enum FollowUp {
    /// "yes" to a pending yes/no question: re-run the pending intent confirmed.
    Accept {
        intent: Intent,
        entities: Entities,
        artifact_id: Option<String>,
    },
    /// "no" to a pending yes/no question.
    Decline,
    /// Numbered option picked against the last intent.
    Option {
        intent: Intent,
        artifact_id: Option<String>,
    },
    /// Re-run the last failed intent with whatever it was called with.
    Retry {
        intent: Intent,
        entities: Entities,
        artifact_id: Option<String>,
    },
}

pub(super) fn resolve(text: &str, state: &ConversationState) -> Option<FollowUp> {
    let n = normalize(text);
    if n.is_empty() {
        return None;
    }

    // --- yes / no outside a preview ---
    if state.awaiting_confirmation && !state.in_preview_confirmation() {
        if equals_any(&n, YES_KW) {
            if let Some(intent) = state.pending_intent() {
                return Some(FollowUp::Accept {
                    intent,
                    entities: state.pending_entities(),
                    artifact_id: state.pending_artifact_id().map(String::from),
                });
            }
        }
        if equals_any(&n, NO_KW) {
            return Some(FollowUp::Decline);
        }
    }

    // --- numbered option ---
    if let Ok(choice) = n.parse::<usize>() {
        if (1..=4).contains(&choice) {
            let intent = option_for(state.last_intent?, choice)?;
            return Some(FollowUp::Option {
                intent,
                artifact_id: state.last_artifact_id.clone(),
            });
        }
    }

    // --- retry ---
    if contains_any(&n, RETRY_KW) {
        state.last_error.as_ref()?;
        let intent = state.last_intent?;
        let (entities, artifact_id) = match state.retry_call() {
            Some(call) if call.intent == intent => (call.entities, call.artifact_id),
            _ => (Entities::new(), None),
        };
        return Some(FollowUp::Retry {
            intent,
            entities,
            artifact_id,
        });
    }

    None
}
