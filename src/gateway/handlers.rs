//! Static intent → handler table.

use convoy_core::intent::{Intent, IntentDomain};

/// Where a resolved intent is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Target {
    /// Answered by the gateway itself.
    Local(LocalAction),
    /// Forwarded to the back-office handler for this domain.
    Remote(IntentDomain),
    /// No handler yet: generic "not supported" reply.
    Unsupported,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LocalAction {
    Help,
    SetLanguage,
}

pub(crate) fn route(intent: Intent) -> Target {
    use Intent::*;
    match intent {
        Help => Target::Local(LocalAction::Help),
        SetLanguage => Target::Local(LocalAction::SetLanguage),

        CreateInvoice | PreviewInvoice | SendInvoice | EditInvoice | ListInvoices
        | InvoiceStatus | MarkInvoicePaid | CancelInvoice => Target::Remote(IntentDomain::Invoice),

        AddClient | ListClients | UpdateClient | ClientBalance => {
            Target::Remote(IntentDomain::Client)
        }

        WalletBalance | FundWallet | TransferFunds | WalletTransactions => {
            Target::Remote(IntentDomain::Wallet)
        }

        AddRoute | ListRoutes | UpdateRoute | AssignRoute | RouteStatus => {
            Target::Remote(IntentDomain::Route)
        }

        AddDriver | ListDrivers | UpdateDriver | DriverPerformance | AssignVehicle => {
            Target::Remote(IntentDomain::Driver)
        }

        AddVehicle | ListVehicles | UpdateVehicle | VehicleStatus => {
            Target::Remote(IntentDomain::Vehicle)
        }

        RunPayroll | PayrollSummary | PaySlip | AddDeduction => {
            Target::Remote(IntentDomain::Payroll)
        }

        RevenueReport | ExpenseReport | TripReport => Target::Remote(IntentDomain::Report),

        ContactSupport | AccountInfo => Target::Remote(IntentDomain::Utility),

        WithdrawFunds | VehicleMaintenance | ExportReport | Unknown => Target::Unsupported,
    }
}
