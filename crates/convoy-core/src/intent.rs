//! Intent taxonomy: the closed set of business actions a message can request.
//!
//! Adding an intent means adding a variant here, listing it in [`Intent::ALL`],
//! and adding a routing arm in the gateway. Unrouted intents get the
//! "not yet supported" reply.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Free-form entities extracted by the classifier or set by resolvers.
pub type Entities = serde_json::Map<String, serde_json::Value>;

/// Business domain an intent belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentDomain {
    Invoice,
    Client,
    Wallet,
    Route,
    Driver,
    Vehicle,
    Payroll,
    Report,
    Utility,
}

impl IntentDomain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invoice => "invoice",
            Self::Client => "client",
            Self::Wallet => "wallet",
            Self::Route => "route",
            Self::Driver => "driver",
            Self::Vehicle => "vehicle",
            Self::Payroll => "payroll",
            Self::Report => "report",
            Self::Utility => "utility",
        }
    }
}

impl fmt::Display for IntentDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    // --- Invoice ---
    CreateInvoice,
    PreviewInvoice,
    SendInvoice,
    EditInvoice,
    ListInvoices,
    InvoiceStatus,
    MarkInvoicePaid,
    CancelInvoice,
    // --- Client ---
    AddClient,
    ListClients,
    UpdateClient,
    ClientBalance,
    // --- Wallet ---
    WalletBalance,
    FundWallet,
    TransferFunds,
    WalletTransactions,
    WithdrawFunds,
    // --- Route ---
    AddRoute,
    ListRoutes,
    UpdateRoute,
    AssignRoute,
    RouteStatus,
    // --- Driver ---
    AddDriver,
    ListDrivers,
    UpdateDriver,
    DriverPerformance,
    AssignVehicle,
    // --- Vehicle ---
    AddVehicle,
    ListVehicles,
    UpdateVehicle,
    VehicleMaintenance,
    VehicleStatus,
    // --- Payroll ---
    RunPayroll,
    PayrollSummary,
    PaySlip,
    AddDeduction,
    // --- Report ---
    RevenueReport,
    ExpenseReport,
    TripReport,
    ExportReport,
    // --- Utility ---
    Help,
    SetLanguage,
    ContactSupport,
    AccountInfo,
    Unknown,
}

impl Intent {
    /// Every intent, in declaration order.
    pub const ALL: &'static [Intent] = &[
        Self::CreateInvoice,
        Self::PreviewInvoice,
        Self::SendInvoice,
        Self::EditInvoice,
        Self::ListInvoices,
        Self::InvoiceStatus,
        Self::MarkInvoicePaid,
        Self::CancelInvoice,
        Self::AddClient,
        Self::ListClients,
        Self::UpdateClient,
        Self::ClientBalance,
        Self::WalletBalance,
        Self::FundWallet,
        Self::TransferFunds,
        Self::WalletTransactions,
        Self::WithdrawFunds,
        Self::AddRoute,
        Self::ListRoutes,
        Self::UpdateRoute,
        Self::AssignRoute,
        Self::RouteStatus,
        Self::AddDriver,
        Self::ListDrivers,
        Self::UpdateDriver,
        Self::DriverPerformance,
        Self::AssignVehicle,
        Self::AddVehicle,
        Self::ListVehicles,
        Self::UpdateVehicle,
        Self::VehicleMaintenance,
        Self::VehicleStatus,
        Self::RunPayroll,
        Self::PayrollSummary,
        Self::PaySlip,
        Self::AddDeduction,
        Self::RevenueReport,
        Self::ExpenseReport,
        Self::TripReport,
        Self::ExportReport,
        Self::Help,
        Self::SetLanguage,
        Self::ContactSupport,
        Self::AccountInfo,
        Self::Unknown,
    ];

    /// Wire name, e.g. `CREATE_INVOICE`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateInvoice => "CREATE_INVOICE",
            Self::PreviewInvoice => "PREVIEW_INVOICE",
            Self::SendInvoice => "SEND_INVOICE",
            Self::EditInvoice => "EDIT_INVOICE",
            Self::ListInvoices => "LIST_INVOICES",
            Self::InvoiceStatus => "INVOICE_STATUS",
            Self::MarkInvoicePaid => "MARK_INVOICE_PAID",
            Self::CancelInvoice => "CANCEL_INVOICE",
            Self::AddClient => "ADD_CLIENT",
            Self::ListClients => "LIST_CLIENTS",
            Self::UpdateClient => "UPDATE_CLIENT",
            Self::ClientBalance => "CLIENT_BALANCE",
            Self::WalletBalance => "WALLET_BALANCE",
            Self::FundWallet => "FUND_WALLET",
            Self::TransferFunds => "TRANSFER_FUNDS",
            Self::WalletTransactions => "WALLET_TRANSACTIONS",
            Self::WithdrawFunds => "WITHDRAW_FUNDS",
            Self::AddRoute => "ADD_ROUTE",
            Self::ListRoutes => "LIST_ROUTES",
            Self::UpdateRoute => "UPDATE_ROUTE",
            Self::AssignRoute => "ASSIGN_ROUTE",
            Self::RouteStatus => "ROUTE_STATUS",
            Self::AddDriver => "ADD_DRIVER",
            Self::ListDrivers => "LIST_DRIVERS",
            Self::UpdateDriver => "UPDATE_DRIVER",
            Self::DriverPerformance => "DRIVER_PERFORMANCE",
            Self::AssignVehicle => "ASSIGN_VEHICLE",
            Self::AddVehicle => "ADD_VEHICLE",
            Self::ListVehicles => "LIST_VEHICLES",
            Self::UpdateVehicle => "UPDATE_VEHICLE",
            Self::VehicleMaintenance => "VEHICLE_MAINTENANCE",
            Self::VehicleStatus => "VEHICLE_STATUS",
            Self::RunPayroll => "RUN_PAYROLL",
            Self::PayrollSummary => "PAYROLL_SUMMARY",
            Self::PaySlip => "PAY_SLIP",
            Self::AddDeduction => "ADD_DEDUCTION",
            Self::RevenueReport => "REVENUE_REPORT",
            Self::ExpenseReport => "EXPENSE_REPORT",
            Self::TripReport => "TRIP_REPORT",
            Self::ExportReport => "EXPORT_REPORT",
            Self::Help => "HELP",
            Self::SetLanguage => "SET_LANGUAGE",
            Self::ContactSupport => "CONTACT_SUPPORT",
            Self::AccountInfo => "ACCOUNT_INFO",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Domain grouping. `Unknown` is filed under utility.
    pub fn domain(&self) -> IntentDomain {
        match self {
            Self::CreateInvoice
            | Self::PreviewInvoice
            | Self::SendInvoice
            | Self::EditInvoice
            | Self::ListInvoices
            | Self::InvoiceStatus
            | Self::MarkInvoicePaid
            | Self::CancelInvoice => IntentDomain::Invoice,
            Self::AddClient | Self::ListClients | Self::UpdateClient | Self::ClientBalance => {
                IntentDomain::Client
            }
            Self::WalletBalance
            | Self::FundWallet
            | Self::TransferFunds
            | Self::WalletTransactions
            | Self::WithdrawFunds => IntentDomain::Wallet,
            Self::AddRoute
            | Self::ListRoutes
            | Self::UpdateRoute
            | Self::AssignRoute
            | Self::RouteStatus => IntentDomain::Route,
            Self::AddDriver
            | Self::ListDrivers
            | Self::UpdateDriver
            | Self::DriverPerformance
            | Self::AssignVehicle => IntentDomain::Driver,
            Self::AddVehicle
            | Self::ListVehicles
            | Self::UpdateVehicle
            | Self::VehicleMaintenance
            | Self::VehicleStatus => IntentDomain::Vehicle,
            Self::RunPayroll | Self::PayrollSummary | Self::PaySlip | Self::AddDeduction => {
                IntentDomain::Payroll
            }
            Self::RevenueReport | Self::ExpenseReport | Self::TripReport | Self::ExportReport => {
                IntentDomain::Report
            }
            Self::Help
            | Self::SetLanguage
            | Self::ContactSupport
            | Self::AccountInfo
            | Self::Unknown => IntentDomain::Utility,
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intent {
    type Err = String;

    /// Case-insensitive; accepts `create_invoice` as well as `CREATE_INVOICE`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        Self::ALL
            .iter()
            .copied()
            .find(|i| i.as_str() == wanted)
            .ok_or_else(|| format!("unknown intent '{s}'"))
    }
}

/// Output of the intent classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub intent: Intent,
    pub confidence: f32,
    #[serde(default)]
    pub entities: Entities,
}

impl Classification {
    /// A zero-confidence `UNKNOWN`, used when the classifier is unreachable.
    pub fn unknown() -> Self {
        Self {
            intent: Intent::Unknown,
            confidence: 0.0,
            entities: Entities::new(),
        }
    }
}
