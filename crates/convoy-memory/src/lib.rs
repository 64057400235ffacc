//! # convoy-memory
//!
//! SQLite-backed conversation store, audit log, and inbound message
//! de-duplication for convoy.

pub mod audit;
pub mod store;

pub use audit::{AuditEntry, AuditLogger, AuditStatus};
pub use store::Store;
