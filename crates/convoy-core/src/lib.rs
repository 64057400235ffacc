//! # convoy-core
//!
//! Core types, traits, configuration, and error handling for the convoy
//! conversation engine.

pub mod config;
pub mod conversation;
pub mod error;
pub mod intent;
pub mod message;
pub mod sanitize;
pub mod traits;

pub use config::shellexpand;
