//! # convoy-channels
//!
//! Messaging provider integration for convoy: webhook normalization,
//! outbound sends, media retrieval, and voice transcription.

pub mod media;
pub mod utils;
pub mod voice;
pub mod whatsapp;
pub mod whisper;
