//! # Chatsift
//!
//! Ingestion pipeline for chat exports: turns the text a user uploads into
//! clean messages and statistics.
//!
//! ## Overview
//!
//! Supported sources:
//! - **WhatsApp** - text exports (iOS and Android, any locale)
//! - **Telegram** - Telegram Desktop JSON exports and copied text
//! - **Instagram** - data-download JSON exports and copied text
//!
//! Every run goes through the same stages:
//!
//! ```text
//! raw text -> normalizer -> platform parser -> noise filter -> counter -> ProcessResult
//! ```
//!
//! Only two conditions are fatal: input that is not text
//! ([`error::InputError`]) and an unknown platform name
//! ([`ChatsiftError::UnsupportedPlatform`]). Anything else, from a stray line
//! to an export made only of system notices, is reported in
//! [`ProcessResult::warnings`](core::ProcessResult::warnings) next to a usable result.
//!
//! ## Quick Start
//!
//! ```rust
//! use chatsift::prelude::*;
//!
//! let raw = "1/1/24, 10:00 AM - Alice: Hi\nhow are you?\n1/1/24, 10:05 AM - Bob: <Media omitted>";
//! let result = process(raw, Platform::WhatsApp, &ProcessOptions::default());
//!
//! assert_eq!(result.messages.len(), 1);
//! assert_eq!(result.messages[0].message, "Hi\nhow are you?");
//! assert_eq!(result.stats.filtered.media, 1);
//! ```
//!
//! ## Module Structure
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`core`] | Pipeline stages, result models and the orchestrator |
//! | [`parser`] | [`Platform`](parser::Platform), the line strategy trait and the line loop |
//! | [`parsers`] | One line strategy per platform |
//! | [`parsing`] | Timestamp grammar and JSON export readers |
//! | [`config`] | [`ProcessOptions`](config::ProcessOptions) and friends |
//! | [`message`] | [`RawMessage`] |
//! | [`error`] | [`ChatsiftError`] and [`Result`] |

pub mod config;
pub mod core;
pub mod error;
pub mod message;
pub mod parser;
pub mod parsers;
pub mod parsing;

#[cfg(feature = "cli")]
pub mod cli;

// Re-export the main types at the crate root for convenience
pub use crate::core::processor::Pipeline;
pub use error::{ChatsiftError, InputError, Result};
pub use message::RawMessage;

/// Convenient re-exports for common usage.
///
/// ```rust
/// use chatsift::prelude::*;
/// ```
pub mod prelude {
    pub use crate::RawMessage;
    pub use crate::message::NOTICE_SENDER;

    pub use crate::error::{ChatsiftError, InputError, Result};

    pub use crate::config::{ContinuationPolicy, NormalizeConfig, ProcessOptions, stop_words};

    pub use crate::parser::{LineStrategy, Platform, create_strategy, parse_entries};

    pub use crate::core::filter::{NoiseFilter, NoiseKind};
    pub use crate::core::models::{
        ChatStats, FilterStats, ProcessResult, SenderStats, Warning, WarningKind,
    };
    pub use crate::core::normalizer::{RawEntry, normalize};
    pub use crate::core::processor::{Pipeline, process};
}
