//! Parsing utilities shared by the strategies and the orchestrator.
//!
//! - [`timestamp`] - the timestamp grammar used by every text strategy
//! - [`telegram`], [`instagram`] - structured JSON exports (feature `json-exports`)

pub mod timestamp;

#[cfg(feature = "json-exports")]
pub mod instagram;

#[cfg(feature = "json-exports")]
pub mod telegram;

pub use timestamp::{DateOrder, OrderDetection, detect_date_order, parse_timestamp};

#[cfg(feature = "json-exports")]
use crate::RawMessage;
#[cfg(feature = "json-exports")]
use crate::core::models::Warning;
use crate::parser::Platform;

/// Returns `true` if `raw` should be read as a JSON export for `platform`.
///
/// Text exports never start with `{`, so the first non-blank character is
/// enough to tell the two apart.
pub fn is_json_export(raw: &str, platform: Platform) -> bool {
    cfg!(feature = "json-exports")
        && platform.has_json_exports()
        && raw.trim_start_matches('\u{feff}').trim_start().starts_with('{')
}

/// Reads a JSON export. Returns `None` for platforms without one.
#[cfg(feature = "json-exports")]
pub fn parse_json_export(
    raw: &str,
    platform: Platform,
    fix_encoding: bool,
) -> Option<(Vec<RawMessage>, Vec<Warning>)> {
    let raw = raw.trim_start_matches('\u{feff}');
    match platform {
        Platform::Telegram => Some(telegram::parse_export(raw)),
        Platform::Instagram => Some(instagram::parse_export(raw, fix_encoding)),
        Platform::WhatsApp => None,
    }
}
