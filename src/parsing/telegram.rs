//! Telegram Desktop JSON exports (`result.json`).
//!
//! Entries are read one by one from the `messages` array so that a single
//! malformed entry costs a `skipped_entry` warning instead of the whole
//! export.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, trace};

use crate::RawMessage;
use crate::core::models::{Warning, WarningKind};
use crate::core::normalizer::clean_text;
use crate::parser::out_of_order;

/// Raw Telegram entry.
#[derive(Debug, Deserialize)]
pub struct TelegramRawMessage {
    /// `message` or `service`
    #[serde(rename = "type", default)]
    pub msg_type: String,
    /// Unix timestamp as string
    pub date_unixtime: Option<String>,
    /// Local time as `2024-01-15T10:30:00`, present in older exports
    pub date: Option<String>,
    /// Sender name
    pub from: Option<String>,
    /// Author of a service entry
    pub actor: Option<String>,
    /// Service action such as `pin_message` or `invite_members`
    pub action: Option<String>,
    /// Message text (can be string or array)
    pub text: Option<Value>,
    pub media_type: Option<String>,
    pub photo: Option<String>,
    pub file: Option<String>,
}

/// Telegram export wrapper.
#[derive(Debug, Deserialize)]
pub struct TelegramExport {
    pub messages: Vec<Value>,
}

/// Extracts text content from Telegram's `text` field.
///
/// The field is either a plain string or an array mixing strings and
/// formatted fragments (`{"type": "link", "text": "..."}`).
///
/// # Example
///
/// ```rust
/// use chatsift::parsing::telegram::extract_telegram_text;
/// use serde_json::json;
///
/// let complex = json!(["Check this: ", {"type": "link", "text": "https://example.com"}]);
/// assert_eq!(extract_telegram_text(&complex), "Check this: https://example.com");
/// ```
pub fn extract_telegram_text(text_value: &Value) -> String {
    match text_value {
        Value::String(s) => s.clone(),
        Value::Array(arr) => arr
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Object(obj) => obj
                    .get("text")
                    .and_then(|v| v.as_str())
                    .map(ToString::to_string),
                _ => None,
            })
            .collect::<String>(),
        _ => String::new(),
    }
}

/// Parses a Unix timestamp string such as `"1705314600"`.
pub fn parse_unix_timestamp(ts_str: &str) -> Option<DateTime<Utc>> {
    ts_str
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
}

fn parse_local_date(date: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Placeholder body for an entry that carries media but no text.
fn media_placeholder(msg: &TelegramRawMessage) -> Option<&'static str> {
    let placeholder = match msg.media_type.as_deref() {
        Some("sticker") => "[sticker]",
        Some("voice_message") => "[voice message]",
        Some("video_message") => "[video message]",
        Some("video_file") => "[video]",
        Some("audio_file") => "[audio]",
        Some("animation") => "[animation]",
        Some(_) => "[file]",
        None if msg.photo.is_some() => "[photo]",
        None if msg.file.is_some() => "[file]",
        None => return None,
    };
    Some(placeholder)
}

/// Converts one entry. Returns `None` when sender or time is missing.
///
/// Service entries become notices naming their actor and action, e.g.
/// `Alice pin message`.
pub fn parse_telegram_message(msg: &TelegramRawMessage) -> Option<RawMessage> {
    let (date, timestamp) = match msg.date_unixtime.as_deref() {
        Some(unix) => (parse_unix_timestamp(unix)?, unix.to_string()),
        None => {
            let local = msg.date.as_deref()?;
            (parse_local_date(local)?, local.to_string())
        }
    };

    if msg.msg_type == "service" {
        let actor = msg.actor.as_deref().unwrap_or_default();
        let action = msg.action.as_deref().unwrap_or_default().replace('_', " ");
        let body = format!("{actor} {action}").trim().to_string();
        return Some(RawMessage::notice(body, date, timestamp));
    }

    let sender = msg.from.as_deref().filter(|s| !s.trim().is_empty())?;
    let text = msg
        .text
        .as_ref()
        .map(|value| clean_text(&extract_telegram_text(value)))
        .unwrap_or_default();
    let body = if text.trim().is_empty() {
        media_placeholder(msg).map_or(text, ToString::to_string)
    } else {
        text
    };

    Some(RawMessage::new(sender, body, date, timestamp))
}

/// Reads a Telegram JSON export.
///
/// Never fails: a document that does not deserialize yields an
/// `invalid_export` warning and no messages.
pub fn parse_export(raw: &str) -> (Vec<RawMessage>, Vec<Warning>) {
    let export: TelegramExport = match serde_json::from_str(raw) {
        Ok(export) => export,
        Err(e) => {
            debug!(error = %e, "telegram export rejected");
            return (
                Vec::new(),
                vec![Warning::new(
                    WarningKind::InvalidExport,
                    format!("not a Telegram JSON export: {e}"),
                )],
            );
        }
    };

    let mut messages = Vec::with_capacity(export.messages.len());
    let mut warnings = Vec::new();
    let mut last_date = None;

    for (index, value) in export.messages.into_iter().enumerate() {
        let parsed = serde_json::from_value::<TelegramRawMessage>(value)
            .ok()
            .and_then(|raw| parse_telegram_message(&raw));

        let Some(message) = parsed else {
            trace!(index, "skipped telegram entry");
            warnings.push(Warning::at_line(
                WarningKind::SkippedEntry,
                index,
                "entry without sender or usable time",
            ));
            continue;
        };

        if last_date.is_some_and(|prev| message.date < prev) {
            warnings.push(out_of_order(index, &message.timestamp));
        }
        last_date = Some(message.date);
        messages.push(message);
    }

    debug!(messages = messages.len(), warnings = warnings.len(), "parsed telegram export");
    (messages, warnings)
}
