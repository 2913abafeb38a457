//! Instagram data-download JSON exports (`message_1.json`).
//!
//! Meta writes messages newest-first and stores UTF-8 text as Latin-1 code
//! points. Both are undone here before the messages reach the pipeline.

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, trace};

use crate::RawMessage;
use crate::core::models::{Warning, WarningKind};
use crate::core::normalizer::clean_text;
use crate::parser::out_of_order;

/// Raw Instagram entry.
#[derive(Debug, Deserialize)]
pub struct InstagramRawMessage {
    pub sender_name: Option<String>,
    pub timestamp_ms: Option<i64>,
    pub content: Option<String>,
    pub share: Option<InstagramShare>,
    #[serde(default)]
    pub photos: Option<Vec<InstagramMedia>>,
    #[serde(default)]
    pub videos: Option<Vec<InstagramMedia>>,
    #[serde(default)]
    pub audio_files: Option<Vec<InstagramMedia>>,
}

/// Instagram share structure.
#[derive(Debug, Deserialize)]
pub struct InstagramShare {
    pub share_text: Option<String>,
    pub link: Option<String>,
}

/// Instagram media (photo/video/audio) structure.
#[derive(Debug, Deserialize)]
pub struct InstagramMedia {
    pub uri: Option<String>,
}

/// Instagram export wrapper.
#[derive(Debug, Deserialize)]
pub struct InstagramExport {
    pub messages: Vec<Value>,
}

/// Fixes Meta's mojibake.
///
/// Meta exports UTF-8 text as if every byte were an ISO-8859-1 character,
/// so "Привет" arrives as `"\u00d0\u009f\u00d1\u0080..."`. Text with
/// characters above U+00FF or bytes that do not form UTF-8 is returned
/// unchanged.
///
/// # Example
///
/// ```rust
/// use chatsift::parsing::instagram::fix_mojibake_encoding;
///
/// assert_eq!(fix_mojibake_encoding("Hello"), "Hello");
/// assert_eq!(fix_mojibake_encoding("\u{d0}\u{9f}\u{d1}\u{80}\u{d0}\u{b8}\u{d0}\u{b2}\u{d0}\u{b5}\u{d1}\u{82}"), "Привет");
/// assert_eq!(fix_mojibake_encoding("你好"), "你好");
/// ```
pub fn fix_mojibake_encoding(s: &str) -> String {
    let bytes: Option<Vec<u8>> = s.chars().map(|c| u8::try_from(u32::from(c)).ok()).collect();
    bytes
        .and_then(|b| String::from_utf8(b).ok())
        .unwrap_or_else(|| s.to_string())
}

/// Parses a millisecond timestamp.
pub fn parse_ms_timestamp(timestamp_ms: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(timestamp_ms).single()
}

fn has_media(media: Option<&Vec<InstagramMedia>>) -> bool {
    media.is_some_and(|m| !m.is_empty())
}

/// Body text of an entry: content, then share text or link, then a media
/// placeholder. Entries with none of these keep an empty body.
fn entry_body(msg: &InstagramRawMessage) -> String {
    if let Some(content) = msg.content.as_deref().filter(|c| !c.trim().is_empty()) {
        return content.to_string();
    }
    if let Some(share) = &msg.share {
        if let Some(text) = share.share_text.as_deref().or(share.link.as_deref()) {
            return text.to_string();
        }
    }
    if has_media(msg.photos.as_ref()) {
        return "[photo]".to_string();
    }
    if has_media(msg.videos.as_ref()) {
        return "[video]".to_string();
    }
    if has_media(msg.audio_files.as_ref()) {
        return "[audio]".to_string();
    }
    String::new()
}

/// Converts one entry. Returns `None` when sender or time is missing.
pub fn parse_instagram_message(msg: &InstagramRawMessage, fix_encoding: bool) -> Option<RawMessage> {
    let sender = msg.sender_name.as_deref().filter(|s| !s.trim().is_empty())?;
    let timestamp_ms = msg.timestamp_ms?;
    let date = parse_ms_timestamp(timestamp_ms)?;

    let body = entry_body(msg);
    let (sender, body) = if fix_encoding {
        (fix_mojibake_encoding(sender), fix_mojibake_encoding(&body))
    } else {
        (sender.to_string(), body)
    };

    Some(RawMessage::new(sender, clean_text(&body), date, timestamp_ms.to_string()))
}

/// Reads an Instagram JSON export into file-chronological order.
///
/// Warning indices refer to positions in the original `messages` array.
/// Never fails: a document that does not deserialize yields an
/// `invalid_export` warning and no messages.
pub fn parse_export(raw: &str, fix_encoding: bool) -> (Vec<RawMessage>, Vec<Warning>) {
    let export: InstagramExport = match serde_json::from_str(raw) {
        Ok(export) => export,
        Err(e) => {
            debug!(error = %e, "instagram export rejected");
            return (
                Vec::new(),
                vec![Warning::new(
                    WarningKind::InvalidExport,
                    format!("not an Instagram JSON export: {e}"),
                )],
            );
        }
    };

    let mut messages = Vec::with_capacity(export.messages.len());
    let mut warnings = Vec::new();
    let mut last_date = None;

    for (index, value) in export.messages.into_iter().enumerate().rev() {
        let parsed = serde_json::from_value::<InstagramRawMessage>(value)
            .ok()
            .and_then(|raw| parse_instagram_message(&raw, fix_encoding));

        let Some(message) = parsed else {
            trace!(index, "skipped instagram entry");
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

    debug!(messages = messages.len(), warnings = warnings.len(), "parsed instagram export");
    (messages, warnings)
}
