//! Result types produced by the pipeline.
//!
//! Everything here is a plain value: created inside one pipeline run, owned
//! by the returned [`ProcessResult`], and serializable so callers can store
//! or render it.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::RawMessage;

/// Category of a non-fatal issue found while processing an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// A line could not be attached to any message and was dropped.
    UnparseableLine,
    /// A message is dated earlier than the message before it.
    OutOfOrderTimestamp,
    /// Numeric dates gave no hint whether they are day-first or month-first.
    AmbiguousDateOrder,
    /// A JSON export document could not be read.
    InvalidExport,
    /// A JSON export entry without sender or usable time was dropped.
    SkippedEntry,
    /// The export produced no messages at all.
    NoMessagesParsed,
    /// Every parsed message was removed as noise.
    NoMessagesRetained,
}

impl WarningKind {
    /// Returns the stable snake_case code of this warning.
    pub fn code(&self) -> &'static str {
        match self {
            WarningKind::UnparseableLine => "unparseable_line",
            WarningKind::OutOfOrderTimestamp => "out_of_order_timestamp",
            WarningKind::AmbiguousDateOrder => "ambiguous_date_order",
            WarningKind::InvalidExport => "invalid_export",
            WarningKind::SkippedEntry => "skipped_entry",
            WarningKind::NoMessagesParsed => "no_messages_parsed",
            WarningKind::NoMessagesRetained => "no_messages_retained",
        }
    }
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A non-fatal issue. A result carrying warnings is still a valid result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    /// Machine-readable category.
    pub kind: WarningKind,
    /// Zero-based source line (or JSON entry) index, when one applies.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub line: Option<usize>,
    /// Human-readable description.
    pub message: String,
}

impl Warning {
    /// Creates a warning that is not tied to a line.
    pub fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            line: None,
            message: message.into(),
        }
    }

    /// Creates a warning for a source line or entry.
    pub fn at_line(kind: WarningKind, line: usize, message: impl Into<String>) -> Self {
        Self {
            kind,
            line: Some(line),
            message: message.into(),
        }
    }

    /// Returns the stable code of this warning.
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "[{}] line {}: {}", self.kind, line, self.message),
            None => write!(f, "[{}] {}", self.kind, self.message),
        }
    }
}

/// Counts of messages removed by the noise filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterStats {
    /// Group-management notices, encryption banners, deleted-message stubs...
    pub system: usize,
    /// Media placeholders such as `<Media omitted>` or `[图片]`.
    pub media: usize,
}

impl FilterStats {
    /// Total number of removed messages.
    pub fn total(&self) -> usize {
        self.system + self.media
    }
}

/// Per-sender statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderStats {
    pub messages: usize,
    pub characters: usize,
    pub words: usize,
    pub empty_messages: usize,
    pub first_message: DateTime<Utc>,
    pub last_message: DateTime<Utc>,
    /// Messages that answered a different sender.
    pub replies: usize,
    /// Mean delay of those replies, in whole seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub average_reply_seconds: Option<u64>,
}

/// First and last message of a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSpan {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_seconds: i64,
    /// Calendar days covered, counting both ends.
    pub days: i64,
}

/// One row of the word-frequency table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

/// Aggregate statistics over the retained messages.
///
/// Totals always equal the sum of the matching [`SenderStats`] fields.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChatStats {
    pub total_messages: usize,
    pub total_characters: usize,
    pub total_words: usize,
    pub empty_messages: usize,
    pub per_sender: BTreeMap<String, SenderStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub time_span: Option<TimeSpan>,
    /// Messages per hour of day, 0-23.
    pub hourly_activity: [usize; 24],
    /// Messages per weekday, Monday first.
    pub weekday_activity: [usize; 7],
    /// Distinct calendar days with at least one message.
    pub active_days: usize,
    pub top_words: Vec<WordCount>,
    /// Messages removed before counting.
    pub filtered: FilterStats,
}

impl ChatStats {
    /// Returns the number of distinct senders.
    pub fn sender_count(&self) -> usize {
        self.per_sender.len()
    }

    /// Returns the statistics of one sender.
    pub fn sender(&self, name: &str) -> Option<&SenderStats> {
        self.per_sender.get(name)
    }
}

/// The single output of a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProcessResult {
    /// Retained messages in file order.
    pub messages: Vec<RawMessage>,
    pub stats: ChatStats,
    /// Non-fatal issues, earliest stage first.
    pub warnings: Vec<Warning>,
}

impl ProcessResult {
    /// Returns `true` if any warning was recorded.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Iterates over the warnings of one kind.
    pub fn warnings_of(&self, kind: WarningKind) -> impl Iterator<Item = &Warning> {
        self.warnings.iter().filter(move |w| w.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_codes() {
        assert_eq!(WarningKind::UnparseableLine.code(), "unparseable_line");
        assert_eq!(
            WarningKind::NoMessagesRetained.to_string(),
            "no_messages_retained"
        );
    }

    #[test]
    fn test_warning_serializes_code() {
        let warning = Warning::at_line(WarningKind::UnparseableLine, 3, "orphan line");
        let json = serde_json::to_string(&warning).unwrap();
        assert!(json.contains("\"kind\":\"unparseable_line\""));
        assert!(json.contains("\"line\":3"));
    }

    #[test]
    fn test_warning_display() {
        let warning = Warning::at_line(WarningKind::OutOfOrderTimestamp, 7, "earlier");
        assert_eq!(warning.to_string(), "[out_of_order_timestamp] line 7: earlier");

        let warning = Warning::new(WarningKind::NoMessagesParsed, "nothing");
        assert_eq!(warning.to_string(), "[no_messages_parsed] nothing");
    }

    #[test]
    fn test_filter_stats_total() {
        let stats = FilterStats { system: 2, media: 3 };
        assert_eq!(stats.total(), 5);
    }

    #[test]
    fn test_warnings_of() {
        let result = ProcessResult {
            warnings: vec![
                Warning::new(WarningKind::AmbiguousDateOrder, "a"),
                Warning::at_line(WarningKind::UnparseableLine, 0, "b"),
                Warning::at_line(WarningKind::UnparseableLine, 1, "c"),
            ],
            ..ProcessResult::default()
        };
        assert!(result.has_warnings());
        assert_eq!(result.warnings_of(WarningKind::UnparseableLine).count(), 2);
    }
}
