//! Canonical message type shared by every platform strategy.
//!
//! All parsers convert their native lines or JSON entries into [`RawMessage`],
//! so the noise filter and the counter never see platform details.
//!
//! # Examples
//!
//! ```
//! use chatsift::RawMessage;
//! use chrono::{TimeZone, Utc};
//!
//! let date = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
//! let msg = RawMessage::new("Alice", "Hi", date, "1/1/24, 10:00 AM");
//!
//! assert_eq!(msg.sender(), "Alice");
//! assert_eq!(msg.timestamp(), "1/1/24, 10:00 AM");
//! assert!(!msg.is_notice());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sender assigned to lines that carry a timestamp but no author.
///
/// WhatsApp writes group events as `1/1/24, 10:00 AM - Alice added Bob`, and
/// Telegram JSON exports carry `service` entries. Both become messages from
/// this sender so that every message has one. The sender alone does not make
/// a message noise: the filter judges notices by their body.
pub const NOTICE_SENDER: &str = "<system>";

/// A parsed chat message.
///
/// | Field | Description |
/// |-------|-------------|
/// | `sender` | Author display name, or [`NOTICE_SENDER`] |
/// | `message` | Body text; multi-line bodies are joined with `\n` |
/// | `date` | When the message was sent (exports carry no zone, read as UTC) |
/// | `timestamp` | The timestamp exactly as it appeared in the export |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMessage {
    /// Display name of the message author.
    pub sender: String,

    /// Message body. May be empty.
    pub message: String,

    /// Point in time the message was sent.
    pub date: DateTime<Utc>,

    /// Source form of the timestamp, kept for traceability.
    pub timestamp: String,
}

impl RawMessage {
    /// Creates a new message.
    pub fn new(
        sender: impl Into<String>,
        message: impl Into<String>,
        date: DateTime<Utc>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            sender: sender.into(),
            message: message.into(),
            date,
            timestamp: timestamp.into(),
        }
    }

    /// Creates a sender-less notice.
    pub fn notice(
        message: impl Into<String>,
        date: DateTime<Utc>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self::new(NOTICE_SENDER, message, date, timestamp)
    }

    /// Returns the sender name.
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Returns the message body.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the send time.
    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// Returns the timestamp as written in the export.
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Returns `true` if this message was produced from an author-less notice.
    pub fn is_notice(&self) -> bool {
        self.sender == NOTICE_SENDER
    }

    /// Returns `true` if the body is empty or whitespace-only.
    pub fn is_empty(&self) -> bool {
        self.message.trim().is_empty()
    }
}
