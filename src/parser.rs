//! Platform selection and the shared line-parsing loop.
//!
//! Every supported platform has one [`LineStrategy`] that knows how its
//! export marks the start of a message. The loop in [`parse_entries`] is
//! shared: it opens a message on every header line, attaches the lines that
//! follow as continuations and turns everything it cannot place into
//! warnings.
//!
//! # Example
//!
//! ```rust
//! use chatsift::config::{ContinuationPolicy, NormalizeConfig};
//! use chatsift::core::normalizer::normalize;
//! use chatsift::parser::{Platform, parse_entries};
//!
//! let raw = "1/1/24, 10:00 AM - Alice: Hi\nhow are you?";
//! let entries = normalize(raw, &NormalizeConfig::new());
//! let (messages, warnings) = parse_entries(&entries, Platform::WhatsApp, ContinuationPolicy::Append);
//!
//! assert_eq!(messages.len(), 1);
//! assert_eq!(messages[0].message, "Hi\nhow are you?");
//! assert!(warnings.is_empty());
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::RawMessage;
use crate::config::ContinuationPolicy;
use crate::core::models::{Warning, WarningKind};
use crate::core::normalizer::RawEntry;
use crate::error::ChatsiftError;
use crate::message::NOTICE_SENDER;
use crate::parsers::{InstagramStrategy, TelegramStrategy, WhatsAppStrategy};
use crate::parsing::timestamp::{DateOrder, detect_date_order};

/// Supported messaging platforms.
///
/// The set is closed: a name outside it is rejected by [`FromStr`] with
/// [`ChatsiftError::UnsupportedPlatform`].
///
/// # Example
///
/// ```rust
/// use chatsift::parser::Platform;
/// use std::str::FromStr;
///
/// assert_eq!(Platform::from_str("wa").unwrap(), Platform::WhatsApp);
/// assert!(Platform::from_str("discord").unwrap_err().is_unsupported_platform());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// WhatsApp text exports (iOS and Android)
    #[serde(alias = "wa")]
    WhatsApp,

    /// Telegram text copies and Telegram Desktop JSON exports
    #[serde(alias = "tg")]
    Telegram,

    /// Instagram text copies and data-download JSON exports
    #[serde(alias = "ig")]
    Instagram,
}

impl Platform {
    /// Returns all platform names including aliases.
    pub fn all_names() -> &'static [&'static str] {
        &["whatsapp", "wa", "telegram", "tg", "instagram", "ig"]
    }

    /// Returns all supported platforms.
    pub fn all() -> &'static [Platform] {
        &[Platform::WhatsApp, Platform::Telegram, Platform::Instagram]
    }

    /// Returns `true` if the platform also ships structured JSON exports.
    pub fn has_json_exports(&self) -> bool {
        matches!(self, Platform::Telegram | Platform::Instagram)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::WhatsApp => write!(f, "WhatsApp"),
            Platform::Telegram => write!(f, "Telegram"),
            Platform::Instagram => write!(f, "Instagram"),
        }
    }
}

impl FromStr for Platform {
    type Err = ChatsiftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "whatsapp" | "wa" => Ok(Platform::WhatsApp),
            "telegram" | "tg" => Ok(Platform::Telegram),
            "instagram" | "ig" => Ok(Platform::Instagram),
            _ => Err(ChatsiftError::unsupported_platform(s)),
        }
    }
}

/// The parts of a line that opens a new message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Author, or `None` for notices such as "Alice added Bob".
    pub sender: Option<String>,
    /// Timestamp text as written in the export.
    pub timestamp: String,
    pub date: DateTime<Utc>,
    /// Text following the header on the same line. May be empty.
    pub body: String,
}

impl Header {
    fn into_message(self) -> RawMessage {
        RawMessage::new(
            self.sender.unwrap_or_else(|| NOTICE_SENDER.to_string()),
            self.body,
            self.date,
            self.timestamp,
        )
    }
}

/// Per-platform knowledge of how a message starts.
///
/// Implementations must be stateless with respect to the lines they see:
/// the date order is fixed at construction and every call depends only on
/// its argument.
pub trait LineStrategy: Send + Sync {
    /// Returns the platform this strategy handles.
    fn platform(&self) -> Platform;

    /// Returns the timestamp text if `line` is shaped like a message header.
    ///
    /// Used to scan an export for its date order before parsing.
    fn recognize<'a>(&self, line: &'a str) -> Option<&'a str>;

    /// Splits a header line into sender, timestamp and body.
    ///
    /// Returns `None` when the line is not a header or its timestamp does
    /// not parse; the loop then treats it as a continuation.
    fn match_header(&self, line: &str) -> Option<Header>;

    /// Appends a continuation line to a message body.
    fn push_continuation(&self, body: &mut String, line: &str) {
        if !body.is_empty() {
            body.push('\n');
        }
        body.push_str(line);
    }
}

/// Creates the strategy for `platform` with a fixed date order.
pub fn strategy_for(platform: Platform, order: DateOrder) -> Box<dyn LineStrategy> {
    match platform {
        Platform::WhatsApp => Box::new(WhatsAppStrategy::new(order)),
        Platform::Telegram => Box::new(TelegramStrategy::new(order)),
        Platform::Instagram => Box::new(InstagramStrategy::new(order)),
    }
}

/// Creates the strategy for `platform`, resolving the numeric date order
/// from the header lines of `entries`.
///
/// Returns an `ambiguous_date_order` warning when no header gave evidence
/// either way.
pub fn create_strategy(
    platform: Platform,
    entries: &[RawEntry],
) -> (Box<dyn LineStrategy>, Vec<Warning>) {
    let probe = strategy_for(platform, DateOrder::default());
    let detection = detect_date_order(entries.iter().filter_map(|e| probe.recognize(&e.text)));

    let mut warnings = Vec::new();
    if detection.ambiguous {
        warnings.push(Warning::new(
            WarningKind::AmbiguousDateOrder,
            "numeric dates fit both day-first and month-first; read as day-first",
        ));
    }

    debug!(%platform, order = ?detection.order, ambiguous = detection.ambiguous, "selected strategy");
    (strategy_for(platform, detection.order), warnings)
}

/// Parses normalized entries into messages.
///
/// Messages keep file order. Warnings come in line order, preceded by the
/// strategy's construction warnings.
pub fn parse_entries(
    entries: &[RawEntry],
    platform: Platform,
    policy: ContinuationPolicy,
) -> (Vec<RawMessage>, Vec<Warning>) {
    let (strategy, mut warnings) = create_strategy(platform, entries);
    let messages = parse_with(strategy.as_ref(), entries, policy, &mut warnings);
    debug!(
        %platform,
        entries = entries.len(),
        messages = messages.len(),
        warnings = warnings.len(),
        "parsed entries"
    );
    (messages, warnings)
}

/// Runs the line loop with an already constructed strategy.
pub fn parse_with(
    strategy: &dyn LineStrategy,
    entries: &[RawEntry],
    policy: ContinuationPolicy,
    warnings: &mut Vec<Warning>,
) -> Vec<RawMessage> {
    let mut messages = Vec::new();
    let mut current: Option<RawMessage> = None;
    let mut pending_blanks = 0usize;
    let mut last_date: Option<DateTime<Utc>> = None;

    for entry in entries {
        if entry.is_blank() {
            if current.is_some() {
                pending_blanks += 1;
            }
            continue;
        }

        if let Some(header) = strategy.match_header(&entry.text) {
            if last_date.is_some_and(|prev| header.date < prev) {
                warnings.push(out_of_order(entry.index, &header.timestamp));
            }
            last_date = Some(header.date);

            messages.extend(current.take());
            current = Some(header.into_message());
            pending_blanks = 0;
            continue;
        }

        match (current.as_mut(), policy) {
            (Some(message), ContinuationPolicy::Append) => {
                for _ in 0..pending_blanks {
                    strategy.push_continuation(&mut message.message, "");
                }
                pending_blanks = 0;
                strategy.push_continuation(&mut message.message, &entry.text);
            }
            (Some(_), ContinuationPolicy::Drop) => {
                trace!(line = entry.index, "dropped continuation line");
                warnings.push(Warning::at_line(
                    WarningKind::UnparseableLine,
                    entry.index,
                    "line without message header dropped",
                ));
            }
            (None, _) => {
                trace!(line = entry.index, "dropped orphan line");
                warnings.push(Warning::at_line(
                    WarningKind::UnparseableLine,
                    entry.index,
                    "line before the first message dropped",
                ));
            }
        }
    }

    messages.extend(current);
    messages
}

pub(crate) fn out_of_order(index: usize, timestamp: &str) -> Warning {
    Warning::at_line(
        WarningKind::OutOfOrderTimestamp,
        index,
        format!("message at {timestamp} is earlier than the previous message"),
    )
}
