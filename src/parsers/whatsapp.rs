//! WhatsApp text export strategy.
//!
//! WhatsApp exports vary by locale and app version:
//! - iOS: `[1/15/24, 10:30:45 AM] Sender: Message`
//! - Android US: `1/15/24, 10:30 AM - Sender: Message`
//! - EU: `15.01.24, 10:30 - Sender: Message`, `[15/01/2024, 10:30:45] Sender: Message`
//! - zh-CN: `2024/1/15 下午3:45 - 张三: 你好`
//!
//! Group events (`Alice added Bob`, the encryption banner) carry a timestamp
//! but no sender and become notices.

use std::sync::LazyLock;

use regex::Regex;

use super::{split_bracketed, split_sender};
use crate::parser::{Header, LineStrategy, Platform};
use crate::parsing::timestamp::{DateOrder, parse_timestamp};

/// `timestamp - rest`, the Android layout.
static DASHED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<ts>[^\[\]]{0,40}?\d{1,2}:\d{2}(?::\d{2})?(?:\s?[AaPp]\.?\s?[Mm]\.?)?)\s[-–]\s(?P<rest>.*)$",
    )
    .expect("whatsapp dashed regex must compile")
});

/// Line strategy for WhatsApp text exports.
///
/// # Example
///
/// ```rust
/// use chatsift::parser::LineStrategy;
/// use chatsift::parsers::WhatsAppStrategy;
/// use chatsift::parsing::timestamp::DateOrder;
///
/// let strategy = WhatsAppStrategy::new(DateOrder::MonthFirst);
/// let header = strategy.match_header("1/1/24, 10:00 AM - Alice: Hi").unwrap();
/// assert_eq!(header.sender.as_deref(), Some("Alice"));
/// assert_eq!(header.body, "Hi");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct WhatsAppStrategy {
    order: DateOrder,
}

impl WhatsAppStrategy {
    pub fn new(order: DateOrder) -> Self {
        Self { order }
    }

    pub fn order(&self) -> DateOrder {
        self.order
    }

    fn split<'a>(&self, line: &'a str) -> Option<(&'a str, &'a str)> {
        if let Some(parts) = split_bracketed(line) {
            return Some(parts);
        }
        let caps = DASHED.captures(line)?;
        let ts = caps.name("ts")?.as_str();
        let rest = caps.name("rest").map_or("", |m| m.as_str());
        Some((ts, rest))
    }
}

impl LineStrategy for WhatsAppStrategy {
    fn platform(&self) -> Platform {
        Platform::WhatsApp
    }

    fn recognize<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.split(line).map(|(ts, _)| ts)
    }

    fn match_header(&self, line: &str) -> Option<Header> {
        let (ts, rest) = self.split(line)?;
        let date = parse_timestamp(ts, self.order)?;
        let (sender, body) = split_sender(rest);
        Some(Header {
            sender,
            timestamp: ts.to_string(),
            date,
            body,
        })
    }
}
