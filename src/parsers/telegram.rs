//! Telegram text strategy.
//!
//! Messages copied out of Telegram Desktop put the header on its own line and
//! the body below it:
//!
//! ```text
//! Alice, [15.01.2024 10:30]
//! Hello!
//! ```
//!
//! Plain-text logs written by bots and exporters use
//! `[15.01.2024 10:30] Alice: Hello!`. JSON exports are read by
//! [`crate::parsing::telegram`] instead.

use std::sync::LazyLock;

use regex::Regex;

use super::{split_bracketed, split_sender};
use crate::parser::{Header, LineStrategy, Platform};
use crate::parsing::timestamp::{DateOrder, parse_timestamp};

static COPY_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<sender>[^\[\]]{1,80}?),\s*\[(?P<ts>[^\]]*\d{1,2}:\d{2}[^\]]*)\]$")
        .expect("telegram header regex must compile")
});

/// Line strategy for Telegram text copies.
#[derive(Debug, Clone, Copy, Default)]
pub struct TelegramStrategy {
    order: DateOrder,
}

impl TelegramStrategy {
    pub fn new(order: DateOrder) -> Self {
        Self { order }
    }

    fn split<'a>(line: &'a str) -> Option<(Option<&'a str>, &'a str, &'a str)> {
        if let Some(caps) = COPY_HEADER.captures(line) {
            let sender = caps.name("sender").map(|m| m.as_str().trim());
            let ts = caps.name("ts")?.as_str();
            return Some((sender, ts, ""));
        }
        split_bracketed(line).map(|(ts, rest)| (None, ts, rest))
    }
}

impl LineStrategy for TelegramStrategy {
    fn platform(&self) -> Platform {
        Platform::Telegram
    }

    fn recognize<'a>(&self, line: &'a str) -> Option<&'a str> {
        Self::split(line).map(|(_, ts, _)| ts)
    }

    fn match_header(&self, line: &str) -> Option<Header> {
        let (sender, ts, rest) = Self::split(line)?;
        let date = parse_timestamp(ts, self.order)?;
        let (sender, body) = match sender {
            Some(name) => (Some(name.to_string()), String::new()),
            None => split_sender(rest),
        };
        Some(Header {
            sender,
            timestamp: ts.to_string(),
            date,
            body,
        })
    }
}
