//! Instagram text strategy.
//!
//! Instagram has no text export of its own; conversations copied from the
//! web client or converted by third-party tools look like
//! `Alice (Jan 15, 2024, 10:30 AM): Hello` or `[2024-01-15 10:30] Alice: Hello`.
//! Data-download JSON exports are read by [`crate::parsing::instagram`].

use std::sync::LazyLock;

use regex::Regex;

use super::{split_bracketed, split_sender};
use crate::parser::{Header, LineStrategy, Platform};
use crate::parsing::timestamp::{DateOrder, parse_timestamp};

static PAREN_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<sender>[^()\[\]:]{1,80}?)\s*\((?P<ts>[^()]*\d{1,2}:\d{2}[^()]*)\):(?:\s(?P<body>.*)|$)")
        .expect("instagram header regex must compile")
});

/// Line strategy for Instagram text copies.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstagramStrategy {
    order: DateOrder,
}

impl InstagramStrategy {
    pub fn new(order: DateOrder) -> Self {
        Self { order }
    }

    fn split(line: &str) -> Option<(Option<&str>, &str, &str)> {
        if let Some(caps) = PAREN_HEADER.captures(line) {
            let sender = caps.name("sender").map(|m| m.as_str().trim());
            let ts = caps.name("ts")?.as_str();
            let body = caps.name("body").map_or("", |m| m.as_str());
            return Some((sender, ts, body));
        }
        split_bracketed(line).map(|(ts, rest)| (None, ts, rest))
    }
}

impl LineStrategy for InstagramStrategy {
    fn platform(&self) -> Platform {
        Platform::Instagram
    }

    fn recognize<'a>(&self, line: &'a str) -> Option<&'a str> {
        Self::split(line).map(|(_, ts, _)| ts)
    }

    fn match_header(&self, line: &str) -> Option<Header> {
        let (sender, ts, rest) = Self::split(line)?;
        let date = parse_timestamp(ts, self.order)?;
        let (sender, body) = match sender {
            Some(name) => (Some(name.to_string()), rest.to_string()),
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
