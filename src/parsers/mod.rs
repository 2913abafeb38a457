//! Line strategies for text exports.
//!
//! Each strategy implements [`LineStrategy`](crate::parser::LineStrategy) for
//! one platform:
//!
//! - [`WhatsAppStrategy`] - `[date, time] Sender: body` and `date, time - Sender: body`
//! - [`TelegramStrategy`] - `Sender, [date time]` blocks and `[date time] Sender: body`
//! - [`InstagramStrategy`] - `Sender (date time): body` and `[date time] Sender: body`
//!
//! Strategies are created with [`create_strategy`](crate::parser::create_strategy),
//! which resolves the export's numeric date order first.

mod instagram;
mod telegram;
mod whatsapp;

pub use instagram::InstagramStrategy;
pub use telegram::TelegramStrategy;
pub use whatsapp::WhatsAppStrategy;

use std::sync::LazyLock;

use regex::Regex;

/// `[timestamp] rest` where the bracket holds a clock time.
static BRACKETED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[(?P<ts>[^\]]*\d{1,2}:\d{2}[^\]]*)\]\s*(?P<rest>.*)$")
        .expect("bracketed header regex must compile")
});

/// `Sender: body` with a short sender that is not itself a quote.
static SENDER_BODY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(?P<sender>[^:"“]{1,80}?):(?:\s(?P<body>.*)|$)"#)
        .expect("sender regex must compile")
});

/// Splits a bracketed header into its timestamp and the rest of the line.
fn split_bracketed(line: &str) -> Option<(&str, &str)> {
    let caps = BRACKETED.captures(line)?;
    let ts = caps.name("ts")?.as_str();
    let rest = caps.name("rest").map_or("", |m| m.as_str());
    Some((ts, rest))
}

/// Splits `Sender: body`. Text without a sender is returned whole as body.
fn split_sender(rest: &str) -> (Option<String>, String) {
    match SENDER_BODY.captures(rest) {
        Some(caps) => {
            let sender = caps.name("sender").map_or("", |m| m.as_str().trim());
            let body = caps.name("body").map_or("", |m| m.as_str());
            if sender.is_empty() {
                (None, rest.to_string())
            } else {
                (Some(sender.to_string()), body.to_string())
            }
        }
        None => (None, rest.to_string()),
    }
}
