//! Character and word statistics over filtered messages.
//!
//! Characters are Unicode code points, so `你好` and `hi` both count 2.
//! Newlines never count; with `include_spaces == false` no whitespace counts.
//!
//! Words are tokenized by the dominant script of each message. Latin-script
//! text uses Unicode word boundaries; CJK text has no spaces between words,
//! so every CJK code point is a token of its own. The script decision is a
//! majority vote over alphanumeric code points, not language detection: a
//! message mixing both scripts is treated as whichever has more characters.
//!
//! # Example
//!
//! ```
//! use chatsift::core::counter::{Script, count_characters, dominant_script, tokenize};
//!
//! assert_eq!(count_characters("hi there\nyou", true), 11);
//! assert_eq!(count_characters("hi there\nyou", false), 10);
//! assert_eq!(dominant_script("今天天气很好"), Script::Cjk);
//! assert_eq!(tokenize("Hello, World!"), ["hello", "world"]);
//! assert_eq!(tokenize("我爱Rust"), ["我", "爱", "rust"]);
//! ```

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use unicode_segmentation::UnicodeSegmentation;

use crate::RawMessage;
use crate::config::ProcessOptions;
use crate::core::models::{ChatStats, SenderStats, TimeSpan, WordCount};

/// Script family used to pick a tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Script {
    /// Han, kana and Hangul
    Cjk,
    /// Everything else
    Latin,
}

/// Returns `true` for Han ideographs, kana and Hangul.
pub fn is_cjk(c: char) -> bool {
    matches!(
        u32::from(c),
        0x3040..=0x30FF     // hiragana, katakana
            | 0x31F0..=0x31FF
            | 0x3400..=0x4DBF   // CJK extension A
            | 0x4E00..=0x9FFF   // CJK unified ideographs
            | 0xF900..=0xFAFF
            | 0x1100..=0x11FF   // Hangul jamo
            | 0x3130..=0x318F
            | 0xAC00..=0xD7AF   // Hangul syllables
            | 0x20000..=0x2A6DF
    )
}

/// Counts code points, skipping newlines and, unless `include_spaces`,
/// every other whitespace character.
pub fn count_characters(text: &str, include_spaces: bool) -> usize {
    text.chars()
        .filter(|&c| c != '\n' && c != '\r')
        .filter(|c| include_spaces || !c.is_whitespace())
        .count()
}

/// Majority script of the alphanumeric code points of `text`.
///
/// Text without any alphanumeric character is [`Script::Latin`].
pub fn dominant_script(text: &str) -> Script {
    let (cjk, total) = text
        .chars()
        .filter(|c| c.is_alphanumeric())
        .fold((0usize, 0usize), |(cjk, total), c| {
            (cjk + usize::from(is_cjk(c)), total + 1)
        });

    if cjk * 2 > total {
        Script::Cjk
    } else {
        Script::Latin
    }
}

fn push_words(out: &mut Vec<String>, text: &str) {
    out.extend(text.unicode_words().map(str::to_lowercase));
}

/// Splits a message into lowercase tokens according to its dominant script.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    match dominant_script(text) {
        Script::Latin => push_words(&mut tokens, text),
        Script::Cjk => {
            let mut run_start = 0;
            for (i, c) in text.char_indices() {
                if is_cjk(c) {
                    push_words(&mut tokens, &text[run_start..i]);
                    tokens.push(c.to_string());
                    run_start = i + c.len_utf8();
                }
            }
            push_words(&mut tokens, &text[run_start..]);
        }
    }
    tokens
}

#[derive(Debug)]
struct SenderAccumulator {
    stats: SenderStats,
    reply_seconds: u64,
}

impl SenderAccumulator {
    fn new(date: DateTime<Utc>) -> Self {
        Self {
            stats: SenderStats {
                messages: 0,
                characters: 0,
                words: 0,
                empty_messages: 0,
                first_message: date,
                last_message: date,
                replies: 0,
                average_reply_seconds: None,
            },
            reply_seconds: 0,
        }
    }

    fn finish(mut self) -> SenderStats {
        if self.stats.replies > 0 {
            self.stats.average_reply_seconds = Some(self.reply_seconds / self.stats.replies as u64);
        }
        self.stats
    }
}

/// Computes statistics with default options and the given whitespace flag.
pub fn count(messages: &[RawMessage], include_spaces: bool) -> ChatStats {
    count_with(
        messages,
        &ProcessOptions::new().with_include_spaces(include_spaces),
    )
}

/// Computes statistics over `messages`.
///
/// Uses `include_spaces`, `top_words` and the stop-word predicate of
/// `options`. The `filtered` field is left at zero for the caller to fill.
pub fn count_with(messages: &[RawMessage], options: &ProcessOptions) -> ChatStats {
    let mut senders: BTreeMap<String, SenderAccumulator> = BTreeMap::new();
    let mut frequencies: HashMap<String, usize> = HashMap::new();
    let mut hourly_activity = [0usize; 24];
    let mut weekday_activity = [0usize; 7];
    let mut days = BTreeSet::new();
    let mut span: Option<(DateTime<Utc>, DateTime<Utc>)> = None;
    let mut previous: Option<&RawMessage> = None;

    for message in messages {
        let tokens = tokenize(&message.message);
        let characters = count_characters(&message.message, options.include_spaces);

        let entry = senders
            .entry(message.sender.clone())
            .or_insert_with(|| SenderAccumulator::new(message.date));
        entry.stats.messages += 1;
        entry.stats.characters += characters;
        entry.stats.words += tokens.len();
        if message.is_empty() {
            entry.stats.empty_messages += 1;
        }
        entry.stats.first_message = entry.stats.first_message.min(message.date);
        entry.stats.last_message = entry.stats.last_message.max(message.date);

        if let Some(prev) = previous.filter(|p| p.sender != message.sender) {
            let gap = (message.date - prev.date).num_seconds();
            entry.stats.replies += 1;
            entry.reply_seconds += u64::try_from(gap).unwrap_or(0);
        }
        previous = Some(message);

        for token in tokens {
            if !options.is_stop_word(&token) {
                *frequencies.entry(token).or_insert(0) += 1;
            }
        }

        hourly_activity[message.date.hour() as usize] += 1;
        weekday_activity[message.date.weekday().num_days_from_monday() as usize] += 1;
        days.insert(message.date.date_naive());
        span = Some(match span {
            Some((start, end)) => (start.min(message.date), end.max(message.date)),
            None => (message.date, message.date),
        });
    }

    let per_sender: BTreeMap<String, SenderStats> = senders
        .into_iter()
        .map(|(name, acc)| (name, acc.finish()))
        .collect();

    let mut top_words: Vec<WordCount> = frequencies
        .into_iter()
        .map(|(word, count)| WordCount { word, count })
        .collect();
    top_words.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));
    top_words.truncate(options.top_words);

    let time_span = span.map(|(start, end)| TimeSpan {
        start,
        end,
        duration_seconds: (end - start).num_seconds(),
        days: (end.date_naive() - start.date_naive()).num_days() + 1,
    });

    let stats = ChatStats {
        total_messages: per_sender.values().map(|s| s.messages).sum(),
        total_characters: per_sender.values().map(|s| s.characters).sum(),
        total_words: per_sender.values().map(|s| s.words).sum(),
        empty_messages: per_sender.values().map(|s| s.empty_messages).sum(),
        per_sender,
        time_span,
        hourly_activity,
        weekday_activity,
        active_days: days.len(),
        top_words,
        filtered: Default::default(),
    };

    debug!(
        messages = stats.total_messages,
        senders = stats.sender_count(),
        characters = stats.total_characters,
        words = stats.total_words,
        "counted messages"
    );
    stats
}
