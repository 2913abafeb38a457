//! Text normalizer: raw export text to numbered line entries.
//!
//! - drops a leading byte-order mark
//! - turns CRLF, CR, NEL, U+2028 and U+2029 into `\n`
//! - removes control characters other than `\n` and `\t`
//! - removes the directional marks iOS puts in front of notices
//! - turns no-break spaces (U+00A0, U+202F) into plain spaces
//!
//! [`normalize`] works on text and never fails. [`decode`] is the entry point
//! for raw upload bytes and rejects buffers that are empty or not UTF-8.
//!
//! # Example
//!
//! ```
//! use chatsift::config::NormalizeConfig;
//! use chatsift::core::normalizer::normalize;
//!
//! let entries = normalize("a\r\nb\rc\n\nd", &NormalizeConfig::new());
//! let texts: Vec<&str> = entries.iter().map(|e| e.text.as_str()).collect();
//! assert_eq!(texts, ["a", "b", "c", "", "d"]);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::NormalizeConfig;
use crate::error::{InputError, Result};

/// One logical line of an export before semantic parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntry {
    /// Zero-based line index after line-break normalization.
    pub index: usize,
    /// Line text without its terminator.
    pub text: String,
}

impl RawEntry {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }

    /// Returns `true` if the line is empty or whitespace-only.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Decodes raw upload bytes into text.
///
/// # Errors
///
/// - [`InputError::Empty`] for a zero-length buffer
/// - [`InputError::InvalidUtf8`] for bytes that are not UTF-8
pub fn decode(bytes: &[u8]) -> Result<&str> {
    if bytes.is_empty() {
        return Err(InputError::Empty.into());
    }
    let text = std::str::from_utf8(bytes).map_err(InputError::from)?;
    Ok(text)
}

/// Replaces line-break variants and strips characters that carry no content.
///
/// The result only contains `\n` as line terminator.
pub fn clean_text(raw: &str) -> String {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push('\n');
            }
            '\n' | '\u{85}' | '\u{2028}' | '\u{2029}' => out.push('\n'),
            '\t' => out.push('\t'),
            '\u{a0}' | '\u{202f}' => out.push(' '),
            '\u{200e}' | '\u{200f}' => {}
            c if c.is_control() => {}
            c => out.push(c),
        }
    }

    out
}

/// Splits raw export text into entries.
///
/// Entry indices always refer to the line position in the cleaned text, so
/// they stay stable whether blank lines are kept or not.
pub fn normalize(raw: &str, config: &NormalizeConfig) -> Vec<RawEntry> {
    if raw.is_empty() {
        return Vec::new();
    }

    let cleaned = clean_text(raw);
    let mut entries: Vec<RawEntry> = cleaned
        .split('\n')
        .enumerate()
        .filter(|(_, line)| config.keep_blank_lines || !line.trim().is_empty())
        .map(|(index, line)| RawEntry::new(index, line.trim_end()))
        .collect();

    // A trailing newline does not open another line.
    if cleaned.ends_with('\n') {
        if entries.last().is_some_and(|e| e.text.is_empty()) {
            entries.pop();
        }
    }

    debug!(
        entries = entries.len(),
        keep_blank_lines = config.keep_blank_lines,
        "normalized export"
    );
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(entries: &[RawEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.text.as_str()).collect()
    }

    #[test]
    fn test_empty_string_is_empty_sequence() {
        assert!(normalize("", &NormalizeConfig::new()).is_empty());
    }

    #[test]
    fn test_line_break_variants() {
        let entries = normalize("a\r\nb\rc\nd\u{2028}e\u{2029}f\u{85}g", &NormalizeConfig::new());
        assert_eq!(texts(&entries), ["a", "b", "c", "d", "e", "f", "g"]);
        let indices: Vec<usize> = entries.iter().map(|e| e.index).collect();
        assert_eq!(indices, [0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_control_characters_removed() {
        let entries = normalize("he\u{0}l\u{7}lo\tworld\u{1b}", &NormalizeConfig::new());
        assert_eq!(texts(&entries), ["hello\tworld"]);
    }

    #[test]
    fn test_bom_and_marks_removed() {
        let entries = normalize(
            "\u{feff}\u{200e}<attached: photo.jpg>\n9:05\u{202f}AM",
            &NormalizeConfig::new(),
        );
        assert_eq!(texts(&entries), ["<attached: photo.jpg>", "9:05 AM"]);
    }

    #[test]
    fn test_blank_lines_kept_by_default() {
        let entries = normalize("a\n\n  \nb", &NormalizeConfig::new());
        assert_eq!(texts(&entries), ["a", "", "", "b"]);
    }

    #[test]
    fn test_blank_lines_dropped_keep_indices() {
        let config = NormalizeConfig::new().with_keep_blank_lines(false);
        let entries = normalize("a\n\n  \nb", &config);
        assert_eq!(texts(&entries), ["a", "b"]);
        assert_eq!(entries[1].index, 3);
    }

    #[test]
    fn test_trailing_newline() {
        let entries = normalize("a\nb\n", &NormalizeConfig::new());
        assert_eq!(texts(&entries), ["a", "b"]);
    }

    #[test]
    fn test_deterministic() {
        let input = "x\r\ny\n\nz";
        let config = NormalizeConfig::new();
        assert_eq!(normalize(input, &config), normalize(input, &config));
    }

    #[test]
    fn test_decode() {
        assert_eq!(decode(b"hello").unwrap(), "hello");
        assert!(decode(b"").unwrap_err().is_input());
        assert!(decode(&[0x61, 0xff]).unwrap_err().is_input());
    }
}
