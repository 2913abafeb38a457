//! Configuration types for the pipeline.
//!
//! Plain structs with defaults and builder methods, usable without any CLI
//! framework.
//!
//! - [`NormalizeConfig`] - how raw text is split into entries
//! - [`ContinuationPolicy`] - what happens to lines without a message header
//! - [`ProcessOptions`] - everything a pipeline run needs
//!
//! # Example
//!
//! ```rust
//! use chatsift::config::{ContinuationPolicy, ProcessOptions, stop_words};
//!
//! let options = ProcessOptions::new()
//!     .with_include_spaces(false)
//!     .with_continuation(ContinuationPolicy::Drop)
//!     .with_top_words(20)
//!     .with_stop_words(stop_words(["the", "a", "的"]));
//! ```

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Predicate deciding whether a token is left out of the word-frequency table.
///
/// The token is passed lowercased.
pub type WordPredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Builds a [`WordPredicate`] that matches any word of `words`
/// (case-insensitive).
///
/// # Example
///
/// ```rust
/// use chatsift::config::stop_words;
///
/// let is_stop = stop_words(["The", "and"]);
/// assert!(is_stop("the"));
/// assert!(!is_stop("cat"));
/// ```
pub fn stop_words<I, S>(words: I) -> WordPredicate
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let set: HashSet<String> = words
        .into_iter()
        .map(|w| w.as_ref().to_lowercase())
        .collect();
    Arc::new(move |word: &str| set.contains(word))
}

/// Settings for the text normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeConfig {
    /// Keep blank lines as entries (default: true).
    ///
    /// Needed to keep paragraph breaks inside multi-line messages.
    pub keep_blank_lines: bool,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            keep_blank_lines: true,
        }
    }
}

impl NormalizeConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether blank lines are kept.
    #[must_use]
    pub fn with_keep_blank_lines(mut self, keep: bool) -> Self {
        self.keep_blank_lines = keep;
        self
    }
}

/// Handling of lines that do not open a new message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContinuationPolicy {
    /// Append the line to the body of the previous message.
    #[default]
    Append,
    /// Drop the line and record an `unparseable_line` warning.
    Drop,
}

/// Options for one pipeline run.
///
/// The stop-word predicate is not serialized.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessOptions {
    /// Count whitespace characters (default: true).
    pub include_spaces: bool,

    /// Keep blank lines while normalizing (default: true).
    pub keep_blank_lines: bool,

    /// Continuation-line policy (default: append).
    pub continuation: ContinuationPolicy,

    /// Size of the word-frequency table (default: 50).
    pub top_words: usize,

    /// Repair Meta's mojibake in Instagram JSON exports (default: true).
    pub fix_encoding: bool,

    /// Words left out of the frequency table.
    #[serde(skip)]
    pub stop_words: Option<WordPredicate>,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            include_spaces: true,
            keep_blank_lines: true,
            continuation: ContinuationPolicy::Append,
            top_words: 50,
            fix_encoding: true,
            stop_words: None,
        }
    }
}

impl fmt::Debug for ProcessOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessOptions")
            .field("include_spaces", &self.include_spaces)
            .field("keep_blank_lines", &self.keep_blank_lines)
            .field("continuation", &self.continuation)
            .field("top_words", &self.top_words)
            .field("fix_encoding", &self.fix_encoding)
            .field("stop_words", &self.stop_words.as_ref().map(|_| "<predicate>"))
            .finish()
    }
}

impl ProcessOptions {
    /// Creates options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether whitespace characters are counted.
    #[must_use]
    pub fn with_include_spaces(mut self, include: bool) -> Self {
        self.include_spaces = include;
        self
    }

    /// Sets whether blank lines are kept while normalizing.
    #[must_use]
    pub fn with_keep_blank_lines(mut self, keep: bool) -> Self {
        self.keep_blank_lines = keep;
        self
    }

    /// Sets the continuation-line policy.
    #[must_use]
    pub fn with_continuation(mut self, policy: ContinuationPolicy) -> Self {
        self.continuation = policy;
        self
    }

    /// Sets the size of the word-frequency table.
    #[must_use]
    pub fn with_top_words(mut self, n: usize) -> Self {
        self.top_words = n;
        self
    }

    /// Enables or disables the Instagram encoding fix.
    #[must_use]
    pub fn with_fix_encoding(mut self, fix: bool) -> Self {
        self.fix_encoding = fix;
        self
    }

    /// Sets the stop-word predicate.
    #[must_use]
    pub fn with_stop_words(mut self, predicate: WordPredicate) -> Self {
        self.stop_words = Some(predicate);
        self
    }

    /// Returns the normalizer settings implied by these options.
    pub fn normalize_config(&self) -> NormalizeConfig {
        NormalizeConfig::new().with_keep_blank_lines(self.keep_blank_lines)
    }

    /// Returns `true` if `word` is excluded from the frequency table.
    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.as_ref().is_some_and(|p| p(word))
    }
}
