//! Unified error types for chatsift.
//!
//! Only two conditions stop a pipeline run: input that is not usable text
//! ([`ChatsiftError::Input`]) and a platform outside the supported set
//! ([`ChatsiftError::UnsupportedPlatform`]). Everything else an export can
//! throw at the parser is degraded into a [`Warning`](crate::core::Warning)
//! on the result.
//!
//! The remaining variants belong to the edges of the crate: building a
//! [`NoiseFilter`](crate::core::NoiseFilter) with custom patterns, reading a
//! file from disk, or writing JSON from the CLI.

use std::io;

use thiserror::Error;

/// A specialized [`Result`] type for chatsift operations.
///
/// # Example
///
/// ```rust
/// use chatsift::error::Result;
/// use chatsift::RawMessage;
///
/// fn my_function() -> Result<Vec<RawMessage>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, ChatsiftError>;

/// The error type for all chatsift operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatsiftError {
    /// The raw export could not be used as text.
    #[error("Invalid input: {0}")]
    Input(#[from] InputError),

    /// The requested platform is not one of WhatsApp, Telegram or Instagram.
    #[error("Unsupported platform '{name}'. Expected one of: {expected}")]
    UnsupportedPlatform {
        /// The name that was requested
        name: String,
        /// Accepted names and aliases
        expected: &'static str,
    },

    /// A caller-supplied noise pattern is not a valid regular expression.
    #[error("Invalid {category} pattern '{pattern}': {source}")]
    InvalidPattern {
        /// Pattern category ("media" or "system")
        category: &'static str,
        /// The rejected pattern
        pattern: String,
        /// The underlying regex error
        #[source]
        source: regex::Error,
    },

    /// An I/O error occurred while reading an export or writing output.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error.
    #[cfg(feature = "json-exports")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reasons raw export bytes are rejected before parsing starts.
#[derive(Debug, Error)]
pub enum InputError {
    /// The buffer holds no bytes at all.
    #[error("export is empty")]
    Empty,

    /// The buffer is not valid UTF-8.
    #[error("export is not valid UTF-8 (valid up to byte {valid_up_to})")]
    InvalidUtf8 {
        /// Length of the longest valid prefix
        valid_up_to: usize,
        /// The underlying UTF-8 error
        #[source]
        source: std::str::Utf8Error,
    },
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ChatsiftError {
    /// Creates an unsupported platform error.
    pub fn unsupported_platform(name: impl Into<String>) -> Self {
        ChatsiftError::UnsupportedPlatform {
            name: name.into(),
            expected: "whatsapp, wa, telegram, tg, instagram, ig",
        }
    }

    /// Creates an invalid pattern error.
    pub fn invalid_pattern(
        category: &'static str,
        pattern: impl Into<String>,
        source: regex::Error,
    ) -> Self {
        ChatsiftError::InvalidPattern {
            category,
            pattern: pattern.into(),
            source,
        }
    }

    /// Returns `true` if this is an input error.
    pub fn is_input(&self) -> bool {
        matches!(self, ChatsiftError::Input(_))
    }

    /// Returns `true` if this is an unsupported platform error.
    pub fn is_unsupported_platform(&self) -> bool {
        matches!(self, ChatsiftError::UnsupportedPlatform { .. })
    }

    /// Returns `true` if this is an I/O error.
    pub fn is_io(&self) -> bool {
        matches!(self, ChatsiftError::Io(_))
    }
}

impl From<std::str::Utf8Error> for InputError {
    fn from(err: std::str::Utf8Error) -> Self {
        InputError::InvalidUtf8 {
            valid_up_to: err.valid_up_to(),
            source: err,
        }
    }
}
