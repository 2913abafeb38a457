//! Pipeline orchestrator.
//!
//! Runs normalizer, parser, noise filter and counter in that order and folds
//! their output into one [`ProcessResult`]. Only input decoding and platform
//! lookup can fail; everything else becomes a warning.
//!
//! # Example
//!
//! ```
//! use chatsift::config::ProcessOptions;
//! use chatsift::core::processor::process;
//! use chatsift::parser::Platform;
//!
//! let raw = "1/1/24, 10:00 AM - Alice: Hi\n1/1/24, 10:01 AM - Bob: <Media omitted>";
//! let result = process(raw, Platform::WhatsApp, &ProcessOptions::default());
//!
//! assert_eq!(result.messages.len(), 1);
//! assert_eq!(result.stats.filtered.media, 1);
//! assert!(result.warnings.is_empty());
//! ```

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::RawMessage;
use crate::config::ProcessOptions;
use crate::core::counter::count_with;
use crate::core::filter::NoiseFilter;
use crate::core::models::{ProcessResult, Warning, WarningKind};
use crate::core::normalizer::{clean_text, decode, normalize};
use crate::error::Result;
use crate::parser::{Platform, parse_entries};
#[cfg(feature = "json-exports")]
use crate::parsing::{is_json_export, parse_json_export};

/// A configured pipeline. Holds no state between runs, so one instance can
/// serve any number of threads.
///
/// # Example
///
/// ```
/// use chatsift::Pipeline;
/// use chatsift::config::ProcessOptions;
/// use chatsift::core::filter::NoiseFilter;
///
/// # fn main() -> chatsift::Result<()> {
/// let filter = NoiseFilter::new().with_system_pattern(r"^ping$")?;
/// let pipeline = Pipeline::new(ProcessOptions::new().with_top_words(10)).with_filter(filter);
///
/// let result = pipeline.process_named("[2024-01-15 10:30] bot: ping", "telegram")?;
/// assert!(result.messages.is_empty());
/// assert_eq!(result.stats.filtered.system, 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    options: ProcessOptions,
    filter: NoiseFilter,
}

impl Pipeline {
    /// Creates a pipeline with the built-in noise patterns.
    pub fn new(options: ProcessOptions) -> Self {
        Self {
            options,
            filter: NoiseFilter::new(),
        }
    }

    /// Replaces the noise filter.
    #[must_use]
    pub fn with_filter(mut self, filter: NoiseFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Returns the options of this pipeline.
    pub fn options(&self) -> &ProcessOptions {
        &self.options
    }

    /// Returns the noise filter of this pipeline.
    pub fn filter(&self) -> &NoiseFilter {
        &self.filter
    }

    /// Processes export text. An empty string yields an empty result.
    pub fn process(&self, raw: &str, platform: Platform) -> ProcessResult {
        let (messages, mut warnings) = self.parse_stage(raw, platform);
        let parsed = messages.len();

        if parsed == 0 && !clean_text(raw).trim().is_empty() {
            warnings.push(Warning::new(
                WarningKind::NoMessagesParsed,
                format!("no {platform} messages found in the export"),
            ));
        }

        let (kept, filtered) = self.filter.filter(messages);
        if parsed > 0 && kept.is_empty() {
            warnings.push(Warning::new(
                WarningKind::NoMessagesRetained,
                format!(
                    "all {parsed} messages were removed as noise (system: {}, media: {})",
                    filtered.system, filtered.media
                ),
            ));
        }

        let mut stats = count_with(&kept, &self.options);
        stats.filtered = filtered;

        debug!(
            %platform,
            parsed,
            retained = kept.len(),
            warnings = warnings.len(),
            "processed export"
        );

        ProcessResult {
            messages: kept,
            stats,
            warnings,
        }
    }

    /// Processes raw upload bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ChatsiftError::Input`](crate::ChatsiftError::Input) if the
    /// buffer is empty or not UTF-8.
    pub fn process_bytes(&self, bytes: &[u8], platform: Platform) -> Result<ProcessResult> {
        let raw = decode(bytes)?;
        Ok(self.process(raw, platform))
    }

    /// Processes export text for a platform given by name or alias.
    ///
    /// # Errors
    ///
    /// Returns [`ChatsiftError::UnsupportedPlatform`](crate::ChatsiftError::UnsupportedPlatform)
    /// for an unknown platform name.
    pub fn process_named(&self, raw: &str, platform: &str) -> Result<ProcessResult> {
        let platform: Platform = platform.parse()?;
        Ok(self.process(raw, platform))
    }

    /// Reads and processes an export file.
    ///
    /// # Errors
    ///
    /// Returns [`ChatsiftError::Io`](crate::ChatsiftError::Io) if the file
    /// cannot be read, or an input error as in [`process_bytes`](Self::process_bytes).
    pub fn process_file(&self, path: impl AsRef<Path>, platform: Platform) -> Result<ProcessResult> {
        let bytes = fs::read(path.as_ref())?;
        self.process_bytes(&bytes, platform)
    }

    fn parse_stage(&self, raw: &str, platform: Platform) -> (Vec<RawMessage>, Vec<Warning>) {
        if let Some(parsed) = self.parse_json(raw, platform) {
            return parsed;
        }
        let entries = normalize(raw, &self.options.normalize_config());
        parse_entries(&entries, platform, self.options.continuation)
    }

    #[cfg(feature = "json-exports")]
    fn parse_json(&self, raw: &str, platform: Platform) -> Option<(Vec<RawMessage>, Vec<Warning>)> {
        if is_json_export(raw, platform) {
            parse_json_export(raw, platform, self.options.fix_encoding)
        } else {
            None
        }
    }

    #[cfg(not(feature = "json-exports"))]
    fn parse_json(&self, _raw: &str, _platform: Platform) -> Option<(Vec<RawMessage>, Vec<Warning>)> {
        None
    }
}

/// Processes export text with the built-in noise patterns.
pub fn process(raw: &str, platform: Platform, options: &ProcessOptions) -> ProcessResult {
    Pipeline::new(options.clone()).process(raw, platform)
}
