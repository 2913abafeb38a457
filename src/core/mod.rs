//! Pipeline stages and their result types.
//!
//! - [`normalizer`] - raw text to numbered line entries
//! - [`filter`] - system notice and media placeholder removal
//! - [`counter`] - character, word and timing statistics
//! - [`models`] - [`ProcessResult`] and everything inside it
//! - [`processor`] - the orchestrator tying the stages together

pub mod counter;
pub mod filter;
pub mod models;
pub mod normalizer;
pub mod processor;

pub use counter::{Script, count, count_characters, count_with, dominant_script, tokenize};
pub use filter::{NoiseFilter, NoiseKind};
pub use models::{ChatStats, FilterStats, ProcessResult, SenderStats, Warning, WarningKind};
pub use normalizer::{RawEntry, decode, normalize};
pub use processor::{Pipeline, process};
