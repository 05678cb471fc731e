// crates/cfazk-trace/src/lib.rs

//! Input model for the circuit input formatter.
//!
//! The CFG-extraction collaborator hands over five line-oriented text files
//! per target application: the raw and numified adjacency lists, the
//! address-to-label translator, and the raw and numified execution paths.
//! This crate parses them into typed values and applies the run's padding.
//!
//! Parsers are strict: a malformed line is a fatal [`ParseError`] naming the
//! file and line, never a silently skipped or coerced entry. Padding a
//! structure below its current length is likewise rejected.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used
)]

pub mod adjacency;
pub mod path;
pub mod translator;

pub use adjacency::{max_raw_address, read_numified_adjlist, AdjacencyList, AdjacencyNode};
pub use path::{read_numified_path, read_recorded_path, ExecutionPath, JumpKind, Transition};
pub use translator::{read_translator, Translator};

use std::path::Path;
use thiserror::Error;

/// A malformed input line: wrong field count, bad number base, or a missing
/// header. Always fatal.
#[derive(Debug, Error)]
#[error("{file}:{line}: {reason}")]
pub struct ParseError {
    /// Source file the line came from.
    pub file: String,
    /// 1-based line number.
    pub line: usize,
    /// What was wrong with it.
    pub reason: String,
}

impl ParseError {
    pub(crate) fn new(path: &Path, line: usize, reason: impl Into<String>) -> Self {
        Self {
            file: path.display().to_string(),
            line,
            reason: reason.into(),
        }
    }
}

/// Parse an unsigned integer in the given radix, tolerating a `0x` prefix
/// for hexadecimal input.
pub(crate) fn parse_uint(token: &str, radix: u32) -> Option<u64> {
    let digits = if radix == 16 {
        token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")).unwrap_or(token)
    } else {
        token
    };
    u64::from_str_radix(digits, radix).ok()
}
