//! Plain-text output writers for the circuit input files.
//!
//! Every artifact is a decimal integer or a newline-separated list of them,
//! written in one shot after its computation fully succeeded — a failed run
//! never leaves a partially written artifact behind.

use anyhow::{Context, Result};
use std::fmt::Display;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Ensure the parent directory for a file exists (no-op if none).
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating parent directory {}", dir.display()))?;
        }
    }
    Ok(())
}

/// Write one value per line (no trailing newline, matching the consumer's
/// expectations).
pub fn write_lines<T: Display>(path: &Path, values: &[T]) -> Result<()> {
    ensure_parent_dir(path)?;
    let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut w = BufWriter::new(f);
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            writeln!(w).with_context(|| format!("write {}", path.display()))?;
        }
        write!(w, "{v}").with_context(|| format!("write {}", path.display()))?;
    }
    w.flush().with_context(|| format!("flush {}", path.display()))
}

/// Write a single value.
pub fn write_value<T: Display>(path: &Path, value: &T) -> Result<()> {
    ensure_parent_dir(path)?;
    let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut w = BufWriter::new(f);
    write!(w, "{value}").with_context(|| format!("write {}", path.display()))?;
    w.flush().with_context(|| format!("flush {}", path.display()))
}
