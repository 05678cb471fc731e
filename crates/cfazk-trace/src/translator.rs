//! Address-to-label translator parsing and padding.
//!
//! One hex address per line, ordered by ascending numified label. The padded
//! table always ends with one extra `0` entry so the circuit can translate
//! the empty destination address.

use crate::{parse_uint, ParseError};
use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Raw address written for the empty-destination sentinel entry.
pub const EMPTY_DEST_ADDR: u64 = 0;

/// The padded translator table: entry `i` is the raw address of label `i`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Translator {
    addrs: Vec<u64>,
    unpadded_len: usize,
}

impl Translator {
    /// All entries, padding and the trailing sentinel included
    /// (length = padded size + 1).
    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[u64] {
        &self.addrs
    }

    /// Number of addresses before padding and the sentinel.
    #[inline]
    #[must_use]
    pub fn unpadded_len(&self) -> usize {
        self.unpadded_len
    }
}

/// Read the translator, zero-pad to `pad` entries, and append the sentinel.
///
/// `pad` should match the adjacency list's padded size so labels stay
/// aligned across the two tables.
///
/// # Errors
/// Malformed hex lines ([`ParseError`]) and `pad` below the entry count.
pub fn read_translator<P: AsRef<Path>>(path: P, pad: Option<usize>) -> Result<Translator> {
    let path_ref = path.as_ref();
    let f = File::open(path_ref).with_context(|| format!("open {}", path_ref.display()))?;

    let mut addrs = Vec::new();
    for (idx, line) in BufReader::new(f).lines().enumerate() {
        let lineno = idx + 1;
        let line = line.with_context(|| format!("read {}:{lineno}", path_ref.display()))?;
        let tok = line.trim();
        if tok.is_empty() {
            bail!(ParseError::new(path_ref, lineno, "empty translator line"));
        }
        let addr = parse_uint(tok, 16)
            .ok_or_else(|| ParseError::new(path_ref, lineno, format!("bad hex address {tok:?}")))?;
        addrs.push(addr);
    }

    let unpadded_len = addrs.len();
    if let Some(pad) = pad {
        if pad < unpadded_len {
            bail!(
                "translator {} contains {unpadded_len} entries; cannot pad to {pad}",
                path_ref.display()
            );
        }
        addrs.resize(pad, EMPTY_DEST_ADDR);
    }
    addrs.push(EMPTY_DEST_ADDR);

    Ok(Translator { addrs, unpadded_len })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn write_fixture(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("cfazk-tr-{}-{name}", std::process::id()));
        let mut f = File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn pads_and_appends_sentinel() {
        let p = write_fixture("ok", "400000\n400004\n400008\n");
        let tr = read_translator(&p, Some(8)).unwrap();
        assert_eq!(tr.unpadded_len(), 3);
        assert_eq!(tr.entries().len(), 9);
        assert_eq!(tr.entries()[..3], [0x40_0000, 0x40_0004, 0x40_0008]);
        assert_eq!(tr.entries()[8], EMPTY_DEST_ADDR);
    }

    #[test]
    fn sentinel_present_without_padding() {
        let p = write_fixture("nopad", "1f\n");
        let tr = read_translator(&p, None).unwrap();
        assert_eq!(tr.entries(), &[0x1f, EMPTY_DEST_ADDR]);
    }

    #[test]
    fn rejects_bad_input_and_short_pad() {
        let p = write_fixture("bad", "400000\nzz_not_hex\n");
        let err = read_translator(&p, None).unwrap_err();
        assert_eq!(err.downcast_ref::<ParseError>().unwrap().line, 2);

        let p = write_fixture("short", "1\n2\n3\n");
        assert!(read_translator(&p, Some(2)).is_err());
    }
}
