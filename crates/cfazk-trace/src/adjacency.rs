//! Adjacency-list parsing and padding.
//!
//! The numified list drives encoding: one line per node,
//! `<label> <space-separated neighbor labels>`, labels in file order. The raw
//! list (hex addresses) is only consulted for the maximum address, which
//! sizes the run's address bit-width.

use crate::{parse_uint, ParseError};
use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// One node of the control-flow graph: its label and neighbor set.
///
/// Neighbor order is the file order; the encoder keeps it, because the
/// committed circuit layout was produced from the same ordering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdjacencyNode {
    /// Numified node label.
    pub label: u64,
    /// Neighbor labels (order as read, duplicates allowed upstream).
    pub neighbors: Vec<u64>,
}

/// A padded adjacency list of fixed size `N`.
///
/// Padding nodes have no neighbors; the label `N` itself is reserved as the
/// "empty destination" sentinel and never appears as a node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdjacencyList {
    nodes: Vec<AdjacencyNode>,
    unpadded_len: usize,
}

impl AdjacencyList {
    /// Number of nodes after padding (`N`).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the list holds no nodes.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of nodes before padding was applied.
    #[inline]
    #[must_use]
    pub fn unpadded_len(&self) -> usize {
        self.unpadded_len
    }

    /// The nodes, file order, padding nodes last.
    #[inline]
    #[must_use]
    pub fn nodes(&self) -> &[AdjacencyNode] {
        &self.nodes
    }

    /// The reserved empty-destination sentinel label (`N`).
    #[inline]
    #[must_use]
    pub fn empty_label(&self) -> u64 {
        self.nodes.len() as u64
    }
}

/// Read the numified adjacency list, optionally padding to `pad` nodes.
///
/// Phantom padding nodes are labeled `len..pad` and have no neighbors.
///
/// # Errors
/// Malformed lines ([`ParseError`]) and `pad` below the unpadded length.
pub fn read_numified_adjlist<P: AsRef<Path>>(
    path: P,
    pad: Option<usize>,
) -> Result<AdjacencyList> {
    let path_ref = path.as_ref();
    let f = File::open(path_ref).with_context(|| format!("open {}", path_ref.display()))?;

    let mut nodes = Vec::new();
    for (idx, line) in BufReader::new(f).lines().enumerate() {
        let lineno = idx + 1;
        let line = line.with_context(|| format!("read {}:{lineno}", path_ref.display()))?;
        let mut tokens = line.split_whitespace();
        let label_tok = tokens
            .next()
            .ok_or_else(|| ParseError::new(path_ref, lineno, "empty adjacency line"))?;
        let label = parse_uint(label_tok, 10).ok_or_else(|| {
            ParseError::new(path_ref, lineno, format!("bad node label {label_tok:?}"))
        })?;
        let mut neighbors = Vec::new();
        for tok in tokens {
            let n = parse_uint(tok, 10).ok_or_else(|| {
                ParseError::new(path_ref, lineno, format!("bad neighbor label {tok:?}"))
            })?;
            neighbors.push(n);
        }
        nodes.push(AdjacencyNode { label, neighbors });
    }

    let unpadded_len = nodes.len();
    if let Some(pad) = pad {
        if pad < unpadded_len {
            bail!(
                "adjacency list {} contains {unpadded_len} nodes; cannot pad to {pad}",
                path_ref.display()
            );
        }
        while nodes.len() < pad {
            nodes.push(AdjacencyNode {
                label: nodes.len() as u64,
                neighbors: Vec::new(),
            });
        }
    }
    Ok(AdjacencyList { nodes, unpadded_len })
}

/// Scan the raw (hex-address) adjacency list and return the maximum address.
///
/// Every whitespace-separated token is an address; the maximum sizes the
/// address bit-width for path/translator serialization.
///
/// # Errors
/// Malformed hex tokens ([`ParseError`]).
pub fn max_raw_address<P: AsRef<Path>>(path: P) -> Result<u64> {
    let path_ref = path.as_ref();
    let f = File::open(path_ref).with_context(|| format!("open {}", path_ref.display()))?;

    let mut max = 0u64;
    for (idx, line) in BufReader::new(f).lines().enumerate() {
        let lineno = idx + 1;
        let line = line.with_context(|| format!("read {}:{lineno}", path_ref.display()))?;
        for tok in line.split_whitespace() {
            let addr = parse_uint(tok, 16).ok_or_else(|| {
                ParseError::new(path_ref, lineno, format!("bad hex address {tok:?}"))
            })?;
            max = max.max(addr);
        }
    }
    Ok(max)
}
