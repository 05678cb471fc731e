//! Execution-path parsing and padding.
//!
//! Path files open with `initial_node=<label> final_node=<label>` and carry
//! one transition per line: `<jumpkind> <dst> [<ret>]`, with `<ret>` present
//! exactly when the jumpkind is `call`. The recorded path uses hex addresses;
//! the numified path uses decimal labels. Padding appends `empty` transitions
//! whose destination is the run's empty sentinel.

use crate::{parse_uint, ParseError};
use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// The kind of a control-flow transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JumpKind {
    /// Plain jump/branch.
    Jump,
    /// Function call (carries a return destination).
    Call,
    /// Function return.
    Ret,
    /// Padding sentinel.
    Empty,
}

impl JumpKind {
    /// The 2-bit wire code: jump=0, call=1, ret=2, empty=3.
    #[inline]
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Jump => 0,
            Self::Call => 1,
            Self::Ret => 2,
            Self::Empty => 3,
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "jump" => Some(Self::Jump),
            "call" => Some(Self::Call),
            "ret" => Some(Self::Ret),
            "empty" => Some(Self::Empty),
            _ => None,
        }
    }
}

/// One recorded transition.
///
/// `ret` holds the parse-time empty destination for non-call kinds; the
/// serializer zeroes it on the wire regardless.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    /// Transition kind.
    pub kind: JumpKind,
    /// Destination address (recorded) or label (numified).
    pub dst: u64,
    /// Return destination; meaningful only for `call`.
    pub ret: u64,
}

/// A padded execution path plus its endpoint labels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutionPath {
    /// Label the path starts from.
    pub initial_node: u64,
    /// Label the path must end at.
    pub final_node: u64,
    transitions: Vec<Transition>,
    unpadded_len: usize,
}

impl ExecutionPath {
    /// Transitions in order, padding last.
    #[inline]
    #[must_use]
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Number of transitions before padding.
    #[inline]
    #[must_use]
    pub fn unpadded_len(&self) -> usize {
        self.unpadded_len
    }

    /// Number of transitions after padding.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    /// Whether the path has no transitions.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}

/// Read the numified path (decimal labels), padding with `empty` transitions
/// targeting `empty_dst` (the adjacency sentinel `N`).
///
/// # Errors
/// Malformed header or transition lines, or `pad` below the path length.
pub fn read_numified_path<P: AsRef<Path>>(
    path: P,
    pad: Option<usize>,
    empty_dst: u64,
) -> Result<ExecutionPath> {
    read_path(path.as_ref(), pad, empty_dst, 10)
}

/// Read the recorded path (hex addresses), padding with `empty` transitions
/// targeting address `0`.
///
/// # Errors
/// Malformed header or transition lines, or `pad` below the path length.
pub fn read_recorded_path<P: AsRef<Path>>(path: P, pad: Option<usize>) -> Result<ExecutionPath> {
    read_path(path.as_ref(), pad, 0, 16)
}

fn read_path(path: &Path, pad: Option<usize>, empty_dst: u64, radix: u32) -> Result<ExecutionPath> {
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut lines = BufReader::new(f).lines().enumerate();

    let (initial_node, final_node) = match lines.next() {
        Some((_, line)) => {
            let line = line.with_context(|| format!("read {}:1", path.display()))?;
            parse_header(path, &line)?
        }
        None => bail!(ParseError::new(path, 1, "missing initial_node/final_node header")),
    };

    let mut transitions = Vec::new();
    for (idx, line) in lines {
        let lineno = idx + 1;
        let line = line.with_context(|| format!("read {}:{lineno}", path.display()))?;
        transitions.push(parse_transition(path, lineno, &line, empty_dst, radix)?);
    }

    let unpadded_len = transitions.len();
    if let Some(pad) = pad {
        if pad < unpadded_len {
            bail!(
                "execution path {} contains {unpadded_len} transitions; cannot pad to {pad}",
                path.display()
            );
        }
        transitions.resize(
            pad,
            Transition { kind: JumpKind::Empty, dst: empty_dst, ret: empty_dst },
        );
    }

    Ok(ExecutionPath { initial_node, final_node, transitions, unpadded_len })
}

fn parse_header(path: &Path, line: &str) -> Result<(u64, u64)> {
    let mut nodes = [0u64; 2];
    let mut tokens = line.split_whitespace();
    for (slot, key) in nodes.iter_mut().zip(["initial_node", "final_node"]) {
        let tok = tokens
            .next()
            .ok_or_else(|| ParseError::new(path, 1, format!("missing {key}= in header")))?;
        let value = tok
            .strip_prefix(key)
            .and_then(|rest| rest.strip_prefix('='))
            .and_then(|v| parse_uint(v, 10))
            .ok_or_else(|| {
                ParseError::new(path, 1, format!("expected {key}=<label>, got {tok:?}"))
            })?;
        *slot = value;
    }
    Ok((nodes[0], nodes[1]))
}

fn parse_transition(
    path: &Path,
    lineno: usize,
    line: &str,
    empty_dst: u64,
    radix: u32,
) -> Result<Transition> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let [kind_tok, rest @ ..] = tokens.as_slice() else {
        bail!(ParseError::new(path, lineno, "empty transition line"));
    };
    let kind = JumpKind::parse(kind_tok)
        .ok_or_else(|| ParseError::new(path, lineno, format!("unknown jumpkind {kind_tok:?}")))?;

    let expected = if kind == JumpKind::Call { 2 } else { 1 };
    if rest.len() != expected {
        bail!(ParseError::new(
            path,
            lineno,
            format!("{kind_tok} transition takes {expected} field(s), got {}", rest.len()),
        ));
    }

    let dst = parse_uint(rest[0], radix).ok_or_else(|| {
        ParseError::new(path, lineno, format!("bad destination {:?}", rest[0]))
    })?;
    let ret = if kind == JumpKind::Call {
        parse_uint(rest[1], radix).ok_or_else(|| {
            ParseError::new(path, lineno, format!("bad return destination {:?}", rest[1]))
        })?
    } else {
        empty_dst
    };
    Ok(Transition { kind, dst, ret })
}
