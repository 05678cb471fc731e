//! Run-scoped configuration.
//!
//! One immutable [`RunConfig`] value is threaded through every stage, so
//! concurrent runs in one process cannot interfere through shared state.
//! Nonces are already [`Fr`] here: the `< p` range check happens at the
//! configuration boundary (CLI parse) *and* again inside the core through
//! `Fr`'s checked constructors.

use crate::plan::WidthOverrides;
use cfazk_crypto::Fr;
use std::path::PathBuf;

/// Input file names inside the target application directory.
pub mod input_files {
    /// Raw adjacency list (hex addresses).
    pub const ADJLIST: &str = "adjlist";
    /// Numified adjacency list (decimal labels).
    pub const NUMIFIED_ADJLIST: &str = "numified_adjlist";
    /// Numified execution path (decimal labels).
    pub const NUMIFIED_PATH: &str = "numified_path";
    /// Recorded execution path (hex addresses).
    pub const RECORDED_PATH: &str = "recorded_path";
    /// Address-to-label translator (hex addresses).
    pub const TRANSLATOR: &str = "translator";
}

/// The four blinding nonces, each a canonical field element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Nonces {
    /// Verifier's nonce, hashed with the execution path.
    pub verifier: Fr,
    /// Prover's execution-path nonce.
    pub path: Fr,
    /// Translator nonce.
    pub translator: Fr,
    /// Adjacency-list nonce.
    pub adjlist: Fr,
}

impl Default for Nonces {
    fn default() -> Self {
        Self {
            verifier: Fr::zero(),
            path: Fr::zero(),
            translator: Fr::zero(),
            adjlist: Fr::zero(),
        }
    }
}

/// Immutable configuration for one formatting run.
#[derive(Clone, Debug)]
pub struct RunConfig {
    /// Directory holding the five collaborator input files.
    pub app_dir: PathBuf,
    /// Where the `in_*` circuit input files are written.
    pub output_dir: PathBuf,
    /// Poseidon round-constant/MDS tables (JSON collaborator data).
    pub poseidon_params: PathBuf,
    /// Pad the adjacency list and translator to this many nodes.
    pub pad_adjlist_to: Option<usize>,
    /// Pad both execution paths to this many transitions.
    pub pad_path_to: Option<usize>,
    /// Width/level overrides, validated against the computed minima.
    pub overrides: WidthOverrides,
    /// Blinding nonces.
    pub nonces: Nonces,
}

impl RunConfig {
    /// A config writing outputs back into the application directory, with
    /// no padding, no overrides, and zero nonces.
    #[must_use]
    pub fn new(app_dir: PathBuf, poseidon_params: PathBuf) -> Self {
        Self {
            output_dir: app_dir.clone(),
            app_dir,
            poseidon_params,
            pad_adjlist_to: None,
            pad_path_to: None,
            overrides: WidthOverrides::default(),
            nonces: Nonces::default(),
        }
    }
}
