// crates/cfazk-format/src/lib.rs

//! Circuit input formatter core.
//!
//! Converts a control-flow graph (adjacency list), an address-to-label
//! translator, and a recorded execution path into fixed-width, field-packed
//! witness files plus Poseidon sponge digests of each packed artifact. The
//! external arithmetic circuit re-derives the digests to check the witness
//! against a prior commitment, so every stage here is bit-exact by contract.
//!
//! Pipeline, leaf first: [`plan`] sizes the fixed widths, [`encode`]
//! compresses neighbor sets into bucket/bitmask levels, [`serialize`] lays
//! transitions and address tables out as fixed-width integers, [`pack`]
//! bit-packs them into field elements and injects the blinding nonces, and
//! [`pipeline`] orchestrates file I/O around the pure stages.
//!
//! Every transform is a total, stateless function of its input and the
//! immutable [`config::RunConfig`]; nothing here retries or mutates shared
//! state, so independent runs may be parallelized freely across processes.

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

pub mod config;
pub mod emit;
pub mod encode;
pub mod error;
pub mod pack;
pub mod pipeline;
pub mod plan;
pub mod serialize;

pub use config::{Nonces, RunConfig};
pub use error::{ConfigError, FormatError, OverflowError};
pub use pipeline::{run, RunSummary};
pub use plan::{RunPlan, WidthOverrides};
