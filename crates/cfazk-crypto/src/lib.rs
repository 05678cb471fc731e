// crates/cfazk-crypto/src/lib.rs

//! Crypto substrate for the CFAZK circuit input formatter.
//!
//! Three layers, leaf first:
//! - [`field`]: arithmetic over the BN254 scalar field (`Fr`), the native
//!   datum of the downstream arithmetic circuit.
//! - [`params`] + [`poseidon`]: the Poseidon permutation over an `Fr` state
//!   vector, parameterized by externally supplied round-constant/MDS tables.
//! - [`sponge`]: chunked absorption of an 8-aligned `Fr` sequence into a
//!   single digest via repeated permutation calls.
//!
//! Correctness here is bit-exact: the circuit re-derives these digests, so
//! any deviation in reduction, round scheduling, or absorption order yields
//! an unverifiable witness. Values are therefore range-checked at every
//! construction boundary and never reduced silently.

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

pub mod field;
pub mod params;
pub mod poseidon;
pub mod sponge;

pub use field::Fr;
pub use params::{PoseidonParams, PoseidonTable};

use thiserror::Error;

/// Errors raised by the field/permutation/sponge layers.
///
/// All variants are fatal: every operation is a deterministic pure function,
/// so a failure is a configuration or data-integrity problem, never a
/// transient condition.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// A value was presented that is not a canonical field element.
    #[error("value {value} is not below the field modulus ({modulus_bits}-bit p)")]
    ValueOutOfRange {
        /// Decimal rendering of the offending value.
        value: String,
        /// Bit length of the modulus, for the error message.
        modulus_bits: u64,
    },

    /// Requested a permutation arity outside the supported `[2, 9]` range.
    #[error("unsupported Poseidon arity t={t} (supported range is 2..=9)")]
    UnsupportedArity {
        /// The requested state width.
        t: usize,
    },

    /// No table for the requested arity was present in the loaded parameters.
    #[error("no Poseidon table loaded for arity t={t}")]
    MissingTable {
        /// The requested state width.
        t: usize,
    },

    /// A loaded table has the wrong shape or an out-of-range entry.
    #[error("Poseidon table for t={t} is malformed: {reason}")]
    MalformedTable {
        /// Arity of the offending table.
        t: usize,
        /// Human-readable shape/range violation.
        reason: String,
    },

    /// The permutation was called with a state that does not match its table.
    #[error("Poseidon state width {got} does not match the t={expected} table")]
    StateWidthMismatch {
        /// Arity of the table in use.
        expected: usize,
        /// Length of the state vector actually supplied.
        got: usize,
    },

    /// Sponge input length is not a positive multiple of the rate.
    #[error("sponge input length {len} is not a positive multiple of {rate}")]
    BadInputLength {
        /// Number of field elements supplied.
        len: usize,
        /// The sponge rate.
        rate: usize,
    },
}
