//! Error taxonomy for the formatting pipeline.
//!
//! Three families, all fatal:
//! - [`ConfigError`]: an override below its computed minimum, or a width
//!   combination the field cannot carry. Messages name the violated minimum.
//! - [`OverflowError`]: a value that would leave its declared fixed width or
//!   the field range. Never truncated.
//! - `ParseError` (in `cfazk-trace`): malformed input lines, reported with
//!   file and line.
//!
//! No transform is retried: each is a deterministic pure function over
//! already-materialized data, so failures are never transient.

use thiserror::Error;

/// A run configuration the planner rejects.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A caller override is below the computed minimum.
    #[error("{name} override {given} is below the required minimum {min}")]
    BelowMinimum {
        /// The flag being overridden.
        name: &'static str,
        /// The supplied value.
        given: u64,
        /// The computed minimum it must meet.
        min: u64,
    },

    /// Packing with a zero element width is meaningless.
    #[error("packed element width must be positive")]
    ZeroElementWidth,

    /// A single element would not fit inside one field element.
    #[error("element width {elem_bits} must be below the {field_bits}-bit field width")]
    ElementTooWide {
        /// Declared element width.
        elem_bits: u64,
        /// Field bit length.
        field_bits: u64,
    },

    /// The per-node adjacency representation cannot fit one field element.
    #[error(
        "(bucket_bits + 8) * levels = {node_bits} bits per node, which reaches \
         the {field_bits}-bit field capacity"
    )]
    NodeExceedsField {
        /// `(bucket_bits + 8) * levels`.
        node_bits: u64,
        /// Field bit length.
        field_bits: u64,
    },

    /// A node uses more distinct buckets than the configured level count.
    #[error("node {node} uses {used} bucket levels but the run is configured for {levels}")]
    TooManyLevels {
        /// Label of the offending node.
        node: u64,
        /// Distinct buckets the node actually uses.
        used: usize,
        /// Configured level count.
        levels: u64,
    },
}

/// A value that will not fit its fixed-width slot or the field.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OverflowError {
    /// A fixed-width element exceeds its declared width.
    #[error("{what} {value} does not fit in {bits} bits")]
    WidthExceeded {
        /// What kind of element overflowed.
        what: String,
        /// Decimal rendering of the value.
        value: String,
        /// The declared width.
        bits: u64,
    },

    /// A packed field element reached the modulus.
    #[error("packed field element {value} is not below the field modulus")]
    FieldExceeded {
        /// Decimal rendering of the packed value.
        value: String,
    },
}

/// Union of the pure-transform failure modes.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Configuration rejected by the planner or packer.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Value outside its declared width or the field.
    #[error(transparent)]
    Overflow(#[from] OverflowError),
}
