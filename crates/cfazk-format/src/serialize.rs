//! Fixed-width serializers for path transitions and the translator.
//!
//! A transition packs as `ret ‖ dst ‖ jumpkind` with the 2-bit jumpkind in
//! the low bits — the inverse of the human-readable order. This matches the
//! bit layout the downstream circuit decomposes, so it is verified via
//! digest equality against the committed tables, never reordered to read
//! nicely. Non-call transitions always serialize a zero return field.

use crate::error::{FormatError, OverflowError};
use crate::plan::{bit_length, RunPlan, JUMPKIND_BITS};
use cfazk_trace::{ExecutionPath, JumpKind, Transition, Translator};
use num_bigint::BigUint;

/// Serialize one transition at the plan's address width.
///
/// # Errors
/// [`OverflowError::WidthExceeded`] when a destination or return address
/// does not fit `addr_bits`.
pub fn serialize_transition(t: &Transition, addr_bits: u64) -> Result<BigUint, FormatError> {
    let ret = if t.kind == JumpKind::Call { t.ret } else { 0 };
    for (what, value) in [("destination address", t.dst), ("return address", ret)] {
        if bit_length(value) > addr_bits {
            return Err(OverflowError::WidthExceeded {
                what: what.to_owned(),
                value: value.to_string(),
                bits: addr_bits,
            }
            .into());
        }
    }
    Ok(((BigUint::from(ret) << addr_bits | BigUint::from(t.dst)) << JUMPKIND_BITS)
        | BigUint::from(t.kind.code()))
}

/// Serialize the whole recorded path, transition order preserved.
///
/// # Errors
/// Propagates [`serialize_transition`] failures.
pub fn serialize_path(path: &ExecutionPath, plan: &RunPlan) -> Result<Vec<BigUint>, FormatError> {
    path.transitions()
        .iter()
        .map(|t| serialize_transition(t, plan.addr_bits))
        .collect()
}

/// Serialize the translator as a flat address sequence at `addr_bits`.
///
/// The trailing zero sentinel is already part of the translator's entries.
///
/// # Errors
/// [`OverflowError::WidthExceeded`] when an address does not fit.
pub fn serialize_translator(tr: &Translator, plan: &RunPlan) -> Result<Vec<BigUint>, FormatError> {
    tr.entries()
        .iter()
        .map(|&addr| {
            if bit_length(addr) > plan.addr_bits {
                return Err(OverflowError::WidthExceeded {
                    what: "translator address".to_owned(),
                    value: addr.to_string(),
                    bits: plan.addr_bits,
                }
                .into());
            }
            Ok(BigUint::from(addr))
        })
        .collect()
}
