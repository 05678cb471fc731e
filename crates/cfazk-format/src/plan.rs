//! Bit-width planner.
//!
//! Everything downstream packs fixed-width integers, so the widths are sized
//! once per run from the input data and then threaded through every stage as
//! part of the immutable plan:
//!
//! - `label_bits`  = bitlen(N), N the padded adjacency size (label N is the
//!   empty-destination sentinel);
//! - `bucket_bits` = bitlen(N / 8);
//! - `addr_bits`   = bitlen(max raw address in the raw adjacency list);
//! - `levels`      = max distinct buckets any node's neighbors occupy.
//!
//! Caller overrides may only widen. The hard capacity constraint
//! `(bucket_bits + 8) * levels < field bits` is checked here, before any
//! encoding happens.

use crate::encode::levels_required;
use crate::error::ConfigError;
use cfazk_crypto::Fr;
use cfazk_trace::AdjacencyList;

/// Bits of a bucket's 8-way occupancy bitmask.
pub const MASK_BITS: u64 = 8;

/// Bits of the jumpkind tag in a serialized transition.
pub const JUMPKIND_BITS: u64 = 2;

/// Bit length of `x`, with `bitlen(0) = 1` (a zero still occupies one digit
/// in the fixed-width layouts).
#[inline]
#[must_use]
pub fn bit_length(x: u64) -> u64 {
    if x == 0 {
        1
    } else {
        u64::from(u64::BITS - x.leading_zeros())
    }
}

/// Optional caller overrides for the planned widths.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WidthOverrides {
    /// Override for the adjacency level count.
    pub levels: Option<u64>,
    /// Override for the node-label width.
    pub label_bits: Option<u64>,
    /// Override for the bucket-index width.
    pub bucket_bits: Option<u64>,
    /// Override for the raw-address width.
    pub addr_bits: Option<u64>,
}

/// The resolved fixed widths for one formatting run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunPlan {
    /// Adjacency bucket/bitmask levels per node.
    pub levels: u64,
    /// Node label width (sizes the circuit's label wires; no artifact in
    /// this tool packs at this width).
    pub label_bits: u64,
    /// Bucket index width.
    pub bucket_bits: u64,
    /// Raw address width.
    pub addr_bits: u64,
}

impl RunPlan {
    /// Compute the minimum widths for this adjacency list and address space.
    #[must_use]
    pub fn minima(adj: &AdjacencyList, max_raw_addr: u64) -> Self {
        let n = adj.len() as u64;
        Self {
            levels: levels_required(adj),
            label_bits: bit_length(n),
            bucket_bits: bit_length(n / 8),
            addr_bits: bit_length(max_raw_addr),
        }
    }

    /// Resolve a plan: minima widened by `overrides`, then capacity-checked.
    ///
    /// # Errors
    /// [`ConfigError::BelowMinimum`] naming the violated flag, or
    /// [`ConfigError::NodeExceedsField`] when the per-node representation
    /// cannot fit one field element.
    pub fn derive(
        adj: &AdjacencyList,
        max_raw_addr: u64,
        overrides: &WidthOverrides,
    ) -> Result<Self, ConfigError> {
        let min = Self::minima(adj, max_raw_addr);
        let plan = Self {
            levels: apply_override("adjlist-levels", min.levels, overrides.levels)?,
            label_bits: apply_override("label-bitwidth", min.label_bits, overrides.label_bits)?,
            bucket_bits: apply_override("bucket-bitwidth", min.bucket_bits, overrides.bucket_bits)?,
            addr_bits: apply_override("address-bitwidth", min.addr_bits, overrides.addr_bits)?,
        };

        let field_bits = Fr::modulus_bits();
        let node_bits = plan.node_bits();
        if node_bits >= field_bits {
            return Err(ConfigError::NodeExceedsField { node_bits, field_bits });
        }
        Ok(plan)
    }

    /// Packed width of one node's encoded neighbor set.
    #[inline]
    #[must_use]
    pub fn node_bits(&self) -> u64 {
        (self.bucket_bits + MASK_BITS) * self.levels
    }

    /// Packed width of one serialized path transition
    /// (`ret ‖ dst ‖ jumpkind`).
    #[inline]
    #[must_use]
    pub fn transition_bits(&self) -> u64 {
        2 * self.addr_bits + JUMPKIND_BITS
    }
}

fn apply_override(
    name: &'static str,
    min: u64,
    given: Option<u64>,
) -> Result<u64, ConfigError> {
    match given {
        None => Ok(min),
        Some(v) if v >= min => Ok(v),
        Some(v) => Err(ConfigError::BelowMinimum { name, given: v, min }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cfazk_trace::read_numified_adjlist;
    use std::io::Write;
    use std::path::PathBuf;

    fn adjlist(tag: &str, contents: &str, pad: Option<usize>) -> AdjacencyList {
        let path: PathBuf =
            std::env::temp_dir().join(format!("cfazk-plan-{}-{tag}", std::process::id()));
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        read_numified_adjlist(&path, pad).unwrap()
    }

    #[test]
    fn bit_length_edges() {
        assert_eq!(bit_length(0), 1);
        assert_eq!(bit_length(1), 1);
        assert_eq!(bit_length(8), 4);
        assert_eq!(bit_length(u64::MAX), 64);
    }

    #[test]
    fn minima_from_small_graph() {
        let adj = adjlist("minima", "0 1 2\n1\n2 0\n", Some(8));
        let min = RunPlan::minima(&adj, 0x40_0008);
        assert_eq!(min.levels, 1);
        assert_eq!(min.label_bits, 4); // N = 8
        assert_eq!(min.bucket_bits, 1); // N/8 = 1
        assert_eq!(min.addr_bits, 23);
        assert_eq!(min.node_bits(), 9);
        assert_eq!(min.transition_bits(), 48);
    }

    #[test]
    fn overrides_widen_only() {
        let adj = adjlist("overrides", "0 1 2\n1\n2 0\n", Some(8));
        let wider = WidthOverrides { bucket_bits: Some(4), ..WidthOverrides::default() };
        let plan = RunPlan::derive(&adj, 0x40_0008, &wider).unwrap();
        assert_eq!(plan.bucket_bits, 4);

        let narrower = WidthOverrides { addr_bits: Some(16), ..WidthOverrides::default() };
        assert_eq!(
            RunPlan::derive(&adj, 0x40_0008, &narrower).unwrap_err(),
            ConfigError::BelowMinimum { name: "address-bitwidth", given: 16, min: 23 }
        );
    }

    #[test]
    fn field_capacity_is_checked_before_encoding() {
        let adj = adjlist("capacity", "0 1 2\n1\n2 0\n", Some(8));
        // 1 bucket bit + 8 mask bits, 29 levels = 261 bits >= 254.
        let o = WidthOverrides { levels: Some(29), ..WidthOverrides::default() };
        assert!(matches!(
            RunPlan::derive(&adj, 0x40_0008, &o),
            Err(ConfigError::NodeExceedsField { node_bits: 261, .. })
        ));
        // 28 levels = 252 bits still fits.
        let o = WidthOverrides { levels: Some(28), ..WidthOverrides::default() };
        assert!(RunPlan::derive(&adj, 0x40_0008, &o).is_ok());
    }
}
