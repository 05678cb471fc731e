//! Bucket/bitmask adjacency-list encoding.
//!
//! A node's neighbor set is compressed into levels: for neighbor label `v`,
//! bucket = `v / 8` and bit `v % 8` is set in that bucket's 8-bit mask. Each
//! populated level serializes as `mask ‖ bucket` (mask most significant) and
//! the levels concatenate most-significant-first, in the order buckets are
//! first encountered on the input line — the same ordering the committed
//! circuit layout was produced from, so it must not be normalized. A node
//! with no neighbors serializes to `0`.
//!
//! Unpopulated levels are simply absent; uniform per-node width is enforced
//! later by the packer's fixed element width.

use crate::error::{ConfigError, FormatError, OverflowError};
use crate::plan::{bit_length, RunPlan, MASK_BITS};
use cfazk_trace::AdjacencyList;
use num_bigint::BigUint;
use num_traits::Zero;

/// Encode one neighbor set into `(bucket, mask)` levels, first-encounter
/// order.
#[must_use]
pub fn encode_neighbors(neighbors: &[u64]) -> Vec<(u64, u8)> {
    let mut levels: Vec<(u64, u8)> = Vec::new();
    for &v in neighbors {
        let bucket = v / 8;
        let bit = 1u8 << (v % 8);
        match levels.iter_mut().find(|(b, _)| *b == bucket) {
            Some((_, mask)) => *mask |= bit,
            None => levels.push((bucket, bit)),
        }
    }
    levels
}

/// Maximum number of distinct buckets any node uses (the minimum viable
/// level count for the run).
#[must_use]
pub fn levels_required(adj: &AdjacencyList) -> u64 {
    adj.nodes()
        .iter()
        .map(|n| encode_neighbors(&n.neighbors).len() as u64)
        .max()
        .unwrap_or(0)
}

/// Serialize one node's levels into its packed integer.
///
/// # Errors
/// [`ConfigError::TooManyLevels`] when the node uses more buckets than the
/// plan allows; [`OverflowError`] for a bucket index wider than
/// `bucket_bits`.
pub fn serialize_node(
    node_label: u64,
    levels: &[(u64, u8)],
    plan: &RunPlan,
) -> Result<BigUint, FormatError> {
    if levels.len() as u64 > plan.levels {
        return Err(ConfigError::TooManyLevels {
            node: node_label,
            used: levels.len(),
            levels: plan.levels,
        }
        .into());
    }

    let mut acc = BigUint::zero();
    for &(bucket, mask) in levels {
        if bit_length(bucket) > plan.bucket_bits {
            return Err(OverflowError::WidthExceeded {
                what: format!("node {node_label} bucket index"),
                value: bucket.to_string(),
                bits: plan.bucket_bits,
            }
            .into());
        }
        acc = (acc << (MASK_BITS + plan.bucket_bits))
            | (BigUint::from(mask) << plan.bucket_bits)
            | BigUint::from(bucket);
    }
    Ok(acc)
}

/// Encode and serialize the whole adjacency list, node file order.
///
/// # Errors
/// Propagates [`serialize_node`] failures.
pub fn encode_adjacency(adj: &AdjacencyList, plan: &RunPlan) -> Result<Vec<BigUint>, FormatError> {
    adj.nodes()
        .iter()
        .map(|n| serialize_node(n.label, &encode_neighbors(&n.neighbors), plan))
        .collect()
}

/// Recover the neighbor set from a serialized node value.
///
/// Verification aid for the circuit-compilation collaborator (and the
/// round-trip tests): level order is not preserved — only the set is.
#[must_use]
pub fn decode_node(value: &BigUint, bucket_bits: u64) -> Vec<u64> {
    let level_bits = MASK_BITS + bucket_bits;
    let bucket_mask = (BigUint::from(1u8) << bucket_bits) - 1u8;
    let level_mask = (BigUint::from(1u8) << level_bits) - 1u8;

    let mut neighbors = Vec::new();
    let mut v = value.clone();
    while !v.is_zero() {
        let level = &v & &level_mask;
        let bucket = u64::try_from(&level & &bucket_mask).unwrap_or(u64::MAX);
        let mask = u64::try_from(level >> bucket_bits).unwrap_or(0);
        for bit in 0..8u64 {
            if mask & (1 << bit) != 0 {
                neighbors.push(bucket * 8 + bit);
            }
        }
        v >>= level_bits;
    }
    neighbors.sort_unstable();
    neighbors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(levels: u64, bucket_bits: u64) -> RunPlan {
        RunPlan { levels, label_bits: 4, bucket_bits, addr_bits: 23 }
    }

    #[test]
    fn worked_example_small_graph() {
        // {0: [1,2], 1: [], 2: [0]} padded to N=8, levels=1, bucket_bits=1.
        let p = plan(1, 1);
        let node0 = encode_neighbors(&[1, 2]);
        assert_eq!(node0, vec![(0, 0b0000_0110)]);
        // mask ‖ bucket, mask most significant.
        assert_eq!(serialize_node(0, &node0, &p).unwrap(), BigUint::from(0b0000_0110_0u64));

        assert_eq!(serialize_node(1, &encode_neighbors(&[]), &p).unwrap(), BigUint::zero());
        assert_eq!(
            serialize_node(2, &encode_neighbors(&[0]), &p).unwrap(),
            BigUint::from(0b0000_0001_0u64)
        );
    }

    #[test]
    fn levels_concatenate_first_encounter_first() {
        // Neighbor 9 (bucket 1) seen before neighbor 0 (bucket 0): bucket 1's
        // level is most significant.
        let p = plan(2, 3);
        let levels = encode_neighbors(&[9, 0]);
        assert_eq!(levels, vec![(1, 0b10), (0, 0b1)]);
        let value = serialize_node(0, &levels, &p).unwrap();
        let expect = (BigUint::from(0b10u8) << 3u32 | BigUint::from(1u8)) << 11u32
            | (BigUint::from(0b1u8) << 3u32);
        assert_eq!(value, expect);
    }

    #[test]
    fn too_many_levels_is_a_config_error() {
        let p = plan(1, 3);
        let levels = encode_neighbors(&[0, 9]); // buckets 0 and 1
        assert!(matches!(
            serialize_node(7, &levels, &p),
            Err(FormatError::Config(ConfigError::TooManyLevels { node: 7, used: 2, levels: 1 }))
        ));
    }

    #[test]
    fn oversized_bucket_is_an_overflow_error() {
        let p = plan(1, 1);
        let levels = encode_neighbors(&[40]); // bucket 5, needs 3 bits
        assert!(matches!(
            serialize_node(0, &levels, &p),
            Err(FormatError::Overflow(OverflowError::WidthExceeded { .. }))
        ));
    }

    #[test]
    fn decode_recovers_the_neighbor_set() {
        let p = plan(3, 4);
        let neighbors = [3, 17, 120, 18, 1];
        let value = serialize_node(0, &encode_neighbors(&neighbors), &p).unwrap();
        let mut expect = neighbors.to_vec();
        expect.sort_unstable();
        assert_eq!(decode_node(&value, p.bucket_bits), expect);
    }
}
