//! Field-element packing, sponge padding, and nonce injection.
//!
//! Equal-width integers are bit-packed `floor(field_bits / elem_bits)` per
//! field element, least-significant element first (element `i` at bit offset
//! `i * elem_bits`). The packed sequence is then right-padded with zeros to
//! the next multiple of the sponge rate, counting a reserved tail of nonce
//! slots, and the tail is overwritten with the caller's nonces — the only
//! hiding mechanism, since the sponge itself is deterministic over public
//! data.

use crate::error::{ConfigError, FormatError, OverflowError};
use cfazk_crypto::{sponge, Fr};
use num_bigint::BigUint;
use num_traits::Zero;

/// Bit-pack `values` (each at most `elem_bits` wide) into field elements.
///
/// # Errors
/// [`ConfigError`] for a zero or field-exceeding element width;
/// [`OverflowError`] for an element wider than `elem_bits` or a packed
/// value reaching the modulus. Values are never truncated.
pub fn pack(values: &[BigUint], elem_bits: u64) -> Result<Vec<Fr>, FormatError> {
    if elem_bits == 0 {
        return Err(ConfigError::ZeroElementWidth.into());
    }
    let field_bits = Fr::modulus_bits();
    if elem_bits >= field_bits {
        return Err(ConfigError::ElementTooWide { elem_bits, field_bits }.into());
    }

    let per = usize::try_from(field_bits / elem_bits).unwrap_or(usize::MAX);
    let mut out = Vec::with_capacity(values.len().div_ceil(per));
    for group in values.chunks(per) {
        let mut acc = BigUint::zero();
        for (i, v) in group.iter().enumerate() {
            if v.bits() > elem_bits {
                return Err(OverflowError::WidthExceeded {
                    what: "packed element".to_owned(),
                    value: v.to_string(),
                    bits: elem_bits,
                }
                .into());
            }
            acc |= v << (i as u64 * elem_bits);
        }
        let fe = Fr::try_from_biguint(acc.clone())
            .map_err(|_| OverflowError::FieldExceeded { value: acc.to_string() })?;
        out.push(fe);
    }
    Ok(out)
}

/// Right-pad with zeros to the next multiple of the sponge rate, keeping
/// `reserved` tail slots for nonces. Already-aligned input (tail included)
/// is left untouched.
#[must_use]
pub fn pad_for_sponge(mut packed: Vec<Fr>, reserved: usize) -> Vec<Fr> {
    let target = (packed.len() + reserved).div_ceil(sponge::RATE) * sponge::RATE;
    packed.resize(target, Fr::zero());
    packed
}

/// Overwrite exactly the reserved tail slots with `nonces`, in order.
/// [`pad_for_sponge`] guarantees the tail exists.
fn inject_nonces(block: &mut [Fr], nonces: &[Fr]) {
    debug_assert!(block.len() >= nonces.len());
    let tail = block.len() - nonces.len();
    for (slot, nonce) in block[tail..].iter_mut().zip(nonces) {
        *slot = nonce.clone();
    }
}

/// Pack, pad, and nonce-inject in one step: the sponge-ready block.
///
/// # Errors
/// Propagates [`pack`] failures.
pub fn pack_for_digest(
    values: &[BigUint],
    elem_bits: u64,
    nonces: &[Fr],
) -> Result<Vec<Fr>, FormatError> {
    let packed = pack(values, elem_bits)?;
    let mut block = pad_for_sponge(packed, nonces.len());
    inject_nonces(&mut block, nonces);
    Ok(block)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vals(xs: &[u64]) -> Vec<BigUint> {
        xs.iter().map(|&x| BigUint::from(x)).collect()
    }

    #[test]
    fn packs_least_significant_first() {
        // 3 elements of 10 bits each inside one field element.
        let packed = pack(&vals(&[1, 2, 3]), 10).unwrap();
        assert_eq!(packed.len(), 1);
        assert_eq!(
            packed[0].as_biguint(),
            &BigUint::from(1u64 | 2 << 10 | 3 << 20)
        );
    }

    #[test]
    fn splits_on_capacity() {
        // 254 / 100 = 2 elements per field element.
        let packed = pack(&vals(&[7, 8, 9]), 100).unwrap();
        assert_eq!(packed.len(), 2);
        assert_eq!(
            packed[0].as_biguint(),
            &(BigUint::from(7u8) | (BigUint::from(8u8) << 100u32))
        );
        assert_eq!(packed[1].as_biguint(), &BigUint::from(9u8));
    }

    #[test]
    fn rejects_bad_widths_and_overflow() {
        assert!(matches!(
            pack(&vals(&[1]), 0),
            Err(FormatError::Config(ConfigError::ZeroElementWidth))
        ));
        assert!(matches!(
            pack(&vals(&[1]), 254),
            Err(FormatError::Config(ConfigError::ElementTooWide { .. }))
        ));
        // 0b1000 needs 4 bits, declared width is 3.
        assert!(matches!(
            pack(&vals(&[8]), 3),
            Err(FormatError::Overflow(OverflowError::WidthExceeded { .. }))
        ));
    }

    #[test]
    fn empty_input_still_reserves_a_nonce_block() {
        let block = pack_for_digest(&[], 10, &[Fr::from_u64(5)]).unwrap();
        assert_eq!(block.len(), sponge::RATE);
        assert_eq!(block[7], Fr::from_u64(5));
        assert!(block[..7].iter().all(Fr::is_zero));
    }

    #[test]
    fn nonce_tail_placement() {
        // 8 one-per-element values + 2 reserved slots pad to 16.
        let values = vals(&[3; 8]);
        let nonces = [Fr::from_u64(41), Fr::from_u64(42)];
        let block = pack_for_digest(&values, 200, &nonces).unwrap();
        assert_eq!(block.len(), 16);
        assert_eq!(block[14], Fr::from_u64(41));
        assert_eq!(block[15], Fr::from_u64(42));
        assert!(block[8..14].iter().all(Fr::is_zero));
    }

    #[test]
    fn nonce_tail_can_fill_a_whole_block() {
        // No packed values at all: the reserved tail is the entire block.
        let nonces: Vec<Fr> = (1..=8).map(Fr::from_u64).collect();
        let block = pack_for_digest(&[], 10, &nonces).unwrap();
        assert_eq!(block, nonces);
    }

    #[test]
    fn aligned_input_with_tail_is_untouched() {
        let packed: Vec<Fr> = (0..7).map(Fr::from_u64).collect();
        let block = pad_for_sponge(packed.clone(), 1);
        assert_eq!(block.len(), 8);
        assert_eq!(block[..7], packed);
    }
}
