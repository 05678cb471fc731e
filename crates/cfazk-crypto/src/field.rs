//! BN254 scalar field elements.
//!
//! [`Fr`] is an integer in `[0, p)` with `p` the 254-bit BN254 scalar
//! modulus. Arithmetic always reduces; the checked constructors reject
//! out-of-range inputs instead of reducing them, because a silently wrapped
//! witness value would still hash to a self-consistent digest while no longer
//! matching the committed data.

use crate::CryptoError;
use num_bigint::BigUint;
use num_traits::Zero;
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub};
use std::sync::OnceLock;

/// Decimal digits of the BN254 scalar modulus.
const MODULUS_DEC: &str =
    "21888242871839275222246405745257275088548364400416034343698204186575808495617";

static MODULUS: OnceLock<BigUint> = OnceLock::new();

/// The field modulus `p`.
pub fn modulus() -> &'static BigUint {
    MODULUS.get_or_init(|| {
        // The literal is a compile-time constant; parsing cannot fail.
        #[allow(clippy::expect_used)]
        BigUint::parse_bytes(MODULUS_DEC.as_bytes(), 10).expect("BN254 modulus literal")
    })
}

/// A canonical element of the BN254 scalar field.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fr(BigUint);

impl Fr {
    /// Additive identity.
    #[inline]
    #[must_use]
    pub fn zero() -> Self {
        Self(BigUint::zero())
    }

    /// Multiplicative identity.
    #[inline]
    #[must_use]
    pub fn one() -> Self {
        Self(BigUint::from(1u8))
    }

    /// Lift a machine word into the field (always canonical: `p > 2^64`).
    #[inline]
    #[must_use]
    pub fn from_u64(x: u64) -> Self {
        Self(BigUint::from(x))
    }

    /// Checked conversion from an arbitrary big integer.
    ///
    /// # Errors
    /// `ValueOutOfRange` when `v >= p`. Never reduces.
    pub fn try_from_biguint(v: BigUint) -> Result<Self, CryptoError> {
        if v < *modulus() {
            Ok(Self(v))
        } else {
            Err(CryptoError::ValueOutOfRange {
                value: v.to_string(),
                modulus_bits: Self::modulus_bits(),
            })
        }
    }

    /// Parse a decimal string into a canonical field element.
    ///
    /// # Errors
    /// Non-decimal input or a value `>= p`.
    pub fn from_dec_str(s: &str) -> Result<Self, CryptoError> {
        let v = BigUint::parse_bytes(s.trim().as_bytes(), 10).ok_or_else(|| {
            CryptoError::ValueOutOfRange {
                value: s.trim().to_owned(),
                modulus_bits: Self::modulus_bits(),
            }
        })?;
        Self::try_from_biguint(v)
    }

    /// Bit length of the modulus (254 for BN254).
    #[inline]
    #[must_use]
    pub fn modulus_bits() -> u64 {
        modulus().bits()
    }

    /// Borrow the canonical representative.
    #[inline]
    #[must_use]
    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    /// `x^5`, the Poseidon S-box exponent.
    #[must_use]
    pub fn pow5(&self) -> Self {
        let p = modulus();
        let x2 = &self.0 * &self.0 % p;
        let x4 = &x2 * &x2 % p;
        Self(x4 * &self.0 % p)
    }

    /// Whether this is the additive identity.
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl Add<&Fr> for &Fr {
    type Output = Fr;

    #[inline]
    fn add(self, rhs: &Fr) -> Fr {
        let mut s = &self.0 + &rhs.0;
        if s >= *modulus() {
            s -= modulus();
        }
        Fr(s)
    }
}

impl Add for Fr {
    type Output = Fr;

    #[inline]
    fn add(self, rhs: Fr) -> Fr {
        &self + &rhs
    }
}

impl AddAssign<&Fr> for Fr {
    #[inline]
    fn add_assign(&mut self, rhs: &Fr) {
        self.0 += &rhs.0;
        if self.0 >= *modulus() {
            self.0 -= modulus();
        }
    }
}

impl Sub<&Fr> for &Fr {
    type Output = Fr;

    #[inline]
    fn sub(self, rhs: &Fr) -> Fr {
        if self.0 >= rhs.0 {
            Fr(&self.0 - &rhs.0)
        } else {
            Fr(&self.0 + modulus() - &rhs.0)
        }
    }
}

impl Sub for Fr {
    type Output = Fr;

    #[inline]
    fn sub(self, rhs: Fr) -> Fr {
        &self - &rhs
    }
}

impl Mul<&Fr> for &Fr {
    type Output = Fr;

    #[inline]
    fn mul(self, rhs: &Fr) -> Fr {
        Fr(&self.0 * &rhs.0 % modulus())
    }
}

impl Mul for Fr {
    type Output = Fr;

    #[inline]
    fn mul(self, rhs: Fr) -> Fr {
        &self * &rhs
    }
}

/// Decimal rendering, matching the plain-text circuit input files.
impl fmt::Display for Fr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
