//! Scalar field arithmetic modulo n, the order of the secp256k1 group.

use super::uint::U256;
use core::ops::{Add, Mul, Neg, Sub};
use crypto_bigint::{Encoding, Limb, NonZero};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, ConstantTimeLess, CtOption};
use zeroize::Zeroize;

/// Constant representing the modulus
/// n = FFFFFFFF FFFFFFFF FFFFFFFF FFFFFFFE BAAEDCE6 AF48A03B BFD25E8C D0364141
pub const MODULUS: U256 =
    U256::from_be_hex("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141");

/// Constant representing the modulus / 2, rounded down
pub const FRAC_MODULUS_2: U256 =
    U256::from_be_hex("7FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF5D576E7357A4501DDFE92F46681B20A0");

/// The modulus as a divisor for wide reduction.
const NZ_MODULUS: NonZero<U256> = NonZero::<U256>::new_unwrap(MODULUS);

/// Bit length of the group order.
pub const ORDER_BITS: usize = 256;

/// An element in the finite field modulo n.
///
/// Always holds the canonical representative in `[0, n)`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Scalar(U256);

impl Scalar {
    /// Zero scalar.
    pub const ZERO: Self = Self(U256::ZERO);

    /// Multiplicative identity.
    pub const ONE: Self = Self(U256::ONE);

    /// Attempts to parse the given byte array as an SEC1-encoded scalar.
    ///
    /// Returns None if the byte array does not contain a big-endian integer in the range
    /// [0, n).
    pub fn from_bytes(bytes: &[u8; 32]) -> CtOption<Self> {
        Self::from_uint(&U256::from_be_bytes(*bytes))
    }

    /// Returns `x` as a scalar if `x < n`.
    pub fn from_uint(x: &U256) -> CtOption<Self> {
        CtOption::new(Self(*x), x.ct_lt(&MODULUS))
    }

    /// Reduces an arbitrary 256-bit integer modulo n.
    pub fn from_uint_reduced(x: &U256) -> Self {
        // 2^256 < 2n, so at most one subtraction is needed
        let (diff, borrow) = x.sbb(&MODULUS, Limb::ZERO);
        Self(U256::conditional_select(&diff, x, Choice::from((borrow.0 & 1) as u8)))
    }

    /// Parses big-endian bytes, reducing the value modulo n.
    pub fn from_bytes_reduced(bytes: &[u8; 32]) -> Self {
        Self::from_uint_reduced(&U256::from_be_bytes(*bytes))
    }

    /// Returns the SEC1 encoding of this scalar.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_be_bytes()
    }

    /// Returns the canonical integer representative.
    pub const fn to_uint(&self) -> U256 {
        self.0
    }

    /// Is this scalar equal to zero?
    pub fn is_zero(&self) -> Choice {
        self.0.ct_eq(&U256::ZERO)
    }

    /// Is this scalar greater than n / 2?
    pub fn is_high(&self) -> Choice {
        FRAC_MODULUS_2.ct_lt(&self.0)
    }

    /// Raises the scalar to the power `exp`, processing all 256 exponent bits.
    pub fn pow(&self, exp: &U256) -> Self {
        let mut acc = Self::ONE;
        for byte in exp.to_be_bytes() {
            for i in (0..8).rev() {
                acc = acc * &acc;
                let product = acc * self;
                acc = Self::conditional_select(&acc, &product, Choice::from((byte >> i) & 1));
            }
        }
        acc
    }

    /// Returns the multiplicative inverse, computed as `self^(n - 2)`.
    pub fn invert(&self) -> CtOption<Self> {
        let exp = MODULUS.wrapping_sub(&U256::from_u64(2));
        CtOption::new(self.pow(&exp), !self.is_zero())
    }
}

impl From<u64> for Scalar {
    fn from(k: u64) -> Self {
        Scalar(U256::from_u64(k))
    }
}

impl ConditionallySelectable for Scalar {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self(U256::conditional_select(&a.0, &b.0, choice))
    }
}

impl ConstantTimeEq for Scalar {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0.ct_eq(&other.0)
    }
}

impl Add<&Scalar> for Scalar {
    type Output = Scalar;

    fn add(self, other: &Scalar) -> Scalar {
        Scalar(self.0.add_mod(&other.0, &MODULUS))
    }
}

impl Add<Scalar> for Scalar {
    type Output = Scalar;

    fn add(self, other: Scalar) -> Scalar {
        self + &other
    }
}

impl Sub<&Scalar> for Scalar {
    type Output = Scalar;

    fn sub(self, other: &Scalar) -> Scalar {
        Scalar(self.0.sub_mod(&other.0, &MODULUS))
    }
}

impl Sub<Scalar> for Scalar {
    type Output = Scalar;

    fn sub(self, other: Scalar) -> Scalar {
        self - &other
    }
}

impl Mul<&Scalar> for Scalar {
    type Output = Scalar;

    fn mul(self, other: &Scalar) -> Scalar {
        Scalar(U256::rem_wide_vartime(self.0.split_mul(&other.0), &NZ_MODULUS))
    }
}

impl Mul<Scalar> for Scalar {
    type Output = Scalar;

    fn mul(self, other: Scalar) -> Scalar {
        self * &other
    }
}

impl Neg for Scalar {
    type Output = Scalar;

    fn neg(self) -> Scalar {
        Scalar::ZERO - &self
    }
}

impl Zeroize for Scalar {
    fn zeroize(&mut self) {
        self.0.zeroize()
    }
}
