//! Field arithmetic modulo p = 2^256 - 2^32 - 2^9 - 2^8 - 2^7 - 2^6 - 2^4 - 1

use super::{
    uint::U256,
    util::{adc, mac},
};
use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use crypto_bigint::{Encoding, Limb};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, ConstantTimeLess, CtOption};

/// Field modulus
/// p = FFFFFFFF FFFFFFFF FFFFFFFF FFFFFFFF FFFFFFFF FFFFFFFF FFFFFFFE FFFFFC2F
pub const MODULUS: U256 =
    U256::from_be_hex("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC2F");

/// 2^256 mod p
const R: u64 = 0x1_0000_03D1;

/// An element in the finite field used for curve coordinates.
///
/// Always holds the canonical representative in `[0, p)`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FieldElement(U256);

impl FieldElement {
    /// Zero element.
    pub const ZERO: Self = Self(U256::ZERO);

    /// Multiplicative identity.
    pub const ONE: Self = Self(U256::ONE);

    /// Creates a field element from a small integer.
    pub const fn from_u64(n: u64) -> Self {
        Self(U256::from_u64(n))
    }

    /// Parses big-endian bytes without checking the result is below the modulus.
    pub(crate) const fn from_bytes_unchecked(bytes: &[u8; 32]) -> Self {
        Self(U256::from_be_slice(bytes))
    }

    /// Attempts to parse the given byte array as an SEC1-encoded field element.
    ///
    /// Returns None if the byte array does not contain a big-endian integer in the range
    /// [0, p).
    pub fn from_bytes(bytes: &[u8; 32]) -> CtOption<Self> {
        Self::from_uint(&U256::from_be_bytes(*bytes))
    }

    /// Returns `x` as a field element if `x < p`.
    pub fn from_uint(x: &U256) -> CtOption<Self> {
        CtOption::new(Self(*x), x.ct_lt(&MODULUS))
    }

    /// Returns the SEC1 encoding of this field element.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_be_bytes()
    }

    /// Returns the canonical integer representative.
    pub const fn to_uint(&self) -> U256 {
        self.0
    }

    /// Is this element zero?
    pub fn is_zero(&self) -> Choice {
        self.0.ct_eq(&U256::ZERO)
    }

    /// Is this element odd in the SEC1 sense: `self mod 2 == 1`?
    pub fn is_odd(&self) -> Choice {
        Choice::from((self.0.as_words()[0] & 1) as u8)
    }

    /// Returns `2 * self`.
    pub fn double(&self) -> Self {
        *self + self
    }

    /// Returns `self * self`.
    pub fn square(&self) -> Self {
        *self * self
    }

    /// Raises the element to the power `2^k`.
    fn pow2k(&self, k: usize) -> Self {
        let mut x = *self;
        for _ in 0..k {
            x = x.square();
        }
        x
    }

    /// Returns the multiplicative inverse of self, if self is non-zero.
    pub fn invert(&self) -> CtOption<Self> {
        // The binary representation of (p - 2) has 5 blocks of 1s, with lengths in
        // { 1, 2, 22, 223 }. Use an addition chain to calculate 2^n - 1 for each block:
        // [1], [2], 3, 6, 9, 11, [22], 44, 88, 176, 220, [223]
        let x2 = self.pow2k(1) * self;
        let x3 = x2.pow2k(1) * self;
        let x6 = x3.pow2k(3) * &x3;
        let x9 = x6.pow2k(3) * &x3;
        let x11 = x9.pow2k(2) * &x2;
        let x22 = x11.pow2k(11) * &x11;
        let x44 = x22.pow2k(22) * &x22;
        let x88 = x44.pow2k(44) * &x44;
        let x176 = x88.pow2k(88) * &x88;
        let x220 = x176.pow2k(44) * &x44;
        let x223 = x220.pow2k(3) * &x3;

        // The final result is then assembled using a sliding window over the blocks.
        let res = ((((x223.pow2k(23) * &x22).pow2k(5) * self).pow2k(3) * &x2).pow2k(2)) * self;

        CtOption::new(res, !self.is_zero())
    }

    /// Returns the square root of self mod p, or `None` if no square root exists.
    pub fn sqrt(&self) -> CtOption<Self> {
        // p ≡ 3 (mod 4), so a square root of `a` is `a^((p+1)/4)` when one exists.
        // The binary representation of (p + 1)/4 has 3 blocks of 1s, with lengths in
        // { 2, 22, 223 }. Use an addition chain to calculate 2^n - 1 for each block:
        // 1, [2], 3, 6, 9, 11, [22], 44, 88, 176, 220, [223]
        let x2 = self.pow2k(1) * self;
        let x3 = x2.pow2k(1) * self;
        let x6 = x3.pow2k(3) * &x3;
        let x9 = x6.pow2k(3) * &x3;
        let x11 = x9.pow2k(2) * &x2;
        let x22 = x11.pow2k(11) * &x11;
        let x44 = x22.pow2k(22) * &x22;
        let x88 = x44.pow2k(44) * &x44;
        let x176 = x88.pow2k(88) * &x88;
        let x220 = x176.pow2k(44) * &x44;
        let x223 = x220.pow2k(3) * &x3;

        let res = ((x223.pow2k(23) * &x22).pow2k(6) * &x2).pow2k(2);

        // Only one of `a` and `-a` has a root; check the candidate.
        let is_root = res.square().ct_eq(self);
        CtOption::new(res, is_root)
    }

    /// Reduces `hi·2^256 + lo` using `2^256 ≡ R (mod p)`. Expects 64-bit limbs.
    fn reduce_wide(lo: &U256, hi: &U256) -> Self {
        let (lo, hi) = (lo.as_words(), hi.as_words());

        // lo + hi·R spills into a fifth limb below 2^34
        let (t0, carry) = mac(lo[0], hi[0], R, 0);
        let (t1, carry) = mac(lo[1], hi[1], R, carry);
        let (t2, carry) = mac(lo[2], hi[2], R, carry);
        let (t3, t4) = mac(lo[3], hi[3], R, carry);

        let (t0, carry) = mac(t0, t4, R, 0);
        let (t1, carry) = adc(t1, 0, carry);
        let (t2, carry) = adc(t2, 0, carry);
        let (t3, carry) = adc(t3, 0, carry);

        // A final carry leaves the low limbs small enough that folding it
        // back in cannot overflow again.
        let (t0, c) = mac(t0, carry, R, 0);
        let (t1, c) = adc(t1, 0, c);
        let (t2, c) = adc(t2, 0, c);
        let (t3, _) = adc(t3, 0, c);

        let t = U256::from_words([t0, t1, t2, t3]);
        let (diff, borrow) = t.sbb(&MODULUS, Limb::ZERO);
        Self(U256::conditional_select(&diff, &t, Choice::from((borrow.0 & 1) as u8)))
    }
}

impl ConditionallySelectable for FieldElement {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self(U256::conditional_select(&a.0, &b.0, choice))
    }
}

impl ConstantTimeEq for FieldElement {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0.ct_eq(&other.0)
    }
}

impl Add<&FieldElement> for FieldElement {
    type Output = FieldElement;

    fn add(self, other: &FieldElement) -> FieldElement {
        FieldElement(self.0.add_mod(&other.0, &MODULUS))
    }
}

impl Add<FieldElement> for FieldElement {
    type Output = FieldElement;

    fn add(self, other: FieldElement) -> FieldElement {
        self + &other
    }
}

impl AddAssign<FieldElement> for FieldElement {
    fn add_assign(&mut self, rhs: FieldElement) {
        *self = *self + &rhs;
    }
}

impl Sub<&FieldElement> for FieldElement {
    type Output = FieldElement;

    fn sub(self, other: &FieldElement) -> FieldElement {
        FieldElement(self.0.sub_mod(&other.0, &MODULUS))
    }
}

impl Sub<FieldElement> for FieldElement {
    type Output = FieldElement;

    fn sub(self, other: FieldElement) -> FieldElement {
        self - &other
    }
}

impl SubAssign<FieldElement> for FieldElement {
    fn sub_assign(&mut self, rhs: FieldElement) {
        *self = *self - &rhs;
    }
}

impl Mul<&FieldElement> for FieldElement {
    type Output = FieldElement;

    fn mul(self, other: &FieldElement) -> FieldElement {
        let (lo, hi) = self.0.split_mul(&other.0);
        FieldElement::reduce_wide(&lo, &hi)
    }
}

impl Mul<FieldElement> for FieldElement {
    type Output = FieldElement;

    fn mul(self, other: FieldElement) -> FieldElement {
        self * &other
    }
}

impl MulAssign<FieldElement> for FieldElement {
    fn mul_assign(&mut self, rhs: FieldElement) {
        *self = *self * &rhs;
    }
}

impl Neg for FieldElement {
    type Output = FieldElement;

    fn neg(self) -> FieldElement {
        FieldElement::ZERO - &self
    }
}
