//! 256-bit unsigned integers and modular arithmetic with an explicit modulus.
//!
//! The integer type is [`crypto_bigint::U256`]. This module adds the
//! variable-length big-endian codecs used by the wire formats and modular
//! operations over a caller-supplied modulus.

use crate::{Error, Result};
use alloc::{vec, vec::Vec};
use crypto_bigint::{Encoding, NonZero};
use subtle::CtOption;

pub use crypto_bigint::U256;

/// Interpret up to 32 bytes as a big-endian unsigned integer, left-padding
/// shorter input with zeros.
pub fn from_be_slice_padded(bytes: &[u8]) -> Result<U256> {
    if bytes.len() > U256::BYTES {
        return Err(Error::InvalidEncoding);
    }

    let mut buf = [0u8; 32];
    buf[U256::BYTES - bytes.len()..].copy_from_slice(bytes);
    Ok(U256::from_be_bytes(buf))
}

/// Serialize big-endian, left-padded with zero bytes to `width`.
///
/// Fails if the value needs more than `width` bytes.
pub fn to_be_bytes_padded(x: &U256, width: usize) -> Result<Vec<u8>> {
    let len = byte_length(x);
    if len > width {
        return Err(Error::InvalidEncoding);
    }

    let mut out = vec![0u8; width];
    out[width - len..].copy_from_slice(&x.to_be_bytes()[U256::BYTES - len..]);
    Ok(out)
}

/// Number of significant bits. Zero has a bit length of zero.
pub fn bit_length(x: &U256) -> usize {
    x.bits() as usize
}

/// Number of significant bytes, `ceil(bit_length / 8)`.
pub fn byte_length(x: &U256) -> usize {
    bit_length(x).div_ceil(8)
}

/// Computes `a + b mod m`.
pub fn mod_add(a: &U256, b: &U256, m: &NonZero<U256>) -> U256 {
    a.rem(m).add_mod(&b.rem(m), m)
}

/// Computes `a - b mod m`.
pub fn mod_sub(a: &U256, b: &U256, m: &NonZero<U256>) -> U256 {
    a.rem(m).sub_mod(&b.rem(m), m)
}

/// Computes `a · b mod m` from the full 512-bit product.
pub fn mod_mul(a: &U256, b: &U256, m: &NonZero<U256>) -> U256 {
    U256::rem_wide_vartime(a.split_mul(b), m)
}

/// Computes `x` such that `a · x ≡ 1 (mod m)`.
///
/// Fails with [`Error::NoInverse`] if `m` is zero or `gcd(a, m) ≠ 1`.
pub fn mod_inverse(a: &U256, m: &U256) -> Result<U256> {
    let m = Option::<NonZero<U256>>::from(NonZero::new(*m)).ok_or(Error::NoInverse)?;
    let inverse = CtOption::<U256>::from(a.rem(&m).inv_mod(&m));
    Option::<U256>::from(inverse).ok_or(Error::NoInverse)
}

#[cfg(test)]
mod tests {
    use super::{
        U256, bit_length, byte_length, from_be_slice_padded, mod_add, mod_inverse, mod_mul,
        mod_sub, to_be_bytes_padded,
    };
    use crate::{
        Error,
        arithmetic::util::{biguint_to_bytes, bytes_to_biguint},
    };
    use crypto_bigint::{Encoding, NonZero};
    use num_bigint::BigUint;
    use num_traits::{One, Zero};
    use proptest::prelude::*;

    const P: U256 =
        U256::from_be_hex("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC2F");

    fn to_biguint(x: &U256) -> BigUint {
        bytes_to_biguint(&x.to_be_bytes())
    }

    fn from_biguint(x: &BigUint) -> U256 {
        U256::from_be_bytes(biguint_to_bytes(x))
    }

    fn small(n: u64) -> NonZero<U256> {
        NonZero::new(U256::from_u64(n)).unwrap()
    }

    #[test]
    fn from_be_slice_pads_left() {
        assert_eq!(from_be_slice_padded(&[]).unwrap(), U256::ZERO);
        assert_eq!(from_be_slice_padded(&[1, 0]).unwrap(), U256::from_u64(256));
        assert_eq!(from_be_slice_padded(&[0u8; 33]), Err(Error::InvalidEncoding));

        let bytes = [0xabu8; 32];
        assert_eq!(from_be_slice_padded(&bytes).unwrap(), U256::from_be_bytes(bytes));
    }

    #[test]
    fn padded_serialization() {
        let x = U256::from_u64(0x0102);
        assert_eq!(to_be_bytes_padded(&x, 4).unwrap(), [0, 0, 1, 2]);
        assert_eq!(to_be_bytes_padded(&x, 2).unwrap(), [1, 2]);
        assert_eq!(to_be_bytes_padded(&x, 1), Err(Error::InvalidEncoding));
        assert!(to_be_bytes_padded(&U256::ZERO, 0).unwrap().is_empty());
    }

    #[test]
    fn bit_and_byte_length() {
        assert_eq!(bit_length(&U256::ZERO), 0);
        assert_eq!(byte_length(&U256::ZERO), 0);
        assert_eq!(bit_length(&U256::ONE), 1);
        assert_eq!(bit_length(&U256::from_u64(0x100)), 9);
        assert_eq!(byte_length(&U256::from_u64(0x100)), 2);
        assert_eq!(bit_length(&U256::MAX), 256);
        assert_eq!(byte_length(&P), 32);
    }

    #[test]
    fn inverse_edge_cases() {
        assert_eq!(mod_inverse(&U256::ZERO, &P), Err(Error::NoInverse));
        assert_eq!(mod_inverse(&P, &P), Err(Error::NoInverse));
        assert_eq!(mod_inverse(&U256::ONE, &U256::ZERO), Err(Error::NoInverse));
        assert_eq!(
            mod_inverse(&U256::from_u64(6), &U256::from_u64(9)),
            Err(Error::NoInverse)
        );
        assert_eq!(
            mod_inverse(&U256::from_u64(3), &U256::from_u64(11)).unwrap(),
            U256::from_u64(4)
        );
        assert_eq!(mod_inverse(&U256::ONE, &P).unwrap(), U256::ONE);
    }

    #[test]
    fn modular_results_below_modulus() {
        let m = small(97);
        assert_eq!(mod_add(&U256::from_u64(96), &U256::from_u64(5), &m), U256::from_u64(4));
        assert_eq!(mod_add(&U256::from_u64(200), &U256::ZERO, &m), U256::from_u64(6));
        assert_eq!(mod_sub(&U256::ZERO, &U256::ONE, &m), U256::from_u64(96));
        assert_eq!(mod_mul(&U256::from_u64(96), &U256::from_u64(96), &m), U256::ONE);
        assert_eq!(mod_mul(&U256::MAX, &U256::MAX, &small(1)), U256::ZERO);
    }

    prop_compose! {
        fn uint()(bytes in any::<[u8; 32]>()) -> U256 {
            U256::from_be_bytes(bytes)
        }
    }

    prop_compose! {
        fn modulus()(m in uint()) -> NonZero<U256> {
            NonZero::new(if m == U256::ZERO { U256::ONE } else { m }).unwrap()
        }
    }

    proptest! {
        #[test]
        fn fuzzy_mod_add_sub(a in uint(), b in uint(), m in modulus()) {
            let (a_bi, b_bi, m_bi) = (to_biguint(&a), to_biguint(&b), to_biguint(&m));
            prop_assert_eq!(mod_add(&a, &b, &m), from_biguint(&((&a_bi + &b_bi) % &m_bi)));
            let diff = (&a_bi % &m_bi + &m_bi - &b_bi % &m_bi) % &m_bi;
            prop_assert_eq!(mod_sub(&a, &b, &m), from_biguint(&diff));
        }

        #[test]
        fn fuzzy_mod_mul(a in uint(), b in uint(), m in modulus()) {
            let expected = to_biguint(&a) * to_biguint(&b) % to_biguint(&m);
            prop_assert_eq!(mod_mul(&a, &b, &m), from_biguint(&expected));
        }

        #[test]
        fn fuzzy_mod_inverse(a in uint()) {
            let a_bi = to_biguint(&a) % to_biguint(&P);
            prop_assume!(!a_bi.is_zero());
            let inv = mod_inverse(&a, &P).unwrap();
            prop_assert!(inv < P);
            prop_assert!((to_biguint(&inv) * a_bi % to_biguint(&P)).is_one());
        }

        #[test]
        fn fuzzy_bit_length(a in uint()) {
            prop_assert_eq!(bit_length(&a) as u64, to_biguint(&a).bits());
        }
    }
}
