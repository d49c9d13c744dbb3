//! A pure-Rust implementation of group operations on secp256k1.

pub(crate) mod affine;
pub(crate) mod field;
pub(crate) mod mul;
pub(crate) mod projective;
pub(crate) mod scalar;
pub mod uint;

mod util;

pub use affine::AffinePoint;
pub use field::{FieldElement, MODULUS as FIELD_MODULUS};
pub use projective::ProjectivePoint;
pub use scalar::{FRAC_MODULUS_2 as HALF_ORDER, MODULUS as ORDER, Scalar};
pub use uint::{U256, mod_add, mod_inverse, mod_mul, mod_sub};

use crate::{Error, Result};
use subtle::Choice;

/// Curve coefficient `b` in `y² = x³ + b`.
pub(crate) const CURVE_EQUATION_B: FieldElement = FieldElement::from_u64(7);

/// `3·b`, used by the complete projective formulas.
pub(crate) const CURVE_EQUATION_B3: FieldElement = FieldElement::from_u64(21);

/// Adds two affine points, handling the identity, inverse and doubling cases.
pub fn point_add(p: &AffinePoint, q: &AffinePoint) -> AffinePoint {
    *p + q
}

/// Computes `k·P` over all 256 bits of `k`. No reduction of `k` modulo n is performed.
pub fn scalar_mul(k: &U256, p: &AffinePoint) -> AffinePoint {
    mul::mul_windowed(&ProjectivePoint::from(p), k).to_affine()
}

/// Computes `a·P + b·Q`.
pub fn lincomb(p: &AffinePoint, a: &U256, q: &AffinePoint, b: &U256) -> AffinePoint {
    mul::lincomb(&ProjectivePoint::from(p), a, &ProjectivePoint::from(q), b).to_affine()
}

/// Recovers the point with x-coordinate `x` whose y-coordinate has the requested parity.
pub fn decompress_point(x: &U256, parity_is_even: bool) -> Result<AffinePoint> {
    Option::<AffinePoint>::from(AffinePoint::decompress(x, Choice::from(!parity_is_even as u8)))
        .ok_or(Error::InvalidPoint)
}

/// Computes `(k mod n)·G`.
pub fn public_key_from_private(k: &U256) -> Result<AffinePoint> {
    let k = Scalar::from_uint_reduced(k);
    if bool::from(k.is_zero()) {
        return Err(Error::InvalidPrivateKey);
    }
    Ok((ProjectivePoint::GENERATOR * &k).to_affine())
}
