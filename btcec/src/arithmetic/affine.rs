//! Affine points

use super::{CURVE_EQUATION_B, FieldElement, ProjectivePoint, uint::U256};
use core::ops::{Add, Neg};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};

/// secp256k1 curve point expressed in affine coordinates.
#[derive(Clone, Copy, Debug)]
pub struct AffinePoint {
    /// x-coordinate
    pub(crate) x: FieldElement,

    /// y-coordinate
    pub(crate) y: FieldElement,

    /// Is this point the point at infinity? 0 = no, 1 = yes
    ///
    /// This is a proxy for [`Choice`], but uses `u8` instead to permit `const`
    /// constructors for `IDENTITY` and `GENERATOR`.
    pub(crate) infinity: u8,
}

impl AffinePoint {
    /// Additive identity of the group: the point at infinity.
    pub const IDENTITY: Self = Self {
        x: FieldElement::ZERO,
        y: FieldElement::ZERO,
        infinity: 1,
    };

    /// Base point of secp256k1.
    ///
    /// ```text
    /// Gₓ = 79be667e f9dcbbac 55a06295 ce870b07 029bfcdb 2dce28d9 59f2815b 16f81798
    /// Gᵧ = 483ada77 26a3c465 5da4fbfc 0e1108a8 fd17b448 a6855419 9c47d08f fb10d4b8
    /// ```
    pub const GENERATOR: Self = Self {
        x: FieldElement::from_bytes_unchecked(&[
            0x79, 0xbe, 0x66, 0x7e, 0xf9, 0xdc, 0xbb, 0xac, 0x55, 0xa0, 0x62, 0x95, 0xce, 0x87,
            0x0b, 0x07, 0x02, 0x9b, 0xfc, 0xdb, 0x2d, 0xce, 0x28, 0xd9, 0x59, 0xf2, 0x81, 0x5b,
            0x16, 0xf8, 0x17, 0x98,
        ]),
        y: FieldElement::from_bytes_unchecked(&[
            0x48, 0x3a, 0xda, 0x77, 0x26, 0xa3, 0xc4, 0x65, 0x5d, 0xa4, 0xfb, 0xfc, 0x0e, 0x11,
            0x08, 0xa8, 0xfd, 0x17, 0xb4, 0x48, 0xa6, 0x85, 0x54, 0x19, 0x9c, 0x47, 0xd0, 0x8f,
            0xfb, 0x10, 0xd4, 0xb8,
        ]),
        infinity: 0,
    };

    /// Create a new [`AffinePoint`] with the given coordinates.
    pub(crate) const fn new(x: FieldElement, y: FieldElement) -> Self {
        Self { x, y, infinity: 0 }
    }

    /// Create a point from coordinates, checking the curve equation.
    pub fn from_coordinates(x: FieldElement, y: FieldElement) -> CtOption<Self> {
        let point = Self::new(x, y);
        CtOption::new(point, point.is_on_curve())
    }

    /// The x-coordinate. Zero for the identity.
    pub fn x(&self) -> FieldElement {
        self.x
    }

    /// The y-coordinate. Zero for the identity.
    pub fn y(&self) -> FieldElement {
        self.y
    }

    /// Is this point the identity point?
    pub fn is_identity(&self) -> Choice {
        Choice::from(self.infinity)
    }

    /// Does this point satisfy `y² = x³ + 7`? The identity is considered on the curve.
    pub fn is_on_curve(&self) -> Choice {
        let lhs = self.y.square();
        let rhs = self.x.square() * &self.x + &CURVE_EQUATION_B;
        lhs.ct_eq(&rhs) | self.is_identity()
    }

    /// Solves the curve equation for `y` given `x`, picking the root whose
    /// parity matches `y_is_odd`.
    ///
    /// Returns `None` if `x ≥ p` or `x³ + 7` is not a square modulo p.
    pub fn decompress(x: &U256, y_is_odd: Choice) -> CtOption<Self> {
        FieldElement::from_uint(x).and_then(|x| {
            let alpha = x.square() * &x + &CURVE_EQUATION_B;
            alpha.sqrt().map(|beta| {
                // beta.is_odd() == y_is_odd
                let y = FieldElement::conditional_select(&-beta, &beta, !(beta.is_odd() ^ y_is_odd));
                Self::new(x, y)
            })
        })
    }

    /// Returns `2 * self` using the affine tangent formula.
    ///
    /// Not constant-time: intended for public points.
    pub fn double(&self) -> Self {
        if bool::from(self.is_identity() | self.y.is_zero()) {
            return Self::IDENTITY;
        }

        // λ = 3x² / 2y
        let x_sq = self.x.square();
        let numerator = x_sq.double() + &x_sq;
        let lambda = self
            .y
            .double()
            .invert()
            .map(|denominator| numerator * &denominator);

        lambda.map(|lambda| self.chord(&lambda, &self.x)).unwrap_or(Self::IDENTITY)
    }

    /// Completes an addition given the slope `lambda` and the other point's x-coordinate.
    fn chord(&self, lambda: &FieldElement, other_x: &FieldElement) -> Self {
        let x = lambda.square() - &self.x - other_x;
        let y = *lambda * &(self.x - &x) - &self.y;
        Self::new(x, y)
    }
}

impl Add<&AffinePoint> for AffinePoint {
    type Output = AffinePoint;

    /// Affine chord-and-tangent addition.
    ///
    /// Not constant-time: intended for public points.
    fn add(self, other: &AffinePoint) -> AffinePoint {
        if bool::from(self.is_identity()) {
            return *other;
        }
        if bool::from(other.is_identity()) {
            return self;
        }

        if self.x == other.x {
            return if self.y == other.y {
                self.double()
            } else {
                // other = -self
                AffinePoint::IDENTITY
            };
        }

        // λ = (y₂ - y₁) / (x₂ - x₁)
        (other.x - &self.x)
            .invert()
            .map(|denominator| (other.y - &self.y) * &denominator)
            .map(|lambda| self.chord(&lambda, &other.x))
            .unwrap_or(AffinePoint::IDENTITY)
    }
}

impl Add<AffinePoint> for AffinePoint {
    type Output = AffinePoint;

    fn add(self, other: AffinePoint) -> AffinePoint {
        self + &other
    }
}

impl Neg for AffinePoint {
    type Output = AffinePoint;

    fn neg(self) -> AffinePoint {
        AffinePoint {
            x: self.x,
            y: -self.y,
            infinity: self.infinity,
        }
    }
}

impl ConditionallySelectable for AffinePoint {
    fn conditional_select(a: &AffinePoint, b: &AffinePoint, choice: Choice) -> AffinePoint {
        AffinePoint {
            x: FieldElement::conditional_select(&a.x, &b.x, choice),
            y: FieldElement::conditional_select(&a.y, &b.y, choice),
            infinity: u8::conditional_select(&a.infinity, &b.infinity, choice),
        }
    }
}

impl ConstantTimeEq for AffinePoint {
    fn ct_eq(&self, other: &AffinePoint) -> Choice {
        let both_identity = self.is_identity() & other.is_identity();
        let neither_identity = !self.is_identity() & !other.is_identity();
        both_identity | (neither_identity & self.x.ct_eq(&other.x) & self.y.ct_eq(&other.y))
    }
}

impl PartialEq for AffinePoint {
    fn eq(&self, other: &AffinePoint) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for AffinePoint {}

impl Default for AffinePoint {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<ProjectivePoint> for AffinePoint {
    fn from(p: ProjectivePoint) -> AffinePoint {
        p.to_affine()
    }
}

impl From<&ProjectivePoint> for AffinePoint {
    fn from(p: &ProjectivePoint) -> AffinePoint {
        p.to_affine()
    }
}

#[cfg(test)]
mod tests {
    use super::AffinePoint;
    use crate::arithmetic::{FieldElement, uint::U256};
    use hex_literal::hex;
    use subtle::Choice;

    const DOUBLE_GENERATOR_X: [u8; 32] =
        hex!("c6047f9441ed7d6d3045406e95c07cd85c778e4b8cef3ca7abac09b95c709ee5");
    const TRIPLE_GENERATOR_X: [u8; 32] =
        hex!("f9308a019258c31049344f85f89d5229b531c845836f99b08601f113bce036f9");

    #[test]
    fn generator_is_on_curve() {
        assert!(bool::from(AffinePoint::GENERATOR.is_on_curve()));
        assert!(bool::from(AffinePoint::IDENTITY.is_on_curve()));

        let off_curve = AffinePoint::new(AffinePoint::GENERATOR.x, FieldElement::ONE);
        assert!(!bool::from(off_curve.is_on_curve()));
        assert!(bool::from(
            AffinePoint::from_coordinates(off_curve.x, off_curve.y).is_none()
        ));
    }

    #[test]
    fn decompress_generator() {
        let x = AffinePoint::GENERATOR.x.to_uint();
        let even = AffinePoint::decompress(&x, Choice::from(0)).unwrap();
        assert_eq!(even, AffinePoint::GENERATOR);

        let odd = AffinePoint::decompress(&x, Choice::from(1)).unwrap();
        assert_eq!(odd, -AffinePoint::GENERATOR);
    }

    #[test]
    fn decompress_rejects_invalid_x() {
        // x = 5: 5³ + 7 = 132 has no square root modulo p
        assert!(bool::from(
            AffinePoint::decompress(&U256::from_u64(5), Choice::from(0)).is_none()
        ));
        // x ≥ p
        assert!(bool::from(
            AffinePoint::decompress(&U256::MAX, Choice::from(0)).is_none()
        ));
    }

    #[test]
    fn addition_special_cases() {
        let g = AffinePoint::GENERATOR;
        assert_eq!(g + &AffinePoint::IDENTITY, g);
        assert_eq!(AffinePoint::IDENTITY + &g, g);
        assert_eq!(g + &(-g), AffinePoint::IDENTITY);
        assert_eq!(g + &g, g.double());
        assert_eq!(AffinePoint::IDENTITY.double(), AffinePoint::IDENTITY);
    }

    #[test]
    fn small_multiples() {
        let g = AffinePoint::GENERATOR;
        let g2 = g.double();
        let g3 = g2 + &g;
        assert_eq!(g2.x.to_bytes(), DOUBLE_GENERATOR_X);
        assert_eq!(g3.x.to_bytes(), TRIPLE_GENERATOR_X);
        assert!(bool::from(g3.is_on_curve()));
        assert_eq!(g3 + &g, g2.double());
    }
}
