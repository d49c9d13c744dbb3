//! Projective points

#![allow(clippy::op_ref)]

use super::{AffinePoint, CURVE_EQUATION_B3, FieldElement};
use core::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

/// A point on the secp256k1 curve in homogeneous projective coordinates.
///
/// Represents the affine point `(X/Z, Y/Z)`; the identity is any point with `Z = 0`.
#[derive(Clone, Copy, Debug)]
pub struct ProjectivePoint {
    x: FieldElement,
    y: FieldElement,
    z: FieldElement,
}

impl ProjectivePoint {
    /// Additive identity of the group: the point at infinity.
    pub const IDENTITY: Self = Self {
        x: FieldElement::ZERO,
        y: FieldElement::ONE,
        z: FieldElement::ZERO,
    };

    /// Base point of secp256k1.
    pub const GENERATOR: Self = Self {
        x: AffinePoint::GENERATOR.x,
        y: AffinePoint::GENERATOR.y,
        z: FieldElement::ONE,
    };

    /// Is this point the identity?
    pub fn is_identity(&self) -> Choice {
        self.z.is_zero()
    }

    /// Returns the affine representation of this point.
    pub fn to_affine(&self) -> AffinePoint {
        self.z
            .invert()
            .map(|zinv| AffinePoint::new(self.x * &zinv, self.y * &zinv))
            .unwrap_or(AffinePoint::IDENTITY)
    }

    /// Returns `self + other`.
    fn add(&self, other: &ProjectivePoint) -> ProjectivePoint {
        // We implement the complete addition formula from Renes-Costello-Batina 2015
        // (https://eprint.iacr.org/2015/1060 Algorithm 7).

        let t0 = self.x * &other.x;
        let t1 = self.y * &other.y;
        let t2 = self.z * &other.z;

        let t3 = (self.x + &self.y) * &(other.x + &other.y) - &(t0 + &t1);
        let t4 = (self.y + &self.z) * &(other.y + &other.z) - &(t1 + &t2);
        let xz_pairs = (self.x + &self.z) * &(other.x + &other.z) - &(t0 + &t2);

        let xx3 = t0.double() + &t0;
        let bzz3 = t2 * &CURVE_EQUATION_B3;
        let yy_p_bzz3 = t1 + &bzz3;
        let yy_m_bzz3 = t1 - &bzz3;
        let bxz3 = xz_pairs * &CURVE_EQUATION_B3;

        ProjectivePoint {
            x: t3 * &yy_m_bzz3 - &(t4 * &bxz3),
            y: bxz3 * &xx3 + &(yy_m_bzz3 * &yy_p_bzz3),
            z: yy_p_bzz3 * &t4 + &(xx3 * &t3),
        }
    }

    /// Doubles this point.
    pub fn double(&self) -> ProjectivePoint {
        // We implement the complete doubling formula from Renes-Costello-Batina 2015
        // (https://eprint.iacr.org/2015/1060 Algorithm 9).

        let yy = self.y.square();
        let yy8 = yy.double().double().double();
        let yz = self.y * &self.z;
        let bzz3 = self.z.square() * &CURVE_EQUATION_B3;

        let x3 = bzz3 * &yy8;
        let y3 = yy + &bzz3;
        let z3 = yz * &yy8;

        let yy_m_bzz9 = yy - &(bzz3.double() + &bzz3);
        let xy = self.x * &self.y;

        ProjectivePoint {
            x: (yy_m_bzz9 * &xy).double(),
            y: x3 + &(yy_m_bzz9 * &y3),
            z: z3,
        }
    }

    /// Returns `-self`.
    fn neg(&self) -> ProjectivePoint {
        ProjectivePoint {
            x: self.x,
            y: -self.y,
            z: self.z,
        }
    }

    /// Returns `self - other`.
    fn sub(&self, other: &ProjectivePoint) -> ProjectivePoint {
        self.add(&other.neg())
    }
}

impl From<AffinePoint> for ProjectivePoint {
    fn from(p: AffinePoint) -> Self {
        let projective = ProjectivePoint {
            x: p.x,
            y: p.y,
            z: FieldElement::ONE,
        };
        Self::conditional_select(&projective, &Self::IDENTITY, p.is_identity())
    }
}

impl From<&AffinePoint> for ProjectivePoint {
    fn from(p: &AffinePoint) -> Self {
        Self::from(*p)
    }
}

impl ConditionallySelectable for ProjectivePoint {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        ProjectivePoint {
            x: FieldElement::conditional_select(&a.x, &b.x, choice),
            y: FieldElement::conditional_select(&a.y, &b.y, choice),
            z: FieldElement::conditional_select(&a.z, &b.z, choice),
        }
    }
}

impl ConstantTimeEq for ProjectivePoint {
    fn ct_eq(&self, other: &Self) -> Choice {
        // (x₁z₁, y₁z₁, z₁) and (x₂z₂, y₂z₂, z₂) are equal iff the cross products match.
        // An identity (0, y, 0) only cross-matches another identity since yz ≠ 0 otherwise.
        let x_eq = (self.x * &other.z).ct_eq(&(other.x * &self.z));
        let y_eq = (self.y * &other.z).ct_eq(&(other.y * &self.z));
        x_eq & y_eq
    }
}

impl PartialEq for ProjectivePoint {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for ProjectivePoint {}

impl Default for ProjectivePoint {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Add<&ProjectivePoint> for ProjectivePoint {
    type Output = ProjectivePoint;

    fn add(self, other: &ProjectivePoint) -> ProjectivePoint {
        ProjectivePoint::add(&self, other)
    }
}

impl Add<ProjectivePoint> for ProjectivePoint {
    type Output = ProjectivePoint;

    fn add(self, other: ProjectivePoint) -> ProjectivePoint {
        ProjectivePoint::add(&self, &other)
    }
}

impl AddAssign<&ProjectivePoint> for ProjectivePoint {
    fn add_assign(&mut self, rhs: &ProjectivePoint) {
        *self = ProjectivePoint::add(self, rhs);
    }
}

impl Sub<&ProjectivePoint> for ProjectivePoint {
    type Output = ProjectivePoint;

    fn sub(self, other: &ProjectivePoint) -> ProjectivePoint {
        ProjectivePoint::sub(&self, other)
    }
}

impl Sub<ProjectivePoint> for ProjectivePoint {
    type Output = ProjectivePoint;

    fn sub(self, other: ProjectivePoint) -> ProjectivePoint {
        ProjectivePoint::sub(&self, &other)
    }
}

impl SubAssign<&ProjectivePoint> for ProjectivePoint {
    fn sub_assign(&mut self, rhs: &ProjectivePoint) {
        *self = ProjectivePoint::sub(self, rhs);
    }
}

impl Neg for ProjectivePoint {
    type Output = ProjectivePoint;

    fn neg(self) -> ProjectivePoint {
        ProjectivePoint::neg(&self)
    }
}

impl<'a> Neg for &'a ProjectivePoint {
    type Output = ProjectivePoint;

    fn neg(self) -> ProjectivePoint {
        ProjectivePoint::neg(self)
    }
}
