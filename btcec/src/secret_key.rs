//! Secret keys: private scalars.

use crate::{
    Error, Result,
    arithmetic::{ProjectivePoint, Scalar, uint::from_be_slice_padded},
    sec1::{PointEncoding, PublicKey},
};
use core::fmt::{self, Debug};
use subtle::{Choice, ConstantTimeEq};
use zeroize::Zeroize;

/// secp256k1 secret key: a non-zero scalar modulo the group order.
///
/// Prevents accidental exposure and handles zeroization.
#[derive(Clone)]
pub struct SecretKey {
    /// Private scalar value
    scalar: Scalar,
}

impl SecretKey {
    /// Create a secret key from a non-zero scalar.
    pub fn from_scalar(scalar: Scalar) -> Result<Self> {
        if bool::from(scalar.is_zero()) {
            return Err(Error::InvalidPrivateKey);
        }
        Ok(Self { scalar })
    }

    /// Deserialize a big-endian integer of at most 32 bytes, reducing it modulo n.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let mut k = from_be_slice_padded(bytes)?;
        let scalar = Scalar::from_uint_reduced(&k);
        k.zeroize();
        Self::from_scalar(scalar)
    }

    /// Deserialize a hex-encoded big-endian integer.
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let mut bytes = hex::decode(hex_str)?;
        let result = Self::from_slice(&bytes);
        bytes.zeroize();
        result
    }

    /// Expose the secret [`Scalar`] value this [`SecretKey`] wraps
    pub fn secret_scalar(&self) -> &Scalar {
        &self.scalar
    }

    /// Serialize as 32 big-endian bytes.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.scalar.to_bytes()
    }

    /// Compute the public key `d·G`.
    pub fn public_key(&self, encoding: PointEncoding) -> PublicKey {
        let point = (ProjectivePoint::GENERATOR * &self.scalar).to_affine();
        // d ∈ [1, n) so d·G is never the identity
        PublicKey::from_affine(point, encoding).unwrap_or_else(|_| unreachable!())
    }
}

impl TryFrom<&[u8]> for SecretKey {
    type Error = Error;

    fn try_from(slice: &[u8]) -> Result<Self> {
        Self::from_slice(slice)
    }
}

impl ConstantTimeEq for SecretKey {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.scalar.ct_eq(&other.scalar)
    }
}

impl PartialEq for SecretKey {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for SecretKey {}

impl Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretKey").finish_non_exhaustive()
    }
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        self.scalar.zeroize();
    }
}
