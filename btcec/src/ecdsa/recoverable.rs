//! Bitcoin-style "compact" recoverable signatures.
//!
//! A compact signature carries a header byte in front of `r || s`:
//!
//! ```text
//! header = 27 + recovery_id + (4 if the signer's key is compressed)
//! ```
//!
//! The header lets a verifier rebuild the signer's public key, including the
//! encoding it was published in, from the digest and the signature alone.

use super::{Signature, recover};
use crate::{
    Error, Result,
    sec1::{PointEncoding, PublicKey},
};
use core::fmt;
use tracing::trace;

/// Size of a compact recoverable signature in bytes
pub const SIZE: usize = 65;

/// Header value for recovery id 0 and an uncompressed key.
const HEADER_BASE: u8 = 27;

/// Added to the header when the public key is compressed.
const HEADER_COMPRESSED: u8 = 4;

/// Identifier used to select one of the (up to) four public keys a signature
/// can be recovered to.
///
/// - bit 0: the y-coordinate of the ephemeral point `R` is odd
/// - bit 1: the x-coordinate of `R` was reduced, i.e. `R.x = r + n`
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct RecoveryId(u8);

impl RecoveryId {
    /// Largest valid recovery id.
    pub const MAX: u8 = 3;

    /// Create a recovery id from its two flags.
    pub const fn new(is_y_odd: bool, is_x_reduced: bool) -> Self {
        Self(((is_x_reduced as u8) << 1) | (is_y_odd as u8))
    }

    /// Create a recovery id from its byte value.
    pub const fn from_byte(byte: u8) -> Result<Self> {
        if byte <= Self::MAX {
            Ok(Self(byte))
        } else {
            Err(Error::InvalidRecoveryId)
        }
    }

    /// Is `y` odd?
    pub const fn is_y_odd(self) -> bool {
        (self.0 & 1) != 0
    }

    /// Is the x-coordinate of `R` equal to `r + n`?
    pub const fn is_x_reduced(self) -> bool {
        (self.0 & 0b10) != 0
    }

    /// Byte value of this id.
    pub const fn to_byte(self) -> u8 {
        self.0
    }

    /// All recovery ids, in ascending order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..=Self::MAX).map(Self)
    }
}

impl TryFrom<u8> for RecoveryId {
    type Error = Error;

    fn try_from(byte: u8) -> Result<Self> {
        Self::from_byte(byte)
    }
}

impl From<RecoveryId> for u8 {
    fn from(recovery_id: RecoveryId) -> u8 {
        recovery_id.0
    }
}

/// ECDSA signature plus the information needed to recover the signer's
/// public key: the [`RecoveryId`] and whether the key is compressed.
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct RecoverableSignature {
    signature: Signature,
    recovery_id: RecoveryId,
    compressed: bool,
}

impl RecoverableSignature {
    /// Create a new recoverable signature.
    ///
    /// This is an "unchecked" conversion and assumes the provided
    /// [`RecoveryId`] is valid for this signature.
    pub fn new(signature: Signature, recovery_id: RecoveryId, compressed: bool) -> Self {
        Self {
            signature,
            recovery_id,
            compressed,
        }
    }

    /// Given a public key, message digest, and signature, use trial recovery
    /// to determine if a suitable recovery ID exists, or return
    /// [`Error::RecoveryFailed`] otherwise.
    ///
    /// The compressed flag is taken from the encoding of `public_key`.
    pub fn from_trial_recovery(
        digest: &[u8],
        signature: Signature,
        public_key: &PublicKey,
    ) -> Result<Self> {
        let encoding = public_key.encoding();

        for recovery_id in RecoveryId::all() {
            match recover(digest, &signature, recovery_id, encoding)? {
                Some(recovered) if recovered.point() == public_key.point() => {
                    return Ok(Self::new(signature, recovery_id, encoding.is_compressed()));
                }
                _ => trace!(
                    recovery_id = recovery_id.to_byte(),
                    "recovery id does not match public key"
                ),
            }
        }

        Err(Error::RecoveryFailed)
    }

    /// Parse the 65-byte compact form.
    pub fn from_compact(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != SIZE {
            return Err(Error::InvalidEncoding);
        }

        let header = bytes[0];
        if !(HEADER_BASE..HEADER_BASE + 2 * HEADER_COMPRESSED).contains(&header) {
            return Err(Error::InvalidEncoding);
        }

        let id = header - HEADER_BASE;
        let compressed = id >= HEADER_COMPRESSED;
        let recovery_id = RecoveryId::from_byte(id % HEADER_COMPRESSED)?;
        let signature = Signature::from_bytes(&bytes[1..])?;
        Ok(Self::new(signature, recovery_id, compressed))
    }

    /// Serialize as `header || r || s`.
    pub fn to_compact(&self) -> [u8; SIZE] {
        let mut bytes = [0u8; SIZE];
        bytes[0] = self.header();
        bytes[1..].copy_from_slice(&self.signature.to_bytes());
        bytes
    }

    /// The compact header byte.
    pub fn header(&self) -> u8 {
        let compressed = if self.compressed { HEADER_COMPRESSED } else { 0 };
        HEADER_BASE + self.recovery_id.to_byte() + compressed
    }

    /// The plain signature.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// The recovery id.
    pub fn recovery_id(&self) -> RecoveryId {
        self.recovery_id
    }

    /// Was the signer's public key compressed?
    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// Recover the signer's public key in the encoding recorded in the header.
    ///
    /// Returns `Ok(None)` if the recovery id does not lead to a key.
    pub fn recover_public_key(&self, digest: &[u8]) -> Result<Option<PublicKey>> {
        recover(
            digest,
            &self.signature,
            self.recovery_id,
            PointEncoding::from_compressed(self.compressed),
        )
    }
}

impl From<RecoverableSignature> for Signature {
    fn from(sig: RecoverableSignature) -> Self {
        sig.signature
    }
}

impl fmt::Debug for RecoverableSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecoverableSignature(")?;
        for byte in self.to_compact() {
            write!(f, "{:02x}", byte)?;
        }
        write!(f, ")")
    }
}
