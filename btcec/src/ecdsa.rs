//! Elliptic Curve Digital Signature Algorithm (ECDSA) over secp256k1.
//!
//! Signing derives its ephemeral scalar deterministically (RFC 6979) and
//! attaches the [`RecoveryId`] which lets a verifier rebuild the signer's
//! public key from the signature alone (SEC1 §4.1.6).

mod nonce;
pub mod recoverable;

pub use recoverable::{RecoverableSignature, RecoveryId};

use self::nonce::NonceGenerator;
use crate::{
    Error, Result,
    arithmetic::{
        AffinePoint, FIELD_MODULUS, HALF_ORDER, ORDER, ProjectivePoint, Scalar, U256, lincomb,
        mod_inverse, scalar::ORDER_BITS, uint::from_be_slice_padded,
    },
    der::{decode_der, encode_der},
    sec1::{PointEncoding, PublicKey},
    secret_key::SecretKey,
};
use alloc::vec::Vec;
use crypto_bigint::{Encoding, Limb};
use subtle::Choice;
use tracing::trace;

/// Upper bound on the nonces drawn for a single signature.
///
/// Each attempt fails with probability about 2⁻²⁵⁶.
const MAX_NONCE_ATTEMPTS: usize = 64;

/// ECDSA/secp256k1 signature with both components in `[1, n)`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Signature {
    r: Scalar,
    s: Scalar,
}

impl Signature {
    /// Create a signature from its components.
    pub fn from_scalars(r: Scalar, s: Scalar) -> Result<Self> {
        if bool::from(r.is_zero() | s.is_zero()) {
            return Err(Error::MalformedSignature);
        }
        Ok(Self { r, s })
    }

    /// Create a signature from integer components, which must lie in `[1, n)`.
    pub fn from_uints(r: &U256, s: &U256) -> Result<Self> {
        let r = Option::<Scalar>::from(Scalar::from_uint(r)).ok_or(Error::MalformedSignature)?;
        let s = Option::<Scalar>::from(Scalar::from_uint(s)).ok_or(Error::MalformedSignature)?;
        Self::from_scalars(r, s)
    }

    /// Parse a DER signature, accepting the non-minimal forms [`decode_der`] does.
    pub fn from_der(bytes: &[u8]) -> Result<Self> {
        let (r, s) = decode_der(bytes)?;
        Self::from_uints(&r, &s)
    }

    /// Parse the 64-byte `r || s` form.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != 64 {
            return Err(Error::InvalidEncoding);
        }
        let (r, s) = bytes.split_at(32);
        Self::from_uints(&from_be_slice_padded(r)?, &from_be_slice_padded(s)?)
    }

    /// Serialize as canonical DER.
    pub fn to_der(&self) -> Vec<u8> {
        encode_der(&self.r.to_uint(), &self.s.to_uint())
    }

    /// Serialize as 64 bytes, `r || s`.
    pub fn to_bytes(&self) -> [u8; 64] {
        let mut bytes = [0u8; 64];
        bytes[..32].copy_from_slice(&self.r.to_bytes());
        bytes[32..].copy_from_slice(&self.s.to_bytes());
        bytes
    }

    /// The `r` component.
    pub fn r(&self) -> &Scalar {
        &self.r
    }

    /// The `s` component.
    pub fn s(&self) -> &Scalar {
        &self.s
    }

    /// Is `s ≤ n/2`?
    pub fn is_low_s(&self) -> bool {
        !bool::from(self.s.is_high())
    }

    /// Returns the equivalent signature with `s ≤ n/2`.
    ///
    /// `(r, s)` and `(r, n - s)` verify against the same key and digest;
    /// BIP 62 requires the low form.
    pub fn normalize_s(&self) -> Self {
        if self.is_low_s() {
            *self
        } else {
            Self {
                r: self.r,
                s: -self.s,
            }
        }
    }
}

/// Converts a message digest into a scalar as described in SEC1 §4.1.3.
///
/// The digest is right-padded with zeros to the byte length of the group
/// order (or truncated to it), interpreted as a big-endian integer, shifted
/// right to drop bits beyond the order's bit length and reduced modulo n.
pub fn bits2int(digest: &[u8]) -> Scalar {
    let order_bytes = ORDER_BITS.div_ceil(8);
    let mut bytes = [0u8; 32];
    let len = digest.len().min(order_bytes);
    bytes[..len].copy_from_slice(&digest[..len]);

    let mut e = U256::from_be_bytes(bytes);
    let excess = (8 * order_bytes - ORDER_BITS) as u32;
    if excess > 0 {
        e = e >> excess;
    }

    Scalar::from_uint_reduced(&e)
}

/// Sign a pre-hashed message, returning the signature together with the
/// recovery id for the signer's public key.
///
/// `compressed` selects the public key encoding recorded in the compact
/// header. `s` is returned as computed; see [`Signature::normalize_s`].
pub fn sign(digest: &[u8], secret_key: &SecretKey, compressed: bool) -> Result<RecoverableSignature> {
    let public_key = secret_key.public_key(PointEncoding::from_compressed(compressed));
    let signature = sign_prehash(digest, secret_key)?;
    RecoverableSignature::from_trial_recovery(digest, signature, &public_key)
}

/// Sign a pre-hashed message without computing a recovery id.
pub fn sign_prehash(digest: &[u8], secret_key: &SecretKey) -> Result<Signature> {
    let d = secret_key.secret_scalar();
    let e = bits2int(digest);
    let nonces = NonceGenerator::new(d, &e, &[]);
    sign_with_nonces(d, &e, nonces.take(MAX_NONCE_ATTEMPTS))
}

/// Signs with the first nonce that yields non-zero `r` and `s`.
fn sign_with_nonces(
    d: &Scalar,
    e: &Scalar,
    nonces: impl IntoIterator<Item = Scalar>,
) -> Result<Signature> {
    for (attempt, k) in nonces.into_iter().enumerate() {
        match try_sign(d, e, &k) {
            Err(Error::InvalidNonce) => {
                trace!(attempt, "nonce rejected, drawing the next candidate");
            }
            result => return result,
        }
    }

    Err(Error::InvalidNonce)
}

/// Computes `r = (k·G).x mod n` and `s = k⁻¹(e + r·d) mod n`.
fn try_sign(d: &Scalar, e: &Scalar, k: &Scalar) -> Result<Signature> {
    let big_r = (ProjectivePoint::GENERATOR * k).to_affine();
    let r = Scalar::from_uint_reduced(&big_r.x().to_uint());
    if bool::from(r.is_zero()) {
        return Err(Error::InvalidNonce);
    }

    let k_inv = Option::<Scalar>::from(k.invert()).ok_or(Error::InvalidNonce)?;
    let s = k_inv * &(*e + &(r * d));
    if bool::from(s.is_zero()) {
        return Err(Error::InvalidNonce);
    }

    Ok(Signature { r, s })
}

/// Recover the public key for `signature` over `digest` under one recovery id.
///
/// Returns `Ok(None)` when the id does not lead to a key: `r + i·n` is not a
/// field element, no curve point has that x-coordinate, or the result is the
/// identity. A returned key is only the signer's key for the right id.
#[allow(non_snake_case)]
pub fn recover(
    digest: &[u8],
    signature: &Signature,
    recovery_id: RecoveryId,
    encoding: PointEncoding,
) -> Result<Option<PublicKey>> {
    let r = signature.r.to_uint();

    // x = r + i·n
    let (x, carry) = if recovery_id.is_x_reduced() {
        r.adc(&ORDER, Limb::ZERO)
    } else {
        (r, Limb::ZERO)
    };
    if carry != Limb::ZERO || x >= FIELD_MODULUS {
        trace!(recovery_id = recovery_id.to_byte(), "candidate x exceeds field modulus");
        return Ok(None);
    }

    let y_is_odd = Choice::from(recovery_id.is_y_odd() as u8);
    let R = match Option::<AffinePoint>::from(AffinePoint::decompress(&x, y_is_odd)) {
        Some(point) => point,
        None => {
            trace!(recovery_id = recovery_id.to_byte(), "candidate x is not on the curve");
            return Ok(None);
        }
    };

    let e = bits2int(digest);
    let r_inv = Scalar::from_uint_reduced(&mod_inverse(&r, &ORDER)?);
    let u1 = -(r_inv * &e);
    let u2 = r_inv * &signature.s;

    // Q = r⁻¹(s·R - e·G)
    let Q = lincomb(&AffinePoint::GENERATOR, &u1.to_uint(), &R, &u2.to_uint());
    if bool::from(Q.is_identity()) {
        return Ok(None);
    }

    PublicKey::from_affine(Q, encoding).map(Some)
}

/// Rewrite a DER signature so that `s ≤ n/2`, re-encoding it canonically.
///
/// Fails with [`Error::MalformedSignature`] if the input does not decode or
/// `s ≥ n`.
pub fn low_s_normalize(der: &[u8]) -> Result<Vec<u8>> {
    let (r, s) = decode_der(der)?;
    if s >= ORDER {
        return Err(Error::MalformedSignature);
    }

    let s = if s > HALF_ORDER {
        ORDER.wrapping_sub(&s)
    } else {
        s
    };

    Ok(encode_der(&r, &s))
}

#[cfg(test)]
mod tests {
    use super::{
        Signature, bits2int, low_s_normalize, recover, sign, sign_prehash, sign_with_nonces,
        try_sign,
    };
    use crate::{
        Error,
        arithmetic::{HALF_ORDER, ORDER, ProjectivePoint, Scalar, U256},
        der::{assert_canonical_der, encode_der},
        ecdsa::RecoveryId,
        sec1::PointEncoding,
        secret_key::SecretKey,
    };
    use crypto_bigint::Encoding;
    use hex_literal::hex;
    use sha2::{Digest, Sha256};

    fn key_one() -> SecretKey {
        SecretKey::from_slice(&[1]).unwrap()
    }

    #[test]
    fn bits2int_pads_and_truncates() {
        let mut padded = [0u8; 32];
        padded[0] = 0xab;
        assert_eq!(bits2int(&[0xab]), Scalar::from_bytes_reduced(&padded));

        let mut long = [0x11u8; 40];
        long[32..].fill(0xff);
        assert_eq!(bits2int(&long), Scalar::from_bytes_reduced(&[0x11; 32]));

        assert_eq!(bits2int(&ORDER.to_be_bytes()), Scalar::ZERO);
        assert_eq!(bits2int(&[]), Scalar::ZERO);
    }

    /// Returns `(d, e)` with `d = 1` such that signing with `k` gives `s = 0`.
    fn zero_s_digest(k: &Scalar) -> (Scalar, Scalar) {
        let d = Scalar::ONE;
        let big_r = (ProjectivePoint::GENERATOR * k).to_affine();
        let r = Scalar::from_uint_reduced(&big_r.x().to_uint());
        (d, -(r * &d))
    }

    #[test]
    fn zero_s_rejects_nonce() {
        let k = Scalar::from(7);
        let (d, e) = zero_s_digest(&k);
        assert_eq!(try_sign(&d, &e, &k), Err(Error::InvalidNonce));
    }

    #[test]
    fn rejected_nonce_is_skipped() {
        let bad = Scalar::from(7);
        let good = Scalar::from(11);
        let (d, e) = zero_s_digest(&bad);

        let signature = sign_with_nonces(&d, &e, [bad, good]).unwrap();
        assert_eq!(Ok(signature), try_sign(&d, &e, &good));
        assert_eq!(
            signature.r().to_uint(),
            (ProjectivePoint::GENERATOR * &good).to_affine().x().to_uint()
        );

        assert_eq!(sign_with_nonces(&d, &e, [bad]), Err(Error::InvalidNonce));
        assert_eq!(sign_with_nonces(&d, &e, core::iter::empty()), Err(Error::InvalidNonce));
    }

    #[test]
    fn rfc6979_satoshi_nakamoto() {
        let digest = Sha256::digest(b"Satoshi Nakamoto");
        let signature = sign_prehash(&digest, &key_one()).unwrap();
        assert_eq!(
            signature.r().to_bytes(),
            hex!("934b1ea10a4b3c1757e2b0c017d0b6143ce3c9a7e6a4a49860d7a6ab210ee3d8")
        );
        assert_eq!(
            signature.s().to_bytes(),
            hex!("dbbd3162d46e9f9bef7feb87c16dc13b4f6568a87f4e83f728e2443ba586675c")
        );
        assert!(!signature.is_low_s());

        let normalized = signature.normalize_s();
        assert_eq!(normalized.r(), signature.r());
        assert_eq!(
            normalized.s().to_bytes(),
            hex!("2442ce9d2b916064108014783e923ec36b49743e2ffa1c4496f01a512aafd9e5")
        );
        assert!(normalized.is_low_s());
        assert_eq!(normalized.normalize_s(), normalized);
    }

    #[test]
    fn sign_attaches_recovery_id() {
        let digest = Sha256::digest(b"Satoshi Nakamoto");
        let signature = sign(&digest, &key_one(), true).unwrap();
        assert_eq!(signature.recovery_id().to_byte(), 0);
        assert!(signature.is_compressed());

        let recovered = recover(
            &digest,
            signature.signature(),
            signature.recovery_id(),
            PointEncoding::Compressed,
        )
        .unwrap()
        .unwrap();
        assert_eq!(recovered, key_one().public_key(PointEncoding::Compressed));
    }

    #[test]
    fn sign_zero_digest() {
        let signature = sign(&[0u8; 32], &key_one(), false).unwrap();
        assert_eq!(
            signature.signature().to_bytes(),
            hex!(
                "a0b37f8fba683cc68f6574cd43b39f0343a50008bf6ccea9d13231d9e7e2e1e4"
                "ee12372cf8dabd69d9b51403c23893260446a5aca818c9f55a1d5e8be63972ef"
            )
        );
        assert_eq!(signature.recovery_id().to_byte(), 0);
        assert!(!signature.is_compressed());
    }

    #[test]
    fn sign_fixed_key() {
        let key = SecretKey::from_slice(&hex!(
            "ebb2c082fd7727890a28ac82f6bdf97bad8de9f5d7c9028692de1a255cad3e0f"
        ))
        .unwrap();
        let digest = hex!("4b688df40bcedbe641ddb16ff0a1842d9c67ea1c3bf63f3e0471baa664531d1a");
        let signature = sign(&digest, &key, false).unwrap();

        assert_eq!(
            signature.signature().to_bytes(),
            hex!(
                "e3650c6a94419ce0db9d9e209ca5bac2f9a888f376bd7f05a142dd87f1fd90f6"
                "252e6c025089ed9b784daed95ce09b1dfdb46d454e6fc1e1bd7ea007513f5c9a"
            )
        );
        assert_eq!(signature.recovery_id().to_byte(), 0);
        assert_eq!(
            key.public_key(PointEncoding::Uncompressed).to_sec1_bytes(),
            hex!(
                "04779dd197a5df977ed2cf6cb31d82d43328b790dc6b3b7d4437a427bd5847dfcd"
                "e94b724a555b6d017bb7607c3e3281daf5b1699d6ef4124975c9237b917d426f"
            )
        );
    }

    #[test]
    fn recovery_misses_are_not_errors() {
        let digest = Sha256::digest(b"example message");
        let signature = Signature::from_bytes(&hex!(
            "ce53abb3721bafc561408ce8ff99c909f7f0b18a2f788649d6470162ab1aa032"
            "3971edc523a6d6453f3fb6128d318d9db1a5ff3386feb1047d9816e780039d52"
        ))
        .unwrap();

        for id in [2, 3] {
            let id = RecoveryId::from_byte(id).unwrap();
            assert_eq!(
                recover(&digest, &signature, id, PointEncoding::Compressed),
                Ok(None)
            );
        }
    }

    #[test]
    fn signature_components_in_range() {
        assert_eq!(
            Signature::from_uints(&U256::ZERO, &U256::ONE),
            Err(Error::MalformedSignature)
        );
        assert_eq!(
            Signature::from_uints(&U256::ONE, &ORDER),
            Err(Error::MalformedSignature)
        );
        assert_eq!(Signature::from_bytes(&[1; 63]), Err(Error::InvalidEncoding));

        let signature = Signature::from_uints(&U256::ONE, &U256::from_u64(2)).unwrap();
        assert_eq!(Signature::from_der(&signature.to_der()), Ok(signature));
    }

    #[test]
    fn low_s_normalize_high_s() {
        let r = U256::from_u64(0x1234);
        let high = ORDER.wrapping_sub(&U256::from_u64(5));
        let normalized = low_s_normalize(&encode_der(&r, &high)).unwrap();

        let (r2, s2) = assert_canonical_der(&normalized).unwrap();
        assert_eq!(r2, r);
        assert_eq!(s2, U256::from_u64(5));
        assert_eq!(low_s_normalize(&normalized).unwrap(), normalized);
    }

    #[test]
    fn low_s_normalize_boundaries() {
        let r = U256::ONE;
        let half = encode_der(&r, &HALF_ORDER);
        assert_eq!(low_s_normalize(&half).unwrap(), half);

        let above_half = HALF_ORDER.wrapping_add(&U256::ONE);
        let (_, s) = assert_canonical_der(&low_s_normalize(&encode_der(&r, &above_half)).unwrap())
            .unwrap();
        assert_eq!(s, HALF_ORDER);

        assert_eq!(
            low_s_normalize(&encode_der(&r, &ORDER)),
            Err(Error::MalformedSignature)
        );
        assert_eq!(
            low_s_normalize(&hex!("3006020181020101")),
            Err(Error::MalformedSignature)
        );
    }

    #[test]
    fn low_s_normalize_repacks_lenient_input() {
        let normalized = low_s_normalize(&hex!("300702020001020102")).unwrap();
        assert_eq!(normalized, hex!("3006020101020102"));
    }
}
