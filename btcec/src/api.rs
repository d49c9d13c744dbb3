//! Byte and hex oriented entry points.
//!
//! These functions take the raw buffers and hex strings that surrounding
//! Bitcoin tooling passes around and return the same, delegating to the
//! typed API in [`crate::ecdsa`], [`crate::sec1`] and [`crate::der`].

use crate::{
    Error, Result,
    arithmetic::{ORDER, point_add, uint::from_be_slice_padded},
    ecdsa::{self, RecoverableSignature, recoverable},
    sec1::{PointEncoding, PublicKey},
    secret_key::SecretKey,
};
use alloc::string::String;
use zeroize::Zeroizing;

pub use crate::{
    der::{assert_canonical_der, repack_der},
    ecdsa::low_s_normalize,
};

/// Inputs at least this long are treated as hex text rather than raw bytes.
const HEX_KEY_THRESHOLD: usize = 64;

/// Parse a private key given as raw big-endian bytes or, if at least 64
/// bytes long, as ASCII hex.
///
/// The key must lie in `[1, n)`: values that would be silently reduced are
/// rejected with [`Error::InvalidPrivateKey`].
fn parse_private_key(private_key: &[u8]) -> Result<SecretKey> {
    let raw = if private_key.len() >= HEX_KEY_THRESHOLD {
        Zeroizing::new(hex::decode(private_key)?)
    } else {
        Zeroizing::new(private_key.to_vec())
    };

    let k = Zeroizing::new(from_be_slice_padded(&raw)?);
    if *k >= ORDER {
        return Err(Error::InvalidPrivateKey);
    }

    SecretKey::from_slice(&raw)
}

/// Rebuild a key pair from a private key.
///
/// Returns the private key as 64 hex digits and the uncompressed public key
/// as hex.
pub fn regenerate_key(private_key: &[u8]) -> Result<(String, String)> {
    let secret_key = parse_private_key(private_key)?;
    let public_key = secret_key.public_key(PointEncoding::Uncompressed);
    Ok((hex::encode(secret_key.to_bytes()), public_key.to_hex()))
}

/// Sign a digest and return the 65-byte compact signature.
///
/// `public_key_hex` defaults to the uncompressed key derived from
/// `private_key`; `compressed` defaults to the encoding of that key. A
/// supplied key which the signature does not recover to is reported as
/// [`Error::RecoveryFailed`].
pub fn sign_compact(
    digest: &[u8],
    private_key: &[u8],
    public_key_hex: Option<&str>,
    compressed: Option<bool>,
) -> Result<[u8; recoverable::SIZE]> {
    let secret_key = parse_private_key(private_key)?;

    let public_key = match public_key_hex {
        Some(hex_str) => PublicKey::from_hex(hex_str)?,
        None => secret_key.public_key(PointEncoding::Uncompressed),
    };
    let compressed = compressed.unwrap_or(public_key.encoding().is_compressed());
    let public_key = public_key.with_encoding(PointEncoding::from_compressed(compressed));

    let signature = ecdsa::sign_prehash(digest, &secret_key)?;
    let signature = RecoverableSignature::from_trial_recovery(digest, signature, &public_key)?;
    Ok(signature.to_compact())
}

/// Recover the signer's public key, as hex, from a compact signature.
///
/// `Ok(None)` means the embedded recovery id does not lead to a key.
pub fn recover_compact(digest: &[u8], compact: &[u8]) -> Result<Option<String>> {
    let signature = RecoverableSignature::from_compact(compact)?;
    Ok(signature
        .recover_public_key(digest)?
        .map(|public_key| public_key.to_hex()))
}

/// Add two hex-encoded public keys, returning the uncompressed sum as hex.
pub fn add_public_keys(a: &str, b: &str) -> Result<String> {
    let a = PublicKey::from_hex(a)?;
    let b = PublicKey::from_hex(b)?;
    let sum = point_add(a.point(), b.point());
    Ok(PublicKey::from_affine(sum, PointEncoding::Uncompressed)?.to_hex())
}

#[cfg(test)]
mod tests {
    use super::{add_public_keys, recover_compact, regenerate_key, sign_compact};
    use crate::{Error, arithmetic::ORDER};
    use alloc::{format, string::ToString};
    use crypto_bigint::Encoding;
    use hex_literal::hex;
    use sha2::{Digest, Sha256};

    const GENERATOR_COMPRESSED: &str =
        "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";
    const GENERATOR_UNCOMPRESSED: &str = "0479be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8";
    const KEY_ONE_HEX: &str = "0000000000000000000000000000000000000000000000000000000000000001";

    #[test]
    fn regenerate_from_raw_and_hex() {
        let mut raw = [0u8; 32];
        raw[31] = 1;

        let (private_hex, public_hex) = regenerate_key(&raw).unwrap();
        assert_eq!(private_hex, KEY_ONE_HEX);
        assert_eq!(public_hex, GENERATOR_UNCOMPRESSED);

        assert_eq!(
            regenerate_key(KEY_ONE_HEX.as_bytes()).unwrap(),
            (private_hex, public_hex)
        );
    }

    #[test]
    fn regenerate_rejects_out_of_range() {
        assert_eq!(regenerate_key(&[0u8; 32]), Err(Error::InvalidPrivateKey));
        assert_eq!(
            regenerate_key(&ORDER.to_be_bytes()),
            Err(Error::InvalidPrivateKey)
        );
        assert_eq!(
            regenerate_key(hex::encode(ORDER.to_be_bytes()).as_bytes()),
            Err(Error::InvalidPrivateKey)
        );
        assert_eq!(
            regenerate_key(&[b'z'; 64]),
            Err(Error::InvalidEncoding)
        );
    }

    #[test]
    fn sign_compact_defaults() {
        let digest = Sha256::digest(b"Satoshi Nakamoto");

        // no public key: uncompressed
        let compact = sign_compact(&digest, KEY_ONE_HEX.as_bytes(), None, None).unwrap();
        assert_eq!(compact[0], 27);
        assert_eq!(
            compact[1..33],
            hex!("934b1ea10a4b3c1757e2b0c017d0b6143ce3c9a7e6a4a49860d7a6ab210ee3d8")
        );

        // compressed public key: compressed header
        let compact =
            sign_compact(&digest, KEY_ONE_HEX.as_bytes(), Some(GENERATOR_COMPRESSED), None)
                .unwrap();
        assert_eq!(compact[0], 31);

        // explicit flag wins
        let compact = sign_compact(
            &digest,
            KEY_ONE_HEX.as_bytes(),
            Some(GENERATOR_COMPRESSED),
            Some(false),
        )
        .unwrap();
        assert_eq!(compact[0], 27);
    }

    #[test]
    fn sign_compact_with_foreign_key() {
        let digest = Sha256::digest(b"Satoshi Nakamoto");
        let two_g = "02c6047f9441ed7d6d3045406e95c07cd85c778e4b8cef3ca7abac09b95c709ee5";
        assert_eq!(
            sign_compact(&digest, KEY_ONE_HEX.as_bytes(), Some(two_g), None),
            Err(Error::RecoveryFailed)
        );
    }

    #[test]
    fn compact_round_trip() {
        let digest = Sha256::digest(b"Satoshi Nakamoto");
        for compressed in [true, false] {
            let compact =
                sign_compact(&digest, KEY_ONE_HEX.as_bytes(), None, Some(compressed)).unwrap();
            let expected = if compressed {
                GENERATOR_COMPRESSED
            } else {
                GENERATOR_UNCOMPRESSED
            };
            assert_eq!(
                recover_compact(&digest, &compact).unwrap(),
                Some(expected.to_string())
            );
        }
    }

    #[test]
    fn recover_compact_rejects_framing() {
        let digest = [0u8; 32];
        assert_eq!(recover_compact(&digest, &[27; 64]), Err(Error::InvalidEncoding));

        let mut compact = [1u8; 65];
        compact[0] = 35;
        assert_eq!(recover_compact(&digest, &compact), Err(Error::InvalidEncoding));
    }

    #[test]
    fn add_generator_to_itself() {
        let sum = add_public_keys(GENERATOR_COMPRESSED, GENERATOR_UNCOMPRESSED).unwrap();
        assert!(sum.starts_with("04c6047f9441ed7d6d3045406e95c07cd85c778e4b8cef3ca7abac09b95c709ee5"));

        // G + (-G) has no encoding
        let negated = format!("03{}", &GENERATOR_COMPRESSED[2..]);
        assert_eq!(
            add_public_keys(GENERATOR_COMPRESSED, &negated),
            Err(Error::InvalidPoint)
        );
    }
}
