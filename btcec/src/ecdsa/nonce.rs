//! Deterministic ephemeral scalars as described in RFC 6979 §3.2, using
//! HMAC-DRBG with SHA-256.

use crate::arithmetic::Scalar;
use rfc6979::HmacDrbg;
use sha2::Sha256;
use zeroize::Zeroize;

/// Stream of candidate nonces for one `(secret key, digest)` pair.
///
/// Each call to [`NonceGenerator::next_nonce`] continues the HMAC-DRBG
/// sequence, so a nonce rejected by the signer is replaced by the next
/// candidate the RFC would produce.
pub(crate) struct NonceGenerator {
    drbg: HmacDrbg<Sha256>,
}

impl NonceGenerator {
    /// Seed the generator with `int2octets(x)`, `bits2octets(h)` and optional extra data.
    pub(crate) fn new(secret: &Scalar, digest: &Scalar, data: &[u8]) -> Self {
        let mut x = secret.to_bytes();
        let h = digest.to_bytes();
        let drbg = HmacDrbg::<Sha256>::new(&x, &h, data);
        x.zeroize();
        Self { drbg }
    }

    /// Returns the next candidate `k` in `[1, n)`.
    pub(crate) fn next_nonce(&mut self) -> Scalar {
        let mut bytes = [0u8; 32];
        loop {
            self.drbg.fill_bytes(&mut bytes);
            let candidate = Option::<Scalar>::from(Scalar::from_bytes(&bytes));
            bytes.zeroize();

            if let Some(k) = candidate.filter(|k| !bool::from(k.is_zero())) {
                return k;
            }
        }
    }
}

impl Iterator for NonceGenerator {
    type Item = Scalar;

    fn next(&mut self) -> Option<Scalar> {
        Some(self.next_nonce())
    }
}

#[cfg(test)]
mod tests {
    use super::NonceGenerator;
    use crate::{arithmetic::Scalar, ecdsa::bits2int};
    use hex_literal::hex;
    use sha2::{Digest, Sha256};

    #[test]
    fn satoshi_nakamoto_key_one() {
        let digest = Sha256::digest(b"Satoshi Nakamoto");
        let mut nonces = NonceGenerator::new(&Scalar::ONE, &bits2int(&digest), &[]);
        assert_eq!(
            nonces.next_nonce().to_bytes(),
            hex!("8f8a276c19f4149656b280621e358cce24f5f52542772691ee69063b74f15d15")
        );
    }

    #[test]
    fn successive_nonces_differ() {
        let digest = Sha256::digest(b"Satoshi Nakamoto");
        let mut nonces = NonceGenerator::new(&Scalar::ONE, &bits2int(&digest), &[]);
        let first = nonces.next_nonce();
        let second = nonces.next().unwrap();
        assert_ne!(first, second);

        // same inputs restart the same sequence
        let mut again = NonceGenerator::new(&Scalar::ONE, &bits2int(&digest), &[]);
        assert_eq!(again.next_nonce(), first);
    }

    #[test]
    fn extra_data_changes_nonce() {
        let digest = bits2int(&[0u8; 32]);
        let plain = NonceGenerator::new(&Scalar::ONE, &digest, &[]).next_nonce();
        let extra = NonceGenerator::new(&Scalar::ONE, &digest, b"extra").next_nonce();
        assert_ne!(plain, extra);
    }
}
