//! secp256k1 ECDSA for Bitcoin-style systems.
//!
//! Provides key regeneration, deterministic (RFC 6979) signing with
//! recoverable "compact" signatures, public-key recovery (SEC1 §4.1.6),
//! BIP62 low-S normalization and DER signature canonicalization, on top of
//! a self-contained implementation of the secp256k1 group.
//!
//! The curve's equation is `y² = x³ + 7` over a ~256-bit prime field:
//!
//! <https://www.secg.org/sec2-v2.pdf>
//!
//! ## Usage
//!
//! ```
//! use btcec::{PointEncoding, SecretKey, ecdsa};
//! use sha2::{Digest, Sha256};
//!
//! let secret_key = SecretKey::from_hex(
//!     "0000000000000000000000000000000000000000000000000000000000000001",
//! )?;
//! let digest = Sha256::digest(b"Satoshi Nakamoto");
//!
//! let signature = ecdsa::sign(&digest, &secret_key, true)?;
//! let recovered = signature.recover_public_key(&digest)?;
//! assert_eq!(recovered, Some(secret_key.public_key(PointEncoding::Compressed)));
//! # Ok::<(), btcec::Error>(())
//! ```
//!
//! The [`api`] module offers the same operations over raw bytes and hex
//! strings.

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

extern crate alloc;
#[cfg(any(feature = "std", test))]
extern crate std;

pub mod api;
pub mod arithmetic;
pub mod der;
pub mod ecdsa;
pub mod sec1;

mod error;
mod secret_key;

pub use crypto_bigint as bigint;

pub use crate::{
    arithmetic::{AffinePoint, FieldElement, ProjectivePoint, Scalar, U256},
    error::{Error, Result},
    sec1::{PointEncoding, PublicKey},
    secret_key::SecretKey,
};
