//! Error type

use core::fmt::{self, Display};

/// Result type with the `btcec` crate's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors produced by key, point and signature operations.
///
/// A recovery "miss" (a recovery id which does not lead to a public key) is
/// not an error: recovery functions report it as `Ok(None)`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// DER structure invalid, wrong element count or type, negative or
    /// out-of-range signature component.
    MalformedSignature,

    /// Byte or hex input has the wrong length, prefix, or range.
    InvalidEncoding,

    /// Decoded coordinates do not satisfy `y² = x³ + 7`.
    PointNotOnCurve,

    /// No curve point exists for the requested coordinates, or the result is
    /// the point at infinity where a finite point is required.
    InvalidPoint,

    /// Private scalar is zero modulo the curve order.
    InvalidPrivateKey,

    /// Modular inverse requested for a value sharing a factor with the
    /// modulus.
    NoInverse,

    /// Ephemeral scalar produced `r = 0` or `s = 0`.
    InvalidNonce,

    /// Recovery id outside of `0..=3`.
    InvalidRecoveryId,

    /// None of the four recovery ids reproduces the signer's public key.
    RecoveryFailed,
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Error::MalformedSignature => "malformed signature",
            Error::InvalidEncoding => "invalid encoding",
            Error::PointNotOnCurve => "point not on curve",
            Error::InvalidPoint => "invalid curve point",
            Error::InvalidPrivateKey => "invalid private key",
            Error::NoInverse => "value has no modular inverse",
            Error::InvalidNonce => "invalid nonce",
            Error::InvalidRecoveryId => "invalid recovery id",
            Error::RecoveryFailed => "public key recovery failed",
        })
    }
}

impl core::error::Error for Error {}

impl From<hex::FromHexError> for Error {
    fn from(_: hex::FromHexError) -> Error {
        Error::InvalidEncoding
    }
}
