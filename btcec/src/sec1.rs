//! SEC1 encoding of public keys.
//!
//! ```text
//! compressed:   0x02 | 0x03 (y parity) || x (32 bytes)
//! uncompressed: 0x04 || x (32 bytes) || y (32 bytes)
//! ```

use crate::{
    Error, Result,
    arithmetic::{AffinePoint, FieldElement, U256, uint::from_be_slice_padded},
};
use alloc::{string::String, vec::Vec};
use core::fmt;
use subtle::Choice;

/// Length of a compressed SEC1 point.
pub const COMPRESSED_POINT_SIZE: usize = 33;

/// Length of an uncompressed SEC1 point.
pub const UNCOMPRESSED_POINT_SIZE: usize = 65;

const TAG_COMPRESSED_EVEN_Y: u8 = 0x02;
const TAG_COMPRESSED_ODD_Y: u8 = 0x03;
const TAG_UNCOMPRESSED: u8 = 0x04;

/// Serialization mode of a public key.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum PointEncoding {
    /// Parity prefix followed by the x-coordinate.
    Compressed,

    /// `0x04` followed by both coordinates.
    #[default]
    Uncompressed,
}

impl PointEncoding {
    /// Select the encoding from a `compressed` flag.
    pub fn from_compressed(compressed: bool) -> Self {
        if compressed {
            PointEncoding::Compressed
        } else {
            PointEncoding::Uncompressed
        }
    }

    /// Is this the compressed form?
    pub fn is_compressed(self) -> bool {
        self == PointEncoding::Compressed
    }

    /// Length of a point serialized in this form.
    pub fn len(self) -> usize {
        match self {
            PointEncoding::Compressed => COMPRESSED_POINT_SIZE,
            PointEncoding::Uncompressed => UNCOMPRESSED_POINT_SIZE,
        }
    }
}

/// secp256k1 public key: a finite curve point plus the form it is serialized in.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PublicKey {
    point: AffinePoint,
    encoding: PointEncoding,
}

impl PublicKey {
    /// Wrap an affine point. Fails with [`Error::InvalidPoint`] for the identity.
    pub fn from_affine(point: AffinePoint, encoding: PointEncoding) -> Result<Self> {
        if bool::from(point.is_identity()) {
            return Err(Error::InvalidPoint);
        }
        Ok(Self { point, encoding })
    }

    /// Decode a SEC1 compressed or uncompressed point.
    ///
    /// The encoding of the returned key matches the input form.
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self> {
        let (&tag, body) = bytes.split_first().ok_or(Error::InvalidEncoding)?;

        match (tag, bytes.len()) {
            (TAG_COMPRESSED_EVEN_Y | TAG_COMPRESSED_ODD_Y, COMPRESSED_POINT_SIZE) => {
                let x = coordinate(body)?;
                field_element(&x)?;
                let y_is_odd = Choice::from(tag & 1);
                let point = Option::<AffinePoint>::from(AffinePoint::decompress(&x, y_is_odd))
                    .ok_or(Error::PointNotOnCurve)?;
                Self::from_affine(point, PointEncoding::Compressed)
            }
            (TAG_UNCOMPRESSED, UNCOMPRESSED_POINT_SIZE) => {
                let (x, y) = body.split_at(32);
                let x = field_element(&coordinate(x)?)?;
                let y = field_element(&coordinate(y)?)?;
                let point = Option::<AffinePoint>::from(AffinePoint::from_coordinates(x, y))
                    .ok_or(Error::PointNotOnCurve)?;
                Self::from_affine(point, PointEncoding::Uncompressed)
            }
            _ => Err(Error::InvalidEncoding),
        }
    }

    /// Decode a hex-encoded SEC1 point.
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        Self::from_sec1_bytes(&hex::decode(hex_str)?)
    }

    /// Serialize using this key's encoding.
    pub fn to_sec1_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoding.len());
        let x = self.point.x().to_bytes();
        let y = self.point.y();

        match self.encoding {
            PointEncoding::Compressed => {
                out.push(TAG_COMPRESSED_EVEN_Y | y.is_odd().unwrap_u8());
                out.extend_from_slice(&x);
            }
            PointEncoding::Uncompressed => {
                out.push(TAG_UNCOMPRESSED);
                out.extend_from_slice(&x);
                out.extend_from_slice(&y.to_bytes());
            }
        }

        out
    }

    /// Serialize as lowercase hex using this key's encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_sec1_bytes())
    }

    /// The same point with a different serialization mode.
    pub fn with_encoding(self, encoding: PointEncoding) -> Self {
        Self { encoding, ..self }
    }

    /// The underlying curve point.
    pub fn point(&self) -> &AffinePoint {
        &self.point
    }

    /// The serialization mode.
    pub fn encoding(&self) -> PointEncoding {
        self.encoding
    }
}

impl From<PublicKey> for AffinePoint {
    fn from(public_key: PublicKey) -> AffinePoint {
        public_key.point
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

fn coordinate(bytes: &[u8]) -> Result<U256> {
    from_be_slice_padded(bytes)
}

fn field_element(x: &U256) -> Result<FieldElement> {
    Option::<FieldElement>::from(FieldElement::from_uint(x)).ok_or(Error::InvalidEncoding)
}
