//! DER encoding of ECDSA signatures.
//!
//! ```text
//! ECDSA-Sig-Value ::= SEQUENCE {
//!     r INTEGER,
//!     s INTEGER
//! }
//! ```
//!
//! Two decoders are provided. [`decode_der`] tolerates the non-minimal
//! encodings produced by legacy signers and is the entry point for
//! [`repack_der`]. [`assert_canonical_der`] accepts only the unique minimal
//! encoding that [`encode_der`] produces.

use crate::{
    Error, Result,
    arithmetic::{U256, uint::from_be_slice_padded},
};
use alloc::vec::Vec;
use tracing::debug;

const TAG_INTEGER: u8 = 0x02;
const TAG_SEQUENCE: u8 = 0x30;

/// Maximum number of length octets accepted in long-form lengths.
const MAX_LENGTH_OCTETS: usize = 4;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Mode {
    Lenient,
    Strict,
}

fn malformed(reason: &'static str) -> Error {
    debug!(reason, "rejecting DER signature");
    Error::MalformedSignature
}

struct Reader<'a> {
    bytes: &'a [u8],
    mode: Mode,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8], mode: Mode) -> Self {
        Self { bytes, mode }
    }

    fn is_finished(&self) -> bool {
        self.bytes.is_empty()
    }

    fn read_byte(&mut self) -> Result<u8> {
        let (&byte, rest) = self
            .bytes
            .split_first()
            .ok_or_else(|| malformed("unexpected end of input"))?;
        self.bytes = rest;
        Ok(byte)
    }

    fn read_slice(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.bytes.len() {
            return Err(malformed("length exceeds input"));
        }
        let (head, rest) = self.bytes.split_at(len);
        self.bytes = rest;
        Ok(head)
    }

    fn read_length(&mut self) -> Result<usize> {
        let first = self.read_byte()?;
        if first < 0x80 {
            return Ok(first as usize);
        }

        let octets = (first & 0x7f) as usize;
        if octets == 0 {
            return Err(malformed("indefinite length"));
        }
        if octets > MAX_LENGTH_OCTETS {
            return Err(malformed("length too large"));
        }

        let encoded = self.read_slice(octets)?;
        let len = encoded
            .iter()
            .fold(0usize, |acc, &byte| (acc << 8) | byte as usize);

        if self.mode == Mode::Strict && (encoded[0] == 0 || len < 0x80) {
            return Err(malformed("non-minimal length"));
        }

        Ok(len)
    }

    fn read_tlv(&mut self, tag: u8) -> Result<&'a [u8]> {
        if self.read_byte()? != tag {
            return Err(malformed("unexpected tag"));
        }
        let len = self.read_length()?;
        self.read_slice(len)
    }

    fn read_integer(&mut self) -> Result<U256> {
        if self.is_finished() {
            return Err(malformed("expected two elements"));
        }

        let contents = self.read_tlv(TAG_INTEGER)?;
        let (&first, _) = contents
            .split_first()
            .ok_or_else(|| malformed("empty integer"))?;

        if first & 0x80 != 0 {
            return Err(malformed("negative integer"));
        }

        if self.mode == Mode::Strict && contents.len() > 1 && first == 0 && contents[1] & 0x80 == 0
        {
            return Err(malformed("non-minimal integer"));
        }

        let start = contents
            .iter()
            .position(|&byte| byte != 0)
            .unwrap_or(contents.len());
        from_be_slice_padded(&contents[start..]).map_err(|_| malformed("integer too large"))
    }
}

fn decode(bytes: &[u8], mode: Mode) -> Result<(U256, U256)> {
    let mut outer = Reader::new(bytes, mode);
    let sequence = outer.read_tlv(TAG_SEQUENCE)?;

    if !outer.is_finished() {
        if mode == Mode::Strict {
            return Err(malformed("trailing data"));
        }
        debug!(
            trailing = outer.bytes.len(),
            "ignoring bytes after DER signature"
        );
    }

    let mut inner = Reader::new(sequence, mode);
    let r = inner.read_integer()?;
    let s = inner.read_integer()?;

    if !inner.is_finished() {
        return Err(malformed("expected two elements"));
    }

    Ok((r, s))
}

/// Decode `SEQUENCE { INTEGER r, INTEGER s }`, tolerating non-minimal
/// lengths, redundant leading zero bytes and trailing data.
pub fn decode_der(bytes: &[u8]) -> Result<(U256, U256)> {
    decode(bytes, Mode::Lenient)
}

/// Decode a signature, requiring the canonical minimal encoding.
pub fn assert_canonical_der(bytes: &[u8]) -> Result<(U256, U256)> {
    decode(bytes, Mode::Strict)
}

/// Encode `(r, s)` with minimal lengths and minimal signed integers.
pub fn encode_der(r: &U256, s: &U256) -> Vec<u8> {
    let mut body = Vec::with_capacity(70);
    encode_integer(&mut body, r);
    encode_integer(&mut body, s);

    let mut out = Vec::with_capacity(body.len() + 2);
    out.push(TAG_SEQUENCE);
    encode_length(&mut out, body.len());
    out.extend_from_slice(&body);
    out
}

/// Re-encode a possibly non-canonical signature in canonical form.
pub fn repack_der(bytes: &[u8]) -> Result<Vec<u8>> {
    let (r, s) = decode_der(bytes)?;
    let repacked = encode_der(&r, &s);
    if repacked.as_slice() != bytes {
        debug!(
            input_len = bytes.len(),
            output_len = repacked.len(),
            "repacked non-canonical DER signature"
        );
    }
    Ok(repacked)
}

fn encode_length(out: &mut Vec<u8>, len: usize) {
    if len < 0x80 {
        out.push(len as u8);
        return;
    }

    let octets = len.to_be_bytes();
    let start = octets
        .iter()
        .position(|&byte| byte != 0)
        .unwrap_or(octets.len() - 1);
    out.push(0x80 | (octets.len() - start) as u8);
    out.extend_from_slice(&octets[start..]);
}

fn encode_integer(out: &mut Vec<u8>, x: &U256) {
    let bytes = x.to_be_bytes();
    // zero is encoded as a single 0x00 byte
    let start = bytes
        .iter()
        .position(|&byte| byte != 0)
        .unwrap_or(bytes.len() - 1);
    let magnitude = &bytes[start..];
    let pad = magnitude[0] & 0x80 != 0;

    out.push(TAG_INTEGER);
    encode_length(out, magnitude.len() + pad as usize);
    if pad {
        out.push(0);
    }
    out.extend_from_slice(magnitude);
}
