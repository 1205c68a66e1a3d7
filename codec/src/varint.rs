//! Canonical ULEB128 (unsigned little-endian base 128) varints.
//!
//! Every length prefix, element count and tagged-union discriminant is encoded with this
//! scheme. Each byte uses:
//! - 7 bits for the value (least significant group first)
//! - 1 "continuation" bit to indicate if more bytes follow
//!
//! Only magnitudes that fit in a `u32` are representable, so an encoding is at most 5 bytes.
//! Decoding accepts exactly one encoding per value: a trailing zero group (e.g. `[0x80, 0x00]`
//! for `0`) is rejected as [Error::NonCanonical].

use crate::{Decode, Decoder, Encode, Encoder, Error};
use bytes::BufMut;
use std::io;

const DATA_BITS_PER_BYTE: usize = 7;
const DATA_BITS_MASK: u8 = 0x7F;
const CONTINUATION_BIT_MASK: u8 = 0x80;

/// Largest magnitude that can be encoded.
pub const MAX_VALUE: u64 = u32::MAX as u64;

/// Maximum number of bytes in an encoding.
pub const MAX_LEN: usize = 5;

/// Narrows `value` to the encodable range.
pub fn check(value: u64) -> Result<u32, Error> {
    u32::try_from(value).map_err(|_| Error::OutOfRange(value))
}

/// Encodes a `u32` as a varint.
pub fn write(value: u32, buf: &mut impl BufMut) {
    if value < u32::from(CONTINUATION_BIT_MASK) {
        // Fast path for small values (common case for lengths).
        buf.put_u8(value as u8);
        return;
    }

    let mut val = value;
    while val >= u32::from(CONTINUATION_BIT_MASK) {
        buf.put_u8((val as u8) | CONTINUATION_BIT_MASK);
        val >>= DATA_BITS_PER_BYTE;
    }
    buf.put_u8(val as u8);
}

/// Encodes `value` into a freshly allocated buffer.
///
/// Fails with [Error::OutOfRange] if `value` exceeds [MAX_VALUE].
pub fn encode(value: u64) -> Result<Vec<u8>, Error> {
    let value = check(value)?;
    let mut buf = Vec::with_capacity(size(value));
    write(value, &mut buf);
    Ok(buf)
}

/// Decodes a varint from the decoder.
///
/// Checks run as each byte arrives, so no more than [MAX_LEN] bytes are ever consumed.
pub fn read<R: io::Read>(decoder: &mut Decoder<R>) -> Result<u32, Error> {
    let mut result: u64 = 0;
    let mut shift = 0;

    // Loop over all the bytes.
    for _ in 0..MAX_LEN {
        // Read the next byte.
        let byte = decoder.read_u8()?;

        // Write the 7 bits of data to the result. At most 35 bits are ever set, so the
        // accumulator itself cannot wrap.
        result |= u64::from(byte & DATA_BITS_MASK) << shift;
        if result > MAX_VALUE {
            return Err(Error::Overflow);
        }

        // If the continuation bit is not set, this is the last byte.
        if byte & CONTINUATION_BIT_MASK == 0 {
            // A zero group after the first contributes nothing.
            if byte == 0 && shift > 0 {
                return Err(Error::NonCanonical);
            }
            return check(result).map_err(|_| Error::Overflow);
        }

        // Each byte has 7 bits of data.
        shift += DATA_BITS_PER_BYTE;
    }

    // The continuation bit was still set on the last permitted byte.
    Err(Error::Overflow)
}

/// Decodes a varint from the front of `bytes`, returning the value and the number of bytes
/// consumed.
pub fn decode(bytes: &[u8]) -> Result<(u32, usize), Error> {
    let mut decoder = Decoder::new(bytes);
    let value = read(&mut decoder)?;
    Ok((value, decoder.consumed()))
}

/// Calculates the number of bytes needed to encode `value` as a varint.
pub fn size(value: u32) -> usize {
    let data_bits = (u32::BITS - value.leading_zeros()) as usize;
    usize::max(1, data_bits.div_ceil(DATA_BITS_PER_BYTE))
}

/// An ergonomic wrapper to encode a `u32` as a varint rather than as the default fixed-width
/// little-endian integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Uleb128(pub u32);

impl From<u32> for Uleb128 {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<Uleb128> for u32 {
    fn from(value: Uleb128) -> Self {
        value.0
    }
}

impl Encode for Uleb128 {
    fn write<W: io::Write>(&self, encoder: &mut Encoder<W>) -> Result<(), Error> {
        encoder.write_varint(u64::from(self.0))
    }
}

impl Decode for Uleb128 {
    fn read<R: io::Read>(decoder: &mut Decoder<R>) -> Result<Self, Error> {
        decoder.read_varint().map(Self)
    }
}
