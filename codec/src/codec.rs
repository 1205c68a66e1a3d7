//! Core codec traits and entry points

use crate::{Config, Decoder, Encoder, Error, Failure};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::io;
use tracing::debug;

/// Trait for types that can be encoded.
///
/// Implemented for primitives, strings, byte sequences, collections, tuples and pointers, and
/// derived for structs and enums with `#[derive(Encode)]`.
pub trait Encode {
    /// Writes the canonical encoding of this value into the encoder.
    fn write<W: io::Write>(&self, encoder: &mut Encoder<W>) -> Result<(), Error>;

    /// Writes a run of values without a length prefix.
    ///
    /// Overridden by `u8` to write the whole slice at once.
    #[doc(hidden)]
    fn write_slice<W: io::Write>(items: &[Self], encoder: &mut Encoder<W>) -> Result<(), Error>
    where
        Self: Sized,
    {
        for item in items {
            item.write(encoder)?;
        }
        Ok(())
    }
}

/// Trait for types that can be decoded.
///
/// The type itself is the descriptor of what the bytes contain: the encoding never carries
/// shape information.
pub trait Decode: Sized {
    /// Reads a value from the decoder, consuming exactly its encoding.
    fn read<R: io::Read>(decoder: &mut Decoder<R>) -> Result<Self, Error>;

    /// Reads `len` values (see [Decoder::read_elements]).
    ///
    /// Overridden by `u8` to take the bounded payload path.
    #[doc(hidden)]
    fn read_vec<R: io::Read>(decoder: &mut Decoder<R>, len: usize) -> Result<Vec<Self>, Error> {
        decoder.read_elements(len, Self::read)
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    #[inline]
    fn write<W: io::Write>(&self, encoder: &mut Encoder<W>) -> Result<(), Error> {
        (**self).write(encoder)
    }
}

/// Encodes `value` into `sink`, returning the number of bytes written.
pub fn encode<T: Encode + ?Sized, W: io::Write>(value: &T, sink: W) -> Result<usize, Failure> {
    let mut encoder = Encoder::new(sink);
    match value.write(&mut encoder) {
        Ok(()) => Ok(encoder.written()),
        Err(error) => Err(encode_failure(encoder.written(), error)),
    }
}

/// Encodes `value` into a new buffer.
pub fn marshal<T: Encode + ?Sized>(value: &T) -> Result<Bytes, Failure> {
    let mut encoder = Encoder::new(BytesMut::new().writer());
    match value.write(&mut encoder) {
        Ok(()) => Ok(encoder.into_inner().into_inner().freeze()),
        Err(error) => Err(encode_failure(encoder.written(), error)),
    }
}

/// Decodes a `T` from `source`, returning it with the number of bytes consumed.
///
/// Bytes after the value are left unread.
pub fn decode<T: Decode, R: io::Read>(source: R) -> Result<(T, usize), Failure> {
    decode_with(source, &Config::default())
}

/// Like [decode], with an explicit [Config].
pub fn decode_with<T: Decode, R: io::Read>(
    source: R,
    config: &Config,
) -> Result<(T, usize), Failure> {
    let mut decoder = Decoder::with_config(source, *config);
    let value = run(&mut decoder, T::read)?;
    Ok((value, decoder.consumed()))
}

/// Decodes a `T` from the front of `buf`, returning it with the number of bytes consumed.
pub fn unmarshal<T: Decode>(buf: impl Buf) -> Result<(T, usize), Failure> {
    unmarshal_with(buf, &Config::default())
}

/// Like [unmarshal], with an explicit [Config].
pub fn unmarshal_with<T: Decode>(buf: impl Buf, config: &Config) -> Result<(T, usize), Failure> {
    decode_with(buf.reader(), config)
}

/// Decodes a `T` from `buf`, failing with [Error::TrailingBytes] unless the entire buffer is
/// consumed.
pub fn unmarshal_exact<T: Decode>(buf: impl Buf) -> Result<T, Failure> {
    unmarshal_exact_with(buf, &Config::default())
}

/// Like [unmarshal_exact], with an explicit [Config].
pub fn unmarshal_exact_with<T: Decode>(buf: impl Buf, config: &Config) -> Result<T, Failure> {
    let mut decoder = Decoder::with_config(buf.reader(), *config);
    let value = run(&mut decoder, T::read)?;
    finish(decoder)?;
    Ok(value)
}

/// Runs a decode routine, attaching the consumed count to any error.
pub(crate) fn run<R: io::Read, T>(
    decoder: &mut Decoder<R>,
    f: impl FnOnce(&mut Decoder<R>) -> Result<T, Error>,
) -> Result<T, Failure> {
    f(&mut *decoder).map_err(|error| {
        let position = decoder.consumed();
        debug!(position, %error, "decode failed");
        Failure::new(position, error)
    })
}

/// Checks that a decoder over an in-memory buffer has consumed all of it.
pub(crate) fn finish<B: Buf>(decoder: Decoder<bytes::buf::Reader<B>>) -> Result<(), Failure> {
    let position = decoder.consumed();
    let remaining = decoder.into_inner().into_inner().remaining();
    if remaining > 0 {
        debug!(position, remaining, "trailing bytes after value");
        return Err(Failure::new(position, Error::TrailingBytes(remaining)));
    }
    Ok(())
}

pub(crate) fn encode_failure(position: usize, error: Error) -> Failure {
    debug!(position, %error, "encode failed");
    Failure::new(position, error)
}

/// Extension trait providing ergonomic encode methods.
pub trait EncodeExt: Encode {
    /// Encodes this value into a new buffer (see [marshal]).
    fn marshal(&self) -> Result<Bytes, Failure> {
        marshal(self)
    }

    /// Encodes this value into `sink` (see [encode]).
    fn encode_into<W: io::Write>(&self, sink: W) -> Result<usize, Failure> {
        encode(self, sink)
    }
}

// Automatically implement `EncodeExt` for types that implement `Encode`.
impl<T: Encode + ?Sized> EncodeExt for T {}

/// Extension trait providing ergonomic decode methods.
pub trait DecodeExt: Decode {
    /// Decodes a value from the front of `buf` (see [unmarshal]).
    fn unmarshal(buf: impl Buf) -> Result<(Self, usize), Failure> {
        unmarshal(buf)
    }

    /// Decodes a value from `buf`, requiring it to be fully consumed (see [unmarshal_exact]).
    fn unmarshal_exact(buf: impl Buf) -> Result<Self, Failure> {
        unmarshal_exact(buf)
    }

    /// Decodes a value from a byte stream (see [decode]).
    fn decode_from<R: io::Read>(source: R) -> Result<(Self, usize), Failure> {
        decode(source)
    }
}

// Automatically implement `DecodeExt` for types that implement `Decode`.
impl<T: Decode> DecodeExt for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn test_insufficient_buffer() {
        let reader = Bytes::from_static(&[0x01, 0x02]);
        let err = unmarshal::<u32>(reader).unwrap_err();
        assert!(matches!(err.error, Error::Truncated));
        assert_eq!(err.position, 2);
    }

    #[test]
    fn test_trailing_bytes() {
        let mut encoded = BytesMut::from(&42u16.marshal().unwrap()[..]);
        encoded.put_u8(0);
        let err = u16::unmarshal_exact(encoded.freeze()).unwrap_err();
        assert!(matches!(err.error, Error::TrailingBytes(1)));
        assert_eq!(err.position, 2);
    }

    #[test]
    fn test_unmarshal_reports_consumed() {
        let (value, consumed) = u16::unmarshal(&[0x34, 0x12, 0xff][..]).unwrap();
        assert_eq!(value, 4660);
        assert_eq!(consumed, 2);
    }

    #[test]
    fn test_encode_into_sink() {
        let mut sink = Vec::new();
        let written = (1u8, 2u16).encode_into(&mut sink).unwrap();
        assert_eq!(written, 3);
        assert_eq!(sink, vec![1, 2, 0]);
    }

    #[test]
    fn test_decode_from_stream() {
        let source = io::Cursor::new(vec![1u8, 0xff, 0xff]);
        let ((flag, value), consumed) = <(bool, i16)>::decode_from(source).unwrap();
        assert!(flag);
        assert_eq!(value, -1);
        assert_eq!(consumed, 3);
    }

    #[test]
    fn test_decode_with_config() {
        let cfg = Config::default().with_max_length(2);
        let err = decode_with::<Vec<u8>, _>(&[3u8, 1, 2, 3][..], &cfg).unwrap_err();
        assert!(matches!(err.error, Error::LengthExceeded(3, 2)));
        assert_eq!(err.position, 1);
    }
}
