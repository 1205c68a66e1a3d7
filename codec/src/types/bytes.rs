//! Implementations of Codec for byte and string types.
//!
//! Both are written as a varint length followed by the raw bytes, so the length must fit
//! within a [`u32`]. Payloads are read through the bounded chunked path.

use crate::{Decode, Decoder, Encode, Encoder, Error};
use bytes::Bytes;
use std::io;

impl Encode for str {
    #[inline]
    fn write<W: io::Write>(&self, encoder: &mut Encoder<W>) -> Result<(), Error> {
        encoder.write_bytes(self.as_bytes())
    }
}

impl Encode for String {
    #[inline]
    fn write<W: io::Write>(&self, encoder: &mut Encoder<W>) -> Result<(), Error> {
        self.as_str().write(encoder)
    }
}

impl Decode for String {
    #[inline]
    fn read<R: io::Read>(decoder: &mut Decoder<R>) -> Result<Self, Error> {
        let bytes = decoder.read_bytes()?;
        String::from_utf8(bytes).map_err(|_| Error::InvalidUtf8)
    }
}

impl Encode for Bytes {
    #[inline]
    fn write<W: io::Write>(&self, encoder: &mut Encoder<W>) -> Result<(), Error> {
        encoder.write_bytes(self)
    }
}

impl Decode for Bytes {
    #[inline]
    fn read<R: io::Read>(decoder: &mut Decoder<R>) -> Result<Self, Error> {
        decoder.read_bytes().map(Bytes::from)
    }
}
