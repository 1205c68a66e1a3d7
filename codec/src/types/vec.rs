//! Implementations of Codec for sequences and fixed-size arrays.
//!
//! A sequence is written as a varint element count followed by each element. A fixed-size
//! array has a length known to both sides, so its elements are written with no prefix.

use crate::{Decode, Decoder, Encode, Encoder, Error};
use std::io;

// Slice implementation
impl<T: Encode> Encode for [T] {
    #[inline]
    fn write<W: io::Write>(&self, encoder: &mut Encoder<W>) -> Result<(), Error> {
        encoder.write_length(self.len())?;
        T::write_slice(self, encoder)
    }
}

// Vec implementation
impl<T: Encode> Encode for Vec<T> {
    #[inline]
    fn write<W: io::Write>(&self, encoder: &mut Encoder<W>) -> Result<(), Error> {
        self.as_slice().write(encoder)
    }
}

impl<T: Decode> Decode for Vec<T> {
    #[inline]
    fn read<R: io::Read>(decoder: &mut Decoder<R>) -> Result<Self, Error> {
        let len = decoder.read_length()?;
        T::read_vec(decoder, len)
    }
}

// Constant-size array implementation
impl<T: Encode, const N: usize> Encode for [T; N] {
    #[inline]
    fn write<W: io::Write>(&self, encoder: &mut Encoder<W>) -> Result<(), Error> {
        T::write_slice(self, encoder)
    }
}

impl<T: Decode, const N: usize> Decode for [T; N] {
    #[inline]
    fn read<R: io::Read>(decoder: &mut Decoder<R>) -> Result<Self, Error> {
        let items = T::read_vec(decoder, N)?;
        items
            .try_into()
            .map_err(|_| Error::Custom(format!("expected {N} elements")))
    }
}
