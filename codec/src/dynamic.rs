//! Descriptor-driven encoding.
//!
//! [crate::Encode] and [crate::Decode] cover data whose type is known at compile time. When the
//! layout is only known at runtime, describe it with a [Shape] and encode a [Value] against
//! it. Both paths produce identical bytes for the same logical data.
//!
//! The descriptor walk follows the same precedence as the typed layer: a [Shape::Custom] hook
//! is consulted first, then tagged unions, then the generic shape rules. Struct fields and
//! union variants carry a policy annotation (see [crate::tag]):
//! - Ignored fields produce no bytes and decode to their [Shape::zero] value.
//! - Optional fields must be [Shape::Pointer]s and are prefixed by a presence byte.
//! - Union variants must be [Shape::Pointer]s. The first populated variant is encoded, and
//!   encoding a union with no populated variant fails with [Error::EmptyUnion].
//!
//! # Example
//!
//! ```
//! use bcs_codec::{Error, Field, Shape, Value};
//!
//! let shape = Shape::Union(vec![
//!     Field::new("Num", Shape::pointer(Shape::U8)),
//!     Field::new("Text", Shape::pointer(Shape::String)),
//! ]);
//!
//! let value = Value::variant(2, 1, Value::String("abc".into()));
//! let encoded = shape.marshal(&value).unwrap();
//! assert_eq!(&encoded[..], &[1, 3, b'a', b'b', b'c']);
//!
//! let err = shape.marshal(&Value::Union(vec![None, None])).unwrap_err();
//! assert!(matches!(err.error, Error::EmptyUnion(_)));
//! ```

mod decode;
mod encode;
mod shape;
mod value;

pub use shape::{Field, Hook, Kind, Shape};
pub use value::Value;

use crate::{
    codec::{encode_failure, finish, run},
    Config, Decoder, Encoder, Error, Failure,
};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::io;

impl Shape {
    /// Encodes `value` into `sink`, returning the number of bytes written.
    pub fn encode<W: io::Write>(&self, value: &Value, sink: W) -> Result<usize, Failure> {
        let mut encoder = Encoder::new(sink);
        match self.write(value, &mut encoder) {
            Ok(()) => Ok(encoder.written()),
            Err(error) => Err(encode_failure(encoder.written(), error)),
        }
    }

    /// Encodes `value` into a new buffer.
    pub fn marshal(&self, value: &Value) -> Result<Bytes, Failure> {
        let mut encoder = Encoder::new(BytesMut::new().writer());
        match self.write(value, &mut encoder) {
            Ok(()) => Ok(encoder.into_inner().into_inner().freeze()),
            Err(error) => Err(encode_failure(encoder.written(), error)),
        }
    }

    /// Decodes a value from `source`, returning it with the number of bytes consumed.
    pub fn decode<R: io::Read>(&self, source: R) -> Result<(Value, usize), Failure> {
        self.decode_with(source, &Config::default())
    }

    /// Like [Shape::decode], with an explicit [Config].
    pub fn decode_with<R: io::Read>(
        &self,
        source: R,
        config: &Config,
    ) -> Result<(Value, usize), Failure> {
        let mut decoder = Decoder::with_config(source, *config);
        let value = run(&mut decoder, |decoder| self.read(decoder))?;
        Ok((value, decoder.consumed()))
    }

    /// Decodes a value from the front of `buf`, returning it with the number of bytes consumed.
    pub fn unmarshal(&self, buf: impl Buf) -> Result<(Value, usize), Failure> {
        self.decode(buf.reader())
    }

    /// Like [Shape::unmarshal], with an explicit [Config].
    pub fn unmarshal_with(
        &self,
        buf: impl Buf,
        config: &Config,
    ) -> Result<(Value, usize), Failure> {
        self.decode_with(buf.reader(), config)
    }

    /// Decodes a value from `buf`, failing with [Error::TrailingBytes] unless the entire buffer
    /// is consumed.
    pub fn unmarshal_exact(&self, buf: impl Buf) -> Result<Value, Failure> {
        self.unmarshal_exact_with(buf, &Config::default())
    }

    /// Like [Shape::unmarshal_exact], with an explicit [Config].
    pub fn unmarshal_exact_with(&self, buf: impl Buf, config: &Config) -> Result<Value, Failure> {
        let mut decoder = Decoder::with_config(buf.reader(), *config);
        let value = run(&mut decoder, |decoder| self.read(decoder))?;
        finish(decoder)?;
        Ok(value)
    }
}
