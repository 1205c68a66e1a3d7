//! Encode and decode Binary Canonical Serialization (BCS).
//!
//! # Overview
//!
//! BCS is a deterministic binary format: every value has exactly one encoding, and the encoding
//! carries no type information. The type being decoded is the sole description of what the
//! bytes contain. This crate:
//! - Encodes values into any [std::io::Write] sink
//! - Decodes untrusted input from any [std::io::Read] source, reporting the exact number of
//!   bytes consumed on success and on failure
//! - Rejects non-canonical input (e.g. over-long varints or presence bytes other than `0`/`1`)
//!
//! # Wire Format
//!
//! - Integers (`u8`..`u128`, `i8`..`i128`): fixed-width little endian
//! - `bool`: one byte, `0` or `1`
//! - Strings and byte sequences: ULEB128 length followed by the raw bytes
//! - Sequences (`Vec<T>`): ULEB128 element count followed by each element
//! - Fixed-size arrays (`[T; N]`) and tuples: elements back to back, no prefix
//! - Structs: fields in declaration order, no names
//! - Enums: ULEB128 variant index followed by the variant's payload
//! - `Option<T>`: a presence byte followed by the value, if present
//!
//! Every length prefix and variant index is a canonical ULEB128 varint of at most 5 bytes
//! (see [varint]).
//!
//! # Typed Values
//!
//! Types implement [Encode] and [Decode], usually by deriving them:
//!
//! ```
//! use bcs_codec::{Decode, DecodeExt, Encode, EncodeExt};
//!
//! #[derive(Debug, PartialEq, Encode, Decode)]
//! struct Transfer {
//!     amount: u64,
//!     memo: Option<String>,
//!     #[bcs("-")]
//!     cached: u32,
//! }
//!
//! #[derive(Debug, PartialEq, Encode, Decode)]
//! enum Op {
//!     Noop,
//!     Transfer(Transfer),
//! }
//!
//! let op = Op::Transfer(Transfer { amount: 7, memo: None, cached: 0 });
//! let encoded = op.marshal().unwrap();
//! assert_eq!(&encoded[..], &[1, 7, 0, 0, 0, 0, 0, 0, 0, 0]);
//! assert_eq!(Op::unmarshal_exact(encoded).unwrap(), op);
//! ```
//!
//! # Descriptor-Driven Values
//!
//! When the shape of the data is only known at runtime, describe it with a [Shape] and encode
//! a [Value] against it:
//!
//! ```
//! use bcs_codec::{Field, Shape, Value};
//!
//! let shape = Shape::Struct(vec![
//!     Field::new("ok", Shape::Bool),
//!     Field::new("name", Shape::String),
//! ]);
//! let value = Value::Struct(vec![Value::Bool(true), Value::String("a".into())]);
//! let encoded = shape.marshal(&value).unwrap();
//! assert_eq!(&encoded[..], &[1, 1, b'a']);
//! assert_eq!(shape.unmarshal_exact(encoded).unwrap(), value);
//! ```
//!
//! # Untrusted Input
//!
//! Decoding never allocates ahead of the bytes the source actually supplies by more than one
//! chunk ([Config::chunk_size]), and nesting is capped at [Config::max_depth].

// Allows the derive macros (which refer to `::bcs_codec`) to be used inside this crate.
extern crate self as bcs_codec;

mod bounded;
pub mod codec;
pub mod config;
pub mod dynamic;
pub mod error;
pub mod hook;
pub mod stream;
pub mod tag;
pub mod types;
pub mod varint;

// Re-export main types and traits
pub use bcs_macros::{Decode, Encode};
pub use codec::{
    decode, decode_with, encode, marshal, unmarshal, unmarshal_exact, unmarshal_exact_with,
    unmarshal_with, Decode, DecodeExt, Encode, EncodeExt,
};
pub use config::Config;
pub use dynamic::{Field, Hook, Kind, Shape, Value};
pub use error::{Error, Failure};
pub use hook::{Marshaler, Unmarshaler};
pub use stream::{Decoder, Encoder};
pub use tag::FieldPolicy;
pub use varint::Uleb128;
