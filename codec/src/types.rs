//! [crate::Encode] and [crate::Decode] implementations for common types.
//!
//! Types with no canonical encoding (floats, `usize`, maps, references to trait objects) have
//! no implementation, so encoding them is rejected at compile time.

pub mod bytes;
pub mod pointer;
pub mod primitives;
pub mod tuple;
pub mod vec;
