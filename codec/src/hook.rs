//! Values that encode and decode themselves.
//!
//! A type implementing [Marshaler] produces its own bytes, which are written verbatim with no
//! added framing. A type implementing [Unmarshaler] reads its own bytes from the stream. Use
//! [impl_hooks](crate::impl_hooks) to route a type's [crate::Encode] and [crate::Decode]
//! through its hooks:
//!
//! ```
//! use bcs_codec::{impl_hooks, Error, Marshaler, Unmarshaler};
//! use std::io::Read;
//!
//! /// A flag stored as ASCII `Y` or `N`.
//! #[derive(Debug, PartialEq)]
//! struct Flag(bool);
//!
//! impl Marshaler for Flag {
//!     fn marshal_bcs(&self) -> Result<Vec<u8>, Error> {
//!         Ok(vec![if self.0 { b'Y' } else { b'N' }])
//!     }
//! }
//!
//! impl Unmarshaler for Flag {
//!     fn unmarshal_bcs<R: Read>(reader: &mut R) -> Result<Self, Error> {
//!         let mut byte = [0u8; 1];
//!         reader.read_exact(&mut byte)?;
//!         match byte[0] {
//!             b'Y' => Ok(Flag(true)),
//!             b'N' => Ok(Flag(false)),
//!             other => Err(Error::Custom(format!("invalid flag: {other}"))),
//!         }
//!     }
//! }
//!
//! impl_hooks!(Flag);
//!
//! let encoded = bcs_codec::marshal(&Flag(true)).unwrap();
//! assert_eq!(&encoded[..], b"Y");
//! assert_eq!(bcs_codec::unmarshal_exact::<Flag>(&encoded[..]).unwrap(), Flag(true));
//! ```

use crate::{Decoder, Encoder, Error};
use std::io;

/// Customizes how a value is encoded.
pub trait Marshaler {
    /// Returns the complete encoding of this value.
    fn marshal_bcs(&self) -> Result<Vec<u8>, Error>;
}

/// Customizes how a value is decoded.
pub trait Unmarshaler: Sized {
    /// Reads a value from `reader`.
    ///
    /// The reader counts every byte pulled through it, so the engine reports exactly what the
    /// hook consumed even when it fails. Nothing is produced unless the hook succeeds.
    fn unmarshal_bcs<R: io::Read>(reader: &mut R) -> Result<Self, Error>;
}

impl<W: io::Write> Encoder<W> {
    /// Writes the bytes produced by a [Marshaler].
    pub fn write_marshaled<T: Marshaler + ?Sized>(&mut self, value: &T) -> Result<(), Error> {
        let bytes = value.marshal_bcs()?;
        self.write_all(&bytes)
    }
}

impl<R: io::Read> Decoder<R> {
    /// Reads a value with its [Unmarshaler].
    pub fn read_unmarshaled<T: Unmarshaler>(&mut self) -> Result<T, Error> {
        T::unmarshal_bcs(self).map_err(eof_as_truncated)
    }
}

/// Reports a hook that ran out of input as [Error::Truncated].
pub(crate) fn eof_as_truncated(err: Error) -> Error {
    match err {
        Error::Io(err) if err.kind() == io::ErrorKind::UnexpectedEof => Error::Truncated,
        err => err,
    }
}

/// Implements [crate::Encode] and [crate::Decode] for types with [Marshaler] and
/// [Unmarshaler] hooks.
#[macro_export]
macro_rules! impl_hooks {
    ($($type:ty),+ $(,)?) => {
        $(
            impl $crate::Encode for $type {
                #[inline]
                fn write<W: ::std::io::Write>(
                    &self,
                    encoder: &mut $crate::Encoder<W>,
                ) -> ::core::result::Result<(), $crate::Error> {
                    encoder.write_marshaled(self)
                }
            }

            impl $crate::Decode for $type {
                #[inline]
                fn read<R: ::std::io::Read>(
                    decoder: &mut $crate::Decoder<R>,
                ) -> ::core::result::Result<Self, $crate::Error> {
                    decoder.read_unmarshaled()
                }
            }
        )+
    };
}
