//! Implementations of Codec for tuples.
//!
//! A tuple is encoded like a struct with positional fields: each element in order, with no
//! prefix. The unit type `()` encodes to zero bytes.

use crate::{Decode, Decoder, Encode, Encoder, Error};
use paste::paste;
use std::io;

// Tuple implementation
macro_rules! impl_codec_for_tuple {
    ($($index:literal),*) => {
        paste! {
            impl<$( [<T $index>]: Encode ),*> Encode for ( $( [<T $index>], )* ) {
                #[inline]
                fn write<W: io::Write>(&self, encoder: &mut Encoder<W>) -> Result<(), Error> {
                    $( self.$index.write(encoder)?; )*
                    Ok(())
                }
            }

            impl<$( [<T $index>]: Decode ),*> Decode for ( $( [<T $index>], )* ) {
                #[inline]
                fn read<R: io::Read>(decoder: &mut Decoder<R>) -> Result<Self, Error> {
                    Ok(( $( [<T $index>]::read(decoder)?, )* ))
                }
            }
        }
    };
}

// Generate implementations for tuple sizes 1 through 12
impl_codec_for_tuple!(0);
impl_codec_for_tuple!(0, 1);
impl_codec_for_tuple!(0, 1, 2);
impl_codec_for_tuple!(0, 1, 2, 3);
impl_codec_for_tuple!(0, 1, 2, 3, 4);
impl_codec_for_tuple!(0, 1, 2, 3, 4, 5);
impl_codec_for_tuple!(0, 1, 2, 3, 4, 5, 6);
impl_codec_for_tuple!(0, 1, 2, 3, 4, 5, 6, 7);
impl_codec_for_tuple!(0, 1, 2, 3, 4, 5, 6, 7, 8);
impl_codec_for_tuple!(0, 1, 2, 3, 4, 5, 6, 7, 8, 9);
impl_codec_for_tuple!(0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10);
impl_codec_for_tuple!(0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11);

// Unit implementation
impl Encode for () {
    #[inline]
    fn write<W: io::Write>(&self, _: &mut Encoder<W>) -> Result<(), Error> {
        Ok(())
    }
}

impl Decode for () {
    #[inline]
    fn read<R: io::Read>(_: &mut Decoder<R>) -> Result<Self, Error> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{marshal, unmarshal, unmarshal_exact, Error};

    #[test]
    fn test_tuple() {
        let tuple_values = [(1u16, None), (1u16, Some(2u32))];
        for value in tuple_values {
            let encoded = marshal(&value).unwrap();
            let decoded = unmarshal_exact::<(u16, Option<u32>)>(encoded).unwrap();
            assert_eq!(value, decoded);
        }
    }

    #[test]
    fn test_tuple_layout() {
        let value = (true, vec![0xC0u8, 0xDE], String::from("a"));
        let encoded = marshal(&value).unwrap();
        assert_eq!(&encoded[..], &[1, 2, 0xC0, 0xDE, 1, 97]);
    }

    #[test]
    fn test_large_tuple() {
        let value = (1u8, 2u8, 3u8, 4u8, 5u8, 6u8, 7u8, 8u8, 9u8, 10u8, 11u8, 12u8);
        let encoded = marshal(&value).unwrap();
        assert_eq!(&encoded[..], &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]);
        type Twelve = (u8, u8, u8, u8, u8, u8, u8, u8, u8, u8, u8, u8);
        assert_eq!(unmarshal_exact::<Twelve>(encoded).unwrap(), value);
    }

    #[test]
    fn test_unit() {
        assert!(marshal(&()).unwrap().is_empty());
        let ((), consumed) = unmarshal::<()>(&[7u8][..]).unwrap();
        assert_eq!(consumed, 0);
    }

    #[test]
    fn test_tuple_failure_position() {
        let err = unmarshal::<(u16, String)>(&[1u8, 0, 3, b'a'][..]).unwrap_err();
        assert!(matches!(err.error, Error::Truncated));
        assert_eq!(err.position, 4);
    }
}
