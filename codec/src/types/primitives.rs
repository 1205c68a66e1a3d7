//! Codec implementations for Rust primitive types.
//!
//! All integers are written little-endian at their natural width. `bool` is a single byte:
//! `0` or `1` when encoding, while any non-zero byte decodes as `true`.
//!
//! `Option<T>` is written as a presence byte followed by the value, if present. Unlike `bool`,
//! the presence byte must be exactly `0` or `1`.

use crate::{Decode, Decoder, Encode, Encoder, Error};
use std::io;

// Numeric types implementation
macro_rules! impl_numeric {
    ($($type:ty),+) => {
        $(
            impl Encode for $type {
                #[inline]
                fn write<W: io::Write>(&self, encoder: &mut Encoder<W>) -> Result<(), Error> {
                    encoder.write_all(&self.to_le_bytes())
                }
            }

            impl Decode for $type {
                #[inline]
                fn read<R: io::Read>(decoder: &mut Decoder<R>) -> Result<Self, Error> {
                    decoder.read_array().map(<$type>::from_le_bytes)
                }
            }
        )+
    };
}

impl_numeric!(u16, u32, u64, u128, i8, i16, i32, i64, i128);

// `u8` runs are written and read in bulk.
impl Encode for u8 {
    #[inline]
    fn write<W: io::Write>(&self, encoder: &mut Encoder<W>) -> Result<(), Error> {
        encoder.write_u8(*self)
    }

    #[inline]
    fn write_slice<W: io::Write>(items: &[Self], encoder: &mut Encoder<W>) -> Result<(), Error> {
        encoder.write_all(items)
    }
}

impl Decode for u8 {
    #[inline]
    fn read<R: io::Read>(decoder: &mut Decoder<R>) -> Result<Self, Error> {
        decoder.read_u8()
    }

    #[inline]
    fn read_vec<R: io::Read>(decoder: &mut Decoder<R>, len: usize) -> Result<Vec<Self>, Error> {
        decoder.read_payload(len)
    }
}

// Bool implementation
impl Encode for bool {
    #[inline]
    fn write<W: io::Write>(&self, encoder: &mut Encoder<W>) -> Result<(), Error> {
        encoder.write_u8(u8::from(*self))
    }
}

impl Decode for bool {
    #[inline]
    fn read<R: io::Read>(decoder: &mut Decoder<R>) -> Result<Self, Error> {
        Ok(decoder.read_u8()? != 0)
    }
}

// Option implementation
impl<T: Encode> Encode for Option<T> {
    #[inline]
    fn write<W: io::Write>(&self, encoder: &mut Encoder<W>) -> Result<(), Error> {
        encoder.write_presence(self.is_some())?;
        if let Some(inner) = self {
            inner.write(encoder)?;
        }
        Ok(())
    }
}

impl<T: Decode> Decode for Option<T> {
    #[inline]
    fn read<R: io::Read>(decoder: &mut Decoder<R>) -> Result<Self, Error> {
        if decoder.read_presence()? {
            Ok(Some(T::read(decoder)?))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{marshal, unmarshal, unmarshal_exact, Error};
    use paste::paste;
    use test_case::test_case;

    // Integer tests
    macro_rules! impl_num_test {
        ($type:ty, $size:expr) => {
            paste! {
                #[test]
                fn [<test_ $type>]() {
                    let values: [$type; 5] =
                        [0 as $type, 1 as $type, 42 as $type, <$type>::MAX, <$type>::MIN];
                    for value in values {
                        let encoded = marshal(&value).unwrap();
                        assert_eq!(encoded.len(), $size);
                        assert_eq!(&encoded[..], &value.to_le_bytes());
                        let (decoded, consumed) = unmarshal::<$type>(encoded).unwrap();
                        assert_eq!(value, decoded);
                        assert_eq!(consumed, $size);
                    }
                }
            }
        };
    }
    impl_num_test!(u8, 1);
    impl_num_test!(u16, 2);
    impl_num_test!(u32, 4);
    impl_num_test!(u64, 8);
    impl_num_test!(u128, 16);
    impl_num_test!(i8, 1);
    impl_num_test!(i16, 2);
    impl_num_test!(i32, 4);
    impl_num_test!(i64, 8);
    impl_num_test!(i128, 16);

    #[test]
    fn test_integer_vectors() {
        assert_eq!(&marshal(&-1i8).unwrap()[..], &[0xff]);
        assert_eq!(&marshal(&4660u16).unwrap()[..], &[0x34, 0x12]);
        assert_eq!(&marshal(&-4660i16).unwrap()[..], &[0xcc, 0xed]);
        assert_eq!(
            &marshal(&305419896u32).unwrap()[..],
            &[0x78, 0x56, 0x34, 0x12]
        );
        assert_eq!(
            &marshal(&-305419896i32).unwrap()[..],
            &[0x88, 0xa9, 0xcb, 0xed]
        );
        assert_eq!(
            &marshal(&1311768467750121216u64).unwrap()[..],
            &[0x00, 0xef, 0xcd, 0xab, 0x78, 0x56, 0x34, 0x12]
        );
        assert_eq!(
            &marshal(&-1311768467750121216i64).unwrap()[..],
            &[0x00, 0x11, 0x32, 0x54, 0x87, 0xa9, 0xcb, 0xed]
        );
        assert_eq!(
            &marshal(&1u128).unwrap()[..],
            &[1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test_case(&[0x01], true; "one")]
    #[test_case(&[0x00], false; "zero")]
    #[test_case(&[0x02], true; "non-zero")]
    #[test_case(&[0xff], true; "max")]
    fn test_bool_decode(bytes: &[u8], expected: bool) {
        assert_eq!(unmarshal_exact::<bool>(bytes).unwrap(), expected);
    }

    #[test]
    fn test_bool_encode() {
        assert_eq!(&marshal(&true).unwrap()[..], &[1]);
        assert_eq!(&marshal(&false).unwrap()[..], &[0]);
    }

    #[test]
    fn test_option() {
        assert_eq!(&marshal(&None::<u16>).unwrap()[..], &[0]);
        assert_eq!(&marshal(&Some(4660u16)).unwrap()[..], &[1, 0x34, 0x12]);
        assert_eq!(unmarshal_exact::<Option<u16>>(&[0u8][..]).unwrap(), None);
        assert_eq!(
            unmarshal_exact::<Option<u16>>(&[1u8, 0x34, 0x12][..]).unwrap(),
            Some(4660)
        );
    }

    #[test]
    fn test_option_invalid_presence() {
        let err = unmarshal::<Option<u8>>(&[2u8, 0][..]).unwrap_err();
        assert!(matches!(err.error, Error::InvalidPresence(2)));
        assert_eq!(err.position, 1);
    }

    #[test]
    fn test_truncated() {
        let err = unmarshal::<u64>(&[1u8, 2, 3][..]).unwrap_err();
        assert!(matches!(err.error, Error::Truncated));
        assert_eq!(err.position, 3);

        let err = unmarshal::<Option<u32>>(&[1u8][..]).unwrap_err();
        assert!(matches!(err.error, Error::Truncated));
        assert_eq!(err.position, 1);
    }
}
